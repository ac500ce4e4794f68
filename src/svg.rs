//! SVG serialization of traced polygons.
//!
//! Every palette color becomes one `<path>` element whose subpaths are the
//! simplified contours of that color. Paths are written in palette order, so
//! the most frequent color is painted first and rarer colors land on top.

use std::fmt::{self, Write};

use crate::color::Color;
use crate::config::TRANSPARENT;
use crate::contour::Contour;

/// One `<path>` element: a fill color and the closed subpaths sharing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    pub color: Color,
    pub contours: Vec<Contour>,
}

impl PathEntry {
    pub fn new(color: Color, contours: Vec<Contour>) -> Self {
        Self { color, contours }
    }

    /// Build the `d` attribute: `M x y L x y ... Z` per contour.
    pub fn path_data(&self) -> String {
        PathData(self).to_string()
    }
}

/// Streams the `d` attribute of a [`PathEntry`] without an intermediate string.
struct PathData<'a>(&'a PathEntry);

impl fmt::Display for PathData<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first_subpath = true;
        for contour in &self.0.contours {
            let Some((first, rest)) = contour.points().split_first() else {
                continue;
            };
            if !first_subpath {
                f.write_char(' ')?;
            }
            first_subpath = false;
            write!(f, "M{} {}", first.x, first.y)?;
            for p in rest {
                write!(f, " L{} {}", p.x, p.y)?;
            }
            f.write_str(" Z")?;
        }
        Ok(())
    }
}

/// A complete vector document ready to be rendered to text.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    pub width: u32,
    pub height: u32,
    /// Background fill, or `None` for a transparent canvas.
    pub background: Option<String>,
    /// Paths in draw order.
    pub paths: Vec<PathEntry>,
}

impl SvgDocument {
    /// Create a document; a background of `"transparent"` is treated as none.
    pub fn new(width: u32, height: u32, background: &str, paths: Vec<PathEntry>) -> Self {
        let background = (background != TRANSPARENT).then(|| background.to_string());
        Self {
            width,
            height,
            background,
            paths,
        }
    }

    /// Render the document as an SVG string.
    pub fn to_svg_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SvgDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (w, h) = (self.width, self.height);
        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        )?;
        if let Some(background) = &self.background {
            writeln!(
                f,
                r#"  <rect x="0" y="0" width="{w}" height="{h}" fill="{}"/>"#,
                xml_escape(background)
            )?;
        }
        for entry in &self.paths {
            writeln!(
                f,
                r#"  <path d="{}" fill="{}"/>"#,
                PathData(entry),
                entry.color.to_svg_rgb()
            )?;
        }
        write!(f, "</svg>")
    }
}

/// Escape the five XML special characters for use in an attribute value.
fn xml_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}
