use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use polytrace::TraceOptions;

/// Command line interface definition.
#[derive(Parser, Debug)]
#[command(author, version, about, propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct GlobalOptions {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Trace an image into an SVG of filled polygons
    Trace(TraceCommand),
    /// Print the quantized palette of an image
    Palette(PaletteCommand),
}

#[derive(Args, Debug)]
pub struct TraceCommand {
    /// Input image path
    pub input: PathBuf,
    /// Output SVG path (defaults to input name with `.svg`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[command(flatten)]
    pub palette_options: PaletteArgs,
    /// Polygon simplification tolerance in pixels
    #[arg(long = "simplify-tolerance", env = "POLYTRACE_SIMPLIFY_TOLERANCE", default_value_t = 1.0)]
    pub simplify_tolerance: f64,
    /// Background fill color, or `transparent` for none
    #[arg(long = "background", env = "POLYTRACE_BACKGROUND", default_value = "transparent")]
    pub background: String,
}

#[derive(Args, Debug)]
pub struct PaletteCommand {
    /// Input image path
    pub input: PathBuf,
    #[command(flatten)]
    pub palette_options: PaletteArgs,
}

#[derive(Args, Debug)]
pub struct PaletteArgs {
    /// Maximum number of palette colors
    #[arg(long = "max-colors", env = "POLYTRACE_MAX_COLORS", default_value_t = 16)]
    pub max_colors: usize,
    /// Quantization step per RGB channel
    #[arg(long = "color-tolerance", env = "POLYTRACE_COLOR_TOLERANCE", default_value_t = 30)]
    pub color_tolerance: u32,
}

impl From<&TraceCommand> for TraceOptions {
    fn from(cmd: &TraceCommand) -> Self {
        TraceOptions::from(&cmd.palette_options)
            .with_simplify_tolerance(cmd.simplify_tolerance)
            .with_background_color(cmd.background.clone())
    }
}

impl From<&PaletteArgs> for TraceOptions {
    fn from(args: &PaletteArgs) -> Self {
        TraceOptions::default()
            .with_max_colors(args.max_colors)
            .with_color_tolerance(args.color_tolerance)
    }
}
