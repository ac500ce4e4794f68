use std::fs;

use polytrace::{PixelBuffer, Polytrace, TraceOptions, TraceResult};
use tracing::info;

use crate::cli::TraceCommand;

use super::utils::derive_svg_path;

/// The main function to run the trace command.
pub fn run(cmd: TraceCommand) -> TraceResult<()> {
    let options = TraceOptions::from(&cmd);
    options.validate()?;

    let output_path = cmd
        .output
        .clone()
        .unwrap_or_else(|| derive_svg_path(&cmd.input));

    let buffer = PixelBuffer::open(&cmd.input)?;
    info!(
        input = %cmd.input.display(),
        width = buffer.width(),
        height = buffer.height(),
        "decoded image"
    );

    let document = Polytrace::with_options(options).document(&buffer)?;
    fs::write(&output_path, document.to_svg_string())?;
    info!(paths = document.paths.len(), "wrote svg");
    println!("SVG saved to {}", output_path.display());

    Ok(())
}
