use polytrace::{PixelBuffer, Polytrace, TraceOptions, TraceResult};

use crate::cli::PaletteCommand;

/// The main function to run the palette command.
pub fn run(cmd: PaletteCommand) -> TraceResult<()> {
    let options = TraceOptions::from(&cmd.palette_options);
    options.validate()?;

    let buffer = PixelBuffer::open(&cmd.input)?;
    let palette = Polytrace::with_options(options).palette(&buffer)?;

    if palette.is_empty() {
        println!("No opaque pixels in {}", cmd.input.display());
        return Ok(());
    }
    for entry in palette.entries() {
        println!("{} {}", entry.color.to_hex(), entry.count);
    }

    Ok(())
}
