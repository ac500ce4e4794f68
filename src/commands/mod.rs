mod palette;
mod trace;
mod utils;

use crate::cli::{Cli, Commands};
use polytrace::TraceResult;

/// The main function to run the command based on CLI input.
pub fn run(cli: Cli) -> TraceResult<()> {
    dispatch(cli.command)
}

/// Dispatch the command to the appropriate handler.
fn dispatch(command: Commands) -> TraceResult<()> {
    match command {
        Commands::Trace(cmd) => trace::run(cmd),
        Commands::Palette(cmd) => palette::run(cmd),
    }
}
