//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use giftwise_cli::CliError;

fn main() -> eyre::Result<()> {
    giftwise_cli::init_logging()?;
    match giftwise_cli::run() {
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        result => Ok(result?),
    }
}
