mod cli;
mod commands;
mod error;
mod logging;

use crate::cli::Cli;
use clap::Parser;
use clap::error::ErrorKind;
use tracing::error;

fn main() {
    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) if matches!(e.kind(), ErrorKind::ValueValidation | ErrorKind::InvalidValue) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
        Err(_) => {
            // Wrong argument shape gets the plain usage line on stdout.
            println!("{}", cli::USAGE_LINE);
            std::process::exit(1);
        }
    };

    logging::setup_logging();

    if let Err(e) = commands::protonate::run(&args) {
        error!("Command failed: {e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
