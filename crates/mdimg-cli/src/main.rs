use mdimg_core::logging;

mod cli;

use crate::cli::CliCommand;

fn main() {
    // Before anything else; falls back to stderr on its own.
    logging::init();

    if let Err(err) = CliCommand::run_from_args() {
        eprintln!("mdimg error: {:#}", err);
        std::process::exit(1);
    }
}
