use appcat_core::logging;

mod cli;

use crate::cli::Cli;

fn main() {
    // Initialize logging as early as possible.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    // Parse CLI and dispatch. Only a fatal error exits non-zero; per-application
    // failures are logged by the engine.
    if let Err(err) = Cli::run_from_args() {
        eprintln!("appcat error: {:#}", err);
        std::process::exit(1);
    }
}
