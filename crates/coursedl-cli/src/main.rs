use coursedl_core::logging;

mod cli;

use crate::cli::Cli;

fn main() {
    // Initialize logging as early as possible; fall back to stderr if the state dir is unusable.
    if let Err(err) = logging::init_logging() {
        match logging::init_logging_stderr() {
            Ok(()) => tracing::warn!("file logging unavailable: {:#}", err),
            Err(stderr_err) => eprintln!(
                "coursedl: logging disabled ({:#}; {:#})",
                err, stderr_err
            ),
        }
    }

    if let Err(err) = Cli::run_from_args() {
        eprintln!("coursedl error: {:#}", err);
        std::process::exit(1);
    }
}
