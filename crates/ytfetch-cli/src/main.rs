use ytfetch_core::logging;

mod cli;

use crate::cli::Cli;
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // File logging is best-effort; a read-only state dir must not kill the CLI.
    let verbose = cli.verbose();
    if logging::init_logging(verbose).is_err() {
        logging::init_logging_stderr(verbose);
    }

    match cli.run().await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("ytfetch error: {:#}", err);
            std::process::exit(2);
        }
    }
}
