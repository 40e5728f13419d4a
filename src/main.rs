mod args;
mod recorder;

use clap::Parser;
use log::{debug, error, warn, LevelFilter};
use snafu::ErrorCompat;

use std::process;

fn main() {
    let args = args::Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if args.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();
    debug!("args: {:?}", args);

    match recorder::run(&args) {
        Ok(outcome) => {
            println!("{}", outcome);
            process::exit(outcome.exit_code());
        }
        Err(e) => {
            if e.is_rejection() {
                warn!("Rejected: {:?}", e);
            } else {
                error!("Error occurred {:?}", e);
            }
            eprintln!("An error occurred: {}", e);
            if let Some(bt) = ErrorCompat::backtrace(&e) {
                eprintln!("trace: {}", bt);
            }
            process::exit(1);
        }
    }
}
