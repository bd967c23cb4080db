use anyhow::Result;
use clap::Parser;
use std::path::Path;
use tracing::error;

use talkstat::{analyze, init_default_patterns, utils, Args};

fn main() -> Result<()> {
    let args = Args::parse();
    utils::setup_logging(args.verbose);

    if let Err(e) = utils::validate_args(&args) {
        error!("Error: {:#}", e);
        std::process::exit(2);
    }

    if args.init {
        if let Err(e) = init_default_patterns(Path::new(".")) {
            error!("Error: {:#}", e);
            std::process::exit(1);
        }
        return Ok(());
    }

    if let Err(e) = analyze::run(&args) {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
    Ok(())
}
