use std::process;

use clap::Parser;
use log::info;

use installment_normalizer::{Config, run};

fn main() {
    let config = Config::parse();
    // Initialize logger (respect RUST_LOG env var if set)
    env_logger::init();

    info!("starting installment normalizer with file: {}", config.input.display());

    if let Err(e) = run(&config) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
