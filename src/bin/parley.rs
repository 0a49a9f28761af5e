//! Parley CLI binary.

use clap::Parser;
use parley::cli::{args::*, commands::*};
use std::process;

fn main() {
    // Parse command line arguments using clap
    let args = ParleyArgs::parse();

    // Map verbosity onto the log filter unless RUST_LOG overrides it
    let filter = match args.verbosity() {
        0 => "error",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    // Execute the command
    if let Err(e) = execute_command(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
