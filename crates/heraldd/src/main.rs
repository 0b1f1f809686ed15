use std::process::ExitCode;

use clap::Parser;
use heraldd::{Cli, run_daemon};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run_daemon(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("heraldd: {error}");
            ExitCode::FAILURE
        }
    }
}
