//! Nova - bundle manager
//!
//! Command line entry point. Parses arguments, initializes the tracing
//! sink, dispatches to the command implementations, and maps errors onto
//! the exit-code contract. Panics escaping the command layer are contained
//! here and reported as internal errors.

use std::path::PathBuf;

use clap::Parser;

use nova::cli::{Cli, Commands};
use nova::error::Result;
use nova::{commands, logging};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let working_dir = cli
        .working_dir
        .clone()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    let outcome =
        std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| run(cli, &working_dir)));

    let code = match outcome {
        Ok(Ok(())) => 0,
        Ok(Err(err)) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            code
        }
        Err(_) => {
            eprintln!("nova: internal error (unexpected panic)");
            70
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli, working_dir: &std::path::Path) -> Result<()> {
    match cli.command {
        Commands::Marketplace(args) => commands::marketplace::run(working_dir, args),
        Commands::Config(args) => commands::config::run(working_dir, args),
        Commands::Completions(args) => commands::completions::run(args),
    }
}
