mod agents;
mod cli;
mod error;
mod maven;
mod pom;
mod registry;
mod utils;
mod workflow;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use std::process;

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        unsafe {
            std::env::set_var("POMUP_VERBOSE", "1");
        }
    }

    // A bare `pomup` runs the full update pipeline.
    let command = cli.command.unwrap_or(Commands::Update {
        filter: None,
        repository: None,
    });

    let result = match command {
        Commands::Update { filter, repository } => {
            workflow::execute_update(&cli.path, filter, repository)
        }
        Commands::Check { filter, repository } => {
            workflow::execute_check(&cli.path, filter, repository)
        }
        Commands::List => workflow::execute_list(&cli.path),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}
