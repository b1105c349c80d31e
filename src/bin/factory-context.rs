//! Factory Context CLI Binary
//!
//! Command-line interface for the smart-factory domain context service.

use clap::Parser;
use factory_context::logging::init_logging;
use factory_context::tooling::cli::{load_config, Cli, CliContext};
use std::process;

fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli.workspace, cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(1);
        }
    };

    let logging = config.logging.clone().with_overrides(
        cli.log_level.clone(),
        cli.log_format.clone(),
        cli.log_output.clone(),
        cli.log_file.clone(),
    );
    if let Err(e) = init_logging(Some(&logging)) {
        eprintln!("Error initializing logging: {}", e);
        process::exit(1);
    }

    let context = match CliContext::from_config(cli.workspace.clone(), &config) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error initializing workspace: {}", e);
            process::exit(1);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            println!("{}", output.rendered);
            if !output.success {
                process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
