// Strata - Layered Configuration Resolution Engine
// Copyright (c) 2025 Strata Contributors
// Licensed under the MIT License

use strata::cli::commands::StoreContext;
use strata::cli::{Cli, Commands};
use strata::config::LoggingOptions;
use strata::logging::init_logging;
use clap::Parser;
use std::process;

fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Console-only logging for the CLI
    let log_level = cli.log_level.as_deref().unwrap_or("warn");
    let _guard = match init_logging(log_level, &LoggingOptions::default()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "Strata");

    let ctx = StoreContext {
        options_path: cli.options.clone(),
        conf_dirs: cli.conf_dirs.clone(),
    };

    let exit_code = match execute_command(&cli, &ctx) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5
        }
    };

    process::exit(exit_code);
}

/// Execute the CLI command
fn execute_command(cli: &Cli, ctx: &StoreContext) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Dump(args) => args.execute(ctx),
        Commands::Get(args) => args.execute(ctx),
        Commands::Sources(args) => args.execute(ctx),
    }
}
