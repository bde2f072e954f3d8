//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Strata using clap.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strata - layered configuration resolution
#[derive(Parser, Debug)]
#[command(name = "strata")]
#[command(version, about, long_about = None)]
#[command(author = "Strata Contributors")]
pub struct Cli {
    /// Path to an engine options file (TOML)
    #[arg(short, long, env = "STRATA_OPTIONS")]
    pub options: Option<String>,

    /// Directory searched for named resources and includes (repeatable)
    #[arg(short = 'd', long = "conf-dir")]
    pub conf_dirs: Vec<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "STRATA_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Dump the resolved configuration as XML or JSON
    Dump(commands::dump::DumpArgs),

    /// Print the resolved value of one property
    Get(commands::get::GetArgs),

    /// Print where a property's value came from
    Sources(commands::sources::SourcesArgs),
}
