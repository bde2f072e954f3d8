//! Dump command implementation
//!
//! Writes the resolved configuration (or one key) to stdout.

use super::{open_store, report_load_error, StoreContext};
use crate::domain::StrataError;
use clap::{Args, ValueEnum};
use std::io::Write;

/// Output format for `dump`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DumpFormat {
    Xml,
    Json,
}

/// Arguments for the dump command
#[derive(Args, Debug)]
pub struct DumpArgs {
    /// Dump only this property
    #[arg(short, long)]
    pub key: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = DumpFormat::Xml)]
    pub format: DumpFormat,

    /// Documents to load, in order (paths or URLs)
    pub resources: Vec<String>,
}

impl DumpArgs {
    /// Execute the dump command
    pub fn execute(&self, ctx: &StoreContext) -> anyhow::Result<i32> {
        let store = match open_store(ctx, &self.resources) {
            Ok(s) => s,
            Err(e) => return Ok(report_load_error(&e)),
        };

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        let result = match self.format {
            DumpFormat::Xml => store.write_xml(self.key.as_deref(), &mut out),
            DumpFormat::Json => store.dump_json(self.key.as_deref(), &mut out),
        };

        match result {
            Ok(()) => {
                writeln!(out)?;
                Ok(0)
            }
            Err(StrataError::NotFound(key)) => {
                eprintln!("Property {key} not found");
                Ok(1)
            }
            Err(e) => Err(e.into()),
        }
    }
}
