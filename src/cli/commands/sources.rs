//! Sources command implementation
//!
//! Prints the provenance of one property, oldest entry first.

use super::{open_store, report_load_error, StoreContext};
use clap::Args;

/// Arguments for the sources command
#[derive(Args, Debug)]
pub struct SourcesArgs {
    /// Property name
    pub key: String,

    /// Documents to load, in order (paths or URLs)
    pub resources: Vec<String>,
}

impl SourcesArgs {
    /// Execute the sources command
    pub fn execute(&self, ctx: &StoreContext) -> anyhow::Result<i32> {
        let store = match open_store(ctx, &self.resources) {
            Ok(s) => s,
            Err(e) => return Ok(report_load_error(&e)),
        };

        let Some(sources) = store.get_property_sources(&self.key) else {
            eprintln!("Property {} not found", self.key);
            return Ok(1);
        };

        let is_final = store.is_final(&self.key);
        println!("{}{}", self.key, if is_final { " (final)" } else { "" });
        for source in sources {
            println!("  {source}");
        }
        Ok(0)
    }
}
