//! Get command implementation

use super::{open_store, report_load_error, StoreContext};
use clap::Args;

/// Arguments for the get command
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Property name
    pub key: String,

    /// Print the stored text without `${...}` expansion
    #[arg(long)]
    pub raw: bool,

    /// Documents to load, in order (paths or URLs)
    pub resources: Vec<String>,
}

impl GetArgs {
    /// Execute the get command
    pub fn execute(&self, ctx: &StoreContext) -> anyhow::Result<i32> {
        let store = match open_store(ctx, &self.resources) {
            Ok(s) => s,
            Err(e) => return Ok(report_load_error(&e)),
        };

        let value = if self.raw {
            store.get_raw(&self.key)
        } else {
            store.get(&self.key)?
        };

        match value {
            Some(v) => {
                println!("{v}");
                Ok(0)
            }
            None => {
                eprintln!("Property {} not found", self.key);
                Ok(1)
            }
        }
    }
}
