//! CLI command implementations
//!
//! Every command builds a store from the global options plus the resources
//! named on its command line, then reports on it. Exit codes: 0 success,
//! 1 property not found, 2 configuration or document error, 5 fatal.

pub mod dump;
pub mod get;
pub mod sources;

use crate::config::{load_options, options_from_env};
use crate::core::PropertyStore;
use crate::domain::{Resource, Result};
use std::path::PathBuf;

/// Global settings shared by all commands
#[derive(Debug, Clone, Default)]
pub struct StoreContext {
    pub options_path: Option<String>,
    pub conf_dirs: Vec<PathBuf>,
}

/// Interprets a command-line resource: URLs by scheme, anything else as a path
pub fn parse_resource(arg: &str) -> Result<Resource> {
    if arg.contains("://") {
        Resource::url(arg)
    } else {
        Ok(Resource::path(arg))
    }
}

/// Builds a store with the defaults and every resource in `resources`
pub fn open_store(ctx: &StoreContext, resources: &[String]) -> Result<PropertyStore> {
    let mut options = match &ctx.options_path {
        Some(path) => load_options(path)?,
        None => options_from_env()?,
    };
    let mut search_path = ctx.conf_dirs.clone();
    search_path.append(&mut options.search_path);
    options.search_path = search_path;

    let store = PropertyStore::with_options(options)?;
    for arg in resources {
        let summary = store.add_resource(parse_resource(arg)?)?;
        crate::log_resource_applied!(&summary);
    }
    Ok(store)
}

/// Prints a load failure the way every command reports it; returns exit code 2
pub(crate) fn report_load_error(err: &crate::domain::StrataError) -> i32 {
    println!("❌ Failed to load configuration");
    println!("   Error: {}", err);
    2
}
