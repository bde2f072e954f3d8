// Strata - Layered Configuration Resolution Engine
// Copyright (c) 2025 Strata Contributors
// Licensed under the MIT License

//! # Strata - Layered Configuration Resolution
//!
//! Strata builds one key/value view out of a stack of XML property documents
//! and programmatic writes, the way cluster software layers default, site and
//! job configuration.
//!
//! ## Overview
//!
//! This library provides:
//! - **Loading** `<configuration>` documents from paths, URLs, the search path
//!   or in-memory streams, with `xi:include` and DTD entities
//! - **Layering** documents in order, where keys declared `final` cannot be
//!   overridden later
//! - **Resolving** `${name}` references lazily on every read
//! - **Typed access** to integers, sizes, durations, ranges, endpoints and more
//! - **Dumping** the resolved view as XML or JSON with secrets masked
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Loader, substitution, the property store and its accessors
//! - [`adapters`] - Resource fetching (files, HTTP) and credential providers
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Options for the engine itself and well-known keys
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use strata::core::PropertyStore;
//! use strata::domain::Resource;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Loads strata-default.xml and strata-site.xml when present
//!     let store = PropertyStore::new()?;
//!     store.add_resource(Resource::path("conf/app.xml"))?;
//!
//!     let workers = store.get_int("app.workers", 4)?;
//!     let timeout = store.get_time_duration(
//!         "app.timeout",
//!         30,
//!         strata::core::accessors::TimeUnit::Seconds,
//!     )?;
//!     println!("{workers} workers, {timeout}s timeout");
//!     Ok(())
//! }
//! ```
//!
//! ## Final Properties
//!
//! ```rust
//! use strata::core::PropertyStore;
//! use strata::domain::Resource;
//!
//! let store = PropertyStore::empty();
//! store.add_resource(Resource::from_bytes("site", r#"<configuration>
//!     <property><name>k</name><value>locked</value><final>true</final></property>
//! </configuration>"#)).unwrap();
//!
//! store.set("k", "changed").unwrap();
//! assert_eq!(store.get("k").unwrap().as_deref(), Some("locked"));
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::Result`] with a
//! [`domain::StrataError`]. Override attempts on final keys are not errors;
//! they are reported as `warn` events and counted in the returned
//! [`core::OverlaySummary`].

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
