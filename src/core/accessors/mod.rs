//! Typed accessors
//!
//! Every accessor takes a key and a default. An absent key yields the default;
//! a present value that does not parse is an [`InvalidValue`] error rather than
//! a silent fallback. Booleans and patterns are the exceptions and fall back to
//! the default.
//!
//! [`InvalidValue`]: crate::domain::StrataError::InvalidValue

pub mod enums;
pub mod net;
pub mod numeric;
pub mod password;
pub mod pattern;
pub mod ranges;
pub mod strings;
pub mod time;
pub mod types;

pub use enums::ConfigEnum;
pub use net::HostPort;
pub use ranges::IntegerRanges;
pub use time::TimeUnit;
pub use types::{TypeRef, TypeRegistry, TypeResolver};
