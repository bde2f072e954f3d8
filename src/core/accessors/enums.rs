//! Enumerated values stored by variant name

use crate::core::store::PropertyStore;
use crate::domain::{Result, StrataError};

/// An enum that can be stored in a property by variant name
///
/// ```rust
/// use strata::core::accessors::ConfigEnum;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// enum Mode { Fast, Safe }
///
/// impl ConfigEnum for Mode {
///     const VARIANTS: &'static [Self] = &[Mode::Fast, Mode::Safe];
///
///     fn name(&self) -> &'static str {
///         match self {
///             Mode::Fast => "FAST",
///             Mode::Safe => "SAFE",
///         }
///     }
/// }
/// ```
pub trait ConfigEnum: Sized + Copy + 'static {
    /// Every variant, in declaration order
    const VARIANTS: &'static [Self];

    /// Stored name of the variant
    fn name(&self) -> &'static str;

    /// Variant whose name is exactly `name`
    fn from_name(name: &str) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|v| v.name() == name)
    }
}

impl PropertyStore {
    /// Variant named by the trimmed value; matching is case-sensitive
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::InvalidValue`] if no variant has that name
    pub fn get_enum<E: ConfigEnum>(&self, name: &str, default: E) -> Result<E> {
        let Some(text) = self.get_trimmed(name)? else {
            return Ok(default);
        };
        E::from_name(&text).ok_or_else(|| StrataError::invalid_value(name, &text, "enum constant"))
    }

    /// # Errors
    ///
    /// Returns [`StrataError::InvalidArgument`] for a blank name
    pub fn set_enum<E: ConfigEnum>(&self, name: &str, value: E) -> Result<()> {
        self.set(name, value.name())
    }
}
