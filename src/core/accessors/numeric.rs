//! Integer, float, boolean and byte-size accessors

use crate::core::store::PropertyStore;
use crate::domain::{Result, StrataError};

/// Splits an optional `0x` / `-0x` prefix off `text`
fn hex_digits(text: &str) -> Option<(bool, &str)> {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    rest.strip_prefix("0x")
        .or_else(|| rest.strip_prefix("0X"))
        .map(|digits| (negative, digits))
}

pub(crate) fn parse_long(text: &str) -> Option<i64> {
    match hex_digits(text) {
        Some((negative, digits)) => {
            let signed = if negative {
                format!("-{digits}")
            } else {
                digits.to_string()
            };
            i64::from_str_radix(&signed, 16).ok()
        }
        None => text.parse().ok(),
    }
}

/// Parses `12`, `0x1F`, `4k`, `1g` style byte sizes
pub(crate) fn parse_bytes(text: &str) -> Option<i64> {
    if let Some(value) = parse_long(text) {
        return Some(value);
    }
    let last = text.chars().last()?;
    let exponent = match last.to_ascii_lowercase() {
        'k' => 1,
        'm' => 2,
        'g' => 3,
        't' => 4,
        'p' => 5,
        'e' => 6,
        _ => return None,
    };
    let number: i64 = text[..text.len() - last.len_utf8()].trim_end().parse().ok()?;
    number.checked_mul(1i64 << (10 * exponent))
}

impl PropertyStore {
    /// Resolved, trimmed text of `name`; `None` when absent
    fn typed_text(&self, name: &str) -> Result<Option<String>> {
        self.get_trimmed(name)
    }

    /// 32-bit integer value, decimal or `0x` hex
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::InvalidValue`] if the value is not an `i32`
    pub fn get_int(&self, name: &str, default: i32) -> Result<i32> {
        let Some(text) = self.typed_text(name)? else {
            return Ok(default);
        };
        parse_long(&text)
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| StrataError::invalid_value(name, &text, "32-bit integer"))
    }

    /// 64-bit integer value, decimal or `0x` hex
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::InvalidValue`] if the value is not an `i64`
    pub fn get_long(&self, name: &str, default: i64) -> Result<i64> {
        let Some(text) = self.typed_text(name)? else {
            return Ok(default);
        };
        parse_long(&text).ok_or_else(|| StrataError::invalid_value(name, &text, "64-bit integer"))
    }

    /// Byte size with an optional binary prefix (`k`, `m`, `g`, `t`, `p`, `e`)
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::InvalidValue`] on malformed input or overflow
    pub fn get_long_bytes(&self, name: &str, default: i64) -> Result<i64> {
        let Some(text) = self.typed_text(name)? else {
            return Ok(default);
        };
        parse_bytes(&text).ok_or_else(|| StrataError::invalid_value(name, &text, "byte size"))
    }

    /// `true` / `false` in any case; anything else yields `default`
    ///
    /// # Errors
    ///
    /// Only substitution errors are returned
    pub fn get_boolean(&self, name: &str, default: bool) -> Result<bool> {
        let value = self.typed_text(name)?;
        Ok(match value.as_deref() {
            Some(v) if v.eq_ignore_ascii_case("true") => true,
            Some(v) if v.eq_ignore_ascii_case("false") => false,
            _ => default,
        })
    }

    /// # Errors
    ///
    /// Returns [`StrataError::InvalidValue`] if the value is not a number
    pub fn get_float(&self, name: &str, default: f32) -> Result<f32> {
        let Some(text) = self.typed_text(name)? else {
            return Ok(default);
        };
        text.parse()
            .map_err(|_| StrataError::invalid_value(name, &text, "float"))
    }

    /// # Errors
    ///
    /// Returns [`StrataError::InvalidValue`] if the value is not a number
    pub fn get_double(&self, name: &str, default: f64) -> Result<f64> {
        let Some(text) = self.typed_text(name)? else {
            return Ok(default);
        };
        text.parse()
            .map_err(|_| StrataError::invalid_value(name, &text, "double"))
    }

    /// # Errors
    ///
    /// Returns [`StrataError::InvalidArgument`] for a blank name
    pub fn set_int(&self, name: &str, value: i32) -> Result<()> {
        self.set(name, value.to_string())
    }

    /// # Errors
    ///
    /// Returns [`StrataError::InvalidArgument`] for a blank name
    pub fn set_long(&self, name: &str, value: i64) -> Result<()> {
        self.set(name, value.to_string())
    }

    /// # Errors
    ///
    /// Returns [`StrataError::InvalidArgument`] for a blank name
    pub fn set_boolean(&self, name: &str, value: bool) -> Result<()> {
        self.set(name, value.to_string())
    }

    /// # Errors
    ///
    /// Returns [`StrataError::InvalidArgument`] for a blank name
    pub fn set_float(&self, name: &str, value: f32) -> Result<()> {
        self.set(name, value.to_string())
    }

    /// # Errors
    ///
    /// Returns [`StrataError::InvalidArgument`] for a blank name
    pub fn set_double(&self, name: &str, value: f64) -> Result<()> {
        self.set(name, value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("42", Some(42); "decimal")]
    #[test_case("-7", Some(-7); "negative")]
    #[test_case("0x1F", Some(31); "hex")]
    #[test_case("0X1f", Some(31); "upper prefix")]
    #[test_case("-0x10", Some(-16); "negative hex")]
    #[test_case("12abc", None; "suffix")]
    #[test_case("0x", None; "empty hex")]
    fn test_parse_long(input: &str, expected: Option<i64>) {
        assert_eq!(parse_long(input), expected);
    }

    #[test_case("1024", Some(1024); "plain")]
    #[test_case("4k", Some(4096); "kilo")]
    #[test_case("1M", Some(1 << 20); "mega upper")]
    #[test_case("2g", Some(2 << 30); "giga")]
    #[test_case("-1t", Some(-(1i64 << 40)); "negative")]
    #[test_case("0xe", Some(14); "hex ending in e")]
    #[test_case("1MBCDE", None; "garbage before prefix")]
    #[test_case("8e", None; "overflow")]
    #[test_case("k", None; "prefix only")]
    fn test_parse_bytes(input: &str, expected: Option<i64>) {
        assert_eq!(parse_bytes(input), expected);
    }

    #[test]
    fn test_int_range_checked() {
        let store = PropertyStore::empty();
        store.set("big", "3000000000").unwrap();
        assert!(store.get_int("big", 0).is_err());
        assert_eq!(store.get_long("big", 0).unwrap(), 3_000_000_000);
    }

    #[test]
    fn test_boolean_falls_back() {
        let store = PropertyStore::empty();
        store.set("a", " TRUE ").unwrap();
        store.set("b", "yes").unwrap();
        assert!(store.get_boolean("a", false).unwrap());
        assert!(store.get_boolean("b", true).unwrap());
        assert!(!store.get_boolean("b", false).unwrap());
        assert!(store.get_boolean("missing", true).unwrap());
    }

    #[test]
    fn test_setters_round_trip() {
        let store = PropertyStore::empty();
        store.set_int("i", -5).unwrap();
        store.set_long("l", 1 << 40).unwrap();
        store.set_double("d", 0.25).unwrap();
        store.set_boolean("b", true).unwrap();
        assert_eq!(store.get_int("i", 0).unwrap(), -5);
        assert_eq!(store.get_long("l", 0).unwrap(), 1 << 40);
        assert_eq!(store.get_double("d", 0.0).unwrap(), 0.25);
        assert_eq!(store.get_raw("b").as_deref(), Some("true"));
    }
}
