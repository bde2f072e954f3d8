//! Time durations with unit suffixes
//!
//! Values look like `10s`, `250ms` or `3d`. A bare integer is taken to be in
//! the unit the caller asks for. Conversions truncate toward zero and saturate
//! at the `i64` bounds.

use crate::core::store::PropertyStore;
use crate::domain::{Result, StrataError};
use std::fmt;
use std::time::Duration;

/// Unit of a time duration value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    const ALL: [TimeUnit; 7] = [
        TimeUnit::Nanoseconds,
        TimeUnit::Microseconds,
        TimeUnit::Milliseconds,
        TimeUnit::Seconds,
        TimeUnit::Minutes,
        TimeUnit::Hours,
        TimeUnit::Days,
    ];

    /// Suffix written after the number
    pub fn suffix(self) -> &'static str {
        match self {
            TimeUnit::Nanoseconds => "ns",
            TimeUnit::Microseconds => "us",
            TimeUnit::Milliseconds => "ms",
            TimeUnit::Seconds => "s",
            TimeUnit::Minutes => "m",
            TimeUnit::Hours => "h",
            TimeUnit::Days => "d",
        }
    }

    /// Unit for a (case-insensitive) suffix
    pub fn from_suffix(suffix: &str) -> Option<TimeUnit> {
        Self::ALL
            .into_iter()
            .find(|u| u.suffix().eq_ignore_ascii_case(suffix))
    }

    fn nanos(self) -> i128 {
        match self {
            TimeUnit::Nanoseconds => 1,
            TimeUnit::Microseconds => 1_000,
            TimeUnit::Milliseconds => 1_000_000,
            TimeUnit::Seconds => 1_000_000_000,
            TimeUnit::Minutes => 60 * 1_000_000_000,
            TimeUnit::Hours => 3_600 * 1_000_000_000,
            TimeUnit::Days => 86_400 * 1_000_000_000,
        }
    }

    /// Converts `value` in `from` units into `self` units
    pub fn convert(self, value: i64, from: TimeUnit) -> i64 {
        let converted = i128::from(value) * from.nanos() / self.nanos();
        converted.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Splits `12ms` into `(12, Some(Milliseconds))`
fn parse_duration(text: &str) -> Option<(i64, Option<TimeUnit>)> {
    let split = text
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || (*i == 0 && (*c == '-' || *c == '+'))))
        .map_or(text.len(), |(i, _)| i);
    let (number, suffix) = text.split_at(split);
    let value = number.parse().ok()?;
    let suffix = suffix.trim();
    if suffix.is_empty() {
        return Some((value, None));
    }
    TimeUnit::from_suffix(suffix).map(|unit| (value, Some(unit)))
}

impl PropertyStore {
    /// Duration of `name` expressed in `unit`
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::InvalidValue`] for malformed values
    pub fn get_time_duration(&self, name: &str, default: i64, unit: TimeUnit) -> Result<i64> {
        let Some(text) = self.get_trimmed(name)? else {
            return Ok(default);
        };
        let (value, from) = parse_duration(&text)
            .ok_or_else(|| StrataError::invalid_value(name, &text, "time duration"))?;
        Ok(unit.convert(value, from.unwrap_or(unit)))
    }

    /// Non-negative duration of `name`; bare integers are milliseconds
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::InvalidValue`] for malformed or negative values
    pub fn get_duration(&self, name: &str, default: Duration) -> Result<Duration> {
        let Some(text) = self.get_trimmed(name)? else {
            return Ok(default);
        };
        let invalid = || StrataError::invalid_value(name, &text, "non-negative duration");
        let (value, from) = parse_duration(&text).ok_or_else(invalid)?;
        let nanos =
            TimeUnit::Nanoseconds.convert(value, from.unwrap_or(TimeUnit::Milliseconds));
        u64::try_from(nanos)
            .map(Duration::from_nanos)
            .map_err(|_| invalid())
    }

    /// Stores `value` with the suffix of `unit`, e.g. `7s`
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::InvalidArgument`] for a blank name
    pub fn set_time_duration(&self, name: &str, value: i64, unit: TimeUnit) -> Result<()> {
        self.set(name, format!("{value}{unit}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("10s", TimeUnit::Milliseconds, 10_000; "seconds to millis")]
    #[test_case("1500ms", TimeUnit::Seconds, 1; "truncates")]
    #[test_case("2d", TimeUnit::Hours, 48; "days")]
    #[test_case("3m", TimeUnit::Seconds, 180; "minutes")]
    #[test_case("7", TimeUnit::Minutes, 7; "bare uses requested unit")]
    #[test_case("5 us", TimeUnit::Nanoseconds, 5_000; "space before suffix")]
    #[test_case("1H", TimeUnit::Minutes, 60; "case insensitive")]
    #[test_case("-2s", TimeUnit::Milliseconds, -2_000; "negative")]
    fn test_get_time_duration(value: &str, unit: TimeUnit, expected: i64) {
        let store = PropertyStore::empty();
        store.set("t", value).unwrap();
        assert_eq!(store.get_time_duration("t", 0, unit).unwrap(), expected);
    }

    #[test]
    fn test_saturates() {
        let store = PropertyStore::empty();
        store.set("t", format!("{}d", i64::MAX)).unwrap();
        assert_eq!(
            store.get_time_duration("t", 0, TimeUnit::Nanoseconds).unwrap(),
            i64::MAX
        );
    }

    #[test]
    fn test_bad_suffix_is_error() {
        let store = PropertyStore::empty();
        store.set("t", "10 fortnights").unwrap();
        assert!(store.get_time_duration("t", 0, TimeUnit::Seconds).is_err());
        assert_eq!(store.get_time_duration("missing", 9, TimeUnit::Seconds).unwrap(), 9);
    }

    #[test]
    fn test_set_and_get_duration() {
        let store = PropertyStore::empty();
        store.set_time_duration("t", 7, TimeUnit::Seconds).unwrap();
        assert_eq!(store.get_raw("t").as_deref(), Some("7s"));
        assert_eq!(
            store.get_duration("t", Duration::ZERO).unwrap(),
            Duration::from_secs(7)
        );

        store.set("bare", "250").unwrap();
        assert_eq!(
            store.get_duration("bare", Duration::ZERO).unwrap(),
            Duration::from_millis(250)
        );
        store.set("neg", "-1s").unwrap();
        assert!(store.get_duration("neg", Duration::ZERO).is_err());
    }
}
