//! Integer range lists such as `2,10-20,30-`

use crate::core::store::PropertyStore;
use crate::domain::{Result, StrataError};
use std::fmt;
use std::str::FromStr;

/// A set of non-negative integers written as comma-separated spans
///
/// `n` is a single value, `lo-hi` an inclusive span, `-hi` starts at 0 and
/// `lo-` runs to `u32::MAX`. Spans are kept sorted and merged, so iteration is
/// ascending without repeats.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegerRanges {
    spans: Vec<(u32, u32)>,
}

impl IntegerRanges {
    /// Whether `value` falls inside any span
    pub fn is_included(&self, value: u32) -> bool {
        self.spans
            .iter()
            .any(|&(start, end)| start <= value && value <= end)
    }

    /// Whether no values are included
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Inclusive spans in ascending order
    pub fn spans(&self) -> &[(u32, u32)] {
        &self.spans
    }

    /// Every included value, ascending
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.spans.iter().flat_map(|&(start, end)| start..=end)
    }

    fn parse_span(text: &str) -> Option<(u32, u32)> {
        let bound = |s: &str, fallback: u32| -> Option<u32> {
            let s = s.trim();
            if s.is_empty() {
                Some(fallback)
            } else {
                s.parse().ok()
            }
        };
        match text.split_once('-') {
            Some((lo, hi)) => {
                let start = bound(lo, 0)?;
                let end = bound(hi, u32::MAX)?;
                (start <= end).then_some((start, end))
            }
            None => {
                let value = text.trim().parse().ok()?;
                Some((value, value))
            }
        }
    }
}

impl FromStr for IntegerRanges {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut spans = Vec::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let span = Self::parse_span(part).ok_or_else(|| format!("integer range {part}"))?;
            spans.push(span);
        }
        spans.sort_unstable();

        let mut merged: Vec<(u32, u32)> = Vec::with_capacity(spans.len());
        for (start, end) in spans {
            match merged.last_mut() {
                Some(last) if start <= last.1.saturating_add(1) => last.1 = last.1.max(end),
                _ => merged.push((start, end)),
            }
        }
        Ok(Self { spans: merged })
    }
}

impl fmt::Display for IntegerRanges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .spans
            .iter()
            .map(|(start, end)| format!("{start}-{end}"))
            .collect();
        f.write_str(&parts.join(","))
    }
}

impl PropertyStore {
    /// Ranges stored under `name`, or parsed from `default` when absent
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::InvalidValue`] if either text is malformed
    pub fn get_range(&self, name: &str, default: &str) -> Result<IntegerRanges> {
        let text = self.get_or(name, default)?;
        text.parse()
            .map_err(|_: String| StrataError::invalid_value(name, &text, "integer range list"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spans_and_membership() {
        let ranges: IntegerRanges = "2-3,5,7-".parse().unwrap();
        assert!(ranges.is_included(2));
        assert!(ranges.is_included(5));
        assert!(!ranges.is_included(4));
        assert!(ranges.is_included(1_000_000));
        assert_eq!(ranges.to_string(), format!("2-3,5-5,7-{}", u32::MAX));
    }

    #[test]
    fn test_leading_dash_starts_at_zero() {
        let ranges: IntegerRanges = "-3".parse().unwrap();
        assert_eq!(ranges.iter().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_iteration_is_ascending_and_merged() {
        let ranges: IntegerRanges = "8-9, 1-2, 2-4".parse().unwrap();
        assert_eq!(ranges.iter().collect::<Vec<_>>(), vec![1, 2, 3, 4, 8, 9]);
        assert_eq!(ranges.spans(), &[(1, 4), (8, 9)]);
    }

    #[test]
    fn test_display_round_trips() {
        let ranges: IntegerRanges = "1,3-5".parse().unwrap();
        let reparsed: IntegerRanges = ranges.to_string().parse().unwrap();
        assert_eq!(ranges, reparsed);
    }

    #[test]
    fn test_store_range() {
        let store = PropertyStore::empty();
        assert!(store.get_range("r", "").unwrap().is_empty());
        store.set("r", "10-x").unwrap();
        assert!(store.get_range("r", "1").is_err());
        store.set("r", "5-2").unwrap();
        assert!(store.get_range("r", "1").is_err());
    }
}
