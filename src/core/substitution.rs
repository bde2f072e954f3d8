//! `${name}` variable expansion
//!
//! [`resolve`] is a pure function over a lookup closure, so it can be tested
//! and reused without a store. Referenced values are themselves expanded
//! before they are spliced in, up to a fixed nesting depth.
//!
//! # Example
//!
//! ```rust
//! use strata::core::substitution::resolve;
//!
//! let lookup = |name: &str| match name {
//!     "host" => Some("db.internal".to_string()),
//!     "url" => Some("jdbc://${host}:5432".to_string()),
//!     _ => None,
//! };
//!
//! assert_eq!(resolve("${url}/app", &lookup, 20).unwrap(), "jdbc://db.internal:5432/app");
//! assert_eq!(resolve("${missing}", &lookup, 20).unwrap(), "${missing}");
//! ```

use std::fmt;

const OPEN: &str = "${";

/// Expansion did not terminate within the depth bound
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionError {
    /// Depth at which expansion was abandoned
    pub depth: usize,
    /// Text that was being expanded at that depth
    pub expression: String,
}

impl fmt::Display for SubstitutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Variable substitution depth too large: {} {}",
            self.depth, self.expression
        )
    }
}

impl std::error::Error for SubstitutionError {}

/// Expands every well-formed `${identifier}` in `raw`
///
/// Unknown identifiers and malformed tokens are copied verbatim.
///
/// # Errors
///
/// Returns [`SubstitutionError`] when references nest deeper than `max_depth`
pub fn resolve<F>(raw: &str, lookup: &F, max_depth: usize) -> Result<String, SubstitutionError>
where
    F: Fn(&str) -> Option<String> + ?Sized,
{
    expand(raw, lookup, 0, max_depth)
}

/// Whether `raw` contains anything that looks like a reference
pub fn has_references(raw: &str) -> bool {
    raw.contains(OPEN)
}

fn expand<F>(raw: &str, lookup: &F, depth: usize, max_depth: usize) -> Result<String, SubstitutionError>
where
    F: Fn(&str) -> Option<String> + ?Sized,
{
    if !has_references(raw) {
        return Ok(raw.to_string());
    }
    if depth >= max_depth {
        return Err(SubstitutionError {
            depth,
            expression: raw.to_string(),
        });
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after = &rest[start + OPEN.len()..];

        let Some(end) = after.find('}') else {
            // Unterminated token: the remainder is literal.
            out.push_str(&rest[start..]);
            return Ok(out);
        };

        let ident = &after[..end];
        if !is_identifier(ident) {
            out.push_str(OPEN);
            rest = after;
            continue;
        }

        match lookup(ident) {
            Some(value) => out.push_str(&expand(&value, lookup, depth + 1, max_depth)?),
            None => out.push_str(&rest[start..start + OPEN.len() + end + 1]),
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

fn is_identifier(ident: &str) -> bool {
    !ident.is_empty()
        && !ident
            .chars()
            .any(|c| c == '$' || c == '{' || c == '}' || c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use test_case::test_case;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test_case("plain text", "plain text" ; "no tokens")]
    #[test_case("${a}", "A" ; "single")]
    #[test_case("x${a}y${b}z", "xAyBz" ; "multiple")]
    #[test_case("${nested}", "A-B" ; "recursive")]
    #[test_case("${unknown}", "${unknown}" ; "unresolved kept")]
    #[test_case("${", "${" ; "bare open")]
    #[test_case("${}", "${}" ; "empty identifier")]
    #[test_case("{a}", "{a}" ; "missing dollar")]
    #[test_case("$a}", "$a}" ; "missing brace")]
    #[test_case("${a", "${a" ; "unterminated")]
    #[test_case("${a b}", "${a b}" ; "whitespace identifier")]
    #[test_case("$${a}", "$A" ; "dollar before token")]
    #[test_case("${a}${", "A${" ; "trailing open")]
    fn test_resolve(raw: &str, expected: &str) {
        let lookup = lookup_from(&[("a", "A"), ("b", "B"), ("nested", "${a}-${b}")]);
        assert_eq!(resolve(raw, &lookup, 20).unwrap(), expected);
    }

    #[test]
    fn test_self_reference_hits_depth() {
        let lookup = lookup_from(&[("loop", "${loop}")]);
        let err = resolve("${loop}", &lookup, 20).unwrap_err();
        assert_eq!(err.depth, 20);
        assert!(err.to_string().contains("substitution depth"));
    }

    #[test]
    fn test_three_cycle_hits_depth() {
        let lookup = lookup_from(&[("a", "${b}"), ("b", "${c}"), ("c", "x${a}")]);
        assert!(resolve("${a}", &lookup, 20).is_err());
    }

    #[test]
    fn test_chain_within_bound() {
        let pairs: Vec<(String, String)> = (0..19)
            .map(|i| (format!("k{i}"), format!("${{k{}}}", i + 1)))
            .chain(std::iter::once(("k19".to_string(), "end".to_string())))
            .collect();
        let map: HashMap<_, _> = pairs.into_iter().collect();
        let lookup = |name: &str| map.get(name).cloned();

        assert_eq!(resolve("${k0}", &lookup, 20).unwrap(), "end");
        assert!(resolve("${k0}", &lookup, 19).is_err());
    }

    #[test]
    fn test_idempotent_without_tokens() {
        let lookup = lookup_from(&[]);
        let once = resolve("a $ b { c }", &lookup, 20).unwrap();
        assert_eq!(resolve(&once, &lookup, 20).unwrap(), once);
    }
}
