//! Character encoding detection for property documents
//!
//! A byte-order mark wins, then the `encoding` pseudo-attribute of the XML
//! declaration; otherwise the document is UTF-8 regardless of host locale.

use crate::domain::{Result, StrataError};
use encoding_rs::{Encoding, UTF_8};

/// Decodes document bytes to text
///
/// # Errors
///
/// Returns [`StrataError::Parse`] for unknown encodings or malformed input
pub fn decode(bytes: &[u8], resource: &str) -> Result<String> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => {
            let encoding = match declared_encoding(bytes) {
                Some(label) => Encoding::for_label(label.as_bytes()).ok_or_else(|| {
                    StrataError::parse(resource, format!("unsupported encoding '{label}'"))
                })?,
                None => UTF_8,
            };
            (encoding, bytes)
        }
    };

    let (text, had_errors) = encoding.decode_without_bom_handling(body);
    if had_errors {
        return Err(StrataError::parse(
            resource,
            format!("malformed {} content", encoding.name()),
        ));
    }
    Ok(text.into_owned())
}

/// Reads the `encoding` label from an ASCII-compatible XML declaration
fn declared_encoding(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(1024)];
    let end = head.windows(2).position(|w| w == b"?>")?;
    let decl = std::str::from_utf8(&head[..end]).ok()?;
    let decl = decl.trim_start().strip_prefix("<?xml")?;

    let after = &decl[decl.find("encoding")? + "encoding".len()..];
    let after = after.trim_start().strip_prefix('=')?.trim_start();
    let quote = after.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let rest = &after[1..];
    let close = rest.find(quote)?;
    Some(rest[..close].trim().to_string())
}
