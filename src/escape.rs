//! Escaping rules shared by the decoder and the encoder.
//!
//! Keys escape a literal `=` by doubling it. Values are either bare text or
//! wrapped in `"` / `'`, in which case the wrapping quote is escaped by
//! doubling it. The encoder only quotes when the value would otherwise be
//! misread, and prefers the quote character that does not occur in the value.

use crate::{Error, Result};

/// The two quote characters a value may be wrapped in.
pub const QUOTES: [char; 2] = ['"', '\''];

#[inline]
pub(crate) fn is_quote(ch: char) -> bool {
    QUOTES.contains(&ch)
}

/// Turns a raw key slice into its decoded form.
///
/// # Errors
///
/// Returns [`Error::EmptyKey`] if nothing is left after trimming.
pub fn decode_key(raw: &str) -> Result<String> {
    let key = raw.trim();
    if key.is_empty() {
        return Err(Error::EmptyKey);
    }
    Ok(key.replace("==", "="))
}

/// Escapes a key for output. Inverse of [`decode_key`] for trimmed keys.
///
/// # Errors
///
/// Returns [`Error::EmptyKey`] if nothing is left after trimming.
pub fn encode_key(key: &str) -> Result<String> {
    let key = key.trim();
    if key.is_empty() {
        return Err(Error::EmptyKey);
    }
    Ok(key.replace('=', "=="))
}

/// Turns a raw value slice into its decoded form.
///
/// Quoted values lose their wrapping quotes and have doubled quotes collapsed.
/// The caller guarantees a quoted slice is closed by the same quote it opens
/// with; the decoder's scan enforces that before calling this.
pub fn decode_value(raw: &str) -> String {
    let raw = raw.trim();
    match raw.chars().next() {
        Some(quote) if is_quote(quote) && raw.len() >= 2 && raw.ends_with(quote) => {
            let quote = &raw[..1];
            raw[1..raw.len() - 1].replace(&quote.repeat(2), quote)
        }
        _ => raw.to_string(),
    }
}

/// Returns `true` if the value cannot be written bare.
///
/// A leading `=` would merge with the key's `=` into an escaped `==`.
#[inline]
pub fn needs_quotes(value: &str) -> bool {
    value.starts_with('=')
        || value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace)
        || value.contains(';')
        || value.starts_with(is_quote)
}

/// Writes a value in canonical form using the minimal-quoting policy.
pub fn encode_value(value: &str) -> String {
    if value.is_empty() || !needs_quotes(value) {
        return value.to_string();
    }

    let has_double = value.contains('"');
    let has_single = value.contains('\'');

    match (has_double, has_single) {
        (false, _) => format!("\"{}\"", value),
        (true, false) => format!("'{}'", value),
        (true, true) => format!("\"{}\"", value.replace('"', "\"\"")),
    }
}
