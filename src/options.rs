//! Key policy for [`ConnectionString`](crate::ConnectionString) stores.
//!
//! The codec treats keys as opaque text. A store applies two caller-supplied
//! policies on top of it:
//!
//! - [`KeyFormat`]: how keys are normalized before storage and lookup
//! - priority keys: keys that keep their first value when a string repeats them
//!
//! ## Examples
//!
//! ```rust
//! use serde_constring::{ConnectionOptions, ConnectionString, KeyFormat};
//!
//! let options = ConnectionOptions::new()
//!     .with_key_format(KeyFormat::Upper)
//!     .with_priority_key("server");
//!
//! let cs = ConnectionString::parse_with_options("server=a;Server=b;", options).unwrap();
//! assert_eq!(cs.get("Server"), Some("a"));
//! assert_eq!(cs.to_string(), "SERVER=a;");
//! ```

use std::fmt;
use std::sync::Arc;

/// Normalization applied to every key a store sees.
///
/// # Examples
///
/// ```rust
/// use serde_constring::KeyFormat;
///
/// assert_eq!(KeyFormat::Title.apply("cool key"), "Cool Key");
/// assert_eq!(KeyFormat::Upper.apply("key"), "KEY");
/// assert_eq!(KeyFormat::Preserve.apply("kEy"), "kEy");
/// ```
#[derive(Clone, Default)]
pub enum KeyFormat {
    /// Keep keys exactly as given.
    Preserve,
    /// Uppercase the first letter of every word, lowercase the rest.
    #[default]
    Title,
    Upper,
    Lower,
    /// Caller-provided normalization. See [`KeyFormat::custom`].
    Custom(Arc<dyn Fn(&str) -> String + Send + Sync>),
}

impl KeyFormat {
    /// Wraps a formatter function or closure.
    ///
    /// ```rust
    /// use serde_constring::KeyFormat;
    ///
    /// let prefix = String::from("db.");
    /// let format = KeyFormat::custom(move |key| format!("{}{}", prefix, key));
    /// assert_eq!(format.apply("host"), "db.host");
    /// ```
    pub fn custom<F>(format: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        KeyFormat::Custom(Arc::new(format))
    }

    /// Formats `key` according to this policy.
    #[must_use]
    pub fn apply(&self, key: &str) -> String {
        match self {
            KeyFormat::Preserve => key.to_string(),
            KeyFormat::Title => title_case(key),
            KeyFormat::Upper => key.to_uppercase(),
            KeyFormat::Lower => key.to_lowercase(),
            KeyFormat::Custom(format) => format(key),
        }
    }
}

impl fmt::Debug for KeyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyFormat::Preserve => f.write_str("Preserve"),
            KeyFormat::Title => f.write_str("Title"),
            KeyFormat::Upper => f.write_str("Upper"),
            KeyFormat::Lower => f.write_str("Lower"),
            KeyFormat::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A word starts after any non-alphabetic character.
fn title_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut in_word = false;
    for ch in key.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

/// Configuration for a [`ConnectionString`](crate::ConnectionString) store.
///
/// # Examples
///
/// ```rust
/// use serde_constring::{ConnectionOptions, KeyFormat};
///
/// // Title-cased keys, `Provider` protected
/// let options = ConnectionOptions::new();
/// assert!(options.is_priority_key("Provider"));
///
/// // Keys kept as-is, nothing protected
/// let options = ConnectionOptions::new()
///     .with_key_format(KeyFormat::Preserve)
///     .without_priority_keys();
/// assert!(!options.is_priority_key("Provider"));
/// ```
#[derive(Clone, Debug)]
pub struct ConnectionOptions {
    pub key_format: KeyFormat,
    pub priority_keys: Vec<String>,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        ConnectionOptions {
            key_format: KeyFormat::default(),
            priority_keys: vec!["Provider".to_string()],
        }
    }
}

impl ConnectionOptions {
    /// Creates default options (title-cased keys, `Provider` as priority key).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the key normalization.
    #[must_use]
    pub fn with_key_format(mut self, key_format: KeyFormat) -> Self {
        self.key_format = key_format;
        self
    }

    /// Adds a key that is not overridden when a parsed string repeats it.
    #[must_use]
    pub fn with_priority_key(mut self, key: impl Into<String>) -> Self {
        self.priority_keys.push(key.into());
        self
    }

    /// Clears the priority keys, so later occurrences always win.
    #[must_use]
    pub fn without_priority_keys(mut self) -> Self {
        self.priority_keys.clear();
        self
    }

    /// Trims and formats a key. The formatted key is trimmed again, so a
    /// custom formatter cannot introduce surrounding whitespace.
    #[must_use]
    pub fn format_key(&self, key: &str) -> String {
        self.key_format.apply(key.trim()).trim().to_string()
    }

    /// Returns `true` if the already-formatted `key` is a priority key.
    /// Priority keys are compared after formatting them the same way.
    #[must_use]
    pub fn is_priority_key(&self, key: &str) -> bool {
        self.priority_keys
            .iter()
            .any(|priority| self.format_key(priority) == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case_words() {
        assert_eq!(title_case("cool key  "), "Cool Key  ");
        assert_eq!(title_case("kEY"), "Key");
        assert_eq!(title_case("user_id"), "User_Id");
        assert_eq!(title_case("key=2"), "Key=2");
        assert_eq!(title_case("éCOLE"), "École");
    }

    #[test]
    fn test_custom_format() {
        fn reversed(key: &str) -> String {
            key.chars().rev().collect()
        }
        let format = KeyFormat::custom(reversed);
        assert_eq!(format.apply("abc"), "cba");
        assert_eq!(format!("{:?}", format), "Custom(..)");
    }

    #[test]
    fn test_custom_format_captures() {
        let suffix = "_key".to_string();
        let options = ConnectionOptions::new()
            .with_key_format(KeyFormat::custom(move |key| format!("{}{}", key, suffix)));
        let cloned = options.clone();
        assert_eq!(cloned.format_key(" user "), "user_key");
    }

    #[test]
    fn test_format_key_trims_custom_output() {
        let options = ConnectionOptions::new()
            .with_key_format(KeyFormat::custom(|key| format!("  {}\u{a0}", key)));
        assert_eq!(options.format_key("user"), "user");

        let blank = ConnectionOptions::new().with_key_format(KeyFormat::custom(|_| " ".to_string()));
        assert_eq!(blank.format_key("user"), "");
    }

    #[test]
    fn test_priority_keys_follow_format() {
        let options = ConnectionOptions::new().with_key_format(KeyFormat::Lower);
        assert!(options.is_priority_key("provider"));
        assert!(!options.is_priority_key("Provider"));

        let options = options.with_priority_key("  Data Source ");
        assert!(options.is_priority_key("data source"));
    }

    #[test]
    fn test_format_key_trims() {
        let options = ConnectionOptions::new();
        assert_eq!(options.format_key("  user id "), "User Id");
    }
}
