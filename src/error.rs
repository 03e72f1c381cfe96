//! Error types for connection string decoding and encoding.
//!
//! Every failure is a deterministic rejection of the input: retrying the same
//! call with the same text always fails the same way, and no partial result
//! is ever returned.
//!
//! ## Error Categories
//!
//! - **Missing delimiters**: an `=`, `;` or closing quote was not where the
//!   grammar requires one
//! - **Truncated input**: the text ended where a value was expected
//! - **Empty keys**: rejected both when decoding and when encoding
//! - **Serde bridge errors**: unsupported (non-text) types and custom messages
//!
//! Positions are byte offsets into the decoded input. Messages never echo the
//! input itself, since connection strings routinely carry passwords.
//!
//! ## Examples
//!
//! ```rust
//! use serde_constring::{decode, Error};
//!
//! let err = decode("key=\"value;").unwrap_err();
//! assert!(matches!(err, Error::UnterminatedQuote { quote: '"', .. }));
//! assert_eq!(err.position(), Some(4));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised while decoding or encoding a
/// connection string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An expected `=`, `;` or closing quote was not found
    #[error("missing delimiter '{delimiter}' at byte {position}")]
    MissingDelimiter { delimiter: char, position: usize },

    /// Input ended where a value was expected
    #[error("unexpected end of input at byte {position}: expected a value")]
    UnexpectedEnd { position: usize },

    /// A value opened with a quote that is never closed
    #[error("unterminated {quote} quote opened at byte {position}")]
    UnterminatedQuote { quote: char, position: usize },

    /// A key is empty after trimming and unescaping
    #[error("key cannot be empty")]
    EmptyKey,

    /// A serde type with no text representation
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// Custom error
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Creates a missing delimiter error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_constring::Error;
    ///
    /// let err = Error::missing_delimiter('=', 7);
    /// assert_eq!(err.to_string(), "missing delimiter '=' at byte 7");
    /// ```
    pub fn missing_delimiter(delimiter: char, position: usize) -> Self {
        Error::MissingDelimiter {
            delimiter,
            position,
        }
    }

    /// Creates an unexpected end-of-input error.
    pub fn unexpected_end(position: usize) -> Self {
        Error::UnexpectedEnd { position }
    }

    /// Creates an unterminated quote error. `position` is the offset of the
    /// opening quote.
    pub fn unterminated_quote(quote: char, position: usize) -> Self {
        Error::UnterminatedQuote { quote, position }
    }

    /// Creates an unsupported type error for values that are not text.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_constring::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Returns the byte offset the error refers to, if it has one.
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        match self {
            Error::MissingDelimiter { position, .. }
            | Error::UnexpectedEnd { position }
            | Error::UnterminatedQuote { position, .. } => Some(*position),
            _ => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
