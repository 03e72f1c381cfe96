//! # serde_constring
//!
//! A parser and serializer for connection strings: the semicolon-delimited
//! `key=value` text used by database drivers.
//!
//! ```text
//! Provider=SQLOLEDB;Data Source=db1;User Id=sa;Password="p;ss";
//! ```
//!
//! ## Key Features
//!
//! - **Exact grammar**: quoted values, doubled-quote escapes, `==` in keys
//! - **Canonical output**: values are only quoted when they have to be
//! - **Ordered store**: [`ConnectionString`] keeps parameters in insertion
//!   order with pluggable key formatting and priority keys
//! - **Serde Compatible**: read and write flat structs of text fields
//! - **No Unsafe Code**
//!
//! ## Quick Start
//!
//! ### Pairs
//!
//! ```rust
//! use serde_constring::{decode, encode};
//!
//! let pairs = decode("Provider=someone; Password = 'a;b' ;").unwrap();
//! assert_eq!(pairs[1], ("Password".to_string(), "a;b".to_string()));
//!
//! assert_eq!(encode(pairs).unwrap(), "Provider=someone;Password=\"a;b\";");
//! ```
//!
//! ### Store
//!
//! ```rust
//! use serde_constring::ConnectionString;
//!
//! let mut cs: ConnectionString = "provider=someone;user id=sa".parse().unwrap();
//! cs.insert("Password", "  secret").unwrap();
//! assert_eq!(cs.to_string(), "Provider=someone;User Id=sa;Password=\"  secret\";");
//! ```
//!
//! ### Serde
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_constring::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! #[serde(rename_all = "PascalCase")]
//! struct Database {
//!     server: String,
//!     database: String,
//!     password: Option<String>,
//! }
//!
//! let db: Database = from_str("Server=db1;Database=app;").unwrap();
//! assert_eq!(db.password, None);
//! assert_eq!(to_string(&db).unwrap(), "Server=db1;Database=app;");
//! ```
//!
//! ## Performance Characteristics
//!
//! - **Decoding**: one forward pass over the input, no backtracking
//! - **Encoding**: O(n) in the total size of keys and values
//!
//! See the [`grammar`] module for the full format description.

pub mod de;
pub mod error;
pub mod escape;
pub mod grammar;
pub mod macros;
pub mod map;
pub mod options;
pub mod ser;

pub use de::{decode, Decoder, Deserializer};
pub use error::{Error, Result};
pub use map::ConnectionString;
pub use options::{ConnectionOptions, KeyFormat};
pub use ser::{encode, Encoder, Serializer};

use serde::{Deserialize, Serialize};

/// A decoded `(key, value)` pair.
pub type Pair = (String, String);

/// Serialize a map or struct of text fields to a connection string.
///
/// # Examples
///
/// ```rust
/// use serde_constring::to_string;
/// use std::collections::BTreeMap;
///
/// let mut params = BTreeMap::new();
/// params.insert("Password", "a;b");
/// params.insert("User", "sa");
/// assert_eq!(to_string(&params).unwrap(), "Password=\"a;b\";User=sa;");
/// ```
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] for anything that is not a map or struct
/// of text, and [`Error::EmptyKey`] for blank keys.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let mut serializer = Serializer::new();
    value.serialize(&mut serializer)?;
    Ok(serializer.into_inner())
}

/// Deserialize an instance of type `T` from connection string text.
///
/// # Examples
///
/// ```rust
/// use serde_constring::from_str;
/// use std::collections::HashMap;
///
/// let params: HashMap<String, String> = from_str("User=sa;Password=\"a;b\"").unwrap();
/// assert_eq!(params["Password"], "a;b");
/// ```
///
/// # Errors
///
/// Returns a decoding error for malformed text, or a custom error if the
/// pairs do not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<'a, T>(s: &'a str) -> Result<T>
where
    T: Deserialize<'a>,
{
    let mut deserializer = Deserializer::from_str(s);
    T::deserialize(&mut deserializer)
}

/// Deserialize an instance of type `T` from bytes of connection string text.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, or as [`from_str`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<'a, T>(v: &'a [u8]) -> Result<T>
where
    T: Deserialize<'a>,
{
    let s = std::str::from_utf8(v).map_err(|e| Error::custom(e.to_string()))?;
    from_str(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::collections::HashMap;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    #[serde(rename_all = "PascalCase")]
    struct Login {
        user: String,
        password: String,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    enum Intent {
        ReadOnly,
        ReadWrite,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Options {
        intent: Intent,
        #[serde(default)]
        app: Option<String>,
    }

    #[test]
    fn test_struct_round_trip() {
        let login = Login {
            user: "sa".to_string(),
            password: "  p;w'\"  ".to_string(),
        };
        let text = to_string(&login).unwrap();
        assert_eq!(text, "User=sa;Password=\"  p;w'\"\"  \";");
        let back: Login = from_str(&text).unwrap();
        assert_eq!(login, back);
    }

    #[test]
    fn test_enum_and_option_fields() {
        let options: Options = from_str("intent=ReadWrite;app=etl").unwrap();
        assert_eq!(options.intent, Intent::ReadWrite);
        assert_eq!(options.app.as_deref(), Some("etl"));

        let options: Options = from_str("intent=ReadOnly").unwrap();
        assert_eq!(options.app, None);
        assert_eq!(to_string(&options).unwrap(), "intent=ReadOnly;");
    }

    #[test]
    fn test_hash_map() {
        let params: HashMap<String, String> = from_str("a=1;b= 2 ;").unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params["b"], "2");
    }

    #[test]
    fn test_decode_error_surfaces() {
        let err = from_str::<HashMap<String, String>>("key=\"value;").unwrap_err();
        assert_eq!(err, Error::unterminated_quote('"', 4));
    }

    #[test]
    fn test_non_text_field_is_rejected() {
        #[derive(Deserialize, Debug)]
        #[allow(dead_code)]
        struct Timeout {
            timeout: u32,
        }
        assert!(matches!(
            from_str::<Timeout>("timeout=30"),
            Err(Error::Custom(_))
        ));
    }

    #[test]
    fn test_from_slice() {
        let params: HashMap<String, String> = from_slice(b"a=1").unwrap();
        assert_eq!(params["a"], "1");
        assert!(from_slice::<HashMap<String, String>>(&[b'a', b'=', 0xff]).is_err());
    }
}
