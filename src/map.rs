//! Ordered key-value store for connection string parameters.
//!
//! [`ConnectionString`] wraps an [`IndexMap`] so parameters keep the order
//! they were inserted in, which is the order they are written back out. Keys
//! go through the store's [`ConnectionOptions`] before being stored or looked
//! up, so `user`, `USER` and `User` all name the same parameter under the
//! default title-case policy.
//!
//! ## Examples
//!
//! ```rust
//! use serde_constring::ConnectionString;
//!
//! let mut cs: ConnectionString = "Provider=someone;user=bartolo;".parse().unwrap();
//! assert_eq!(cs.get("USER"), Some("bartolo"));
//!
//! cs.insert("Timeout", "78").unwrap();
//! assert_eq!(cs.to_string(), "Provider=someone;User=bartolo;Timeout=78;");
//! ```

use crate::{decode, encode, ConnectionOptions, Error, Result};
use indexmap::IndexMap;
use log::debug;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::ops::Index;
use std::str::FromStr;

/// An ordered map of connection string parameters.
///
/// # Examples
///
/// ```rust
/// use serde_constring::ConnectionString;
///
/// let cs = ConnectionString::from_pairs([("server", "db1"), ("database", "app")]).unwrap();
///
/// // Iteration maintains insertion order
/// let keys: Vec<_> = cs.keys().cloned().collect();
/// assert_eq!(keys, vec!["Server", "Database"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConnectionString {
    store: IndexMap<String, String>,
    options: ConnectionOptions,
}

impl ConnectionString {
    /// Creates an empty store with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(ConnectionOptions::default())
    }

    /// Creates an empty store with the given options.
    #[must_use]
    pub fn with_options(options: ConnectionOptions) -> Self {
        ConnectionString {
            store: IndexMap::new(),
            options,
        }
    }

    /// Parses a connection string with default options.
    ///
    /// Priority keys keep the first value the string gives them.
    ///
    /// # Errors
    ///
    /// Returns any decoding error; nothing is stored in that case.
    pub fn parse(input: &str) -> Result<Self> {
        Self::parse_with_options(input, ConnectionOptions::default())
    }

    /// Parses a connection string with the given options.
    ///
    /// # Errors
    ///
    /// Returns any decoding error; nothing is stored in that case.
    pub fn parse_with_options(input: &str, options: ConnectionOptions) -> Result<Self> {
        let pairs = decode(input)?;
        let mut cs = Self::with_options(options);
        cs.store.reserve(pairs.len());
        for (key, value) in pairs {
            cs.load(&key, value)?;
        }
        Ok(cs)
    }

    /// Builds a store from key-value pairs, later pairs overriding earlier
    /// ones. Values are kept verbatim, surrounding whitespace included.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyKey`] if a key is empty after formatting.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self::from_pairs_with_options(pairs, ConnectionOptions::default())
    }

    /// Same as [`from_pairs`](Self::from_pairs) with explicit options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyKey`] if a key is empty after formatting.
    pub fn from_pairs_with_options<I, K, V>(pairs: I, options: ConnectionOptions) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut cs = Self::with_options(options);
        cs.update(pairs)?;
        Ok(cs)
    }

    #[must_use]
    pub fn options(&self) -> &ConnectionOptions {
        &self.options
    }

    fn key_for(&self, key: &str) -> Result<String> {
        let key = self.options.format_key(key);
        if key.is_empty() {
            return Err(Error::EmptyKey);
        }
        Ok(key)
    }

    /// Inserts a decoded pair, unless it would override a priority key.
    fn load(&mut self, key: &str, value: String) -> Result<()> {
        let key = self.key_for(key)?;
        if self.options.is_priority_key(&key) && self.store.contains_key(&key) {
            debug!("keeping first value of priority key {:?}", key);
            return Ok(());
        }
        self.store.insert(key, value);
        Ok(())
    }

    /// Inserts a parameter, returning the previous value for that key.
    ///
    /// An existing key keeps its position; a new one is appended.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyKey`] if the key is empty after formatting.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) -> Result<Option<String>> {
        let key = self.key_for(key)?;
        Ok(self.store.insert(key, value.into()))
    }

    /// Returns the value for `key`, formatted first.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.store
            .get(&self.options.format_key(key))
            .map(String::as_str)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.store.contains_key(&self.options.format_key(key))
    }

    /// Removes a parameter. The remaining parameters keep their order.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.store.shift_remove(&self.options.format_key(key))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Returns an iterator over the keys, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, String> {
        self.store.keys()
    }

    /// Returns an iterator over the values, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, String> {
        self.store.values()
    }

    /// Returns an iterator over the parameters, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, String> {
        self.store.iter()
    }

    /// Inserts every pair, overriding existing values, priority keys included.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_constring::ConnectionString;
    ///
    /// let mut cs = ConnectionString::parse("Huehue=troll;").unwrap();
    /// let other = ConnectionString::parse("Waldo=faldo;").unwrap();
    ///
    /// cs.update(&other).unwrap();
    /// cs.update([("huehue", "shutupandtakemymoney")]).unwrap();
    /// assert_eq!(cs.to_string(), "Huehue=shutupandtakemymoney;Waldo=faldo;");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyKey`] at the first empty key; pairs before it
    /// have already been inserted.
    pub fn update<I, K, V>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in pairs {
            self.insert(key.as_ref(), value)?;
        }
        Ok(())
    }

    /// Renames keys according to `mapping` (old name to new name).
    ///
    /// Old names are matched after formatting. In strict mode, parameters not
    /// named in the mapping are dropped; otherwise they are kept unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_constring::ConnectionString;
    ///
    /// let mut cs = ConnectionString::parse("User=bartolo;key2=val2;").unwrap();
    /// cs.translate([("USER", "usr")], false).unwrap();
    /// assert_eq!(cs.get("usr"), Some("bartolo"));
    /// assert_eq!(cs.get("key2"), Some("val2"));
    ///
    /// cs.translate([("usr", "login")], true).unwrap();
    /// assert_eq!(cs.len(), 1);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyKey`] if a new name is empty after formatting.
    /// The store is unchanged in that case.
    pub fn translate<I, K, V>(&mut self, mapping: I, strict: bool) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut renames = HashMap::new();
        for (from, to) in mapping {
            renames.insert(self.options.format_key(from.as_ref()), self.key_for(to.as_ref())?);
        }

        let store = std::mem::take(&mut self.store);
        for (key, value) in store {
            match renames.get(&key) {
                Some(renamed) => {
                    self.store.insert(renamed.clone(), value);
                }
                None if !strict => {
                    self.store.insert(key, value);
                }
                None => {}
            }
        }
        Ok(())
    }

    /// Returns the canonical connection string for the stored parameters.
    ///
    /// # Errors
    ///
    /// Stored keys are trimmed and never empty, so encoding them does not
    /// fail in practice.
    pub fn to_connection_string(&self) -> Result<String> {
        encode(&self.store)
    }
}

impl FromStr for ConnectionString {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.to_connection_string().map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

/// Parameters are compared in order; options are ignored.
impl PartialEq for ConnectionString {
    fn eq(&self, other: &Self) -> bool {
        self.store.len() == other.store.len() && self.store.iter().eq(other.store.iter())
    }
}

impl Eq for ConnectionString {}

impl Index<&str> for ConnectionString {
    type Output = str;

    /// # Panics
    ///
    /// Panics if the key is not present.
    fn index(&self, key: &str) -> &str {
        match self.get(key) {
            Some(value) => value,
            None => panic!("no parameter {:?} in connection string", key),
        }
    }
}

impl<'a> IntoIterator for &'a ConnectionString {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.store.iter()
    }
}

impl IntoIterator for ConnectionString {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.store.into_iter()
    }
}

impl From<ConnectionString> for HashMap<String, String> {
    fn from(cs: ConnectionString) -> Self {
        cs.store.into_iter().collect()
    }
}

impl Serialize for ConnectionString {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.store.len()))?;
        for (key, value) in &self.store {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ConnectionString {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StoreVisitor;

        impl<'de> Visitor<'de> for StoreVisitor {
            type Value = ConnectionString;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of connection string parameters")
            }

            fn visit_map<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut cs = ConnectionString::new();
                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    cs.insert(&key, value)
                        .map_err(<A::Error as serde::de::Error>::custom)?;
                }
                Ok(cs)
            }
        }

        deserializer.deserialize_map(StoreVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KeyFormat;

    #[test]
    fn test_simple_string() {
        let cs = ConnectionString::parse("Provider=someone;User=bartolo;").unwrap();
        assert_eq!(&cs["Provider"], "someone");
        assert_eq!(&cs["User"], "bartolo");
    }

    #[test]
    fn test_priority_key_is_not_overridden() {
        let cs = ConnectionString::parse("Provider=initial;provider=second").unwrap();
        assert_eq!(cs.get("Provider"), Some("initial"));
        assert_eq!(cs.len(), 1);
    }

    #[test]
    fn test_ordinary_key_is_overridden_in_place() {
        let cs = ConnectionString::parse("a=1;b=2;A=3;").unwrap();
        assert_eq!(cs.to_string(), "A=3;B=2;");
    }

    #[test]
    fn test_priority_key_can_be_set_explicitly() {
        let mut cs = ConnectionString::parse("Provider=initial;").unwrap();
        assert_eq!(cs.insert("provider", "second").unwrap().as_deref(), Some("initial"));
        assert_eq!(cs.get("Provider"), Some("second"));
    }

    #[test]
    fn test_keys_are_formatted() {
        let cs = ConnectionString::parse("cool key  =value;").unwrap();
        assert!(cs.to_string().contains("Cool Key"));
        assert_eq!(cs.get("kEY"), None);
        assert_eq!(cs.get("COOL KEY"), Some("value"));

        let options = ConnectionOptions::new().with_key_format(KeyFormat::Upper);
        let cs = ConnectionString::parse_with_options("key=value;", options).unwrap();
        assert_eq!(cs.to_string(), "KEY=value;");
    }

    #[test]
    fn test_empty_string() {
        let cs = ConnectionString::parse("").unwrap();
        assert!(cs.is_empty());
        assert_eq!(cs.to_string(), "");
    }

    #[test]
    fn test_display_round_trip() {
        let text = "Huehue=troll;";
        let cs: ConnectionString = text.parse().unwrap();
        assert_eq!(cs.to_string(), text);
        assert_eq!(cs.clone().to_string(), text);
    }

    #[test]
    fn test_from_pairs_preserves_spaces() {
        let cs =
            ConnectionString::from_pairs([("User Id", "  gertrud"), ("Initial Catalog", "abc  ")])
                .unwrap();
        assert_eq!(cs.get("user id"), Some("  gertrud"));
        assert_eq!(cs.get("initial catalog"), Some("abc  "));

        let back = ConnectionString::parse(&cs.to_string()).unwrap();
        assert_eq!(back, cs);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut cs = ConnectionString::parse("a=1;b=2;c=3").unwrap();
        assert_eq!(cs.remove("b").as_deref(), Some("2"));
        assert!(!cs.contains_key("b"));
        assert_eq!(cs.to_string(), "A=1;C=3;");
        assert_eq!(cs.remove("b"), None);
    }

    #[test]
    fn test_empty_key_rejected() {
        let mut cs = ConnectionString::new();
        assert_eq!(cs.insert("   ", "v"), Err(Error::EmptyKey));
        assert!(cs.is_empty());
    }

    #[test]
    fn test_equality_is_ordered() {
        let a = ConnectionString::parse("Provider=someone;User=bartolo;").unwrap();
        let b = ConnectionString::from_pairs(a.iter()).unwrap();
        assert_eq!(a, b);

        let c = ConnectionString::parse("User=bartolo;Provider=someone;").unwrap();
        assert_ne!(a, c);

        let mut d = b.clone();
        d.insert("timeout", "78").unwrap();
        assert_ne!(a, d);
        assert_ne!(d, a);
    }

    #[test]
    fn test_translate_strict_is_atomic_on_error() {
        let mut cs = ConnectionString::parse("User=bartolo;key2=val2;").unwrap();
        assert_eq!(cs.translate([("user", " ")], true), Err(Error::EmptyKey));
        assert_eq!(cs.len(), 2);

        cs.translate([("USER", "usr")], true).unwrap();
        assert_eq!(cs.get("usr"), Some("bartolo"));
        assert!(!cs.contains_key("key2"));
    }

    #[test]
    #[should_panic(expected = "no parameter")]
    fn test_index_missing_key_panics() {
        let cs = ConnectionString::new();
        let _ = &cs["missing"];
    }

    #[test]
    fn test_into_hash_map() {
        let cs = ConnectionString::parse("Provider=someone;User=bartolo;").unwrap();
        let map: HashMap<String, String> = cs.into();
        assert_eq!(map.get("User").map(String::as_str), Some("bartolo"));
    }
}
