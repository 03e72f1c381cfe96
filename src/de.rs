//! Connection string decoding.
//!
//! This module provides the [`Decoder`], a single left-to-right scanner that
//! splits connection string text into decoded `(key, value)` pairs, and the
//! serde [`Deserializer`] built on top of it.
//!
//! ## Overview
//!
//! - **Single pass**: the scan position only moves forward, no backtracking
//! - **Lazy**: pairs are produced one at a time by the [`Iterator`] impl
//! - **All-or-nothing**: [`decode`] discards everything once an error is hit
//!
//! ## Usage
//!
//! ```rust
//! use serde_constring::decode;
//!
//! let pairs = decode("Provider=someone;User=bartolo;").unwrap();
//! assert_eq!(pairs[0], ("Provider".to_string(), "someone".to_string()));
//! assert_eq!(pairs[1], ("User".to_string(), "bartolo".to_string()));
//! ```
//!
//! Through serde, any map or struct of text fields can be filled directly:
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_constring::from_str;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! #[serde(rename_all = "PascalCase")]
//! struct Login { user: String, password: String }
//!
//! let login: Login = from_str("User=sa;Password='p;w'").unwrap();
//! assert_eq!(login.password, "p;w");
//! ```

use crate::escape::{decode_key, decode_value, is_quote};
use crate::{Error, Pair, Result};
use log::{debug, trace};
use serde::de::IntoDeserializer;
use serde::{de, forward_to_deserialize_any};
use std::iter::FusedIterator;

/// Decodes a whole connection string into its pairs, in input order.
///
/// # Examples
///
/// ```rust
/// use serde_constring::decode;
///
/// assert!(decode("").unwrap().is_empty());
/// assert_eq!(
///     decode("Key==2=value;").unwrap(),
///     vec![("Key=2".to_string(), "value".to_string())]
/// );
/// ```
///
/// # Errors
///
/// Returns the first error the scan hits; no pairs are returned in that case.
pub fn decode(input: &str) -> Result<Vec<Pair>> {
    Decoder::new(input).collect()
}

/// Lazy scanner over the pairs of a connection string.
///
/// Yields `Ok(pair)` until the input is exhausted, or a single `Err` after
/// which it is finished. A decoder cannot be rewound; scan again with a fresh
/// one.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    input: &'a str,
    position: usize,
    finished: bool,
}

impl<'a> Decoder<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Decoder {
            input,
            position: 0,
            finished: false,
        }
    }

    /// Byte offset of the next unread character.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.position += rest.len() - rest.trim_start().len();
    }

    /// Finds the next `delimiter` at or after `from` that is not immediately
    /// followed by a second one. Doubled delimiters are skipped as a unit.
    fn find_single(&self, from: usize, delimiter: char) -> Option<usize> {
        let mut from = from;
        loop {
            let pos = from + self.input[from..].find(delimiter)?;
            let after = pos + delimiter.len_utf8();
            if self.input[after..].starts_with(delimiter) {
                from = after + delimiter.len_utf8();
            } else {
                return Some(pos);
            }
        }
    }

    /// Reads the raw key and consumes the `=` that ends it.
    fn scan_key(&mut self) -> Result<&'a str> {
        let start = self.position;
        let end = self
            .find_single(start, '=')
            .ok_or_else(|| Error::missing_delimiter('=', self.input.len()))?;
        self.position = end + 1;
        Ok(&self.input[start..end])
    }

    /// Reads the raw value and consumes the `;` that ends it, if any.
    fn scan_value(&mut self) -> Result<&'a str> {
        self.skip_whitespace();
        match self.rest().chars().next() {
            None => Err(Error::unexpected_end(self.position)),
            Some(quote) if is_quote(quote) => self.scan_quoted(quote),
            Some(_) => Ok(self.scan_bare()),
        }
    }

    fn scan_bare(&mut self) -> &'a str {
        let start = self.position;
        let raw = match self.rest().find(';') {
            Some(offset) => {
                self.position = start + offset + 1;
                &self.input[start..start + offset]
            }
            None => {
                self.position = self.input.len();
                &self.input[start..]
            }
        };
        raw.trim_end()
    }

    /// The returned slice includes both wrapping quotes.
    fn scan_quoted(&mut self, quote: char) -> Result<&'a str> {
        let start = self.position;
        let close = self
            .find_single(start + 1, quote)
            .ok_or_else(|| Error::unterminated_quote(quote, start))?;

        self.position = close + 1;
        self.skip_whitespace();
        match self.rest().chars().next() {
            None => {}
            Some(';') => self.position += 1,
            Some(_) => return Err(Error::missing_delimiter(';', self.position)),
        }

        Ok(&self.input[start..=close])
    }

    fn decode_pair(&mut self) -> Result<Pair> {
        let raw_key = self.scan_key()?;
        let raw_value = self.scan_value()?;
        Ok((decode_key(raw_key)?, decode_value(raw_value)))
    }
}

impl Iterator for Decoder<'_> {
    type Item = Result<Pair>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        self.skip_whitespace();
        if self.at_end() {
            self.finished = true;
            return None;
        }

        let pair = self.decode_pair();
        match &pair {
            // values stay out of the log, they may be credentials
            Ok((key, _)) => trace!("decoded key {:?}, next pair at byte {}", key, self.position),
            Err(err) => {
                debug!("rejecting connection string: {}", err);
                self.finished = true;
            }
        }
        Some(pair)
    }
}

impl FusedIterator for Decoder<'_> {}

/// The serde deserializer.
///
/// Presents the decoded pairs of a connection string as a map, so any
/// `Deserialize` map or struct with text fields can be read from one.
pub struct Deserializer<'de> {
    decoder: Decoder<'de>,
}

impl<'de> Deserializer<'de> {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &'de str) -> Self {
        Deserializer {
            decoder: Decoder::new(input),
        }
    }
}

impl<'de> de::Deserializer<'de> for &mut Deserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let pairs = self.decoder.by_ref().collect::<Result<Vec<_>>>()?;
        visitor.visit_map(MapDeserializer::new(pairs))
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct seq tuple
        tuple_struct enum identifier ignored_any
    }
}

struct MapDeserializer {
    iter: std::vec::IntoIter<Pair>,
    value: Option<String>,
}

impl MapDeserializer {
    fn new(pairs: Vec<Pair>) -> Self {
        MapDeserializer {
            iter: pairs.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(TextDeserializer::new(key)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(TextDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

/// Deserializes one decoded key or value. Everything is text; a present value
/// is always `Some`, and enums match unit variants by name.
struct TextDeserializer {
    text: String,
}

impl TextDeserializer {
    fn new(text: String) -> Self {
        TextDeserializer { text }
    }
}

impl<'de> de::Deserializer<'de> for TextDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_string(self.text)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_enum(self.text.into_deserializer())
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(key: &str, value: &str) -> Pair {
        (key.to_string(), value.to_string())
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert_eq!(decode("").unwrap(), vec![]);
        assert_eq!(decode("   \t ").unwrap(), vec![]);
    }

    #[test]
    fn test_whitespace_is_stripped() {
        assert_eq!(
            decode("    Key   =   value   ;").unwrap(),
            vec![pair("Key", "value")]
        );
    }

    #[test]
    fn test_missing_trailing_semicolon() {
        assert_eq!(decode("huehue=troll").unwrap(), vec![pair("huehue", "troll")]);
    }

    #[test]
    fn test_empty_unquoted_value() {
        assert_eq!(
            decode("a=;b=2").unwrap(),
            vec![pair("a", ""), pair("b", "2")]
        );
    }

    #[test]
    fn test_quoted_value_keeps_delimiters() {
        assert_eq!(
            decode("Key1=\"  hue'ehue  ;==\";").unwrap(),
            vec![pair("Key1", "  hue'ehue  ;==")]
        );
        assert_eq!(
            decode("Key1='==hu\"ehue  ;=='").unwrap(),
            vec![pair("Key1", "==hu\"ehue  ;==")]
        );
    }

    #[test]
    fn test_quoted_value_starting_with_equals() {
        assert_eq!(decode("key=\"=value\" ;").unwrap(), vec![pair("key", "=value")]);
    }

    #[test]
    fn test_doubled_quotes_collapse() {
        assert_eq!(
            decode("huehue=\"troll's friend name is \"\"johnny\"\"\"  ;key2 =  value").unwrap(),
            vec![
                pair("huehue", "troll's friend name is \"johnny\""),
                pair("key2", "value"),
            ]
        );
    }

    #[test]
    fn test_bare_equals_in_value() {
        assert_eq!(decode("k=a=b==c;").unwrap(), vec![pair("k", "a=b==c")]);
    }

    #[test]
    fn test_escaped_equals_in_key() {
        assert_eq!(decode("a===b;").unwrap(), vec![pair("a=", "b")]);
        assert_eq!(decode("==a=v").unwrap(), vec![pair("=a", "v")]);
    }

    #[test]
    fn test_missing_equals() {
        assert_eq!(
            decode("key==value;"),
            Err(Error::missing_delimiter('=', 11))
        );
        assert!(matches!(
            decode("key=val;ue;"),
            Err(Error::MissingDelimiter { delimiter: '=', .. })
        ));
    }

    #[test]
    fn test_unterminated_quotes() {
        assert_eq!(decode("key=\"value;"), Err(Error::unterminated_quote('"', 4)));
        assert_eq!(decode("key='value;"), Err(Error::unterminated_quote('\'', 4)));
        assert_eq!(decode("k=\"\"\""), Err(Error::unterminated_quote('"', 2)));
    }

    #[test]
    fn test_text_after_closing_quote() {
        assert_eq!(
            decode("key=\"hey\"there\";"),
            Err(Error::missing_delimiter(';', 9))
        );
        assert!(decode("key='hey'there';").is_err());
    }

    #[test]
    fn test_unexpected_end() {
        assert_eq!(decode("key="), Err(Error::unexpected_end(4)));
        assert_eq!(decode("a=1;key=   "), Err(Error::unexpected_end(11)));
    }

    #[test]
    fn test_empty_key() {
        assert_eq!(decode("=value;"), Err(Error::EmptyKey));
        assert_eq!(decode("a=1;  =value;"), Err(Error::EmptyKey));
    }

    #[test]
    fn test_decoder_is_lazy_and_fused() {
        let mut decoder = Decoder::new("a=1;b=2;c");
        assert_eq!(decoder.next(), Some(Ok(pair("a", "1"))));
        assert_eq!(decoder.position(), 4);
        assert_eq!(decoder.next(), Some(Ok(pair("b", "2"))));
        assert!(matches!(decoder.next(), Some(Err(Error::MissingDelimiter { .. }))));
        assert_eq!(decoder.next(), None);
        assert_eq!(decoder.next(), None);
    }

    #[test]
    fn test_multibyte_text() {
        assert_eq!(
            decode("clé=\"ünïcödé; ok\";名前=値").unwrap(),
            vec![pair("clé", "ünïcödé; ok"), pair("名前", "値")]
        );
    }
}
