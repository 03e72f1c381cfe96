//! Connection string encoding.
//!
//! This module provides the [`Encoder`], which writes pairs in canonical form,
//! and the serde [`Serializer`] for maps and structs with text values.
//!
//! ## Overview
//!
//! - **Quote minimization**: values are written bare unless they have
//!   surrounding whitespace, a `;`, or a leading quote or `=`
//! - **Quote choice**: a quoted value is wrapped in whichever quote character
//!   it does not contain; only values holding both get escaped
//! - **Terminated pairs**: every pair ends with `;`, including the last
//!
//! ## Usage
//!
//! ```rust
//! use serde_constring::encode;
//!
//! let text = encode([("Provider", "someone"), ("Password", "a;b")]).unwrap();
//! assert_eq!(text, "Provider=someone;Password=\"a;b\";");
//! ```
//!
//! Through serde:
//!
//! ```rust
//! use serde::Serialize;
//! use serde_constring::to_string;
//!
//! #[derive(Serialize)]
//! #[serde(rename_all = "PascalCase")]
//! struct Login { user: String, password: Option<String> }
//!
//! let login = Login { user: "sa".to_string(), password: None };
//! assert_eq!(to_string(&login).unwrap(), "User=sa;");
//! ```

use crate::escape::{encode_key, encode_value};
use crate::{Error, Result};
use serde::ser::Impossible;
use serde::{ser, Serialize};

/// Encodes pairs into a connection string, preserving their order.
///
/// Returns an empty string for no pairs.
///
/// # Examples
///
/// ```rust
/// use serde_constring::encode;
///
/// let none: [(&str, &str); 0] = [];
/// assert_eq!(encode(none).unwrap(), "");
/// assert_eq!(encode([("Key=2", "value")]).unwrap(), "Key==2=value;");
/// ```
///
/// # Errors
///
/// Returns [`Error::EmptyKey`] if any key is empty after trimming.
pub fn encode<I, K, V>(pairs: I) -> Result<String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut encoder = Encoder::new();
    for (key, value) in pairs {
        encoder.write_pair(key.as_ref(), value.as_ref())?;
    }
    Ok(encoder.into_inner())
}

/// Output buffer for canonical connection string text.
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    output: String,
}

impl Encoder {
    pub fn new() -> Self {
        Encoder {
            output: String::with_capacity(128),
        }
    }

    /// Appends one `key=value;` segment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyKey`] if the key is empty after trimming. The
    /// buffer is left untouched in that case.
    pub fn write_pair(&mut self, key: &str, value: &str) -> Result<()> {
        let key = encode_key(key)?;
        self.output.push_str(&key);
        self.output.push('=');
        self.output.push_str(&encode_value(value));
        self.output.push(';');
        Ok(())
    }

    pub fn into_inner(self) -> String {
        self.output
    }
}

/// The serde serializer.
///
/// Accepts a top-level map or struct whose keys and values serialize as text.
/// `None` values omit their pair.
#[derive(Debug, Default)]
pub struct Serializer {
    encoder: Encoder,
}

impl Serializer {
    pub fn new() -> Self {
        Serializer {
            encoder: Encoder::new(),
        }
    }

    pub fn into_inner(self) -> String {
        self.encoder.into_inner()
    }

    fn write_field<T>(&mut self, key: &str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match value.serialize(TextSerializer)? {
            Some(text) => self.encoder.write_pair(key, &text),
            None => Ok(()),
        }
    }
}

fn top_level<T>(found: &str) -> Result<T> {
    Err(Error::unsupported_type(&format!(
        "{} (a connection string needs a map or struct at the top level)",
        found
    )))
}

impl<'a> ser::Serializer for &'a mut Serializer {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = Impossible<(), Error>;
    type SerializeTuple = Impossible<(), Error>;
    type SerializeTupleStruct = Impossible<(), Error>;
    type SerializeTupleVariant = Impossible<(), Error>;
    type SerializeMap = MapSerializer<'a>;
    type SerializeStruct = StructSerializer<'a>;
    type SerializeStructVariant = Impossible<(), Error>;

    fn serialize_bool(self, _v: bool) -> Result<Self::Ok> {
        top_level("bool")
    }

    fn serialize_i8(self, _v: i8) -> Result<Self::Ok> {
        top_level("integer")
    }

    fn serialize_i16(self, _v: i16) -> Result<Self::Ok> {
        top_level("integer")
    }

    fn serialize_i32(self, _v: i32) -> Result<Self::Ok> {
        top_level("integer")
    }

    fn serialize_i64(self, _v: i64) -> Result<Self::Ok> {
        top_level("integer")
    }

    fn serialize_u8(self, _v: u8) -> Result<Self::Ok> {
        top_level("integer")
    }

    fn serialize_u16(self, _v: u16) -> Result<Self::Ok> {
        top_level("integer")
    }

    fn serialize_u32(self, _v: u32) -> Result<Self::Ok> {
        top_level("integer")
    }

    fn serialize_u64(self, _v: u64) -> Result<Self::Ok> {
        top_level("integer")
    }

    fn serialize_f32(self, _v: f32) -> Result<Self::Ok> {
        top_level("float")
    }

    fn serialize_f64(self, _v: f64) -> Result<Self::Ok> {
        top_level("float")
    }

    fn serialize_char(self, _v: char) -> Result<Self::Ok> {
        top_level("char")
    }

    fn serialize_str(self, _v: &str) -> Result<Self::Ok> {
        top_level("string")
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Self::Ok> {
        top_level("bytes")
    }

    fn serialize_none(self) -> Result<Self::Ok> {
        top_level("none")
    }

    fn serialize_some<T>(self, value: &T) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok> {
        top_level("unit")
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Self::Ok> {
        top_level(name)
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<Self::Ok> {
        top_level(name)
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        top_level(name)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        top_level("sequence")
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        top_level("tuple")
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        top_level(name)
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        top_level(name)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(MapSerializer {
            ser: self,
            key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Ok(StructSerializer { ser: self })
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        top_level(name)
    }
}

pub struct MapSerializer<'a> {
    ser: &'a mut Serializer,
    key: Option<String>,
}

impl<'a> ser::SerializeMap for MapSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = key
            .serialize(TextSerializer)?
            .ok_or_else(|| Error::unsupported_type("none as map key"))?;
        self.key = Some(key);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called before serialize_key"))?;
        self.ser.write_field(&key, value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(())
    }
}

pub struct StructSerializer<'a> {
    ser: &'a mut Serializer,
}

impl<'a> ser::SerializeStruct for StructSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.ser.write_field(key, value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(())
    }
}

/// Extracts the text of a single key or value. `None` means "leave the pair
/// out".
struct TextSerializer;

fn not_text<T>(found: &str) -> Result<T> {
    Err(Error::unsupported_type(&format!(
        "{} (connection string values are text)",
        found
    )))
}

impl ser::Serializer for TextSerializer {
    type Ok = Option<String>;
    type Error = Error;

    type SerializeSeq = Impossible<Option<String>, Error>;
    type SerializeTuple = Impossible<Option<String>, Error>;
    type SerializeTupleStruct = Impossible<Option<String>, Error>;
    type SerializeTupleVariant = Impossible<Option<String>, Error>;
    type SerializeMap = Impossible<Option<String>, Error>;
    type SerializeStruct = Impossible<Option<String>, Error>;
    type SerializeStructVariant = Impossible<Option<String>, Error>;

    fn serialize_bool(self, _v: bool) -> Result<Self::Ok> {
        not_text("bool")
    }

    fn serialize_i8(self, _v: i8) -> Result<Self::Ok> {
        not_text("integer")
    }

    fn serialize_i16(self, _v: i16) -> Result<Self::Ok> {
        not_text("integer")
    }

    fn serialize_i32(self, _v: i32) -> Result<Self::Ok> {
        not_text("integer")
    }

    fn serialize_i64(self, _v: i64) -> Result<Self::Ok> {
        not_text("integer")
    }

    fn serialize_u8(self, _v: u8) -> Result<Self::Ok> {
        not_text("integer")
    }

    fn serialize_u16(self, _v: u16) -> Result<Self::Ok> {
        not_text("integer")
    }

    fn serialize_u32(self, _v: u32) -> Result<Self::Ok> {
        not_text("integer")
    }

    fn serialize_u64(self, _v: u64) -> Result<Self::Ok> {
        not_text("integer")
    }

    fn serialize_f32(self, _v: f32) -> Result<Self::Ok> {
        not_text("float")
    }

    fn serialize_f64(self, _v: f64) -> Result<Self::Ok> {
        not_text("float")
    }

    fn serialize_char(self, v: char) -> Result<Self::Ok> {
        Ok(Some(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Self::Ok> {
        Ok(Some(v.to_string()))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Self::Ok> {
        not_text("bytes")
    }

    fn serialize_none(self) -> Result<Self::Ok> {
        Ok(None)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok> {
        not_text("unit")
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Self::Ok> {
        not_text(name)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok> {
        Ok(Some(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        not_text(name)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        not_text("sequence")
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        not_text("tuple")
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        not_text(name)
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        not_text(name)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        not_text("map")
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        not_text(name)
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        not_text(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_empty_input_has_no_terminator() {
        let pairs: Vec<(String, String)> = Vec::new();
        assert_eq!(encode(pairs).unwrap(), "");
    }

    #[test]
    fn test_every_pair_is_terminated() {
        assert_eq!(
            encode([("Provider", "someone"), ("User", "bartolo")]).unwrap(),
            "Provider=someone;User=bartolo;"
        );
    }

    #[test]
    fn test_keys_are_trimmed_and_escaped() {
        assert_eq!(encode([("  Key=2 ", "value")]).unwrap(), "Key==2=value;");
    }

    #[test]
    fn test_empty_key_is_rejected() {
        assert_eq!(encode([("ok", "1"), ("  ", "2")]), Err(Error::EmptyKey));
    }

    #[test]
    fn test_minimal_quoting() {
        assert_eq!(encode([("k", "")]).unwrap(), "k=;");
        assert_eq!(encode([("k", "  gertrud")]).unwrap(), "k=\"  gertrud\";");
        assert_eq!(encode([("k", "it's")]).unwrap(), "k=it's;");
        assert_eq!(encode([("k", "it's;")]).unwrap(), "k=\"it's;\";");
        assert_eq!(encode([("k", "\"x\";")]).unwrap(), "k='\"x\";';");
        assert_eq!(encode([("k", "'a\" ")]).unwrap(), "k=\"'a\"\" \";");
    }

    #[test]
    fn test_failed_write_leaves_buffer_untouched() {
        let mut encoder = Encoder::new();
        encoder.write_pair("a", "1").unwrap();
        assert!(encoder.write_pair("", "2").is_err());
        assert_eq!(encoder.into_inner(), "a=1;");
    }

    #[derive(Serialize)]
    enum Mode {
        ReadOnly,
    }

    #[derive(Serialize)]
    struct Settings {
        server: String,
        mode: Mode,
        initial: char,
        password: Option<&'static str>,
        note: Option<&'static str>,
    }

    #[test]
    fn test_serialize_struct() {
        let settings = Settings {
            server: "db;1".to_string(),
            mode: Mode::ReadOnly,
            initial: 'x',
            password: Some("p w "),
            note: None,
        };
        let mut serializer = Serializer::new();
        settings.serialize(&mut serializer).unwrap();
        assert_eq!(
            serializer.into_inner(),
            "server=\"db;1\";mode=ReadOnly;initial=x;password=\"p w \";"
        );
    }

    #[test]
    fn test_serialize_map() {
        let mut map = BTreeMap::new();
        map.insert("b", "2");
        map.insert("a=", "1");
        let mut serializer = Serializer::new();
        map.serialize(&mut serializer).unwrap();
        assert_eq!(serializer.into_inner(), "a===1;b=2;");
    }

    #[test]
    fn test_non_text_is_rejected() {
        let mut map = BTreeMap::new();
        map.insert("timeout", 30);
        let mut serializer = Serializer::new();
        assert!(matches!(
            map.serialize(&mut serializer),
            Err(Error::UnsupportedType(_))
        ));

        let mut serializer = Serializer::new();
        assert!(matches!(
            vec!["a"].serialize(&mut serializer),
            Err(Error::UnsupportedType(_))
        ));
    }
}
