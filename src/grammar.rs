//! Connection string format
//!
//! This module documents the connection string grammar as implemented by this
//! library.
//!
//! # Overview
//!
//! A connection string is a flat sequence of `key=value` pairs separated by
//! `;`. It has no nesting, no types and no comments: keys and values are
//! opaque text.
//!
//! ```text
//! conn-string := pair* ;
//! pair        := key '=' value ';'?      (only the final ';' may be omitted)
//! key         := any text, a literal '=' written as '=='
//! value       := bare | quoted
//! bare        := any text without ';'
//! quoted      := '"' (text | '""')* '"'
//!              | "'" (text | "''")* "'"
//! ```
//!
//! # Whitespace
//!
//! Whitespace around keys, around `=` and around unquoted values is dropped.
//! Inside quotes it is kept:
//!
//! ```rust
//! use serde_constring::decode;
//!
//! let pairs = decode("   Key   =   value   ;  Pad = '  x  ' ;").unwrap();
//! assert_eq!(pairs[0].1, "value");
//! assert_eq!(pairs[1].1, "  x  ");
//! ```
//!
//! # Keys
//!
//! The first `=` not immediately followed by another `=` ends the key, so
//! `==` stands for one literal `=`:
//!
//! ```text
//! Key==2=value;     # key "Key=2", value "value"
//! a===b;            # key "a=",    value "b"
//! key==value;       # error: no terminating '='
//! ```
//!
//! Keys may not be empty after trimming, when decoding or when encoding.
//!
//! # Values
//!
//! ## Unquoted
//!
//! Runs to the next `;`, or to the end of input for the last pair. Bare `=`
//! characters are allowed. Quote characters are allowed anywhere but the
//! first position.
//!
//! ```text
//! Dsn=a=b==c;        # value "a=b==c"
//! Name=it's;         # value "it's"
//! Empty=;            # value ""
//! ```
//!
//! ## Quoted
//!
//! A value whose first non-blank character is `"` or `'` is quoted. The
//! closing quote is the first occurrence of the same character that is not
//! doubled; a doubled quote stands for one literal quote. Only whitespace may
//! separate the closing quote from the `;` (or end of input).
//!
//! ```text
//! Pwd="a;b";                    # value "a;b"
//! Pwd='say "hi"';               # value "say \"hi\""
//! Pwd="it's ""quoted""";        # value "it's \"quoted\""
//! Pwd="open;                    # error: unterminated quote
//! Pwd="hey"there";              # error: missing ';' after the quote
//! ```
//!
//! # Canonical Form
//!
//! The encoder writes every pair as `key=value;`, trailing `;` included, and
//! writes nothing at all for an empty sequence. A value is quoted only if it:
//!
//! - starts or ends with whitespace,
//! - contains `;`,
//! - starts with a quote character, or
//! - starts with `=` (it would read as an escaped `==` after the key).
//!
//! When quoting, the quote character not present in the value is used. Only a
//! value containing both kinds gets `"` with its inner `"` doubled:
//!
//! | Value | Written as |
//! |-------|------------|
//! | `someone` | `someone` |
//! | `a;b` | `"a;b"` |
//! | `=value` | `"=value"` |
//! | `it's;` | `"it's;"` |
//! | `"x"` | `'"x"'` |
//! | `'a" ` | `"'a"" "` |
//!
//! ```rust
//! use serde_constring::{decode, encode};
//!
//! let text = encode([("Key=2", " spaced "), ("User", "bartolo")]).unwrap();
//! assert_eq!(text, "Key==2=\" spaced \";User=bartolo;");
//! assert_eq!(encode(decode(&text).unwrap()).unwrap(), text);
//! ```
//!
//! Decoding canonical text and encoding it again gives back the same text.
//! Decoding arbitrary valid text and encoding it gives the same pairs, but not
//! necessarily the same quoting.
//!
//! # Errors
//!
//! | Condition | Error |
//! |-----------|-------|
//! | No `=` after a key | [`MissingDelimiter`](crate::Error::MissingDelimiter) `'='` |
//! | Text between a closing quote and `;` | [`MissingDelimiter`](crate::Error::MissingDelimiter) `';'` |
//! | Input ends right after `=` | [`UnexpectedEnd`](crate::Error::UnexpectedEnd) |
//! | Quote never closed | [`UnterminatedQuote`](crate::Error::UnterminatedQuote) |
//! | Blank key | [`EmptyKey`](crate::Error::EmptyKey) |
//!
//! # Limitations
//!
//! - **Duplicate keys**: the codec keeps them all; deduplication is up to the
//!   store ([`ConnectionString`](crate::ConnectionString))
//! - **Key whitespace**: leading and trailing whitespace in keys never
//!   survives, since both directions trim it
//! - **Comments**: Not supported in the format

// This module contains only documentation; no implementation code
