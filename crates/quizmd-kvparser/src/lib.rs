//! Key/value attribute parser for quizmd entity lines.
//!
//! Every quizmd entity line of the form `name: attributes` carries a small
//! attribute string. This crate turns that string into an [`Attributes`] map
//! of keys to either a text value or a presence-only flag.
//!
//! # Example
//!
//! ```rust
//! use quizmd_kvparser::{parse, AttrValue};
//!
//! let attrs = parse(r#"width=30 "stroke width"='0.5' filled"#).unwrap();
//!
//! assert_eq!(attrs.text("width"), Some("30"));
//! assert_eq!(attrs.text("stroke width"), Some("0.5"));
//! assert_eq!(attrs.get("filled"), Some(&AttrValue::Flag));
//! ```
//!
//! # Syntax
//!
//! | Form | Meaning |
//! |------|---------|
//! | `key=value` | text value |
//! | `key` | flag (present, no value) |
//! | `"k 1"="v 1"` / `'k 1'='v 1'` | quoted keys and values may hold spaces |
//! | `k\ 1=v\=1` | backslash escapes a space, `=`, `"` or `'` |
//!
//! Later assignments to the same key win. An unterminated quote or an empty
//! key is an error ([`KvError`]). A stray `=` with nothing before it is only a
//! warning ([`KvWarning`]): it is logged and parsing carries on.

mod attributes;
mod error;
mod parser;
mod tokenizer;

pub use attributes::{AttrValue, Attributes};
pub use error::{KvError, KvWarning, Result};
pub use parser::{parse, parse_with_warnings};
