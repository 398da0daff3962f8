//! The parsed attribute map.

use std::collections::BTreeMap;
use std::fmt::{self, Write as _};
use std::str::FromStr;

use crate::error::KvError;
use crate::tokenizer::Tokenizer;

/// The value side of an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// Key given without `=value`; equivalent to boolean `true`.
    Flag,
    /// Key given with a value.
    Text(String),
}

impl AttrValue {
    /// Returns the text value, or `None` for a flag.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(text) => Some(text),
            AttrValue::Flag => None,
        }
    }

    /// Returns `true` for a presence-only flag.
    pub fn is_flag(&self) -> bool {
        matches!(self, AttrValue::Flag)
    }
}

impl From<&str> for AttrValue {
    fn from(text: &str) -> Self {
        AttrValue::Text(text.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(text: String) -> Self {
        AttrValue::Text(text)
    }
}

impl From<bool> for AttrValue {
    /// `true` becomes a flag; `false` the text `"false"`.
    fn from(flag: bool) -> Self {
        if flag {
            AttrValue::Flag
        } else {
            AttrValue::Text("false".to_string())
        }
    }
}

/// Attribute map of keys to [`AttrValue`]s.
///
/// Keys are kept sorted, so iteration order and the [`Display`](fmt::Display)
/// output are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: BTreeMap<String, AttrValue>,
}

impl Attributes {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the map used for the `name:- text` shorthand: a single
    /// `content` entry.
    pub fn content(text: impl Into<String>) -> Self {
        let text: String = text.into();
        let mut attrs = Self::new();
        attrs.insert("content", text);
        attrs
    }

    /// Inserts or replaces an entry. Returns the previous value, if any.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AttrValue>,
    ) -> Option<AttrValue> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.entries.get(key)
    }

    /// Returns the text value of `key`. Flags and missing keys give `None`.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(AttrValue::as_text)
    }

    /// Returns `true` when `key` is present as a flag.
    pub fn is_flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(AttrValue::is_flag)
    }

    /// Interprets `key` as a boolean switch.
    ///
    /// A flag or the text `true`/`yes`/`on`/`1` is `true`; anything else,
    /// including a missing key, is `false`.
    pub fn switch(&self, key: &str) -> bool {
        match self.get(key) {
            Some(AttrValue::Flag) => true,
            Some(AttrValue::Text(text)) => matches!(
                text.to_ascii_lowercase().as_str(),
                "true" | "yes" | "on" | "1"
            ),
            None => false,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<AttrValue> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Copies every entry of `other` into `self`; `other` wins on conflicts.
    pub fn extend_from(&mut self, other: &Attributes) {
        for (key, value) in other.iter() {
            self.entries.insert(key.to_string(), value.clone());
        }
    }
}

impl From<BTreeMap<String, AttrValue>> for Attributes {
    fn from(entries: BTreeMap<String, AttrValue>) -> Self {
        Self { entries }
    }
}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Self::new();
        for (key, value) in iter {
            attrs.insert(key, value);
        }
        attrs
    }
}

impl FromStr for Attributes {
    type Err = KvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse(s)
    }
}

/// Writes `s` double-quoted. `"` is escaped, and so is any escapable
/// character right after a backslash, so the backslash reads back literally.
fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_char('"')?;
    let mut after_backslash = false;
    for c in s.chars() {
        if c == '"' || (after_backslash && Tokenizer::is_escapable(c)) {
            f.write_char('\\')?;
        }
        f.write_char(c)?;
        after_backslash = c == '\\';
    }
    f.write_char('"')
}

/// Canonical form: every key and value double-quoted, entries separated by a
/// single space. Parsing the output yields an equal map, except for a key or
/// value that ends in a backslash: the grammar reads `\"` as an escaped quote,
/// so such text cannot be closed and the output fails to parse.
impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write_quoted(f, key)?;
            if let AttrValue::Text(text) = value {
                f.write_str("=")?;
                write_quoted(f, text)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_ignores_flags() {
        let attrs: Attributes = [("a", AttrValue::Flag), ("b", AttrValue::from("x"))]
            .into_iter()
            .collect();
        assert_eq!(attrs.text("a"), None);
        assert!(attrs.is_flag("a"));
        assert_eq!(attrs.text("b"), Some("x"));
        assert!(!attrs.is_flag("b"));
    }

    #[test]
    fn switch_values() {
        let attrs: Attributes = [
            ("flag", AttrValue::Flag),
            ("yes", AttrValue::from("Yes")),
            ("no", AttrValue::from("false")),
        ]
        .into_iter()
        .collect();
        assert!(attrs.switch("flag"));
        assert!(attrs.switch("yes"));
        assert!(!attrs.switch("no"));
        assert!(!attrs.switch("missing"));
    }

    #[test]
    fn display_quotes_everything() {
        let attrs: Attributes = [
            ("k 1", AttrValue::from("say \"hi\"")),
            ("flag", AttrValue::Flag),
        ]
        .into_iter()
        .collect();
        assert_eq!(attrs.to_string(), r#""flag" "k 1"="say \"hi\"""#);
    }

    #[test]
    fn display_keeps_backslashes_literal() {
        for text in [r"C:\dir\sub", r"a\ b", r"a\=b", r"a\'b", r#"a\"b"#, r"a\\ b"] {
            let attrs: Attributes = [("path", text)].into_iter().collect();
            let reparsed = crate::parse(&attrs.to_string()).unwrap();
            assert_eq!(reparsed.text("path"), Some(text), "{attrs}");
        }
        let attrs: Attributes = [("path", r"a\ b")].into_iter().collect();
        assert_eq!(attrs.to_string(), r#""path"="a\\ b""#);
    }

    #[test]
    fn display_cannot_close_a_trailing_backslash() {
        let attrs: Attributes = [("path", r"C:\dir\")].into_iter().collect();
        assert!(matches!(
            crate::parse(&attrs.to_string()),
            Err(KvError::UnterminatedQuote { quote: '"', .. })
        ));
    }

    #[test]
    fn content_shorthand() {
        let attrs = Attributes::content(" text");
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.text("content"), Some(" text"));
    }

    #[test]
    fn extend_from_overrides() {
        let mut base: Attributes = [("a", "1"), ("b", "2")].into_iter().collect();
        let other: Attributes = [("b", "3")].into_iter().collect();
        base.extend_from(&other);
        assert_eq!(base.text("a"), Some("1"));
        assert_eq!(base.text("b"), Some("3"));
    }
}
