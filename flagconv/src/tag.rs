//! Per-option tag configuration.

use crate::error::{Error, ErrorKind, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tag key holding the numeric base for integer options.
pub const BASE: &str = "base";
/// Tag key holding the separator between a mapping key and its value.
pub const KEY_VALUE_DELIMITER: &str = "key-value-delimiter";
/// Tag key holding the separator between sequence or mapping elements.
pub const ELEMENT_DELIMITER: &str = "element-delimiter";

const DEFAULT_BASE: u32 = 10;
const DEFAULT_KEY_VALUE_DELIMITER: &str = ":";
const DEFAULT_ELEMENT_DELIMITER: &str = ",";

/// Declarative configuration attached to a bound option.
///
/// Absent keys yield defaults. Present but invalid values are only reported
/// when a conversion actually needs them, so a bad `base` on a string option
/// never fails.
///
/// # Examples
///
/// ```
/// use flagconv::Tag;
///
/// let tag: Tag = r#"long:"weights" key-value-delimiter:"=""#.parse().unwrap();
///
/// assert_eq!(tag.get("long"), Some("weights"));
/// assert_eq!(tag.key_value_delimiter(), "=");
/// assert_eq!(tag.element_delimiter(), ",");
/// assert_eq!(tag.base().unwrap(), 10);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag {
    entries: IndexMap<String, String>,
}

impl Tag {
    pub fn new() -> Self {
        Tag::default()
    }

    /// Returns a copy of this tag with `key` set to `value`.
    ///
    /// ```
    /// use flagconv::Tag;
    ///
    /// let tag = Tag::new().with("base", "16");
    /// assert_eq!(tag.base().unwrap(), 16);
    /// ```
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Parses a struct-tag literal such as `long:"int" base:"16"`.
    ///
    /// Values are double-quoted and may contain `\"`, `\\`, `\n` and `\t`
    /// escapes. A repeated key keeps its first value.
    pub fn parse(literal: &str) -> Result<Self> {
        let mut entries = IndexMap::new();
        let mut rest = literal.trim_start();

        while !rest.is_empty() {
            let colon = rest.find(':').ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidTag,
                    format!("invalid tag {literal:?}: missing ':' after key"),
                )
            })?;
            let key = &rest[..colon];
            if key.is_empty() || key.contains(|c: char| c.is_whitespace() || c == '"') {
                return Err(Error::new(
                    ErrorKind::InvalidTag,
                    format!("invalid tag {literal:?}: bad key {key:?}"),
                ));
            }

            let after = &rest[colon + 1..];
            let (value, remaining) = parse_quoted(after).ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidTag,
                    format!("invalid tag {literal:?}: value for {key:?} is not a quoted string"),
                )
            })?;

            entries.entry(key.to_string()).or_insert(value);
            rest = remaining.trim_start();
        }

        Ok(Tag { entries })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The numeric base for integer conversion.
    ///
    /// The tag value is read as a decimal integer. Anything unparsable or
    /// outside `[2, 36]` is an [`ErrorKind::InvalidBase`] error.
    ///
    /// ```
    /// use flagconv::{Tag, ErrorKind};
    ///
    /// let err = Tag::new().with("base", "no").base().unwrap_err();
    /// assert_eq!(err.kind(), &ErrorKind::InvalidBase);
    /// assert!(err.message().contains("\"no\""));
    /// ```
    pub fn base(&self) -> Result<u32> {
        let Some(raw) = self.get(BASE) else {
            return Ok(DEFAULT_BASE);
        };

        let base = raw.parse::<u32>().map_err(|e| {
            Error::new(ErrorKind::InvalidBase, format!("invalid base {raw:?}: {e}"))
        })?;

        if !(2..=36).contains(&base) {
            return Err(Error::new(
                ErrorKind::InvalidBase,
                format!("invalid base {raw:?}: must be between 2 and 36"),
            ));
        }

        Ok(base)
    }

    pub fn key_value_delimiter(&self) -> &str {
        self.non_empty(KEY_VALUE_DELIMITER)
            .unwrap_or(DEFAULT_KEY_VALUE_DELIMITER)
    }

    pub fn element_delimiter(&self) -> &str {
        self.non_empty(ELEMENT_DELIMITER)
            .unwrap_or(DEFAULT_ELEMENT_DELIMITER)
    }

    fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }
}

impl FromStr for Tag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Tag::parse(s)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Tag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Tag {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Extend<(String, String)> for Tag {
    fn extend<I: IntoIterator<Item = (String, String)>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}:\"{}\"", key, escape(value))?;
        }
        Ok(())
    }
}

fn escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            '\t' => result.push_str("\\t"),
            _ => result.push(ch),
        }
    }
    result
}

/// Reads one double-quoted value off the front of `input`, returning the
/// unescaped value and the text after the closing quote.
fn parse_quoted(input: &str) -> Option<(String, &str)> {
    let body = input.strip_prefix('"')?;
    let mut value = String::new();
    let mut chars = body.char_indices();

    while let Some((i, ch)) = chars.next() {
        match ch {
            '"' => return Some((value, &body[i + 1..])),
            '\\' => match chars.next()?.1 {
                '\\' => value.push('\\'),
                '"' => value.push('"'),
                'n' => value.push('\n'),
                't' => value.push('\t'),
                _ => return None,
            },
            _ => value.push(ch),
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let tag = Tag::new();
        assert_eq!(tag.base().unwrap(), 10);
        assert_eq!(tag.key_value_delimiter(), ":");
        assert_eq!(tag.element_delimiter(), ",");
    }

    #[test]
    fn test_parse_literal() {
        let tag = Tag::parse(r#"long:"int32-base" base:"16""#).unwrap();
        assert_eq!(tag.get("long"), Some("int32-base"));
        assert_eq!(tag.base().unwrap(), 16);
    }

    #[test]
    fn test_parse_escapes() {
        let tag = Tag::parse(r#"description:"say \"hi\"\tnow""#).unwrap();
        assert_eq!(tag.get("description"), Some("say \"hi\"\tnow"));
    }

    #[test]
    fn test_parse_first_key_wins() {
        let tag = Tag::parse(r#"base:"8" base:"16""#).unwrap();
        assert_eq!(tag.base().unwrap(), 8);
    }

    #[test]
    fn test_parse_empty_literal() {
        assert!(Tag::parse("   ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_unquoted_value() {
        let err = Tag::parse("base:16").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidTag);
    }

    #[test]
    fn test_parse_rejects_unterminated_value() {
        let err = Tag::parse(r#"long:"int"#).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidTag);
    }

    #[test]
    fn test_parse_rejects_missing_colon() {
        let err = Tag::parse(r#"long"#).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidTag);
    }

    #[test]
    fn test_invalid_base_is_lazy() {
        let tag = Tag::new().with("base", "no");
        assert_eq!(tag.key_value_delimiter(), ":");
        let err = tag.base().unwrap_err();
        assert_eq!(err.message(), "invalid base \"no\": invalid digit found in string");
    }

    #[test]
    fn test_base_out_of_range() {
        for raw in ["0", "1", "37"] {
            let err = Tag::new().with("base", raw).base().unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidBase);
        }
        assert_eq!(Tag::new().with("base", "36").base().unwrap(), 36);
    }

    #[test]
    fn test_empty_delimiters_fall_back() {
        let tag = Tag::new()
            .with(KEY_VALUE_DELIMITER, "")
            .with(ELEMENT_DELIMITER, "");
        assert_eq!(tag.key_value_delimiter(), ":");
        assert_eq!(tag.element_delimiter(), ",");
    }

    #[test]
    fn test_display_round_trips() {
        let tag = Tag::new().with("long", "map").with("key-value-delimiter", "\"");
        let reparsed: Tag = tag.to_string().parse().unwrap();
        assert_eq!(reparsed, tag);
    }
}
