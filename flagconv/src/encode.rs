//! Value to text.

use crate::duration;
use crate::error::{Error, Result};
use crate::kind::{Entries, Kind, OptionValue};
use crate::numeric;
use crate::tag::Tag;

/// Converts a value to its canonical text.
///
/// The value is never modified. Sequences render as `[a, b, c]` and
/// mappings as `{k1:v1, k2:v2}`, using the tag's element and key-value
/// delimiters. Null indirections and empty dynamic holders render as the
/// empty string, which [`decode`](crate::decode) turns back into a null
/// pointer whenever the pointee rejects empty text. A pointee that accepts
/// it, such as `String`, decodes to `Some("")` instead, and a sequence
/// holding a single null pointer renders as `[]`.
///
/// # Errors
///
/// Fails when a custom codec fails, when an integer is reached and the
/// tag's `base` is invalid, or when a value has no conversion rule.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use flagconv::{encode, Tag};
///
/// let tag = Tag::new();
/// assert_eq!(encode(&vec![-3, 4, -2], &tag).unwrap(), "[-3, 4, -2]");
///
/// let weights = BTreeMap::from([(-2, 4.5), (7, 0.25)]);
/// assert_eq!(encode(&weights, &tag).unwrap(), "{-2:4.5, 7:0.25}");
///
/// let hex = Tag::new().with("base", "16");
/// assert_eq!(encode(&-5823i32, &hex).unwrap(), "-16bf");
/// ```
pub fn encode(value: &dyn OptionValue, tag: &Tag) -> Result<String> {
    let kind = value.kind();
    tracing::trace!(kind = kind.name(), "encode");

    match kind {
        Kind::Codec(codec) => codec.to_text(),
        Kind::Duration(nanos) => Ok(duration::format_nanos(nanos)),
        Kind::Bool(b) => Ok(b.to_string()),
        Kind::Signed(n) => Ok(numeric::format_signed(n, tag.base()?)),
        Kind::Unsigned(n) => Ok(numeric::format_unsigned(n, tag.base()?)),
        Kind::Float(f) => Ok(f.to_string()),
        Kind::String(s) => Ok(s.to_string()),
        Kind::Pointer(None) | Kind::Dynamic(None) => Ok(String::new()),
        Kind::Pointer(Some(inner)) | Kind::Dynamic(Some(inner)) => encode(inner, tag),
        Kind::Sequence(items) => encode_sequence(&items, tag),
        Kind::Mapping(entries) => encode_mapping(entries, tag),
        Kind::Unsupported(type_name) => Err(Error::unsupported(type_name)),
    }
}

fn separator(tag: &Tag) -> String {
    format!("{} ", tag.element_delimiter())
}

fn encode_sequence(items: &[&dyn OptionValue], tag: &Tag) -> Result<String> {
    let parts = items
        .iter()
        .map(|item| encode(*item, tag))
        .collect::<Result<Vec<_>>>()?;

    Ok(format!("[{}]", parts.join(&separator(tag))))
}

fn encode_mapping(entries: Entries<'_>, tag: &Tag) -> Result<String> {
    let mut parts = entries
        .pairs
        .iter()
        .map(|(key, value)| -> Result<(String, String)> {
            Ok((encode(*key, tag)?, encode(*value, tag)?))
        })
        .collect::<Result<Vec<_>>>()?;

    if !entries.ordered {
        parts.sort();
    }

    let kv = tag.key_value_delimiter();
    let parts: Vec<String> = parts
        .into_iter()
        .map(|(key, value)| format!("{key}{kv}{value}"))
        .collect();

    Ok(format!("{{{}}}", parts.join(&separator(tag))))
}
