//! Text to value.

use crate::error::{Error, ErrorKind, Result};
use crate::kind::{KindMut, MappingSlot, OptionValue, SequenceSlot};
use crate::numeric;
use crate::tag::Tag;

/// Converts `text` and stores the result in `value`.
///
/// Decoding is atomic: on failure `value` keeps its previous contents, even
/// for sequences and mappings. A null indirection is allocated only when
/// decoding its pointee succeeds.
///
/// Sequence text may be wrapped in `[ ]` and mapping text in `{ }`.
/// Elements are split on the tag's element delimiter and the single space
/// the encoder writes after each delimiter is dropped. Mapping entries
/// split on the first key-value delimiter; an entry without one decodes its
/// value from the empty string. Brackets and braces inside an element only
/// shield delimiters when the element type is itself a sequence or mapping,
/// so string elements may contain unbalanced brackets.
///
/// Empty text that the pointee rejects decodes a pointer to null, which is
/// how the encoder writes a null pointer.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use flagconv::{decode, Tag};
///
/// let mut ints: Vec<i64> = Vec::new();
/// decode("[-3, 4, -2]", &mut ints, &Tag::new()).unwrap();
/// assert_eq!(ints, vec![-3, 4, -2]);
///
/// let mut env: HashMap<String, String> = HashMap::new();
/// let tag = Tag::new().with("key-value-delimiter", "=");
/// decode("key=value", &mut env, &tag).unwrap();
/// assert_eq!(env["key"], "value");
///
/// let mut verbose: Option<bool> = None;
/// decode("true", &mut verbose, &Tag::new()).unwrap();
/// assert_eq!(verbose, Some(true));
/// ```
pub fn decode(text: &str, value: &mut dyn OptionValue, tag: &Tag) -> Result<()> {
    let kind = value.kind_mut();
    tracing::trace!(kind = kind.name(), "decode");

    match kind {
        KindMut::Codec(codec) => codec.from_text(text),
        KindMut::Duration(mut slot) => slot.parse(text),
        KindMut::Bool(b) => {
            *b = numeric::parse_bool(text)?;
            Ok(())
        }
        KindMut::Signed(mut slot) => slot.parse(text, tag.base()?),
        KindMut::Unsigned(mut slot) => slot.parse(text, tag.base()?),
        KindMut::Float(mut slot) => slot.parse(text),
        KindMut::String(s) => {
            text.clone_into(s);
            Ok(())
        }
        KindMut::Pointer(slot) => {
            let result = slot.decode_with(&mut |pointee| decode(text, pointee, tag));
            match result {
                Err(err) if text.is_empty() && resets_pointer(&err) => {
                    slot.clear();
                    Ok(())
                }
                result => result,
            }
        }
        KindMut::Dynamic(holder) => {
            if let Some(inner) = holder.as_deref_mut() {
                return decode(text, inner, tag);
            }
            *holder = Some(Box::new(text.to_string()));
            Ok(())
        }
        KindMut::Sequence(slot) => decode_sequence(text, slot, tag),
        KindMut::Mapping(slot) => decode_mapping(text, slot, tag),
        KindMut::Unsupported(type_name) => Err(Error::unsupported(type_name)),
    }
}

/// Configuration errors still surface for empty text.
fn resets_pointer(err: &Error) -> bool {
    !matches!(err.kind(), ErrorKind::InvalidBase | ErrorKind::Unsupported)
}

fn decode_sequence(text: &str, slot: &mut dyn SequenceSlot, tag: &Tag) -> Result<()> {
    let nested = slot.element_is_composite();
    let pieces = split_elements(text, '[', ']', tag.element_delimiter(), nested);

    if let Some(expected) = slot.fixed_len()
        && expected != pieces.len()
    {
        return Err(Error::new(
            ErrorKind::LengthMismatch,
            format!(
                "expected {} elements, found {} in {:?}",
                expected,
                pieces.len(),
                text
            ),
        ));
    }

    slot.fill(pieces.len(), &mut |i, element| decode(pieces[i], element, tag))
}

fn decode_mapping(text: &str, slot: &mut dyn MappingSlot, tag: &Tag) -> Result<()> {
    let kv = tag.key_value_delimiter();
    let nested_key = slot.key_is_composite();
    let nested = nested_key || slot.value_is_composite();
    let entries: Vec<(&str, &str)> =
        split_elements(text, '{', '}', tag.element_delimiter(), nested)
            .into_iter()
            .map(|entry| match find_delimiter(entry, kv, nested_key) {
                Some(i) => (&entry[..i], &entry[i + kv.len()..]),
                None => (entry, ""),
            })
            .collect();

    slot.fill(entries.len(), &mut |i, key, value| {
        let (key_text, value_text) = entries[i];
        decode(key_text, key, tag)?;
        decode(value_text, value, tag)
    })
}

/// Splits the body of a sequence or mapping literal into its elements.
/// With `nested`, delimiters inside `[ ]` or `{ }` do not split.
fn split_elements<'t>(
    text: &'t str,
    open: char,
    close: char,
    delimiter: &str,
    nested: bool,
) -> Vec<&'t str> {
    let body = text
        .strip_prefix(open)
        .and_then(|inner| inner.strip_suffix(close))
        .unwrap_or(text);

    if body.is_empty() {
        return Vec::new();
    }

    let mut pieces = Vec::new();
    let mut rest = body;
    while let Some(i) = find_delimiter(rest, delimiter, nested) {
        pieces.push(&rest[..i]);
        let after = &rest[i + delimiter.len()..];
        rest = after.strip_prefix(' ').unwrap_or(after);
    }
    pieces.push(rest);
    pieces
}

/// Byte offset of the first `needle`, skipping any nested inside `[ ]` or
/// `{ }` when `nested` is set.
fn find_delimiter(text: &str, needle: &str, nested: bool) -> Option<usize> {
    if !nested {
        return text.find(needle);
    }

    let mut depth = 0usize;
    for (i, ch) in text.char_indices() {
        if depth == 0 && text[i..].starts_with(needle) {
            return Some(i);
        }
        match ch {
            '[' | '{' => depth += 1,
            ']' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    None
}
