//! Value types named at runtime.
//!
//! [`ValueType`] parses Rust-style type names such as `Vec<i32>` or
//! `HashMap<String, f64>` and instantiates empty storage for them, so a
//! conversion can be driven by a type chosen from configuration or the
//! command line rather than at compile time.

use crate::encode::encode;
use crate::error::{Error, ErrorKind, Result};
use crate::kind::{
    Entries, Kind, KindMut, MappingSlot, OptionValue, PointerSlot, SequenceSlot, is_composite,
};
use crate::tag::Tag;
use crate::Dynamic;
use chrono::TimeDelta;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// A runtime description of a bindable type.
///
/// ```
/// use flagconv::{decode, encode, Tag, ValueType};
///
/// let ty: ValueType = "HashMap<i32, f64>".parse().unwrap();
/// let mut value = ty.instantiate();
///
/// decode("{7:0.5, -2:4.5}", &mut value, &Tag::new()).unwrap();
/// assert_eq!(encode(&value, &Tag::new()).unwrap(), "{-2:4.5, 7:0.5}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    String,
    Duration,
    /// Signed elapsed time, `chrono::TimeDelta`.
    TimeDelta,
    Dynamic,
    Option(Box<ValueType>),
    Vec(Box<ValueType>),
    /// `HashMap` when `ordered` is false, `IndexMap` otherwise.
    Map {
        key: Box<ValueType>,
        value: Box<ValueType>,
        ordered: bool,
    },
}

impl ValueType {
    /// Parses a type name. Whitespace around names and commas is ignored.
    pub fn parse(name: &str) -> Result<Self> {
        let name = name.trim();
        let unknown = || {
            Error::new(
                ErrorKind::UnknownType,
                format!("unknown type {name:?}"),
            )
        };

        let Some(open) = name.find('<') else {
            return match name {
                "bool" => Ok(ValueType::Bool),
                "i8" => Ok(ValueType::I8),
                "i16" => Ok(ValueType::I16),
                "i32" => Ok(ValueType::I32),
                "i64" => Ok(ValueType::I64),
                "isize" => Ok(ValueType::Isize),
                "u8" => Ok(ValueType::U8),
                "u16" => Ok(ValueType::U16),
                "u32" => Ok(ValueType::U32),
                "u64" => Ok(ValueType::U64),
                "usize" => Ok(ValueType::Usize),
                "f32" => Ok(ValueType::F32),
                "f64" => Ok(ValueType::F64),
                "String" => Ok(ValueType::String),
                "Duration" => Ok(ValueType::Duration),
                "TimeDelta" => Ok(ValueType::TimeDelta),
                "Dynamic" => Ok(ValueType::Dynamic),
                _ => Err(unknown()),
            };
        };

        let args = name[open + 1..].strip_suffix('>').ok_or_else(unknown)?;
        let args = split_args(args);

        match (name[..open].trim(), args.as_slice()) {
            ("Option", [inner]) => Ok(ValueType::Option(Box::new(ValueType::parse(inner)?))),
            ("Vec", [inner]) => Ok(ValueType::Vec(Box::new(ValueType::parse(inner)?))),
            ("HashMap", [key, value]) => Ok(ValueType::Map {
                key: Box::new(ValueType::parse(key)?),
                value: Box::new(ValueType::parse(value)?),
                ordered: false,
            }),
            ("IndexMap", [key, value]) => Ok(ValueType::Map {
                key: Box::new(ValueType::parse(key)?),
                value: Box::new(ValueType::parse(value)?),
                ordered: true,
            }),
            _ => Err(unknown()),
        }
    }

    /// Creates empty storage of this type: zero, `false`, the empty string,
    /// a null pointer, an empty holder, or an empty collection.
    pub fn instantiate(&self) -> Box<dyn OptionValue> {
        match self {
            ValueType::Bool => Box::new(false),
            ValueType::I8 => Box::new(0i8),
            ValueType::I16 => Box::new(0i16),
            ValueType::I32 => Box::new(0i32),
            ValueType::I64 => Box::new(0i64),
            ValueType::Isize => Box::new(0isize),
            ValueType::U8 => Box::new(0u8),
            ValueType::U16 => Box::new(0u16),
            ValueType::U32 => Box::new(0u32),
            ValueType::U64 => Box::new(0u64),
            ValueType::Usize => Box::new(0usize),
            ValueType::F32 => Box::new(0f32),
            ValueType::F64 => Box::new(0f64),
            ValueType::String => Box::new(String::new()),
            ValueType::Duration => Box::new(Duration::ZERO),
            ValueType::TimeDelta => Box::new(TimeDelta::zero()),
            ValueType::Dynamic => Box::new(Dynamic::empty()),
            ValueType::Option(inner) => Box::new(RuntimeOption {
                pointee_type: (**inner).clone(),
                pointee: None,
            }),
            ValueType::Vec(element) => Box::new(RuntimeVec {
                element_type: (**element).clone(),
                items: Vec::new(),
            }),
            ValueType::Map {
                key,
                value,
                ordered,
            } => Box::new(RuntimeMap {
                key_type: (**key).clone(),
                value_type: (**value).clone(),
                ordered: *ordered,
                entries: Vec::new(),
            }),
        }
    }
}

impl ValueType {
    fn is_composite(&self) -> bool {
        is_composite(&mut *self.instantiate())
    }
}

/// Splits generic arguments on commas that are not nested in `< >`.
fn split_args(args: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, ch) in args.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&args[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&args[start..]);
    parts
}

impl FromStr for ValueType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ValueType::parse(s)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Bool => f.write_str("bool"),
            ValueType::I8 => f.write_str("i8"),
            ValueType::I16 => f.write_str("i16"),
            ValueType::I32 => f.write_str("i32"),
            ValueType::I64 => f.write_str("i64"),
            ValueType::Isize => f.write_str("isize"),
            ValueType::U8 => f.write_str("u8"),
            ValueType::U16 => f.write_str("u16"),
            ValueType::U32 => f.write_str("u32"),
            ValueType::U64 => f.write_str("u64"),
            ValueType::Usize => f.write_str("usize"),
            ValueType::F32 => f.write_str("f32"),
            ValueType::F64 => f.write_str("f64"),
            ValueType::String => f.write_str("String"),
            ValueType::Duration => f.write_str("Duration"),
            ValueType::TimeDelta => f.write_str("TimeDelta"),
            ValueType::Dynamic => f.write_str("Dynamic"),
            ValueType::Option(inner) => write!(f, "Option<{inner}>"),
            ValueType::Vec(element) => write!(f, "Vec<{element}>"),
            ValueType::Map {
                key,
                value,
                ordered,
            } => {
                let name = if *ordered { "IndexMap" } else { "HashMap" };
                write!(f, "{name}<{key}, {value}>")
            }
        }
    }
}

struct RuntimeOption {
    pointee_type: ValueType,
    pointee: Option<Box<dyn OptionValue>>,
}

impl PointerSlot for RuntimeOption {
    fn decode_with(
        &mut self,
        decode: &mut dyn FnMut(&mut dyn OptionValue) -> Result<()>,
    ) -> Result<()> {
        if let Some(pointee) = self.pointee.as_deref_mut() {
            return decode(pointee);
        }

        let mut fresh = self.pointee_type.instantiate();
        decode(&mut *fresh)?;
        self.pointee = Some(fresh);
        Ok(())
    }

    fn clear(&mut self) {
        self.pointee = None;
    }

    fn pointee_is_composite(&self) -> bool {
        self.pointee_type.is_composite()
    }
}

impl OptionValue for RuntimeOption {
    fn kind(&self) -> Kind<'_> {
        Kind::Pointer(self.pointee.as_deref())
    }

    fn kind_mut(&mut self) -> KindMut<'_> {
        KindMut::Pointer(self)
    }
}

struct RuntimeVec {
    element_type: ValueType,
    items: Vec<Box<dyn OptionValue>>,
}

impl SequenceSlot for RuntimeVec {
    fn fill(
        &mut self,
        count: usize,
        fill: &mut dyn FnMut(usize, &mut dyn OptionValue) -> Result<()>,
    ) -> Result<()> {
        let mut items = Vec::with_capacity(count);
        for i in 0..count {
            let mut item = self.element_type.instantiate();
            fill(i, &mut *item)?;
            items.push(item);
        }
        self.items = items;
        Ok(())
    }

    fn element_is_composite(&self) -> bool {
        self.element_type.is_composite()
    }
}

impl OptionValue for RuntimeVec {
    fn kind(&self) -> Kind<'_> {
        Kind::Sequence(self.items.iter().map(|item| &**item).collect())
    }

    fn kind_mut(&mut self) -> KindMut<'_> {
        KindMut::Sequence(self)
    }
}

/// Entries are kept in insertion order. Keys are compared by their
/// canonical base-10 text, since runtime values have no equality.
struct RuntimeMap {
    key_type: ValueType,
    value_type: ValueType,
    ordered: bool,
    entries: Vec<(String, Box<dyn OptionValue>, Box<dyn OptionValue>)>,
}

impl MappingSlot for RuntimeMap {
    fn fill(
        &mut self,
        count: usize,
        fill: &mut dyn FnMut(usize, &mut dyn OptionValue, &mut dyn OptionValue) -> Result<()>,
    ) -> Result<()> {
        let identity = Tag::new();
        let mut decoded = Vec::with_capacity(count);
        for i in 0..count {
            let mut key = self.key_type.instantiate();
            let mut value = self.value_type.instantiate();
            fill(i, &mut *key, &mut *value)?;
            let canonical = encode(&*key, &identity)?;
            decoded.push((canonical, key, value));
        }

        for (canonical, key, value) in decoded {
            match self.entries.iter_mut().find(|(c, _, _)| *c == canonical) {
                Some(existing) => existing.2 = value,
                None => self.entries.push((canonical, key, value)),
            }
        }
        Ok(())
    }

    fn key_is_composite(&self) -> bool {
        self.key_type.is_composite()
    }

    fn value_is_composite(&self) -> bool {
        self.value_type.is_composite()
    }
}

impl OptionValue for RuntimeMap {
    fn kind(&self) -> Kind<'_> {
        Kind::Mapping(Entries {
            pairs: self
                .entries
                .iter()
                .map(|(_, key, value)| (&**key, &**value))
                .collect(),
            ordered: self.ordered,
        })
    }

    fn kind_mut(&mut self) -> KindMut<'_> {
        KindMut::Mapping(self)
    }
}
