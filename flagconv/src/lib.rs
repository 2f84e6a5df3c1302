//! Value to text conversion for command-line option binding.
//!
//! `flagconv` converts the storage bound to a command-line option into its
//! canonical text, and converts an argument string back into that storage.
//! Conversion is driven by the storage's type and by a per-option [`Tag`]
//! that configures the numeric base and collection delimiters.
//!
//! # Features
//!
//! - **Primitive kinds**: booleans, signed and unsigned integers in any base
//!   from 2 to 36, floats in their shortest round-trip form, strings
//! - **Durations**: `std::time::Duration` and the signed `chrono::TimeDelta`
//!   as `1h2m4s`, `-1.5s`, `300ms`
//! - **Indirection**: `Option<T>` allocates on decode; [`Dynamic`] holds a
//!   value whose type is picked at runtime
//! - **Collections**: `Vec<T>`, `[T; N]`, `HashMap`, `BTreeMap`, `IndexMap`
//! - **Custom codecs**: types with their own text vocabulary implement
//!   [`TextCodec`], which overrides every structural rule
//!
//! # Usage
//!
//! ## Encoding
//!
//! ```
//! use std::time::Duration;
//! use flagconv::{encode, Tag};
//!
//! let tag = Tag::new();
//!
//! assert_eq!(encode(&-2i32, &tag).unwrap(), "-2");
//! assert_eq!(encode(&1.2f32, &tag).unwrap(), "1.2");
//! assert_eq!(encode(&Duration::from_secs(3724), &tag).unwrap(), "1h2m4s");
//! assert_eq!(encode(&vec![-3, 4, -2], &tag).unwrap(), "[-3, 4, -2]");
//! assert_eq!(encode(&Some(false), &tag).unwrap(), "false");
//! ```
//!
//! ## Decoding
//!
//! ```
//! use std::collections::HashMap;
//! use flagconv::{decode, Tag};
//!
//! let mut limits: HashMap<String, u32> = HashMap::new();
//! decode("{cpu:4, mem:512}", &mut limits, &Tag::new()).unwrap();
//!
//! assert_eq!(limits["cpu"], 4);
//! assert_eq!(limits["mem"], 512);
//! ```
//!
//! # Tags
//!
//! Tags are written in struct-tag syntax and read lazily, so a bad value is
//! only reported by a conversion that needs it:
//!
//! ```
//! use flagconv::{decode, encode, Tag};
//!
//! let tag: Tag = r#"long:"mask" base:"16""#.parse().unwrap();
//! assert_eq!(encode(&4232u32, &tag).unwrap(), "1088");
//!
//! let broken: Tag = r#"base:"no""#.parse().unwrap();
//! let mut name = String::new();
//! decode("ok", &mut name, &broken).unwrap();
//! assert!(encode(&2i64, &broken).is_err());
//! ```
//!
//! | Key | Default | Used by |
//! |---|---|---|
//! | `base` | `10` | integers |
//! | `element-delimiter` | `,` | sequences, mappings |
//! | `key-value-delimiter` | `:` | mappings |
//!
//! # Error Handling
//!
//! Every failure is an [`Error`] whose [`kind`](Error::kind) names the
//! cause. Decoding never leaves a half-written collection behind:
//!
//! ```
//! use flagconv::{decode, ErrorKind, Tag};
//!
//! let mut ports: Vec<u16> = vec![80];
//! let err = decode("[8080, 99999]", &mut ports, &Tag::new()).unwrap_err();
//!
//! assert_eq!(err.kind(), &ErrorKind::OutOfRange);
//! assert_eq!(ports, vec![80]);
//! ```

pub mod codec;
pub mod decode;
pub mod duration;
pub mod dynamic;
pub mod encode;
pub mod error;
pub mod kind;
pub mod numeric;
pub mod option;
pub mod schema;
pub mod tag;

pub use codec::TextCodec;
pub use decode::decode;
pub use dynamic::Dynamic;
pub use encode::encode;
pub use error::{Error, ErrorKind, Result};
pub use kind::{
    DurationSlot, Entries, FloatSlot, Kind, KindMut, MappingSlot, OptionValue, PointerSlot,
    SequenceSlot, SignedSlot, UnsignedSlot,
};
pub use option::BoundOption;
pub use schema::ValueType;
pub use tag::Tag;
