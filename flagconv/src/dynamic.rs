//! An interface-like holder for a value whose type is chosen at runtime.

use crate::kind::{Kind, KindMut, OptionValue};
use crate::tag::Tag;
use std::fmt;

/// Holds any [`OptionValue`], or nothing.
///
/// Conversion unwraps the holder and applies the rule of the contained
/// value. An empty holder encodes to the empty string, and decoding into
/// one stores the text as a `String`.
///
/// ```
/// use flagconv::{decode, encode, Dynamic, Tag};
///
/// let tag = Tag::new();
///
/// let mut ratio = Dynamic::new(5.2f32);
/// assert_eq!(encode(&ratio, &tag).unwrap(), "5.2");
/// decode("0.25", &mut ratio, &tag).unwrap();
/// assert_eq!(encode(&ratio, &tag).unwrap(), "0.25");
/// assert!(decode("quarter", &mut ratio, &tag).is_err());
///
/// let mut anything = Dynamic::empty();
/// decode("quarter", &mut anything, &tag).unwrap();
/// assert_eq!(encode(&anything, &tag).unwrap(), "quarter");
/// ```
#[derive(Default)]
pub struct Dynamic(Option<Box<dyn OptionValue>>);

impl Dynamic {
    pub fn new<T: OptionValue + 'static>(value: T) -> Self {
        Dynamic(Some(Box::new(value)))
    }

    pub fn empty() -> Self {
        Dynamic(None)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn get(&self) -> Option<&dyn OptionValue> {
        self.0.as_deref()
    }

    pub fn get_mut(&mut self) -> Option<&mut (dyn OptionValue + 'static)> {
        self.0.as_deref_mut()
    }

    /// Replaces the contained value, changing the type used for later
    /// conversions.
    pub fn set<T: OptionValue + 'static>(&mut self, value: T) {
        self.0 = Some(Box::new(value));
    }

    pub fn take(&mut self) -> Option<Box<dyn OptionValue>> {
        self.0.take()
    }
}

impl From<Box<dyn OptionValue>> for Dynamic {
    fn from(value: Box<dyn OptionValue>) -> Self {
        Dynamic(Some(value))
    }
}

impl OptionValue for Dynamic {
    fn kind(&self) -> Kind<'_> {
        Kind::Dynamic(self.get())
    }

    fn kind_mut(&mut self) -> KindMut<'_> {
        KindMut::Dynamic(&mut self.0)
    }
}

impl fmt::Debug for Dynamic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            None => f.write_str("Dynamic(<empty>)"),
            Some(value) => match crate::encode(value, &Tag::new()) {
                Ok(text) => write!(f, "Dynamic({text:?})"),
                Err(_) => f.write_str("Dynamic(<opaque>)"),
            },
        }
    }
}
