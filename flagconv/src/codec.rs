//! Custom text codecs.
//!
//! A type with its own textual vocabulary implements [`TextCodec`] and binds
//! itself with [`text_codec!`](crate::text_codec). The engine then hands the
//! raw text to the codec and never applies a structural rule to the type,
//! whatever its underlying representation.

use crate::error::Result;

/// Marshal to and unmarshal from text.
///
/// Errors returned by either method are surfaced to the caller unchanged.
/// [`Error::custom`](crate::Error::custom) is the usual way to build them.
pub trait TextCodec {
    fn to_text(&self) -> Result<String>;

    fn from_text(&mut self, text: &str) -> Result<()>;
}

/// Implements [`OptionValue`](crate::OptionValue) for types that implement
/// [`TextCodec`], so every conversion of the type goes through its codec.
///
/// # Examples
///
/// ```
/// use flagconv::{decode, encode, text_codec, Error, Tag, TextCodec};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Level(u8);
///
/// impl TextCodec for Level {
///     fn to_text(&self) -> flagconv::Result<String> {
///         match self.0 {
///             0 => Ok("low".into()),
///             1 => Ok("high".into()),
///             n => Err(Error::custom(format!("invalid level {n}"))),
///         }
///     }
///
///     fn from_text(&mut self, text: &str) -> flagconv::Result<()> {
///         self.0 = match text {
///             "low" => 0,
///             "high" => 1,
///             _ => return Err(Error::custom(format!("invalid level {text:?}"))),
///         };
///         Ok(())
///     }
/// }
///
/// text_codec!(Level);
///
/// let mut level = Level::default();
/// decode("high", &mut level, &Tag::new()).unwrap();
/// assert_eq!(level, Level(1));
/// assert_eq!(encode(&level, &Tag::new()).unwrap(), "high");
/// assert!(decode("1", &mut level, &Tag::new()).is_err());
/// ```
#[macro_export]
macro_rules! text_codec {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::OptionValue for $ty {
                fn kind(&self) -> $crate::Kind<'_> {
                    $crate::Kind::Codec(self)
                }

                fn kind_mut(&mut self) -> $crate::KindMut<'_> {
                    $crate::KindMut::Codec(self)
                }
            }
        )+
    };
}
