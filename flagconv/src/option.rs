//! A command-line option bound to caller-owned storage.

use crate::decode::decode;
use crate::encode::encode;
use crate::error::Result;
use crate::kind::OptionValue;
use crate::tag::Tag;

/// One bound option: a name, exclusive access to the storage it writes,
/// and its tag.
///
/// Errors from [`BoundOption::encode`] and [`BoundOption::decode`] carry the
/// option name, so they can be reported to the user as they are.
///
/// ```
/// use flagconv::{BoundOption, Tag};
///
/// let mut mask: u32 = 0;
/// let tag: Tag = r#"long:"mask" base:"16""#.parse().unwrap();
///
/// let mut opt = BoundOption::new("--mask", &mut mask, tag);
/// opt.decode("ff00").unwrap();
/// assert_eq!(opt.encode().unwrap(), "ff00");
///
/// let err = opt.decode("zz").unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "invalid argument for flag `--mask': parsing \"zz\": invalid digit found in string"
/// );
///
/// drop(opt);
/// assert_eq!(mask, 0xff00);
/// ```
pub struct BoundOption<'a> {
    name: String,
    value: &'a mut dyn OptionValue,
    tag: Tag,
}

impl<'a> BoundOption<'a> {
    pub fn new(name: impl Into<String>, value: &'a mut dyn OptionValue, tag: Tag) -> Self {
        BoundOption {
            name: name.into(),
            value,
            tag,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn value(&self) -> &dyn OptionValue {
        &*self.value
    }

    /// Renders the current value, e.g. for a default-value hint in help text.
    pub fn encode(&self) -> Result<String> {
        tracing::trace!(option = %self.name, "encoding option value");
        encode(&*self.value, &self.tag).map_err(|e| e.with_option(&self.name))
    }

    /// Stores `text` into the bound value.
    pub fn decode(&mut self, text: &str) -> Result<()> {
        tracing::trace!(option = %self.name, text, "decoding option argument");
        decode(text, &mut *self.value, &self.tag).map_err(|e| e.with_option(&self.name))
    }
}
