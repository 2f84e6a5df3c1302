//! Type dispatch.
//!
//! Every bindable storage type implements [`OptionValue`], which classifies
//! the value once per conversion step into a [`Kind`] (read view, used by the
//! encoder) or a [`KindMut`] (write view, used by the decoder). The encoder
//! and decoder match on these and never inspect concrete types themselves.
//!
//! Precedence between rules is fixed by the implementations: a type bound
//! with [`text_codec!`](crate::text_codec) always reports
//! [`Kind::Codec`], so no structural rule is ever applied to it.

use crate::codec::TextCodec;
use crate::duration;
use crate::error::Result;
use crate::numeric::{self, Float};
use chrono::TimeDelta;
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use std::time::Duration;

/// Storage that can be bound to a command-line option.
///
/// Both methods have defaults that report [`Kind::Unsupported`], so a type
/// can be bound without a conversion rule and fail at conversion time:
///
/// ```
/// use flagconv::{encode, ErrorKind, OptionValue, Tag};
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl OptionValue for Point {}
///
/// let err = encode(&Point { x: 1, y: 2 }, &Tag::new()).unwrap_err();
/// assert_eq!(err.kind(), &ErrorKind::Unsupported);
/// assert!(err.message().contains("Point"));
/// ```
///
/// A named type that wants the structural rule of its representation can
/// forward to it:
///
/// ```
/// use flagconv::{encode, Kind, KindMut, OptionValue, Tag};
///
/// struct Port(u16);
///
/// impl OptionValue for Port {
///     fn kind(&self) -> Kind<'_> {
///         self.0.kind()
///     }
///
///     fn kind_mut(&mut self) -> KindMut<'_> {
///         self.0.kind_mut()
///     }
/// }
///
/// assert_eq!(encode(&Port(8080), &Tag::new()).unwrap(), "8080");
/// ```
pub trait OptionValue {
    fn kind(&self) -> Kind<'_> {
        Kind::Unsupported(std::any::type_name::<Self>())
    }

    fn kind_mut(&mut self) -> KindMut<'_> {
        KindMut::Unsupported(std::any::type_name::<Self>())
    }
}

/// Read view of a value, in dispatch precedence order.
pub enum Kind<'a> {
    Codec(&'a dyn TextCodec),
    /// Signed elapsed time in nanoseconds.
    Duration(i128),
    Bool(bool),
    Signed(i64),
    Unsigned(u64),
    Float(Float),
    String(&'a str),
    /// Optional indirection; `None` is a null pointer.
    Pointer(Option<&'a dyn OptionValue>),
    /// Interface-like holder; `None` is an empty holder.
    Dynamic(Option<&'a dyn OptionValue>),
    Sequence(Vec<&'a dyn OptionValue>),
    Mapping(Entries<'a>),
    /// No rule applies. Carries the type name for the error message.
    Unsupported(&'static str),
}

/// The entries of a mapping, borrowed for encoding.
pub struct Entries<'a> {
    pub pairs: Vec<(&'a dyn OptionValue, &'a dyn OptionValue)>,
    /// Whether iteration order is meaningful. Unordered entries are sorted
    /// by their encoded key before output.
    pub ordered: bool,
}

/// Write view of a value, in dispatch precedence order.
pub enum KindMut<'a> {
    Codec(&'a mut dyn TextCodec),
    Duration(DurationSlot<'a>),
    Bool(&'a mut bool),
    Signed(SignedSlot<'a>),
    Unsigned(UnsignedSlot<'a>),
    Float(FloatSlot<'a>),
    String(&'a mut String),
    Pointer(&'a mut dyn PointerSlot),
    Dynamic(&'a mut Option<Box<dyn OptionValue>>),
    Sequence(&'a mut dyn SequenceSlot),
    Mapping(&'a mut dyn MappingSlot),
    Unsupported(&'static str),
}

impl Kind<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Codec(_) => "codec",
            Kind::Duration(_) => "duration",
            Kind::Bool(_) => "bool",
            Kind::Signed(_) => "signed",
            Kind::Unsigned(_) => "unsigned",
            Kind::Float(_) => "float",
            Kind::String(_) => "string",
            Kind::Pointer(_) => "pointer",
            Kind::Dynamic(_) => "dynamic",
            Kind::Sequence(_) => "sequence",
            Kind::Mapping(_) => "mapping",
            Kind::Unsupported(_) => "unsupported",
        }
    }
}

impl KindMut<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            KindMut::Codec(_) => "codec",
            KindMut::Duration(_) => "duration",
            KindMut::Bool(_) => "bool",
            KindMut::Signed(_) => "signed",
            KindMut::Unsigned(_) => "unsigned",
            KindMut::Float(_) => "float",
            KindMut::String(_) => "string",
            KindMut::Pointer(_) => "pointer",
            KindMut::Dynamic(_) => "dynamic",
            KindMut::Sequence(_) => "sequence",
            KindMut::Mapping(_) => "mapping",
            KindMut::Unsupported(_) => "unsupported",
        }
    }
}

macro_rules! integer_kinds {
    ($slot:ident, $kind:ident, $wide:ty { $($variant:ident($ty:ty)),+ $(,)? }) => {
        /// Mutable integer storage of a specific width.
        pub enum $slot<'a> {
            $($variant(&'a mut $ty),)+
        }

        impl $slot<'_> {
            /// Parses `text` in `base` directly at the slot's width, so
            /// out-of-range literals are rejected rather than truncated.
            pub fn parse(&mut self, text: &str, base: u32) -> Result<()> {
                match self {
                    $(
                        $slot::$variant(v) => {
                            **v = <$ty>::from_str_radix(text, base)
                                .map_err(|e| numeric::int_error(text, &e))?;
                        }
                    )+
                }
                Ok(())
            }
        }

        $(
            impl OptionValue for $ty {
                #[allow(clippy::unnecessary_cast)]
                fn kind(&self) -> Kind<'_> {
                    Kind::$kind(*self as $wide)
                }

                fn kind_mut(&mut self) -> KindMut<'_> {
                    KindMut::$kind($slot::$variant(self))
                }
            }
        )+
    };
}

integer_kinds!(SignedSlot, Signed, i64 {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Isize(isize),
});

integer_kinds!(UnsignedSlot, Unsigned, u64 {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Usize(usize),
});

/// Mutable floating point storage.
pub enum FloatSlot<'a> {
    F32(&'a mut f32),
    F64(&'a mut f64),
}

impl FloatSlot<'_> {
    pub fn parse(&mut self, text: &str) -> Result<()> {
        match self {
            FloatSlot::F32(v) => **v = text.parse().map_err(|_| numeric::float_error(text))?,
            FloatSlot::F64(v) => **v = text.parse().map_err(|_| numeric::float_error(text))?,
        }
        Ok(())
    }
}

impl OptionValue for f32 {
    fn kind(&self) -> Kind<'_> {
        Kind::Float(Float::F32(*self))
    }

    fn kind_mut(&mut self) -> KindMut<'_> {
        KindMut::Float(FloatSlot::F32(self))
    }
}

impl OptionValue for f64 {
    fn kind(&self) -> Kind<'_> {
        Kind::Float(Float::F64(*self))
    }

    fn kind_mut(&mut self) -> KindMut<'_> {
        KindMut::Float(FloatSlot::F64(self))
    }
}

impl OptionValue for bool {
    fn kind(&self) -> Kind<'_> {
        Kind::Bool(*self)
    }

    fn kind_mut(&mut self) -> KindMut<'_> {
        KindMut::Bool(self)
    }
}

impl OptionValue for String {
    fn kind(&self) -> Kind<'_> {
        Kind::String(self)
    }

    fn kind_mut(&mut self) -> KindMut<'_> {
        KindMut::String(self)
    }
}

/// Mutable elapsed-time storage.
pub enum DurationSlot<'a> {
    /// Non-negative; negative literals are rejected.
    Std(&'a mut Duration),
    /// Signed, limited to 64 bits of nanoseconds.
    Delta(&'a mut TimeDelta),
}

impl DurationSlot<'_> {
    pub fn parse(&mut self, text: &str) -> Result<()> {
        match self {
            DurationSlot::Std(d) => **d = duration::parse(text)?,
            DurationSlot::Delta(d) => **d = duration::parse_delta(text)?,
        }
        Ok(())
    }
}

impl OptionValue for Duration {
    fn kind(&self) -> Kind<'_> {
        Kind::Duration(self.as_nanos() as i128)
    }

    fn kind_mut(&mut self) -> KindMut<'_> {
        KindMut::Duration(DurationSlot::Std(self))
    }
}

impl OptionValue for TimeDelta {
    fn kind(&self) -> Kind<'_> {
        Kind::Duration(duration::delta_nanos(*self))
    }

    fn kind_mut(&mut self) -> KindMut<'_> {
        KindMut::Duration(DurationSlot::Delta(self))
    }
}

/// Whether text for `value` may hold nested sequence or mapping literals.
/// Only then does the decoder look for matching brackets while splitting.
pub(crate) fn is_composite(value: &mut dyn OptionValue) -> bool {
    match value.kind_mut() {
        KindMut::Sequence(_) | KindMut::Mapping(_) => true,
        KindMut::Pointer(slot) => slot.pointee_is_composite(),
        KindMut::Dynamic(holder) => holder.as_deref_mut().is_some_and(|inner| is_composite(inner)),
        _ => false,
    }
}

fn composite<T: OptionValue + Default>() -> bool {
    is_composite(&mut T::default())
}

/// Optional indirection that can allocate its pointee on demand.
pub trait PointerSlot {
    /// Runs `decode` against the pointee. A missing pointee is allocated
    /// fresh and only stored once `decode` succeeds.
    fn decode_with(
        &mut self,
        decode: &mut dyn FnMut(&mut dyn OptionValue) -> Result<()>,
    ) -> Result<()>;

    /// Resets the indirection to null.
    fn clear(&mut self);

    /// Whether the pointee is a sequence or mapping.
    fn pointee_is_composite(&self) -> bool;
}

impl<T: OptionValue + Default> PointerSlot for Option<T> {
    fn decode_with(
        &mut self,
        decode: &mut dyn FnMut(&mut dyn OptionValue) -> Result<()>,
    ) -> Result<()> {
        if let Some(pointee) = self {
            return decode(pointee);
        }

        let mut fresh = T::default();
        decode(&mut fresh)?;
        *self = Some(fresh);
        Ok(())
    }

    fn clear(&mut self) {
        *self = None;
    }

    fn pointee_is_composite(&self) -> bool {
        composite::<T>()
    }
}

impl<T: OptionValue + Default> OptionValue for Option<T> {
    fn kind(&self) -> Kind<'_> {
        Kind::Pointer(self.as_ref().map(|v| v as &dyn OptionValue))
    }

    fn kind_mut(&mut self) -> KindMut<'_> {
        KindMut::Pointer(self)
    }
}

// Owning boxes are transparent.
impl<T: OptionValue + ?Sized> OptionValue for Box<T> {
    fn kind(&self) -> Kind<'_> {
        (**self).kind()
    }

    fn kind_mut(&mut self) -> KindMut<'_> {
        (**self).kind_mut()
    }
}

/// Sequence storage that is rebuilt from freshly decoded elements.
pub trait SequenceSlot {
    /// The exact element count the storage requires, if fixed.
    fn fixed_len(&self) -> Option<usize> {
        None
    }

    /// Whether elements are themselves sequences or mappings.
    fn element_is_composite(&self) -> bool;

    /// Builds `count` default elements, runs `fill` on each in order and
    /// replaces the contents only if every call succeeds.
    fn fill(
        &mut self,
        count: usize,
        fill: &mut dyn FnMut(usize, &mut dyn OptionValue) -> Result<()>,
    ) -> Result<()>;
}

impl<T: OptionValue + Default> SequenceSlot for Vec<T> {
    fn fill(
        &mut self,
        count: usize,
        fill: &mut dyn FnMut(usize, &mut dyn OptionValue) -> Result<()>,
    ) -> Result<()> {
        let mut items = Vec::with_capacity(count);
        for i in 0..count {
            let mut item = T::default();
            fill(i, &mut item)?;
            items.push(item);
        }
        *self = items;
        Ok(())
    }

    fn element_is_composite(&self) -> bool {
        composite::<T>()
    }
}

impl<T: OptionValue + Default> OptionValue for Vec<T> {
    fn kind(&self) -> Kind<'_> {
        Kind::Sequence(self.iter().map(|v| v as &dyn OptionValue).collect())
    }

    fn kind_mut(&mut self) -> KindMut<'_> {
        KindMut::Sequence(self)
    }
}

impl<T: OptionValue + Default, const N: usize> SequenceSlot for [T; N] {
    fn fixed_len(&self) -> Option<usize> {
        Some(N)
    }

    fn element_is_composite(&self) -> bool {
        composite::<T>()
    }

    fn fill(
        &mut self,
        _count: usize,
        fill: &mut dyn FnMut(usize, &mut dyn OptionValue) -> Result<()>,
    ) -> Result<()> {
        let mut items: [T; N] = std::array::from_fn(|_| T::default());
        for (i, item) in items.iter_mut().enumerate() {
            fill(i, item)?;
        }
        *self = items;
        Ok(())
    }
}

impl<T: OptionValue + Default, const N: usize> OptionValue for [T; N] {
    fn kind(&self) -> Kind<'_> {
        Kind::Sequence(self.iter().map(|v| v as &dyn OptionValue).collect())
    }

    fn kind_mut(&mut self) -> KindMut<'_> {
        KindMut::Sequence(self)
    }
}

/// Mapping storage that receives freshly decoded entries.
pub trait MappingSlot {
    /// Builds `count` default key/value pairs and runs `fill` on each in
    /// order. Entries are inserted only if every call succeeds; a later
    /// entry overwrites an earlier one with an equal key.
    fn fill(
        &mut self,
        count: usize,
        fill: &mut dyn FnMut(usize, &mut dyn OptionValue, &mut dyn OptionValue) -> Result<()>,
    ) -> Result<()>;

    fn key_is_composite(&self) -> bool;

    fn value_is_composite(&self) -> bool;
}

fn decode_entries<K, V>(
    count: usize,
    fill: &mut dyn FnMut(usize, &mut dyn OptionValue, &mut dyn OptionValue) -> Result<()>,
) -> Result<Vec<(K, V)>>
where
    K: OptionValue + Default,
    V: OptionValue + Default,
{
    let mut entries = Vec::with_capacity(count);
    for i in 0..count {
        let mut key = K::default();
        let mut value = V::default();
        fill(i, &mut key, &mut value)?;
        entries.push((key, value));
    }
    Ok(entries)
}

fn borrow_entries<'a, K, V, I>(iter: I, ordered: bool) -> Entries<'a>
where
    K: OptionValue + 'a,
    V: OptionValue + 'a,
    I: Iterator<Item = (&'a K, &'a V)>,
{
    Entries {
        pairs: iter
            .map(|(k, v)| (k as &dyn OptionValue, v as &dyn OptionValue))
            .collect(),
        ordered,
    }
}

impl<K, V, S> MappingSlot for HashMap<K, V, S>
where
    K: OptionValue + Default + Eq + Hash,
    V: OptionValue + Default,
    S: BuildHasher,
{
    fn fill(
        &mut self,
        count: usize,
        fill: &mut dyn FnMut(usize, &mut dyn OptionValue, &mut dyn OptionValue) -> Result<()>,
    ) -> Result<()> {
        let entries = decode_entries::<K, V>(count, fill)?;
        self.extend(entries);
        Ok(())
    }

    fn key_is_composite(&self) -> bool {
        composite::<K>()
    }

    fn value_is_composite(&self) -> bool {
        composite::<V>()
    }
}

impl<K, V, S> OptionValue for HashMap<K, V, S>
where
    K: OptionValue + Default + Eq + Hash,
    V: OptionValue + Default,
    S: BuildHasher,
{
    fn kind(&self) -> Kind<'_> {
        Kind::Mapping(borrow_entries(self.iter(), false))
    }

    fn kind_mut(&mut self) -> KindMut<'_> {
        KindMut::Mapping(self)
    }
}

impl<K, V> MappingSlot for BTreeMap<K, V>
where
    K: OptionValue + Default + Ord,
    V: OptionValue + Default,
{
    fn fill(
        &mut self,
        count: usize,
        fill: &mut dyn FnMut(usize, &mut dyn OptionValue, &mut dyn OptionValue) -> Result<()>,
    ) -> Result<()> {
        let entries = decode_entries::<K, V>(count, fill)?;
        self.extend(entries);
        Ok(())
    }

    fn key_is_composite(&self) -> bool {
        composite::<K>()
    }

    fn value_is_composite(&self) -> bool {
        composite::<V>()
    }
}

impl<K, V> OptionValue for BTreeMap<K, V>
where
    K: OptionValue + Default + Ord,
    V: OptionValue + Default,
{
    fn kind(&self) -> Kind<'_> {
        Kind::Mapping(borrow_entries(self.iter(), true))
    }

    fn kind_mut(&mut self) -> KindMut<'_> {
        KindMut::Mapping(self)
    }
}

impl<K, V, S> MappingSlot for IndexMap<K, V, S>
where
    K: OptionValue + Default + Eq + Hash,
    V: OptionValue + Default,
    S: BuildHasher,
{
    fn fill(
        &mut self,
        count: usize,
        fill: &mut dyn FnMut(usize, &mut dyn OptionValue, &mut dyn OptionValue) -> Result<()>,
    ) -> Result<()> {
        let entries = decode_entries::<K, V>(count, fill)?;
        self.extend(entries);
        Ok(())
    }

    fn key_is_composite(&self) -> bool {
        composite::<K>()
    }

    fn value_is_composite(&self) -> bool {
        composite::<V>()
    }
}

impl<K, V, S> OptionValue for IndexMap<K, V, S>
where
    K: OptionValue + Default + Eq + Hash,
    V: OptionValue + Default,
    S: BuildHasher,
{
    fn kind(&self) -> Kind<'_> {
        Kind::Mapping(borrow_entries(self.iter(), true))
    }

    fn kind_mut(&mut self) -> KindMut<'_> {
        KindMut::Mapping(self)
    }
}
