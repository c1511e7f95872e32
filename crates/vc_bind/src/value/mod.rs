//! The canonical in-memory value both mappers produce and consume.
//!
//! A [`Value`] is not a byte format: it implements
//! [`serde_core::Serialize`] and [`serde_core::Deserialize`], so any serde
//! format can be layered on top of the canonical forms.

// -----------------------------------------------------------------------------
// Modules

mod serde;

// -----------------------------------------------------------------------------
// Value

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

/// A canonical value.
///
/// Array form uses [`Value::Seq`] for records and unions, map form uses
/// [`Value::Map`]. [`Value::Null`] is the explicit no-value marker.
///
/// # Examples
///
/// ```
/// use vc_bind::value::Value;
///
/// let seq = Value::from([1, 2]);
/// assert_eq!(seq.as_seq().map(<[_]>::len), Some(2));
///
/// let map = Value::from_iter([("r", Value::from(5))]);
/// assert_eq!(map.get("r"), Some(&Value::Int(5)));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    Str(String),
    Seq(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// A short name of the variant, used in fault messages.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "signed integer",
            Self::UInt(_) => "unsigned integer",
            Self::Float(_) => "float",
            Self::Char(_) => "char",
            Self::Str(_) => "string",
            Self::Seq(_) => "sequence",
            Self::Map(_) => "map",
        }
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Self::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Looks up a key of a [`Value::Map`].
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|entries| entries.get(key))
    }
}

// -----------------------------------------------------------------------------
// Conversions

macro_rules! impl_from {
    ($variant:ident: $($ty:ty),* => $map:expr) => {$(
        impl From<$ty> for Value {
            #[inline]
            fn from(value: $ty) -> Self {
                Self::$variant($map(value))
            }
        }
    )*};
}

impl_from!(Int: i8, i16, i32, i64 => i64::from);
impl_from!(UInt: u8, u16, u32, u64 => u64::from);
impl_from!(Float: f32, f64 => f64::from);
impl_from!(Bool: bool => core::convert::identity);
impl_from!(Char: char => core::convert::identity);
impl_from!(Str: String => core::convert::identity);

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Self::Str(String::from(value))
    }
}

impl From<Vec<Value>> for Value {
    #[inline]
    fn from(items: Vec<Value>) -> Self {
        Self::Seq(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    #[inline]
    fn from(entries: BTreeMap<String, Value>) -> Self {
        Self::Map(entries)
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(items: [T; N]) -> Self {
        Self::Seq(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::Seq(iter.into_iter().collect())
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self::Map(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::Value;
    use alloc::vec;

    #[test]
    fn conversions_pick_canonical_variants() {
        assert_eq!(Value::from(-3_i8), Value::Int(-3));
        assert_eq!(Value::from(3_u16), Value::UInt(3));
        assert_eq!(Value::from(1.5_f32), Value::Float(1.5));
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(
            Value::from([1, 2]),
            Value::Seq(vec![Value::Int(1), Value::Int(2)])
        );
    }

    #[test]
    fn map_lookup() {
        let value = Value::from_iter([("type", Value::from("Circle"))]);
        assert_eq!(value.get("type").and_then(Value::as_str), Some("Circle"));
        assert_eq!(value.get("r"), None);
        assert_eq!(Value::Null.get("type"), None);
        assert_eq!(value.kind_name(), "map");
    }
}
