use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

use crate::Fault;
use crate::decl::Instance;
use crate::info::Type;
use crate::value::Value;

// -----------------------------------------------------------------------------
// WireType

/// The canonical scalar a native type reduces to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireType {
    Bool,
    Char,
    Int,
    UInt,
    Float,
    Str,
}

impl WireType {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Char => "char",
            Self::Int => "signed integer",
            Self::UInt => "unsigned integer",
            Self::Float => "float",
            Self::Str => "string",
        }
    }
}

// -----------------------------------------------------------------------------
// WireScalar

/// A native type that maps directly onto a canonical scalar.
///
/// Decoding is lenient across numeric variants as long as the value fits
/// the target, so `Value::UInt(5)` decodes into an `i32`.
pub trait WireScalar: Sized + Send + Sync + 'static {
    const WIRE: WireType;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self, Fault>;
}

#[inline]
fn mismatch(expected: WireType, found: &Value) -> Fault {
    Fault::Mismatch {
        expected: expected.name(),
        found: found.kind_name(),
    }
}

fn out_of_range<T>(value: impl ToString) -> Fault {
    Fault::OutOfRange {
        target: core::any::type_name::<T>(),
        value: value.to_string(),
    }
}

macro_rules! impl_wire_int {
    ($wire:ident => $($ty:ty),*) => {$(
        impl WireScalar for $ty {
            const WIRE: WireType = WireType::$wire;

            #[inline]
            fn to_value(&self) -> Value {
                Value::$wire((*self).try_into().unwrap_or_default())
            }

            fn from_value(value: Value) -> Result<Self, Fault> {
                match value {
                    Value::Int(v) => <$ty>::try_from(v).map_err(|_| out_of_range::<$ty>(v)),
                    Value::UInt(v) => <$ty>::try_from(v).map_err(|_| out_of_range::<$ty>(v)),
                    other => Err(mismatch(Self::WIRE, &other)),
                }
            }
        }
    )*};
}

impl_wire_int!(Int => i8, i16, i32, i64, isize);
impl_wire_int!(UInt => u8, u16, u32, u64, usize);

impl WireScalar for f64 {
    const WIRE: WireType = WireType::Float;

    #[inline]
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn from_value(value: Value) -> Result<Self, Fault> {
        match value {
            Value::Float(v) => Ok(v),
            Value::Int(v) => Ok(v as f64),
            Value::UInt(v) => Ok(v as f64),
            other => Err(mismatch(Self::WIRE, &other)),
        }
    }
}

impl WireScalar for f32 {
    const WIRE: WireType = WireType::Float;

    #[inline]
    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }

    fn from_value(value: Value) -> Result<Self, Fault> {
        let wide = f64::from_value(value)?;
        if wide.is_finite() && wide.abs() > f64::from(f32::MAX) {
            return Err(out_of_range::<f32>(wide));
        }
        Ok(wide as f32)
    }
}

impl WireScalar for bool {
    const WIRE: WireType = WireType::Bool;

    #[inline]
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self, Fault> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(mismatch(Self::WIRE, &other)),
        }
    }
}

impl WireScalar for char {
    const WIRE: WireType = WireType::Char;

    #[inline]
    fn to_value(&self) -> Value {
        Value::Char(*self)
    }

    // Text formats carry chars as one-character strings.
    fn from_value(value: Value) -> Result<Self, Fault> {
        match value {
            Value::Char(v) => Ok(v),
            Value::Str(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(c),
                    _ => Err(out_of_range::<char>(format_args!("{s:?}"))),
                }
            }
            other => Err(mismatch(Self::WIRE, &other)),
        }
    }
}

impl WireScalar for String {
    const WIRE: WireType = WireType::Str;

    #[inline]
    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, Fault> {
        match value {
            Value::Str(v) => Ok(v),
            Value::Char(c) => Ok(String::from(c)),
            other => Err(mismatch(Self::WIRE, &other)),
        }
    }
}

// -----------------------------------------------------------------------------
// ScalarCodec

type EncodeFn = dyn Fn(&dyn Any) -> Result<Value, Fault> + Send + Sync;
type DecodeFn = dyn Fn(Value) -> Result<Instance, Fault> + Send + Sync;

/// A pair of pure functions between a native type and a canonical scalar.
///
/// # Examples
///
/// ```
/// use vc_bind::scalar::{ScalarCodec, WireType};
/// use vc_bind::value::Value;
///
/// struct Celsius(f64);
///
/// let codec = ScalarCodec::bridge::<Celsius, f64>(|c| Ok(c.0), |v| Ok(Celsius(v)));
/// assert_eq!(codec.wire(), WireType::Float);
/// assert_eq!(codec.encode(&Celsius(21.5)), Ok(Value::Float(21.5)));
///
/// let back = codec.decode(Value::Int(20)).unwrap();
/// assert_eq!(back.downcast_ref::<Celsius>().map(|c| c.0), Some(20.0));
/// ```
#[derive(Clone)]
pub struct ScalarCodec {
    native: Type,
    wire: WireType,
    identity: bool,
    encode: Arc<EncodeFn>,
    decode: Arc<DecodeFn>,
}

impl ScalarCodec {
    /// Creates a codec from raw encode and decode functions.
    pub fn new<T: Any + Send + Sync>(
        wire: WireType,
        encode: impl Fn(&T) -> Result<Value, Fault> + Send + Sync + 'static,
        decode: impl Fn(Value) -> Result<T, Fault> + Send + Sync + 'static,
    ) -> Self {
        Self {
            native: Type::opaque::<T>(),
            wire,
            identity: false,
            encode: Arc::new(move |value: &dyn Any| {
                let value = value.downcast_ref::<T>().ok_or_else(Fault::native::<T>)?;
                encode(value)
            }),
            decode: Arc::new(move |value: Value| Ok(Box::new(decode(value)?) as Instance)),
        }
    }

    /// The codec of a type that is its own wire scalar.
    pub fn identity<T: WireScalar>() -> Self {
        let mut codec = Self::new::<T>(T::WIRE, |v: &T| Ok(v.to_value()), T::from_value);
        codec.identity = true;
        codec
    }

    /// A codec reducing `T` to another scalar `W`.
    pub fn bridge<T: Any + Send + Sync, W: WireScalar>(
        encode: impl Fn(&T) -> Result<W, Fault> + Send + Sync + 'static,
        decode: impl Fn(W) -> Result<T, Fault> + Send + Sync + 'static,
    ) -> Self {
        Self::new::<T>(
            W::WIRE,
            move |value: &T| encode(value).map(|wire| wire.to_value()),
            move |value: Value| decode(W::from_value(value)?),
        )
    }

    #[inline]
    pub fn native(&self) -> &Type {
        &self.native
    }

    #[inline]
    pub fn wire(&self) -> WireType {
        self.wire
    }

    /// Returns `true` if encoding does not change the representation.
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.identity
    }

    #[inline]
    pub fn encode(&self, value: &dyn Any) -> Result<Value, Fault> {
        (self.encode)(value)
    }

    #[inline]
    pub fn decode(&self, value: Value) -> Result<Instance, Fault> {
        (self.decode)(value)
    }
}

impl fmt::Debug for ScalarCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarCodec")
            .field("native", &self.native)
            .field("wire", &self.wire)
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::{ScalarCodec, WireScalar};
    use crate::Fault;
    use crate::value::Value;

    #[test]
    fn integers_accept_any_fitting_variant() {
        assert_eq!(i32::from_value(Value::UInt(5)), Ok(5));
        assert_eq!(u8::from_value(Value::Int(255)), Ok(255));
        assert!(matches!(
            u8::from_value(Value::Int(-1)),
            Err(Fault::OutOfRange { .. })
        ));
        assert!(matches!(
            i64::from_value(Value::UInt(u64::MAX)),
            Err(Fault::OutOfRange { .. })
        ));
        assert_eq!(
            i32::from_value(Value::from("bad")),
            Err(Fault::Mismatch {
                expected: "signed integer",
                found: "string",
            })
        );
        assert!(i32::from_value(Value::Float(1.0)).is_err());
    }

    #[test]
    fn floats_and_text() {
        assert_eq!(f64::from_value(Value::Int(-2)), Ok(-2.0));
        assert!(f32::from_value(Value::Float(1e300)).is_err());
        assert_eq!(char::from_value(Value::from("x")), Ok('x'));
        assert!(char::from_value(Value::from("xy")).is_err());
        assert_eq!(u64::MAX.to_value(), Value::UInt(u64::MAX));
    }

    #[test]
    fn identity_codec_round_trip() {
        let codec = ScalarCodec::identity::<u16>();
        assert!(codec.is_identity());
        let value = codec.encode(&7_u16).unwrap();
        assert_eq!(value, Value::UInt(7));
        let back = codec.decode(value).unwrap();
        assert_eq!(back.downcast_ref::<u16>(), Some(&7));
        assert_eq!(codec.encode(&7_i16), Err(Fault::native::<u16>()));
    }
}
