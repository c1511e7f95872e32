/// Primitive flavor of a scalar type.
///
/// Fields whose type is primitive are always required. An optional wrapper
/// around a primitive gives the field an
/// [`OptionalPrimitive`](crate::descriptor::FieldShape::OptionalPrimitive)
/// shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Bool,
    Char,
    /// Integers of at most 32 bits.
    Integer,
    /// 64 bit and pointer sized integers.
    Long,
    /// Floating point numbers.
    Double,
}

impl Primitive {
    /// Returns `true` for the numeric flavors.
    #[inline]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Long | Self::Double)
    }
}
