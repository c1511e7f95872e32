//! Resolved structural descriptions of types.
//!
//! A [`Descriptor`] is one of four kinds:
//!
//! - [`AtomInfo`]: a scalar with an encode/decode pair.
//! - [`RecordInfo`]: an ordered list of named [`Field`]s.
//! - [`ArrayInfo`]: a homogeneous sequence with an iteration protocol.
//! - [`UnionInfo`]: a sealed or open set of member types.
//!
//! Descriptors are immutable once published by the
//! [`TypeContext`](crate::context::TypeContext), except for the member list of
//! an open union, which only grows.

// -----------------------------------------------------------------------------
// Modules

mod array;
mod atom;
mod record;
mod slot;
mod union;

// -----------------------------------------------------------------------------
// Exports

pub use array::ArrayInfo;
pub use atom::AtomInfo;
pub use record::{DataRef, Field, FieldOrigin, FieldShape, Nested, RecordInfo, Slate};
pub use slot::Slot;
pub use union::{UnionInfo, UnionMember};

// -----------------------------------------------------------------------------
// Kind

use alloc::sync::Arc;
use core::fmt;

use thiserror::Error;

use crate::info::{Type, TypeHandle};

/// The kind of a [`Descriptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Atom,
    Record,
    Array,
    Union,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atom => f.pad("Atom"),
            Self::Record => f.pad("Record"),
            Self::Array => f.pad("Array"),
            Self::Union => f.pad("Union"),
        }
    }
}

/// Error returned when a [`Descriptor`] is not of the expected [`Kind`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("descriptor kind mismatch: expected {expected}, received {received}")]
pub struct KindError {
    pub expected: Kind,
    pub received: Kind,
}

// -----------------------------------------------------------------------------
// Descriptor

/// The resolved description of a type.
///
/// Cloning is cheap, every variant is reference counted.
#[derive(Debug, Clone)]
pub enum Descriptor {
    Atom(Arc<AtomInfo>),
    Record(Arc<RecordInfo>),
    Array(Arc<ArrayInfo>),
    Union(Arc<UnionInfo>),
}

macro_rules! impl_cast_method {
    ($name:ident : $kind:ident => $info:ident) => {
        #[doc = concat!("Returns the [`", stringify!($info), "`], or a [`KindError`].")]
        pub fn $name(&self) -> Result<&Arc<$info>, KindError> {
            match self {
                Self::$kind(info) => Ok(info),
                _ => Err(KindError {
                    expected: Kind::$kind,
                    received: self.kind(),
                }),
            }
        }
    };
}

impl Descriptor {
    #[inline]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::Atom(_) => Kind::Atom,
            Self::Record(_) => Kind::Record,
            Self::Array(_) => Kind::Array,
            Self::Union(_) => Kind::Union,
        }
    }

    /// The handle of the described type.
    pub fn handle(&self) -> &TypeHandle {
        match self {
            Self::Atom(info) => info.handle(),
            Self::Record(info) => info.handle(),
            Self::Array(info) => info.handle(),
            Self::Union(info) => info.handle(),
        }
    }

    #[inline]
    pub fn ty(&self) -> &Type {
        self.handle().ty()
    }

    /// Returns `true` if both descriptors are the same published instance.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Atom(a), Self::Atom(b)) => Arc::ptr_eq(a, b),
            (Self::Record(a), Self::Record(b)) => Arc::ptr_eq(a, b),
            (Self::Array(a), Self::Array(b)) => Arc::ptr_eq(a, b),
            (Self::Union(a), Self::Union(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    impl_cast_method!(as_atom: Atom => AtomInfo);
    impl_cast_method!(as_record: Record => RecordInfo);
    impl_cast_method!(as_array: Array => ArrayInfo);
    impl_cast_method!(as_union: Union => UnionInfo);
}
