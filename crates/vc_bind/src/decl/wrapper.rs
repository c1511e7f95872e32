use core::any::Any;

use crate::Fault;
use crate::decl::Instance;
use crate::info::TypeHandle;

/// Reaches the inner value of a wrapper, `None` when it is empty.
pub type PeelFn = for<'a> fn(&'a dyn Any) -> Result<Option<&'a dyn Any>, Fault>;

/// Builds a wrapper from an inner value, or an empty wrapper from `None`.
pub type WrapFn = fn(Option<Instance>) -> Result<Instance, Fault>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapperKind {
    /// May be empty, like `Option<T>`.
    Optional,
    /// Always holds a value, like `Box<T>`.
    Boxed,
}

/// A transparent indirection around another type.
///
/// Wrappers never become descriptors of their own. A field or element of a
/// wrapper type is resolved against the innermost wrapped type, and the
/// wrapper chain decides whether the slot is nullable.
#[derive(Clone, Copy)]
pub struct WrapperDecl {
    kind: WrapperKind,
    inner: TypeHandle,
    peel: PeelFn,
    wrap: WrapFn,
}

impl WrapperDecl {
    #[inline]
    pub const fn new(kind: WrapperKind, inner: TypeHandle, peel: PeelFn, wrap: WrapFn) -> Self {
        Self {
            kind,
            inner,
            peel,
            wrap,
        }
    }

    #[inline]
    pub const fn kind(&self) -> WrapperKind {
        self.kind
    }

    #[inline]
    pub const fn inner(&self) -> &TypeHandle {
        &self.inner
    }

    #[inline]
    pub fn peel<'a>(&self, value: &'a dyn Any) -> Result<Option<&'a dyn Any>, Fault> {
        (self.peel)(value)
    }

    #[inline]
    pub fn wrap(&self, inner: Option<Instance>) -> Result<Instance, Fault> {
        (self.wrap)(inner)
    }
}
