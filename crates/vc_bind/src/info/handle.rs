use core::any::{Any, TypeId};
use core::fmt;

use crate::decl::{Bind, TypeDecl};
use crate::info::Type;

/// A [`Type`] together with the function that declares its structure.
///
/// Handles are how declarations name other types: a field of type `Vec<Point>`
/// stores `TypeHandle::of::<Vec<Point>>()`, and the resolver calls
/// [`declare`](TypeHandle::declare) only when it needs the nested structure.
/// This keeps recursive types finite.
///
/// # Example
///
/// ```
/// use vc_bind::info::TypeHandle;
///
/// let handle = TypeHandle::of::<Vec<u8>>();
/// assert_eq!(handle.name(), "Vec<u8>");
/// assert!(handle.declare().sequence().is_some());
/// ```
#[derive(Clone, Copy)]
pub struct TypeHandle {
    ty: Type,
    declare: fn() -> TypeDecl,
}

impl TypeHandle {
    /// Creates a handle of a type implementing [`Bind`].
    #[inline]
    pub const fn of<T: Bind>() -> Self {
        Self {
            ty: Type::of::<T>(),
            declare: T::declare,
        }
    }

    /// Creates a handle with an empty declaration.
    ///
    /// Opaque types can only resolve through the scalar registry.
    #[inline]
    pub const fn opaque<T: Any>() -> Self {
        Self {
            ty: Type::opaque::<T>(),
            declare: TypeDecl::new,
        }
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline(always)]
    pub const fn id(&self) -> TypeId {
        self.ty.id()
    }

    /// See [`Type::name`].
    #[inline]
    pub fn name(&self) -> &'static str {
        self.ty.name()
    }

    /// See [`Type::path`].
    #[inline]
    pub fn path(&self) -> &'static str {
        self.ty.path()
    }

    /// Builds the declaration of the type.
    #[inline]
    pub fn declare(&self) -> TypeDecl {
        (self.declare)()
    }
}

impl PartialEq for TypeHandle {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty
    }
}

impl Eq for TypeHandle {}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.ty, f)
    }
}
