use alloc::vec::Vec;
use core::any::{Any, TypeId};

use crate::decl::Instance;
use crate::info::TypeHandle;

/// Reaches the concrete member value inside a union value.
pub type UnwrapFn = for<'a> fn(&'a dyn Any) -> Option<&'a dyn Any>;

/// Lifts a member instance into the union type.
///
/// Returns the instance unchanged when it is not the expected member.
pub type LiftFn = fn(Instance) -> Result<Instance, Instance>;

// -----------------------------------------------------------------------------
// UnionMemberDecl

/// A member of a sealed union.
#[derive(Debug, Clone, Copy)]
pub struct UnionMemberDecl {
    handle: TypeHandle,
    lift: LiftFn,
}

impl UnionMemberDecl {
    #[inline]
    pub const fn new(handle: TypeHandle, lift: LiftFn) -> Self {
        Self { handle, lift }
    }

    #[inline]
    pub const fn handle(&self) -> &TypeHandle {
        &self.handle
    }

    #[inline]
    pub const fn lift(&self) -> LiftFn {
        self.lift
    }
}

// -----------------------------------------------------------------------------
// UnionDecl

/// Declaration of a sum type.
///
/// A sealed union lists its members up front. An open union starts empty and
/// grows as types declaring it as a [`Supertype`] are resolved.
#[derive(Clone)]
pub struct UnionDecl {
    sealed: bool,
    unwrap: UnwrapFn,
    members: Vec<UnionMemberDecl>,
}

impl UnionDecl {
    /// Creates an open union.
    #[inline]
    pub const fn open(unwrap: UnwrapFn) -> Self {
        Self {
            sealed: false,
            unwrap,
            members: Vec::new(),
        }
    }

    /// Creates a sealed union, add members with [`UnionDecl::with_member`].
    #[inline]
    pub const fn sealed(unwrap: UnwrapFn) -> Self {
        Self {
            sealed: true,
            unwrap,
            members: Vec::new(),
        }
    }

    #[inline]
    pub fn with_member(mut self, member: UnionMemberDecl) -> Self {
        self.members.push(member);
        self
    }

    #[inline]
    pub const fn is_sealed(&self) -> bool {
        self.sealed
    }

    #[inline]
    pub const fn unwrap_fn(&self) -> UnwrapFn {
        self.unwrap
    }

    #[inline]
    pub fn members(&self) -> &[UnionMemberDecl] {
        &self.members
    }
}

// -----------------------------------------------------------------------------
// Supertype

/// A union a type may join.
///
/// # Example
///
/// ```
/// use core::any::TypeId;
/// use vc_bind::decl::{Instance, Supertype};
///
/// let to_string: Supertype = Supertype::of::<String>(|inst| {
///     inst.downcast::<char>()
///         .map(|c| Box::new(String::from(*c)) as Instance)
/// });
/// assert_eq!(to_string.union_id(), TypeId::of::<String>());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Supertype {
    union: TypeId,
    lift: LiftFn,
}

impl Supertype {
    #[inline]
    pub fn of<U: Any + ?Sized>(lift: LiftFn) -> Self {
        Self {
            union: TypeId::of::<U>(),
            lift,
        }
    }

    #[inline]
    pub const fn union_id(&self) -> TypeId {
        self.union
    }

    #[inline]
    pub const fn lift(&self) -> LiftFn {
        self.lift
    }
}
