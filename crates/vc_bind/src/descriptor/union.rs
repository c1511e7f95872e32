use alloc::format;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;
use std::sync::{PoisonError, RwLock};

use crate::decl::{Instance, LiftFn, UnwrapFn};
use crate::info::TypeHandle;
use crate::{BindError, Fault};

// -----------------------------------------------------------------------------
// UnionMember

/// A member type of a union.
#[derive(Debug, Clone, Copy)]
pub struct UnionMember {
    handle: TypeHandle,
    tag: &'static str,
    lift: LiftFn,
}

impl UnionMember {
    /// Creates a member identified by the tag of its declaration, or its
    /// short type name.
    pub fn new(handle: TypeHandle, lift: LiftFn) -> Self {
        let tag = handle.declare().tag().unwrap_or_else(|| handle.name());
        Self { handle, tag, lift }
    }

    #[inline]
    pub fn handle(&self) -> &TypeHandle {
        &self.handle
    }

    /// The identity written next to member values.
    #[inline]
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    /// Lifts an instance of the member type into the union type.
    pub fn lift(&self, instance: Instance) -> Result<Instance, Fault> {
        (self.lift)(instance).map_err(|_| Fault::NativeMismatch {
            expected: self.handle.path(),
        })
    }
}

// -----------------------------------------------------------------------------
// UnionInfo

/// A sum type.
///
/// Members of a sealed union are fixed at resolution. An open union starts
/// with the members known at that point and grows through
/// [`UnionInfo::append`]. Readers take snapshots, so an append never exposes
/// a partial member list.
pub struct UnionInfo {
    handle: TypeHandle,
    sealed: bool,
    unwrap: UnwrapFn,
    members: RwLock<Arc<[UnionMember]>>,
}

impl UnionInfo {
    pub(crate) fn new(
        handle: TypeHandle,
        sealed: bool,
        unwrap: UnwrapFn,
        members: Vec<UnionMember>,
    ) -> Self {
        Self {
            handle,
            sealed,
            unwrap,
            members: RwLock::new(members.into()),
        }
    }

    #[inline]
    pub fn handle(&self) -> &TypeHandle {
        &self.handle
    }

    #[inline]
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// A snapshot of the current members.
    pub fn members(&self) -> Arc<[UnionMember]> {
        self.members
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn member_by_type(&self, type_id: TypeId) -> Option<UnionMember> {
        self.members().iter().find(|m| m.handle.id() == type_id).copied()
    }

    pub fn member_by_tag(&self, tag: &str) -> Option<UnionMember> {
        self.members().iter().find(|m| m.tag == tag).copied()
    }

    /// Reaches the concrete member value inside a union value.
    pub fn unwrap<'a>(&self, value: &'a dyn Any) -> Result<&'a dyn Any, Fault> {
        (self.unwrap)(value).ok_or(Fault::NativeMismatch {
            expected: self.handle.path(),
        })
    }

    /// Adds a member to an open union.
    ///
    /// Returns `Ok(false)` if the type already is a member. Fails for sealed
    /// unions and when the member's tag is taken by another type.
    pub fn append(&self, member: UnionMember) -> Result<bool, BindError> {
        let union = self.handle.name();
        if self.sealed {
            return Err(BindError::UnionMembership {
                union,
                member: format!("{} (union is sealed)", member.handle.name()),
            });
        }

        let mut members = self.members.write().unwrap_or_else(PoisonError::into_inner);
        if members.iter().any(|m| m.handle == member.handle) {
            return Ok(false);
        }
        if let Some(taken) = members.iter().find(|m| m.tag == member.tag) {
            return Err(BindError::UnionMembership {
                union,
                member: format!(
                    "{} (tag `{}` is used by {})",
                    member.handle.name(),
                    member.tag,
                    taken.handle.name()
                ),
            });
        }

        let mut next = Vec::with_capacity(members.len() + 1);
        next.extend_from_slice(&members);
        next.push(member);
        *members = next.into();
        Ok(true)
    }
}

impl fmt::Debug for UnionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnionInfo")
            .field("ty", &self.handle)
            .field("sealed", &self.sealed)
            .field(
                "members",
                &self.members().iter().map(|m| m.tag).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{UnionInfo, UnionMember};
    use crate::BindError;
    use crate::decl::Instance;
    use crate::info::TypeHandle;
    use alloc::vec::Vec;
    use core::any::TypeId;

    fn keep(inst: Instance) -> Result<Instance, Instance> {
        Ok(inst)
    }

    fn open() -> UnionInfo {
        UnionInfo::new(TypeHandle::of::<u64>(), false, |v| Some(v), Vec::new())
    }

    #[test]
    fn append_grows_snapshots() {
        let union = open();
        let before = union.members();
        let member = UnionMember::new(TypeHandle::of::<u8>(), keep);
        assert_eq!(union.append(member), Ok(true));
        assert_eq!(union.append(member), Ok(false));
        assert!(before.is_empty());
        assert_eq!(union.members().len(), 1);
        assert_eq!(
            union.member_by_tag("u8").map(|m| m.handle().id()),
            Some(TypeId::of::<u8>())
        );
        assert!(union.member_by_type(TypeId::of::<u16>()).is_none());
    }

    #[test]
    fn sealed_unions_reject_members() {
        let union = UnionInfo::new(TypeHandle::of::<u64>(), true, |v| Some(v), Vec::new());
        assert!(matches!(
            union.append(UnionMember::new(TypeHandle::of::<u8>(), keep)),
            Err(BindError::UnionMembership { .. })
        ));
    }
}
