use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use crate::decl::{Instance, Primitive, WrapperDecl, WrapperKind};
use crate::info::TypeHandle;
use crate::{BindError, Fault};

/// A field or element position: a declared type and the wrappers around the
/// type that is actually converted.
///
/// `Option<Box<Node>>` has the chain `[Option, Box]` and the target `Node`.
#[derive(Clone)]
pub struct Slot {
    declared: TypeHandle,
    chain: Box<[WrapperDecl]>,
    target: TypeHandle,
    primitive: Option<Primitive>,
}

impl Slot {
    /// Peels the wrapper declarations off `declared`.
    pub fn analyze(declared: TypeHandle) -> Result<Self, BindError> {
        let mut chain = Vec::new();
        let mut target = declared;
        loop {
            let decl = target.declare();
            match decl.wrapper() {
                Some(wrapper) => {
                    if chain.len() >= 16 {
                        return Err(BindError::unresolvable(
                            declared.name(),
                            "wrapper chain is too deep",
                        ));
                    }
                    chain.push(*wrapper);
                    target = *wrapper.inner();
                }
                None => {
                    return Ok(Self {
                        declared,
                        chain: chain.into_boxed_slice(),
                        target,
                        primitive: decl.primitive(),
                    });
                }
            }
        }
    }

    #[inline]
    pub fn declared(&self) -> &TypeHandle {
        &self.declared
    }

    #[inline]
    pub fn target(&self) -> &TypeHandle {
        &self.target
    }

    #[inline]
    pub fn chain(&self) -> &[WrapperDecl] {
        &self.chain
    }

    /// The primitive flavor of the target type.
    #[inline]
    pub fn primitive(&self) -> Option<Primitive> {
        self.primitive
    }

    /// Returns `true` if any wrapper of the chain may be empty.
    pub fn is_nullable(&self) -> bool {
        self.chain.iter().any(|w| w.kind() == WrapperKind::Optional)
    }

    /// Reaches the target value, `None` if a wrapper is empty.
    pub fn peel<'a>(&self, value: &'a dyn Any) -> Result<Option<&'a dyn Any>, Fault> {
        let mut current = value;
        for wrapper in &self.chain {
            match wrapper.peel(current)? {
                Some(inner) => current = inner,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    /// Wraps a target instance into the declared type.
    pub fn wrap(&self, target: Instance) -> Result<Instance, Fault> {
        self.chain
            .iter()
            .rev()
            .try_fold(target, |inner, wrapper| wrapper.wrap(Some(inner)))
    }

    /// Builds the declared value standing for "no value".
    ///
    /// The outermost optional wrapper is created empty. Returns `None` if the
    /// slot is not nullable.
    pub fn wrap_absent(&self) -> Result<Option<Instance>, Fault> {
        let Some(pos) = self
            .chain
            .iter()
            .position(|w| w.kind() == WrapperKind::Optional)
        else {
            return Ok(None);
        };
        let empty = self.chain[pos].wrap(None)?;
        self.chain[..pos]
            .iter()
            .rev()
            .try_fold(empty, |inner, wrapper| wrapper.wrap(Some(inner)))
            .map(Some)
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("declared", &self.declared)
            .field("target", &self.target)
            .field("nullable", &self.is_nullable())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Slot;
    use crate::decl::{Instance, Primitive};
    use crate::info::TypeHandle;
    use alloc::boxed::Box;

    #[test]
    fn nested_wrappers() {
        let slot = Slot::analyze(TypeHandle::of::<Box<Option<u32>>>()).unwrap();
        assert_eq!(slot.chain().len(), 2);
        assert_eq!(slot.target().name(), "u32");
        assert_eq!(slot.primitive(), Some(Primitive::Integer));
        assert!(slot.is_nullable());

        let absent = slot.wrap_absent().unwrap().unwrap();
        assert_eq!(
            absent.downcast_ref::<Box<Option<u32>>>(),
            Some(&Box::new(None))
        );
        let value: Box<Option<u32>> = Box::new(Some(5));
        assert_eq!(
            slot.peel(&value).unwrap().and_then(|v| v.downcast_ref::<u32>()),
            Some(&5)
        );
        let wrapped = slot.wrap(Box::new(6_u32) as Instance).unwrap();
        assert_eq!(
            wrapped.downcast_ref::<Box<Option<u32>>>(),
            Some(&Box::new(Some(6)))
        );
    }

    #[test]
    fn plain_slot_has_no_absent_value() {
        let slot = Slot::analyze(TypeHandle::of::<Box<i8>>()).unwrap();
        assert!(!slot.is_nullable());
        assert!(slot.wrap_absent().unwrap().is_none());
        assert!(slot.peel(&Box::new(1_i8)).unwrap().is_some());
    }
}
