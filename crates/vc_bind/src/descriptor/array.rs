use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

use crate::Fault;
use crate::decl::{Cursor, SequenceBuilder, SequenceDecl, SequenceFamily};
use crate::descriptor::Slot;
use crate::info::TypeHandle;

/// A homogeneous sequence.
///
/// Walks a source value with [`size_of`](ArrayInfo::size_of) and
/// [`make_iterator`](ArrayInfo::make_iterator), and builds a destination
/// pre-sized by [`new_builder`](ArrayInfo::new_builder).
pub struct ArrayInfo {
    handle: TypeHandle,
    element: Slot,
    decl: SequenceDecl,
}

impl ArrayInfo {
    pub fn new(handle: TypeHandle, element: Slot, decl: SequenceDecl) -> Self {
        Self {
            handle,
            element,
            decl,
        }
    }

    #[inline]
    pub fn handle(&self) -> &TypeHandle {
        &self.handle
    }

    /// The element position, including wrappers around the element type.
    #[inline]
    pub fn element(&self) -> &Slot {
        &self.element
    }

    #[inline]
    pub fn family(&self) -> SequenceFamily {
        self.decl.family()
    }

    #[inline]
    pub fn fixed_len(&self) -> Option<usize> {
        self.decl.fixed_len()
    }

    #[inline]
    pub fn size_of(&self, value: &dyn Any) -> Result<usize, Fault> {
        self.decl.size_of(value)
    }

    #[inline]
    pub fn make_iterator<'a>(&self, value: &'a dyn Any) -> Result<Cursor<'a>, Fault> {
        self.decl.make_iterator(value)
    }

    /// Creates a builder, failing early if a fixed length does not match.
    pub fn new_builder(&self, len: usize) -> Result<Box<dyn SequenceBuilder>, Fault> {
        match self.decl.fixed_len() {
            Some(expected) if expected != len => Err(Fault::Length {
                expected,
                found: len,
            }),
            _ => Ok(self.decl.new_builder(len)),
        }
    }
}

impl fmt::Debug for ArrayInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayInfo")
            .field("ty", &self.handle)
            .field("element", &self.element)
            .field("family", &self.family())
            .finish()
    }
}
