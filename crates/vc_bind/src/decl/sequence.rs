use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

use crate::Fault;
use crate::decl::Instance;
use crate::info::TypeHandle;

// -----------------------------------------------------------------------------
// Cursor

/// Iteration state over the elements of a sequence.
///
/// Created by [`SequenceDecl::make_iterator`].
pub struct Cursor<'a> {
    iter: Box<dyn Iterator<Item = &'a dyn Any> + 'a>,
}

impl<'a> Cursor<'a> {
    #[inline]
    pub fn new(iter: impl Iterator<Item = &'a dyn Any> + 'a) -> Self {
        Self {
            iter: Box::new(iter),
        }
    }

    /// Yields the next element, `None` at the end.
    #[inline]
    pub fn get_next(&mut self) -> Option<&'a dyn Any> {
        self.iter.next()
    }
}

impl fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor").finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// SequenceBuilder

/// Accumulates decoded elements into a new sequence.
pub trait SequenceBuilder: Send {
    /// Appends the next element.
    fn put_next(&mut self, element: Instance) -> Result<(), Fault>;

    /// Completes the sequence.
    ///
    /// Fixed size sequences fail with [`Fault::Length`] when the number of
    /// elements does not match.
    fn finish(self: Box<Self>) -> Result<Instance, Fault>;
}

// -----------------------------------------------------------------------------
// SequenceDecl

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceFamily {
    /// Native fixed size arrays.
    Fixed,
    /// Growable, ordered collections.
    Growable,
    /// Collections of unique elements.
    Set,
}

/// Declaration of a homogeneous sequence.
///
/// The element may be a wrapper type, in which case elements can be absent.
#[derive(Clone, Copy)]
pub struct SequenceDecl {
    element: TypeHandle,
    family: SequenceFamily,
    fixed_len: Option<usize>,
    size_of: fn(&dyn Any) -> Result<usize, Fault>,
    make_iterator: for<'a> fn(&'a dyn Any) -> Result<Cursor<'a>, Fault>,
    new_builder: fn(usize) -> Box<dyn SequenceBuilder>,
}

impl SequenceDecl {
    pub const fn new(
        element: TypeHandle,
        family: SequenceFamily,
        size_of: fn(&dyn Any) -> Result<usize, Fault>,
        make_iterator: for<'a> fn(&'a dyn Any) -> Result<Cursor<'a>, Fault>,
        new_builder: fn(usize) -> Box<dyn SequenceBuilder>,
    ) -> Self {
        Self {
            element,
            family,
            fixed_len: None,
            size_of,
            make_iterator,
            new_builder,
        }
    }

    /// Sets the exact length of a [`SequenceFamily::Fixed`] sequence.
    #[inline]
    pub const fn with_fixed_len(mut self, len: usize) -> Self {
        self.fixed_len = Some(len);
        self
    }

    #[inline]
    pub const fn element(&self) -> &TypeHandle {
        &self.element
    }

    #[inline]
    pub const fn family(&self) -> SequenceFamily {
        self.family
    }

    #[inline]
    pub const fn fixed_len(&self) -> Option<usize> {
        self.fixed_len
    }

    #[inline]
    pub fn size_of(&self, value: &dyn Any) -> Result<usize, Fault> {
        (self.size_of)(value)
    }

    #[inline]
    pub fn make_iterator<'a>(&self, value: &'a dyn Any) -> Result<Cursor<'a>, Fault> {
        (self.make_iterator)(value)
    }

    /// Creates a builder pre-sized for `capacity` elements.
    #[inline]
    pub fn new_builder(&self, capacity: usize) -> Box<dyn SequenceBuilder> {
        (self.new_builder)(capacity)
    }
}
