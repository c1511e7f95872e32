use alloc::boxed::Box;
use alloc::string::String;
use core::any::{Any, TypeId};
use std::sync::{PoisonError, RwLock};

use vc_utils::TypeIdMap;

/// Static storage of the type paths of generic types.
///
/// A `static CELL` inside a generic function is shared by every
/// instantiation, so the cell keeps one leaked string per [`TypeId`].
///
/// See [`TypePath`](crate::info::TypePath) for an example.
pub struct GenericTypePathCell(RwLock<TypeIdMap<&'static str>>);

impl GenericTypePathCell {
    /// Creates an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Returns the path stored for `G`, creating it with `f` on first use.
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> String) -> &'static str {
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    #[inline(never)]
    fn get_or_insert_by_type_id(&self, type_id: TypeId, f: impl FnOnce() -> String) -> &'static str {
        let cached = self
            .0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied();
        if let Some(path) = cached {
            return path;
        }

        // `f` may reach this cell again for a nested instantiation.
        let path = f();
        *self
            .0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert(type_id, || &*Box::leak(path.into_boxed_str()))
    }
}

impl Default for GenericTypePathCell {
    fn default() -> Self {
        Self::new()
    }
}
