use alloc::string::String;
use alloc::vec::Vec;
use core::any::TypeId;
use std::sync::{PoisonError, RwLock};

use vc_utils::TypeIdMap;

use crate::scalar::ScalarCodec;

/// A table from native types to their scalar codecs.
///
/// [`ScalarRegistry::default`] is pre-populated with identity codecs of
/// `bool`, `char`, the integer and float types and `String`.
///
/// The registry only stores codecs. Duplicate checks against resolved
/// descriptors happen in [`TypeContext::register_scalar`].
///
/// [`TypeContext::register_scalar`]: crate::context::TypeContext::register_scalar
pub struct ScalarRegistry {
    codecs: RwLock<TypeIdMap<ScalarCodec>>,
}

impl ScalarRegistry {
    /// Creates a registry without any codec.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            codecs: RwLock::new(TypeIdMap::new()),
        }
    }

    /// Returns a copy of the codec of the given type.
    pub fn get(&self, type_id: TypeId) -> Option<ScalarCodec> {
        self.codecs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .cloned()
    }

    pub fn contains(&self, type_id: TypeId) -> bool {
        self.codecs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&type_id)
    }

    /// Adds a codec, returning the one it replaced.
    pub fn insert(&self, codec: ScalarCodec) -> Option<ScalarCodec> {
        self.codecs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(codec.native().id(), codec)
    }

    pub fn len(&self) -> usize {
        self.codecs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Paths of all registered native types, sorted.
    pub fn type_paths(&self) -> Vec<&'static str> {
        let codecs = self.codecs.read().unwrap_or_else(PoisonError::into_inner);
        let mut paths: Vec<_> = codecs.values().map(|c| c.native().path()).collect();
        paths.sort_unstable();
        paths
    }
}

impl Default for ScalarRegistry {
    fn default() -> Self {
        let registry = Self::empty();
        macro_rules! identity {
            ($($ty:ty),*) => {$(
                registry.insert(ScalarCodec::identity::<$ty>());
            )*};
        }
        identity!(bool, char, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, String);
        registry
    }
}

impl core::fmt::Debug for ScalarRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.type_paths()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::ScalarRegistry;
    use crate::scalar::ScalarCodec;
    use core::any::TypeId;

    #[test]
    fn default_holds_primitives() {
        let registry = ScalarRegistry::default();
        assert_eq!(registry.len(), 15);
        assert!(registry.contains(TypeId::of::<String>()));
        assert!(registry.get(TypeId::of::<u8>()).is_some_and(|c| c.is_identity()));
        assert!(!registry.contains(TypeId::of::<()>()));
    }

    #[test]
    fn insert_replaces() {
        struct Id(u32);

        let registry = ScalarRegistry::empty();
        let codec = ScalarCodec::bridge::<Id, u32>(|id| Ok(id.0), |v| Ok(Id(v)));
        assert!(registry.insert(codec.clone()).is_none());
        assert!(registry.insert(codec).is_some());
        assert_eq!(registry.len(), 1);
    }
}
