//! Provide hash containers, re-exports *hashbrown* and *foldhash*.
//!
//! The containers use [`FixedHashState`], so iteration order only depends on
//! the inserted keys. This keeps descriptor dumps and error messages stable
//! between runs.

// -----------------------------------------------------------------------------
// Modules

mod hasher;

// -----------------------------------------------------------------------------
// Exports

pub use hasher::{FixedHashState, FixedHasher};
pub use hasher::{NoOpHashState, NoOpHasher};

/// A [`hashbrown::HashMap`] using [`FixedHashState`].
///
/// # Examples
///
/// ```
/// use vc_utils::hash::HashMap;
///
/// let mut map = HashMap::default();
/// map.insert("x", 1);
/// assert_eq!(map.get("x"), Some(&1));
/// ```
pub type HashMap<K, V> = hashbrown::HashMap<K, V, FixedHashState>;

/// A [`hashbrown::HashSet`] using [`FixedHashState`].
///
/// # Examples
///
/// ```
/// use vc_utils::hash::HashSet;
///
/// let mut set = HashSet::default();
/// assert!(set.insert(3_u8));
/// assert!(!set.insert(3_u8));
/// ```
pub type HashSet<T> = hashbrown::HashSet<T, FixedHashState>;

// -----------------------------------------------------------------------------
// Re-export crates

pub use foldhash;
pub use hashbrown;
