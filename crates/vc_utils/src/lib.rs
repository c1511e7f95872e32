//! Small containers shared by the `vc_bind` crates.
//!
//! ## Menu
//!
//! - [`TypeIdMap`]: a map keyed by [`TypeId`](core::any::TypeId), used for
//!   descriptor, scalar and converter caches.
//! - [`hash`]: fixed-seed [`HashMap`](hash::HashMap) / [`HashSet`](hash::HashSet)
//!   aliases over *hashbrown* and *foldhash*.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// No STD Support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod typeid_map;

pub mod hash;

// -----------------------------------------------------------------------------
// Top-level exports

pub use typeid_map::TypeIdMap;
