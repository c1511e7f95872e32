//! Scalar codecs.
//!
//! A [`ScalarCodec`] reduces a native type to one of the canonical
//! [`WireType`]s. The [`ScalarRegistry`] maps native types to codecs and is
//! the first thing the atom classifier consults.

// -----------------------------------------------------------------------------
// Modules

mod codec;
mod registry;

// -----------------------------------------------------------------------------
// Exports

pub use codec::{ScalarCodec, WireScalar, WireType};
pub use registry::ScalarRegistry;
