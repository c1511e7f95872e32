//! Type identity.
//!
//! - [`TypePath`]: stable, `'static` names of a type.
//! - [`Type`]: a [`TypeId`](core::any::TypeId) with its names.
//! - [`TypeHandle`]: a [`Type`] with the function declaring its structure.

// -----------------------------------------------------------------------------
// Modules

mod handle;
mod type_path;

// -----------------------------------------------------------------------------
// Exports

pub use handle::TypeHandle;
pub use type_path::{Type, TypePath, TypePathTable};
