//! Items referenced by generated code. Not public API.

pub use alloc::boxed::Box;
pub use alloc::string::{String, ToString};
pub use core::any::Any;

#[cfg(feature = "auto_register")]
pub mod auto_register {
    pub use inventory;

    use crate::info::TypeHandle;

    /// A type derived with `#[bind(auto_register)]`.
    pub struct AutoRegistration(pub fn() -> TypeHandle);

    inventory::collect!(AutoRegistration);
}
