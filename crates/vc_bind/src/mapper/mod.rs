//! Converters between native values and canonical forms.
//!
//! Both mappers compile a descriptor once into a plan and reuse it for
//! every conversion of that type. They differ only in how records and
//! unions are laid out:
//!
//! | Native value           | [`ArrayMapper`]          | [`MapMapper`]                    |
//! |------------------------|--------------------------|----------------------------------|
//! | `Point { x: 1, y: 2 }` | `[1, 2]`                 | `{"x": 1, "y": 2}`               |
//! | absent optional field  | `null` in its slot       | key left out                     |
//! | union member `Circle`  | `["Circle", [5]]`        | `{"r": 5, "type": "Circle"}`     |
//! | absent union field     | `["null", null]`         | key left out                     |
//! | scalar union member    | `["Meters", 1.5]`        | `{"type": "Meters", "value": 1.5}` |
//!
//! A record containing itself through non-nullable fields only cannot be
//! converted, its plan fails with [`BindError::RecursiveStructure`].
//!
//! [`BindError::RecursiveStructure`]: crate::BindError::RecursiveStructure

// -----------------------------------------------------------------------------
// Modules

mod array;
mod form;
mod map;
mod plan;

#[cfg(test)]
pub(crate) mod fixtures;

// -----------------------------------------------------------------------------
// Exports

pub use array::ArrayMapper;
pub use form::{NULL_TAG, TYPE_KEY, VALUE_KEY};
pub use map::MapMapper;
