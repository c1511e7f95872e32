//! Parsing of the derive input.

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod bind_derive;
mod type_meta;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use attributes::{FieldAttributes, TypeAttributes};
pub(crate) use bind_derive::{BindDerive, Body, RecordField, UnionVariant, UnitVariant};
pub(crate) use type_meta::TypeMeta;
