//! Reflective data binding.
//!
//! `vc_bind` derives structural [descriptors](descriptor::Descriptor) for Rust
//! types and compiles reusable converters between a value's native form and
//! two canonical carrier forms:
//!
//! - the dense, positional *array form*, see [`ArrayMapper`](mapper::ArrayMapper);
//! - the sparse, keyed *map form*, see [`MapMapper`](mapper::MapMapper).
//!
//! Both forms are expressed as [`Value`](value::Value), which implements the
//! serde data model so any serde format can carry it.
//!
//! ## Menu
//!
//! - [`info`]: type identity ([`TypePath`](info::TypePath), [`Type`](info::Type),
//!   [`TypeHandle`](info::TypeHandle)).
//! - [`decl`]: the [`Bind`](decl::Bind) trait and the declarations a type
//!   publishes about itself.
//! - [`scalar`]: scalar codecs and the scalar registry.
//! - [`descriptor`]: resolved atoms, records, arrays and unions.
//! - [`resolve`]: the classification chain and component finders.
//! - [`context`]: the caching [`TypeContext`](context::TypeContext).
//! - [`mapper`]: array and map converters.
//!
//! # Example
//!
//! ```
//! use vc_bind::{context::TypeContext, decl::Bind, mapper::{ArrayMapper, MapMapper}};
//! use vc_bind::value::Value;
//!
//! #[derive(Bind, Debug, PartialEq)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! let ctx = TypeContext::new();
//! let array = ArrayMapper::new(&ctx);
//! let map = MapMapper::new(&ctx);
//!
//! let p = Point { x: 1, y: 2 };
//! assert_eq!(array.to_array(&p).unwrap(), Value::from([1, 2]));
//! assert_eq!(
//!     map.to_map(&p).unwrap(),
//!     Value::from_iter([("x", Value::from(1)), ("y", Value::from(2))]),
//! );
//! assert_eq!(array.to_object::<Point>(Value::from([1, 2])).unwrap(), p);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// Generated code names this crate `::vc_bind`, including inside its own tests.
extern crate self as vc_bind;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod macros;

pub mod context;
pub mod decl;
pub mod descriptor;
pub mod impls;
pub mod info;
pub mod mapper;
pub mod resolve;
pub mod scalar;
pub mod value;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use decl::Instance;
pub use error::{BindError, Fault};
pub use vc_bind_derive as derive;
