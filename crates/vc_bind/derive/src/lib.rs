//! See [`Bind`].
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

static BIND_ATTRIBUTE_NAME: &str = "bind";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Bind Derivation
///
/// `#[derive(Bind)]` implements `TypePath` and `Bind`. What the declaration
/// contains depends on the shape of the type:
///
/// | Type | Declared as |
/// |------|-------------|
/// | `struct T { .. }`, `struct T(..)`, `struct T;` | record |
/// | `enum T { A, B }` | scalar, the variant name as a string |
/// | `enum T { A(A), B(B) }` | sealed union of `A` and `B` |
///
/// ## Records
///
/// Fields are constructor components by default: decoding collects every
/// field and builds the value in one go. Tuple fields are named `"0"`,
/// `"1"` and so on.
///
/// With `#[bind(accessors)]` fields become properties instead, written by
/// setters into `T::default()`. The type must implement `Default`.
///
/// ```rust, ignore
/// #[derive(Bind, Default)]
/// #[bind(accessors)]
/// struct Settings {
///     volume: u8,
/// }
/// ```
///
/// ### Field Attributes
///
/// - `rename = "name"`: bind the field under another name.
/// - `required = bool`: override the required-ness of a non-primitive field.
/// - `default`: use `Default::default()` when the value is absent. Implies
///   `required = false` unless stated.
/// - `skip`: leave the field out; it is filled with `Default::default()`.
/// - `scalar`: resolve the field type through the scalar registry only, for
///   foreign types that do not implement `Bind`.
/// - `union(A, B)`: restrict a union-typed field to the listed members.
///
/// ```rust, ignore
/// #[derive(Bind)]
/// struct Canvas {
///     #[bind(rename = "title")]
///     name: String,
///     #[bind(required = false, default)]
///     note: String,
///     #[bind(union(Circle))]
///     badge: Shape,
/// }
/// ```
///
/// ### Field Order
///
/// Fields are laid out in declaration order. `#[bind(order(b, a))]`
/// overrides it and must name every bound field exactly once.
///
/// ## Type Attributes
///
/// - `type_path = "my_crate::Foo"`: custom type path, generics are appended.
/// - `tag = "foo"`: the identity of the type as a union member, the type
///   name by default.
/// - `member_of(U, ..)`: the type may join the union `U`. For `Box<dyn Trait>`
///   declared with `open_union!`, the type must implement `Trait`. Other
///   unions need `U: From<T>`.
/// - `bridge(W)`: encode the type as the scalar `W`, through
///   `From<&T> for W` and `From<W> for T`.
/// - `project(D)`: take the record fields from the data type `D`, through
///   `From<&T> for D` and `From<D> for T`.
///
/// ```rust, ignore
/// #[derive(Bind)]
/// #[bind(bridge(u64), tag = "id")]
/// struct UserId(u64);
/// ```
///
/// ## Auto Registration
///
/// `#[bind(auto_register)]` collects the type for
/// `TypeContext::auto_register`. No effect on generic types, or when the
/// `auto_register` feature is disabled.
#[proc_macro_derive(Bind, attributes(bind))]
pub fn derive_bind(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let derive = match derive_data::BindDerive::from_input(&ast) {
        Ok(derive) => derive,
        Err(err) => return err.into_compile_error().into(),
    };

    let type_path_impl = impls::impl_trait_type_path(&derive.meta);
    let bind_impl = impls::impl_trait_bind(&derive);
    let auto_register_impl = impls::get_auto_register_impl(&derive.meta);

    TokenStream::from(quote! {
        const _: () = {
            #type_path_impl

            #bind_impl

            #auto_register_impl
        };
    })
}
