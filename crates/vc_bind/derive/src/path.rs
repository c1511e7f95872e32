//! Paths of the `vc_bind` items referenced by generated code.
//!
//! Kept in one place so that moving an item in `vc_bind` only touches this
//! module.

use proc_macro2::TokenStream;
use quote::quote;

// -----------------------------------------------------------------------------
// Crate Path

/// Get the access path to the `vc_bind` crate.
///
/// 1. For crates that depend on `vc_bind`, `::vc_bind` is returned.
/// 2. For crates that depend on `vc_databind`, `::vc_databind::bind` is returned.
/// 3. Otherwise `::vc_bind`, which also covers `vc_bind` itself.
///
/// Reading the manifest is not free, so the path is computed once per
/// derive and passed around.
pub(crate) fn vc_bind() -> syn::Path {
    vc_macro_utils::Manifest::shared(|manifest| manifest.crate_path("vc_bind"))
}

// -----------------------------------------------------------------------------
// Items

#[inline(always)]
pub(crate) fn macro_exports_(vc_bind_path: &syn::Path) -> TokenStream {
    quote! { #vc_bind_path::__macro_exports }
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(vc_bind_path: &syn::Path) -> TokenStream {
    quote! { #vc_bind_path::__macro_exports::auto_register }
}

#[inline(always)]
pub(crate) fn type_path_(vc_bind_path: &syn::Path) -> TokenStream {
    quote! { #vc_bind_path::info::TypePath }
}

#[inline(always)]
pub(crate) fn type_handle_(vc_bind_path: &syn::Path) -> TokenStream {
    quote! { #vc_bind_path::info::TypeHandle }
}

#[inline(always)]
pub(crate) fn generic_type_path_cell_(vc_bind_path: &syn::Path) -> TokenStream {
    quote! { #vc_bind_path::impls::GenericTypePathCell }
}

#[inline(always)]
pub(crate) fn concat_(vc_bind_path: &syn::Path) -> TokenStream {
    quote! { #vc_bind_path::impls::concat }
}

#[inline(always)]
pub(crate) fn bind_(vc_bind_path: &syn::Path) -> TokenStream {
    quote! { #vc_bind_path::decl::Bind }
}

#[inline(always)]
pub(crate) fn decl_(vc_bind_path: &syn::Path) -> TokenStream {
    quote! { #vc_bind_path::decl }
}

#[inline(always)]
pub(crate) fn scalar_codec_(vc_bind_path: &syn::Path) -> TokenStream {
    quote! { #vc_bind_path::scalar::ScalarCodec }
}

#[inline(always)]
pub(crate) fn fault_(vc_bind_path: &syn::Path) -> TokenStream {
    quote! { #vc_bind_path::Fault }
}

// -----------------------------------------------------------------------------
// Prelude

pub(crate) mod fp {
    //! Fully qualified prelude items.

    use proc_macro2::TokenStream;
    use quote::{ToTokens, quote};

    macro_rules! define_fp {
        ($name:ident, $($segment:ident)::+) => {
            pub(crate) struct $name;

            impl ToTokens for $name {
                fn to_tokens(&self, tokens: &mut TokenStream) {
                    quote!($(::$segment)+).to_tokens(tokens);
                }
            }
        };
    }

    define_fp!(OptionFP, core::option::Option);
    define_fp!(ResultFP, core::result::Result);
    define_fp!(DefaultFP, core::default::Default);
    define_fp!(FromFP, core::convert::From);
}
