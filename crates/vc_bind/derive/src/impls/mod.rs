//! Code generation.

// -----------------------------------------------------------------------------
// Modules

mod auto_register;
mod record;
mod scalar;
mod type_path;
mod union;

// -----------------------------------------------------------------------------
// Internal API

use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::{BindDerive, Body};

pub(crate) use auto_register::get_auto_register_impl;
pub(crate) use type_path::impl_trait_type_path;

/// Generate implementation codes for `Bind`
pub(crate) fn impl_trait_bind(derive: &BindDerive) -> TokenStream {
    let meta = &derive.meta;
    let vc_bind_path = meta.vc_bind_path();
    let bind_ = crate::path::bind_(vc_bind_path);
    let decl_ = crate::path::decl_(vc_bind_path);
    let type_handle_ = crate::path::type_handle_(vc_bind_path);

    let tag = meta.attrs().tag.as_ref().map(|tag| quote!(.with_tag(#tag)));

    let type_args = meta.params().filter_map(|param| match param {
        syn::GenericParam::Type(param) => {
            let ident = &param.ident;
            Some(quote!(.with_type_arg(#type_handle_::of::<#ident>())))
        }
        _ => None,
    });

    let structure = match &derive.body {
        Body::Record(fields) => {
            let record = record::record_decl(meta, fields);
            quote!(.with_record(#record))
        }
        Body::Projection(data) => quote! {
            .with_record(#decl_::RecordDecl::projected(#decl_::Projection::of::<Self, #data>()))
        },
        Body::Bridge(wire) => {
            let codec = scalar::bridge_codec(meta, wire);
            quote!(.with_scalar(#codec))
        }
        Body::UnitEnum(variants) => {
            let codec = scalar::unit_enum_codec(meta, variants);
            quote!(.with_scalar(#codec))
        }
        Body::Union(variants) => {
            let union = union::sealed_union_decl(meta, variants);
            quote!(.with_union(#union))
        }
    };

    let supertypes = union::supertypes(meta);

    let ident = meta.ident();
    let (impl_generics, ty_generics, where_clause) = meta.split_generics(&bind_);

    quote! {
        impl #impl_generics #bind_ for #ident #ty_generics #where_clause {
            fn declare() -> #decl_::TypeDecl {
                #decl_::TypeDecl::new()
                    #tag
                    #(#type_args)*
                    #structure
                    #supertypes
            }
        }
    }
}
