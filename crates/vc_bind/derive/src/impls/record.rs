use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::derive_data::{RecordField, TypeMeta};
use crate::path::fp::{DefaultFP, ResultFP};

/// `FieldCandidate` expression of a bound field.
fn field_candidate(meta: &TypeMeta, field: &RecordField) -> TokenStream {
    let vc_bind_path = meta.vc_bind_path();
    let decl_ = crate::path::decl_(vc_bind_path);
    let type_handle_ = crate::path::type_handle_(vc_bind_path);

    let RecordField {
        member, ty, name, ..
    } = field;
    let attrs = &field.attrs;

    let constructor = if attrs.scalar.is_some() {
        quote!(#decl_::FieldCandidate::scalar::<Self, #ty>)
    } else {
        quote!(#decl_::FieldCandidate::field::<Self, #ty>)
    };

    let setter = meta.attrs().accessors.map(|_| {
        quote! {
            .with_setter::<Self, #ty>(|value, field| value.#member = field)
        }
    });

    // A field with a fallback is optional unless stated otherwise.
    let required = match (&attrs.required, attrs.default) {
        (Some(required), _) => Some(quote!(.with_required(#required))),
        (None, Some(_)) => Some(quote!(.with_required(false))),
        (None, None) => None,
    };

    let union_members = attrs.union.as_ref().map(|members| {
        quote! {
            .with_union_members([#(#type_handle_::of::<#members>()),*])
        }
    });

    quote! {
        #constructor(#name, |value| &value.#member)
            #setter
            #required
            #union_members
    }
}

/// Generate the `RecordDecl` of a struct.
pub(crate) fn record_decl(meta: &TypeMeta, fields: &[RecordField]) -> TokenStream {
    let vc_bind_path = meta.vc_bind_path();
    let decl_ = crate::path::decl_(vc_bind_path);
    let exports_ = crate::path::macro_exports_(vc_bind_path);

    let candidates = fields
        .iter()
        .filter(|field| !field.is_skipped())
        .map(|field| field_candidate(meta, field));

    let (candidates, factory) = if meta.attrs().accessors.is_some() {
        (
            quote!(#(.with_property(#candidates))*),
            quote! {
                .with_default(|| {
                    #exports_::Box::new(<Self as #DefaultFP>::default()) as #decl_::Instance
                })
            },
        )
    } else {
        (
            quote!(#(.with_component(#candidates))*),
            constructor(meta, fields),
        )
    };

    let order = meta.attrs().order.as_ref().map(|names| {
        quote!(.with_order([#(#names),*]))
    });

    quote! {
        #decl_::RecordDecl::new()
            #candidates
            #factory
            #order
    }
}

/// `.with_constructor(..)` taking every bound field from the slate.
fn constructor(meta: &TypeMeta, fields: &[RecordField]) -> TokenStream {
    let vc_bind_path = meta.vc_bind_path();
    let decl_ = crate::path::decl_(vc_bind_path);
    let exports_ = crate::path::macro_exports_(vc_bind_path);

    let slate = if fields.iter().all(RecordField::is_skipped) {
        format_ident!("_slate")
    } else {
        format_ident!("slate")
    };

    let inits = fields.iter().map(|field| {
        let RecordField {
            member, ty, name, ..
        } = field;
        let attrs = &field.attrs;
        let optional = attrs.default.is_some()
            || attrs.required.as_ref().is_some_and(|required| !required.value);

        let value = if field.is_skipped() {
            quote!(<#ty as #DefaultFP>::default())
        } else if optional {
            quote!(#slate.take_or_default::<#ty>(#name)?)
        } else {
            quote!(#slate.take::<#ty>(#name)?)
        };
        quote!(#member: #value)
    });

    quote! {
        .with_constructor(|#slate| {
            #ResultFP::Ok(#exports_::Box::new(Self { #(#inits),* }) as #decl_::Instance)
        })
    }
}
