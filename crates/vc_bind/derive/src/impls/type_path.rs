use proc_macro2::TokenStream;
use quote::quote;
use syn::GenericParam;

use crate::derive_data::TypeMeta;
use crate::path::fp::OptionFP;

fn static_path_cell(meta: &TypeMeta, generator: TokenStream) -> TokenStream {
    let path_cell_ = crate::path::generic_type_path_cell_(meta.vc_bind_path());

    quote! {
        static CELL: #path_cell_ = #path_cell_::new();
        CELL.get_or_insert::<Self>(|| {
            #generator
        })
    }
}

/// `<A, B, 3>` as a list of string expressions, each argument rendered by
/// `render` for type parameters.
fn generic_args(meta: &TypeMeta, render: &TokenStream) -> Vec<TokenStream> {
    let exports_ = crate::path::macro_exports_(meta.vc_bind_path());
    let type_path_ = crate::path::type_path_(meta.vc_bind_path());

    let mut parts = vec![quote!("<")];
    for (index, param) in meta.params().enumerate() {
        if index > 0 {
            parts.push(quote!(", "));
        }
        match param {
            GenericParam::Type(param) => {
                let ident = &param.ident;
                parts.push(quote!(<#ident as #type_path_>::#render()));
            }
            GenericParam::Const(param) => {
                let ident = &param.ident;
                parts.push(quote!(&#exports_::ToString::to_string(&#ident)));
            }
            GenericParam::Lifetime(_) => {}
        }
    }
    parts.push(quote!(">"));
    parts
}

/// Generate implementation codes for `TypePath`
pub(crate) fn impl_trait_type_path(meta: &TypeMeta) -> TokenStream {
    let vc_bind_path = meta.vc_bind_path();
    let type_path_ = crate::path::type_path_(vc_bind_path);
    let concat_ = crate::path::concat_(vc_bind_path);

    let ident = meta.ident();
    let type_ident = meta.type_ident();
    let module_path = meta.module_path();

    let base_path = match (&meta.attrs().type_path, &module_path) {
        (Some(path), _) => quote!(#path),
        (None, Some(module)) => quote!(::core::concat!(#module, "::", #type_ident)),
        (None, None) => quote!(#type_ident),
    };

    let (type_path, type_name, inline_flag) = if meta.is_generic() {
        let path_args = generic_args(meta, &quote!(type_path));
        let name_args = generic_args(meta, &quote!(type_name));
        (
            static_path_cell(meta, quote!(#concat_(&[#base_path, #(#path_args),*]))),
            static_path_cell(meta, quote!(#concat_(&[#type_ident, #(#name_args),*]))),
            TokenStream::new(),
        )
    } else {
        (base_path, quote!(#type_ident), quote!(#[inline]))
    };

    let module_path = match module_path {
        Some(module) => quote!(#OptionFP::Some(#module)),
        None => quote!(#OptionFP::None),
    };

    let (impl_generics, ty_generics, where_clause) = meta.split_generics(&type_path_);

    quote! {
        impl #impl_generics #type_path_ for #ident #ty_generics #where_clause {
            #inline_flag
            fn type_path() -> &'static str {
                #type_path
            }

            #inline_flag
            fn type_name() -> &'static str {
                #type_name
            }

            #[inline]
            fn type_ident() -> &'static str {
                #type_ident
            }

            #[inline]
            fn module_path() -> #OptionFP<&'static str> {
                #module_path
            }
        }
    }
}
