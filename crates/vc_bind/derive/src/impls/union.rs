use proc_macro2::TokenStream;
use quote::quote;
use syn::{GenericArgument, PathArguments, Type};

use crate::derive_data::{TypeMeta, UnionVariant};
use crate::path::fp::FromFP;

/// Generate the sealed `UnionDecl` of an enum of single-field variants.
pub(crate) fn sealed_union_decl(meta: &TypeMeta, variants: &[UnionVariant]) -> TokenStream {
    let vc_bind_path = meta.vc_bind_path();
    let decl_ = crate::path::decl_(vc_bind_path);
    let type_handle_ = crate::path::type_handle_(vc_bind_path);
    let exports_ = crate::path::macro_exports_(vc_bind_path);

    let arms = variants.iter().map(|UnionVariant { ident, .. }| {
        quote!(Self::#ident(inner) => inner as &dyn #exports_::Any)
    });

    let members = variants.iter().map(|UnionVariant { ident, ty }| {
        quote! {
            .with_member(#decl_::UnionMemberDecl::new(
                #type_handle_::of::<#ty>(),
                |instance| {
                    instance
                        .downcast::<#ty>()
                        .map(|inner| #exports_::Box::new(Self::#ident(*inner)) as #decl_::Instance)
                },
            ))
        }
    });

    quote! {
        #decl_::UnionDecl::sealed(|value| {
            value.downcast_ref::<Self>().map(|value| match value {
                #(#arms,)*
            })
        })
        #(#members)*
    }
}

// `Box<dyn Trait>`, the shape of an open union declared with `open_union!`.
fn is_boxed_trait_object(ty: &Type) -> bool {
    let Type::Path(path) = ty else {
        return false;
    };
    let Some(last) = path.path.segments.last() else {
        return false;
    };
    if last.ident != "Box" {
        return false;
    }
    let PathArguments::AngleBracketed(args) = &last.arguments else {
        return false;
    };
    matches!(
        args.args.first(),
        Some(GenericArgument::Type(Type::TraitObject(_)))
    )
}

/// `.with_supertype(..)` for every `member_of` union.
///
/// Boxed trait objects are lifted by unsized coercion, other unions through
/// `From<Self>`.
pub(crate) fn supertypes(meta: &TypeMeta) -> TokenStream {
    let vc_bind_path = meta.vc_bind_path();
    let decl_ = crate::path::decl_(vc_bind_path);
    let exports_ = crate::path::macro_exports_(vc_bind_path);

    let supertypes = meta.attrs().member_of.iter().map(|union| {
        let lift = if is_boxed_trait_object(union) {
            quote! {
                let lifted: #union = value;
                #exports_::Box::new(lifted) as #decl_::Instance
            }
        } else {
            quote! {
                #exports_::Box::new(<#union as #FromFP<Self>>::from(*value)) as #decl_::Instance
            }
        };
        quote! {
            .with_supertype(#decl_::Supertype::of::<#union>(|instance| {
                instance.downcast::<Self>().map(|value| { #lift })
            }))
        }
    });

    quote!(#(#supertypes)*)
}
