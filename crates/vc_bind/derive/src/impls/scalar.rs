use proc_macro2::TokenStream;
use quote::quote;
use syn::Type;

use crate::derive_data::{TypeMeta, UnitVariant};
use crate::path::fp::{FromFP, ResultFP};

/// A fieldless enum travels as the name of its variant.
pub(crate) fn unit_enum_codec(meta: &TypeMeta, variants: &[UnitVariant]) -> TokenStream {
    let vc_bind_path = meta.vc_bind_path();
    let codec_ = crate::path::scalar_codec_(vc_bind_path);
    let fault_ = crate::path::fault_(vc_bind_path);
    let type_path_ = crate::path::type_path_(vc_bind_path);
    let exports_ = crate::path::macro_exports_(vc_bind_path);

    let to_name = variants
        .iter()
        .map(|UnitVariant { ident, name }| quote!(Self::#ident => #name));
    let from_name = variants
        .iter()
        .map(|UnitVariant { ident, name }| quote!(#name => #ResultFP::Ok(Self::#ident)));

    quote! {
        #codec_::bridge::<Self, #exports_::String>(
            |value| #ResultFP::Ok(#exports_::String::from(match value {
                #(#to_name,)*
            })),
            |text| match text.as_str() {
                #(#from_name,)*
                other => #ResultFP::Err(#fault_::OutOfRange {
                    target: <Self as #type_path_>::type_path(),
                    value: #exports_::String::from(other),
                }),
            },
        )
    }
}

/// A type reduced to the scalar `wire` through `From` impls in both
/// directions.
pub(crate) fn bridge_codec(meta: &TypeMeta, wire: &Type) -> TokenStream {
    let codec_ = crate::path::scalar_codec_(meta.vc_bind_path());

    quote! {
        #codec_::bridge::<Self, #wire>(
            |value| #ResultFP::Ok(<#wire as #FromFP<&Self>>::from(value)),
            |wire| #ResultFP::Ok(<Self as #FromFP<#wire>>::from(wire)),
        )
    }
}
