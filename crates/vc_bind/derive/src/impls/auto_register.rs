use proc_macro2::TokenStream;

use crate::derive_data::TypeMeta;

/// Generate `auto_register` implementation
#[cfg(feature = "auto_register")]
pub(crate) fn get_auto_register_impl(meta: &TypeMeta) -> TokenStream {
    use quote::quote_spanned;

    let Some(span) = meta.attrs().auto_register else {
        return TokenStream::new();
    };
    // Concrete instantiations of generic types are unknown here.
    if meta.is_generic() {
        return TokenStream::new();
    }

    let auto_register_ = crate::path::auto_register_(meta.vc_bind_path());
    let type_handle_ = crate::path::type_handle_(meta.vc_bind_path());
    let ident = meta.ident();

    quote_spanned! { span =>
        #auto_register_::inventory::submit! {
            #auto_register_::AutoRegistration(#type_handle_::of::<#ident>)
        }
    }
}

/// Generate `auto_register` implementation
#[cfg(not(feature = "auto_register"))]
pub(crate) fn get_auto_register_impl(_: &TypeMeta) -> TokenStream {
    TokenStream::new()
}
