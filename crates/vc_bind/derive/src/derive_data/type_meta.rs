use proc_macro2::TokenStream;
use quote::quote;
use syn::{GenericParam, Generics, Ident, Path, WhereClause};

use super::TypeAttributes;

/// Everything about the derived type except its body.
pub(crate) struct TypeMeta<'a> {
    vc_bind_path: Path,
    ident: &'a Ident,
    generics: &'a Generics,
    attrs: TypeAttributes,
}

impl<'a> TypeMeta<'a> {
    pub fn new(ident: &'a Ident, generics: &'a Generics, attrs: TypeAttributes) -> syn::Result<Self> {
        if let Some(lifetime) = generics.lifetimes().next() {
            return Err(syn::Error::new_spanned(
                lifetime,
                "bound types must be 'static, lifetime parameters are not supported",
            ));
        }
        Ok(Self {
            vc_bind_path: crate::path::vc_bind(),
            ident,
            generics,
            attrs,
        })
    }

    #[inline]
    pub fn vc_bind_path(&self) -> &Path {
        &self.vc_bind_path
    }

    #[inline]
    pub fn ident(&self) -> &Ident {
        self.ident
    }

    #[inline]
    pub fn attrs(&self) -> &TypeAttributes {
        &self.attrs
    }

    #[inline]
    pub fn is_generic(&self) -> bool {
        !self.generics.params.is_empty()
    }

    /// Type and const parameter names, in declaration order.
    pub fn params(&self) -> impl Iterator<Item = &GenericParam> {
        self.generics.params.iter()
    }

    /// The name without modules and generics, honoring `type_path`.
    pub fn type_ident(&self) -> String {
        match &self.attrs.type_path {
            Some(path) => {
                let path = path.value();
                path.rsplit("::").next().unwrap_or_default().to_owned()
            }
            None => self.ident.to_string(),
        }
    }

    /// Tokens of a `&'static str` naming the module of the type, `None` for
    /// a custom path without modules.
    pub fn module_path(&self) -> Option<TokenStream> {
        match &self.attrs.type_path {
            Some(path) => {
                let path = path.value();
                let (module, _) = path.rsplit_once("::")?;
                Some(quote!(#module))
            }
            None => Some(quote!(::core::module_path!())),
        }
    }

    /// `impl` generics, type generics and a where clause where every type
    /// parameter is bounded by `bound`.
    pub fn split_generics(&self, bound: &TokenStream) -> (TokenStream, TokenStream, WhereClause) {
        let (impl_generics, ty_generics, where_clause) = self.generics.split_for_impl();
        let mut where_clause = where_clause.cloned().unwrap_or_else(|| WhereClause {
            where_token: Default::default(),
            predicates: Default::default(),
        });
        for param in self.generics.type_params() {
            let ident = &param.ident;
            where_clause
                .predicates
                .push(syn::parse_quote!(#ident: #bound));
        }
        (quote!(#impl_generics), quote!(#ty_generics), where_clause)
    }
}
