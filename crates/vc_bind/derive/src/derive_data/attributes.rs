use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::punctuated::Punctuated;
use syn::{Attribute, Ident, LitBool, LitInt, LitStr, Token, Type};

use crate::BIND_ATTRIBUTE_NAME;

fn duplicate(meta: &ParseNestedMeta) -> syn::Error {
    let name = meta
        .path
        .get_ident()
        .map(Ident::to_string)
        .unwrap_or_default();
    meta.error(format_args!("duplicate `{name}` attribute"))
}

fn set_once<T>(slot: &mut Option<T>, meta: &ParseNestedMeta, value: T) -> syn::Result<()> {
    if slot.is_some() {
        return Err(duplicate(meta));
    }
    *slot = Some(value);
    Ok(())
}

fn parse_types(meta: &ParseNestedMeta) -> syn::Result<Vec<Type>> {
    let content;
    syn::parenthesized!(content in meta.input);
    let types = Punctuated::<Type, Token![,]>::parse_terminated(&content)?;
    Ok(types.into_iter().collect())
}

fn parse_type(meta: &ParseNestedMeta) -> syn::Result<Type> {
    let content;
    syn::parenthesized!(content in meta.input);
    let ty = content.parse()?;
    if !content.is_empty() {
        return Err(content.error("expected a single type"));
    }
    Ok(ty)
}

// `order(a, b)`, `order("a", "b")` and `order(0, 1)` for tuple structs.
fn parse_order(meta: &ParseNestedMeta) -> syn::Result<Vec<LitStr>> {
    let content;
    syn::parenthesized!(content in meta.input);
    let mut names = Vec::new();
    while !content.is_empty() {
        let lookahead = content.lookahead1();
        if lookahead.peek(Ident) {
            let ident = content.parse::<Ident>()?;
            names.push(LitStr::new(&ident.to_string(), ident.span()));
        } else if lookahead.peek(LitStr) {
            names.push(content.parse::<LitStr>()?);
        } else if lookahead.peek(LitInt) {
            let index = content.parse::<LitInt>()?;
            names.push(LitStr::new(index.base10_digits(), index.span()));
        } else {
            return Err(lookahead.error());
        }
        if !content.is_empty() {
            content.parse::<Token![,]>()?;
        }
    }
    Ok(names)
}

fn bind_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident(BIND_ATTRIBUTE_NAME))
}

// -----------------------------------------------------------------------------
// TypeAttributes

/// Attributes on the type itself.
#[derive(Default)]
pub(crate) struct TypeAttributes {
    /// Bind fields through setters on a `Default` value.
    pub accessors: Option<Span>,
    pub auto_register: Option<Span>,
    pub type_path: Option<LitStr>,
    pub tag: Option<LitStr>,
    pub order: Option<Vec<LitStr>>,
    pub member_of: Vec<Type>,
    /// Encode the type as the given scalar through `From` conversions.
    pub bridge: Option<Type>,
    /// Take the record fields from the given data type.
    pub project: Option<Type>,
}

impl TypeAttributes {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in bind_attrs(attrs) {
            attr.parse_nested_meta(|meta| this.parse_meta(meta))?;
        }
        Ok(this)
    }

    fn parse_meta(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        let span = meta.path.require_ident()?.span();
        if meta.path.is_ident("accessors") {
            set_once(&mut self.accessors, &meta, span)
        } else if meta.path.is_ident("auto_register") {
            set_once(&mut self.auto_register, &meta, span)
        } else if meta.path.is_ident("type_path") {
            let path = meta.value()?.parse::<LitStr>()?;
            if path.value().starts_with("::") || path.value().is_empty() {
                return Err(syn::Error::new(
                    path.span(),
                    "type paths never start with `::`",
                ));
            }
            set_once(&mut self.type_path, &meta, path)
        } else if meta.path.is_ident("tag") {
            let tag = meta.value()?.parse::<LitStr>()?;
            set_once(&mut self.tag, &meta, tag)
        } else if meta.path.is_ident("order") {
            let order = parse_order(&meta)?;
            set_once(&mut self.order, &meta, order)
        } else if meta.path.is_ident("member_of") {
            self.member_of.extend(parse_types(&meta)?);
            Ok(())
        } else if meta.path.is_ident("bridge") {
            let ty = parse_type(&meta)?;
            set_once(&mut self.bridge, &meta, ty)
        } else if meta.path.is_ident("project") {
            let ty = parse_type(&meta)?;
            set_once(&mut self.project, &meta, ty)
        } else {
            Err(meta.error(
                "unknown type attribute, expected one of `accessors`, `auto_register`, \
                 `type_path`, `tag`, `order`, `member_of`, `bridge`, `project`",
            ))
        }
    }
}

// -----------------------------------------------------------------------------
// FieldAttributes

/// Attributes on a field or an enum variant.
#[derive(Default)]
pub(crate) struct FieldAttributes {
    pub rename: Option<LitStr>,
    pub required: Option<LitBool>,
    /// Absent values fall back to `Default::default()`.
    pub default: Option<Span>,
    pub skip: Option<Span>,
    /// The field type is resolved through the scalar registry only.
    pub scalar: Option<Span>,
    pub union: Option<Vec<Type>>,
}

impl FieldAttributes {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in bind_attrs(attrs) {
            attr.parse_nested_meta(|meta| this.parse_meta(meta))?;
        }
        Ok(this)
    }

    fn parse_meta(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        let span = meta.path.require_ident()?.span();
        if meta.path.is_ident("rename") {
            let name = meta.value()?.parse::<LitStr>()?;
            set_once(&mut self.rename, &meta, name)
        } else if meta.path.is_ident("required") {
            let required = if meta.input.peek(Token![=]) {
                meta.value()?.parse::<LitBool>()?
            } else {
                LitBool::new(true, span)
            };
            set_once(&mut self.required, &meta, required)
        } else if meta.path.is_ident("default") {
            set_once(&mut self.default, &meta, span)
        } else if meta.path.is_ident("skip") {
            set_once(&mut self.skip, &meta, span)
        } else if meta.path.is_ident("scalar") {
            set_once(&mut self.scalar, &meta, span)
        } else if meta.path.is_ident("union") {
            let members = parse_types(&meta)?;
            if members.is_empty() {
                return Err(meta.error("`union` needs at least one member"));
            }
            set_once(&mut self.union, &meta, members)
        } else {
            Err(meta.error(
                "unknown field attribute, expected one of `rename`, `required`, \
                 `default`, `skip`, `scalar`, `union`",
            ))
        }
    }

    /// Only `rename` applies to enum variants.
    pub fn check_variant(&self, span: Span) -> syn::Result<()> {
        let misplaced = self.required.is_some()
            || self.default.is_some()
            || self.skip.is_some()
            || self.scalar.is_some()
            || self.union.is_some();
        if misplaced {
            return Err(syn::Error::new(span, "variants only accept `rename`"));
        }
        Ok(())
    }
}
