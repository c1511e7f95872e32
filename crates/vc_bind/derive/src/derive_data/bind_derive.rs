use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, Ident, Index, Member, Type};

use super::{FieldAttributes, TypeAttributes, TypeMeta};

// -----------------------------------------------------------------------------
// Parts

pub(crate) struct RecordField<'a> {
    pub member: Member,
    pub ty: &'a Type,
    /// The bound name, `rename` or the field name, or the index of a
    /// tuple field.
    pub name: String,
    pub attrs: FieldAttributes,
}

impl RecordField<'_> {
    #[inline]
    pub fn is_skipped(&self) -> bool {
        self.attrs.skip.is_some()
    }
}

pub(crate) struct UnitVariant<'a> {
    pub ident: &'a Ident,
    pub name: String,
}

pub(crate) struct UnionVariant<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
}

pub(crate) enum Body<'a> {
    Record(Vec<RecordField<'a>>),
    /// A scalar converted through `From` impls.
    Bridge(Type),
    Projection(Type),
    /// Fieldless enum, encoded as the variant name.
    UnitEnum(Vec<UnitVariant<'a>>),
    /// Enum of single-field tuple variants, a sealed union.
    Union(Vec<UnionVariant<'a>>),
}

// -----------------------------------------------------------------------------
// BindDerive

pub(crate) struct BindDerive<'a> {
    pub meta: TypeMeta<'a>,
    pub body: Body<'a>,
}

impl<'a> BindDerive<'a> {
    pub fn from_input(input: &'a DeriveInput) -> syn::Result<Self> {
        let attrs = TypeAttributes::parse(&input.attrs)?;

        let body = match (&attrs.bridge, &attrs.project) {
            (Some(_), Some(project)) => {
                return Err(syn::Error::new_spanned(
                    project,
                    "`bridge` and `project` cannot be combined",
                ));
            }
            (Some(bridge), None) => Body::Bridge(bridge.clone()),
            (None, Some(project)) => Body::Projection(project.clone()),
            (None, None) => match &input.data {
                Data::Struct(data) => Self::record_body(&data.fields)?,
                Data::Enum(data) => {
                    Self::enum_body(input, data.variants.iter().collect::<Vec<_>>())?
                }
                Data::Union(data) => {
                    return Err(syn::Error::new(
                        data.union_token.span(),
                        "unions cannot derive `Bind`",
                    ));
                }
            },
        };

        let is_named_record = matches!(body, Body::Record(_))
            && matches!(&input.data, Data::Struct(data) if matches!(data.fields, Fields::Named(_)));
        if let Some(span) = attrs.accessors
            && !is_named_record
        {
            return Err(syn::Error::new(
                span,
                "`accessors` only applies to structs with named fields",
            ));
        }
        if let Some(order) = &attrs.order
            && !matches!(body, Body::Record(_))
        {
            return Err(syn::Error::new(
                order.first().map_or_else(|| input.ident.span(), Spanned::span),
                "`order` only applies to records",
            ));
        }

        let meta = TypeMeta::new(&input.ident, &input.generics, attrs)?;
        Ok(Self { meta, body })
    }

    fn record_body(fields: &'a Fields) -> syn::Result<Body<'a>> {
        let mut parsed: Vec<RecordField<'a>> = Vec::with_capacity(fields.len());
        for (index, field) in fields.iter().enumerate() {
            let attrs = FieldAttributes::parse(&field.attrs)?;
            let (member, natural) = match &field.ident {
                Some(ident) => (Member::Named(ident.clone()), ident.to_string()),
                None => (
                    Member::Unnamed(Index::from(index)),
                    index.to_string(),
                ),
            };
            let name = attrs.rename.as_ref().map_or(natural, |lit| lit.value());

            if attrs.skip.is_none() && parsed.iter().any(|f| !f.is_skipped() && f.name == name) {
                return Err(syn::Error::new(
                    field.span(),
                    format_args!("field name `{name}` is bound twice"),
                ));
            }
            if let Some(span) = attrs.scalar
                && attrs.union.is_some()
            {
                return Err(syn::Error::new(span, "`scalar` fields cannot be unions"));
            }

            parsed.push(RecordField {
                member,
                ty: &field.ty,
                name,
                attrs,
            });
        }

        Ok(Body::Record(parsed))
    }

    fn enum_body(input: &'a DeriveInput, variants: Vec<&'a syn::Variant>) -> syn::Result<Body<'a>> {
        if variants.is_empty() {
            return Err(syn::Error::new(
                input.ident.span(),
                "empty enums have no values to bind",
            ));
        }

        if variants.iter().all(|v| matches!(v.fields, Fields::Unit)) {
            let mut units = Vec::with_capacity(variants.len());
            for variant in variants {
                let attrs = FieldAttributes::parse(&variant.attrs)?;
                attrs.check_variant(variant.span())?;
                let name = attrs
                    .rename
                    .as_ref()
                    .map_or_else(|| variant.ident.to_string(), |lit| lit.value());
                units.push(UnitVariant {
                    ident: &variant.ident,
                    name,
                });
            }
            return Ok(Body::UnitEnum(units));
        }

        let mut members = Vec::with_capacity(variants.len());
        for variant in variants {
            let Fields::Unnamed(fields) = &variant.fields else {
                return Err(union_shape_error(variant));
            };
            let Some(field) = fields.unnamed.first().filter(|_| fields.unnamed.len() == 1) else {
                return Err(union_shape_error(variant));
            };
            let attrs = FieldAttributes::parse(&variant.attrs)?;
            if attrs.rename.is_some() {
                return Err(syn::Error::new(
                    variant.span(),
                    "union members are tagged by their own type, use `tag` on the member type",
                ));
            }
            attrs.check_variant(variant.span())?;
            members.push(UnionVariant {
                ident: &variant.ident,
                ty: &field.ty,
            });
        }
        Ok(Body::Union(members))
    }
}

fn union_shape_error(variant: &syn::Variant) -> syn::Error {
    syn::Error::new(
        variant.span(),
        "enums must have only unit variants, or only variants holding a single unnamed field",
    )
}
