use std::collections::HashSet;

use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, GenericParam, Generics, Ident, Index, Member, Path, Type};

use super::{FieldAttributes, TypeAttributes, VariantAttributes};

// -----------------------------------------------------------------------------
// ElementField

pub(crate) struct ElementField<'a> {
    /// `self.#member`
    pub member: Member,
    pub ty: &'a Type,
    /// Name of the child node.
    pub node_name: String,
    pub attrs: FieldAttributes,
}

impl ElementField<'_> {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.attrs.skip.is_none()
    }
}

// -----------------------------------------------------------------------------
// ElementVariant

pub(crate) struct ElementVariant<'a> {
    pub ident: &'a Ident,
    /// Text written into the `Value` attribute.
    pub value: String,
}

// -----------------------------------------------------------------------------
// ElementShape

pub(crate) enum ElementShape<'a> {
    /// Named or tuple struct.
    Struct(Vec<ElementField<'a>>),
    Unit,
    /// Field-less enum.
    Enum(Vec<ElementVariant<'a>>),
}

// -----------------------------------------------------------------------------
// ElementInput

pub(crate) struct ElementInput<'a> {
    pub ident: &'a Ident,
    pub generics: &'a Generics,
    pub attrs: TypeAttributes,
    pub shape: ElementShape<'a>,
    el_codec: Path,
}

impl<'a> ElementInput<'a> {
    pub fn from_ast(ast: &'a DeriveInput) -> syn::Result<Self> {
        for param in &ast.generics.params {
            if !matches!(param, GenericParam::Type(_)) {
                return Err(syn::Error::new(
                    param.span(),
                    "`Element` supports type parameters only",
                ));
            }
        }

        let attrs = TypeAttributes::parse_attrs(&ast.attrs)?;

        let shape = match &ast.data {
            Data::Struct(data) => match &data.fields {
                Fields::Unit => ElementShape::Unit,
                fields => ElementShape::Struct(parse_fields(fields)?),
            },
            Data::Enum(data) => {
                if data.variants.is_empty() {
                    return Err(syn::Error::new(
                        ast.ident.span(),
                        "`Element` can not be derived for an enum without variants",
                    ));
                }
                let mut variants = Vec::with_capacity(data.variants.len());
                let mut seen = HashSet::new();
                for variant in &data.variants {
                    if !matches!(variant.fields, Fields::Unit) {
                        return Err(syn::Error::new(
                            variant.span(),
                            "`Element` supports field-less enums only",
                        ));
                    }
                    let attrs = VariantAttributes::parse_attrs(&variant.attrs)?;
                    let value = attrs
                        .rename
                        .map(|name| name.value())
                        .unwrap_or_else(|| variant.ident.to_string());
                    if !seen.insert(value.clone()) {
                        return Err(syn::Error::new(variant.span(), format!("duplicate variant name `{value}`")));
                    }
                    variants.push(ElementVariant {
                        ident: &variant.ident,
                        value,
                    });
                }
                ElementShape::Enum(variants)
            }
            Data::Union(data) => {
                return Err(syn::Error::new(
                    data.union_token.span(),
                    "`Element` can not be derived for unions",
                ));
            }
        };

        Ok(Self {
            ident: &ast.ident,
            generics: &ast.generics,
            attrs,
            shape,
            el_codec: crate::path::el_codec(),
        })
    }

    #[inline]
    pub fn el_codec(&self) -> &Path {
        &self.el_codec
    }

    #[inline]
    pub fn is_generic(&self) -> bool {
        !self.generics.params.is_empty()
    }

    /// Field types that are saved, without repeats, in declaration order.
    pub fn active_types(&self) -> Vec<&'a Type> {
        let ElementShape::Struct(fields) = &self.shape else {
            return Vec::new();
        };
        // cannot use `BTreeSet` because `syn::Type` does not impl `Ord`.
        let mut seen: HashSet<&Type> = HashSet::new();
        fields
            .iter()
            .filter(|field| field.is_active())
            .filter(|field| seen.insert(field.ty))
            .map(|field| field.ty)
            .collect()
    }
}

fn parse_fields(fields: &Fields) -> syn::Result<Vec<ElementField<'_>>> {
    let mut parsed = Vec::with_capacity(fields.len());
    let mut seen = HashSet::new();

    for (index, field) in fields.iter().enumerate() {
        let attrs = FieldAttributes::parse_attrs(&field.attrs)?;
        let (member, default_name) = match &field.ident {
            Some(ident) => (Member::Named(ident.clone()), ident.to_string()),
            None => (Member::Unnamed(Index::from(index)), format!("Item{index}")),
        };
        let node_name = attrs
            .rename
            .as_ref()
            .map(|name| name.value())
            .unwrap_or(default_name);

        if attrs.skip.is_none() && !seen.insert(node_name.clone()) {
            return Err(syn::Error::new(field.span(), format!("duplicate child name `{node_name}`")));
        }

        parsed.push(ElementField {
            member,
            ty: &field.ty,
            node_name,
            attrs,
        });
    }
    Ok(parsed)
}
