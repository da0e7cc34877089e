use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::{Attribute, LitStr};

use crate::ELEMENT_ATTRIBUTE_NAME;

fn set_once<T>(slot: &mut Option<T>, value: T, meta: &ParseNestedMeta) -> syn::Result<()> {
    if slot.is_some() {
        return Err(meta.error("duplicate element attribute"));
    }
    *slot = Some(value);
    Ok(())
}

fn parse_name(meta: &ParseNestedMeta) -> syn::Result<LitStr> {
    let name: LitStr = meta.value()?.parse()?;
    if name.value().trim().is_empty() {
        return Err(syn::Error::new(name.span(), "expected a non-empty string"));
    }
    Ok(name)
}

fn parse_each(attrs: &[Attribute], mut f: impl FnMut(ParseNestedMeta) -> syn::Result<()>) -> syn::Result<()> {
    for attr in attrs {
        if attr.path().is_ident(ELEMENT_ATTRIBUTE_NAME) {
            attr.parse_nested_meta(&mut f)?;
        }
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// TypeAttributes

/// `#[element(..)]` on the type.
#[derive(Default, Debug)]
pub(crate) struct TypeAttributes {
    /// `type_path = "a::b::C"`
    pub type_path: Option<LitStr>,
    /// `auto_register`
    pub auto_register: Option<Span>,
    /// `default`
    pub default: Option<Span>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();
        parse_each(attrs, |meta| {
            if meta.path.is_ident("type_path") {
                let path = parse_name(&meta)?;
                if path.value().starts_with("::") {
                    return Err(syn::Error::new(path.span(), "did not expect a leading double colon (`::`)"));
                }
                set_once(&mut parsed.type_path, path, &meta)
            } else if meta.path.is_ident("auto_register") {
                set_once(&mut parsed.auto_register, meta.path.span(), &meta)
            } else if meta.path.is_ident("default") {
                set_once(&mut parsed.default, meta.path.span(), &meta)
            } else {
                Err(meta.error("expected `type_path`, `auto_register` or `default`"))
            }
        })?;
        Ok(parsed)
    }
}

// -----------------------------------------------------------------------------
// FieldAttributes

/// `#[element(..)]` on a field.
#[derive(Default, Debug)]
pub(crate) struct FieldAttributes {
    pub rename: Option<LitStr>,
    pub default: Option<Span>,
    pub skip: Option<Span>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();
        parse_each(attrs, |meta| {
            if meta.path.is_ident("rename") {
                set_once(&mut parsed.rename, parse_name(&meta)?, &meta)
            } else if meta.path.is_ident("default") {
                set_once(&mut parsed.default, meta.path.span(), &meta)
            } else if meta.path.is_ident("skip") {
                set_once(&mut parsed.skip, meta.path.span(), &meta)
            } else {
                Err(meta.error("expected `rename`, `default` or `skip`"))
            }
        })?;

        if let Some(span) = parsed.skip
            && (parsed.rename.is_some() || parsed.default.is_some())
        {
            return Err(syn::Error::new(span, "`skip` can not be combined with `rename` or `default`"));
        }
        Ok(parsed)
    }
}

// -----------------------------------------------------------------------------
// VariantAttributes

/// `#[element(..)]` on an enum variant.
#[derive(Default, Debug)]
pub(crate) struct VariantAttributes {
    pub rename: Option<LitStr>,
}

impl VariantAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();
        parse_each(attrs, |meta| {
            if meta.path.is_ident("rename") {
                set_once(&mut parsed.rename, parse_name(&meta)?, &meta)
            } else {
                Err(meta.error("expected `rename`"))
            }
        })?;
        Ok(parsed)
    }
}
