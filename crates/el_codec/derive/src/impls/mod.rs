//! Code generation.

// -----------------------------------------------------------------------------
// Modules

mod auto_register;
mod element;
mod get_type_meta;
mod type_path;

use proc_macro2::TokenStream;
use quote::quote;
use syn::{WhereClause, parse_quote};

use crate::derive_data::ElementInput;

pub(crate) fn impl_element(input: &ElementInput) -> TokenStream {
    let type_path = type_path::impl_type_path(input);
    let element = element::impl_element(input);
    let get_type_meta = get_type_meta::impl_get_type_meta(input);
    let auto_register = auto_register::impl_auto_register(input);

    quote! {
        const _: () = {
            #type_path
            #element
            #get_type_meta
            #auto_register
        };
    }
}

/// The input's where clause plus `T: TypePath` for every type parameter.
///
/// Generic inputs also get `bound` on every saved field type. Concrete
/// field types are checked where they are used, bounding them here would
/// make recursive types such as `struct Tree(Vec<Tree>)` overflow.
pub(crate) fn where_clause_with(input: &ElementInput, bound: Option<&TokenStream>) -> WhereClause {
    let type_path_ = crate::path::type_path_(input.el_codec());

    let mut where_clause = input
        .generics
        .where_clause
        .clone()
        .unwrap_or_else(|| parse_quote!(where));

    for param in input.generics.type_params() {
        let ident = &param.ident;
        where_clause.predicates.push(parse_quote!(#ident: #type_path_));
    }
    if let Some(bound) = bound
        && input.is_generic()
    {
        for ty in input.active_types() {
            where_clause.predicates.push(parse_quote!(#ty: #bound));
        }
    }
    where_clause
}
