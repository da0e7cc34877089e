use proc_macro2::TokenStream;
use quote::quote;

use super::where_clause_with;
use crate::derive_data::ElementInput;

// The short name of a custom path: its last segment.
fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

pub(crate) fn impl_type_path(input: &ElementInput) -> TokenStream {
    let el_codec = input.el_codec();
    let type_path_ = crate::path::type_path_(el_codec);
    let ident = input.ident;
    let (impl_generics, ty_generics, _) = input.generics.split_for_impl();
    let where_clause = where_clause_with(input, None);

    let (base_path, base_name) = match &input.attrs.type_path {
        Some(custom) => {
            let path = custom.value();
            let name = last_segment(&path).to_owned();
            (quote! { #path }, quote! { #name })
        }
        None => {
            let name = ident.to_string();
            (
                quote! { ::core::concat!(::core::module_path!(), "::", #name) },
                quote! { #name },
            )
        }
    };

    if !input.is_generic() {
        return quote! {
            impl #type_path_ for #ident {
                #[inline]
                fn type_path() -> &'static str {
                    #base_path
                }

                #[inline]
                fn type_name() -> &'static str {
                    #base_name
                }
            }
        };
    }

    // `Name<A, B>`, built once per instantiation.
    let params: Vec<_> = input.generics.type_params().map(|param| &param.ident).collect();
    let joined = |base: &TokenStream, getter: TokenStream| {
        let mut parts = vec![base.clone(), quote! { "<" }];
        for (at, param) in params.iter().enumerate() {
            if at > 0 {
                parts.push(quote! { ", " });
            }
            parts.push(quote! { <#param as #type_path_>::#getter() });
        }
        parts.push(quote! { ">" });
        parts
    };
    let path_parts = joined(&base_path, quote! { type_path });
    let name_parts = joined(&base_name, quote! { type_name });
    let path_mod = quote! { #el_codec::path };

    quote! {
        impl #impl_generics #type_path_ for #ident #ty_generics #where_clause {
            fn type_path() -> &'static str {
                static CELL: #path_mod::GenericTypePathCell = #path_mod::GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| #path_mod::concat(&[#(#path_parts),*]))
            }

            fn type_name() -> &'static str {
                static CELL: #path_mod::GenericTypePathCell = #path_mod::GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| #path_mod::concat(&[#(#name_parts),*]))
            }
        }
    }
}
