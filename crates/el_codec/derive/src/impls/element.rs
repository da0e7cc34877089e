use proc_macro2::TokenStream;
use quote::quote;

use super::where_clause_with;
use crate::derive_data::{ElementField, ElementInput, ElementShape, ElementVariant};

const VALUE_ATTRIBUTE: &str = "Value";

pub(crate) fn impl_element(input: &ElementInput) -> TokenStream {
    let el_codec = input.el_codec();
    let element_ = crate::path::element_(el_codec);
    let node_ = crate::path::node_(el_codec);
    let context_ = crate::path::context_(el_codec);
    let codec_error_ = crate::path::codec_error_(el_codec);
    let type_path_ = crate::path::type_path_(el_codec);

    let ident = input.ident;
    let (impl_generics, ty_generics, _) = input.generics.split_for_impl();
    let where_clause = where_clause_with(input, Some(&type_path_));

    let (save_body, load_body) = match &input.shape {
        ElementShape::Struct(fields) => (save_fields(fields, &node_), load_fields(fields)),
        ElementShape::Unit => (quote! { ::core::result::Result::Ok(#node_::new(name)) }, quote! {
            ::core::result::Result::Ok(Self)
        }),
        ElementShape::Enum(variants) => (
            save_variants(variants, &node_),
            load_variants(input, variants, &codec_error_, &type_path_),
        ),
    };

    quote! {
        impl #impl_generics #element_ for #ident #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn save_element(
                &self,
                name: &str,
                cx: &#context_<'_>,
            ) -> ::core::result::Result<#node_, #codec_error_> {
                #save_body
            }

            #[allow(unused_variables)]
            fn load_element(
                node: &#node_,
                cx: &#context_<'_>,
            ) -> ::core::result::Result<Self, #codec_error_> {
                #load_body
            }
        }
    }
}

fn save_fields(fields: &[ElementField], node_: &TokenStream) -> TokenStream {
    let pushes = fields.iter().filter(|field| field.is_active()).map(|field| {
        let member = &field.member;
        let node_name = &field.node_name;
        quote! {
            node.push(cx.save(&self.#member, #node_name)?);
        }
    });

    quote! {
        let mut node = #node_::new(name);
        #(#pushes)*
        ::core::result::Result::Ok(node)
    }
}

fn load_fields(fields: &[ElementField]) -> TokenStream {
    let inits = fields.iter().map(|field| {
        let member = &field.member;
        let node_name = &field.node_name;
        let value = if !field.is_active() {
            quote! { ::core::default::Default::default() }
        } else if field.attrs.default.is_some() {
            quote! { cx.read_child_or_default(node, #node_name)? }
        } else {
            quote! { cx.read_child(node, #node_name)? }
        };
        quote! { #member: #value }
    });

    quote! {
        ::core::result::Result::Ok(Self { #(#inits),* })
    }
}

fn save_variants(variants: &[ElementVariant], node_: &TokenStream) -> TokenStream {
    let arms = variants.iter().map(|variant| {
        let ident = variant.ident;
        let value = &variant.value;
        quote! { Self::#ident => #value }
    });

    quote! {
        let value = match self {
            #(#arms,)*
        };
        ::core::result::Result::Ok(#node_::new(name).with_attribute(#VALUE_ATTRIBUTE, value))
    }
}

fn load_variants(
    input: &ElementInput,
    variants: &[ElementVariant],
    codec_error_: &TokenStream,
    type_path_: &TokenStream,
) -> TokenStream {
    let arms = variants.iter().map(|variant| {
        let ident = variant.ident;
        let value = &variant.value;
        quote! { #value => ::core::result::Result::Ok(Self::#ident) }
    });

    let fallback = match input.attrs.default {
        Some(_) => {
            let macro_exports_ = crate::path::macro_exports_(input.el_codec());
            quote! {
                #macro_exports_::log::warn!(
                    "`{}` is not a variant of `{}`, using the default",
                    other,
                    <Self as #type_path_>::type_path(),
                );
                ::core::result::Result::Ok(::core::default::Default::default())
            }
        }
        None => quote! {
            ::core::result::Result::Err(#codec_error_::InvalidValue {
                type_path: ::core::convert::Into::into(<Self as #type_path_>::type_path()),
                value: ::core::convert::Into::into(other),
            })
        },
    };

    quote! {
        match node.attribute_or(#VALUE_ATTRIBUTE, "").trim() {
            #(#arms,)*
            other => {
                #fallback
            }
        }
    }
}
