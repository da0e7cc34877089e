use proc_macro2::TokenStream;
use quote::quote;

use super::where_clause_with;
use crate::derive_data::ElementInput;

pub(crate) fn impl_get_type_meta(input: &ElementInput) -> TokenStream {
    let registry_ = crate::path::registry_(input.el_codec());
    let get_type_meta_ = quote! { #registry_::GetTypeMeta };

    let ident = input.ident;
    let (impl_generics, ty_generics, _) = input.generics.split_for_impl();
    let where_clause = where_clause_with(input, Some(&get_type_meta_));

    let insert_default = input.attrs.default.map(|_| {
        quote! {
            meta.insert_trait(<#registry_::TypeTraitDefault as #registry_::FromType<Self>>::from_type());
        }
    });

    let dependencies = input.active_types().into_iter().map(|ty| {
        quote! {
            registry.register::<#ty>();
        }
    });

    quote! {
        impl #impl_generics #get_type_meta_ for #ident #ty_generics #where_clause {
            fn get_type_meta() -> #registry_::TypeMeta {
                let mut meta = #registry_::TypeMeta::with_capacity::<Self>(2);
                meta.insert_trait(<#registry_::TypeTraitElement as #registry_::FromType<Self>>::from_type());
                #insert_default
                meta
            }

            fn register_dependencies(registry: &mut #registry_::TypeRegistry) {
                #(#dependencies)*
            }
        }
    }
}
