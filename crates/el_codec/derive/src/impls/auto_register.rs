use proc_macro2::TokenStream;

use crate::derive_data::ElementInput;

/// Generate `auto_register` implementation
#[cfg(feature = "auto_register")]
pub(crate) fn impl_auto_register(input: &ElementInput) -> TokenStream {
    use quote::quote_spanned;

    let Some(span) = input.attrs.auto_register else {
        return TokenStream::new();
    };
    // Invalid for generic types.
    if input.is_generic() {
        return TokenStream::new();
    }

    let auto_register_ = crate::path::auto_register_(input.el_codec());
    let ident = input.ident;

    quote_spanned! { span =>
        #auto_register_::inventory::submit!{
            #auto_register_::__AutoRegisterFunc(
                <#ident as #auto_register_::__RegisterType>::__register
            )
        }
    }
}

/// Generate `auto_register` implementation
#[cfg(not(feature = "auto_register"))]
pub(crate) fn impl_auto_register(_: &ElementInput) -> TokenStream {
    TokenStream::new()
}
