//! Paths of the `el_codec` items named by generated code.

use proc_macro2::TokenStream;
use quote::quote;

/// The path under which the invoking crate sees `el_codec`.
///
/// Reading the manifest is not free, so the path is looked up once per
/// derive and passed around.
pub(crate) fn el_codec() -> syn::Path {
    el_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("el_codec"))
}

#[inline(always)]
pub(crate) fn type_path_(el_codec: &syn::Path) -> TokenStream {
    quote! { #el_codec::path::TypePath }
}

#[inline(always)]
pub(crate) fn element_(el_codec: &syn::Path) -> TokenStream {
    quote! { #el_codec::Element }
}

#[inline(always)]
pub(crate) fn node_(el_codec: &syn::Path) -> TokenStream {
    quote! { #el_codec::node::Node }
}

#[inline(always)]
pub(crate) fn context_(el_codec: &syn::Path) -> TokenStream {
    quote! { #el_codec::codec::PersistContext }
}

#[inline(always)]
pub(crate) fn codec_error_(el_codec: &syn::Path) -> TokenStream {
    quote! { #el_codec::error::CodecError }
}

#[inline(always)]
pub(crate) fn registry_(el_codec: &syn::Path) -> TokenStream {
    quote! { #el_codec::registry }
}

#[inline(always)]
pub(crate) fn macro_exports_(el_codec: &syn::Path) -> TokenStream {
    quote! { #el_codec::__macro_exports }
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(el_codec: &syn::Path) -> TokenStream {
    quote! { #el_codec::__macro_exports::auto_register }
}
