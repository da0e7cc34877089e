//! See [`Element`](derive_element).
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static ELEMENT_ATTRIBUTE_NAME: &str = "element";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Element Derivation
///
/// `#[derive(Element)]` implements:
///
/// - `TypePath`
/// - `Element`
/// - `GetTypeMeta`
///
/// Supported shapes:
///
/// - structs with named fields: one child per field, named after the field
/// - tuple structs: one child per field, named `Item0`, `Item1`, ...
/// - unit structs: an empty node
/// - field-less enums: the variant name in a `Value` attribute
///
/// ```rust, ignore
/// #[derive(Element)]
/// struct Waypoint {
///     label: String,
///     depth: i32,
/// }
/// // <Name><label Value=".."/><depth Value=".."/></Name>
/// ```
///
/// Every field type must be registered with the codec, `GetTypeMeta`
/// registers them as dependencies.
///
/// ## Type Attributes
///
/// ### Custom Type Path
///
/// The default path is the module path plus the type name. It is written
/// into documents, so types that move between modules should pin it:
///
/// ```rust, ignore
/// #[derive(Element)]
/// #[element(type_path = "charts::Waypoint")]
/// struct Waypoint { /* ... */ }
/// ```
///
/// Generic parameters are appended automatically.
///
/// ### Default
///
/// `#[element(default)]` registers `Default::default` with the type, used
/// for empty array cells and list items. A field-less enum with this flag
/// loads unknown variant names as the default instead of failing.
///
/// ### Auto Registration
///
/// `#[element(auto_register)]` submits the type to
/// `TypeRegistry::auto_register`. This does nothing for generic types or
/// without the `auto_register` feature.
///
/// ## Field Attributes
///
/// - `#[element(rename = "Name")]`: the child node name. On enum variants
///   it is the written value.
/// - `#[element(default)]`: an absent child loads as `Default::default()`
///   instead of failing with `MissingChild`.
/// - `#[element(skip)]`: not saved, loaded as `Default::default()`.
#[proc_macro_derive(Element, attributes(element))]
pub fn derive_element(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match derive_data::ElementInput::from_ast(&ast) {
        Ok(input) => impls::impl_element(&input).into(),
        Err(err) => err.into_compile_error().into(),
    }
}
