//! Stable type names.
//!
//! [`core::any::type_name`] is explicitly unstable between compiler
//! versions, so documents record [`TypePath::type_path`] instead. The
//! registry indexes every type by its full path and by its short name,
//! and the [`resolver`](crate::resolver) maps recorded names back to types.

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod impls;

// -----------------------------------------------------------------------------
// Exports

pub use cell::GenericTypePathCell;

use alloc::string::String;

// -----------------------------------------------------------------------------
// TypePath

/// A stable, fully qualified name for a type.
///
/// Implemented by `#[derive(Element)]`, by [`impl_type_path!`](crate::impl_type_path)
/// and by [`impl_interface!`](crate::impl_interface). Built-in implementations
/// cover the primitives, `String` and the containers handled by the codec.
///
/// The full path is the type key written into documents. The short name is
/// what a document may use instead when the resolver allows it.
///
/// # Examples
///
/// ```
/// use el_codec::path::TypePath;
///
/// assert_eq!(<Vec<i32>>::type_path(), "alloc::vec::Vec<i32>");
/// assert_eq!(<Vec<i32>>::type_name(), "Vec<i32>");
/// assert_eq!(String::type_name(), "String");
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `TypePath`",
    note = "consider annotating `{Self}` with `#[derive(Element)]` or using `impl_type_path!`"
)]
pub trait TypePath: 'static {
    /// The fully qualified path, such as `my_crate::shapes::Circle`.
    fn type_path() -> &'static str;

    /// The short name, such as `Circle`.
    fn type_name() -> &'static str;
}

/// Joins string pieces into one `String`.
///
/// Used to build paths of generic types.
pub fn concat(parts: &[&str]) -> String {
    let mut result = String::with_capacity(parts.iter().map(|part| part.len()).sum());
    parts.iter().for_each(|part| result.push_str(part));
    result
}

/// Implements [`TypePath`] for a non-generic type.
///
/// The path defaults to the invoking module plus the type name. A literal
/// path can be given instead, the short name is then its last segment.
///
/// # Examples
///
/// ```
/// use el_codec::impl_type_path;
/// use el_codec::path::TypePath;
///
/// struct Color;
/// struct Legacy;
///
/// impl_type_path!(Color);
/// impl_type_path!(Legacy as "paint::Legacy");
///
/// assert!(Color::type_path().ends_with("::Color"));
/// assert_eq!(Color::type_name(), "Color");
/// assert_eq!(Legacy::type_path(), "paint::Legacy");
/// assert_eq!(Legacy::type_name(), "Legacy");
/// ```
#[macro_export]
macro_rules! impl_type_path {
    ($ty:ident) => {
        impl $crate::path::TypePath for $ty {
            #[inline]
            fn type_path() -> &'static str {
                ::core::concat!(::core::module_path!(), "::", ::core::stringify!($ty))
            }

            #[inline]
            fn type_name() -> &'static str {
                ::core::stringify!($ty)
            }
        }
    };
    ($ty:ty as $path:literal) => {
        impl $crate::path::TypePath for $ty {
            #[inline]
            fn type_path() -> &'static str {
                $path
            }

            #[inline]
            fn type_name() -> &'static str {
                $crate::path::last_segment($path)
            }
        }
    };
}

/// The part of a path after its last `::`, ignoring generic arguments.
///
/// ```
/// use el_codec::path::last_segment;
///
/// assert_eq!(last_segment("paint::brush::Solid"), "Solid");
/// assert_eq!(last_segment("Solid"), "Solid");
/// ```
pub const fn last_segment(path: &'static str) -> &'static str {
    let bytes = path.as_bytes();
    let mut start = 0;
    let mut index = 0;
    while index + 1 < bytes.len() {
        if bytes[index] == b'<' {
            break;
        }
        if bytes[index] == b':' && bytes[index + 1] == b':' {
            start = index + 2;
        }
        index += 1;
    }
    let (_, tail) = bytes.split_at(start);
    match core::str::from_utf8(tail) {
        Ok(tail) => tail,
        Err(_) => path,
    }
}
