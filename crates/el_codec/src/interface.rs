//! Polymorphic slots.
//!
//! A slot is a value declared through a trait object, `Box<dyn Shape>`,
//! whose concrete type is only known at runtime. The codec writes the
//! concrete type path into the node so the same type comes back on load.
//!
//! An interface takes part in this once it is declared with
//! [`impl_interface!`](crate::impl_interface) and registered with
//! [`TypeRegistry::register_interface`](crate::registry::TypeRegistry::register_interface).
//! Concrete types are attached to it with
//! [`TypeRegistry::register_variant`](crate::registry::TypeRegistry::register_variant).

use alloc::boxed::Box;
use core::any::Any;

use crate::codec::PersistContext;
use crate::error::CodecError;
use crate::node::Node;
use crate::path::TypePath;

// -----------------------------------------------------------------------------
// Interface

/// A trait object type usable as a polymorphic slot.
///
/// Implement it with [`impl_interface!`](crate::impl_interface), which
/// requires the trait to have [`Any`] as a supertrait.
pub trait Interface: TypePath {
    /// Borrows the concrete value behind the trait object.
    fn as_any(&self) -> &dyn Any;

    /// Takes the concrete value out of the trait object.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

/// Declares `dyn Trait` as an [`Interface`] and gives it a [`TypePath`].
///
/// # Examples
///
/// ```
/// use core::any::Any;
/// use el_codec::impl_interface;
/// use el_codec::interface::Interface;
/// use el_codec::path::TypePath;
///
/// pub trait Shape: Any {
///     fn area(&self) -> f64;
/// }
///
/// impl_interface!(Shape);
///
/// struct Square(f64);
///
/// impl Shape for Square {
///     fn area(&self) -> f64 {
///         self.0 * self.0
///     }
/// }
///
/// let shape: Box<dyn Shape> = Box::new(Square(2.0));
/// assert!(shape.as_any().is::<Square>());
/// assert_eq!(<dyn Shape>::type_name(), "dyn Shape");
/// ```
#[macro_export]
macro_rules! impl_interface {
    ($trait:ident) => {
        impl $crate::path::TypePath for dyn $trait {
            #[inline]
            fn type_path() -> &'static str {
                ::core::concat!("dyn ", ::core::module_path!(), "::", ::core::stringify!($trait))
            }

            #[inline]
            fn type_name() -> &'static str {
                ::core::concat!("dyn ", ::core::stringify!($trait))
            }
        }

        impl $crate::interface::Interface for dyn $trait {
            #[inline]
            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            #[inline]
            fn into_any(
                self: $crate::__macro_exports::Box<Self>,
            ) -> $crate::__macro_exports::Box<dyn ::core::any::Any> {
                self
            }
        }
    };
}

// -----------------------------------------------------------------------------
// InterfaceProvider

/// A converter for every implementation of an interface at once.
///
/// It is consulted for slot values whose concrete type is not registered,
/// and for registered variants that have no strategy of their own. Slot
/// nodes it produces carry no type attribute, so it must be able to
/// reconstruct the concrete value from the node alone.
pub trait InterfaceProvider<I: Interface + ?Sized>: Send + Sync + 'static {
    fn encode(&self, value: &I, name: &str, cx: &PersistContext<'_>) -> Result<Node, CodecError>;

    fn decode(&self, node: &Node, cx: &PersistContext<'_>) -> Result<Box<I>, CodecError>;
}
