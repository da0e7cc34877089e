//! The type traits the codec dispatches on.

// -----------------------------------------------------------------------------
// Modules

mod base;
mod default;
mod element;
mod interface;
mod provider;
mod structure;

// -----------------------------------------------------------------------------
// Exports

pub use base::{BaseCast, TypeTraitBases};
pub use default::TypeTraitDefault;
pub use element::TypeTraitElement;
pub use interface::{TypeTraitInterface, TypeTraitSlot, TypeTraitVariants, VariantCast};
pub use provider::{Provider, TypeTraitProvider};
pub use structure::{TypeTraitArray, TypeTraitDictionary, TypeTraitList, TypeTraitNullable};

use alloc::boxed::Box;
use core::any::Any;

use crate::codec::PersistContext;
use crate::error::CodecError;
use crate::node::Node;
use crate::path::TypePath;

/// Erased save: the value, the node name, the context.
pub type SaveFn = fn(&dyn Any, &str, &PersistContext<'_>) -> Result<Node, CodecError>;

/// Erased load, the result boxes the loaded value.
pub type LoadFn = fn(&Node, &PersistContext<'_>) -> Result<Box<dyn Any>, CodecError>;

#[inline]
pub(crate) fn downcast_value<T: TypePath>(value: &dyn Any) -> Result<&T, CodecError> {
    value
        .downcast_ref::<T>()
        .ok_or_else(|| CodecError::mismatch(T::type_path(), "an erased value of another type"))
}

#[inline]
pub(crate) fn box_value<T: Any>(value: T) -> Box<dyn Any> {
    Box::new(value)
}
