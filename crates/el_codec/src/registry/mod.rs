//! Type registration.
//!
//! ## Menu
//!
//! - [`TypeTrait`]: a capability recorded for a type.
//! - [`FromType`]: builds a `TypeTrait` from a type.
//! - [`TypeMeta`]: identity of a type plus its `TypeTrait` table.
//! - [`GetTypeMeta`]: types that know their own `TypeMeta`.
//! - [`TypeRegistry`]: the table the codec dispatches on.
//! - TypeTraits, one per strategy:
//!     - [`TypeTraitElement`]: the type is self-describing.
//!     - [`TypeTraitProvider`]: an external [`Provider`].
//!     - [`TypeTraitArray`], [`TypeTraitNullable`], [`TypeTraitList`] and
//!       [`TypeTraitDictionary`]: structural codecs.
//!     - [`TypeTraitInterface`], [`TypeTraitSlot`] and [`TypeTraitVariants`]:
//!       polymorphic slots.
//!     - [`TypeTraitBases`]: conversions to base types.
//!     - [`TypeTraitDefault`]: default values for absent array cells.
//!
//! ## Strategy resolution
//!
//! Strategies are attached to a type once, at registration. A provider is
//! looked up by [`TypeRegistry::lookup_provider`]: the exact type first,
//! then the providers of the interfaces the type is a variant of, in the
//! order the variants were registered, then the providers of its bases.
//!
//! ## auto_register
//!
//! See [`TypeRegistry::auto_register`]. It relies on the [`inventory`]
//! crate, which covers the major platforms. Elsewhere the call returns
//! `false` and registers nothing.
//!
//! [`inventory`]: https://docs.rs/inventory

// -----------------------------------------------------------------------------
// Modules

mod from_type;
mod traits;
mod type_meta;
mod type_registry;
mod type_trait;

// -----------------------------------------------------------------------------
// Exports

pub use from_type::FromType;
pub use traits::{BaseCast, TypeTraitBases};
pub use traits::{LoadFn, SaveFn};
pub use traits::{Provider, TypeTraitProvider};
pub use traits::{TypeTraitArray, TypeTraitDictionary, TypeTraitList, TypeTraitNullable};
pub use traits::{TypeTraitDefault, TypeTraitElement};
pub use traits::{TypeTraitInterface, TypeTraitSlot, TypeTraitVariants, VariantCast};
pub use type_meta::{GetTypeMeta, TypeMeta};
pub use type_registry::{ProviderMatch, TypeRegistry, TypeRegistryArc};
pub use type_trait::TypeTrait;

pub(crate) use traits::{box_value, downcast_value};
