//! Rectangular arrays of any rank.
//!
//! An [`NdArray`] is written as
//!
//! ```text
//! <Name Rank="2">
//!   <Dimensions Bounds="2,3">
//!     <Element Index="0,0"><Data .../></Element>
//!     <Element Index="0,1"><Data .../></Element>
//!     ...
//!   </Dimensions>
//! </Name>
//! ```
//!
//! Cells are visited by the [`Odometer`], last index fastest. `Bounds`
//! holds the size of each dimension. A rank-0 array has empty `Bounds` and
//! a single cell with an empty `Index`. A dimension of size zero produces
//! no `Element` at all.
//!
//! Reading is lenient: unparsable ranks, bounds and indices read as zero,
//! cells outside the shape are skipped with a warning, and a node without
//! `Rank` is an empty rank-1 array. An `Element` without content takes the
//! registered default of the element type, or fails with
//! [`CodecError::MissingCell`](crate::error::CodecError::MissingCell).
//!
//! A null array is `Option<NdArray<T>>` holding `None`, written as a node
//! with `IsNull="true"` and nothing else.

// -----------------------------------------------------------------------------
// Modules

mod codec;
mod nd_array;
mod odometer;

// -----------------------------------------------------------------------------
// Exports

pub use nd_array::NdArray;
pub use odometer::Odometer;

use crate::path::{GenericTypePathCell, TypePath, concat};
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeTraitArray, TypeTraitDefault};

impl<T: TypePath> TypePath for NdArray<T> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["el_codec::array::NdArray<", T::type_path(), ">"]))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["NdArray<", T::type_name(), ">"]))
    }
}

impl<T: GetTypeMeta> GetTypeMeta for NdArray<T> {
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::with_capacity::<Self>(2);
        meta.insert_trait(<TypeTraitArray as FromType<Self>>::from_type());
        meta.insert_trait(<TypeTraitDefault as FromType<Self>>::from_type());
        meta
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}
