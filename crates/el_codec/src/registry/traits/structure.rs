use alloc::boxed::Box;
use core::any::Any;

use super::{LoadFn, SaveFn};
use crate::codec::PersistContext;
use crate::error::CodecError;
use crate::node::Node;

// Each structural strategy is a pair of erased functions. The `FromType`
// implementations live next to the node formats they produce.
macro_rules! structural_trait {
    ($(#[$docs:meta])* $name:ident) => {
        $(#[$docs])*
        #[derive(Clone, Copy)]
        pub struct $name {
            save: SaveFn,
            load: LoadFn,
        }

        impl $name {
            #[inline]
            pub(crate) const fn new(save: SaveFn, load: LoadFn) -> Self {
                Self { save, load }
            }

            #[inline]
            pub fn save(&self, value: &dyn Any, name: &str, cx: &PersistContext<'_>) -> Result<Node, CodecError> {
                (self.save)(value, name, cx)
            }

            #[inline]
            pub fn load(&self, node: &Node, cx: &PersistContext<'_>) -> Result<Box<dyn Any>, CodecError> {
                (self.load)(node, cx)
            }
        }
    };
}

structural_trait! {
    /// Rank-N arrays, see [`array`](crate::array).
    TypeTraitArray
}

structural_trait! {
    /// `Option<T>`, written as an `IsNull` node when empty.
    TypeTraitNullable
}

structural_trait! {
    /// Sequences of `ListItem` children, see [`collection`](crate::collection).
    TypeTraitList
}

structural_trait! {
    /// Maps of `DictionaryItem` children, see [`collection`](crate::collection).
    TypeTraitDictionary
}
