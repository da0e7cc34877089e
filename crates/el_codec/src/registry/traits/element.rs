use alloc::boxed::Box;
use core::any::Any;

use super::{LoadFn, SaveFn};
use crate::Element;
use crate::codec::PersistContext;
use crate::error::CodecError;
use crate::node::Node;
use crate::registry::FromType;

/// The type saves and loads itself through [`Element`].
#[derive(Clone)]
pub struct TypeTraitElement {
    save: SaveFn,
    load: LoadFn,
}

impl TypeTraitElement {
    #[inline]
    pub fn save(&self, value: &dyn Any, name: &str, cx: &PersistContext<'_>) -> Result<Node, CodecError> {
        (self.save)(value, name, cx)
    }

    #[inline]
    pub fn load(&self, node: &Node, cx: &PersistContext<'_>) -> Result<Box<dyn Any>, CodecError> {
        (self.load)(node, cx)
    }
}

impl<T: Element> FromType<T> for TypeTraitElement {
    fn from_type() -> Self {
        Self {
            save: |value, name, cx| super::downcast_value::<T>(value)?.save_element(name, cx),
            load: |node, cx| T::load_element(node, cx).map(super::box_value),
        }
    }
}
