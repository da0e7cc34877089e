use alloc::boxed::Box;
use core::any::Any;

use crate::registry::FromType;

/// Creates the default value of a type.
///
/// Array cells without content are filled with it.
#[derive(Clone)]
pub struct TypeTraitDefault {
    func: fn() -> Box<dyn Any>,
}

impl TypeTraitDefault {
    #[inline(always)]
    pub fn default(&self) -> Box<dyn Any> {
        (self.func)()
    }
}

impl<T: Default + Any> FromType<T> for TypeTraitDefault {
    fn from_type() -> Self {
        Self {
            func: || super::box_value(T::default()),
        }
    }
}
