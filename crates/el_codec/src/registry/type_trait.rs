use alloc::boxed::Box;
use core::any::Any;
use core::fmt::Debug;

/// A capability recorded for a type in its [`TypeMeta`](crate::registry::TypeMeta).
///
/// The strategies the codec dispatches on (self-describing, provider,
/// array, list, ...) are all type traits. Any `Clone + Send + Sync`
/// type can be one, so users may attach their own data to registered types.
pub trait TypeTrait: Any + Send + Sync {
    /// Clones the trait into a new box.
    fn clone_type_trait(&self) -> Box<dyn TypeTrait>;
}

impl<T: Clone + Any + Send + Sync> TypeTrait for T {
    #[inline]
    fn clone_type_trait(&self) -> Box<dyn TypeTrait> {
        Box::new(self.clone())
    }
}

impl dyn TypeTrait {
    /// Returns `true` if the boxed type trait is a `T`.
    #[inline]
    pub fn is<T: TypeTrait>(&self) -> bool {
        (self as &dyn Any).is::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: TypeTrait>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }

    #[inline]
    pub fn downcast_mut<T: TypeTrait>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Any).downcast_mut::<T>()
    }
}

impl Debug for dyn TypeTrait {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("TypeTrait")
    }
}
