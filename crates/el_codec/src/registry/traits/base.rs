use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::{Any, TypeId};

/// How a type converts to and from one of its bases.
///
/// A type without a strategy of its own is saved through the provider of a
/// base: the value is converted to the base, encoded, and converted back
/// on load.
#[derive(Clone, Copy)]
pub struct BaseCast {
    base: TypeId,
    to_base: fn(&dyn Any) -> Option<Box<dyn Any>>,
    from_base: fn(Box<dyn Any>) -> Option<Box<dyn Any>>,
}

fn to_base<T: Clone + Into<B> + 'static, B: 'static>(value: &dyn Any) -> Option<Box<dyn Any>> {
    let base: B = value.downcast_ref::<T>()?.clone().into();
    let boxed: Box<dyn Any> = Box::new(base);
    Some(boxed)
}

fn from_base<T: From<B> + 'static, B: 'static>(value: Box<dyn Any>) -> Option<Box<dyn Any>> {
    let derived = T::from(*value.downcast::<B>().ok()?);
    let boxed: Box<dyn Any> = Box::new(derived);
    Some(boxed)
}

impl BaseCast {
    /// Describes `B` as a base of `T`.
    pub fn new<T, B>() -> Self
    where
        T: Clone + Into<B> + From<B> + 'static,
        B: 'static,
    {
        Self {
            base: TypeId::of::<B>(),
            to_base: to_base::<T, B>,
            from_base: from_base::<T, B>,
        }
    }

    #[inline]
    pub fn base(&self) -> TypeId {
        self.base
    }

    /// Converts an erased `T` into an erased `B`.
    #[inline]
    pub fn to_base(&self, value: &dyn Any) -> Option<Box<dyn Any>> {
        (self.to_base)(value)
    }

    /// Converts an erased `B` into an erased `T`.
    #[inline]
    pub fn from_base(&self, value: Box<dyn Any>) -> Option<Box<dyn Any>> {
        (self.from_base)(value)
    }
}

/// The registered bases of a type, nearest first.
#[derive(Clone, Default)]
pub struct TypeTraitBases {
    bases: Vec<BaseCast>,
}

impl TypeTraitBases {
    /// Adds a base, replacing an earlier cast to the same base in place.
    pub fn insert(&mut self, cast: BaseCast) {
        match self.bases.iter_mut().find(|old| old.base == cast.base) {
            Some(old) => *old = cast,
            None => self.bases.push(cast),
        }
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &BaseCast> {
        self.bases.iter()
    }
}
