/// Builds a [`TypeTrait`](crate::registry::TypeTrait) for the type `T`.
///
/// ```
/// use el_codec::registry::{FromType, TypeTraitDefault};
///
/// let default = <TypeTraitDefault as FromType<u32>>::from_type();
/// assert_eq!(default.default().downcast_ref::<u32>(), Some(&0));
/// ```
pub trait FromType<T: ?Sized> {
    fn from_type() -> Self;
}
