use alloc::boxed::Box;
use core::any::TypeId;
use core::ops::{Deref, DerefMut};

use el_utils::TypeIdMap;

use crate::path::TypePath;
use crate::registry::{TypeRegistry, TypeTrait};

// -----------------------------------------------------------------------------
// TypeMeta

/// Registration record of one type: its identity plus a table of
/// [`TypeTrait`]s describing how the codec handles it.
///
/// # Examples
///
/// ```
/// use el_codec::registry::{FromType, TypeMeta, TypeTraitDefault};
///
/// let mut meta = TypeMeta::of::<u16>();
/// meta.insert_trait(<TypeTraitDefault as FromType<u16>>::from_type());
///
/// assert_eq!(meta.type_path(), "u16");
/// assert!(meta.has_trait::<TypeTraitDefault>());
/// ```
pub struct TypeMeta {
    type_id: TypeId,
    type_path: &'static str,
    type_name: &'static str,
    trait_table: TypeIdMap<Box<dyn TypeTrait>>,
}

impl TypeMeta {
    /// Creates a record of `T` without type traits.
    #[inline]
    pub fn of<T: TypePath + ?Sized>() -> Self {
        Self::with_capacity::<T>(0)
    }

    /// Creates a record of `T` with room for `capacity` type traits.
    #[inline]
    pub fn with_capacity<T: TypePath + ?Sized>(capacity: usize) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_path: T::type_path(),
            type_name: T::type_name(),
            trait_table: TypeIdMap::with_capacity(capacity),
        }
    }

    #[inline(always)]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The full path, written into documents as the type key.
    #[inline(always)]
    pub const fn type_path(&self) -> &'static str {
        self.type_path
    }

    /// The short name.
    #[inline(always)]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline(always)]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Inserts a type trait, replacing one of the same type.
    #[inline(always)]
    pub fn insert_trait<D: TypeTrait>(&mut self, data: D) {
        self.insert_trait_by_id(TypeId::of::<D>(), Box::new(data));
    }

    #[inline(never)]
    fn insert_trait_by_id(&mut self, id: TypeId, val: Box<dyn TypeTrait>) {
        self.trait_table.insert(id, val);
    }

    #[inline]
    pub fn get_trait<D: TypeTrait>(&self) -> Option<&D> {
        self.get_trait_by_id(TypeId::of::<D>())
            .and_then(<dyn TypeTrait>::downcast_ref)
    }

    pub fn get_trait_by_id(&self, type_id: TypeId) -> Option<&dyn TypeTrait> {
        self.trait_table.get(&type_id).map(Deref::deref)
    }

    #[inline]
    pub fn get_trait_mut<D: TypeTrait>(&mut self) -> Option<&mut D> {
        self.trait_table
            .get_mut(&TypeId::of::<D>())
            .map(DerefMut::deref_mut)
            .and_then(<dyn TypeTrait>::downcast_mut)
    }

    /// Returns the type trait `D`, inserting `D::default()` first if absent.
    pub fn get_trait_or_default<D: TypeTrait + Default>(&mut self) -> Option<&mut D> {
        self.trait_table
            .get_or_insert(TypeId::of::<D>(), || Box::new(D::default()))
            .downcast_mut::<D>()
    }

    #[inline]
    pub fn has_trait<D: TypeTrait>(&self) -> bool {
        self.trait_table.contains(&TypeId::of::<D>())
    }

    #[inline]
    pub fn trait_len(&self) -> usize {
        self.trait_table.len()
    }

    /// Iterates type traits in insertion order.
    pub fn trait_iter(&self) -> impl ExactSizeIterator<Item = (TypeId, &dyn TypeTrait)> {
        self.trait_table
            .iter()
            .map(|(key, val)| (*key, val.deref()))
    }

    /// Moves the type traits of `other` that `self` lacks into `self`.
    ///
    /// Returns `true` if anything was added. Existing traits are kept, so
    /// re-registering a type never drops a provider installed for it.
    pub(crate) fn absorb(&mut self, other: TypeMeta) -> bool {
        let mut added = false;
        for (id, type_trait) in other.trait_table.iter() {
            if !self.trait_table.contains(id) {
                self.trait_table.insert(*id, (**type_trait).clone_type_trait());
                added = true;
            }
        }
        added
    }
}

impl Clone for TypeMeta {
    fn clone(&self) -> Self {
        let mut trait_table = TypeIdMap::with_capacity(self.trait_len());
        for (id, type_trait) in self.trait_table.iter() {
            trait_table.insert(*id, (**type_trait).clone_type_trait());
        }

        Self {
            type_id: self.type_id,
            type_path: self.type_path,
            type_name: self.type_name,
            trait_table,
        }
    }
}

impl core::fmt::Debug for TypeMeta {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TypeMeta")
            .field("type_path", &self.type_path)
            .field("trait_len", &self.trait_table.len())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// GetTypeMeta

/// Types that know their own registration record.
///
/// `#[derive(Element)]` implements it. The built-in implementations cover
/// primitives, `String`, `Vec<T>`, `Option<T>`, `Box<dyn Interface>`,
/// the map types and [`NdArray<T>`](crate::array::NdArray).
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `GetTypeMeta` so cannot be registered",
    note = "consider annotating `{Self}` with `#[derive(Element)]`"
)]
pub trait GetTypeMeta: TypePath {
    /// The record inserted by [`TypeRegistry::register`].
    fn get_type_meta() -> TypeMeta;

    /// Registers the types this type's strategies rely on, usually the
    /// types of its fields or elements.
    fn register_dependencies(_registry: &mut TypeRegistry) {}
}
