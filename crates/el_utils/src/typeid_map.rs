use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt::Debug;

use crate::hash::NoOpHashState;
use crate::hash::hashbrown::HashMap;
use crate::hash::hashbrown::hash_map::Entry;

// -----------------------------------------------------------------------------
// TypeIdMap

/// A map keyed by [`TypeId`] that remembers insertion order.
///
/// Replacing the value of an existing key keeps its original position, so
/// iteration order is the order in which keys were *first* inserted.
/// Entries can not be removed individually, only all at once with
/// [`clear`](Self::clear).
///
/// # Examples
///
/// ```
/// use core::any::TypeId;
/// use el_utils::TypeIdMap;
///
/// let mut map = TypeIdMap::new();
/// map.insert_type::<u8>("first");
/// map.insert_type::<u16>("second");
/// map.insert_type::<u8>("replaced");
///
/// let order: Vec<_> = map.values().copied().collect();
/// assert_eq!(order, ["replaced", "second"]);
/// assert_eq!(map.index_of(&TypeId::of::<u16>()), Some(1));
/// ```
pub struct TypeIdMap<V> {
    indices: HashMap<TypeId, usize, NoOpHashState>,
    entries: Vec<(TypeId, V)>,
}

impl<V> TypeIdMap<V> {
    /// Creates an empty `TypeIdMap`.
    #[inline]
    pub const fn new() -> Self {
        Self {
            indices: HashMap::with_hasher(NoOpHashState),
            entries: Vec::new(),
        }
    }

    /// Creates an empty `TypeIdMap` with the specified capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            indices: HashMap::with_capacity_and_hasher(capacity, NoOpHashState),
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Inserts a value, returning the previous one if the key was present.
    ///
    /// An existing key keeps its position.
    pub fn insert(&mut self, type_id: TypeId, value: V) -> Option<V> {
        match self.indices.entry(type_id) {
            Entry::Occupied(entry) => {
                let slot = &mut self.entries[*entry.get()].1;
                Some(core::mem::replace(slot, value))
            }
            Entry::Vacant(entry) => {
                entry.insert(self.entries.len());
                self.entries.push((type_id, value));
                None
            }
        }
    }

    /// Inserts a value for `T`, see [`insert`](Self::insert).
    #[inline(always)]
    pub fn insert_type<T: ?Sized + 'static>(&mut self, value: V) -> Option<V> {
        self.insert(TypeId::of::<T>(), value)
    }

    /// Returns the value of `type_id`, inserting the result of `f` first if
    /// the key is absent.
    pub fn get_or_insert(&mut self, type_id: TypeId, f: impl FnOnce() -> V) -> &mut V {
        let index = match self.indices.entry(type_id) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let index = self.entries.len();
                entry.insert(index);
                self.entries.push((type_id, f()));
                index
            }
        };
        &mut self.entries[index].1
    }

    /// Returns a reference to the value of `type_id`.
    #[inline]
    pub fn get(&self, type_id: &TypeId) -> Option<&V> {
        let index = *self.indices.get(type_id)?;
        Some(&self.entries[index].1)
    }

    /// Returns a reference to the value of `T`.
    #[inline(always)]
    pub fn get_type<T: ?Sized + 'static>(&self) -> Option<&V> {
        self.get(&TypeId::of::<T>())
    }

    /// Returns a mutable reference to the value of `type_id`.
    #[inline]
    pub fn get_mut(&mut self, type_id: &TypeId) -> Option<&mut V> {
        let index = *self.indices.get(type_id)?;
        Some(&mut self.entries[index].1)
    }

    /// Returns a mutable reference to the value of `T`.
    #[inline(always)]
    pub fn get_mut_type<T: ?Sized + 'static>(&mut self) -> Option<&mut V> {
        self.get_mut(&TypeId::of::<T>())
    }

    /// The insertion position of `type_id`.
    #[inline]
    pub fn index_of(&self, type_id: &TypeId) -> Option<usize> {
        self.indices.get(type_id).copied()
    }

    /// Returns `true` if the map contains `type_id`.
    #[inline]
    pub fn contains(&self, type_id: &TypeId) -> bool {
        self.indices.contains_key(type_id)
    }

    /// Returns `true` if the map contains `T`.
    #[inline(always)]
    pub fn contains_type<T: ?Sized + 'static>(&self) -> bool {
        self.contains(&TypeId::of::<T>())
    }

    /// Removes every entry, keeping the allocations.
    #[inline]
    pub fn clear(&mut self) {
        self.indices.clear();
        self.entries.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in insertion order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&TypeId, &V)> {
        self.entries.iter().map(|(id, value)| (id, value))
    }

    /// Iterates values in insertion order.
    #[inline]
    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> {
        self.entries.iter().map(|(_, value)| value)
    }

    /// Iterates values mutably in insertion order.
    #[inline]
    pub fn values_mut(&mut self) -> impl ExactSizeIterator<Item = &mut V> {
        self.entries.iter_mut().map(|(_, value)| value)
    }

    /// Iterates keys in insertion order.
    #[inline]
    pub fn types(&self) -> impl ExactSizeIterator<Item = &TypeId> {
        self.entries.iter().map(|(id, _)| id)
    }
}

// -----------------------------------------------------------------------------
// Traits

impl<V> Default for TypeIdMap<V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> Clone for TypeIdMap<V> {
    fn clone(&self) -> Self {
        Self {
            indices: self.indices.clone(),
            entries: self.entries.clone(),
        }
    }
}

impl<V: Debug> Debug for TypeIdMap<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::TypeIdMap;
    use alloc::vec::Vec;
    use core::any::TypeId;

    #[test]
    fn get_or_insert_keeps_first_position() {
        let mut map = TypeIdMap::new();
        *map.get_or_insert(TypeId::of::<u32>(), || 1) += 10;
        *map.get_or_insert(TypeId::of::<i64>(), || 2) += 10;
        *map.get_or_insert(TypeId::of::<u32>(), || 100) += 10;

        assert_eq!(map.get_type::<u32>(), Some(&21));
        assert_eq!(map.get_type::<i64>(), Some(&12));
        assert_eq!(map.types().copied().collect::<Vec<_>>(), [
            TypeId::of::<u32>(),
            TypeId::of::<i64>()
        ]);
    }

    #[test]
    fn clear_resets_indices() {
        let mut map = TypeIdMap::new();
        map.insert_type::<u8>(1);
        map.insert_type::<u16>(2);
        map.clear();

        assert!(map.is_empty());
        assert!(!map.contains_type::<u8>());

        map.insert_type::<u16>(3);
        assert_eq!(map.index_of(&TypeId::of::<u16>()), Some(0));
    }

    #[test]
    fn unsized_keys() {
        let mut map = TypeIdMap::new();
        map.insert_type::<dyn core::any::Any>("any");
        map.insert_type::<str>("str");

        assert_eq!(map.get_type::<str>(), Some(&"str"));
        assert_eq!(map.len(), 2);
    }
}
