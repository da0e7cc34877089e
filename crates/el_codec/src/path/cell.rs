use alloc::boxed::Box;
use alloc::string::String;
use core::any::{Any, TypeId};
use std::sync::{PoisonError, RwLock};

use el_utils::TypeIdMap;

/// Static storage for the type path of a generic type.
///
/// A `static` declared inside a generic function is shared by every
/// instantiation, so the cell keeps one leaked string per [`TypeId`].
///
/// # Examples
///
/// ```
/// use el_codec::path::{GenericTypePathCell, TypePath, concat};
///
/// struct Wrapper<T>(T);
///
/// impl<T: TypePath> TypePath for Wrapper<T> {
///     fn type_path() -> &'static str {
///         static CELL: GenericTypePathCell = GenericTypePathCell::new();
///         CELL.get_or_insert::<Self>(|| concat(&["demo::Wrapper<", T::type_path(), ">"]))
///     }
///
///     fn type_name() -> &'static str {
///         static CELL: GenericTypePathCell = GenericTypePathCell::new();
///         CELL.get_or_insert::<Self>(|| concat(&["Wrapper<", T::type_name(), ">"]))
///     }
/// }
///
/// assert_eq!(Wrapper::<u8>::type_path(), "demo::Wrapper<u8>");
/// assert_eq!(Wrapper::<String>::type_name(), "Wrapper<String>");
/// ```
pub struct GenericTypePathCell(RwLock<TypeIdMap<&'static str>>);

impl GenericTypePathCell {
    /// Creates an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Returns the string stored for `G`, computing it with `f` on first use.
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> String) -> &'static str {
        self.get_or_insert_by_id(TypeId::of::<G>(), f)
    }

    #[inline(never)]
    fn get_or_insert_by_id(&self, type_id: TypeId, f: impl FnOnce() -> String) -> &'static str {
        if let Some(path) = self
            .0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
        {
            return *path;
        }

        let path = f();
        *self
            .0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert(type_id, || Box::leak(path.into_boxed_str()))
    }
}
