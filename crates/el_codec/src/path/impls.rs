use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use el_utils::hash::{FixedHashState, HashMap as FixedHashMap};

use super::{GenericTypePathCell, TypePath, concat};

macro_rules! impl_primitive_path {
    ($($ty:ident)*) => {
        $(
            impl TypePath for $ty {
                #[inline]
                fn type_path() -> &'static str {
                    ::core::stringify!($ty)
                }

                #[inline]
                fn type_name() -> &'static str {
                    ::core::stringify!($ty)
                }
            }
        )*
    };
}

impl_primitive_path!(
    bool char
    u8 u16 u32 u64 u128 usize
    i8 i16 i32 i64 i128 isize
    f32 f64
);

impl TypePath for String {
    #[inline]
    fn type_path() -> &'static str {
        "alloc::string::String"
    }

    #[inline]
    fn type_name() -> &'static str {
        "String"
    }
}

// Generic paths are built once per instantiation.
macro_rules! impl_generic_path {
    ($ty:ty, [$($param:ident),*], $path:literal, $name:literal) => {
        fn type_path() -> &'static str {
            static CELL: GenericTypePathCell = GenericTypePathCell::new();
            CELL.get_or_insert::<$ty>(|| {
                concat(&[$path, "<", [$($param::type_path()),*].join(", ").as_str(), ">"])
            })
        }

        fn type_name() -> &'static str {
            static CELL: GenericTypePathCell = GenericTypePathCell::new();
            CELL.get_or_insert::<$ty>(|| {
                concat(&[$name, "<", [$($param::type_name()),*].join(", ").as_str(), ">"])
            })
        }
    };
}

impl<T: TypePath> TypePath for Vec<T> {
    impl_generic_path!(Self, [T], "alloc::vec::Vec", "Vec");
}

impl<T: TypePath> TypePath for Option<T> {
    impl_generic_path!(Self, [T], "core::option::Option", "Option");
}

impl<T: TypePath + ?Sized> TypePath for Box<T> {
    impl_generic_path!(Self, [T], "alloc::boxed::Box", "Box");
}

impl<K: TypePath, V: TypePath> TypePath for BTreeMap<K, V> {
    impl_generic_path!(Self, [K, V], "alloc::collections::BTreeMap", "BTreeMap");
}

impl<K: TypePath, V: TypePath> TypePath for std::collections::HashMap<K, V> {
    impl_generic_path!(Self, [K, V], "std::collections::HashMap", "HashMap");
}

impl<K: TypePath, V: TypePath> TypePath for FixedHashMap<K, V, FixedHashState> {
    impl_generic_path!(Self, [K, V], "el_utils::hash::HashMap", "FixedHashMap");
}

#[cfg(test)]
mod tests {
    use crate::path::TypePath;
    use alloc::boxed::Box;
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec::Vec;

    #[test]
    fn nested_generic_paths() {
        type Nested = BTreeMap<String, Vec<Option<u8>>>;
        assert_eq!(
            Nested::type_path(),
            "alloc::collections::BTreeMap<alloc::string::String, alloc::vec::Vec<core::option::Option<u8>>>"
        );
        assert_eq!(Nested::type_name(), "BTreeMap<String, Vec<Option<u8>>>");
    }

    #[test]
    fn instantiations_do_not_share_cells() {
        assert_eq!(<Vec<u8>>::type_path(), "alloc::vec::Vec<u8>");
        assert_eq!(<Vec<u16>>::type_path(), "alloc::vec::Vec<u16>");
        assert_eq!(<Box<f32>>::type_name(), "Box<f32>");
    }
}
