//! Items named by generated code. Not public API.

#![doc(hidden)]

pub use alloc::boxed::Box;
pub use log;

crate::cfg::auto_register! {
    pub mod auto_register {
        use crate::registry::{GetTypeMeta, TypeRegistry};

        pub use inventory;

        /// A registration function submitted by `#[element(auto_register)]`.
        pub struct __AutoRegisterFunc(pub fn(&mut TypeRegistry));

        inventory::collect!(__AutoRegisterFunc);

        /// Names the registration function of a type inside `submit!`.
        pub trait __RegisterType {
            fn __register(registry: &mut TypeRegistry);
        }

        impl<T: GetTypeMeta> __RegisterType for T {
            #[inline]
            fn __register(registry: &mut TypeRegistry) {
                registry.register::<T>();
            }
        }

        // Submitted like any derived type, so it is only registered when
        // the inventory works on this platform.
        pub struct __AvailFlag;

        crate::impl_type_path!(__AvailFlag as "el_codec::__macro_exports::auto_register::__AvailFlag");

        impl GetTypeMeta for __AvailFlag {
            fn get_type_meta() -> crate::registry::TypeMeta {
                crate::registry::TypeMeta::of::<Self>()
            }
        }

        inventory::submit! {
            __AutoRegisterFunc(<__AvailFlag as __RegisterType>::__register)
        }

        pub fn __register_types(registry: &mut TypeRegistry) {
            for func in inventory::iter::<__AutoRegisterFunc> {
                (func.0)(registry);
            }
        }
    }
}
