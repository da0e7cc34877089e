use alloc::boxed::Box;

use crate::interface::Interface;
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeTraitSlot};

impl<I: Interface + ?Sized> GetTypeMeta for Box<I> {
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::with_capacity::<Self>(1);
        meta.insert_trait(<TypeTraitSlot as FromType<Self>>::from_type());
        meta
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register_interface::<I>();
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use core::any::{Any, TypeId};

    use crate::impl_interface;
    use crate::registry::{TypeRegistry, TypeTraitInterface, TypeTraitSlot};

    pub trait Hook: Any {}
    impl_interface!(Hook);

    #[test]
    fn slot_registers_its_interface() {
        let mut registry = TypeRegistry::empty();
        registry.register::<Box<dyn Hook>>();

        let slot = registry
            .get_type_trait::<TypeTraitSlot>(TypeId::of::<Box<dyn Hook>>())
            .unwrap();
        assert_eq!(slot.interface(), TypeId::of::<dyn Hook>());

        let interface = registry
            .get_type_trait::<TypeTraitInterface>(TypeId::of::<dyn Hook>())
            .unwrap();
        assert!(!interface.has_provider());
        assert_eq!(registry.len(), 2);
    }
}
