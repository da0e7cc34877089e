use alloc::boxed::Box;
use core::any::Any;

use super::{ElementCodec, PersistContext, TYPE_ATTRIBUTE};
use crate::error::CodecError;
use crate::node::Node;
use crate::registry::{TypeMeta, TypeTraitArray, TypeTraitDictionary, TypeTraitElement};
use crate::registry::{TypeTraitInterface, TypeTraitList, TypeTraitNullable};
use crate::registry::{TypeTraitSlot, TypeTraitVariants};

impl ElementCodec {
    /// Saves an erased value whose registration is `meta`.
    ///
    /// `value` must be of the type described by `meta`.
    pub fn save_dyn(
        &self,
        value: &dyn Any,
        meta: &TypeMeta,
        name: &str,
        cx: &PersistContext<'_>,
    ) -> Result<Node, CodecError> {
        crate::cfg::debug! {
            if {
                super::path_stack::scoped(name, || self.save_strategy(value, meta, name, cx))
            } else {
                self.save_strategy(value, meta, name, cx)
            }
        }
    }

    /// Loads an erased value of the type described by `meta`.
    pub fn load_dyn(&self, meta: &TypeMeta, node: &Node, cx: &PersistContext<'_>) -> Result<Box<dyn Any>, CodecError> {
        crate::cfg::debug! {
            if {
                super::path_stack::scoped(node.name(), || self.load_strategy(meta, node, cx))
            } else {
                self.load_strategy(meta, node, cx)
            }
        }
    }

    fn save_strategy(
        &self,
        value: &dyn Any,
        meta: &TypeMeta,
        name: &str,
        cx: &PersistContext<'_>,
    ) -> Result<Node, CodecError> {
        if let Some(array) = meta.get_trait::<TypeTraitArray>() {
            return array.save(value, name, cx);
        }
        if let Some(nullable) = meta.get_trait::<TypeTraitNullable>() {
            return nullable.save(value, name, cx);
        }
        if let Some(element) = meta.get_trait::<TypeTraitElement>() {
            return element.save(value, name, cx);
        }
        let provider = self.registry.lookup_provider_of(meta);
        if let Some(found) = provider.filter(|found| !found.is_inherited()) {
            return found.encode(value, name, cx);
        }
        if let Some(list) = meta.get_trait::<TypeTraitList>() {
            return list.save(value, name, cx);
        }
        if let Some(dictionary) = meta.get_trait::<TypeTraitDictionary>() {
            return dictionary.save(value, name, cx);
        }
        if let Some(slot) = meta.get_trait::<TypeTraitSlot>() {
            return self.save_slot(value, meta, slot, name, cx);
        }
        if let Some(found) = provider {
            log::trace!("`{}` saved through an inherited provider", meta.type_path());
            let mut node = found.encode(value, name, cx)?;
            node.set_attribute(TYPE_ATTRIBUTE, meta.type_path());
            return Ok(node);
        }
        Err(CodecError::not_convertible(meta.type_path()))
    }

    fn load_strategy(&self, meta: &TypeMeta, node: &Node, cx: &PersistContext<'_>) -> Result<Box<dyn Any>, CodecError> {
        if let Some(array) = meta.get_trait::<TypeTraitArray>() {
            return array.load(node, cx);
        }
        if let Some(nullable) = meta.get_trait::<TypeTraitNullable>() {
            return nullable.load(node, cx);
        }
        if let Some(element) = meta.get_trait::<TypeTraitElement>() {
            self.check_recorded(meta, node)?;
            return element.load(node, cx);
        }
        let provider = self.registry.lookup_provider_of(meta);
        if let Some(found) = provider.filter(|found| !found.is_inherited()) {
            self.check_recorded(meta, node)?;
            return found.decode(node, cx);
        }
        if let Some(list) = meta.get_trait::<TypeTraitList>() {
            return list.load(node, cx);
        }
        if let Some(dictionary) = meta.get_trait::<TypeTraitDictionary>() {
            return dictionary.load(node, cx);
        }
        if let Some(slot) = meta.get_trait::<TypeTraitSlot>() {
            return self.load_slot(meta, slot, node, cx);
        }
        if let Some(found) = provider {
            self.check_recorded(meta, node)?;
            return found.decode(node, cx);
        }
        Err(CodecError::not_convertible(meta.type_path()))
    }

    // A recorded type on a node loaded as `meta` must name `meta` itself.
    fn check_recorded(&self, meta: &TypeMeta, node: &Node) -> Result<(), CodecError> {
        let Some(recorded) = node.attribute(TYPE_ATTRIBUTE) else {
            return Ok(());
        };
        match self.resolver.resolve(recorded, &self.registry) {
            Some(type_id) if type_id == meta.type_id() => Ok(()),
            Some(_) => Err(CodecError::mismatch(meta.type_path(), recorded)),
            None => Err(CodecError::UnresolvedType {
                name: recorded.into(),
            }),
        }
    }

    fn save_slot(
        &self,
        value: &dyn Any,
        meta: &TypeMeta,
        slot: &TypeTraitSlot,
        name: &str,
        cx: &PersistContext<'_>,
    ) -> Result<Node, CodecError> {
        let concrete = slot
            .concrete(value)
            .ok_or_else(|| CodecError::mismatch(meta.type_path(), "an erased value of another type"))?;

        if let Some(concrete_meta) = self.registry.get(Any::type_id(concrete)) {
            let mut node = self.save_dyn(concrete, concrete_meta, name, cx)?;
            node.set_attribute(TYPE_ATTRIBUTE, concrete_meta.type_path());
            return Ok(node);
        }

        if let Some(interface) = self.interface_of(slot)
            && let Some(result) = slot.encode(value, interface, name, cx)
        {
            log::trace!("unregistered value of `{}` saved through the interface provider", meta.type_path());
            return result;
        }

        Err(CodecError::not_convertible(meta.type_path()))
    }

    fn load_slot(
        &self,
        meta: &TypeMeta,
        slot: &TypeTraitSlot,
        node: &Node,
        cx: &PersistContext<'_>,
    ) -> Result<Box<dyn Any>, CodecError> {
        let concrete_meta = match node.attribute(TYPE_ATTRIBUTE) {
            Some(recorded) => Some(
                self.resolver
                    .resolve(recorded, &self.registry)
                    .and_then(|type_id| self.registry.get(type_id))
                    .ok_or_else(|| CodecError::UnresolvedType {
                        name: recorded.into(),
                    })?,
            ),
            None => None,
        };

        // A node tagged with the slot type itself names no concrete type.
        let Some(concrete_meta) = concrete_meta.filter(|found| TypeMeta::type_id(found) != meta.type_id()) else {
            return match self.interface_of(slot) {
                Some(interface) => slot
                    .decode(node, interface, cx)
                    .unwrap_or_else(|| Err(CodecError::not_convertible(meta.type_path()))),
                None => Err(CodecError::not_convertible(meta.type_path())),
            };
        };

        // Only registered variants of the slot's interface are accepted.
        let variant = concrete_meta
            .get_trait::<TypeTraitVariants>()
            .and_then(|variants| variants.get(slot.interface()))
            .ok_or_else(|| CodecError::mismatch(meta.type_path(), concrete_meta.type_path()))?;

        let value = self.load_dyn(concrete_meta, node, cx)?;
        variant
            .upcast(value)
            .ok_or_else(|| CodecError::mismatch(meta.type_path(), concrete_meta.type_path()))
    }

    #[inline]
    fn interface_of(&self, slot: &TypeTraitSlot) -> Option<&TypeTraitInterface> {
        self.registry.get_type_trait::<TypeTraitInterface>(slot.interface())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec::Vec;
    use core::any::Any;

    use crate::codec::{ElementCodec, PersistContext, TYPE_ATTRIBUTE};
    use crate::error::CodecError;
    use crate::interface::{Interface, InterfaceProvider};
    use crate::node::Node;
    use crate::registry::Provider;
    use crate::{Element, impl_interface, impl_type_path};

    pub trait Shape: Any {
        fn area(&self) -> f64;
    }
    impl_interface!(Shape);

    #[derive(Debug, PartialEq)]
    struct Circle {
        radius: f64,
    }
    impl_type_path!(Circle as "geometry::Circle");

    impl Shape for Circle {
        fn area(&self) -> f64 {
            3.0 * self.radius * self.radius
        }
    }

    impl Element for Circle {
        fn save_element(&self, name: &str, cx: &PersistContext<'_>) -> Result<Node, CodecError> {
            Ok(Node::new(name).with_child(cx.save(&self.radius, "Radius")?))
        }

        fn load_element(node: &Node, cx: &PersistContext<'_>) -> Result<Self, CodecError> {
            Ok(Self {
                radius: cx.read_child(node, "Radius")?,
            })
        }
    }

    #[derive(Debug, PartialEq)]
    struct Square(f64);
    impl_type_path!(Square as "geometry::Square");

    impl Shape for Square {
        fn area(&self) -> f64 {
            self.0 * self.0
        }
    }

    struct Unlisted;

    impl Shape for Unlisted {
        fn area(&self) -> f64 {
            1.0
        }
    }

    // Stores only the area, rebuilds a square of the same area.
    struct AreaProvider;

    impl InterfaceProvider<dyn Shape> for AreaProvider {
        fn encode(&self, value: &dyn Shape, name: &str, _: &PersistContext<'_>) -> Result<Node, CodecError> {
            Ok(Node::new(name).with_attribute("Area", value.area()))
        }

        fn decode(&self, node: &Node, _: &PersistContext<'_>) -> Result<Box<dyn Shape>, CodecError> {
            Ok(Box::new(Square(node.attribute_parsed("Area", 0.0_f64).sqrt())))
        }
    }

    struct Shout;

    impl Provider<String> for Shout {
        fn encode(&self, value: &String, name: &str, _: &PersistContext<'_>) -> Result<Node, CodecError> {
            Ok(Node::new(name).with_text(value.to_uppercase()))
        }

        fn decode(&self, node: &Node, _: &PersistContext<'_>) -> Result<String, CodecError> {
            Ok(node.text().unwrap_or_default().to_lowercase())
        }
    }

    fn codec() -> ElementCodec {
        let mut codec = ElementCodec::new();
        let registry = codec.registry_mut();
        registry.register_element::<Circle>();
        registry.register_variant::<dyn Shape, Circle>(|v| Box::new(v), |v| v);
        codec
    }

    #[test]
    fn slot_records_concrete_type() {
        let codec = codec();
        let shape: Box<dyn Shape> = Box::new(Circle { radius: 2.0 });

        let node = codec.save(&shape, "Shape").unwrap();
        assert_eq!(node.attribute(TYPE_ATTRIBUTE), Some("geometry::Circle"));

        let back: Box<dyn Shape> = codec.load(&node).unwrap();
        assert_eq!(back.as_any().downcast_ref::<Circle>(), Some(&Circle { radius: 2.0 }));
    }

    #[test]
    fn slot_rejects_types_that_are_not_variants() {
        let codec = codec();
        let node = Node::new("Shape").with_attribute(TYPE_ATTRIBUTE, "i32").with_attribute("Value", 3);
        let err = codec.load::<Box<dyn Shape>>(&node).err();
        assert!(matches!(err, Some(CodecError::TypeMismatch { .. })));

        let node = Node::new("Shape").with_attribute(TYPE_ATTRIBUTE, "geometry::Hexagon");
        let err = codec.load::<Box<dyn Shape>>(&node).err();
        assert!(matches!(err, Some(CodecError::UnresolvedType { .. })));
    }

    #[test]
    fn unregistered_slot_value_needs_interface_provider() {
        let mut codec = codec();
        let shape: Box<dyn Shape> = Box::new(Unlisted);
        assert!(matches!(codec.save(&shape, "Shape"), Err(CodecError::NotConvertible { .. })));

        codec.registry_mut().register_interface_provider::<dyn Shape>(AreaProvider);
        let node = codec.save(&shape, "Shape").unwrap();
        assert!(!node.has_attribute(TYPE_ATTRIBUTE));

        let back: Box<dyn Shape> = codec.load(&node).unwrap();
        assert_eq!(back.as_any().downcast_ref::<Square>(), Some(&Square(1.0)));
    }

    #[test]
    fn interface_provider_serves_variants_without_strategy() {
        let mut codec = codec();
        let registry = codec.registry_mut();
        registry.register_interface_provider::<dyn Shape>(AreaProvider);
        registry.register_variant::<dyn Shape, Square>(|v| Box::new(v), |v| v);

        let node = codec.save(&Square(3.0), "Tile").unwrap();
        assert_eq!(node.attribute(TYPE_ATTRIBUTE), Some("geometry::Square"));
        assert_eq!(node.attribute("Area"), Some("9"));
        assert_eq!(codec.load::<Square>(&node).unwrap(), Square(3.0));

        let shape: Box<dyn Shape> = Box::new(Square(3.0));
        let node = codec.save(&shape, "Tile").unwrap();
        assert_eq!(node.attribute(TYPE_ATTRIBUTE), Some("geometry::Square"));
        let back: Box<dyn Shape> = codec.load(&node).unwrap();
        assert_eq!(back.area(), 9.0);
    }

    #[test]
    fn provider_overrides_builtin() {
        let mut codec = ElementCodec::new();
        let plain = codec.save(&String::from("port"), "Side").unwrap();
        assert_eq!(plain.attribute("Value"), Some("port"));

        codec.registry_mut().register_provider(Shout);
        let node = codec.save(&String::from("port"), "Side").unwrap();
        assert_eq!(node.text(), Some("PORT"));
        assert_eq!(codec.load::<String>(&node).unwrap(), "port");
    }

    #[test]
    fn element_wins_over_provider() {
        struct Fixed;

        impl Provider<Circle> for Fixed {
            fn encode(&self, _: &Circle, name: &str, _: &PersistContext<'_>) -> Result<Node, CodecError> {
                Ok(Node::new(name))
            }

            fn decode(&self, _: &Node, _: &PersistContext<'_>) -> Result<Circle, CodecError> {
                Ok(Circle { radius: 0.0 })
            }
        }

        let mut codec = codec();
        codec.registry_mut().register_provider(Fixed);
        let node = codec.save(&Circle { radius: 1.5 }, "C").unwrap();
        assert!(node.child("Radius").is_some());
    }

    #[test]
    fn missing_strategy_is_not_convertible() {
        let codec = ElementCodec::new();
        let err = codec.save(&Circle { radius: 1.0 }, "C").unwrap_err();
        assert_eq!(err, CodecError::NotConvertible {
            type_path: "geometry::Circle".into()
        });
        assert!(matches!(
            codec.load::<Circle>(&Node::new("C")),
            Err(CodecError::NotConvertible { .. })
        ));
    }

    #[test]
    fn recorded_type_must_match() {
        let codec = codec();
        let node = Node::new("N").with_attribute(TYPE_ATTRIBUTE, "u8").with_attribute("Value", 1);
        assert!(matches!(codec.load::<i32>(&node), Err(CodecError::TypeMismatch { .. })));

        let node = Node::new("N").with_attribute(TYPE_ATTRIBUTE, "no::Such").with_attribute("Value", 1);
        assert!(matches!(codec.load::<i32>(&node), Err(CodecError::UnresolvedType { .. })));

        let node = Node::new("N").with_attribute(TYPE_ATTRIBUTE, "I32").with_attribute("Value", 1);
        assert_eq!(codec.load::<i32>(&node).unwrap(), 1);
    }

    #[test]
    fn absent_child_yields_default() {
        let codec = codec();
        let parent = Node::new("Parent");
        assert_eq!(codec.read_child(&parent, "Missing", 42_i64).unwrap(), 42);
        assert_eq!(codec.read_child(&parent, "Missing", Vec::<u8>::new()).unwrap(), Vec::<u8>::new());

        let err = codec.context().read_child::<i64>(&parent, "Missing").unwrap_err();
        assert_eq!(err, CodecError::MissingChild {
            parent: "Parent".into(),
            name: "Missing".into()
        });
    }
}
