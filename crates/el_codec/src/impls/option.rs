use alloc::boxed::Box;
use core::any::{Any, TypeId};

use crate::codec::{IS_NULL_ATTRIBUTE, PersistContext, TYPE_ATTRIBUTE};
use crate::error::CodecError;
use crate::node::Node;
use crate::path::TypePath;
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeTraitDefault, TypeTraitNullable};
use crate::registry::{box_value, downcast_value};

fn save_option<T: TypePath>(value: &dyn Any, name: &str, cx: &PersistContext<'_>) -> Result<Node, CodecError> {
    match downcast_value::<Option<T>>(value)? {
        Some(inner) => cx.save(inner, name),
        None => Ok(Node::new(name).with_attribute(IS_NULL_ATTRIBUTE, true)),
    }
}

fn load_option<T: TypePath>(node: &Node, cx: &PersistContext<'_>) -> Result<Box<dyn Any>, CodecError> {
    if node.attribute_bool(IS_NULL_ATTRIBUTE, false) {
        return Ok(box_value(None::<T>));
    }

    // Containers may tag the node with the option type itself.
    if let Some(recorded) = node.attribute(TYPE_ATTRIBUTE)
        && cx.resolve(recorded) == Some(TypeId::of::<Option<T>>())
    {
        let mut inner = node.clone();
        inner.remove_attribute(TYPE_ATTRIBUTE);
        return cx.load::<T>(&inner).map(|value| box_value(Some(value)));
    }

    cx.load::<T>(node).map(|value| box_value(Some(value)))
}

impl<T: TypePath> FromType<Option<T>> for TypeTraitNullable {
    fn from_type() -> Self {
        TypeTraitNullable::new(save_option::<T>, load_option::<T>)
    }
}

impl<T: GetTypeMeta> GetTypeMeta for Option<T> {
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::with_capacity::<Self>(2);
        meta.insert_trait(<TypeTraitNullable as FromType<Self>>::from_type());
        meta.insert_trait(<TypeTraitDefault as FromType<Self>>::from_type());
        meta
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use crate::codec::{ElementCodec, IS_NULL_ATTRIBUTE, TYPE_ATTRIBUTE};
    use crate::node::Node;

    #[test]
    fn none_is_a_null_node() {
        let mut codec = ElementCodec::new();
        codec.register::<Option<String>>();

        let node = codec.save(&None::<String>, "Label").unwrap();
        assert_eq!(node.to_string(), r#"<Label IsNull="true"/>"#);
        assert_eq!(codec.load::<Option<String>>(&node).unwrap(), None);

        let node = codec.save(&Some(String::from("aft")), "Label").unwrap();
        assert!(!node.has_attribute(IS_NULL_ATTRIBUTE));
        assert_eq!(node.attribute("Value"), Some("aft"));
        assert_eq!(codec.load::<Option<String>>(&node).unwrap().as_deref(), Some("aft"));
    }

    #[test]
    fn tagged_with_the_option_type() {
        let mut codec = ElementCodec::new();
        codec.register::<Option<u8>>();

        let node = Node::new("V")
            .with_attribute(TYPE_ATTRIBUTE, "core::option::Option<u8>")
            .with_attribute("Value", 7);
        assert_eq!(codec.load::<Option<u8>>(&node).unwrap(), Some(7));

        let node = Node::new("V").with_attribute(IS_NULL_ATTRIBUTE, "1");
        assert_eq!(codec.load::<Option<u8>>(&node).unwrap(), None);
    }
}
