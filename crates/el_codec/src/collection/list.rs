use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::{Any, TypeId};

use super::{LIST_ITEM_NODE, VALUE_NODE};
use crate::codec::{PersistContext, TYPE_ATTRIBUTE};
use crate::error::CodecError;
use crate::node::Node;
use crate::path::TypePath;
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeTraitDefault, TypeTraitList};
use crate::registry::{box_value, downcast_value};

fn save_list<T: TypePath>(value: &dyn Any, name: &str, cx: &PersistContext<'_>) -> Result<Node, CodecError> {
    let list = downcast_value::<Vec<T>>(value)?;

    let mut node = Node::new(name);
    for item in list {
        let value = cx.save(item, VALUE_NODE)?;
        let tag = value.attribute(TYPE_ATTRIBUTE).unwrap_or(T::type_path());
        node.push(
            Node::new(LIST_ITEM_NODE)
                .with_attribute(TYPE_ATTRIBUTE, tag)
                .with_child(value),
        );
    }
    Ok(node)
}

fn load_list<T: TypePath>(node: &Node, cx: &PersistContext<'_>) -> Result<Box<dyn Any>, CodecError> {
    let mut list: Vec<T> = Vec::with_capacity(node.children().len());

    for (at, item) in node.children_named(LIST_ITEM_NODE).enumerate() {
        let Some(value) = item.child(VALUE_NODE).or_else(|| item.first_child()) else {
            match cx.registry().create_default::<T>() {
                Some(default) => list.push(default),
                None => log::warn!("`{}` skips empty item {at}", node.name()),
            }
            continue;
        };
        list.push(load_item::<T>(item, value, cx)?);
    }

    Ok(box_value(list))
}

// The item tag names the concrete type. A value node without its own tag
// inherits it, so the element strategy sees what the list recorded.
fn load_item<T: TypePath>(item: &Node, value: &Node, cx: &PersistContext<'_>) -> Result<T, CodecError> {
    let Some(tag) = item.attribute(TYPE_ATTRIBUTE) else {
        return cx.load::<T>(value);
    };
    let resolved = cx
        .resolve(tag)
        .ok_or_else(|| CodecError::UnresolvedType { name: tag.into() })?;

    if resolved == TypeId::of::<T>() || value.has_attribute(TYPE_ATTRIBUTE) {
        return cx.load::<T>(value);
    }
    let mut tagged = value.clone();
    tagged.set_attribute(TYPE_ATTRIBUTE, tag);
    cx.load::<T>(&tagged)
}

impl<T: TypePath> FromType<Vec<T>> for TypeTraitList {
    fn from_type() -> Self {
        TypeTraitList::new(save_list::<T>, load_list::<T>)
    }
}

impl<T: GetTypeMeta> GetTypeMeta for Vec<T> {
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::with_capacity::<Self>(2);
        meta.insert_trait(<TypeTraitList as FromType<Self>>::from_type());
        meta.insert_trait(<TypeTraitDefault as FromType<Self>>::from_type());
        meta
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::any::Any;

    use crate::codec::{ElementCodec, PersistContext, TYPE_ATTRIBUTE};
    use crate::error::CodecError;
    use crate::interface::Interface;
    use crate::node::Node;
    use crate::{Element, impl_interface, impl_type_path};

    pub trait Cargo: Any {
        fn weight(&self) -> u32;
    }
    impl_interface!(Cargo);

    #[derive(Debug, PartialEq)]
    struct Crate {
        weight: u32,
    }
    impl_type_path!(Crate as "hold::Crate");

    impl Cargo for Crate {
        fn weight(&self) -> u32 {
            self.weight
        }
    }

    impl Element for Crate {
        fn save_element(&self, name: &str, cx: &PersistContext<'_>) -> Result<Node, CodecError> {
            Ok(Node::new(name).with_child(cx.save(&self.weight, "Weight")?))
        }

        fn load_element(node: &Node, cx: &PersistContext<'_>) -> Result<Self, CodecError> {
            Ok(Self {
                weight: cx.read_child(node, "Weight")?,
            })
        }
    }

    #[derive(Debug, PartialEq)]
    struct Barrel {
        liters: u32,
    }
    impl_type_path!(Barrel as "hold::Barrel");

    impl Cargo for Barrel {
        fn weight(&self) -> u32 {
            self.liters
        }
    }

    impl Element for Barrel {
        fn save_element(&self, name: &str, _: &PersistContext<'_>) -> Result<Node, CodecError> {
            Ok(Node::new(name).with_attribute("Liters", self.liters))
        }

        fn load_element(node: &Node, _: &PersistContext<'_>) -> Result<Self, CodecError> {
            Ok(Self {
                liters: node.attribute_parsed("Liters", 0),
            })
        }
    }

    fn codec() -> ElementCodec {
        let mut codec = ElementCodec::new();
        let registry = codec.registry_mut();
        registry.register_element::<Crate>();
        registry.register_element::<Barrel>();
        registry.register_variant::<dyn Cargo, Crate>(|v| Box::new(v), |v| v);
        registry.register_variant::<dyn Cargo, Barrel>(|v| Box::new(v), |v| v);
        codec.register::<Vec<Box<dyn Cargo>>>();
        codec
    }

    #[test]
    fn heterogeneous_items_keep_their_types() {
        let codec = codec();
        let hold: Vec<Box<dyn Cargo>> = vec![
            Box::new(Crate { weight: 40 }),
            Box::new(Barrel { liters: 200 }),
            Box::new(Crate { weight: 7 }),
        ];

        let node = codec.save(&hold, "Hold").unwrap();
        let tags: Vec<&str> = node
            .children_named("ListItem")
            .map(|item| item.attribute(TYPE_ATTRIBUTE).unwrap())
            .collect();
        assert_eq!(tags, ["hold::Crate", "hold::Barrel", "hold::Crate"]);

        let back: Vec<Box<dyn Cargo>> = codec.load(&node).unwrap();
        assert_eq!(back.len(), 3);
        assert_eq!(back[0].as_any().downcast_ref::<Crate>(), Some(&Crate { weight: 40 }));
        assert_eq!(back[1].as_any().downcast_ref::<Barrel>(), Some(&Barrel { liters: 200 }));
        assert_eq!(back.iter().map(|item| item.weight()).sum::<u32>(), 247);
    }

    #[test]
    fn item_tag_drives_the_value() {
        let codec = codec();
        let item = Node::new("ListItem")
            .with_attribute(TYPE_ATTRIBUTE, "hold::Barrel")
            .with_child(Node::new("Value").with_attribute("Liters", 5));
        let node = Node::new("Hold").with_child(item);

        let back: Vec<Box<dyn Cargo>> = codec.load(&node).unwrap();
        assert_eq!(back[0].as_any().downcast_ref::<Barrel>(), Some(&Barrel { liters: 5 }));
    }

    #[test]
    fn unknown_tag_is_an_error() {
        let codec = codec();
        let item = Node::new("ListItem")
            .with_attribute(TYPE_ATTRIBUTE, "hold::Chest")
            .with_child(Node::new("Value"));
        let node = Node::new("Hold").with_child(item);

        let err = codec.load::<Vec<Box<dyn Cargo>>>(&node).err();
        assert_eq!(err, Some(CodecError::UnresolvedType {
            name: String::from("hold::Chest")
        }));

        // Resolves, but a `u8` is not a variant of `Cargo`.
        let item = Node::new("ListItem")
            .with_attribute(TYPE_ATTRIBUTE, "u8")
            .with_child(Node::new("Value").with_attribute("Value", 1));
        let node = Node::new("Hold").with_child(item);
        let err = codec.load::<Vec<Box<dyn Cargo>>>(&node).err();
        assert!(err.is_some_and(|err| err.is_type_error()));
    }

    #[test]
    fn empty_items_take_the_default() {
        let mut codec = ElementCodec::new();
        codec.register::<Vec<u8>>();

        let node = Node::new("Bytes")
            .with_child(Node::new("ListItem").with_attribute(TYPE_ATTRIBUTE, "u8"))
            .with_child(
                Node::new("ListItem")
                    .with_attribute(TYPE_ATTRIBUTE, "u8")
                    .with_child(Node::new("Value").with_attribute("Value", 9)),
            )
            .with_child(Node::new("Comment"));
        assert_eq!(codec.load::<Vec<u8>>(&node).unwrap(), [0, 9]);

        let codec = self::codec();
        let node = Node::new("Hold").with_child(Node::new("ListItem"));
        assert!(codec.load::<Vec<Box<dyn Cargo>>>(&node).unwrap().is_empty());
    }

    #[test]
    fn nested_lists() {
        let mut codec = ElementCodec::new();
        codec.register::<Vec<Vec<String>>>();

        let value = vec![vec![String::from("a")], Vec::new(), vec![String::from("b"), String::from("c")]];
        let node = codec.save(&value, "Rows").unwrap();
        assert_eq!(node.children()[0].attribute(TYPE_ATTRIBUTE), Some("alloc::vec::Vec<alloc::string::String>"));
        assert_eq!(codec.load::<Vec<Vec<String>>>(&node).unwrap(), value);
    }
}
