use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use core::any::Any;
use core::hash::Hash;

use el_utils::hash::{FixedHashState, HashMap as FixedHashMap};

use super::{DICTIONARY_ITEM_NODE, KEY_NODE, VALUE_NODE, save_tagged};
use crate::codec::PersistContext;
use crate::error::CodecError;
use crate::node::Node;
use crate::path::TypePath;
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeTraitDefault, TypeTraitDictionary};
use crate::registry::{box_value, downcast_value};

// -----------------------------------------------------------------------------
// Dictionary

/// A map type the dictionary strategy can fill and walk.
///
/// Implemented for `std::collections::HashMap`, `BTreeMap` and
/// `el_utils::hash::HashMap`.
pub trait Dictionary: TypePath + Default {
    type Key: TypePath;
    type Value: TypePath;

    /// Entries in the map's own iteration order.
    fn entries(&self) -> impl Iterator<Item = (&Self::Key, &Self::Value)>;

    /// Inserts a pair, returning `true` if it replaced an existing key.
    fn insert_entry(&mut self, key: Self::Key, value: Self::Value) -> bool;
}

impl<K, V> Dictionary for std::collections::HashMap<K, V>
where
    K: TypePath + Eq + Hash,
    V: TypePath,
{
    type Key = K;
    type Value = V;

    #[inline]
    fn entries(&self) -> impl Iterator<Item = (&K, &V)> {
        self.iter()
    }

    #[inline]
    fn insert_entry(&mut self, key: K, value: V) -> bool {
        self.insert(key, value).is_some()
    }
}

impl<K, V> Dictionary for FixedHashMap<K, V, FixedHashState>
where
    K: TypePath + Eq + Hash,
    V: TypePath,
{
    type Key = K;
    type Value = V;

    #[inline]
    fn entries(&self) -> impl Iterator<Item = (&K, &V)> {
        self.iter()
    }

    #[inline]
    fn insert_entry(&mut self, key: K, value: V) -> bool {
        self.insert(key, value).is_some()
    }
}

impl<K, V> Dictionary for BTreeMap<K, V>
where
    K: TypePath + Ord,
    V: TypePath,
{
    type Key = K;
    type Value = V;

    #[inline]
    fn entries(&self) -> impl Iterator<Item = (&K, &V)> {
        self.iter()
    }

    #[inline]
    fn insert_entry(&mut self, key: K, value: V) -> bool {
        self.insert(key, value).is_some()
    }
}

// -----------------------------------------------------------------------------
// Strategy

fn save_dictionary<D: Dictionary>(value: &dyn Any, name: &str, cx: &PersistContext<'_>) -> Result<Node, CodecError> {
    let dictionary = downcast_value::<D>(value)?;

    let mut node = Node::new(name);
    for (key, value) in dictionary.entries() {
        node.push(
            Node::new(DICTIONARY_ITEM_NODE)
                .with_child(save_tagged(key, KEY_NODE, cx)?)
                .with_child(save_tagged(value, VALUE_NODE, cx)?),
        );
    }
    Ok(node)
}

fn load_dictionary<D: Dictionary>(node: &Node, cx: &PersistContext<'_>) -> Result<Box<dyn Any>, CodecError> {
    let mut dictionary = D::default();

    for (at, item) in node.children_named(DICTIONARY_ITEM_NODE).enumerate() {
        let Some(key) = item.child(KEY_NODE) else {
            log::warn!("`{}` skips item {at} without a key", node.name());
            continue;
        };
        let key = cx.load::<D::Key>(key)?;

        let value = match item.child(VALUE_NODE) {
            Some(value) => cx.load::<D::Value>(value)?,
            None => match cx.registry().create_default::<D::Value>() {
                Some(default) => default,
                None => {
                    log::warn!("`{}` skips item {at} without a value", node.name());
                    continue;
                }
            },
        };

        if dictionary.insert_entry(key, value) {
            log::warn!("`{}` repeats the key of item {at}, the later pair wins", node.name());
        }
    }

    Ok(box_value(dictionary))
}

impl<K, V> FromType<std::collections::HashMap<K, V>> for TypeTraitDictionary
where
    K: TypePath + Eq + Hash,
    V: TypePath,
{
    fn from_type() -> Self {
        TypeTraitDictionary::new(
            save_dictionary::<std::collections::HashMap<K, V>>,
            load_dictionary::<std::collections::HashMap<K, V>>,
        )
    }
}

impl<K, V> FromType<FixedHashMap<K, V, FixedHashState>> for TypeTraitDictionary
where
    K: TypePath + Eq + Hash,
    V: TypePath,
{
    fn from_type() -> Self {
        TypeTraitDictionary::new(
            save_dictionary::<FixedHashMap<K, V, FixedHashState>>,
            load_dictionary::<FixedHashMap<K, V, FixedHashState>>,
        )
    }
}

impl<K, V> FromType<BTreeMap<K, V>> for TypeTraitDictionary
where
    K: TypePath + Ord,
    V: TypePath,
{
    fn from_type() -> Self {
        TypeTraitDictionary::new(save_dictionary::<BTreeMap<K, V>>, load_dictionary::<BTreeMap<K, V>>)
    }
}

macro_rules! impl_dictionary_meta {
    ($map:ty, $($bound:tt)*) => {
        impl<K, V> GetTypeMeta for $map
        where
            K: GetTypeMeta + $($bound)*,
            V: GetTypeMeta,
        {
            fn get_type_meta() -> TypeMeta {
                let mut meta = TypeMeta::with_capacity::<Self>(2);
                meta.insert_trait(<TypeTraitDictionary as FromType<Self>>::from_type());
                meta.insert_trait(<TypeTraitDefault as FromType<Self>>::from_type());
                meta
            }

            fn register_dependencies(registry: &mut TypeRegistry) {
                registry.register::<K>();
                registry.register::<V>();
            }
        }
    };
}

impl_dictionary_meta!(std::collections::HashMap<K, V>, Eq + Hash);
impl_dictionary_meta!(FixedHashMap<K, V, FixedHashState>, Eq + Hash);
impl_dictionary_meta!(BTreeMap<K, V>, Ord);

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use core::any::Any;

    use el_utils::hash::HashMap as FixedHashMap;

    use crate::codec::{ElementCodec, PersistContext, TYPE_ATTRIBUTE};
    use crate::error::CodecError;
    use crate::interface::{Interface, InterfaceProvider};
    use crate::node::Node;
    use crate::path::TypePath;
    use crate::{Element, impl_interface, impl_type_path};

    pub trait Sensor: Any {
        fn reading(&self) -> f64;
    }
    impl_interface!(Sensor);

    #[derive(Debug, PartialEq)]
    struct Thermometer(f64);
    impl_type_path!(Thermometer as "deck::Thermometer");

    impl Sensor for Thermometer {
        fn reading(&self) -> f64 {
            self.0
        }
    }

    impl Element for Thermometer {
        fn save_element(&self, name: &str, _: &PersistContext<'_>) -> Result<Node, CodecError> {
            Ok(Node::new(name).with_attribute("Celsius", self.0))
        }

        fn load_element(node: &Node, _: &PersistContext<'_>) -> Result<Self, CodecError> {
            Ok(Self(node.attribute_parsed("Celsius", 0.0)))
        }
    }

    #[derive(Debug, PartialEq)]
    struct Barometer {
        hpa: u32,
    }
    impl_type_path!(Barometer as "deck::Barometer");

    impl Sensor for Barometer {
        fn reading(&self) -> f64 {
            f64::from(self.hpa)
        }
    }

    impl Element for Barometer {
        fn save_element(&self, name: &str, cx: &PersistContext<'_>) -> Result<Node, CodecError> {
            Ok(Node::new(name).with_child(cx.save(&self.hpa, "Pressure")?))
        }

        fn load_element(node: &Node, cx: &PersistContext<'_>) -> Result<Self, CodecError> {
            Ok(Self {
                hpa: cx.read_child(node, "Pressure")?,
            })
        }
    }

    // Not registered: only the interface provider can handle it.
    struct Dial(f64);

    impl Sensor for Dial {
        fn reading(&self) -> f64 {
            self.0
        }
    }

    struct ReadingProvider;

    impl InterfaceProvider<dyn Sensor> for ReadingProvider {
        fn encode(&self, value: &dyn Sensor, name: &str, _: &PersistContext<'_>) -> Result<Node, CodecError> {
            Ok(Node::new(name).with_attribute("Reading", value.reading()))
        }

        fn decode(&self, node: &Node, _: &PersistContext<'_>) -> Result<Box<dyn Sensor>, CodecError> {
            Ok(Box::new(Thermometer(node.attribute_parsed("Reading", 0.0))))
        }
    }

    fn codec() -> ElementCodec {
        let mut codec = ElementCodec::new();
        let registry = codec.registry_mut();
        registry.register_element::<Thermometer>();
        registry.register_element::<Barometer>();
        registry.register_variant::<dyn Sensor, Thermometer>(|v| Box::new(v), |v| v);
        registry.register_variant::<dyn Sensor, Barometer>(|v| Box::new(v), |v| v);
        codec.register::<BTreeMap<String, Box<dyn Sensor>>>();
        codec
    }

    #[test]
    fn polymorphic_values_keep_their_types() {
        let codec = codec();
        let mut sensors: BTreeMap<String, Box<dyn Sensor>> = BTreeMap::new();
        sensors.insert(String::from("bridge"), Box::new(Thermometer(21.5)));
        sensors.insert(String::from("mast"), Box::new(Barometer { hpa: 1013 }));

        let node = codec.save(&sensors, "Sensors").unwrap();
        let item = &node.children()[1];
        assert_eq!(item.name(), "DictionaryItem");
        let key = item.child("Key").unwrap();
        assert_eq!(key.attribute(TYPE_ATTRIBUTE), Some("alloc::string::String"));
        assert_eq!(key.attribute("Value"), Some("mast"));
        assert_eq!(item.child("Value").unwrap().attribute(TYPE_ATTRIBUTE), Some("deck::Barometer"));

        let back: BTreeMap<String, Box<dyn Sensor>> = codec.load(&node).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back["bridge"].as_any().downcast_ref::<Thermometer>(), Some(&Thermometer(21.5)));
        assert_eq!(back["mast"].as_any().downcast_ref::<Barometer>(), Some(&Barometer { hpa: 1013 }));
    }

    #[test]
    fn interface_provider_values_round_trip() {
        let mut codec = codec();
        codec.registry_mut().register_interface_provider::<dyn Sensor>(ReadingProvider);
        codec.register::<BTreeMap<u8, Box<dyn Sensor>>>();

        let mut dials: BTreeMap<u8, Box<dyn Sensor>> = BTreeMap::new();
        dials.insert(5, Box::new(Dial(3.5)));

        let node = codec.save(&dials, "Dials").unwrap();
        let value = node.children()[0].child("Value").unwrap();
        assert_eq!(value.attribute("Reading"), Some("3.5"));
        assert_eq!(value.attribute(TYPE_ATTRIBUTE), Some(<Box<dyn Sensor>>::type_path()));

        let back: BTreeMap<u8, Box<dyn Sensor>> = codec.load(&node).unwrap();
        assert_eq!(back[&5].as_any().downcast_ref::<Thermometer>(), Some(&Thermometer(3.5)));
    }

    #[test]
    fn later_duplicate_key_wins() {
        let mut codec = ElementCodec::new();
        codec.register::<FixedHashMap<u8, i32>>();

        let item = |key: u8, value: i32| {
            Node::new("DictionaryItem")
                .with_child(Node::new("Key").with_attribute(TYPE_ATTRIBUTE, "u8").with_attribute("Value", key))
                .with_child(Node::new("Value").with_attribute(TYPE_ATTRIBUTE, "i32").with_attribute("Value", value))
        };
        let node = Node::new("Map")
            .with_child(item(1, 10))
            .with_child(item(2, 20))
            .with_child(item(1, -10));

        let back: FixedHashMap<u8, i32> = codec.load(&node).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back[&1], -10);
        assert_eq!(back[&2], 20);
    }

    #[test]
    fn key_tag_must_match() {
        let mut codec = ElementCodec::new();
        codec.register::<std::collections::HashMap<u8, u8>>();

        let node = Node::new("Map").with_child(
            Node::new("DictionaryItem")
                .with_child(Node::new("Key").with_attribute(TYPE_ATTRIBUTE, "alloc::string::String"))
                .with_child(Node::new("Value").with_attribute("Value", 1)),
        );
        let err = codec.load::<std::collections::HashMap<u8, u8>>(&node).unwrap_err();
        assert!(matches!(err, CodecError::TypeMismatch { .. }));
    }

    #[test]
    fn incomplete_items() {
        let mut codec = ElementCodec::new();
        codec.register::<BTreeMap<char, String>>();

        let node = Node::new("Map")
            .with_child(Node::new("DictionaryItem").with_child(Node::new("Value").with_attribute("Value", "lost")))
            .with_child(Node::new("DictionaryItem").with_child(Node::new("Key").with_attribute("Value", "k")));

        let back: BTreeMap<char, String> = codec.load(&node).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[&'k'], "");
    }

    #[test]
    fn std_hash_map_round_trip() {
        let mut codec = ElementCodec::new();
        codec.register::<std::collections::HashMap<i64, Option<bool>>>();

        let mut flags = std::collections::HashMap::new();
        flags.insert(-4_i64, Some(true));
        flags.insert(9, None);
        flags.insert(0, Some(false));

        let node = codec.save(&flags, "Flags").unwrap();
        assert_eq!(node.children().len(), 3);
        assert_eq!(codec.load::<std::collections::HashMap<i64, Option<bool>>>(&node).unwrap(), flags);
    }
}
