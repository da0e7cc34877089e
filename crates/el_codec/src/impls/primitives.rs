use alloc::string::{String, ToString};
use core::fmt::Display;
use core::str::FromStr;

use crate::codec::PersistContext;
use crate::error::CodecError;
use crate::node::{Node, parse_or};
use crate::path::TypePath;
use crate::registry::{FromType, GetTypeMeta, Provider, TypeMeta, TypeTraitDefault, TypeTraitProvider};

const VALUE_ATTRIBUTE: &str = "Value";

/// Writes a value as its `Display` text in a `Value` attribute.
///
/// Decoding is lenient: a missing or unparsable attribute yields
/// `T::default()`. The text is first parsed as written, then trimmed, so
/// `" "` stays a space for `char` and `String` while `" 7 "` still reads
/// as `7`.
///
/// Any `FromStr + Display + Default` type can use it.
///
/// # Examples
///
/// ```
/// use el_codec::prelude::*;
///
/// let codec = ElementCodec::new();
///
/// let node = codec.save(&-3_i16, "Trim").unwrap();
/// assert_eq!(node.to_string(), r#"<Trim Value="-3"/>"#);
///
/// let lenient = Node::new("Trim").with_attribute("Value", "three");
/// assert_eq!(codec.load::<i16>(&lenient).unwrap(), 0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitiveProvider;

impl<T> Provider<T> for PrimitiveProvider
where
    T: TypePath + FromStr + Display + Default,
{
    fn encode(&self, value: &T, name: &str, _: &PersistContext<'_>) -> Result<Node, CodecError> {
        Ok(Node::new(name).with_attribute(VALUE_ATTRIBUTE, value.to_string()))
    }

    fn decode(&self, node: &Node, _: &PersistContext<'_>) -> Result<T, CodecError> {
        let Some(text) = node.attribute(VALUE_ATTRIBUTE) else {
            log::debug!("`{}` has no `{VALUE_ATTRIBUTE}`, using the default", node.name());
            return Ok(T::default());
        };
        Ok(match text.parse() {
            Ok(value) => value,
            Err(_) => parse_or(text, T::default()),
        })
    }
}

macro_rules! impl_primitive_meta {
    ($($ty:ty)*) => {
        $(
            impl GetTypeMeta for $ty {
                fn get_type_meta() -> TypeMeta {
                    let mut meta = TypeMeta::with_capacity::<Self>(2);
                    meta.insert_trait(TypeTraitProvider::new::<Self, PrimitiveProvider>(PrimitiveProvider));
                    meta.insert_trait(<TypeTraitDefault as FromType<Self>>::from_type());
                    meta
                }
            }
        )*
    };
}

impl_primitive_meta!(
    bool char
    u8 u16 u32 u64 u128 usize
    i8 i16 i32 i64 i128 isize
    f32 f64
    String
);

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use crate::codec::ElementCodec;
    use crate::node::Node;

    #[test]
    fn values_round_trip() {
        let codec = ElementCodec::new();
        let cx = codec.context();

        assert!(cx.load::<bool>(&cx.save(&true, "B").unwrap()).unwrap());
        assert_eq!(cx.load::<char>(&cx.save(&' ', "C").unwrap()).unwrap(), ' ');
        assert_eq!(cx.load::<u128>(&cx.save(&u128::MAX, "U").unwrap()).unwrap(), u128::MAX);
        assert_eq!(cx.load::<i8>(&cx.save(&i8::MIN, "I").unwrap()).unwrap(), i8::MIN);
        assert_eq!(cx.load::<f64>(&cx.save(&0.1_f64, "F").unwrap()).unwrap(), 0.1);

        let text = String::from("  padded <&> ");
        assert_eq!(cx.load::<String>(&cx.save(&text, "S").unwrap()).unwrap(), text);
    }

    #[test]
    fn malformed_values_read_as_default() {
        let codec = ElementCodec::new();

        let node = Node::new("N").with_attribute("Value", " 42 ");
        assert_eq!(codec.load::<u32>(&node).unwrap(), 42);

        let node = Node::new("N").with_attribute("Value", "4x2");
        assert_eq!(codec.load::<u32>(&node).unwrap(), 0);
        assert_eq!(codec.load::<f32>(&Node::new("N")).unwrap(), 0.0);
        assert_eq!(codec.load::<String>(&Node::new("N")).unwrap(), "");
    }

    #[test]
    fn primitives_have_defaults() {
        use crate::registry::TypeTraitDefault;
        use core::any::TypeId;

        let codec = ElementCodec::new();
        let default = codec
            .registry()
            .get_type_trait::<TypeTraitDefault>(TypeId::of::<i64>())
            .unwrap();
        assert_eq!(default.default().downcast_ref::<i64>(), Some(&0));
    }
}
