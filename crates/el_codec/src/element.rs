use crate::codec::PersistContext;
use crate::error::CodecError;
use crate::node::Node;
use crate::path::TypePath;

/// A type that writes itself to a [`Node`] and reads itself back.
///
/// Self-describing types take precedence over any registered provider.
/// `#[derive(Element)]` implements it, saving every field as a child named
/// after the field.
///
/// # Examples
///
/// ```
/// use el_codec::prelude::*;
/// use el_codec::impl_type_path;
///
/// #[derive(Debug, PartialEq)]
/// struct Range {
///     low: i32,
///     high: i32,
/// }
/// impl_type_path!(Range);
///
/// impl Element for Range {
///     fn save_element(&self, name: &str, _: &PersistContext<'_>) -> Result<Node, CodecError> {
///         Ok(Node::new(name)
///             .with_attribute("Low", self.low)
///             .with_attribute("High", self.high))
///     }
///
///     fn load_element(node: &Node, _: &PersistContext<'_>) -> Result<Self, CodecError> {
///         Ok(Range {
///             low: node.attribute_parsed("Low", 0),
///             high: node.attribute_parsed("High", 0),
///         })
///     }
/// }
///
/// let mut codec = ElementCodec::new();
/// codec.registry_mut().register_element::<Range>();
///
/// let node = codec.save(&Range { low: -2, high: 9 }, "Window").unwrap();
/// assert_eq!(node.to_string(), r#"<Window High="9" Low="-2"/>"#);
/// assert_eq!(codec.load::<Range>(&node).unwrap(), Range { low: -2, high: 9 });
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Element`",
    note = "consider annotating `{Self}` with `#[derive(Element)]`"
)]
pub trait Element: TypePath + Sized {
    /// Produces the node of `self`, named `name`.
    fn save_element(&self, name: &str, cx: &PersistContext<'_>) -> Result<Node, CodecError>;

    /// Rebuilds a value from `node`.
    fn load_element(node: &Node, cx: &PersistContext<'_>) -> Result<Self, CodecError>;
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::any::TypeId;

    use crate::Element;
    use crate::codec::ElementCodec;
    use crate::error::CodecError;
    use crate::node::Node;
    use crate::path::TypePath;
    use crate::registry::TypeTraitDefault;

    #[derive(Element, Debug, PartialEq, Default)]
    #[element(type_path = "charts::Leg", default)]
    struct Leg {
        #[element(rename = "From")]
        from: String,
        bearing: u16,
        #[element(default)]
        marks: Vec<i8>,
        #[element(skip)]
        cached: Option<u32>,
    }

    #[derive(Element, Debug, PartialEq)]
    struct Fix(f64, f64);

    #[derive(Element, Debug, PartialEq)]
    struct Anchored;

    #[derive(Element, Debug, PartialEq, Default)]
    #[element(default)]
    enum Sail {
        #[default]
        Main,
        #[element(rename = "jib")]
        Jib,
    }

    #[derive(Element, Debug, PartialEq)]
    enum Tack {
        Port,
        Starboard,
    }

    #[derive(Element, Debug, PartialEq)]
    #[element(type_path = "charts::Tagged")]
    struct Tagged<T> {
        value: T,
    }

    #[derive(Element, Debug, PartialEq)]
    struct Route {
        legs: Vec<Route>,
    }

    #[test]
    fn named_fields() {
        let mut codec = ElementCodec::new();
        codec.register::<Leg>();

        let leg = Leg {
            from: String::from("Dover"),
            bearing: 135,
            marks: vec![1, -1],
            cached: Some(7),
        };
        let node = codec.save(&leg, "Leg").unwrap();
        let names: Vec<&str> = node.children().iter().map(Node::name).collect();
        assert_eq!(names, ["From", "bearing", "marks"]);

        let back: Leg = codec.load(&node).unwrap();
        assert_eq!(back, Leg { cached: None, ..leg });

        let sparse = Node::new("Leg")
            .with_child(Node::new("From").with_attribute("Value", "Calais"))
            .with_child(Node::new("bearing").with_attribute("Value", 90));
        assert!(codec.load::<Leg>(&sparse).unwrap().marks.is_empty());

        let err = codec.load::<Leg>(&Node::new("Leg")).unwrap_err();
        assert_eq!(err, CodecError::MissingChild {
            parent: String::from("Leg"),
            name: String::from("From"),
        });
    }

    #[test]
    fn type_attributes() {
        let mut codec = ElementCodec::new();
        codec.register::<Leg>();

        assert_eq!(Leg::type_path(), "charts::Leg");
        assert_eq!(Leg::type_name(), "Leg");
        assert!(Fix::type_path().ends_with("element::tests::Fix"));

        let registry = codec.registry();
        assert!(registry.get_type_trait::<TypeTraitDefault>(TypeId::of::<Leg>()).is_some());
        assert!(registry.contains(TypeId::of::<Vec<i8>>()));
        assert!(!registry.contains(TypeId::of::<Option<u32>>()));
    }

    #[test]
    fn tuple_and_unit_structs() {
        let mut codec = ElementCodec::new();
        codec.register::<Fix>().register::<Anchored>();

        let node = codec.save(&Fix(50.5, -1.25), "Fix").unwrap();
        assert_eq!(node.to_string(), r#"<Fix><Item0 Value="50.5"/><Item1 Value="-1.25"/></Fix>"#);
        assert_eq!(codec.load::<Fix>(&node).unwrap(), Fix(50.5, -1.25));

        let node = codec.save(&Anchored, "State").unwrap();
        assert_eq!(node.to_string(), "<State/>");
        assert_eq!(codec.load::<Anchored>(&node).unwrap(), Anchored);
    }

    #[test]
    fn field_less_enums() {
        let mut codec = ElementCodec::new();
        codec.register::<Sail>().register::<Tack>();

        let node = codec.save(&Sail::Jib, "Sail").unwrap();
        assert_eq!(node.attribute("Value"), Some("jib"));
        assert_eq!(codec.load::<Sail>(&node).unwrap(), Sail::Jib);

        let unknown = Node::new("Sail").with_attribute("Value", "Spinnaker");
        assert_eq!(codec.load::<Sail>(&unknown).unwrap(), Sail::Main);

        let unknown = Node::new("Tack").with_attribute("Value", "Aback");
        assert!(matches!(codec.load::<Tack>(&unknown), Err(CodecError::InvalidValue { .. })));
        let node = codec.save(&Tack::Starboard, "Tack").unwrap();
        assert_eq!(codec.load::<Tack>(&node).unwrap(), Tack::Starboard);
    }

    #[test]
    fn generic_and_recursive_types() {
        let mut codec = ElementCodec::new();
        codec.register::<Tagged<u8>>().register::<Route>();

        assert_eq!(<Tagged<u8>>::type_path(), "charts::Tagged<u8>");
        assert_eq!(<Tagged<String>>::type_name(), "Tagged<String>");

        let node = codec.save(&Tagged { value: 4_u8 }, "T").unwrap();
        assert_eq!(codec.load::<Tagged<u8>>(&node).unwrap(), Tagged { value: 4 });

        let route = Route {
            legs: vec![Route { legs: Vec::new() }, Route {
                legs: vec![Route { legs: Vec::new() }],
            }],
        };
        let node = codec.save(&route, "Route").unwrap();
        assert_eq!(codec.load::<Route>(&node).unwrap(), route);
    }
}
