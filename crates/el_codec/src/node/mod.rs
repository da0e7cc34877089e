//! The document tree produced by saving and consumed by loading.
//!
//! A [`Node`] is a named element with string attributes, ordered children
//! and an optional text payload. It maps one-to-one onto an XML element,
//! and with the `serde` feature onto any serde data format.

// -----------------------------------------------------------------------------
// Modules

mod attribute;
mod display;

// -----------------------------------------------------------------------------
// Exports

pub use attribute::parse_or;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

// -----------------------------------------------------------------------------
// Node

/// A named tree element.
///
/// - Attribute keys are unique, their order is irrelevant.
/// - Child order is significant, it carries list and array order.
/// - The text payload holds long opaque content such as encoded blobs.
///
/// # Examples
///
/// ```
/// use el_codec::node::Node;
///
/// let node = Node::new("Point")
///     .with_attribute("X", 3)
///     .with_attribute("Y", -1)
///     .with_child(Node::new("Label").with_text("origin"));
///
/// assert_eq!(node.attribute("X"), Some("3"));
/// assert_eq!(node.child("Label").and_then(Node::text), Some("origin"));
/// assert_eq!(node.to_string(), r#"<Point X="3" Y="-1"><Label>origin</Label></Point>"#);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    name: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "BTreeMap::is_empty")
    )]
    attributes: BTreeMap<String, String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    children: Vec<Node>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    text: Option<String>,
}

impl Node {
    /// Creates a node without attributes, children or text.
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            text: None,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Returns `true` if the node has no attributes, children or text.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.children.is_empty() && self.text.is_none()
    }

    // -------------------------------------------------------------------------
    // Attributes

    /// Returns the raw value of an attribute.
    #[inline]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    #[inline]
    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Sets an attribute, returning the previous value.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl ToString) -> Option<String> {
        self.attributes.insert(key.into(), value.to_string())
    }

    /// Builder form of [`set_attribute`](Self::set_attribute).
    #[inline]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set_attribute(key, value);
        self
    }

    pub fn remove_attribute(&mut self, key: &str) -> Option<String> {
        self.attributes.remove(key)
    }

    /// Iterates attributes ordered by key.
    pub fn attributes(&self) -> impl ExactSizeIterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    // -------------------------------------------------------------------------
    // Children

    #[inline]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    #[inline]
    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    /// Appends a child.
    #[inline]
    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Builder form of [`push`](Self::push).
    #[inline]
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// The first child, whatever its name.
    #[inline]
    pub fn first_child(&self) -> Option<&Node> {
        self.children.first()
    }

    /// The first child called `name`.
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Every child called `name`, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    // -------------------------------------------------------------------------
    // Text

    #[inline]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    #[inline]
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    #[inline]
    pub fn take_text(&mut self) -> Option<String> {
        self.text.take()
    }

    /// Builder form of [`set_text`](Self::set_text).
    #[inline]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::Node;
    use alloc::vec::Vec;

    #[test]
    fn attributes_are_unique() {
        let mut node = Node::new("Stop");
        assert_eq!(node.set_attribute("Offset", 0.25), None);
        assert_eq!(node.set_attribute("Offset", 0.5).as_deref(), Some("0.25"));

        assert_eq!(node.attributes().len(), 1);
        assert_eq!(node.attribute("Offset"), Some("0.5"));
        assert_eq!(node.remove_attribute("Offset").as_deref(), Some("0.5"));
        assert!(node.is_empty());
    }

    #[test]
    fn child_lookup_keeps_document_order() {
        let node = Node::new("List")
            .with_child(Node::new("Item").with_attribute("Value", 1))
            .with_child(Node::new("Other"))
            .with_child(Node::new("Item").with_attribute("Value", 2));

        let values: Vec<_> = node
            .children_named("Item")
            .filter_map(|item| item.attribute("Value"))
            .collect();
        assert_eq!(values, ["1", "2"]);

        assert_eq!(node.child("Item").and_then(|n| n.attribute("Value")), Some("1"));
        assert_eq!(node.first_child().map(Node::name), Some("Item"));
        assert!(node.child("Missing").is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_document() {
        let node = Node::new("Brush")
            .with_attribute("Kind", "Solid")
            .with_child(Node::new("Color").with_attribute("Value", "#ff0000"));

        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(
            json,
            r##"{"name":"Brush","attributes":{"Kind":"Solid"},"children":[{"name":"Color","attributes":{"Value":"#ff0000"}}]}"##
        );

        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn ron_document_with_text() {
        let node = Node::new("Image").with_text("iVBORw0KGgo=");

        let text = ron::to_string(&node).unwrap();
        let back: Node = ron::from_str(&text).unwrap();
        assert_eq!(back.text(), Some("iVBORw0KGgo="));
        assert_eq!(back, node);
    }
}
