use core::fmt::{self, Display, Write};

use quick_xml::escape::{escape, partial_escape};

use super::Node;

/// Renders the node as a compact XML element.
///
/// Output only, there is no parser. Attribute order follows the key order.
impl Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('<')?;
        f.write_str(&self.name)?;
        for (key, value) in &self.attributes {
            write!(f, " {key}=\"{}\"", escape(value.as_str()))?;
        }

        if self.children.is_empty() && self.text.is_none() {
            return f.write_str("/>");
        }

        f.write_char('>')?;
        if let Some(text) = &self.text {
            f.write_str(&partial_escape(text.as_str()))?;
        }
        for child in &self.children {
            Display::fmt(child, f)?;
        }
        write!(f, "</{}>", self.name)
    }
}
