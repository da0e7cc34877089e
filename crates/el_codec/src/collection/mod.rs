//! Lists and dictionaries.
//!
//! A list is a sequence of `ListItem` children, each tagged with the type
//! path of its element and wrapping the element node named `Value`:
//!
//! ```text
//! <Shapes>
//!   <ListItem Type="geometry::Circle"><Value Type="geometry::Circle" .../></ListItem>
//!   <ListItem Type="geometry::Square"><Value Type="geometry::Square" .../></ListItem>
//! </Shapes>
//! ```
//!
//! A dictionary is a sequence of `DictionaryItem` children holding a `Key`
//! and a `Value` node, each tagged with its own type path:
//!
//! ```text
//! <Depths>
//!   <DictionaryItem>
//!     <Key Type="alloc::string::String" Value="bow"/>
//!     <Value Type="f32" Value="3.5"/>
//!   </DictionaryItem>
//! </Depths>
//! ```
//!
//! Tags make heterogeneous content come back as the concrete types that
//! were saved. A tag must resolve to a registered type, and that type must
//! fit the declared element type: either the element type itself or, for
//! `Box<dyn I>` elements, a registered variant of `I`.
//!
//! Dictionary keys are unique after loading. A repeated key replaces the
//! earlier pair and logs a warning.

// -----------------------------------------------------------------------------
// Modules

mod dictionary;
mod list;

// -----------------------------------------------------------------------------
// Exports

pub use dictionary::Dictionary;

use crate::codec::{PersistContext, TYPE_ATTRIBUTE};
use crate::error::CodecError;
use crate::node::Node;
use crate::path::TypePath;

/// Child name of a `Vec` entry.
pub const LIST_ITEM_NODE: &str = "ListItem";

/// Child name of a dictionary entry.
pub const DICTIONARY_ITEM_NODE: &str = "DictionaryItem";

const KEY_NODE: &str = "Key";
const VALUE_NODE: &str = "Value";

// Saves `value` as a node named `name` that always carries a type tag.
fn save_tagged<T: TypePath>(value: &T, name: &str, cx: &PersistContext<'_>) -> Result<Node, CodecError> {
    let mut node = cx.save(value, name)?;
    if !node.has_attribute(TYPE_ATTRIBUTE) {
        node.set_attribute(TYPE_ATTRIBUTE, T::type_path());
    }
    Ok(node)
}
