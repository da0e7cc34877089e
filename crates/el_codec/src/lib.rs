#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Compilation config

/// Some macros used for compilation control.
pub mod cfg {
    el_cfg::define_alias! {
        #[cfg(feature = "auto_register")] => auto_register,
        #[cfg(feature = "serde")] => serde,
        #[cfg(all(debug_assertions, feature = "debug"))] => debug,
    }
}

// -----------------------------------------------------------------------------
// Extern Self

// Generated code names this crate through `el_macro_utils::Manifest`, which
// answers `::el_codec` inside the crate's own tests and doctests as well.
extern crate self as el_codec;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod element;

pub mod array;
pub mod codec;
pub mod collection;
pub mod error;
pub mod impls;
pub mod interface;
pub mod node;
pub mod path;
pub mod registry;
pub mod resolver;

// -----------------------------------------------------------------------------
// Top-Level exports

pub mod __macro_exports;

pub use el_codec_derive as derive;
pub use el_codec_derive::Element;
pub use element::Element;

/// The most used items.
pub mod prelude {
    pub use crate::Element;
    pub use crate::array::NdArray;
    pub use crate::codec::{ElementCodec, PersistContext};
    pub use crate::error::CodecError;
    pub use crate::interface::{Interface, InterfaceProvider};
    pub use crate::node::Node;
    pub use crate::path::TypePath;
    pub use crate::registry::{GetTypeMeta, Provider, TypeRegistry};
}
