use core::any::{Any, TypeId};

use crate::codec::ElementCodec;
use crate::error::CodecError;
use crate::node::Node;
use crate::path::TypePath;
use crate::registry::TypeRegistry;

/// The handle threaded through every save and load call.
///
/// It gives strategies access to the codec for nested values, and to an
/// optional caller state the codec never looks at.
///
/// # Examples
///
/// ```
/// use el_codec::prelude::*;
///
/// let codec = ElementCodec::new();
/// let cx = codec.context();
///
/// let node = Node::new("Leg")
///     .with_child(cx.save(&12_u16, "Speed").unwrap());
///
/// assert_eq!(cx.read_child::<u16>(&node, "Speed").unwrap(), 12);
/// assert_eq!(cx.read_child_or(&node, "Heading", 270_u16).unwrap(), 270);
/// assert!(cx.read_child::<u16>(&node, "Heading").is_err());
/// ```
#[derive(Clone, Copy)]
pub struct PersistContext<'a> {
    codec: &'a ElementCodec,
    state: Option<&'a dyn Any>,
}

impl<'a> PersistContext<'a> {
    #[inline]
    pub(crate) fn new(codec: &'a ElementCodec, state: Option<&'a dyn Any>) -> Self {
        Self { codec, state }
    }

    #[inline]
    pub fn codec(&self) -> &'a ElementCodec {
        self.codec
    }

    #[inline]
    pub fn registry(&self) -> &'a TypeRegistry {
        self.codec.registry()
    }

    /// The caller state, if it is an `R`.
    ///
    /// ```
    /// use el_codec::prelude::*;
    ///
    /// struct Units(&'static str);
    ///
    /// let codec = ElementCodec::new();
    /// let units = Units("knots");
    /// let cx = codec.context_with(&units);
    /// assert_eq!(cx.state::<Units>().map(|u| u.0), Some("knots"));
    /// assert!(cx.state::<u8>().is_none());
    /// ```
    #[inline]
    pub fn state<R: Any>(&self) -> Option<&'a R> {
        self.state?.downcast_ref::<R>()
    }

    /// Saves a nested value as a node named `name`.
    pub fn save<T: TypePath>(&self, value: &T, name: &str) -> Result<Node, CodecError> {
        let meta = self
            .registry()
            .get(TypeId::of::<T>())
            .ok_or_else(|| CodecError::not_convertible(T::type_path()))?;
        self.codec.save_dyn(value, meta, name, self)
    }

    /// Loads a nested value from `node`.
    pub fn load<T: TypePath>(&self, node: &Node) -> Result<T, CodecError> {
        let meta = self
            .registry()
            .get(TypeId::of::<T>())
            .ok_or_else(|| CodecError::not_convertible(T::type_path()))?;
        let value = self.codec.load_dyn(meta, node, self)?;
        match value.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(_) => Err(CodecError::mismatch(T::type_path(), "a value of another type")),
        }
    }

    /// Loads the child `name` of `parent`, which must exist.
    pub fn read_child<T: TypePath>(&self, parent: &Node, name: &str) -> Result<T, CodecError> {
        match parent.child(name) {
            Some(child) => self.load(child),
            None => Err(CodecError::MissingChild {
                parent: parent.name().into(),
                name: name.into(),
            }),
        }
    }

    /// Loads the child `name` of `parent`, or returns `default` if it is absent.
    ///
    /// A child that is present but fails to load is still an error.
    pub fn read_child_or<T: TypePath>(&self, parent: &Node, name: &str, default: T) -> Result<T, CodecError> {
        match parent.child(name) {
            Some(child) => self.load(child),
            None => Ok(default),
        }
    }

    /// [`read_child_or`](Self::read_child_or) with `T::default()`.
    #[inline]
    pub fn read_child_or_default<T: TypePath + Default>(&self, parent: &Node, name: &str) -> Result<T, CodecError> {
        match parent.child(name) {
            Some(child) => self.load(child),
            None => Ok(T::default()),
        }
    }

    /// Resolves a recorded type name through the codec's resolver.
    #[inline]
    pub fn resolve(&self, name: &str) -> Option<TypeId> {
        self.codec.resolver().resolve(name, self.registry())
    }
}

impl core::fmt::Debug for PersistContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PersistContext")
            .field("has_state", &self.state.is_some())
            .finish()
    }
}
