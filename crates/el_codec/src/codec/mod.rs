//! The save and load dispatcher.
//!
//! [`ElementCodec`] owns a [`TypeRegistry`] and a [`TypeResolver`]. For each
//! value it walks the strategies of the value's [`TypeMeta`] in a fixed
//! order and recurses into nested values through the [`PersistContext`].
//!
//! Save order:
//!
//! 1. array
//! 2. nullable wrapper (`Option<T>`)
//! 3. self-describing ([`Element`](crate::Element))
//! 4. provider registered for the exact type
//! 5. list
//! 6. dictionary
//! 7. polymorphic slot (`Box<dyn I>`)
//! 8. provider of an interface the type is a variant of
//! 9. provider of a base of the type
//!
//! Nodes produced by steps 7 to 9 carry a `Type` attribute holding the
//! concrete type path. Loading follows the same order. A `Type` attribute
//! found on a node loaded by steps 3, 4, 8 or 9 must resolve to the
//! requested type.
//!
//! [`TypeMeta`]: crate::registry::TypeMeta

// -----------------------------------------------------------------------------
// Modules

mod context;
mod driver;

crate::cfg::debug! {
    mod path_stack;
}

// -----------------------------------------------------------------------------
// Exports

pub use context::PersistContext;

use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::Any;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::CodecError;
use crate::node::Node;
use crate::path::TypePath;
use crate::registry::{GetTypeMeta, TypeMeta, TypeRegistry};
use crate::resolver::{DefaultTypeResolver, TypeResolver};

/// Attribute holding the concrete type path of a value.
pub const TYPE_ATTRIBUTE: &str = "Type";

/// Attribute marking a null array or an empty `Option`.
pub const IS_NULL_ATTRIBUTE: &str = "IsNull";

// -----------------------------------------------------------------------------
// ElementCodec

/// Converts values to [`Node`] trees and back.
///
/// # Examples
///
/// ```
/// use el_codec::prelude::*;
///
/// let mut codec = ElementCodec::new();
/// codec.register::<Vec<i32>>();
///
/// let node = codec.save(&vec![3_i32, -1], "Offsets").unwrap();
/// assert_eq!(
///     node.to_string(),
///     r#"<Offsets><ListItem Type="i32"><Value Value="3"/></ListItem><ListItem Type="i32"><Value Value="-1"/></ListItem></Offsets>"#,
/// );
///
/// let offsets: Vec<i32> = codec.load(&node).unwrap();
/// assert_eq!(offsets, [3, -1]);
/// ```
pub struct ElementCodec {
    registry: TypeRegistry,
    resolver: Box<dyn TypeResolver>,
}

impl Default for ElementCodec {
    /// See [`ElementCodec::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ElementCodec {
    /// A codec with the built-in providers and the [`DefaultTypeResolver`].
    ///
    /// Types of the `auto_register` inventory are registered as well.
    pub fn new() -> Self {
        let mut registry = TypeRegistry::new();
        registry.auto_register();
        Self::with_registry(registry)
    }

    /// A codec with an empty registry and the [`DefaultTypeResolver`].
    #[inline]
    pub fn empty() -> Self {
        Self::with_registry(TypeRegistry::empty())
    }

    /// A codec over `registry` with the [`DefaultTypeResolver`].
    #[inline]
    pub fn with_registry(registry: TypeRegistry) -> Self {
        Self {
            registry,
            resolver: Box::new(DefaultTypeResolver),
        }
    }

    /// Replaces the resolver.
    #[inline]
    pub fn with_resolver(mut self, resolver: impl TypeResolver) -> Self {
        self.set_resolver(resolver);
        self
    }

    #[inline]
    pub fn set_resolver(&mut self, resolver: impl TypeResolver) {
        self.resolver = Box::new(resolver);
    }

    #[inline]
    pub fn resolver(&self) -> &dyn TypeResolver {
        &*self.resolver
    }

    #[inline]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    #[inline]
    pub fn registry_mut(&mut self) -> &mut TypeRegistry {
        &mut self.registry
    }

    /// Shorthand for [`TypeRegistry::register`].
    #[inline]
    pub fn register<T: GetTypeMeta>(&mut self) -> &mut Self {
        self.registry.register::<T>();
        self
    }

    /// A context without caller state.
    #[inline]
    pub fn context(&self) -> PersistContext<'_> {
        PersistContext::new(self, None)
    }

    /// A context carrying `state`, see [`PersistContext::state`].
    #[inline]
    pub fn context_with<'a>(&'a self, state: &'a dyn Any) -> PersistContext<'a> {
        PersistContext::new(self, Some(state))
    }

    /// Saves `value` as a node named `name`.
    #[inline]
    pub fn save<T: TypePath>(&self, value: &T, name: &str) -> Result<Node, CodecError> {
        self.context().save(value, name)
    }

    /// [`save`](Self::save) with a caller state.
    #[inline]
    pub fn save_with<T: TypePath>(&self, value: &T, name: &str, state: &dyn Any) -> Result<Node, CodecError> {
        self.context_with(state).save(value, name)
    }

    /// Loads a `T` from `node`.
    #[inline]
    pub fn load<T: TypePath>(&self, node: &Node) -> Result<T, CodecError> {
        self.context().load(node)
    }

    /// [`load`](Self::load) with a caller state.
    #[inline]
    pub fn load_with<T: TypePath>(&self, node: &Node, state: &dyn Any) -> Result<T, CodecError> {
        self.context_with(state).load(node)
    }

    /// Loads the child `name` of `parent`, or returns `default` if it is absent.
    ///
    /// ```
    /// use el_codec::prelude::*;
    ///
    /// let codec = ElementCodec::new();
    /// let parent = Node::new("Vessel");
    /// assert_eq!(codec.read_child(&parent, "Draft", 4.5_f32).unwrap(), 4.5);
    /// ```
    #[inline]
    pub fn read_child<T: TypePath>(&self, parent: &Node, name: &str, default: T) -> Result<T, CodecError> {
        self.context().read_child_or(parent, name, default)
    }

    /// Resolves a recorded type name to its registration.
    pub fn resolve(&self, name: &str) -> Option<&TypeMeta> {
        self.resolver
            .resolve(name, &self.registry)
            .and_then(|type_id| self.registry.get(type_id))
    }
}

impl core::fmt::Debug for ElementCodec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ElementCodec")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// ElementCodecArc

/// An [`ElementCodec`] shared between threads.
///
/// Saves and loads take the read lock, registration takes the write lock.
#[derive(Clone, Default)]
pub struct ElementCodecArc {
    /// The wrapped [`ElementCodec`].
    pub internal: Arc<RwLock<ElementCodec>>,
}

impl ElementCodecArc {
    /// Takes a read lock on the underlying [`ElementCodec`].
    pub fn read(&self) -> RwLockReadGuard<'_, ElementCodec> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying [`ElementCodec`].
    pub fn write(&self) -> RwLockWriteGuard<'_, ElementCodec> {
        self.internal
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<ElementCodec> for ElementCodecArc {
    #[inline]
    fn from(codec: ElementCodec) -> Self {
        Self {
            internal: Arc::new(RwLock::new(codec)),
        }
    }
}

impl core::fmt::Debug for ElementCodecArc {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.read().fmt(f)
    }
}
