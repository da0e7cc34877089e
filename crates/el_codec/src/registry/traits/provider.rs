use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::Any;
use core::marker::PhantomData;

use crate::codec::PersistContext;
use crate::error::CodecError;
use crate::node::Node;
use crate::path::TypePath;

// -----------------------------------------------------------------------------
// Provider

/// A converter between `T` and [`Node`], registered from outside the type.
///
/// Providers must be deterministic and may only reach outside state through
/// the [`PersistContext`].
///
/// # Examples
///
/// ```
/// use el_codec::prelude::*;
/// use el_codec::impl_type_path;
///
/// #[derive(Debug, PartialEq)]
/// struct Rgb(u8, u8, u8);
/// impl_type_path!(Rgb);
///
/// struct HexProvider;
///
/// impl Provider<Rgb> for HexProvider {
///     fn encode(&self, value: &Rgb, name: &str, _: &PersistContext<'_>) -> Result<Node, CodecError> {
///         let hex = format!("#{:02x}{:02x}{:02x}", value.0, value.1, value.2);
///         Ok(Node::new(name).with_attribute("Value", hex))
///     }
///
///     fn decode(&self, node: &Node, _: &PersistContext<'_>) -> Result<Rgb, CodecError> {
///         let hex = node.attribute_or("Value", "#000000").trim_start_matches('#');
///         let channel = |at: usize| {
///             hex.get(at..at + 2)
///                 .and_then(|digits| u8::from_str_radix(digits, 16).ok())
///                 .unwrap_or(0)
///         };
///         Ok(Rgb(channel(0), channel(2), channel(4)))
///     }
/// }
///
/// let mut codec = ElementCodec::new();
/// codec.registry_mut().register_provider(HexProvider);
///
/// let node = codec.save(&Rgb(255, 128, 0), "Fill").unwrap();
/// assert_eq!(node.attribute("Value"), Some("#ff8000"));
/// assert_eq!(codec.load::<Rgb>(&node).unwrap(), Rgb(255, 128, 0));
/// ```
pub trait Provider<T>: Send + Sync + 'static {
    /// Produces the node for `value`, named `name`.
    fn encode(&self, value: &T, name: &str, cx: &PersistContext<'_>) -> Result<Node, CodecError>;

    /// Rebuilds a value from `node`.
    fn decode(&self, node: &Node, cx: &PersistContext<'_>) -> Result<T, CodecError>;
}

trait ErasedProvider: Send + Sync {
    fn encode(&self, value: &dyn Any, name: &str, cx: &PersistContext<'_>) -> Result<Node, CodecError>;

    fn decode(&self, node: &Node, cx: &PersistContext<'_>) -> Result<Box<dyn Any>, CodecError>;
}

struct ProviderAdapter<T, P> {
    provider: P,
    marker: PhantomData<fn() -> T>,
}

impl<T: TypePath, P: Provider<T>> ErasedProvider for ProviderAdapter<T, P> {
    #[inline]
    fn encode(&self, value: &dyn Any, name: &str, cx: &PersistContext<'_>) -> Result<Node, CodecError> {
        self.provider.encode(super::downcast_value::<T>(value)?, name, cx)
    }

    #[inline]
    fn decode(&self, node: &Node, cx: &PersistContext<'_>) -> Result<Box<dyn Any>, CodecError> {
        self.provider.decode(node, cx).map(super::box_value)
    }
}

// -----------------------------------------------------------------------------
// TypeTraitProvider

/// A registered [`Provider`], erased.
#[derive(Clone)]
pub struct TypeTraitProvider {
    inner: Arc<dyn ErasedProvider>,
}

impl TypeTraitProvider {
    /// Erases `provider`.
    pub fn new<T: TypePath, P: Provider<T>>(provider: P) -> Self {
        Self {
            inner: Arc::new(ProviderAdapter {
                provider,
                marker: PhantomData,
            }),
        }
    }

    #[inline]
    pub fn encode(&self, value: &dyn Any, name: &str, cx: &PersistContext<'_>) -> Result<Node, CodecError> {
        self.inner.encode(value, name, cx)
    }

    #[inline]
    pub fn decode(&self, node: &Node, cx: &PersistContext<'_>) -> Result<Box<dyn Any>, CodecError> {
        self.inner.decode(node, cx)
    }
}
