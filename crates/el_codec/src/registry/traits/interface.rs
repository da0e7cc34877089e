use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};

use crate::codec::PersistContext;
use crate::error::CodecError;
use crate::interface::{Interface, InterfaceProvider};
use crate::node::Node;
use crate::path::TypePath;
use crate::registry::FromType;

// -----------------------------------------------------------------------------
// TypeTraitInterface

/// Marks a trait object type as an interface, optionally with an
/// [`InterfaceProvider`].
#[derive(Clone, Default)]
pub struct TypeTraitInterface {
    provider: Option<Arc<dyn Any + Send + Sync>>,
}

struct InterfaceProviderHolder<I: Interface + ?Sized>(Arc<dyn InterfaceProvider<I>>);

impl TypeTraitInterface {
    #[inline]
    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// The provider of interface `I`, if one is installed.
    pub fn provider<I: Interface + ?Sized>(&self) -> Option<&dyn InterfaceProvider<I>> {
        self.provider
            .as_deref()?
            .downcast_ref::<InterfaceProviderHolder<I>>()
            .map(|holder| &*holder.0)
    }

    /// Installs the provider of interface `I`, replacing the previous one.
    pub fn set_provider<I: Interface + ?Sized>(&mut self, provider: impl InterfaceProvider<I>) {
        let holder: InterfaceProviderHolder<I> = InterfaceProviderHolder(Arc::new(provider));
        self.provider = Some(Arc::new(holder));
    }
}

impl<I: Interface + ?Sized> FromType<I> for TypeTraitInterface {
    #[inline]
    fn from_type() -> Self {
        Self::default()
    }
}

// -----------------------------------------------------------------------------
// TypeTraitSlot

/// Present on `Box<I>` for every registered interface `I`.
///
/// The codec drives the slot protocol, this only holds the parts that
/// need to know `I`.
#[derive(Clone)]
pub struct TypeTraitSlot {
    interface: TypeId,
    concrete: fn(&dyn Any) -> Option<&dyn Any>,
    encode: fn(&dyn Any, &TypeTraitInterface, &str, &PersistContext<'_>) -> Option<Result<Node, CodecError>>,
    decode: fn(&Node, &TypeTraitInterface, &PersistContext<'_>) -> Option<Result<Box<dyn Any>, CodecError>>,
}

impl TypeTraitSlot {
    /// The `TypeId` of the interface `I`, not of `Box<I>`.
    #[inline]
    pub fn interface(&self) -> TypeId {
        self.interface
    }

    /// Borrows the concrete value inside an erased `Box<I>`.
    #[inline]
    pub fn concrete<'a>(&self, slot: &'a dyn Any) -> Option<&'a dyn Any> {
        (self.concrete)(slot)
    }

    /// Encodes an erased `Box<I>` with the interface provider.
    ///
    /// Returns `None` when the interface has no provider.
    #[inline]
    pub fn encode(
        &self,
        slot: &dyn Any,
        interface: &TypeTraitInterface,
        name: &str,
        cx: &PersistContext<'_>,
    ) -> Option<Result<Node, CodecError>> {
        (self.encode)(slot, interface, name, cx)
    }

    /// Decodes a `Box<I>` with the interface provider.
    ///
    /// Returns `None` when the interface has no provider.
    #[inline]
    pub fn decode(
        &self,
        node: &Node,
        interface: &TypeTraitInterface,
        cx: &PersistContext<'_>,
    ) -> Option<Result<Box<dyn Any>, CodecError>> {
        (self.decode)(node, interface, cx)
    }
}

fn slot_concrete<I: Interface + ?Sized>(slot: &dyn Any) -> Option<&dyn Any> {
    slot.downcast_ref::<Box<I>>().map(|boxed| I::as_any(&**boxed))
}

fn slot_encode<I: Interface + ?Sized>(
    slot: &dyn Any,
    interface: &TypeTraitInterface,
    name: &str,
    cx: &PersistContext<'_>,
) -> Option<Result<Node, CodecError>> {
    let provider = interface.provider::<I>()?;
    Some(super::downcast_value::<Box<I>>(slot).and_then(|boxed| provider.encode(&**boxed, name, cx)))
}

fn slot_decode<I: Interface + ?Sized>(
    node: &Node,
    interface: &TypeTraitInterface,
    cx: &PersistContext<'_>,
) -> Option<Result<Box<dyn Any>, CodecError>> {
    let provider = interface.provider::<I>()?;
    Some(provider.decode(node, cx).map(super::box_value))
}

impl<I: Interface + ?Sized> FromType<Box<I>> for TypeTraitSlot {
    fn from_type() -> Self {
        Self {
            interface: TypeId::of::<I>(),
            concrete: slot_concrete::<I>,
            encode: slot_encode::<I>,
            decode: slot_decode::<I>,
        }
    }
}

// -----------------------------------------------------------------------------
// VariantCast

trait ErasedVariant: Send + Sync {
    fn upcast(&self, value: Box<dyn Any>) -> Option<Box<dyn Any>>;

    fn encode(
        &self,
        value: &dyn Any,
        interface: &TypeTraitInterface,
        name: &str,
        cx: &PersistContext<'_>,
    ) -> Option<Result<Node, CodecError>>;

    fn decode(
        &self,
        node: &Node,
        interface: &TypeTraitInterface,
        cx: &PersistContext<'_>,
    ) -> Option<Result<Box<dyn Any>, CodecError>>;
}

struct Variant<I: ?Sized, T> {
    boxed: fn(T) -> Box<I>,
    borrowed: fn(&T) -> &I,
}

impl<I: Interface + ?Sized, T: TypePath> ErasedVariant for Variant<I, T> {
    fn upcast(&self, value: Box<dyn Any>) -> Option<Box<dyn Any>> {
        let value = value.downcast::<T>().ok()?;
        let boxed: Box<I> = (self.boxed)(*value);
        Some(super::box_value(boxed))
    }

    fn encode(
        &self,
        value: &dyn Any,
        interface: &TypeTraitInterface,
        name: &str,
        cx: &PersistContext<'_>,
    ) -> Option<Result<Node, CodecError>> {
        let provider = interface.provider::<I>()?;
        Some(
            super::downcast_value::<T>(value)
                .and_then(|value| provider.encode((self.borrowed)(value), name, cx)),
        )
    }

    fn decode(
        &self,
        node: &Node,
        interface: &TypeTraitInterface,
        cx: &PersistContext<'_>,
    ) -> Option<Result<Box<dyn Any>, CodecError>> {
        let provider = interface.provider::<I>()?;
        let decoded = provider.decode(node, cx).and_then(|boxed| {
            I::into_any(boxed)
                .downcast::<T>()
                .map(|value| super::box_value(*value))
                .map_err(|_| CodecError::mismatch(T::type_path(), I::type_path()))
        });
        Some(decoded)
    }
}

/// How a concrete type converts into one interface it implements.
#[derive(Clone)]
pub struct VariantCast {
    interface: TypeId,
    inner: Arc<dyn ErasedVariant>,
}

impl VariantCast {
    /// Describes `T` as an implementation of `I`.
    pub fn new<I: Interface + ?Sized, T: TypePath>(boxed: fn(T) -> Box<I>, borrowed: fn(&T) -> &I) -> Self {
        Self {
            interface: TypeId::of::<I>(),
            inner: Arc::new(Variant { boxed, borrowed }),
        }
    }

    #[inline]
    pub fn interface(&self) -> TypeId {
        self.interface
    }

    /// Turns an erased `T` into an erased `Box<I>`.
    #[inline]
    pub fn upcast(&self, value: Box<dyn Any>) -> Option<Box<dyn Any>> {
        self.inner.upcast(value)
    }

    /// Encodes an erased `T` with the provider of `I`.
    #[inline]
    pub fn encode(
        &self,
        value: &dyn Any,
        interface: &TypeTraitInterface,
        name: &str,
        cx: &PersistContext<'_>,
    ) -> Option<Result<Node, CodecError>> {
        self.inner.encode(value, interface, name, cx)
    }

    /// Decodes an erased `T` with the provider of `I`.
    #[inline]
    pub fn decode(
        &self,
        node: &Node,
        interface: &TypeTraitInterface,
        cx: &PersistContext<'_>,
    ) -> Option<Result<Box<dyn Any>, CodecError>> {
        self.inner.decode(node, interface, cx)
    }
}

// -----------------------------------------------------------------------------
// TypeTraitVariants

/// The interfaces a concrete type was registered under, in registration
/// order.
#[derive(Clone, Default)]
pub struct TypeTraitVariants {
    casts: Vec<VariantCast>,
}

impl TypeTraitVariants {
    /// Adds a cast, replacing the one for the same interface in place.
    pub fn insert(&mut self, cast: VariantCast) {
        match self.casts.iter_mut().find(|old| old.interface == cast.interface) {
            Some(old) => *old = cast,
            None => self.casts.push(cast),
        }
    }

    pub fn get(&self, interface: TypeId) -> Option<&VariantCast> {
        self.casts.iter().find(|cast| cast.interface == interface)
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &VariantCast> {
        self.casts.iter()
    }
}
