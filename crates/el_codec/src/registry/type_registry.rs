use alloc::string::String;
use alloc::boxed::Box;
use core::any::{Any, TypeId};

use el_utils::TypeIdMap;
use el_utils::hash::{FixedHashState, HashMap, HashSet};

use crate::Element;
use crate::codec::PersistContext;
use crate::error::CodecError;
use crate::interface::{Interface, InterfaceProvider};
use crate::node::Node;
use crate::path::TypePath;
use crate::registry::{BaseCast, FromType, GetTypeMeta, Provider, TypeMeta, TypeTrait};
use crate::registry::{TypeTraitBases, TypeTraitDefault, TypeTraitElement};
use crate::registry::{TypeTraitInterface, TypeTraitProvider, TypeTraitVariants, VariantCast};

// -----------------------------------------------------------------------------
// TypeRegistry

/// The table mapping types to their save and load strategies.
///
/// Each registered type owns a [`TypeMeta`]. The registry indexes them by
/// [`TypeId`], by full type path and by short type name, and keeps them in
/// registration order.
///
/// # Example
///
/// ```
/// use core::any::TypeId;
/// use el_codec::registry::{TypeRegistry, TypeTraitDefault};
///
/// let registry = TypeRegistry::new();
///
/// let meta = registry.get_with_type_name("String").unwrap();
/// assert_eq!(meta.type_path(), "alloc::string::String");
///
/// let empty = meta.get_trait::<TypeTraitDefault>().unwrap().default();
/// assert_eq!(empty.downcast_ref::<String>().map(String::as_str), Some(""));
/// assert!(registry.lookup_provider(TypeId::of::<i64>()).is_some());
/// ```
pub struct TypeRegistry {
    type_meta_table: TypeIdMap<TypeMeta>,
    type_path_to_id: HashMap<&'static str, TypeId>,
    type_name_to_id: HashMap<&'static str, TypeId>,
    ambiguous_names: HashSet<&'static str>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates a registry without any type.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            type_meta_table: TypeIdMap::new(),
            type_path_to_id: HashMap::with_hasher(FixedHashState),
            type_name_to_id: HashMap::with_hasher(FixedHashState),
            ambiguous_names: HashSet::with_hasher(FixedHashState),
        }
    }

    /// Creates a registry with the built-in providers.
    ///
    /// - `bool` `char`
    /// - `i8 - i128` `isize`
    /// - `u8 - u128` `usize`
    /// - `f32` `f64`
    /// - `String`
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<bool>();
        registry.register::<char>();
        registry.register::<u8>();
        registry.register::<u16>();
        registry.register::<u32>();
        registry.register::<u64>();
        registry.register::<u128>();
        registry.register::<usize>();
        registry.register::<i8>();
        registry.register::<i16>();
        registry.register::<i32>();
        registry.register::<i64>();
        registry.register::<i128>();
        registry.register::<isize>();
        registry.register::<f32>();
        registry.register::<f64>();
        registry.register::<String>();
        registry
    }

    // The type must not exist yet.
    fn add_new_type_indices(
        type_meta: &TypeMeta,
        type_path_to_id: &mut HashMap<&'static str, TypeId>,
        type_name_to_id: &mut HashMap<&'static str, TypeId>,
        ambiguous_names: &mut HashSet<&'static str>,
    ) {
        let type_name = type_meta.type_name();

        if !ambiguous_names.contains(type_name) {
            if type_name_to_id.contains_key(type_name) {
                type_name_to_id.remove(type_name);
                ambiguous_names.insert(type_name);
            } else {
                type_name_to_id.insert(type_name, type_meta.type_id());
            }
        }

        type_path_to_id.insert(type_meta.type_path(), type_meta.type_id());
    }

    // Returns the meta of `T`, creating an empty one first if absent.
    fn meta_entry<T: TypePath + ?Sized>(&mut self) -> &mut TypeMeta {
        self.type_meta_table.get_or_insert(TypeId::of::<T>(), || {
            let meta = TypeMeta::of::<T>();
            Self::add_new_type_indices(
                &meta,
                &mut self.type_path_to_id,
                &mut self.type_name_to_id,
                &mut self.ambiguous_names,
            );
            meta
        })
    }

    /// Inserts a meta, **overwriting** the type traits of an existing one.
    ///
    /// This does not register type dependencies, see [`register`](Self::register).
    pub fn insert_type_meta(&mut self, type_meta: TypeMeta) {
        if !self.type_meta_table.contains(&type_meta.type_id()) {
            Self::add_new_type_indices(
                &type_meta,
                &mut self.type_path_to_id,
                &mut self.type_name_to_id,
                &mut self.ambiguous_names,
            );
        }
        self.type_meta_table.insert(type_meta.type_id(), type_meta);
    }

    /// Registers `T` with the strategies of its [`GetTypeMeta`] implementation.
    ///
    /// When `T` is already present only the missing type traits are added,
    /// so a provider installed earlier keeps precedence. Type dependencies
    /// are registered whenever something was added.
    ///
    /// # Example
    ///
    /// ```
    /// use core::any::TypeId;
    /// use el_codec::registry::{TypeRegistry, TypeTraitList};
    ///
    /// let mut registry = TypeRegistry::empty();
    /// registry.register::<Vec<Option<u8>>>();
    ///
    /// assert!(registry.get_type_trait::<TypeTraitList>(TypeId::of::<Vec<Option<u8>>>()).is_some());
    /// assert!(registry.contains(TypeId::of::<Option<u8>>()));
    /// assert!(registry.contains(TypeId::of::<u8>()));
    /// ```
    pub fn register<T: GetTypeMeta>(&mut self) {
        let added = match self.type_meta_table.get_mut(&TypeId::of::<T>()) {
            Some(meta) => meta.absorb(T::get_type_meta()),
            None => {
                self.insert_type_meta(T::get_type_meta());
                true
            }
        };

        if added {
            log::trace!("registered `{}`", T::type_path());
            T::register_dependencies(self);
        }
    }

    /// Registers `T` through its [`Element`] implementation only.
    ///
    /// Meant for hand-written `Element` implementations that do not
    /// implement [`GetTypeMeta`].
    pub fn register_element<T: Element>(&mut self) {
        self.meta_entry::<T>()
            .insert_trait(<TypeTraitElement as FromType<T>>::from_type());
    }

    /// Installs `provider` for `T`, replacing any existing provider.
    ///
    /// A provider for a type that also implements [`Element`] is never
    /// consulted, self-describing types always save themselves.
    pub fn register_provider<T: TypePath, P: Provider<T>>(&mut self, provider: P) {
        log::trace!("provider for `{}`", T::type_path());
        self.meta_entry::<T>()
            .insert_trait(TypeTraitProvider::new::<T, P>(provider));
    }

    /// Registers the interface `I` and its slot type `Box<I>`.
    pub fn register_interface<I: Interface + ?Sized>(&mut self) {
        let meta = self.meta_entry::<I>();
        if !meta.has_trait::<TypeTraitInterface>() {
            meta.insert_trait(<TypeTraitInterface as FromType<I>>::from_type());
        }
        self.register::<Box<I>>();
    }

    /// Installs the provider of the interface `I`, replacing any existing one.
    pub fn register_interface_provider<I: Interface + ?Sized>(&mut self, provider: impl InterfaceProvider<I>) {
        self.register_interface::<I>();
        if let Some(interface) = self.meta_entry::<I>().get_trait_mut::<TypeTraitInterface>() {
            interface.set_provider(provider);
        }
    }

    /// Records `T` as an implementation of the interface `I`.
    ///
    /// Slots of type `Box<I>` accept `T` on load only after this call. The
    /// strategy of `T` itself is registered separately, unless it is meant
    /// to go through the provider of `I`.
    ///
    /// # Example
    ///
    /// ```
    /// use core::any::Any;
    /// use el_codec::impl_interface;
    /// use el_codec::registry::TypeRegistry;
    ///
    /// pub trait Shape: Any {}
    /// impl_interface!(Shape);
    ///
    /// impl Shape for u32 {}
    ///
    /// let mut registry = TypeRegistry::new();
    /// registry.register_variant::<dyn Shape, u32>(|v| Box::new(v), |v| v);
    /// ```
    pub fn register_variant<I: Interface + ?Sized, T: TypePath>(&mut self, boxed: fn(T) -> Box<I>, borrowed: fn(&T) -> &I) {
        self.register_interface::<I>();
        if let Some(variants) = self.meta_entry::<T>().get_trait_or_default::<TypeTraitVariants>() {
            variants.insert(VariantCast::new(boxed, borrowed));
        }
    }

    /// Records `B` as a base of `T`.
    ///
    /// `T` then falls back to the provider of `B` when it has no strategy
    /// of its own.
    pub fn register_base<T, B>(&mut self)
    where
        T: TypePath + Clone + Into<B> + From<B>,
        B: TypePath,
    {
        if let Some(bases) = self.meta_entry::<T>().get_trait_or_default::<TypeTraitBases>() {
            bases.insert(BaseCast::new::<T, B>());
        }
    }

    /// Registers the default constructor of `T`.
    pub fn register_default<T: TypePath + Default>(&mut self) {
        self.register_type_trait::<T, TypeTraitDefault>();
    }

    /// Inserts the type trait `D` for `T`, creating the meta of `T` if needed.
    ///
    /// ```
    /// use core::any::TypeId;
    /// use el_codec::registry::{TypeRegistry, TypeTraitDefault};
    ///
    /// let mut registry = TypeRegistry::empty();
    /// registry.register_type_trait::<Vec<u8>, TypeTraitDefault>();
    /// assert!(registry.get_type_trait::<TypeTraitDefault>(TypeId::of::<Vec<u8>>()).is_some());
    /// ```
    pub fn register_type_trait<T: TypePath + ?Sized, D: TypeTrait + FromType<T>>(&mut self) {
        self.meta_entry::<T>().insert_trait(D::from_type());
    }

    /// Registers every type marked `#[element(auto_register)]`.
    ///
    /// Repeated calls are cheap and insert nothing twice.
    ///
    /// ## Return Value
    ///
    /// `true` if automatic registration works on the current platform.
    /// Without the `auto_register` feature this does nothing and returns
    /// `false`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use core::any::TypeId;
    /// use el_codec::derive::Element;
    /// use el_codec::registry::TypeRegistry;
    ///
    /// #[derive(Element, Default)]
    /// #[element(auto_register)]
    /// struct Waypoint {
    ///     label: String,
    ///     depth: i32,
    /// }
    ///
    /// let mut registry = TypeRegistry::empty();
    /// assert!(registry.auto_register());
    /// assert!(registry.contains(TypeId::of::<Waypoint>()));
    /// assert!(registry.contains(TypeId::of::<i32>()));
    /// ```
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        crate::cfg::auto_register! {
            if {
                use crate::__macro_exports::auto_register;
                if self.contains(TypeId::of::<auto_register::__AvailFlag>()) {
                    return true;
                }
                auto_register::__register_types(self);
                self.contains(TypeId::of::<auto_register::__AvailFlag>())
            } else {
                false
            }
        }
    }

    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.type_meta_table.contains(&type_id)
    }

    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&TypeMeta> {
        self.type_meta_table.get(&type_id)
    }

    #[inline]
    pub fn get_mut(&mut self, type_id: TypeId) -> Option<&mut TypeMeta> {
        self.type_meta_table.get_mut(&type_id)
    }

    /// Returns the meta registered under the full type path.
    pub fn get_with_type_path(&self, type_path: &str) -> Option<&TypeMeta> {
        match self.type_path_to_id.get(type_path) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    /// Returns the meta registered under the short type name.
    ///
    /// Ambiguous names return `None`, see [`is_ambiguous`](Self::is_ambiguous).
    pub fn get_with_type_name(&self, type_name: &str) -> Option<&TypeMeta> {
        match self.type_name_to_id.get(type_name) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    /// Returns `true` if the short name is shared by several registered types.
    ///
    /// ```
    /// use el_codec::impl_type_path;
    /// use el_codec::registry::{TypeRegistry, TypeTraitDefault};
    ///
    /// #[derive(Default)]
    /// struct Anchor;
    /// #[derive(Default)]
    /// struct LegacyAnchor;
    /// impl_type_path!(Anchor as "marine::Anchor");
    /// impl_type_path!(LegacyAnchor as "legacy::Anchor");
    ///
    /// let mut registry = TypeRegistry::empty();
    /// registry.register_type_trait::<Anchor, TypeTraitDefault>();
    /// registry.register_type_trait::<LegacyAnchor, TypeTraitDefault>();
    /// assert!(registry.is_ambiguous("Anchor"));
    /// assert!(registry.get_with_type_name("Anchor").is_none());
    /// ```
    pub fn is_ambiguous(&self, type_name: &str) -> bool {
        self.ambiguous_names.contains(type_name)
    }

    pub fn get_type_trait<D: TypeTrait>(&self, type_id: TypeId) -> Option<&D> {
        match self.get(type_id) {
            Some(type_meta) => type_meta.get_trait::<D>(),
            None => None,
        }
    }

    pub fn get_type_trait_mut<D: TypeTrait>(&mut self, type_id: TypeId) -> Option<&mut D> {
        match self.get_mut(type_id) {
            Some(type_meta) => type_meta.get_trait_mut::<D>(),
            None => None,
        }
    }

    /// Creates a `T` through its registered [`TypeTraitDefault`].
    ///
    /// ```
    /// use el_codec::registry::TypeRegistry;
    ///
    /// let registry = TypeRegistry::new();
    /// assert_eq!(registry.create_default::<u8>(), Some(0));
    /// assert_eq!(registry.create_default::<Vec<u8>>(), None);
    /// ```
    pub fn create_default<T: Any>(&self) -> Option<T> {
        let default = self.get_type_trait::<TypeTraitDefault>(TypeId::of::<T>())?;
        default.default().downcast::<T>().ok().map(|value| *value)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.type_meta_table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.type_meta_table.is_empty()
    }

    /// Iterates the registered types in registration order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeMeta> {
        self.type_meta_table.values()
    }

    /// Iterates the registered types carrying the type trait `D`, in
    /// registration order.
    pub fn iter_with_trait<D: TypeTrait>(&self) -> impl Iterator<Item = (&TypeMeta, &D)> {
        self.type_meta_table
            .values()
            .filter_map(|item| item.get_trait::<D>().map(|t| (item, t)))
    }

    /// Finds the provider that handles the type `type_id`.
    ///
    /// `None` means no provider applies. See
    /// [`lookup_provider_of`](Self::lookup_provider_of) for the precedence.
    #[inline]
    pub fn lookup_provider(&self, type_id: TypeId) -> Option<ProviderMatch<'_>> {
        self.get(type_id).and_then(|meta| self.lookup_provider_of(meta))
    }

    /// Finds the provider that handles the type described by `meta`.
    ///
    /// A provider registered for the type itself comes first. Then the
    /// interfaces `meta` is a variant of, in the order the variant relations
    /// were registered. Then its bases, in their registration order.
    pub fn lookup_provider_of<'a>(&'a self, meta: &'a TypeMeta) -> Option<ProviderMatch<'a>> {
        match meta.get_trait::<TypeTraitProvider>() {
            Some(provider) => Some(ProviderMatch::Exact(provider)),
            None => self.lookup_inherited_provider(meta),
        }
    }

    fn lookup_inherited_provider<'a>(&'a self, meta: &'a TypeMeta) -> Option<ProviderMatch<'a>> {
        if let Some(variants) = meta.get_trait::<TypeTraitVariants>() {
            for variant in variants.iter() {
                let Some(interface) = self.get(variant.interface()) else {
                    continue;
                };
                if let Some(provider) = interface.get_trait::<TypeTraitInterface>()
                    && provider.has_provider()
                {
                    return Some(ProviderMatch::Interface {
                        interface,
                        provider,
                        variant,
                    });
                }
            }
        }

        if let Some(bases) = meta.get_trait::<TypeTraitBases>() {
            for cast in bases.iter() {
                let Some(base) = self.get(cast.base()) else {
                    continue;
                };
                if let Some(provider) = base.get_trait::<TypeTraitProvider>() {
                    return Some(ProviderMatch::Base {
                        base,
                        cast,
                        provider,
                    });
                }
            }
        }

        None
    }
}

impl Clone for TypeRegistry {
    fn clone(&self) -> Self {
        Self {
            type_meta_table: self.type_meta_table.clone(),
            type_path_to_id: self.type_path_to_id.clone(),
            type_name_to_id: self.type_name_to_id.clone(),
            ambiguous_names: self.ambiguous_names.clone(),
        }
    }
}

impl core::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.iter().map(TypeMeta::type_path))
            .finish()
    }
}

// -----------------------------------------------------------------------------
// ProviderMatch

/// A provider found by [`TypeRegistry::lookup_provider`].
#[derive(Clone, Copy)]
pub enum ProviderMatch<'a> {
    /// Registered for the type itself.
    Exact(&'a TypeTraitProvider),
    /// Registered for an interface the type is a variant of.
    Interface {
        interface: &'a TypeMeta,
        provider: &'a TypeTraitInterface,
        variant: &'a VariantCast,
    },
    /// Registered for a base of the type.
    Base {
        base: &'a TypeMeta,
        cast: &'a BaseCast,
        provider: &'a TypeTraitProvider,
    },
}

impl ProviderMatch<'_> {
    /// Returns `true` unless the provider was registered for the type itself.
    ///
    /// Nodes produced by an inherited provider are stamped with the
    /// concrete type.
    #[inline]
    pub fn is_inherited(&self) -> bool {
        !matches!(self, Self::Exact(_))
    }

    /// Encodes an erased value of the looked-up type.
    pub fn encode(&self, value: &dyn Any, name: &str, cx: &PersistContext<'_>) -> Result<Node, CodecError> {
        match *self {
            Self::Exact(provider) => provider.encode(value, name, cx),
            Self::Interface {
                interface,
                provider,
                variant,
            } => variant
                .encode(value, provider, name, cx)
                .unwrap_or_else(|| Err(CodecError::not_convertible(interface.type_path()))),
            Self::Base { base, cast, provider } => {
                let converted = cast
                    .to_base(value)
                    .ok_or_else(|| CodecError::mismatch(base.type_path(), "a value without this base"))?;
                provider.encode(&*converted, name, cx)
            }
        }
    }

    /// Decodes an erased value of the looked-up type.
    pub fn decode(&self, node: &Node, cx: &PersistContext<'_>) -> Result<Box<dyn Any>, CodecError> {
        match *self {
            Self::Exact(provider) => provider.decode(node, cx),
            Self::Interface {
                interface,
                provider,
                variant,
            } => variant
                .decode(node, provider, cx)
                .unwrap_or_else(|| Err(CodecError::not_convertible(interface.type_path()))),
            Self::Base { base, cast, provider } => {
                let decoded = provider.decode(node, cx)?;
                cast.from_base(decoded)
                    .ok_or_else(|| CodecError::mismatch(base.type_path(), "a value of another type"))
            }
        }
    }
}

// -----------------------------------------------------------------------------
// TypeRegistryArc

use alloc::sync::Arc;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A [`TypeRegistry`] shared between threads.
#[derive(Clone, Default)]
pub struct TypeRegistryArc {
    /// The wrapped [`TypeRegistry`].
    pub internal: Arc<RwLock<TypeRegistry>>,
}

impl TypeRegistryArc {
    /// Takes a read lock on the underlying [`TypeRegistry`].
    pub fn read(&self) -> RwLockReadGuard<'_, TypeRegistry> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying [`TypeRegistry`].
    pub fn write(&self) -> RwLockWriteGuard<'_, TypeRegistry> {
        self.internal
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<TypeRegistry> for TypeRegistryArc {
    #[inline]
    fn from(registry: TypeRegistry) -> Self {
        Self {
            internal: Arc::new(RwLock::new(registry)),
        }
    }
}

impl core::fmt::Debug for TypeRegistryArc {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.read().fmt(f)
    }
}

// -----------------------------------------------------------------------------
// Tests
