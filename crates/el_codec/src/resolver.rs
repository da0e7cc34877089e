//! Mapping recorded type names back to registered types.
//!
//! The codec consults its resolver whenever a node carries a `Type`
//! attribute: list items, dictionary keys and values, polymorphic slots,
//! and values stamped by an inherited provider.

use core::any::TypeId;

use crate::registry::{TypeMeta, TypeRegistry};

// -----------------------------------------------------------------------------
// TypeResolver

/// Turns a recorded type name into a registered type.
///
/// Any `Fn(&str, &TypeRegistry) -> Option<TypeId>` is a resolver.
///
/// # Examples
///
/// ```
/// use core::any::TypeId;
/// use el_codec::registry::TypeRegistry;
/// use el_codec::resolver::TypeResolver;
///
/// // Documents written by an older release used `Text` for strings.
/// let legacy = |name: &str, registry: &TypeRegistry| match name {
///     "Text" => Some(TypeId::of::<String>()),
///     _ => registry.get_with_type_path(name).map(|meta| meta.type_id()),
/// };
///
/// let registry = TypeRegistry::new();
/// assert_eq!(legacy.resolve("Text", &registry), Some(TypeId::of::<String>()));
/// assert_eq!(legacy.resolve("i32", &registry), Some(TypeId::of::<i32>()));
/// ```
pub trait TypeResolver: Send + Sync + 'static {
    /// Returns the type recorded as `name`, or `None` if it is unknown.
    fn resolve(&self, name: &str, registry: &TypeRegistry) -> Option<TypeId>;
}

impl<F> TypeResolver for F
where
    F: Fn(&str, &TypeRegistry) -> Option<TypeId> + Send + Sync + 'static,
{
    #[inline]
    fn resolve(&self, name: &str, registry: &TypeRegistry) -> Option<TypeId> {
        self(name, registry)
    }
}

// -----------------------------------------------------------------------------
// DefaultTypeResolver

/// The resolver of [`ElementCodec::new`](crate::codec::ElementCodec::new).
///
/// 1. Exact full type path.
/// 2. If the name contains a namespace separator (`::` or `.`), the full
///    path compared case-insensitively, `.` standing for `::`.
/// 3. Otherwise the short type name, compared case-insensitively. When
///    several registered types share it, the first registered wins and a
///    warning is logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTypeResolver;

impl TypeResolver for DefaultTypeResolver {
    fn resolve(&self, name: &str, registry: &TypeRegistry) -> Option<TypeId> {
        let name = name.trim();
        if let Some(meta) = registry.get_with_type_path(name) {
            return Some(meta.type_id());
        }

        if name.contains("::") || name.contains('.') {
            let normalized = name.replace('.', "::");
            return registry
                .iter()
                .find(|meta| meta.type_path().eq_ignore_ascii_case(&normalized))
                .map(TypeMeta::type_id);
        }

        if let Some(meta) = registry.get_with_type_name(name) {
            return Some(meta.type_id());
        }

        let mut found = registry
            .iter()
            .filter(|meta| meta.type_name().eq_ignore_ascii_case(name));
        let first = found.next()?;
        if found.next().is_some() {
            log::warn!(
                "type name `{name}` matches several registered types, using `{}`",
                first.type_path()
            );
        }
        Some(first.type_id())
    }
}

// -----------------------------------------------------------------------------
// ExactTypeResolver

/// Accepts exact full type paths only.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactTypeResolver;

impl TypeResolver for ExactTypeResolver {
    #[inline]
    fn resolve(&self, name: &str, registry: &TypeRegistry) -> Option<TypeId> {
        registry.get_with_type_path(name).map(TypeMeta::type_id)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::any::TypeId;

    use super::{DefaultTypeResolver, ExactTypeResolver, TypeResolver};
    use crate::impl_type_path;
    use crate::registry::{TypeRegistry, TypeTraitDefault};

    #[derive(Default)]
    struct Hull;
    #[derive(Default)]
    struct OldHull;
    #[derive(Default)]
    struct Keel;

    impl_type_path!(Hull as "yard::parts::Hull");
    impl_type_path!(OldHull as "yard::legacy::Hull");
    impl_type_path!(Keel as "yard::parts::Keel");

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register_default::<Hull>();
        registry.register_default::<OldHull>();
        registry.register_default::<Keel>();
        registry
    }

    #[test]
    fn exact_path_first() {
        let registry = registry();
        let resolver = DefaultTypeResolver;
        assert_eq!(resolver.resolve("yard::legacy::Hull", &registry), Some(TypeId::of::<OldHull>()));
        assert_eq!(resolver.resolve("alloc::string::String", &registry), Some(TypeId::of::<String>()));
    }

    #[test]
    fn qualified_names_ignore_case_and_dots() {
        let registry = registry();
        let resolver = DefaultTypeResolver;
        assert_eq!(resolver.resolve("YARD::PARTS::KEEL", &registry), Some(TypeId::of::<Keel>()));
        assert_eq!(resolver.resolve("yard.parts.Keel", &registry), Some(TypeId::of::<Keel>()));
        assert_eq!(resolver.resolve("other::Keel", &registry), None);
    }

    #[test]
    fn short_names() {
        let registry = registry();
        let resolver = DefaultTypeResolver;
        assert_eq!(resolver.resolve("keel", &registry), Some(TypeId::of::<Keel>()));
        assert_eq!(resolver.resolve("I32", &registry), Some(TypeId::of::<i32>()));
        // Ambiguous: the first registration wins.
        assert_eq!(resolver.resolve("Hull", &registry), Some(TypeId::of::<Hull>()));
        assert_eq!(resolver.resolve("Rudder", &registry), None);
    }

    #[test]
    fn exact_resolver_is_strict() {
        let registry = registry();
        assert_eq!(ExactTypeResolver.resolve("Keel", &registry), None);
        assert_eq!(ExactTypeResolver.resolve("yard::parts::Keel", &registry), Some(TypeId::of::<Keel>()));
        assert!(registry.get_type_trait::<TypeTraitDefault>(TypeId::of::<Keel>()).is_some());
    }
}
