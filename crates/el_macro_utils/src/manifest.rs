use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item, Table};

const FACADE_NAME: &str = "elementize";
const MEMBER_PREFIX: &str = "el_";

/// The `Cargo.toml` of the crate currently being expanded.
///
/// Generated code must name other crates the way the *invoking* crate sees
/// them. A crate depending on `el_codec` writes `::el_codec`, a crate that
/// only depends on the `elementize` facade writes `::elementize::codec`.
///
/// ```rust
/// # use el_macro_utils::Manifest;
/// let path: syn::Path = Manifest::shared(|m| m.get_crate_path("el_codec"));
/// ```
///
/// # Resolution rules
///
/// 1. `name` listed in `[dependencies]`: `::name`.
/// 2. `name` starts with `el_` and `elementize` is listed: `::elementize::<rest>`.
/// 3. Rules 1 and 2 against `[dev-dependencies]`.
/// 4. Otherwise `::name`.
///
/// A crate referring to itself from doctests should declare
/// `extern crate self as <name>;` so that rule 4 also holds inside it.
#[derive(Debug)]
pub struct Manifest {
    document: Option<Document<Box<str>>>,
    modified: Option<SystemTime>,
}

impl Manifest {
    fn manifest_path() -> Option<PathBuf> {
        let mut path = PathBuf::from(env::var_os("CARGO_MANIFEST_DIR")?);
        path.push("Cargo.toml");
        Some(path)
    }

    fn load(path: &Path) -> Self {
        let modified = std::fs::metadata(path).and_then(|m| m.modified()).ok();
        let document = std::fs::read_to_string(path)
            .ok()
            .and_then(|text| Document::parse(text.into_boxed_str()).ok());
        Self { document, modified }
    }

    fn path_of(text: &str) -> Option<syn::Path> {
        syn::parse_str(text).ok()
    }

    fn find_in(table: &Table, name: &str) -> Option<syn::Path> {
        if table.contains_key(name) {
            return Self::path_of(&format!("::{name}"));
        }
        let module = name.strip_prefix(MEMBER_PREFIX)?;
        if table.contains_key(FACADE_NAME) {
            return Self::path_of(&format!("::{FACADE_NAME}::{module}"));
        }
        None
    }

    /// Returns the path under which `name` is reachable from the invoking
    /// crate, following the rules in the type documentation.
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        let found = self.document.as_ref().and_then(|document| {
            ["dependencies", "dev-dependencies"]
                .into_iter()
                .find_map(|section| match document.get(section) {
                    Some(Item::Table(table)) => Self::find_in(table, name),
                    _ => None,
                })
        });

        found
            .or_else(|| Self::path_of(&format!("::{name}")))
            .unwrap_or_else(|| panic!("`{name}` is not a valid crate name"))
    }

    /// Runs `func` with the manifest of the invoking crate.
    ///
    /// Parsed manifests are cached per path and refreshed when the file's
    /// modification time changes. Callers should still ask once per macro
    /// invocation and pass the resulting path around.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static CACHE: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let Some(path) = Self::manifest_path() else {
            return func(&Self {
                document: None,
                modified: None,
            });
        };

        let current = std::fs::metadata(&path).and_then(|m| m.modified()).ok();

        {
            let cache = CACHE.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(manifest) = cache.get(&path)
                && manifest.modified.is_some()
                && manifest.modified == current
            {
                return func(manifest);
            }
        }

        let manifest = Self::load(&path);
        let result = func(&manifest);

        CACHE
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path, manifest);

        result
    }
}
