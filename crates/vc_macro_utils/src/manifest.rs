use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use proc_macro2::Span;
use toml_edit::{Document, Item, Table};

/// The umbrella crate that re-exports `vc_*` crates as `::vc_databind::*`.
const UMBRELLA_NAME: &str = "vc_databind";
/// Prefix stripped from `vc_*` crates when reached through the umbrella.
const CRATE_PREFIX: &str = "vc_";

/// The parsed `Cargo.toml` of the crate invoking a proc-macro.
///
/// Generated code must name `vc_bind` in a way that resolves from the
/// caller, which may depend on it directly or through `vc_databind`.
///
/// # Resolution rules
///
/// 1. `name` listed in `dependencies`: `::name`.
/// 2. `name` starts with `vc_` and the umbrella is listed: `::vc_databind::short`
///    (`vc_bind` becomes `::vc_databind::bind`).
/// 3. The same two checks against `dev-dependencies`.
/// 4. Otherwise `::name`. Crates naming themselves rely on
///    `extern crate self as name;` for this to resolve.
///
/// # Example
///
/// ```no_run
/// # use vc_macro_utils::Manifest;
/// let path: syn::Path = Manifest::shared(|m| m.crate_path("vc_bind"));
/// ```
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
        let modified = std::fs::metadata(path)
            .and_then(|meta| meta.modified())
            .ok();
        let document = std::fs::read_to_string(path)
            .ok()
            .and_then(|text| Document::parse(text.into_boxed_str()).ok());
        Self { document, modified }
    }

    fn parse_path(text: &str) -> Option<syn::Path> {
        syn::parse_str(text).ok()
    }

    fn absolute(name: &str) -> syn::Path {
        Self::parse_path(&format!("::{name}"))
            .unwrap_or_else(|| syn::Path::from(syn::Ident::new(name, Span::call_site())))
    }

    fn lookup(deps: &Table, name: &str) -> Option<syn::Path> {
        if deps.contains_key(name) {
            return Some(Self::absolute(name));
        }
        let short = name.strip_prefix(CRATE_PREFIX)?;
        if deps.contains_key(UMBRELLA_NAME) {
            return Self::parse_path(&format!("::{UMBRELLA_NAME}::{short}"));
        }
        None
    }

    /// Returns the path under which `name` is reachable from the caller.
    pub fn crate_path(&self, name: &str) -> syn::Path {
        let Some(document) = &self.document else {
            return Self::absolute(name);
        };
        ["dependencies", "dev-dependencies"]
            .into_iter()
            .filter_map(|section| match document.get(section) {
                Some(Item::Table(deps)) => Self::lookup(deps, name),
                _ => None,
            })
            .next()
            .unwrap_or_else(|| Self::absolute(name))
    }

    /// Runs `func` with the caller's manifest.
    ///
    /// Parsed manifests are cached per path and refreshed when the file's
    /// modification time changes, so calling this once per macro invocation
    /// is cheap after the first call.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static CACHE: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let Some(path) = Self::manifest_path() else {
            return func(&Self {
                document: None,
                modified: None,
            });
        };
        let modified = std::fs::metadata(&path)
            .and_then(|meta| meta.modified())
            .ok();

        let cache = CACHE.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(manifest) = cache.get(&path)
            && manifest.modified == modified
        {
            return func(manifest);
        }
        drop(cache);

        let manifest = Self::load(&path);
        let result = func(&manifest);
        CACHE
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path, manifest);
        result
    }
}
