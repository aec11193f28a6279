use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use proc_macro2::Span;
use toml_edit::{Document, Item, Table};

/// The caller's `Cargo.toml`, used to find how a workspace crate is
/// reachable from generated code.
///
/// ```rust
/// # use vc_macro_utils::Manifest;
/// let path: syn::Path = Manifest::shared(|m| m.get_crate_path("vc_bean"));
/// ```
///
/// # Resolution rules
///
/// 1. A crate listed in `dependencies` resolves to `::crate_name`.
/// 2. A `vc_*` crate resolves to `::dynbean::*` when the caller depends on
///    the facade crate `dynbean` (e.g. `vc_bean` becomes `::dynbean::bean`).
/// 3. Steps 1 and 2 are repeated for `dev-dependencies`.
/// 4. Everything else falls back to `::crate_name`.
///
/// A crate that expands its own macros should declare
/// `extern crate self as crate_name;` so the fallback resolves.
#[derive(Debug)]
pub struct Manifest {
    pub manifest: Option<Document<Box<str>>>,
    pub modified_time: Option<SystemTime>,
}

const FACADE_NAME: &str = "dynbean";
const WORKSPACE_PREFIX: &str = "vc_";

impl Manifest {
    fn manifest_path() -> Option<PathBuf> {
        let mut path = PathBuf::from(env::var_os("CARGO_MANIFEST_DIR")?);
        path.push("Cargo.toml");
        Some(path)
    }

    fn load(path: &PathBuf, modified_time: Option<SystemTime>) -> Self {
        let manifest = std::fs::read_to_string(path)
            .ok()
            .and_then(|text| Document::parse(text.into_boxed_str()).ok());
        Self {
            manifest,
            modified_time,
        }
    }

    fn absolute(segments: &[&str]) -> syn::Path {
        let mut path = syn::Path {
            leading_colon: Some(Default::default()),
            segments: Default::default(),
        };
        for segment in segments {
            path.segments
                .push(syn::Ident::new(segment, Span::call_site()).into());
        }
        path
    }

    fn find_in(deps: &Table, name: &str) -> Option<syn::Path> {
        if deps.contains_key(name) {
            return Some(Self::absolute(&[name]));
        }
        let module = name.strip_prefix(WORKSPACE_PREFIX)?;
        deps.contains_key(FACADE_NAME)
            .then(|| Self::absolute(&[FACADE_NAME, module]))
    }

    /// The path of the crate `name` as seen from the caller.
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        let Some(manifest) = &self.manifest else {
            return Self::absolute(&[name]);
        };
        for table in ["dependencies", "dev-dependencies"] {
            if let Some(Item::Table(deps)) = manifest.get(table)
                && let Some(path) = Self::find_in(deps, name)
            {
                return path;
            }
        }
        Self::absolute(&[name])
    }

    /// Runs `func` with the caller's manifest.
    ///
    /// Manifests are parsed once and cached per path until the file changes.
    /// An unreadable manifest behaves as one without dependencies.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static MANIFESTS: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let Some(path) = Self::manifest_path() else {
            return func(&Manifest {
                manifest: None,
                modified_time: None,
            });
        };
        let modified_time = std::fs::metadata(&path)
            .and_then(|metadata| metadata.modified())
            .ok();

        {
            let manifests = MANIFESTS.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(cached) = manifests.get(&path)
                && cached.modified_time.is_some()
                && cached.modified_time == modified_time
            {
                return func(cached);
            }
        }

        let manifest = Self::load(&path, modified_time);
        let result = func(&manifest);
        MANIFESTS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path, manifest);
        result
    }
}
