//! kdoc-runtime — resolve emitted documentation artifacts at serving
//! time.
//!
//! Artifacts live on the classpath at `kdoc/<a/b/C>.json`, exactly
//! where the processor emitted them. Lookups never fail: a missing or
//! undecodable artifact resolves to a canonical empty record, cached
//! like any other, so documentation stays a best-effort concern for
//! callers.

mod matching;

pub mod legacy;

pub use matching::MethodRef;

use dashmap::DashMap;
use kdoc_model::{artifact_path, ClassDoc, MethodDoc};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Source of artifact bytes, keyed by resource path — the classpath
/// abstraction of the serving process.
pub trait ArtifactLoader: Send + Sync {
    /// Bytes at `path` (e.g. `kdoc/a/b/C.json`), `None` when the
    /// resource does not exist.
    fn load(&self, path: &str) -> Option<Vec<u8>>;
}

/// Loader reading resources relative to a root directory.
pub struct DirLoader {
    root: PathBuf,
}

impl DirLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirLoader { root: root.into() }
    }
}

impl ArtifactLoader for DirLoader {
    fn load(&self, path: &str) -> Option<Vec<u8>> {
        std::fs::read(self.root.join(path)).ok()
    }
}

/// In-memory registry of resolved class documentation.
///
/// Shared freely across threads; concurrent population of the same
/// class is harmless since lookups are pure functions of the artifact
/// content.
pub struct DocRegistry {
    loader: Box<dyn ArtifactLoader>,
    cache: DashMap<String, Arc<ClassDoc>>,
}

impl DocRegistry {
    pub fn new(loader: impl ArtifactLoader + 'static) -> Self {
        DocRegistry {
            loader: Box::new(loader),
            cache: DashMap::new(),
        }
    }

    /// Documentation for a fully-qualified class name. Never fails:
    /// unknown classes resolve to the canonical empty record.
    pub fn class_doc(&self, qualified_name: &str) -> Arc<ClassDoc> {
        if let Some(found) = self.cache.get(qualified_name) {
            return Arc::clone(&found);
        }
        let doc = Arc::new(self.load_class(qualified_name));
        self.cache
            .insert(qualified_name.to_string(), Arc::clone(&doc));
        doc
    }

    fn load_class(&self, qualified_name: &str) -> ClassDoc {
        let path = artifact_path(qualified_name);
        match self.loader.load(&path) {
            Some(bytes) => match serde_json::from_slice(&bytes) {
                Ok(doc) => doc,
                Err(err) => {
                    debug!(class = %qualified_name, error = %err, "undecodable documentation artifact");
                    ClassDoc::empty(qualified_name)
                }
            },
            None => {
                debug!(class = %qualified_name, "no documentation artifact");
                ClassDoc::empty(qualified_name)
            }
        }
    }

    /// Documentation for one method, matched by name and parameter
    /// types. No match yields the canonical empty record carrying the
    /// queried name and parameter types.
    pub fn method_doc(&self, method: &MethodRef) -> MethodDoc {
        let class = self.class_doc(&method.class);
        matching::find_method(&class, method)
    }
}
