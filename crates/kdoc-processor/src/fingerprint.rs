//! Content fingerprint cache — per-class change detection.
//!
//! The digest covers everything identity-relevant to one artifact in a
//! fixed order: qualified name, the class's own comment text, then per
//! method in declaration order its name, comma-joined parameter types
//! and comment text, then the primary constructor under the literal
//! `constructor` marker. Fields are NUL-delimited in the hashed stream
//! so adjacent fields cannot alias.
//!
//! The cache is memory-only and cold on every fresh build invocation;
//! that is safe because each artifact carries source-file dependency
//! edges in the host's incremental build graph, which re-triggers
//! processing when any originating file changes.

use crate::options::ProcessorOptions;
use dashmap::{DashMap, DashSet};
use sha2::{Digest, Sha256};

/// Incremental digest over the identity-relevant fields of one class.
#[derive(Default)]
pub struct Fingerprint {
    hasher: Sha256,
}

impl Fingerprint {
    pub fn new() -> Self {
        Fingerprint::default()
    }

    pub fn field(&mut self, text: &str) {
        self.hasher.update(text.as_bytes());
        self.hasher.update([0u8]);
    }

    /// Lowercase hex digest.
    pub fn finish(self) -> String {
        format!("{:x}", self.hasher.finalize())
    }
}

/// Skip-vs-regenerate bookkeeping for one build invocation, keyed by
/// fully-qualified class name. Safe under concurrent processing.
#[derive(Default)]
pub struct DocCache {
    digests: DashMap<String, String>,
    emitted: DashSet<String>,
}

impl DocCache {
    pub fn new() -> Self {
        DocCache::default()
    }

    /// Forget everything. Called at invocation start when an override
    /// flag is set; observability only, the decision below already
    /// honors the flags directly.
    pub fn clear(&self) {
        self.digests.clear();
        self.emitted.clear();
    }

    /// True when the class must be (re)generated this invocation.
    pub fn should_regenerate(
        &self,
        name: &str,
        digest: &str,
        options: &ProcessorOptions,
    ) -> bool {
        if options.cache_override() {
            return true;
        }
        match self.digests.get(name) {
            None => true,
            Some(previous) => previous.value().as_str() != digest || !self.emitted.contains(name),
        }
    }

    /// Store the digest and mark the class emitted. Called BEFORE
    /// emission is attempted: an emission failure must not cause a
    /// reprocessing loop within the invocation.
    pub fn record(&self, name: &str, digest: &str) {
        self.digests.insert(name.to_string(), digest.to_string());
        self.emitted.insert(name.to_string());
    }
}
