//! Artifact emission through the build system's incremental-output
//! channel.
//!
//! One pretty-printed JSON document per class at `kdoc/<a/b/C>.json`,
//! declared as depending on every source file the record was derived
//! from — the edge that lets the host re-trigger processing when any
//! of them changes. Emission failures are logged and swallowed; they
//! never abort the batch.

use kdoc_model::{artifact_path, ClassDoc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

/// The host build system's incremental-output channel.
pub trait ArtifactSink {
    /// Write one artifact. `dependencies` are the source files whose
    /// change must invalidate this artifact in the host's incremental
    /// build graph.
    fn write(&mut self, path: &str, contents: &[u8], dependencies: &[PathBuf]) -> io::Result<()>;
}

/// Filesystem-backed sink writing under a generated-resources root.
/// Dependency edges have no filesystem rendition and are dropped.
pub struct FsSink {
    root: PathBuf,
}

impl FsSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsSink { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ArtifactSink for FsSink {
    fn write(&mut self, path: &str, contents: &[u8], _dependencies: &[PathBuf]) -> io::Result<()> {
        let full = self.root.join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full, contents)
    }
}

/// Serialize `doc` and write it through the sink. Failures are logged
/// with the class name and otherwise ignored.
pub fn emit(doc: &ClassDoc, dependencies: &[PathBuf], sink: &mut dyn ArtifactSink) {
    let path = artifact_path(&doc.name);
    let json = match serde_json::to_string_pretty(doc) {
        Ok(json) => json,
        Err(err) => {
            warn!(class = %doc.name, error = %err, "failed to serialize documentation record");
            return;
        }
    };
    if let Err(err) = sink.write(&path, json.as_bytes(), dependencies) {
        warn!(class = %doc.name, error = %err, "failed to write documentation artifact");
    }
}
