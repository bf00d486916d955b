//! Read-only view of the host compiler's symbol tree.
//!
//! Incremental recompilation can invalidate the snapshot backing a
//! declaration while a walk is still reading it. Every field accessor
//! is therefore fallible: a stale read is a typed [`Stale`] outcome the
//! walker recovers from locally, never an ambient panic.

use std::path::PathBuf;
use thiserror::Error;

/// A field read hit a declaration whose backing compiler snapshot was
/// invalidated mid-walk.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("stale declaration snapshot while reading {0}")]
pub struct Stale(pub String);

impl Stale {
    pub fn new(field: impl Into<String>) -> Self {
        Stale(field.into())
    }
}

pub type FieldResult<T> = Result<T, Stale>;

/// One annotated top-level class declaration.
pub trait ClassDecl {
    fn qualified_name(&self) -> FieldResult<String>;
    fn package_name(&self) -> FieldResult<String>;
    /// Raw documentation comment text, `None` when undocumented.
    fn doc_comment(&self) -> FieldResult<Option<String>>;
    /// File the declaration lives in, when the host knows it.
    fn source_file(&self) -> FieldResult<Option<PathBuf>>;
    fn methods(&self) -> FieldResult<Vec<Box<dyn MethodDecl>>>;
    fn primary_constructor(&self) -> FieldResult<Option<Box<dyn MethodDecl>>>;
}

/// A declared method or constructor.
pub trait MethodDecl {
    fn name(&self) -> FieldResult<String>;
    fn doc_comment(&self) -> FieldResult<Option<String>>;
    fn parameters(&self) -> FieldResult<Vec<Box<dyn ParamDecl>>>;
    fn source_file(&self) -> FieldResult<Option<PathBuf>>;
}

/// One declared parameter.
pub trait ParamDecl {
    /// Simple type name from the host's resolver; `None` when the type
    /// does not resolve.
    fn resolved_type_name(&self) -> FieldResult<Option<String>>;
    /// Raw source text of the declared type, e.g.
    /// `java.util.List<Widget>?` — the textual fallback when
    /// resolution fails.
    fn declared_type_text(&self) -> FieldResult<String>;
}

/// The host's enumeration of annotated declarations. Failure here is
/// the one error that aborts the whole run.
pub trait SymbolSource {
    fn annotated_classes(&self, marker: &str) -> anyhow::Result<Vec<Box<dyn ClassDecl>>>;
}
