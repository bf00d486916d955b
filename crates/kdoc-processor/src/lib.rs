//! kdoc-processor — extract structured documentation from annotated
//! classes at compile time.
//!
//! The host build system hands the processor a read-only view of its
//! symbol tree ([`declarations::SymbolSource`]) and an incremental
//! output channel ([`emit::ArtifactSink`]). For every class carrying
//! the marker annotation, the processor parses the documentation
//! comments of the class and its members ([`comment`]), decides via a
//! content fingerprint whether anything changed since the last pass
//! ([`fingerprint`]), and writes one pretty-printed JSON artifact per
//! class at `kdoc/<a/b/C>.json`, tagged with the source files it was
//! derived from ([`emit`]).
//!
//! The walk is resilient to the host invalidating declarations
//! mid-traversal: single field reads fail as typed [`declarations::Stale`]
//! outcomes and are substituted with defaults, and no per-declaration
//! failure aborts the batch.

pub mod comment;
pub mod declarations;
pub mod emit;
pub mod fingerprint;
pub mod fixture;
pub mod options;
pub mod walker;

pub use options::ProcessorOptions;
pub use walker::{Processor, Summary};
