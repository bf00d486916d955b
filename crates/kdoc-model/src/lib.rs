//! Data model for extracted documentation — shared by the processor and
//! the runtime resolver so the artifact schema is defined exactly once.
//!
//! One JSON artifact per class, written to `kdoc/<a/b/C>.json`. Field
//! names are camelCase on the wire; decoding tolerates unknown and
//! missing fields so old readers survive schema additions.

use serde::{Deserialize, Serialize};

/// Comment shape of the legacy documentation API.
///
/// `inline_tags` is always emitted empty — inline markup is not
/// resolved — but stays in the schema for the legacy decoders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Comment {
    pub text: String,
    pub inline_tags: Vec<String>,
}

impl Comment {
    pub fn from_text(text: impl Into<String>) -> Self {
        Comment {
            text: text.into(),
            inline_tags: Vec::new(),
        }
    }
}

/// One `@param name description` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParamDoc {
    pub name: String,
    pub comment: String,
}

/// One `@throws ExceptionName description` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThrowsDoc {
    pub name: String,
    pub comment: String,
}

/// Catch-all entry for an unrecognized `@tag` line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TagDoc {
    pub tag: String,
    pub comment: String,
}

/// Structured result of parsing one raw documentation comment.
///
/// Not itself a wire type: its fields are flattened into [`ClassDoc`]
/// and [`MethodDoc`] during assembly. Entry order is order of
/// appearance in the source comment; duplicate `@param` names are kept
/// as separate entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocComment {
    pub text: String,
    pub params: Vec<ParamDoc>,
    pub returns: String,
    pub throws: Vec<ThrowsDoc>,
    pub see_also: Vec<String>,
    pub other: Vec<TagDoc>,
}

impl DocComment {
    /// True for the canonical empty value returned for null/blank input.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
            && self.params.is_empty()
            && self.returns.is_empty()
            && self.throws.is_empty()
            && self.see_also.is_empty()
            && self.other.is_empty()
    }
}

/// Documentation record for one method or constructor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MethodDoc {
    pub name: String,
    /// Simple (unqualified) parameter type names, declaration order.
    pub param_types: Vec<String>,
    pub comment: String,
    pub params: Vec<ParamDoc>,
    pub returns: String,
    pub throws: Vec<ThrowsDoc>,
    pub see_also: Vec<String>,
    pub other: Vec<TagDoc>,
    pub is_constructor: bool,
}

impl MethodDoc {
    /// Canonical empty record for a lookup that matched nothing: the
    /// queried name and parameter types, everything else empty.
    pub fn empty(name: impl Into<String>, param_types: Vec<String>) -> Self {
        MethodDoc {
            name: name.into(),
            param_types,
            ..Default::default()
        }
    }
}

/// Documentation record for one annotated class — the artifact root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassDoc {
    /// Fully-qualified name, e.g. `com.example.api.WidgetController`.
    pub name: String,
    pub comment: Comment,
    pub methods: Vec<MethodDoc>,
    /// At most one entry in practice — the primary constructor.
    pub constructors: Vec<MethodDoc>,
    pub see_also: Vec<String>,
    pub other: Vec<TagDoc>,
}

impl ClassDoc {
    /// Canonical empty record for a class with no emitted artifact:
    /// only the name is populated.
    pub fn empty(name: impl Into<String>) -> Self {
        ClassDoc {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Artifact resource path for a fully-qualified class name.
/// `a.b.C` → `kdoc/a/b/C.json`; a name without a package maps to
/// `kdoc/C.json`.
pub fn artifact_path(qualified_name: &str) -> String {
    format!("kdoc/{}.json", qualified_name.replace('.', "/"))
}
