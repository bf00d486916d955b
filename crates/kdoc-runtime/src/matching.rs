//! Method matching — pair a reflective method handle with its record.
//!
//! Reflection reports parameter types in whatever form the runtime
//! has (boxed, sometimes qualified); the processor recorded the simple
//! declared names. Matching is therefore deliberately loose: a fixed
//! primitive/boxed synonym table plus a suffix rule that tolerates
//! partially-qualified names.

use kdoc_model::{ClassDoc, MethodDoc};

/// Reflective method handle analog: declaring class, method name, and
/// the parameter type names reflection reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodRef {
    pub class: String,
    pub name: String,
    pub param_types: Vec<String>,
}

impl MethodRef {
    pub fn new(class: &str, name: &str, param_types: &[&str]) -> Self {
        MethodRef {
            class: class.to_string(),
            name: name.to_string(),
            param_types: param_types.iter().map(|s| s.to_string()).collect(),
        }
    }
}

const BOXED_SYNONYMS: &[(&str, &str)] = &[
    ("int", "Integer"),
    ("long", "Long"),
    ("boolean", "Boolean"),
    ("double", "Double"),
    ("float", "Float"),
    ("short", "Short"),
    ("byte", "Byte"),
    ("char", "Character"),
];

fn boxed(name: &str) -> &str {
    BOXED_SYNONYMS
        .iter()
        .find(|(primitive, _)| *primitive == name)
        .map(|(_, boxed)| *boxed)
        .unwrap_or(name)
}

/// Two type names are equivalent when they agree after boxing
/// normalization, or when either is a suffix of the other.
fn type_names_equivalent(a: &str, b: &str) -> bool {
    let a = boxed(a);
    let b = boxed(b);
    a == b || a.ends_with(b) || b.ends_with(a)
}

fn params_match(recorded: &[String], queried: &[String]) -> bool {
    recorded.len() == queried.len()
        && recorded
            .iter()
            .zip(queried)
            .all(|(a, b)| type_names_equivalent(a, b))
}

/// First method record matching the handle; the canonical empty record
/// with the queried identity when nothing matches.
pub(crate) fn find_method(class: &ClassDoc, query: &MethodRef) -> MethodDoc {
    class
        .methods
        .iter()
        .find(|m| m.name == query.name && params_match(&m.param_types, &query.param_types))
        .cloned()
        .unwrap_or_else(|| MethodDoc::empty(&query.name, query.param_types.clone()))
}
