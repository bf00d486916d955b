//! In-memory declaration tree for the test suites.
//!
//! Mirrors the shape a host compiler adapter provides, with per-field
//! staleness injection so the recovery paths are testable. The marker
//! is ignored: fixture classes are taken to be already annotated.

use crate::declarations::{
    ClassDecl, FieldResult, MethodDecl, ParamDecl, Stale, SymbolSource,
};
use std::collections::HashSet;
use std::path::PathBuf;

fn check(stale: &HashSet<String>, field: &str) -> FieldResult<()> {
    if stale.contains(field) {
        Err(Stale::new(field))
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct FixtureParam {
    pub resolved: Option<String>,
    pub declared_text: String,
    /// Accessor names that fail with [`Stale`].
    pub stale_fields: HashSet<String>,
}

impl FixtureParam {
    pub fn resolved(type_name: &str) -> Self {
        FixtureParam {
            resolved: Some(type_name.to_string()),
            ..Default::default()
        }
    }

    pub fn unresolved(declared_text: &str) -> Self {
        FixtureParam {
            resolved: None,
            declared_text: declared_text.to_string(),
            ..Default::default()
        }
    }

    pub fn with_stale_field(mut self, field: &str) -> Self {
        self.stale_fields.insert(field.to_string());
        self
    }
}

impl ParamDecl for FixtureParam {
    fn resolved_type_name(&self) -> FieldResult<Option<String>> {
        check(&self.stale_fields, "resolved_type_name")?;
        Ok(self.resolved.clone())
    }

    fn declared_type_text(&self) -> FieldResult<String> {
        check(&self.stale_fields, "declared_type_text")?;
        Ok(self.declared_text.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct FixtureMethod {
    pub name: String,
    pub doc: Option<String>,
    pub params: Vec<FixtureParam>,
    pub source_file: Option<PathBuf>,
    pub stale_fields: HashSet<String>,
}

impl FixtureMethod {
    pub fn new(name: &str) -> Self {
        FixtureMethod {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_doc(mut self, doc: &str) -> Self {
        self.doc = Some(doc.to_string());
        self
    }

    pub fn with_param(mut self, param: FixtureParam) -> Self {
        self.params.push(param);
        self
    }

    pub fn with_source_file(mut self, path: &str) -> Self {
        self.source_file = Some(PathBuf::from(path));
        self
    }

    pub fn with_stale_field(mut self, field: &str) -> Self {
        self.stale_fields.insert(field.to_string());
        self
    }
}

impl MethodDecl for FixtureMethod {
    fn name(&self) -> FieldResult<String> {
        check(&self.stale_fields, "name")?;
        Ok(self.name.clone())
    }

    fn doc_comment(&self) -> FieldResult<Option<String>> {
        check(&self.stale_fields, "doc_comment")?;
        Ok(self.doc.clone())
    }

    fn parameters(&self) -> FieldResult<Vec<Box<dyn ParamDecl>>> {
        check(&self.stale_fields, "parameters")?;
        Ok(self
            .params
            .iter()
            .cloned()
            .map(|p| Box::new(p) as Box<dyn ParamDecl>)
            .collect())
    }

    fn source_file(&self) -> FieldResult<Option<PathBuf>> {
        check(&self.stale_fields, "source_file")?;
        Ok(self.source_file.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct FixtureClass {
    pub qualified_name: String,
    pub doc: Option<String>,
    pub source_file: Option<PathBuf>,
    pub methods: Vec<FixtureMethod>,
    pub constructor: Option<FixtureMethod>,
    pub stale_fields: HashSet<String>,
}

impl FixtureClass {
    pub fn new(qualified_name: &str) -> Self {
        FixtureClass {
            qualified_name: qualified_name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_doc(mut self, doc: &str) -> Self {
        self.doc = Some(doc.to_string());
        self
    }

    pub fn with_source_file(mut self, path: &str) -> Self {
        self.source_file = Some(PathBuf::from(path));
        self
    }

    pub fn with_method(mut self, method: FixtureMethod) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_constructor(mut self, constructor: FixtureMethod) -> Self {
        self.constructor = Some(constructor);
        self
    }

    pub fn with_stale_field(mut self, field: &str) -> Self {
        self.stale_fields.insert(field.to_string());
        self
    }
}

impl ClassDecl for FixtureClass {
    fn qualified_name(&self) -> FieldResult<String> {
        check(&self.stale_fields, "qualified_name")?;
        Ok(self.qualified_name.clone())
    }

    fn package_name(&self) -> FieldResult<String> {
        check(&self.stale_fields, "package_name")?;
        Ok(self
            .qualified_name
            .rsplit_once('.')
            .map(|(package, _)| package.to_string())
            .unwrap_or_default())
    }

    fn doc_comment(&self) -> FieldResult<Option<String>> {
        check(&self.stale_fields, "doc_comment")?;
        Ok(self.doc.clone())
    }

    fn source_file(&self) -> FieldResult<Option<PathBuf>> {
        check(&self.stale_fields, "source_file")?;
        Ok(self.source_file.clone())
    }

    fn methods(&self) -> FieldResult<Vec<Box<dyn MethodDecl>>> {
        check(&self.stale_fields, "methods")?;
        Ok(self
            .methods
            .iter()
            .cloned()
            .map(|m| Box::new(m) as Box<dyn MethodDecl>)
            .collect())
    }

    fn primary_constructor(&self) -> FieldResult<Option<Box<dyn MethodDecl>>> {
        check(&self.stale_fields, "primary_constructor")?;
        Ok(self
            .constructor
            .clone()
            .map(|m| Box::new(m) as Box<dyn MethodDecl>))
    }
}

#[derive(Debug, Clone, Default)]
pub struct FixtureSource {
    pub classes: Vec<FixtureClass>,
}

impl FixtureSource {
    pub fn new(classes: Vec<FixtureClass>) -> Self {
        FixtureSource { classes }
    }
}

impl SymbolSource for FixtureSource {
    fn annotated_classes(&self, _marker: &str) -> anyhow::Result<Vec<Box<dyn ClassDecl>>> {
        Ok(self
            .classes
            .iter()
            .cloned()
            .map(|c| Box::new(c) as Box<dyn ClassDecl>)
            .collect())
    }
}
