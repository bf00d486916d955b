//! Declaration walk — filter, snapshot, cache decision, assembly,
//! emission.
//!
//! Every field of a declaration is read exactly once into a raw
//! snapshot; the snapshot feeds both the fingerprint and, when the
//! cache decides to regenerate, the assembled record. A stale read of
//! a single field is substituted with a default, and no failure on one
//! declaration stops the walk over the rest.

use crate::comment;
use crate::declarations::{ClassDecl, FieldResult, MethodDecl, ParamDecl, SymbolSource};
use crate::emit::{self, ArtifactSink};
use crate::fingerprint::{DocCache, Fingerprint};
use crate::options::ProcessorOptions;
use anyhow::{Context, Result};
use kdoc_model::{ClassDoc, Comment, MethodDoc};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Totals for one processing round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Classes whose artifact was regenerated this round.
    pub processed: usize,
    /// Classes skipped because their fingerprint was unchanged.
    pub skipped: usize,
    /// Declarations dropped after an unrecoverable per-declaration
    /// failure.
    pub failed: usize,
}

enum Outcome {
    Emitted,
    Skipped,
    Filtered,
}

pub struct Processor<'c> {
    marker: String,
    options: ProcessorOptions,
    cache: &'c DocCache,
}

impl<'c> Processor<'c> {
    /// `cache` is owned by the orchestrating host for the duration of
    /// one build invocation. Either override flag wipes it up front.
    pub fn new(marker: impl Into<String>, options: ProcessorOptions, cache: &'c DocCache) -> Self {
        if options.debug {
            debug!(?options, "kdoc processor options");
        }
        if options.cache_override() {
            cache.clear();
        }
        Processor {
            marker: marker.into(),
            options,
            cache,
        }
    }

    /// Walk every declaration carrying the marker annotation. Only the
    /// enumeration itself can fail; everything below it degrades per
    /// declaration.
    pub fn process(
        &self,
        source: &dyn SymbolSource,
        sink: &mut dyn ArtifactSink,
    ) -> Result<Summary> {
        let classes = source
            .annotated_classes(&self.marker)
            .context("enumerating annotated declarations")?;

        let mut summary = Summary::default();
        for class in classes {
            match self.process_class(class.as_ref(), sink) {
                Ok(Outcome::Emitted) => summary.processed += 1,
                Ok(Outcome::Skipped) => summary.skipped += 1,
                Ok(Outcome::Filtered) => {}
                Err(err) => {
                    summary.failed += 1;
                    warn!("skipping declaration: {err:#}");
                }
            }
        }
        debug!(
            processed = summary.processed,
            skipped = summary.skipped,
            failed = summary.failed,
            "documentation round complete"
        );
        Ok(summary)
    }

    fn process_class(&self, class: &dyn ClassDecl, sink: &mut dyn ArtifactSink) -> Result<Outcome> {
        // The record and the cache are keyed on the qualified name; a
        // stale read here leaves nothing to key on, so this one
        // declaration is dropped whole.
        let name = class
            .qualified_name()
            .context("reading the declaration's qualified name")?;

        let package = field_or(class.package_name(), String::new(), &name, "package name");
        if !self.options.allows_package(&package) {
            return Ok(Outcome::Filtered);
        }

        let snapshot = snapshot(class, &name);
        let digest = snapshot.digest();
        if !self.cache.should_regenerate(&name, &digest, &self.options) {
            debug!(class = %name, "documentation unchanged, skipping regeneration");
            return Ok(Outcome::Skipped);
        }

        let doc = snapshot.assemble();
        // Bookkeeping happens before the write: an emission failure
        // must not cause a reprocessing loop within this invocation.
        self.cache.record(&name, &digest);
        emit::emit(&doc, &snapshot.dependencies(), sink);
        Ok(Outcome::Emitted)
    }
}

// -- Snapshots ----------------------------------------------------------------

struct MemberSnapshot {
    name: String,
    param_types: Vec<String>,
    doc: String,
    source_file: Option<PathBuf>,
}

struct ClassSnapshot {
    qualified_name: String,
    doc: String,
    source_file: Option<PathBuf>,
    methods: Vec<MemberSnapshot>,
    constructor: Option<MemberSnapshot>,
}

/// Read everything identity-relevant in one pass, substituting a safe
/// default for any single stale field read.
fn snapshot(class: &dyn ClassDecl, name: &str) -> ClassSnapshot {
    let doc = field_or(class.doc_comment(), None, name, "doc comment").unwrap_or_default();
    let source_file = field_or(class.source_file(), None, name, "source file");
    let methods = field_or(class.methods(), Vec::new(), name, "methods")
        .iter()
        .map(|m| member_snapshot(m.as_ref(), name))
        .collect();
    let constructor = field_or(class.primary_constructor(), None, name, "primary constructor")
        .map(|c| member_snapshot(c.as_ref(), name));

    ClassSnapshot {
        qualified_name: name.to_string(),
        doc,
        source_file,
        methods,
        constructor,
    }
}

fn member_snapshot(member: &dyn MethodDecl, class: &str) -> MemberSnapshot {
    let name = field_or(member.name(), String::new(), class, "member name");
    let doc = field_or(member.doc_comment(), None, class, "member doc comment").unwrap_or_default();
    let source_file = field_or(member.source_file(), None, class, "member source file");
    let param_types = field_or(member.parameters(), Vec::new(), class, "member parameters")
        .iter()
        .map(|p| param_type_name(p.as_ref(), class))
        .collect();

    MemberSnapshot {
        name,
        param_types,
        doc,
        source_file,
    }
}

impl ClassSnapshot {
    /// Stable field order: qualified name, own doc, each method's
    /// identity in declaration order, then the primary constructor
    /// under a literal `constructor` marker.
    fn digest(&self) -> String {
        let mut fp = Fingerprint::new();
        fp.field(&self.qualified_name);
        fp.field(&self.doc);
        for method in &self.methods {
            fp.field(&method.name);
            fp.field(&method.param_types.join(","));
            fp.field(&method.doc);
        }
        if let Some(ctor) = &self.constructor {
            fp.field("constructor");
            fp.field(&ctor.param_types.join(","));
            fp.field(&ctor.doc);
        }
        fp.finish()
    }

    fn assemble(&self) -> ClassDoc {
        let class_comment = comment::parse(Some(&self.doc));
        ClassDoc {
            name: self.qualified_name.clone(),
            comment: Comment::from_text(class_comment.text),
            methods: self.methods.iter().map(|m| m.assemble(false)).collect(),
            constructors: self.constructor.iter().map(|c| c.assemble(true)).collect(),
            see_also: class_comment.see_also,
            other: class_comment.other,
        }
    }

    /// The class's own file plus every member's file, deduplicated in
    /// order of first appearance.
    fn dependencies(&self) -> Vec<PathBuf> {
        let mut deps: Vec<PathBuf> = Vec::new();
        let members = self.methods.iter().chain(self.constructor.iter());
        for file in std::iter::once(&self.source_file)
            .chain(members.map(|m| &m.source_file))
            .flatten()
        {
            if !deps.contains(file) {
                deps.push(file.clone());
            }
        }
        deps
    }
}

impl MemberSnapshot {
    fn assemble(&self, is_constructor: bool) -> MethodDoc {
        let doc = comment::parse(Some(&self.doc));
        MethodDoc {
            name: self.name.clone(),
            param_types: self.param_types.clone(),
            comment: doc.text,
            params: doc.params,
            returns: doc.returns,
            throws: doc.throws,
            see_also: doc.see_also,
            other: doc.other,
            is_constructor,
        }
    }
}

// -- Field-level resilience ---------------------------------------------------

/// Substitute a default for a single stale field read, logging which
/// class and field were hit.
fn field_or<T>(read: FieldResult<T>, default: T, class: &str, field: &str) -> T {
    match read {
        Ok(value) => value,
        Err(err) => {
            warn!(class, field, error = %err, "stale declaration field, substituting default");
            default
        }
    }
}

/// Parameter type name resolution chain: the resolver's simple name,
/// else a best-effort strip of the declared-type source text, else the
/// literal `Unknown`.
fn param_type_name(param: &dyn ParamDecl, class: &str) -> String {
    if let Some(resolved) = field_or(param.resolved_type_name(), None, class, "resolved type name")
    {
        if !resolved.trim().is_empty() {
            return resolved;
        }
    }
    let declared = field_or(
        param.declared_type_text(),
        String::new(),
        class,
        "declared type text",
    );
    let stripped = strip_type_text(&declared);
    if stripped.is_empty() {
        "Unknown".to_string()
    } else {
        stripped
    }
}

/// Best-effort simple name from declared-type source text: cut the
/// generic-argument suffix, drop the trailing nullability marker,
/// strip the package qualification.
fn strip_type_text(text: &str) -> String {
    let text = text.split('<').next().unwrap_or(text);
    let text = text.trim().trim_end_matches('?');
    let text = text.rsplit('.').next().unwrap_or(text);
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{FixtureClass, FixtureMethod, FixtureParam, FixtureSource};
    use std::io;

    #[derive(Default)]
    struct MemSink {
        writes: Vec<(String, Vec<u8>, Vec<PathBuf>)>,
    }

    impl ArtifactSink for MemSink {
        fn write(
            &mut self,
            path: &str,
            contents: &[u8],
            dependencies: &[PathBuf],
        ) -> io::Result<()> {
            self.writes
                .push((path.to_string(), contents.to_vec(), dependencies.to_vec()));
            Ok(())
        }
    }

    fn decoded(sink: &MemSink, index: usize) -> ClassDoc {
        serde_json::from_slice(&sink.writes[index].1).unwrap()
    }

    fn widget_controller() -> FixtureClass {
        FixtureClass::new("com.example.api.WidgetController")
            .with_doc("Widget endpoints.\n@see com.example.api.GadgetController")
            .with_source_file("src/WidgetController.kt")
            .with_method(
                FixtureMethod::new("fetch")
                    .with_doc(
                        "Fetch a widget.\n@param id the widget id\n@return the widget\n@throws NotFound when missing",
                    )
                    .with_param(FixtureParam::resolved("String"))
                    .with_source_file("src/WidgetController.kt"),
            )
            .with_constructor(
                FixtureMethod::new("<init>")
                    .with_param(FixtureParam::resolved("WidgetService"))
                    .with_source_file("src/WidgetController.kt"),
            )
    }

    #[test]
    fn emits_artifact_for_annotated_class() {
        let source = FixtureSource::new(vec![widget_controller()]);
        let cache = DocCache::new();
        let processor = Processor::new("Controller", ProcessorOptions::default(), &cache);
        let mut sink = MemSink::default();

        let summary = processor.process(&source, &mut sink).unwrap();
        assert_eq!(summary.processed, 1);
        assert_eq!(summary.failed, 0);
        assert_eq!(sink.writes.len(), 1);
        assert_eq!(sink.writes[0].0, "kdoc/com/example/api/WidgetController.json");

        let doc = decoded(&sink, 0);
        assert_eq!(doc.name, "com.example.api.WidgetController");
        assert_eq!(doc.comment.text, "Widget endpoints.");
        assert_eq!(doc.see_also, vec!["com.example.api.GadgetController"]);

        let fetch = &doc.methods[0];
        assert_eq!(fetch.name, "fetch");
        assert_eq!(fetch.param_types, vec!["String"]);
        assert_eq!(fetch.comment, "Fetch a widget.");
        assert_eq!(fetch.params[0].name, "id");
        assert_eq!(fetch.returns, "the widget");
        assert_eq!(fetch.throws[0].name, "NotFound");
        assert!(!fetch.is_constructor);

        let ctor = &doc.constructors[0];
        assert!(ctor.is_constructor);
        assert_eq!(ctor.param_types, vec!["WidgetService"]);
    }

    #[test]
    fn package_filter_is_a_literal_prefix() {
        let source = FixtureSource::new(vec![
            widget_controller(),
            FixtureClass::new("org.other.StrayController"),
        ]);
        let cache = DocCache::new();
        let options = ProcessorOptions {
            packages: Some(vec!["com.example".to_string()]),
            ..Default::default()
        };
        let processor = Processor::new("Controller", options, &cache);
        let mut sink = MemSink::default();

        let summary = processor.process(&source, &mut sink).unwrap();
        assert_eq!(summary.processed, 1);
        assert_eq!(sink.writes.len(), 1);
    }

    #[test]
    fn second_round_skips_unchanged_class() {
        let source = FixtureSource::new(vec![widget_controller()]);
        let cache = DocCache::new();
        let processor = Processor::new("Controller", ProcessorOptions::default(), &cache);
        let mut sink = MemSink::default();

        let first = processor.process(&source, &mut sink).unwrap();
        let second = processor.process(&source, &mut sink).unwrap();
        assert_eq!(first.processed, 1);
        assert_eq!(second.processed, 0);
        assert_eq!(second.skipped, 1);
        assert_eq!(sink.writes.len(), 1);
    }

    #[test]
    fn changed_member_doc_regenerates() {
        let cache = DocCache::new();
        let processor = Processor::new("Controller", ProcessorOptions::default(), &cache);
        let mut sink = MemSink::default();

        let before = FixtureSource::new(vec![widget_controller()]);
        processor.process(&before, &mut sink).unwrap();

        let mut changed = widget_controller();
        changed.methods[0].doc = Some("Fetch a widget, quickly.".to_string());
        let after = FixtureSource::new(vec![changed]);
        let summary = processor.process(&after, &mut sink).unwrap();
        assert_eq!(summary.processed, 1);
        assert_eq!(summary.skipped, 0);
        assert_eq!(sink.writes.len(), 2);
    }

    #[test]
    fn disable_cache_regenerates_every_round() {
        let source = FixtureSource::new(vec![widget_controller()]);
        let cache = DocCache::new();
        let options = ProcessorOptions {
            disable_cache: true,
            ..Default::default()
        };
        let processor = Processor::new("Controller", options, &cache);
        let mut sink = MemSink::default();

        processor.process(&source, &mut sink).unwrap();
        let second = processor.process(&source, &mut sink).unwrap();
        assert_eq!(second.processed, 1);
        assert_eq!(second.skipped, 0);
        assert_eq!(sink.writes.len(), 2);
    }

    #[test]
    fn stale_doc_comment_substitutes_empty() {
        let class = widget_controller().with_stale_field("doc_comment");
        let source = FixtureSource::new(vec![class]);
        let cache = DocCache::new();
        let processor = Processor::new("Controller", ProcessorOptions::default(), &cache);
        let mut sink = MemSink::default();

        let summary = processor.process(&source, &mut sink).unwrap();
        assert_eq!(summary.processed, 1);
        assert_eq!(summary.failed, 0);
        let doc = decoded(&sink, 0);
        assert_eq!(doc.comment.text, "");
        // methods were still read and documented
        assert_eq!(doc.methods.len(), 1);
    }

    #[test]
    fn stale_qualified_name_drops_only_that_declaration() {
        let source = FixtureSource::new(vec![
            FixtureClass::new("com.example.Broken").with_stale_field("qualified_name"),
            widget_controller(),
        ]);
        let cache = DocCache::new();
        let processor = Processor::new("Controller", ProcessorOptions::default(), &cache);
        let mut sink = MemSink::default();

        let summary = processor.process(&source, &mut sink).unwrap();
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.processed, 1);
        assert_eq!(sink.writes.len(), 1);
    }

    #[test]
    fn stale_methods_list_substitutes_empty() {
        let class = widget_controller().with_stale_field("methods");
        let source = FixtureSource::new(vec![class]);
        let cache = DocCache::new();
        let processor = Processor::new("Controller", ProcessorOptions::default(), &cache);
        let mut sink = MemSink::default();

        let summary = processor.process(&source, &mut sink).unwrap();
        assert_eq!(summary.processed, 1);
        let doc = decoded(&sink, 0);
        assert!(doc.methods.is_empty());
        assert_eq!(doc.constructors.len(), 1);
    }

    #[test]
    fn unresolved_param_type_falls_back_to_declared_text() {
        let class = FixtureClass::new("com.example.Typed").with_method(
            FixtureMethod::new("handle")
                .with_param(FixtureParam::unresolved("java.util.List<com.example.Widget>"))
                .with_param(FixtureParam::unresolved("com.example.Gadget?"))
                .with_param(FixtureParam::unresolved("")),
        );
        let source = FixtureSource::new(vec![class]);
        let cache = DocCache::new();
        let processor = Processor::new("Controller", ProcessorOptions::default(), &cache);
        let mut sink = MemSink::default();

        processor.process(&source, &mut sink).unwrap();
        let doc = decoded(&sink, 0);
        assert_eq!(doc.methods[0].param_types, vec!["List", "Gadget", "Unknown"]);
    }

    #[test]
    fn stale_param_reads_fall_back_to_unknown() {
        let param = FixtureParam::resolved("String")
            .with_stale_field("resolved_type_name")
            .with_stale_field("declared_type_text");
        let class = FixtureClass::new("com.example.Stale")
            .with_method(FixtureMethod::new("handle").with_param(param));
        let source = FixtureSource::new(vec![class]);
        let cache = DocCache::new();
        let processor = Processor::new("Controller", ProcessorOptions::default(), &cache);
        let mut sink = MemSink::default();

        processor.process(&source, &mut sink).unwrap();
        let doc = decoded(&sink, 0);
        assert_eq!(doc.methods[0].param_types, vec!["Unknown"]);
    }

    #[test]
    fn dependencies_deduplicated_in_first_appearance_order() {
        let class = FixtureClass::new("com.example.Split")
            .with_source_file("src/Split.kt")
            .with_method(FixtureMethod::new("a").with_source_file("src/Split.kt"))
            .with_method(FixtureMethod::new("b").with_source_file("src/SplitExt.kt"));
        let source = FixtureSource::new(vec![class]);
        let cache = DocCache::new();
        let processor = Processor::new("Controller", ProcessorOptions::default(), &cache);
        let mut sink = MemSink::default();

        processor.process(&source, &mut sink).unwrap();
        assert_eq!(
            sink.writes[0].2,
            vec![PathBuf::from("src/Split.kt"), PathBuf::from("src/SplitExt.kt")]
        );
    }

    #[test]
    fn strip_type_text_fallback_chain() {
        assert_eq!(strip_type_text("java.util.List<com.example.W>"), "List");
        assert_eq!(strip_type_text("com.example.Gadget?"), "Gadget");
        assert_eq!(strip_type_text("String"), "String");
        assert_eq!(strip_type_text("Map<String, Int>"), "Map");
        assert_eq!(strip_type_text(""), "");
        assert_eq!(strip_type_text("  "), "");
    }
}
