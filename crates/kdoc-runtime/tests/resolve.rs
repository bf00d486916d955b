//! Emit with the processor, resolve with the runtime registry.

use kdoc_processor::emit::FsSink;
use kdoc_processor::fingerprint::DocCache;
use kdoc_processor::fixture::{FixtureClass, FixtureMethod, FixtureParam, FixtureSource};
use kdoc_processor::{Processor, ProcessorOptions};
use kdoc_runtime::{DirLoader, DocRegistry, MethodRef};
use tempfile::TempDir;

fn emit_sample(dir: &TempDir) {
    let source = FixtureSource::new(vec![FixtureClass::new("com.example.api.WidgetController")
        .with_doc("Widget endpoints.\n@see com.example.api.GadgetController")
        .with_method(
            FixtureMethod::new("fetch")
                .with_doc(
                    "Fetch a widget.\n@param id the widget id\n@return the widget\n@throws NotFound when missing",
                )
                .with_param(FixtureParam::resolved("String")),
        )
        .with_method(
            FixtureMethod::new("count")
                .with_doc("Count widgets.\n@param limit upper bound")
                .with_param(FixtureParam::resolved("int")),
        )]);

    let cache = DocCache::new();
    let processor = Processor::new("Controller", ProcessorOptions::default(), &cache);
    let mut sink = FsSink::new(dir.path());
    let summary = processor.process(&source, &mut sink).unwrap();
    assert_eq!(summary.processed, 1);
}

#[test]
fn emitted_artifact_resolves_at_runtime() {
    let dir = TempDir::new().unwrap();
    emit_sample(&dir);

    let registry = DocRegistry::new(DirLoader::new(dir.path()));
    let doc = registry.class_doc("com.example.api.WidgetController");
    assert_eq!(doc.comment.text, "Widget endpoints.");
    assert_eq!(doc.see_also, vec!["com.example.api.GadgetController"]);
    assert_eq!(doc.methods.len(), 2);
}

#[test]
fn reflective_method_lookup_matches_boxed_types() {
    let dir = TempDir::new().unwrap();
    emit_sample(&dir);

    let registry = DocRegistry::new(DirLoader::new(dir.path()));
    // reflection reports the boxed, qualified type
    let count = registry.method_doc(&MethodRef::new(
        "com.example.api.WidgetController",
        "count",
        &["java.lang.Integer"],
    ));
    assert_eq!(count.comment, "Count widgets.");
    assert_eq!(count.params[0].name, "limit");
}

#[test]
fn method_sections_survive_the_round_trip() {
    let dir = TempDir::new().unwrap();
    emit_sample(&dir);

    let registry = DocRegistry::new(DirLoader::new(dir.path()));
    let fetch = registry.method_doc(&MethodRef::new(
        "com.example.api.WidgetController",
        "fetch",
        &["String"],
    ));
    assert_eq!(fetch.comment, "Fetch a widget.");
    assert_eq!(fetch.params[0].comment, "the widget id");
    assert_eq!(fetch.returns, "the widget");
    assert_eq!(fetch.throws[0].name, "NotFound");
    assert_eq!(fetch.throws[0].comment, "when missing");
}

#[test]
fn class_without_artifact_resolves_to_empty() {
    let dir = TempDir::new().unwrap();

    let registry = DocRegistry::new(DirLoader::new(dir.path()));
    let doc = registry.class_doc("com.example.api.NeverEmitted");
    assert_eq!(doc.name, "com.example.api.NeverEmitted");
    assert!(doc.methods.is_empty());
    assert!(doc.comment.text.is_empty());
}

#[test]
fn legacy_shim_serves_emitted_comments() {
    let dir = TempDir::new().unwrap();
    emit_sample(&dir);

    let registry = DocRegistry::new(DirLoader::new(dir.path()));
    let comment = registry.comment_of("com.example.api.WidgetController");
    assert_eq!(comment.text, "Widget endpoints.");
    assert!(comment.inline_tags.is_empty());
}
