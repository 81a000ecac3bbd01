//! The literal end-to-end scenarios: fixed inputs, fixed expected shape.

use std::path::PathBuf;

use codegraph_extract::{EdgeKind, Extractor, ExtractConfig, NodeKind, ReferenceKind};

fn extractor() -> Extractor {
    Extractor::new(ExtractConfig::default()).expect("extractor should build")
}

#[test]
fn typescript_export_function() {
    let extractor = extractor();
    let source = b"export function processPayment(amount: number): Promise<Receipt> { return stripe.charge(amount); }";
    let result = extractor.extract(&PathBuf::from("payment.ts"), source, None);

    let function = result
        .nodes
        .iter()
        .find(|n| n.kind == NodeKind::Function && n.name == "processPayment")
        .expect("processPayment node emitted");
    assert_eq!(function.is_exported, Some(true));
    assert!(function.signature.as_deref().unwrap_or("").contains("amount: number"));

    assert!(result
        .unresolved_references
        .iter()
        .any(|r| r.kind == ReferenceKind::Calls && r.name == "charge"));
}

#[test]
fn rust_trait_declaration() {
    let extractor = extractor();
    let source = b"pub trait Repository { fn find(&self, id: &str) -> Option<Entity>; fn save(&mut self, entity: Entity) -> Result<(), Error>; }";
    let result = extractor.extract(&PathBuf::from("traits.rs"), source, None);

    assert!(result
        .nodes
        .iter()
        .any(|n| n.kind == NodeKind::Trait && n.name == "Repository"));
}

#[test]
fn swift_extension_with_where_clause() {
    let extractor = extractor();
    let source = b"extension Array where Element: Equatable { func containsDuplicates() -> Bool { return self.count != Set(self).count } }";
    let result = extractor.extract(&PathBuf::from("StringExtensions.swift"), source, None);

    let class_node = result
        .nodes
        .iter()
        .find(|n| n.kind == NodeKind::Class)
        .expect("class node emitted for the extension");
    assert_eq!(class_node.name, "Array where Element: Equatable");

    assert!(result
        .nodes
        .iter()
        .any(|n| n.kind == NodeKind::Method && n.name == "containsDuplicates"));
}

#[test]
fn kotlin_suspend_function() {
    let extractor = extractor();
    let source = b"suspend fun loadData(): List<String> { delay(1000); return listOf(\"a\",\"b\",\"c\") }";
    let result = extractor.extract(&PathBuf::from("loader.kt"), source, None);

    let function = result
        .nodes
        .iter()
        .find(|n| n.kind == NodeKind::Function && n.name == "loadData")
        .expect("loadData node emitted");
    assert_eq!(function.is_async, Some(true));

    let call_names: Vec<&str> = result
        .unresolved_references
        .iter()
        .filter(|r| r.kind == ReferenceKind::Calls)
        .map(|r| r.name.as_str())
        .collect();
    assert!(call_names.contains(&"delay"));
    assert!(call_names.contains(&"listOf"));
}

#[test]
fn kotlin_sealed_class_with_subclasses() {
    let extractor = extractor();
    let source = b"sealed class Result { data class Success(val value: String) : Result(); data class Error(val message: String) : Result(); object Loading : Result() }";
    let result = extractor.extract(&PathBuf::from("result.kt"), source, None);

    for expected in ["Result", "Success", "Error"] {
        assert!(
            result.nodes.iter().any(|n| n.kind == NodeKind::Class && n.name == expected),
            "expected a class node named {expected}"
        );
    }

    let extends: Vec<&str> = result
        .unresolved_references
        .iter()
        .filter(|r| r.kind == ReferenceKind::Extends)
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(extends.len(), 3, "Success, Error, and Loading each extend Result");
    assert!(extends.iter().all(|name| *name == "Result"));
}

#[test]
fn liquid_render_snippet() {
    let extractor = extractor();
    let source = b"{% render 'product-card' %}";
    let result = extractor.extract(&PathBuf::from("index.liquid"), source, None);

    let file_node = result.nodes.iter().find(|n| n.kind == NodeKind::File).expect("file node");
    let component = result
        .nodes
        .iter()
        .find(|n| n.kind == NodeKind::Component && n.name == "product-card")
        .expect("component node");

    assert!(result
        .edges
        .iter()
        .any(|e| e.kind == EdgeKind::Contains && e.source == file_node.id && e.target == component.id));

    let reference = result
        .unresolved_references
        .iter()
        .find(|r| r.kind == ReferenceKind::References)
        .expect("references entry emitted");
    assert_eq!(reference.name, "snippets/product-card.liquid");
}
