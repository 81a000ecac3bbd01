use std::path::PathBuf;

use codegraph_extract::{ExtractConfig, Extractor, NodeKind, ReferenceKind, Visibility};

fn extractor() -> Extractor {
    Extractor::new(ExtractConfig::default()).unwrap()
}

#[test]
fn class_with_public_method_and_constructor() {
    let extractor = extractor();
    let source = b"public class Cart {\n    public Cart() {}\n    public int total() {\n        return compute();\n    }\n}\n";
    let result = extractor.extract(&PathBuf::from("Cart.java"), source, None);

    let class = result.nodes.iter().find(|n| n.kind == NodeKind::Class && n.name == "Cart").unwrap();
    assert_eq!(class.visibility, Some(Visibility::Public));

    // Java has no free functions: every callable must surface as `method`,
    // never `function`.
    assert!(result.nodes.iter().all(|n| n.kind != NodeKind::Function));
    assert!(result.nodes.iter().any(|n| n.kind == NodeKind::Method && n.name == "total"));
    assert!(result.nodes.iter().any(|n| n.kind == NodeKind::Method && n.name == "Cart"));

    assert!(result
        .unresolved_references
        .iter()
        .any(|r| r.kind == ReferenceKind::Calls && r.name == "compute"));
}

#[test]
fn interface_and_enum_declarations() {
    let extractor = extractor();
    let source = b"public interface Shippable {\n    int weight();\n}\n";
    let result = extractor.extract(&PathBuf::from("Shippable.java"), source, None);
    assert!(result.nodes.iter().any(|n| n.kind == NodeKind::Interface && n.name == "Shippable"));
}
