use std::path::PathBuf;

use codegraph_extract::{ExtractConfig, Extractor, NodeKind};

fn extractor() -> Extractor {
    Extractor::new(ExtractConfig::default()).unwrap()
}

#[test]
fn function_definition_and_struct_and_enum() {
    let extractor = extractor();
    let source = b"struct Point { int x; int y; };\n\nenum Color { RED, GREEN, BLUE };\n\nint add(int a, int b) {\n    return a + b;\n}\n";
    let result = extractor.extract(&PathBuf::from("geometry.c"), source, None);

    assert!(result.nodes.iter().any(|n| n.kind == NodeKind::Struct && n.name == "Point"));
    assert!(result.nodes.iter().any(|n| n.kind == NodeKind::Enum && n.name == "Color"));
    assert!(result.nodes.iter().any(|n| n.kind == NodeKind::Function && n.name == "add"));
    // C has no visibility concept in this policy: never populated.
    let add = result.nodes.iter().find(|n| n.name == "add").unwrap();
    assert!(add.visibility.is_none());
}
