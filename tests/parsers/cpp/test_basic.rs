use std::path::PathBuf;

use codegraph_extract::{ExtractConfig, Extractor, NodeKind};

fn extractor() -> Extractor {
    Extractor::new(ExtractConfig::default()).unwrap()
}

#[test]
fn class_specifier_and_top_level_function() {
    let extractor = extractor();
    let source = b"class Cart {\npublic:\n    int total();\n};\n\nint helper(int x) {\n    return x * 2;\n}\n";
    let result = extractor.extract(&PathBuf::from("cart.cpp"), source, None);

    assert!(result.nodes.iter().any(|n| n.kind == NodeKind::Class && n.name == "Cart"));
    assert!(result.nodes.iter().any(|n| n.kind == NodeKind::Function && n.name == "helper"));
}

#[test]
fn struct_specifier_is_emitted() {
    let extractor = extractor();
    let source = b"struct Point { int x; int y; };\n";
    let result = extractor.extract(&PathBuf::from("point.cpp"), source, None);
    assert!(result.nodes.iter().any(|n| n.kind == NodeKind::Struct && n.name == "Point"));
}
