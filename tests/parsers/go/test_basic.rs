use std::path::PathBuf;

use codegraph_extract::{EdgeKind, ExtractConfig, Extractor, NodeKind, ReferenceKind, Visibility};

fn extractor() -> Extractor {
    Extractor::new(ExtractConfig::default()).unwrap()
}

#[test]
fn exported_function_and_struct_with_method() {
    let extractor = extractor();
    let source = b"package shop\n\ntype Cart struct {\n\tItems []string\n}\n\nfunc (c *Cart) Total() int {\n\treturn len(c.Items)\n}\n\nfunc NewCart() *Cart {\n\treturn &Cart{}\n}\n";
    let result = extractor.extract(&PathBuf::from("cart.go"), source, None);

    let cart_struct = result.nodes.iter().find(|n| n.kind == NodeKind::Struct && n.name == "Cart").unwrap();
    assert_eq!(cart_struct.visibility, Some(Visibility::Public));

    // Go methods have a receiver and are always top-level: the walker must
    // still classify them as `method`, not `function`.
    let total = result.nodes.iter().find(|n| n.name == "Total").unwrap();
    assert_eq!(total.kind, NodeKind::Method);

    let new_cart = result.nodes.iter().find(|n| n.name == "NewCart").unwrap();
    assert_eq!(new_cart.kind, NodeKind::Function);
    assert_eq!(new_cart.visibility, Some(Visibility::Public));
}

#[test]
fn unexported_name_yields_private_visibility() {
    let extractor = extractor();
    let source = b"package shop\n\nfunc total(items []string) int {\n\treturn len(items)\n}\n";
    let result = extractor.extract(&PathBuf::from("helpers.go"), source, None);
    let function = result.nodes.iter().find(|n| n.name == "total").unwrap();
    assert_eq!(function.visibility, Some(Visibility::Private));
}

#[test]
fn import_declaration_emits_unresolved_reference() {
    let extractor = extractor();
    let source = b"package shop\n\nimport \"fmt\"\n\nfunc Greet() {\n\tfmt.Println(\"hi\")\n}\n";
    let result = extractor.extract(&PathBuf::from("greet.go"), source, None);
    assert!(result
        .unresolved_references
        .iter()
        .any(|r| r.kind == ReferenceKind::Imports && r.name == "fmt"));
    assert!(result.edges.iter().any(|e| e.kind == EdgeKind::Contains));
}
