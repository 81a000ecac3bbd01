use std::path::PathBuf;

use codegraph_extract::{ExtractConfig, Extractor, NodeKind, Visibility};

fn extractor() -> Extractor {
    Extractor::new(ExtractConfig::default()).unwrap()
}

#[test]
fn class_method_defaults_to_public() {
    let extractor = extractor();
    let source = b"<?php\nclass Cart {\n    function total() {\n        return compute();\n    }\n}\n";
    let result = extractor.extract(&PathBuf::from("Cart.php"), source, None);

    let class = result.nodes.iter().find(|n| n.kind == NodeKind::Class && n.name == "Cart").unwrap();
    assert_eq!(class.visibility, Some(Visibility::Public));

    let method = result.nodes.iter().find(|n| n.name == "total").unwrap();
    assert_eq!(method.visibility, Some(Visibility::Public));
}

#[test]
fn explicit_private_modifier_overrides_default() {
    let extractor = extractor();
    let source = b"<?php\nclass Cart {\n    private function total() {\n        return 0;\n    }\n}\n";
    let result = extractor.extract(&PathBuf::from("Cart.php"), source, None);
    let method = result.nodes.iter().find(|n| n.name == "total").unwrap();
    assert_eq!(method.visibility, Some(Visibility::Private));
}

#[test]
fn top_level_function_declaration() {
    let extractor = extractor();
    let source = b"<?php\nfunction helper($x) {\n    return $x * 2;\n}\n";
    let result = extractor.extract(&PathBuf::from("helper.php"), source, None);
    assert!(result.nodes.iter().any(|n| n.kind == NodeKind::Function && n.name == "helper"));
}
