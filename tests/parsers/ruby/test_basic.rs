use std::path::PathBuf;

use codegraph_extract::{ExtractConfig, Extractor, NodeKind};

fn extractor() -> Extractor {
    Extractor::new(ExtractConfig::default()).unwrap()
}

#[test]
fn top_level_def_is_a_function_nested_def_is_a_method() {
    let extractor = extractor();
    let source = b"def greet(name)\n  puts name\nend\n\nclass Cart\n  def total\n    compute\n  end\nend\n";
    let result = extractor.extract(&PathBuf::from("cart.rb"), source, None);

    let greet = result.nodes.iter().find(|n| n.name == "greet").unwrap();
    assert_eq!(greet.kind, NodeKind::Function);

    let class = result.nodes.iter().find(|n| n.kind == NodeKind::Class && n.name == "Cart").unwrap();
    assert!(class.name == "Cart");

    let total = result.nodes.iter().find(|n| n.name == "total").unwrap();
    assert_eq!(total.kind, NodeKind::Method);
}
