use std::path::PathBuf;

use codegraph_extract::{ExtractConfig, Extractor, NodeKind};

fn extractor() -> Extractor {
    Extractor::new(ExtractConfig::default()).unwrap()
}

#[test]
fn protocol_function_requirement_is_emitted_as_a_method() {
    let extractor = extractor();
    let source = b"protocol Repository {\n    associatedtype Entity\n    var count: Int { get }\n    func find(id: String) -> Entity\n}\n";
    let result = extractor.extract(&PathBuf::from("Repository.swift"), source, None);

    assert!(result.nodes.iter().any(|n| n.kind == NodeKind::Interface && n.name == "Repository"));
    assert!(result.nodes.iter().any(|n| n.kind == NodeKind::TypeAlias && n.name == "Entity"));
    assert!(result.nodes.iter().any(|n| n.kind == NodeKind::Property && n.name == "count"));

    let find = result.nodes.iter().find(|n| n.name == "find").expect("find requirement emitted");
    assert_eq!(find.kind, NodeKind::Method);
}
