use std::path::PathBuf;

use codegraph_extract::{ExtractConfig, Extractor, NodeKind, Visibility};

fn extractor() -> Extractor {
    Extractor::new(ExtractConfig::default()).unwrap()
}

#[test]
fn public_class_with_method_and_default_internal_visibility() {
    let extractor = extractor();
    let source = b"public class Cart {\n    public int Total() {\n        return Compute();\n    }\n\n    int Compute() {\n        return 0;\n    }\n}\n";
    let result = extractor.extract(&PathBuf::from("Cart.cs"), source, None);

    let class = result.nodes.iter().find(|n| n.kind == NodeKind::Class && n.name == "Cart").unwrap();
    assert_eq!(class.visibility, Some(Visibility::Public));

    let total = result.nodes.iter().find(|n| n.name == "Total").unwrap();
    assert_eq!(total.visibility, Some(Visibility::Public));

    // No explicit modifier on `Compute` falls back to the C# default.
    let compute = result.nodes.iter().find(|n| n.name == "Compute").unwrap();
    assert_eq!(compute.visibility, Some(Visibility::Internal));
}

#[test]
fn interface_and_struct_declarations() {
    let extractor = extractor();
    let source = b"public interface IShippable {\n    int Weight();\n}\n\npublic struct Point {\n    public int X;\n}\n";
    let result = extractor.extract(&PathBuf::from("Shapes.cs"), source, None);
    assert!(result.nodes.iter().any(|n| n.kind == NodeKind::Interface && n.name == "IShippable"));
    assert!(result.nodes.iter().any(|n| n.kind == NodeKind::Struct && n.name == "Point"));
}
