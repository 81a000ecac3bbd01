//! The per-language policy table driving the generic walker.
//!
//! A `PolicyRecord` is pure data plus a handful of small extractor
//! callbacks; it never touches the output vectors directly — that is the
//! walker's job. Swift and Kotlin are intentionally absent from this
//! table: their bespoke walkers own dispatch for every node type they
//! care about and never consult this table.

use tree_sitter::Node;

use crate::parsing::language::LanguageId;
use crate::types::Visibility;

/// How a node's signature string is assembled from its params/return
/// field text.
#[derive(Debug, Clone, Copy)]
pub enum SignatureStyle {
    /// `{params}{sep}{return}` — used by TS, Python, Rust, Go, Kotlin.
    /// If there is no return field text, the separator and return half
    /// are simply omitted.
    ParamsThenReturn(&'static str),
    /// `{return} {params}` — Java's "leading type" convention.
    ReturnThenParams,
    /// No return field in this grammar; signature is just the params text.
    ParamsOnly,
}

pub type VisibilityFn = fn(&Node, &str) -> Option<Visibility>;
pub type BoolFn = fn(&Node, &str) -> bool;

pub struct PolicyRecord {
    pub function_types: &'static [&'static str],
    pub class_types: &'static [&'static str],
    pub method_types: &'static [&'static str],
    pub interface_types: &'static [&'static str],
    pub struct_types: &'static [&'static str],
    pub enum_types: &'static [&'static str],
    pub import_types: &'static [&'static str],
    pub call_types: &'static [&'static str],

    pub name_field: &'static str,
    pub body_field: Option<&'static str>,
    pub params_field: Option<&'static str>,
    pub return_field: Option<&'static str>,
    pub signature_style: SignatureStyle,

    pub default_visibility: Option<Visibility>,
    pub visibility: Option<VisibilityFn>,
    pub exported: Option<BoolFn>,
    pub is_async: Option<BoolFn>,
    pub is_static: Option<BoolFn>,
}

/// True if any named child of `node` is a token whose exact text matches
/// `token`. Used for keyword-as-anonymous-token checks (`async`, `static`)
/// that several grammars expose as a bare child rather than a named field.
fn has_child_token(node: &Node, source: &str, token: &str) -> bool {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .any(|child| child.utf8_text(source.as_bytes()).unwrap_or("") == token)
}

/// True if any child (named or not) of kind `modifiers`/`modifier` bag
/// contains `token` as a substring of its text. Used for grammars that
/// group modifiers under one node (Java, C#, Kotlin-style `modifiers`).
fn modifiers_text_contains(node: &Node, source: &str, token: &str) -> bool {
    let mut cursor = node.walk();
    node.children(&mut cursor).any(|child| {
        matches!(child.kind(), "modifiers" | "modifier")
            && child
                .utf8_text(source.as_bytes())
                .unwrap_or("")
                .split_whitespace()
                .any(|w| w == token)
    })
}

fn ts_visibility(node: &Node, source: &str) -> Option<Visibility> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .find(|c| c.kind() == "accessibility_modifier")
        .and_then(|c| c.utf8_text(source.as_bytes()).ok())
        .and_then(|text| match text {
            "public" => Some(Visibility::Public),
            "private" => Some(Visibility::Private),
            "protected" => Some(Visibility::Protected),
            _ => None,
        })
}

fn ts_exported(node: &Node, _source: &str) -> bool {
    matches!(
        node.parent().map(|p| p.kind()),
        Some("export_statement")
    )
}

fn ts_is_async(node: &Node, source: &str) -> bool {
    has_child_token(node, source, "async")
}

fn ts_is_static(node: &Node, source: &str) -> bool {
    has_child_token(node, source, "static")
}

fn python_visibility(_node: &Node, name: &str) -> Option<Visibility> {
    if name.starts_with("__") && !name.ends_with("__") {
        Some(Visibility::Private)
    } else if name.starts_with('_') {
        Some(Visibility::Protected)
    } else {
        None
    }
}

fn rust_visibility(node: &Node, source: &str) -> Option<Visibility> {
    let mut cursor = node.walk();
    if node
        .children(&mut cursor)
        .any(|c| c.kind() == "visibility_modifier")
    {
        Some(Visibility::Public)
    } else {
        let _ = source;
        None
    }
}

fn rust_is_async(node: &Node, source: &str) -> bool {
    has_child_token(node, source, "async")
}

fn go_visibility(_node: &Node, name: &str) -> Option<Visibility> {
    match name.chars().next() {
        Some(c) if c.is_uppercase() => Some(Visibility::Public),
        Some(_) => Some(Visibility::Private),
        None => None,
    }
}

fn java_visibility(node: &Node, source: &str) -> Option<Visibility> {
    if modifiers_text_contains(node, source, "public") {
        Some(Visibility::Public)
    } else if modifiers_text_contains(node, source, "private") {
        Some(Visibility::Private)
    } else if modifiers_text_contains(node, source, "protected") {
        Some(Visibility::Protected)
    } else {
        None
    }
}

fn java_is_static(node: &Node, source: &str) -> bool {
    modifiers_text_contains(node, source, "static")
}

fn csharp_visibility(node: &Node, source: &str) -> Option<Visibility> {
    if modifiers_text_contains(node, source, "public") {
        Some(Visibility::Public)
    } else if modifiers_text_contains(node, source, "private") {
        Some(Visibility::Private)
    } else if modifiers_text_contains(node, source, "protected") {
        Some(Visibility::Protected)
    } else if modifiers_text_contains(node, source, "internal") {
        Some(Visibility::Internal)
    } else {
        None
    }
}

fn csharp_is_static(node: &Node, source: &str) -> bool {
    modifiers_text_contains(node, source, "static")
}

fn php_visibility(node: &Node, source: &str) -> Option<Visibility> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .find(|c| c.kind() == "visibility_modifier")
        .and_then(|c| c.utf8_text(source.as_bytes()).ok())
        .and_then(|text| match text {
            "public" => Some(Visibility::Public),
            "private" => Some(Visibility::Private),
            "protected" => Some(Visibility::Protected),
            _ => None,
        })
}

fn php_is_static(node: &Node, source: &str) -> bool {
    has_child_token(node, source, "static")
}

/// Look up the policy for a language tag. Returns `None` for Swift and
/// Kotlin (bespoke walkers own them), Liquid (pattern extractor, not a
/// CST walk), and `Unknown`.
pub fn policy_for(tag: LanguageId) -> Option<PolicyRecord> {
    match tag.policy_alias() {
        LanguageId::TypeScript | LanguageId::JavaScript => Some(PolicyRecord {
            function_types: &["function_declaration", "generator_function_declaration"],
            class_types: &["class_declaration"],
            method_types: &["method_definition", "public_field_definition", "field_definition"],
            interface_types: &["interface_declaration"],
            struct_types: &[],
            enum_types: &["enum_declaration"],
            import_types: &["import_statement"],
            call_types: &["call_expression"],
            name_field: "name",
            body_field: Some("body"),
            params_field: Some("parameters"),
            return_field: Some("return_type"),
            signature_style: SignatureStyle::ParamsThenReturn(": "),
            default_visibility: None,
            visibility: Some(ts_visibility),
            exported: Some(ts_exported),
            is_async: Some(ts_is_async),
            is_static: Some(ts_is_static),
        }),
        LanguageId::Python => Some(PolicyRecord {
            function_types: &["function_definition"],
            class_types: &["class_definition"],
            method_types: &["function_definition"],
            interface_types: &[],
            struct_types: &[],
            enum_types: &[],
            import_types: &["import_statement", "import_from_statement"],
            call_types: &["call"],
            name_field: "name",
            body_field: Some("body"),
            params_field: Some("parameters"),
            return_field: Some("return_type"),
            signature_style: SignatureStyle::ParamsThenReturn(" -> "),
            default_visibility: None,
            visibility: Some(python_visibility),
            exported: None,
            is_async: Some(rust_is_async), // Python also exposes `async` as a bare child token
            is_static: None,
        }),
        LanguageId::Go => Some(PolicyRecord {
            function_types: &["function_declaration"],
            class_types: &[],
            method_types: &["method_declaration"],
            interface_types: &["interface_type"],
            struct_types: &["struct_type"],
            enum_types: &[],
            import_types: &["import_declaration"],
            call_types: &["call_expression"],
            name_field: "name",
            body_field: Some("body"),
            params_field: Some("parameters"),
            return_field: Some("result"),
            signature_style: SignatureStyle::ParamsThenReturn(" "),
            default_visibility: None,
            visibility: Some(go_visibility),
            exported: None,
            is_async: None,
            is_static: None,
        }),
        LanguageId::Rust => Some(PolicyRecord {
            function_types: &["function_item"],
            class_types: &[],
            method_types: &["function_item"],
            interface_types: &["trait_item"],
            struct_types: &["struct_item"],
            enum_types: &["enum_item"],
            import_types: &["use_declaration"],
            call_types: &["call_expression"],
            name_field: "name",
            body_field: Some("body"),
            params_field: Some("parameters"),
            return_field: Some("return_type"),
            signature_style: SignatureStyle::ParamsThenReturn(" -> "),
            default_visibility: Some(Visibility::Private),
            visibility: Some(rust_visibility),
            exported: None,
            is_async: Some(rust_is_async),
            is_static: None,
        }),
        LanguageId::Java => Some(PolicyRecord {
            // Java has no free functions: function_types stays empty so the
            // generic "top-level function" branch never fires; all
            // callables go through method_types.
            function_types: &[],
            class_types: &["class_declaration"],
            method_types: &["method_declaration", "constructor_declaration"],
            interface_types: &["interface_declaration"],
            struct_types: &[],
            enum_types: &["enum_declaration"],
            import_types: &["import_declaration"],
            call_types: &["method_invocation"],
            name_field: "name",
            body_field: Some("body"),
            params_field: Some("parameters"),
            return_field: Some("type"),
            signature_style: SignatureStyle::ReturnThenParams,
            default_visibility: None,
            visibility: Some(java_visibility),
            exported: None,
            is_async: None,
            is_static: Some(java_is_static),
        }),
        LanguageId::C => Some(PolicyRecord {
            function_types: &["function_definition"],
            class_types: &[],
            method_types: &[],
            interface_types: &[],
            struct_types: &["struct_specifier"],
            enum_types: &["enum_specifier"],
            import_types: &["preproc_include"],
            call_types: &["call_expression"],
            name_field: "declarator",
            body_field: Some("body"),
            params_field: None,
            return_field: Some("type"),
            signature_style: SignatureStyle::ParamsOnly,
            default_visibility: None,
            visibility: None,
            exported: None,
            is_async: None,
            is_static: None,
        }),
        LanguageId::Cpp => Some(PolicyRecord {
            function_types: &["function_definition"],
            class_types: &["class_specifier"],
            method_types: &["function_definition"],
            interface_types: &[],
            struct_types: &["struct_specifier"],
            enum_types: &["enum_specifier"],
            import_types: &["preproc_include"],
            call_types: &["call_expression"],
            name_field: "declarator",
            body_field: Some("body"),
            params_field: None,
            return_field: Some("type"),
            signature_style: SignatureStyle::ParamsOnly,
            // C++ member visibility is shallow; the walker never tracks
            // `access_specifier` state, so it stays undefined (absent)
            // regardless of what the parent carries.
            default_visibility: None,
            visibility: None,
            exported: None,
            is_async: None,
            is_static: None,
        }),
        LanguageId::CSharp => Some(PolicyRecord {
            function_types: &[],
            class_types: &["class_declaration"],
            method_types: &["method_declaration", "constructor_declaration"],
            interface_types: &["interface_declaration"],
            struct_types: &["struct_declaration"],
            enum_types: &["enum_declaration"],
            import_types: &["using_directive"],
            call_types: &["invocation_expression"],
            name_field: "name",
            body_field: Some("body"),
            params_field: Some("parameters"),
            return_field: Some("returns"),
            signature_style: SignatureStyle::ReturnThenParams,
            default_visibility: Some(Visibility::Internal),
            visibility: Some(csharp_visibility),
            exported: None,
            is_async: None,
            is_static: Some(csharp_is_static),
        }),
        LanguageId::Php => Some(PolicyRecord {
            function_types: &["function_definition"],
            class_types: &["class_declaration"],
            method_types: &["method_declaration"],
            interface_types: &["interface_declaration"],
            struct_types: &[],
            enum_types: &["enum_declaration"],
            import_types: &["namespace_use_declaration"],
            call_types: &[
                "function_call_expression",
                "member_call_expression",
                "scoped_call_expression",
            ],
            name_field: "name",
            body_field: Some("body"),
            params_field: Some("parameters"),
            return_field: Some("return_type"),
            signature_style: SignatureStyle::ParamsThenReturn(": "),
            default_visibility: Some(Visibility::Public),
            visibility: Some(php_visibility),
            exported: None,
            is_async: None,
            is_static: Some(php_is_static),
        }),
        LanguageId::Ruby => Some(PolicyRecord {
            // Top-level `def` and nested `def` share the `method` node
            // type; the generic walker's stack-based dispatch tells them
            // apart without a separate function type.
            function_types: &["method"],
            class_types: &["class"],
            method_types: &["method", "singleton_method"],
            interface_types: &[],
            struct_types: &[],
            enum_types: &[],
            import_types: &[],
            call_types: &["call", "method_call"],
            name_field: "name",
            body_field: Some("body"),
            params_field: Some("parameters"),
            return_field: None,
            signature_style: SignatureStyle::ParamsOnly,
            default_visibility: None,
            visibility: None,
            exported: None,
            is_async: None,
            is_static: None,
        }),
        LanguageId::Swift | LanguageId::Kotlin | LanguageId::Liquid | LanguageId::Unknown => None,
        // `policy_alias` already collapses Tsx/Jsx above.
        LanguageId::Tsx | LanguageId::Jsx => unreachable!("policy_alias collapses these"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_grammar_backed_language_has_a_policy() {
        for &tag in LanguageId::ALL {
            let expect_policy = !matches!(
                tag,
                LanguageId::Swift | LanguageId::Kotlin | LanguageId::Liquid | LanguageId::Unknown
            );
            assert_eq!(
                policy_for(tag).is_some(),
                expect_policy,
                "tag: {tag:?}"
            );
        }
    }

    #[test]
    fn java_declares_no_free_functions() {
        let policy = policy_for(LanguageId::Java).unwrap();
        assert!(policy.function_types.is_empty());
        assert!(policy.method_types.contains(&"method_declaration"));
    }

    #[test]
    fn rust_shares_function_item_between_function_and_method_types() {
        let policy = policy_for(LanguageId::Rust).unwrap();
        assert_eq!(policy.function_types, policy.method_types);
        assert_eq!(policy.default_visibility, Some(Visibility::Private));
    }
}
