use codegraph_core::parsing::kotlin::KotlinParser;
use codegraph_core::parsing::LanguageParser;
use codegraph_core::types::{ClassKind, Visibility};

fn parse(source: &str) -> codegraph_core::types::ParsedFile {
    let mut parser = KotlinParser::new();
    parser.parse(source, "src/Fixture.kt").unwrap()
}

#[test]
fn sealed_interface_is_flagged() {
    let file = parse("package com.acme\n\nsealed interface Shape\n");
    assert_eq!(file.classes[0].kind, ClassKind::Interface);
    assert!(file.classes[0].is_sealed);
}

#[test]
fn secondary_constructor_delegation_is_not_a_synthetic_call() {
    let file = parse(
        "package com.acme\n\nclass Widget(val id: Int) {\n    constructor() : this(0)\n}\n",
    );
    let class = &file.classes[0];
    assert_eq!(class.secondary_constructors.len(), 1);
    assert_eq!(class.secondary_constructors[0].delegation, codegraph_core::types::Delegation::This);
}

#[test]
fn private_function_visibility_detected() {
    let file = parse("package com.acme\n\nprivate fun helper() {}\n");
    assert_eq!(file.top_level_functions[0].visibility, Visibility::Private);
}

#[test]
fn nested_class_is_captured_under_parent() {
    let file = parse("package com.acme\n\nclass Outer {\n    class Inner {}\n}\n");
    assert_eq!(file.classes[0].nested_classes[0].name, "Inner");
}

#[test]
fn companion_object_is_distinguished_from_nested_class() {
    let file = parse(
        "package com.acme\n\nclass Widget {\n    companion object {\n        fun create() {}\n    }\n}\n",
    );
    assert!(file.classes[0].companion_object.is_some());
    assert!(file.classes[0].nested_classes.is_empty());
}
