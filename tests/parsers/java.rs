use codegraph_core::parsing::java::JavaParser;
use codegraph_core::parsing::LanguageParser;
use codegraph_core::types::{ClassKind, Visibility};

fn parse(source: &str) -> codegraph_core::types::ParsedFile {
    let mut parser = JavaParser::new();
    parser.parse(source, "src/Fixture.java").unwrap()
}

#[test]
fn interface_declaration_maps_to_interface_kind() {
    let file = parse("package com.acme;\n\npublic interface Renderer {\n    void render();\n}\n");
    assert_eq!(file.classes[0].kind, ClassKind::Interface);
}

#[test]
fn enum_declaration_maps_to_enum_kind() {
    let file = parse("package com.acme;\n\npublic enum Color { RED, GREEN, BLUE }\n");
    assert_eq!(file.classes[0].kind, ClassKind::Enum);
}

#[test]
fn extends_and_implements_are_captured_separately() {
    let file = parse(
        "package com.acme;\n\npublic class Widget extends Base implements Drawable, Sized {}\n",
    );
    let class = &file.classes[0];
    assert_eq!(class.super_class.as_deref(), Some("Base"));
    assert_eq!(class.interfaces, vec!["Drawable".to_string(), "Sized".to_string()]);
}

#[test]
fn import_wildcard_is_flagged() {
    let file = parse("package com.acme;\n\nimport com.acme.util.*;\n");
    assert!(file.imports[0].is_wildcard);
}

#[test]
fn private_field_visibility_detected() {
    let file = parse("package com.acme;\n\nclass Widget {\n    private int count;\n}\n");
    assert_eq!(file.classes[0].properties[0].visibility, Visibility::Private);
}
