use codegraph_core::parsing::javascript::JavaScriptParser;
use codegraph_core::parsing::LanguageParser;

fn parse(source: &str) -> codegraph_core::types::ParsedFile {
    let mut parser = JavaScriptParser::new();
    parser.parse(source, "src/widgets/widget.js").unwrap()
}

#[test]
fn module_path_drops_trailing_index() {
    let mut parser = JavaScriptParser::new();
    let file = parser.parse("export default {};\n", "src/widgets/index.js").unwrap();
    assert_eq!(file.module_path.as_deref(), Some("src/widgets"));
}

#[test]
fn exported_function_declaration_is_captured() {
    let file = parse("export function render() {}\n");
    assert_eq!(file.top_level_functions[0].name, "render");
}

#[test]
fn class_with_heritage_captures_superclass() {
    let file = parse("class Widget extends Base {\n    render() {}\n}\n");
    assert_eq!(file.classes[0].super_class.as_deref(), Some("Base"));
}

#[test]
fn require_without_declarator_has_no_bound_name() {
    let file = parse("doSetup(require('fs'));\n");
    assert_eq!(file.imports[0].path, "fs");
    assert!(file.imports[0].name.is_none());
}

#[test]
fn safe_call_via_optional_chaining_is_flagged() {
    let file = parse("function run() {\n    widget?.render();\n}\n");
    assert!(file.top_level_functions[0].calls[0].is_safe_call);
}
