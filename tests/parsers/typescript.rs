use codegraph_core::parsing::typescript::TypeScriptParser;
use codegraph_core::parsing::LanguageParser;

fn parse(source: &str) -> codegraph_core::types::ParsedFile {
    let mut parser = TypeScriptParser::new();
    parser.parse(source, "src/billing/invoice.ts").unwrap()
}

#[test]
fn module_path_strips_extension_and_keeps_source_root() {
    let file = parse("export function total(): number { return 0; }\n");
    assert_eq!(file.module_path.as_deref(), Some("src/billing/invoice"));
}

#[test]
fn exported_class_is_captured() {
    let file = parse("export class Invoice {\n    total(): number { return 0; }\n}\n");
    assert_eq!(file.classes[0].name, "Invoice");
    assert_eq!(file.classes[0].functions[0].name, "total");
}

#[test]
fn type_only_reexport_is_flagged() {
    let file = parse("export type { Invoice } from './invoice-types';\n");
    assert!(file.reexports[0].is_type_only);
}

#[test]
fn namespace_reexport_carries_exported_name() {
    let file = parse("export * as utils from './utils';\n");
    assert!(file.reexports[0].is_namespace_reexport);
    assert_eq!(file.reexports[0].exported_name.as_deref(), Some("utils"));
}

#[test]
fn dynamic_import_is_flagged() {
    let file = parse("function load() {\n    import('./lazy');\n}\n");
    assert!(file.imports[0].is_dynamic);
    assert_eq!(file.imports[0].path, "./lazy");
}
