//! JavaScript parser, grounded on the teacher's
//! `parsing/javascript/parser.rs` node-kind literals (`function_declaration`,
//! `generator_function_declaration`, `class_declaration`,
//! `lexical_declaration`, `export_statement`, `export_clause`/
//! `export_specifier`, `import_statement`/`import_clause`/`import_specifier`,
//! `class_heritage`, `arrow_function`, `variable_declarator`).

use crate::ast_util::{
    extract_full_type_name, find_child_by_type, find_children_by_type, node_location, safe_node_text,
    traverse_node,
};
use crate::error::ParseError;
use crate::module_path::module_path_from_file;
use crate::parsing::LanguageParser;
use crate::types::{
    ClassKind, Language, ParsedCall, ParsedClass, ParsedFile, ParsedFunction, ParsedImport,
    ParsedParameter, ParsedProperty, ParsedReexport, Visibility,
};
use tree_sitter::{Node, Parser};

pub struct JavaScriptParser {
    parser: Parser,
}

impl JavaScriptParser {
    pub fn new() -> Self {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_javascript::LANGUAGE.into())
            .expect("javascript grammar should load");
        Self { parser }
    }
}

impl LanguageParser for JavaScriptParser {
    fn language(&self) -> Language {
        Language::JavaScript
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["js", "jsx", "mjs", "cjs"]
    }

    fn parse(&mut self, source: &str, file_path: &str) -> Result<ParsedFile, ParseError> {
        let tree = self.parser.parse(source, None).ok_or_else(|| ParseError::GrammarFailure {
            language: "JavaScript",
            path: file_path.to_string(),
        })?;
        let mut file = ParsedFile::new(file_path, Language::JavaScript);
        file.module_path = Some(module_path_from_file(file_path, &["src", "lib"]));
        walk_program(tree.root_node(), source, &mut file, true);
        backfill_file_path(&mut file, file_path);
        Ok(file)
    }
}

/// Shared traversal used by both the JS and TS parsers (TS calls this with
/// `include_commonjs=true` as well — the two grammars emit the same node
/// kinds for everything but type annotations).
pub(crate) fn walk_program(root: Node, source: &str, file: &mut ParsedFile, include_commonjs: bool) {
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        walk_top_level(child, source, file, include_commonjs);
    }
    extract_dynamic_imports(root, source, file);
    if include_commonjs {
        extract_commonjs_requires(root, source, file);
    }
}

fn walk_top_level(node: Node, source: &str, file: &mut ParsedFile, include_commonjs: bool) {
    match node.kind() {
        "import_statement" => file.imports.extend(parse_import_statement(node, source)),
        "export_statement" => {
            if let Some(reexports) = parse_reexport(node, source) {
                file.reexports.extend(reexports);
            } else if let Some(decl) = find_child_by_type(node, "function_declaration")
                .or_else(|| find_child_by_type(node, "generator_function_declaration"))
            {
                file.top_level_functions.push(parse_function(decl, source));
            } else if let Some(decl) = find_child_by_type(node, "class_declaration") {
                file.classes.push(parse_class(decl, source));
            } else if let Some(decl) = find_child_by_type(node, "lexical_declaration") {
                let (properties, calls) = parse_lexical_declaration(decl, source);
                file.top_level_properties.extend(properties);
                file.module_level_calls.extend(calls);
            }
        }
        "function_declaration" | "generator_function_declaration" => {
            file.top_level_functions.push(parse_function(node, source))
        }
        "class_declaration" => file.classes.push(parse_class(node, source)),
        "lexical_declaration" | "variable_declaration" => {
            let (properties, calls) = parse_lexical_declaration(node, source);
            file.top_level_properties.extend(properties);
            file.module_level_calls.extend(calls);
        }
        "expression_statement" => file.module_level_calls.extend(extract_calls(node, source)),
        _ => {
            let _ = include_commonjs;
        }
    }
}

fn backfill_file_path(file: &mut ParsedFile, file_path: &str) {
    for class in &mut file.classes {
        backfill_class(class, file_path);
    }
    for function in &mut file.top_level_functions {
        backfill_function(function, file_path);
    }
    for property in &mut file.top_level_properties {
        property.location.file_path = file_path.to_string();
    }
    for call in &mut file.module_level_calls {
        call.location.file_path = file_path.to_string();
    }
}

fn backfill_class(class: &mut ParsedClass, file_path: &str) {
    class.location.file_path = file_path.to_string();
    for property in &mut class.properties {
        property.location.file_path = file_path.to_string();
    }
    for function in &mut class.functions {
        backfill_function(function, file_path);
    }
    for nested in &mut class.nested_classes {
        backfill_class(nested, file_path);
    }
}

fn backfill_function(function: &mut ParsedFunction, file_path: &str) {
    function.location.file_path = file_path.to_string();
    for call in &mut function.calls {
        call.location.file_path = file_path.to_string();
    }
}

fn parse_import_statement(node: Node, source: &str) -> Vec<ParsedImport> {
    let mut imports = Vec::new();
    let source_path = find_child_by_type(node, "string")
        .map(|n| strip_quotes(safe_node_text(n, source)))
        .unwrap_or_default();

    if source_path.is_empty() {
        return imports;
    }

    let Some(clause) = find_child_by_type(node, "import_clause") else {
        // `import "side-effect-module"`
        imports.push(ParsedImport::new(source_path));
        return imports;
    };

    let mut cursor = clause.walk();
    for part in clause.children(&mut cursor) {
        match part.kind() {
            "identifier" => {
                // default import
                let mut import = ParsedImport::new(source_path.clone());
                import.name = Some(safe_node_text(part, source).to_string());
                imports.push(import);
            }
            "namespace_import" => {
                let alias = find_child_by_type(part, "identifier")
                    .map(|n| safe_node_text(n, source).to_string());
                let mut import = ParsedImport {
                    is_wildcard: true,
                    ..ParsedImport::new(source_path.clone())
                };
                import.alias = alias;
                imports.push(import);
            }
            "named_imports" => {
                for spec in find_children_by_type(part, "import_specifier") {
                    imports.push(parse_import_specifier(spec, source, &source_path));
                }
            }
            _ => {}
        }
    }
    imports
}

fn parse_import_specifier(node: Node, source: &str, source_path: &str) -> ParsedImport {
    let mut cursor = node.walk();
    let identifiers: Vec<Node> = node.children(&mut cursor).filter(|c| c.kind() == "identifier").collect();
    let mut import = ParsedImport::new(source_path.to_string());
    if let Some(original) = identifiers.first() {
        import.name = Some(safe_node_text(*original, source).to_string());
    }
    if identifiers.len() > 1 {
        import.alias = Some(safe_node_text(identifiers[1], source).to_string());
    }
    import
}

fn parse_reexport(node: Node, source: &str) -> Option<Vec<ParsedReexport>> {
    let source_node = find_child_by_type(node, "string")?;
    let source_path = strip_quotes(safe_node_text(source_node, source));
    let text = safe_node_text(node, source);
    let is_type_only = text.trim_start_matches("export").trim_start().starts_with("type");

    if let Some(clause) = find_child_by_type(node, "export_clause") {
        let reexports = find_children_by_type(clause, "export_specifier")
            .into_iter()
            .map(|spec| {
                let mut cursor = spec.walk();
                let identifiers: Vec<Node> =
                    spec.children(&mut cursor).filter(|c| c.kind() == "identifier").collect();
                ParsedReexport {
                    source_path: source_path.clone(),
                    original_name: identifiers.first().map(|n| safe_node_text(*n, source).to_string()),
                    exported_name: identifiers.get(1).map(|n| safe_node_text(*n, source).to_string()),
                    is_wildcard: false,
                    is_namespace_reexport: false,
                    is_type_only,
                }
            })
            .collect();
        return Some(reexports);
    }

    if text.contains('*') {
        let namespace_alias = find_child_by_type(node, "namespace_export")
            .and_then(|ns| find_child_by_type(ns, "identifier"))
            .map(|n| safe_node_text(n, source).to_string());
        return Some(vec![ParsedReexport {
            source_path,
            original_name: None,
            exported_name: namespace_alias.clone(),
            is_wildcard: namespace_alias.is_none(),
            is_namespace_reexport: namespace_alias.is_some(),
            is_type_only,
        }]);
    }

    None
}

fn strip_quotes(s: &str) -> String {
    s.trim_matches(|c| c == '"' || c == '\'' || c == '`').to_string()
}

fn extract_dynamic_imports(root: Node, source: &str, file: &mut ParsedFile) {
    traverse_node(root, &mut |node| {
        if node.kind() == "call_expression" {
            if let Some(callee) = node.child(0) {
                if callee.kind() == "import" {
                    if let Some(args) = find_child_by_type(node, "arguments") {
                        if let Some(arg) = args.child(1) {
                            let (path, is_template) = match arg.kind() {
                                "string" => (strip_quotes(safe_node_text(arg, source)), false),
                                "template_string" => (safe_node_text(arg, source).to_string(), true),
                                _ => (safe_node_text(arg, source).to_string(), false),
                            };
                            file.imports.push(ParsedImport {
                                is_dynamic: true,
                                is_template_literal: is_template,
                                ..ParsedImport::new(path)
                            });
                        }
                    }
                }
            }
        }
        true
    });
}

fn extract_commonjs_requires(root: Node, source: &str, file: &mut ParsedFile) {
    traverse_node(root, &mut |node| {
        if node.kind() == "call_expression" {
            if let Some(callee) = find_child_by_type(node, "identifier") {
                if safe_node_text(callee, source) == "require" {
                    if let Some(args) = find_child_by_type(node, "arguments") {
                        if let Some(string_arg) = find_child_by_type(args, "string") {
                            let path = strip_quotes(safe_node_text(string_arg, source));
                            let name = node
                                .parent()
                                .filter(|p| p.kind() == "variable_declarator")
                                .and_then(|p| find_child_by_type(p, "identifier"))
                                .map(|n| safe_node_text(n, source).to_string());
                            file.imports.push(ParsedImport {
                                name,
                                ..ParsedImport::new(path)
                            });
                        }
                    }
                }
            }
        }
        true
    });
}

/// Also returns any calls inside each declarator's initializer (e.g. `new
/// X()` in `const x = new X()`), so module-scope construction shows up as a
/// call site the resolver can classify just like any other.
fn parse_lexical_declaration(node: Node, source: &str) -> (Vec<ParsedProperty>, Vec<ParsedCall>) {
    let is_val = safe_node_text(node, source).trim_start().starts_with("const");
    let mut properties = Vec::new();
    let mut calls = Vec::new();
    for decl in find_children_by_type(node, "variable_declarator") {
        let name = find_child_by_type(decl, "identifier")
            .map(|n| safe_node_text(n, source).to_string())
            .unwrap_or_default();
        let inferred_type = find_child_by_type(decl, "new_expression")
            .and_then(|new_expr| find_child_by_type(new_expr, "identifier"))
            .map(|n| safe_node_text(n, source).to_string());
        properties.push(ParsedProperty {
            name,
            r#type: inferred_type,
            visibility: Visibility::Public,
            is_val,
            initializer: None,
            annotations: Vec::new(),
            location: node_location(node),
        });
        calls.extend(extract_calls(decl, source));
    }
    (properties, calls)
}

fn parse_function(node: Node, source: &str) -> ParsedFunction {
    let name = find_child_by_type(node, "identifier")
        .map(|n| safe_node_text(n, source).to_string())
        .unwrap_or_default();
    let mut function = ParsedFunction::new(name, node_location(node));
    function.parameters = parse_parameters(node, source);
    if let Some(body) = find_child_by_type(node, "statement_block") {
        function.calls = extract_calls(body, source);
    }
    function
}

fn parse_parameters(node: Node, source: &str) -> Vec<ParsedParameter> {
    let Some(params) = find_child_by_type(node, "formal_parameters") else {
        return Vec::new();
    };
    let mut cursor = params.walk();
    params
        .children(&mut cursor)
        .filter(|c| matches!(c.kind(), "identifier" | "required_parameter" | "optional_parameter"))
        .map(|p| {
            let name = if p.kind() == "identifier" {
                safe_node_text(p, source).to_string()
            } else {
                find_child_by_type(p, "identifier")
                    .map(|n| safe_node_text(n, source).to_string())
                    .unwrap_or_default()
            };
            let r#type = find_child_by_type(p, "type_annotation")
                .map(|n| extract_full_type_name(n, source).trim_start_matches(':').trim().to_string());
            ParsedParameter {
                name,
                r#type,
                default_value: None,
                annotations: Vec::new(),
            }
        })
        .collect()
}

fn parse_class(node: Node, source: &str) -> ParsedClass {
    let name = find_child_by_type(node, "identifier")
        .map(|n| safe_node_text(n, source).to_string())
        .unwrap_or_default();
    let mut class = ParsedClass::new(name, ClassKind::Class, node_location(node));

    if let Some(heritage) = find_child_by_type(node, "class_heritage") {
        let text = safe_node_text(heritage, source);
        if let Some(extends_clause) = find_child_by_type(heritage, "extends_clause") {
            if let Some(ident) = find_child_by_type(extends_clause, "identifier") {
                class.super_class = Some(safe_node_text(ident, source).to_string());
            }
        }
        if text.contains("implements") {
            for ident in find_children_by_type(heritage, "identifier") {
                let text = safe_node_text(ident, source).to_string();
                if Some(&text) != class.super_class.as_ref() {
                    class.interfaces.push(text);
                }
            }
        }
    }

    if let Some(body) = find_child_by_type(node, "class_body") {
        let mut cursor = body.walk();
        for member in body.children(&mut cursor) {
            match member.kind() {
                "method_definition" => class.functions.push(parse_method(member, source)),
                "field_definition" | "public_field_definition" => {
                    if let Some(prop) = parse_field(member, source) {
                        class.properties.push(prop);
                    }
                }
                _ => {}
            }
        }
    }

    class
}

fn parse_method(node: Node, source: &str) -> ParsedFunction {
    let name = find_child_by_type(node, "property_identifier")
        .map(|n| safe_node_text(n, source).to_string())
        .unwrap_or_default();
    let mut function = ParsedFunction::new(name, node_location(node));
    function.visibility = determine_visibility(node, source);
    function.parameters = parse_parameters(node, source);
    if let Some(body) = find_child_by_type(node, "statement_block") {
        function.calls = extract_calls(body, source);
    }
    function
}

fn determine_visibility(node: Node, source: &str) -> Visibility {
    let text = safe_node_text(node, source);
    if text.starts_with("private") || text.contains(" private ") {
        Visibility::Private
    } else if text.starts_with("protected") || text.contains(" protected ") {
        Visibility::Protected
    } else {
        Visibility::Public
    }
}

fn parse_field(node: Node, source: &str) -> Option<ParsedProperty> {
    let name = find_child_by_type(node, "property_identifier")?;
    Some(ParsedProperty {
        name: safe_node_text(name, source).to_string(),
        r#type: find_child_by_type(node, "type_annotation")
            .map(|n| extract_full_type_name(n, source).trim_start_matches(':').trim().to_string()),
        visibility: determine_visibility(node, source),
        is_val: false,
        initializer: None,
        annotations: Vec::new(),
        location: node_location(node),
    })
}

fn literal_type_for_kind(kind: &str) -> Option<&'static str> {
    match kind {
        "number" => Some("number"),
        "string" => Some("string"),
        "true" | "false" => Some("boolean"),
        "null" | "undefined" => Some("null"),
        "arrow_function" | "function_expression" => Some("Function"),
        "array" | "object" => Some("Collection"),
        _ => None,
    }
}

fn argument_types(args_node: Node, source: &str) -> Vec<String> {
    let mut cursor = args_node.walk();
    args_node
        .children(&mut cursor)
        .filter(|c| !matches!(c.kind(), "," | "(" | ")"))
        .map(|arg| literal_type_for_kind(arg.kind()).map(str::to_string).unwrap_or_else(|| "Unknown".to_string()))
        .collect()
}

pub(crate) fn extract_calls(body: Node, source: &str) -> Vec<ParsedCall> {
    let mut calls = Vec::new();
    traverse_node(body, &mut |node| {
        match node.kind() {
            "call_expression" => {
                if let Some(call) = build_call(node, source) {
                    calls.push(call);
                }
            }
            "new_expression" => {
                if let Some(call) = build_new_expression(node, source) {
                    calls.push(call);
                }
            }
            _ => {}
        }
        true
    });
    calls
}

fn build_call(node: Node, source: &str) -> Option<ParsedCall> {
    let callee = node.child(0)?;
    if callee.kind() == "import" {
        return None;
    }
    let (receiver, name, is_safe_call) = match callee.kind() {
        "member_expression" => {
            let property = find_child_by_type(callee, "property_identifier")?;
            let object = callee.child(0).map(|n| safe_node_text(n, source).to_string());
            let is_safe = safe_node_text(callee, source).contains("?.");
            (object, safe_node_text(property, source).to_string(), is_safe)
        }
        "identifier" => (None, safe_node_text(callee, source).to_string(), false),
        _ => return None,
    };

    let args_node = find_child_by_type(node, "arguments")?;
    let argument_count = arg_list_len(args_node);
    let argument_types = Some(argument_types(args_node, source)).filter(|v| !v.is_empty());

    let mut call = ParsedCall::new(name, node_location(node));
    call.receiver = receiver;
    call.is_safe_call = is_safe_call;
    call.argument_count = argument_count;
    call.argument_types = argument_types;
    Some(call)
}

fn build_new_expression(node: Node, source: &str) -> Option<ParsedCall> {
    let callee = find_child_by_type(node, "identifier")?;
    let args_node = find_child_by_type(node, "arguments");
    let argument_count = args_node.map(arg_list_len).unwrap_or(0);
    let argument_types = args_node.map(|a| argument_types(a, source)).filter(|v| !v.is_empty());

    let mut call = ParsedCall::new(safe_node_text(callee, source).to_string(), node_location(node));
    call.is_constructor_call = true;
    call.argument_count = argument_count;
    call.argument_types = argument_types;
    Some(call)
}

fn arg_list_len(args_node: Node) -> u32 {
    let mut cursor = args_node.walk();
    args_node
        .children(&mut cursor)
        .filter(|c| !matches!(c.kind(), "," | "(" | ")"))
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> ParsedFile {
        let mut parser = JavaScriptParser::new();
        parser.parse(source, "src/widget.js").unwrap()
    }

    #[test]
    fn derives_module_path_from_file() {
        let file = parse("export function render() {}\n");
        assert_eq!(file.module_path.as_deref(), Some("src/widget"));
    }

    #[test]
    fn named_import_binds_local_name() {
        let file = parse("import { render } from './lib';\n");
        assert_eq!(file.imports[0].name.as_deref(), Some("render"));
        assert_eq!(file.imports[0].path, "./lib");
    }

    #[test]
    fn default_import_extracted() {
        let file = parse("import Widget from './widget';\n");
        assert_eq!(file.imports[0].name.as_deref(), Some("Widget"));
    }

    #[test]
    fn named_reexport_expands_per_specifier() {
        let file = parse("export { a, b as c } from './utils';\n");
        assert_eq!(file.reexports.len(), 2);
        assert_eq!(file.reexports[1].exported_name.as_deref(), Some("c"));
    }

    #[test]
    fn wildcard_reexport_sets_flag() {
        let file = parse("export * from './utils';\n");
        assert!(file.reexports[0].is_wildcard);
    }

    #[test]
    fn commonjs_require_bound_to_declarator_name() {
        let file = parse("const fs = require('fs');\n");
        assert_eq!(file.imports[0].path, "fs");
        assert_eq!(file.imports[0].name.as_deref(), Some("fs"));
    }

    #[test]
    fn call_expression_extracted_with_member_receiver() {
        let file = parse("function run() {\n    helper.doThing(1, 'x');\n}\n");
        let call = &file.top_level_functions[0].calls[0];
        assert_eq!(call.name, "doThing");
        assert_eq!(call.receiver.as_deref(), Some("helper"));
        assert_eq!(call.argument_count, 2);
    }

    #[test]
    fn new_expression_detected_as_constructor_call() {
        let file = parse("function run() {\n    new Widget();\n}\n");
        assert!(file.top_level_functions[0].calls[0].is_constructor_call);
    }
}
