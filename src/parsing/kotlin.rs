//! Kotlin parser, grounded on the teacher's `parsing/kotlin/parser.rs` node
//! kind constants (`class_declaration`, `object_declaration`,
//! `function_declaration`, `property_declaration`, `secondary_constructor`,
//! `package_header`, `call_expression`, `simple_identifier`,
//! `primary_constructor`, `class_parameter`) and its visibility/extension-
//! function detection approach.

use crate::ast_util::{
    extract_full_type_name, find_child_by_type, find_children_by_type, node_location, safe_node_text,
    traverse_node,
};
use crate::error::ParseError;
use crate::parsing::LanguageParser;
use crate::types::{
    ClassKind, Delegation, Language, ParsedAnnotation, ParsedCall, ParsedClass, ParsedConstructor,
    ParsedFile, ParsedFunction, ParsedImport, ParsedParameter, ParsedProperty, ParsedTypeParameter,
    Variance, Visibility,
};
use tree_sitter::{Node, Parser};

pub struct KotlinParser {
    parser: Parser,
}

impl KotlinParser {
    pub fn new() -> Self {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_kotlin::language())
            .expect("kotlin grammar should load");
        Self { parser }
    }
}

impl LanguageParser for KotlinParser {
    fn language(&self) -> Language {
        Language::Kotlin
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["kt", "kts"]
    }

    fn parse(&mut self, source: &str, file_path: &str) -> Result<ParsedFile, ParseError> {
        let tree = self.parser.parse(source, None).ok_or_else(|| ParseError::GrammarFailure {
            language: "Kotlin",
            path: file_path.to_string(),
        })?;
        let root = tree.root_node();
        let mut file = ParsedFile::new(file_path, Language::Kotlin);

        if let Some(pkg_node) = find_child_by_type(root, "package_header") {
            file.package_name = Some(package_text(pkg_node, source));
        }

        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            match child.kind() {
                "import_header" => file.imports.push(parse_import(child, source)),
                "class_declaration" => file.classes.push(parse_class(child, source)),
                "object_declaration" => file.classes.push(parse_object(child, source)),
                "function_declaration" => {
                    file.top_level_functions.push(parse_function(child, source))
                }
                "property_declaration" => {
                    file.top_level_properties.extend(parse_properties(child, source, Visibility::Public))
                }
                _ => {}
            }
        }

        backfill_file_path(&mut file, file_path);
        Ok(file)
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
    if let Some(companion) = &mut class.companion_object {
        backfill_class(companion, file_path);
    }
    for ctor in &mut class.secondary_constructors {
        ctor.location.file_path = file_path.to_string();
        for call in &mut ctor.body_calls {
            call.location.file_path = file_path.to_string();
        }
    }
}

fn backfill_function(function: &mut ParsedFunction, file_path: &str) {
    function.location.file_path = file_path.to_string();
    for call in &mut function.calls {
        call.location.file_path = file_path.to_string();
    }
}

fn package_text(node: Node, source: &str) -> String {
    find_child_by_type(node, "identifier")
        .map(|n| safe_node_text(n, source).to_string())
        .unwrap_or_else(|| safe_node_text(node, source).trim_start_matches("package").trim().to_string())
}

fn parse_import(node: Node, source: &str) -> ParsedImport {
    let text = safe_node_text(node, source);
    let body = text.trim_start_matches("import").trim();
    if let Some(stripped) = body.strip_suffix(".*") {
        return ParsedImport {
            is_wildcard: true,
            ..ParsedImport::new(stripped.to_string())
        };
    }
    if let Some((path, alias)) = body.split_once(" as ") {
        let mut import = ParsedImport::new(path.trim());
        import.alias = Some(alias.trim().to_string());
        return import;
    }
    ParsedImport::new(body)
}

fn determine_visibility(node: Node, source: &str) -> Visibility {
    if let Some(modifiers) = find_child_by_type(node, "modifiers") {
        let text = safe_node_text(modifiers, source);
        if text.contains("private") {
            return Visibility::Private;
        }
        if text.contains("protected") {
            return Visibility::Protected;
        }
        if text.contains("internal") {
            return Visibility::Internal;
        }
    }
    Visibility::Public
}

fn has_modifier(node: Node, source: &str, modifier: &str) -> bool {
    find_child_by_type(node, "modifiers")
        .map(|m| safe_node_text(m, source).contains(modifier))
        .unwrap_or(false)
}

fn parse_type_parameters(node: Node, source: &str) -> Vec<ParsedTypeParameter> {
    let Some(list) = find_child_by_type(node, "type_parameters") else {
        return Vec::new();
    };
    find_children_by_type(list, "type_parameter")
        .into_iter()
        .map(|tp| {
            let text = safe_node_text(tp, source);
            let variance = if text.contains("out ") {
                Some(Variance::Out)
            } else if text.contains("in ") {
                Some(Variance::In)
            } else {
                None
            };
            let name = find_child_by_type(tp, "type_identifier")
                .map(|n| safe_node_text(n, source).to_string())
                .unwrap_or_else(|| text.to_string());
            ParsedTypeParameter {
                name,
                bounds: Vec::new(),
                variance,
                is_reified: false,
            }
        })
        .collect()
}

fn parse_parameters(node: Node, source: &str) -> Vec<ParsedParameter> {
    let list_kind = if node.kind() == "class_parameters" || node.kind() == "function_value_parameters" {
        node
    } else {
        match find_child_by_type(node, "function_value_parameters") {
            Some(n) => n,
            None => return Vec::new(),
        }
    };
    let param_kind = if list_kind.kind() == "class_parameters" {
        "class_parameter"
    } else {
        "parameter"
    };
    find_children_by_type(list_kind, param_kind)
        .into_iter()
        .map(|p| {
            let name = find_child_by_type(p, "simple_identifier")
                .map(|n| safe_node_text(n, source).to_string())
                .unwrap_or_default();
            let r#type = find_child_by_type(p, "user_type")
                .or_else(|| find_child_by_type(p, "nullable_type"))
                .or_else(|| find_child_by_type(p, "function_type"))
                .map(|n| extract_full_type_name(n, source));
            ParsedParameter {
                name,
                r#type,
                default_value: None,
                annotations: Vec::new(),
            }
        })
        .collect()
}

fn class_parameter_properties(node: Node, source: &str) -> Vec<ParsedProperty> {
    let Some(params) = find_child_by_type(node, "class_parameters") else {
        return Vec::new();
    };
    find_children_by_type(params, "class_parameter")
        .into_iter()
        .filter_map(|p| {
            let text = safe_node_text(p, source);
            let is_val = text.trim_start().starts_with("val");
            let is_var = text.trim_start().starts_with("var");
            if !is_val && !is_var {
                return None;
            }
            let name = find_child_by_type(p, "simple_identifier")
                .map(|n| safe_node_text(n, source).to_string())
                .unwrap_or_default();
            let r#type = find_child_by_type(p, "user_type")
                .or_else(|| find_child_by_type(p, "nullable_type"))
                .map(|n| extract_full_type_name(n, source));
            Some(ParsedProperty {
                name,
                r#type,
                visibility: determine_visibility(p, source),
                is_val,
                initializer: None,
                annotations: Vec::new(),
                location: node_location(p),
            })
        })
        .collect()
}

fn parse_function(node: Node, source: &str) -> ParsedFunction {
    let name = find_child_by_type(node, "simple_identifier")
        .map(|n| safe_node_text(n, source).to_string())
        .unwrap_or_default();
    let mut function = ParsedFunction::new(name, node_location(node));
    function.visibility = determine_visibility(node, source);
    function.is_abstract = has_modifier(node, source, "abstract");
    function.is_suspend = has_modifier(node, source, "suspend");
    function.is_inline = has_modifier(node, source, "inline");
    function.is_infix = has_modifier(node, source, "infix");
    function.is_operator = has_modifier(node, source, "operator");
    function.type_parameters = parse_type_parameters(node, source);
    function.parameters = parse_parameters(node, source);
    function.return_type = find_child_by_type(node, "user_type")
        .or_else(|| find_child_by_type(node, "nullable_type"))
        .map(|n| extract_full_type_name(n, source));

    if let Some(receiver) = find_child_by_type(node, "receiver_type") {
        function.is_extension = true;
        function.receiver_type = Some(extract_full_type_name(receiver, source));
    }

    if let Some(body) = find_child_by_type(node, "function_body") {
        function.calls = extract_calls(body, source);
    }

    function
}

fn parse_properties(node: Node, source: &str, default_visibility: Visibility) -> Vec<ParsedProperty> {
    let is_val = find_child_by_type(node, "val").is_some()
        || safe_node_text(node, source).trim_start().starts_with("val");
    let visibility = {
        let v = determine_visibility(node, source);
        if v == Visibility::Public {
            default_visibility
        } else {
            v
        }
    };
    find_children_by_type(node, "variable_declaration")
        .into_iter()
        .map(|decl| {
            let name = find_child_by_type(decl, "simple_identifier")
                .map(|n| safe_node_text(n, source).to_string())
                .unwrap_or_default();
            let r#type = find_child_by_type(decl, "user_type")
                .or_else(|| find_child_by_type(decl, "nullable_type"))
                .map(|n| extract_full_type_name(n, source));
            ParsedProperty {
                name,
                r#type,
                visibility,
                is_val,
                initializer: None,
                annotations: Vec::new(),
                location: node_location(node),
            }
        })
        .collect()
}

fn parse_secondary_constructor(node: Node, source: &str) -> ParsedConstructor {
    let parameters = parse_parameters(node, source);
    let mut delegation = Delegation::None;
    if let Some(deleg) = find_child_by_type(node, "constructor_delegation_call") {
        let text = safe_node_text(deleg, source);
        if text.trim_start().starts_with("this") {
            delegation = Delegation::This;
        } else if text.trim_start().starts_with("super") {
            delegation = Delegation::Super;
        }
    }
    let body_calls = find_child_by_type(node, "function_body")
        .map(|b| extract_calls(b, source))
        .unwrap_or_default();
    ParsedConstructor {
        parameters,
        delegation,
        body_calls,
        location: node_location(node),
    }
}

fn parse_class_body(class: &mut ParsedClass, body: Node, source: &str) {
    let mut cursor = body.walk();
    for member in body.children(&mut cursor) {
        match member.kind() {
            "function_declaration" => class.functions.push(parse_function(member, source)),
            "property_declaration" => {
                class.properties.extend(parse_properties(member, source, Visibility::Public))
            }
            "class_declaration" => class.nested_classes.push(parse_class(member, source)),
            "object_declaration" => {
                let nested = parse_object(member, source);
                if nested.name == "Companion" {
                    class.companion_object = Some(Box::new(nested));
                } else {
                    class.nested_classes.push(nested);
                }
            }
            "companion_object" => {
                class.companion_object = Some(Box::new(parse_object(member, source)));
            }
            "secondary_constructor" => {
                class.secondary_constructors.push(parse_secondary_constructor(member, source))
            }
            _ => {}
        }
    }
}

fn parse_class(node: Node, source: &str) -> ParsedClass {
    let name = find_child_by_type(node, "type_identifier")
        .map(|n| safe_node_text(n, source).to_string())
        .unwrap_or_default();
    let text = safe_node_text(node, source);
    let is_interface = text.trim_start().contains("interface") && !text.trim_start().starts_with("class");
    let kind = if is_interface {
        ClassKind::Interface
    } else if text.contains("enum class") {
        ClassKind::Enum
    } else if text.contains("annotation class") {
        ClassKind::Annotation
    } else {
        ClassKind::Class
    };

    let mut class = ParsedClass::new(name, kind, node_location(node));
    class.visibility = determine_visibility(node, source);
    class.is_abstract = has_modifier(node, source, "abstract");
    class.is_sealed = has_modifier(node, source, "sealed");
    class.is_data = text.contains("data class");
    class.type_parameters = parse_type_parameters(node, source);
    class.properties = class_parameter_properties(node, source);

    if let Some(delegation_specifiers) = find_child_by_type(node, "delegation_specifiers") {
        let specs = find_children_by_type(delegation_specifiers, "user_type");
        let mut iter = specs.into_iter();
        if let Some(first) = iter.next() {
            class.super_class = Some(extract_full_type_name(first, source));
        }
        for rest in iter {
            class.interfaces.push(extract_full_type_name(rest, source));
        }
    }

    if let Some(body) = find_child_by_type(node, "class_body") {
        parse_class_body(&mut class, body, source);
    }
    if let Some(body) = find_child_by_type(node, "enum_class_body") {
        parse_class_body(&mut class, body, source);
    }

    class
}

fn parse_object(node: Node, source: &str) -> ParsedClass {
    let name = find_child_by_type(node, "type_identifier")
        .map(|n| safe_node_text(n, source).to_string())
        .unwrap_or_else(|| "Companion".to_string());
    let mut class = ParsedClass::new(name, ClassKind::Object, node_location(node));
    class.visibility = determine_visibility(node, source);
    if let Some(body) = find_child_by_type(node, "class_body") {
        parse_class_body(&mut class, body, source);
    }
    class
}

/// Literal-level argument type inference table (SPEC_FULL.md §4.2).
fn literal_type_for_kind(kind: &str) -> Option<&'static str> {
    match kind {
        "integer_literal" => Some("Int"),
        "long_literal" => Some("Long"),
        "real_literal" => Some("Double"),
        "string_literal" | "line_string_literal" | "multi_line_string_literal" => Some("String"),
        "character_literal" => Some("Char"),
        "boolean_literal" => Some("Boolean"),
        "null" | "null_literal" => Some("Nothing?"),
        "lambda_literal" | "anonymous_function" => Some("Function"),
        "collection_literal" => Some("Collection"),
        _ => None,
    }
}

fn argument_types(args_node: Node, source: &str) -> Vec<String> {
    find_children_by_type(args_node, "value_argument")
        .into_iter()
        .map(|arg| {
            let mut cursor = arg.walk();
            arg.children(&mut cursor)
                .find_map(|c| literal_type_for_kind(c.kind()))
                .map(str::to_string)
                .unwrap_or_else(|| "Unknown".to_string())
        })
        .collect()
}

fn extract_calls(body: Node, source: &str) -> Vec<ParsedCall> {
    let mut calls = Vec::new();
    traverse_node(body, &mut |node| {
        if node.kind() == "call_expression" {
            if let Some(call) = build_call(node, source) {
                calls.push(call);
            }
        }
        true
    });
    calls
}

fn build_call(node: Node, source: &str) -> Option<ParsedCall> {
    let callee = node.child(0)?;
    let (receiver, name, is_safe_call) = match callee.kind() {
        "navigation_expression" => {
            let target = find_child_by_type(callee, "simple_identifier")
                .map(|n| safe_node_text(n, source).to_string())
                .unwrap_or_default();
            let receiver_expr = callee.child(0).map(|n| safe_node_text(n, source).to_string());
            let is_safe = safe_node_text(callee, source).contains("?.");
            (receiver_expr, target, is_safe)
        }
        "simple_identifier" => (None, safe_node_text(callee, source).to_string(), false),
        _ => (None, safe_node_text(callee, source).to_string(), false),
    };

    if name.is_empty() {
        return None;
    }

    let is_constructor_call = name.chars().next().map(char::is_uppercase).unwrap_or(false);
    let args_node = find_child_by_type(node, "value_arguments");
    let argument_count = args_node
        .map(|a| find_children_by_type(a, "value_argument").len() as u32)
        .unwrap_or(0);
    let argument_types = args_node.map(|a| argument_types(a, source)).filter(|v| !v.is_empty());

    let mut call = ParsedCall::new(name, node_location(node));
    call.receiver = receiver;
    call.is_safe_call = is_safe_call;
    call.is_constructor_call = is_constructor_call;
    call.argument_count = argument_count;
    call.argument_types = argument_types;
    Some(call)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> ParsedFile {
        let mut parser = KotlinParser::new();
        parser.parse(source, "Test.kt").unwrap()
    }

    #[test]
    fn extracts_package_and_simple_class() {
        let file = parse("package com.acme\n\nclass Widget {\n    fun render() {}\n}\n");
        assert_eq!(file.package_name.as_deref(), Some("com.acme"));
        assert_eq!(file.classes.len(), 1);
        assert_eq!(file.classes[0].name, "Widget");
        assert_eq!(file.classes[0].functions[0].name, "render");
    }

    #[test]
    fn extension_function_sets_receiver_type() {
        let file = parse("package com.acme\n\nfun String.shout(): String = this\n");
        let func = &file.top_level_functions[0];
        assert!(func.is_extension);
        assert_eq!(func.receiver_type.as_deref(), Some("String"));
    }

    #[test]
    fn primary_constructor_val_params_become_properties() {
        let file = parse("package com.acme\n\nclass Point(val x: Int, y: Int)\n");
        let class = &file.classes[0];
        assert_eq!(class.properties.len(), 1);
        assert_eq!(class.properties[0].name, "x");
    }

    #[test]
    fn data_class_flag_is_set() {
        let file = parse("package com.acme\n\ndata class Point(val x: Int, val y: Int)\n");
        assert!(file.classes[0].is_data);
    }

    #[test]
    fn call_inside_function_body_is_extracted() {
        let file = parse("package com.acme\n\nfun run() {\n    doThing(1, \"x\")\n}\n");
        let calls = &file.top_level_functions[0].calls;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "doThing");
        assert_eq!(calls[0].argument_count, 2);
    }

    #[test]
    fn wildcard_import_is_flagged() {
        let file = parse("package com.acme\n\nimport com.acme.util.*\n");
        assert!(file.imports[0].is_wildcard);
    }
}
