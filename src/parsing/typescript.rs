//! TypeScript parser. Reuses the JavaScript parser's statement/expression
//! traversal (the two grammars agree on everything but type syntax) and
//! adds the TS-only declaration kinds: `interface_declaration`,
//! `type_alias_declaration`, and typed class members.

use crate::ast_util::{extract_full_type_name, find_child_by_type, find_children_by_type, node_location, safe_node_text};
use crate::error::ParseError;
use crate::module_path::module_path_from_file;
use crate::parsing::javascript::{self, walk_program};
use crate::parsing::LanguageParser;
use crate::types::{ClassKind, Language, ParsedClass, ParsedFile, ParsedFunction, ParsedTypeAlias, Visibility};
use tree_sitter::{Node, Parser};

pub struct TypeScriptParser {
    parser: Parser,
}

impl TypeScriptParser {
    pub fn new() -> Self {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
            .expect("typescript grammar should load");
        Self { parser }
    }
}

impl LanguageParser for TypeScriptParser {
    fn language(&self) -> Language {
        Language::TypeScript
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["ts", "tsx", "mts", "cts"]
    }

    fn parse(&mut self, source: &str, file_path: &str) -> Result<ParsedFile, ParseError> {
        let tree = self.parser.parse(source, None).ok_or_else(|| ParseError::GrammarFailure {
            language: "TypeScript",
            path: file_path.to_string(),
        })?;
        let mut file = ParsedFile::new(file_path, Language::TypeScript);
        file.module_path = Some(module_path_from_file(file_path, &["src", "lib"]));

        walk_program(tree.root_node(), source, &mut file, true);
        extract_ts_only_declarations(tree.root_node(), source, &mut file);

        backfill_file_path(&mut file, file_path);
        Ok(file)
    }
}

fn extract_ts_only_declarations(root: Node, source: &str, file: &mut ParsedFile) {
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        let node = unwrap_export(child);
        match node.kind() {
            "interface_declaration" => file.classes.push(parse_interface(node, source)),
            "type_alias_declaration" => file.type_aliases.push(parse_type_alias(node, source)),
            _ => {}
        }
    }
}

fn unwrap_export(node: Node) -> Node {
    if node.kind() == "export_statement" {
        for kind in ["interface_declaration", "type_alias_declaration"] {
            if let Some(inner) = find_child_by_type(node, kind) {
                return inner;
            }
        }
    }
    node
}

fn parse_interface(node: Node, source: &str) -> ParsedClass {
    let name = find_child_by_type(node, "type_identifier")
        .map(|n| safe_node_text(n, source).to_string())
        .unwrap_or_default();
    let mut class = ParsedClass::new(name, ClassKind::Interface, node_location(node));

    if let Some(heritage) = find_child_by_type(node, "extends_type_clause") {
        class.interfaces = find_children_by_type(heritage, "type_identifier")
            .into_iter()
            .map(|n| safe_node_text(n, source).to_string())
            .collect();
    }

    if let Some(body) = find_child_by_type(node, "interface_body") {
        let mut cursor = body.walk();
        for member in body.children(&mut cursor) {
            match member.kind() {
                "method_signature" => {
                    let fn_name = find_child_by_type(member, "property_identifier")
                        .map(|n| safe_node_text(n, source).to_string())
                        .unwrap_or_default();
                    let mut function = ParsedFunction::new(fn_name, node_location(member));
                    function.is_abstract = true;
                    class.functions.push(function);
                }
                "property_signature" => {
                    if let Some(prop_name) = find_child_by_type(member, "property_identifier") {
                        class.properties.push(crate::types::ParsedProperty {
                            name: safe_node_text(prop_name, source).to_string(),
                            r#type: find_child_by_type(member, "type_annotation")
                                .map(|n| extract_full_type_name(n, source).trim_start_matches(':').trim().to_string()),
                            visibility: Visibility::Public,
                            is_val: false,
                            initializer: None,
                            annotations: Vec::new(),
                            location: node_location(member),
                        });
                    }
                }
                _ => {}
            }
        }
    }

    class
}

fn parse_type_alias(node: Node, source: &str) -> ParsedTypeAlias {
    let name = find_child_by_type(node, "type_identifier")
        .map(|n| safe_node_text(n, source).to_string())
        .unwrap_or_default();
    let target = node
        .child(node.child_count().saturating_sub(1) as u32)
        .map(|n| extract_full_type_name(n, source))
        .unwrap_or_default();
    ParsedTypeAlias {
        name,
        target,
        location: node_location(node),
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
    for alias in &mut file.type_aliases {
        alias.location.file_path = file_path.to_string();
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
