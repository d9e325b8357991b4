//! Symbol table builder (C4): indexes every declaration across a set of
//! parsed files under three lookup maps. Grounded on the teacher's
//! `symbol/mod.rs` for the notion of a tagged symbol record, simplified to
//! plain string FQNs since this domain has no need for the teacher's
//! interned/packed `CompactSymbol` representation (there is no large-corpus
//! memory budget here — files are held in memory by the caller already).

use crate::error::Diagnostic;
use crate::types::{
    Language, LanguageSpec, ParsedClass, ParsedFile, ParsedFunction, ParsedProperty, SourceLocation,
    SymbolKind,
};
use indexmap::IndexMap;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub fqn: String,
    pub kind: SymbolKind,
    pub file_path: String,
    pub location: SourceLocation,
    pub function: Option<FunctionSymbolData>,
}

/// Extra fields carried only by function symbols. A plain field on `Symbol`
/// rather than a full enum-per-kind split keeps the common lookup path
/// (name/fqn/kind) uniform while the resolver's overload scorer still gets
/// typed access to parameters when `kind == Function`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSymbolData {
    pub declaring_type_fqn: Option<String>,
    pub receiver_type: Option<String>,
    pub package_name: Option<String>,
    pub parameter_types: Vec<String>,
    pub return_type: Option<String>,
    pub is_extension: bool,
    pub is_operator: bool,
    pub is_infix: bool,
    pub is_suspend: bool,
    pub is_inline: bool,
}

impl Symbol {
    pub fn as_function(&self) -> Option<&FunctionSymbolData> {
        self.function.as_ref()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    pub by_fqn: IndexMap<String, Symbol>,
    pub by_name: HashMap<String, Vec<Symbol>>,
    pub functions_by_name: HashMap<String, Vec<Symbol>>,
    /// `class fqn -> (superClass name, interface names)`, as written in the
    /// source (not yet resolved to FQNs) — lets the resolver ascend a type's
    /// hierarchy when a member isn't declared directly on it.
    pub class_hierarchy: HashMap<String, (Option<String>, Vec<String>)>,
}

impl SymbolTable {
    fn insert(&mut self, symbol: Symbol) {
        self.by_name
            .entry(symbol.name.clone())
            .or_default()
            .push(symbol.clone());
        if symbol.kind == SymbolKind::Function {
            self.functions_by_name
                .entry(symbol.name.clone())
                .or_default()
                .push(symbol.clone());
        }
        self.by_fqn.insert(symbol.fqn.clone(), symbol);
    }

    pub fn lookup_fqn(&self, fqn: &str) -> Option<&Symbol> {
        self.by_fqn.get(fqn)
    }

    pub fn lookup_name(&self, name: &str) -> &[Symbol] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn lookup_functions(&self, name: &str) -> &[Symbol] {
        self.functions_by_name
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Builds an `fqn`-unique key for `name` under `parent_fqn`, appending a
/// deterministic `#N` disambiguator when `parent_fqn.name` is already
/// occupied (overload handling, SPEC_FULL.md §4.4 — any stable scheme is
/// acceptable; `functions_by_name` still groups every overload regardless
/// of which one "owns" the bare FQN).
fn unique_fqn(table: &SymbolTable, base_fqn: &str) -> String {
    if !table.by_fqn.contains_key(base_fqn) {
        return base_fqn.to_string();
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base_fqn}#{n}");
        if !table.by_fqn.contains_key(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

fn join_fqn(parent: &str, name: &str, language: Language) -> String {
    if parent.is_empty() {
        return name.to_string();
    }
    let sep = if language.is_slash_separated() && !parent.contains('.') {
        '/'
    } else {
        '.'
    };
    format!("{parent}{sep}{name}")
}

/// Builds the fully indexed symbol table from a set of parsed files. This
/// is the single-writer phase: the returned table is immutable thereafter
/// and handed to resolver workers by shared reference (SPEC_FULL.md §5).
pub fn build_symbol_table(files: &[ParsedFile]) -> (SymbolTable, Vec<Diagnostic>) {
    let mut table = SymbolTable::default();
    let mut diagnostics = Vec::new();

    for file in files {
        let spec = LanguageSpec::for_language(file.language);
        let root = file.root_prefix().unwrap_or("").to_string();

        for class in &file.classes {
            index_class(&mut table, &mut diagnostics, file, &spec, &root, class);
        }
        for function in &file.top_level_functions {
            index_function(&mut table, file, &spec, &root, None, None, function);
        }
        for property in &file.top_level_properties {
            index_property(&mut table, file, &root, property);
        }
    }

    (table, diagnostics)
}

fn index_class(
    table: &mut SymbolTable,
    diagnostics: &mut Vec<Diagnostic>,
    file: &ParsedFile,
    spec: &LanguageSpec,
    parent_fqn: &str,
    class: &ParsedClass,
) {
    let base_fqn = join_fqn(parent_fqn, &class.name, file.language);
    let fqn = unique_fqn(table, &base_fqn);
    if fqn != base_fqn {
        diagnostics.push(Diagnostic::Invariant {
            path: file.file_path.clone(),
            detail: format!("duplicate class fqn '{base_fqn}' disambiguated to '{fqn}'"),
        });
    }

    table.insert(Symbol {
        name: class.name.clone(),
        fqn: fqn.clone(),
        kind: class_symbol_kind(class),
        file_path: file.file_path.clone(),
        location: class.location.clone(),
        function: None,
    });
    table
        .class_hierarchy
        .insert(fqn.clone(), (class.super_class.clone(), class.interfaces.clone()));

    for property in &class.properties {
        index_property(table, file, &fqn, property);
    }
    for function in &class.functions {
        index_function(
            table,
            file,
            spec,
            &fqn,
            Some(fqn.clone()),
            None,
            function,
        );
    }
    for nested in &class.nested_classes {
        index_class(table, diagnostics, file, spec, &fqn, nested);
    }
    if let Some(companion) = &class.companion_object {
        let companion_fqn = format!("{fqn}.Companion");
        table.insert(Symbol {
            name: "Companion".to_string(),
            fqn: companion_fqn.clone(),
            kind: SymbolKind::Object,
            file_path: file.file_path.clone(),
            location: companion.location.clone(),
            function: None,
        });
        for property in &companion.properties {
            index_property(table, file, &companion_fqn, property);
        }
        for function in &companion.functions {
            index_function(
                table,
                file,
                spec,
                &companion_fqn,
                Some(companion_fqn.clone()),
                None,
                function,
            );
        }
    }
}

fn class_symbol_kind(class: &ParsedClass) -> SymbolKind {
    match class.kind {
        crate::types::ClassKind::Class => SymbolKind::Class,
        crate::types::ClassKind::Interface => SymbolKind::Interface,
        crate::types::ClassKind::Enum => SymbolKind::Enum,
        crate::types::ClassKind::Object => SymbolKind::Object,
        crate::types::ClassKind::Annotation => SymbolKind::Annotation,
    }
}

fn index_function(
    table: &mut SymbolTable,
    file: &ParsedFile,
    spec: &LanguageSpec,
    parent_fqn: &str,
    declaring_type_fqn: Option<String>,
    receiver_type: Option<String>,
    function: &ParsedFunction,
) {
    let base_fqn = join_fqn(parent_fqn, &function.name, file.language);
    let fqn = unique_fqn(table, &base_fqn);

    let receiver_type = receiver_type.or_else(|| function.receiver_type.clone());
    let parameter_types = function
        .parameters
        .iter()
        .map(|p| {
            p.r#type
                .clone()
                .unwrap_or_else(|| spec.default_param_type.to_string())
        })
        .collect();

    table.insert(Symbol {
        name: function.name.clone(),
        fqn,
        kind: SymbolKind::Function,
        file_path: file.file_path.clone(),
        location: function.location.clone(),
        function: Some(FunctionSymbolData {
            declaring_type_fqn,
            receiver_type,
            package_name: file.package_name.clone(),
            parameter_types,
            return_type: function.return_type.clone(),
            is_extension: function.is_extension,
            is_operator: function.is_operator,
            is_infix: function.is_infix,
            is_suspend: function.is_suspend,
            is_inline: function.is_inline,
        }),
    });
}

fn index_property(table: &mut SymbolTable, file: &ParsedFile, parent_fqn: &str, property: &ParsedProperty) {
    let base_fqn = join_fqn(parent_fqn, &property.name, file.language);
    let fqn = unique_fqn(table, &base_fqn);
    table.insert(Symbol {
        name: property.name.clone(),
        fqn,
        kind: SymbolKind::Property,
        file_path: file.file_path.clone(),
        location: property.location.clone(),
        function: None,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClassKind, ParsedClass, ParsedFunction, SourceLocation};

    fn loc() -> SourceLocation {
        SourceLocation::new(1, 1, 1, 1)
    }

    #[test]
    fn top_level_function_gets_package_qualified_fqn() {
        let mut file = ParsedFile::new("a.kt", Language::Kotlin);
        file.package_name = Some("com.acme".to_string());
        file.top_level_functions.push(ParsedFunction::new("doThing", loc()));

        let (table, diags) = build_symbol_table(&[file]);
        assert!(diags.is_empty());
        assert!(table.lookup_fqn("com.acme.doThing").is_some());
    }

    #[test]
    fn class_members_nest_under_class_fqn() {
        let mut file = ParsedFile::new("a.kt", Language::Kotlin);
        file.package_name = Some("com.acme".to_string());
        let mut class = ParsedClass::new("Widget", ClassKind::Class, loc());
        class.functions.push(ParsedFunction::new("render", loc()));
        file.classes.push(class);

        let (table, _) = build_symbol_table(&[file]);
        assert!(table.lookup_fqn("com.acme.Widget").is_some());
        let func = table.lookup_fqn("com.acme.Widget.render").unwrap();
        assert_eq!(
            func.as_function().unwrap().declaring_type_fqn.as_deref(),
            Some("com.acme.Widget")
        );
    }

    #[test]
    fn duplicate_overloads_get_disambiguated_but_group_under_functions_by_name() {
        let mut file = ParsedFile::new("a.kt", Language::Kotlin);
        file.package_name = Some("com.acme".to_string());
        let mut class = ParsedClass::new("Widget", ClassKind::Class, loc());
        let mut f1 = ParsedFunction::new("render", loc());
        f1.parameters.push(crate::types::ParsedParameter {
            name: "x".to_string(),
            r#type: Some("Int".to_string()),
            default_value: None,
            annotations: vec![],
        });
        let f2 = ParsedFunction::new("render", loc());
        class.functions.push(f1);
        class.functions.push(f2);
        file.classes.push(class);

        let (table, diags) = build_symbol_table(&[file]);
        assert_eq!(diags.len(), 1);
        assert!(table.lookup_fqn("com.acme.Widget.render").is_some());
        assert!(table.lookup_fqn("com.acme.Widget.render#2").is_some());
        assert_eq!(table.lookup_functions("render").len(), 2);
    }

    #[test]
    fn companion_object_members_live_under_companion_fqn() {
        let mut file = ParsedFile::new("a.kt", Language::Kotlin);
        file.package_name = Some("com.acme".to_string());
        let mut class = ParsedClass::new("Widget", ClassKind::Class, loc());
        let mut companion = ParsedClass::new("Companion", ClassKind::Object, loc());
        companion.functions.push(ParsedFunction::new("create", loc()));
        class.companion_object = Some(Box::new(companion));
        file.classes.push(class);

        let (table, _) = build_symbol_table(&[file]);
        assert!(table.lookup_fqn("com.acme.Widget.Companion.create").is_some());
    }
}
