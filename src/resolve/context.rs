//! Per-file resolution context (SPEC_FULL.md §4.5), built fresh for each
//! file and never shared across resolver workers — mirrors the teacher's
//! `JavaResolutionContext`/`JavaScriptResolutionContext` shape, generalized
//! across all four languages instead of duplicated per language module.

use crate::resolve::reexport::ReexportIndex;
use crate::symbol::SymbolTable;
use crate::types::{Language, LanguageSpec, ParsedClass, ParsedFile, ParsedFunction};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct ResolutionContext<'a> {
    pub current_file: &'a str,
    pub language: Language,
    pub package_name: Option<&'a str>,
    pub root_prefix: Option<&'a str>,
    /// Simple name (alias if present, else last path segment) -> FQN once
    /// resolved against the symbol table.
    pub imports: HashMap<String, String>,
    pub wildcard_imports: Vec<String>,
    pub current_class: Option<String>,
    pub current_super_class: Option<String>,
    pub current_function: Option<String>,
    /// Name -> declared type text, seeded from typed parameters at function
    /// entry and extended by typed top-level statements. No flow widening
    /// or narrowing is modeled.
    pub local_variables: HashMap<String, String>,
}

impl<'a> ResolutionContext<'a> {
    pub fn for_file(file: &'a ParsedFile, table: &SymbolTable, reexports: Option<&ReexportIndex>) -> Self {
        let spec = LanguageSpec::for_language(file.language);
        let mut imports = HashMap::new();
        let mut wildcard_imports: Vec<String> = spec
            .implicit_wildcard_imports
            .iter()
            .map(|s| s.to_string())
            .collect();

        for import in &file.imports {
            if import.is_wildcard {
                wildcard_imports.push(import.path.clone());
                continue;
            }
            if let Some(local_name) = import.local_name() {
                let fqn = resolve_import_fqn(file, import, local_name, table, reexports);
                imports.insert(local_name.to_string(), fqn);
            }
        }

        Self {
            current_file: &file.file_path,
            language: file.language,
            package_name: file.package_name.as_deref(),
            root_prefix: file.root_prefix(),
            imports,
            wildcard_imports,
            current_class: None,
            current_super_class: None,
            current_function: None,
            local_variables: HashMap::new(),
        }
    }

    pub fn enter_class(&mut self, class: &ParsedClass) {
        self.current_class = Some(class.name.clone());
        self.current_super_class = class.super_class.clone();
    }

    pub fn enter_function(&mut self, function: &ParsedFunction) {
        self.current_function = Some(function.name.clone());
        self.local_variables.clear();
        for param in &function.parameters {
            if let Some(ty) = &param.r#type {
                self.local_variables.insert(param.name.clone(), ty.clone());
            }
        }
    }

    /// Name resolution by simple name (SPEC_FULL.md §4.5 "Name resolution
    /// by simple name" helper), in the specified priority order.
    pub fn resolve_simple_name(&self, table: &SymbolTable, name: &str) -> Option<String> {
        if let Some(fqn) = self.imports.get(name) {
            if table.lookup_fqn(fqn).is_some() {
                return Some(fqn.clone());
            }
        }

        if let Some(package) = self.package_name.or(self.root_prefix) {
            let candidate = format!("{package}.{name}");
            if table.lookup_fqn(&candidate).is_some() {
                return Some(candidate);
            }
        }

        for wildcard in &self.wildcard_imports {
            let candidate = format!("{wildcard}.{name}");
            if table.lookup_fqn(&candidate).is_some() {
                return Some(candidate);
            }
        }

        let candidates = table.lookup_name(name);
        if candidates.len() == 1 {
            return Some(candidates[0].fqn.clone());
        }

        None
    }
}

/// Resolves one import's local name to an FQN, walking the re-export chain
/// for relative TS/JS specifiers (`./impl`) so a name imported through a
/// barrel file resolves to where it's actually declared rather than to the
/// barrel itself.
fn resolve_import_fqn(
    file: &ParsedFile,
    import: &crate::types::ParsedImport,
    local_name: &str,
    table: &SymbolTable,
    reexports: Option<&ReexportIndex>,
) -> String {
    if table.lookup_fqn(&import.path).is_some() {
        return import.path.clone();
    }

    if let Some(reexports) = reexports {
        if import.path.starts_with('.') {
            let module_path = crate::module_path::resolve_relative_to_module_path(&file.file_path, &import.path);
            let original_name = import.name.clone().unwrap_or_else(|| local_name.to_string());
            let (final_module, final_name) = reexports.resolve_through(&module_path, &original_name);
            return format!("{final_module}/{final_name}");
        }
    }

    import.path.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::build_symbol_table;
    use crate::types::{ClassKind, ParsedClass, ParsedFunction, SourceLocation};

    fn loc() -> SourceLocation {
        SourceLocation::new(1, 1, 1, 1)
    }

    #[test]
    fn enter_function_seeds_local_variables_from_typed_parameters() {
        let mut function = ParsedFunction::new("run", loc());
        function.parameters.push(crate::types::ParsedParameter {
            name: "x".to_string(),
            r#type: Some("Int".to_string()),
            default_value: None,
            annotations: vec![],
        });
        let file = ParsedFile::new("a.kt", Language::Kotlin);
        let (table, _) = build_symbol_table(&[]);
        let mut ctx = ResolutionContext::for_file(&file, &table, None);
        ctx.enter_function(&function);
        assert_eq!(ctx.local_variables.get("x").map(String::as_str), Some("Int"));
    }

    #[test]
    fn package_qualified_lookup_succeeds_when_import_absent() {
        let mut file = ParsedFile::new("a.kt", Language::Kotlin);
        file.package_name = Some("com.acme".to_string());
        file.top_level_functions.push(ParsedFunction::new("doThing", loc()));
        let (table, _) = build_symbol_table(&[file.clone()]);
        let ctx = ResolutionContext::for_file(&file, &table, None);
        assert_eq!(
            ctx.resolve_simple_name(&table, "doThing").as_deref(),
            Some("com.acme.doThing")
        );
    }

    #[test]
    fn relative_import_resolves_through_reexport_chain_to_declaring_module() {
        use crate::resolve::reexport::ReexportIndex;
        use crate::types::{Language as Lang, ParsedImport, ParsedReexport};

        let mut barrel = ParsedFile::new("src/index.ts", Lang::TypeScript);
        barrel.module_path = Some("src".to_string());
        barrel.reexports.push(ParsedReexport {
            source_path: "./impl".to_string(),
            original_name: Some("Widget".to_string()),
            exported_name: Some("Widget".to_string()),
            is_wildcard: false,
            is_namespace_reexport: false,
            is_type_only: false,
        });

        let mut impl_file = ParsedFile::new("src/impl.ts", Lang::TypeScript);
        impl_file.module_path = Some("src/impl".to_string());
        impl_file
            .classes
            .push(ParsedClass::new("Widget", ClassKind::Class, loc()));

        let mut caller = ParsedFile::new("src/app.ts", Lang::TypeScript);
        caller.module_path = Some("src/app".to_string());
        let mut import = ParsedImport::new("./index");
        import.name = Some("Widget".to_string());
        caller.imports.push(import);

        let (table, _) = build_symbol_table(&[barrel.clone(), impl_file, caller.clone()]);
        let reexports = ReexportIndex::build(&[barrel, caller.clone()]);
        let ctx = ResolutionContext::for_file(&caller, &table, Some(&reexports));
        assert_eq!(
            ctx.imports.get("Widget").map(String::as_str),
            Some("src/impl/Widget")
        );
        assert!(table.lookup_fqn("src/impl/Widget").is_some());
    }
}
