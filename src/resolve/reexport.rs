//! Re-export transparency for TS/JS (SPEC_FULL.md §4.5): resolving an
//! imported name whose path re-exports from another module walks the chain
//! via an index built from every file's `reexports`, stopping on fixpoint or
//! a visited-set hit so cycles resolve as "unresolved" rather than hanging.

use crate::types::{ParsedFile, ParsedReexport};
use std::collections::{HashMap, HashSet};

/// `(module_path, exported_name) -> reexport entry`, built once over every
/// file with a known `module_path` and used read-only by every resolver
/// worker.
pub struct ReexportIndex {
    by_module_and_name: HashMap<(String, String), ParsedReexport>,
    wildcard_by_module: HashMap<String, Vec<ParsedReexport>>,
}

impl ReexportIndex {
    pub fn build(files: &[ParsedFile]) -> Self {
        let mut by_module_and_name = HashMap::new();
        let mut wildcard_by_module: HashMap<String, Vec<ParsedReexport>> = HashMap::new();

        for file in files {
            let Some(module_path) = file.module_path.clone() else {
                continue;
            };
            for reexport in &file.reexports {
                let mut reexport = reexport.clone();
                if reexport.source_path.starts_with('.') {
                    reexport.source_path =
                        crate::module_path::resolve_relative_to_module_path(&file.file_path, &reexport.source_path);
                }
                if reexport.is_wildcard || reexport.is_namespace_reexport {
                    wildcard_by_module
                        .entry(module_path.clone())
                        .or_default()
                        .push(reexport);
                } else if let Some(name) = reexport.exported_name.clone().or_else(|| reexport.original_name.clone())
                {
                    by_module_and_name.insert((module_path.clone(), name), reexport);
                }
            }
        }

        Self {
            by_module_and_name,
            wildcard_by_module,
        }
    }

    /// Walks the re-export chain starting at `(module_path, name)`, returning
    /// the `(source_path, original_or_same_name)` pair the name ultimately
    /// resolves to once no further re-export applies. Cycles terminate at
    /// the first repeated `(module, name)` pair, returning the last hop seen
    /// before the cycle (benign — the caller treats it as unresolved if the
    /// terminal module path isn't in the symbol table either).
    pub fn resolve_through(&self, module_path: &str, name: &str) -> (String, String) {
        let mut visited: HashSet<(String, String)> = HashSet::new();
        let mut current_module = module_path.to_string();
        let mut current_name = name.to_string();

        loop {
            let key = (current_module.clone(), current_name.clone());
            if !visited.insert(key.clone()) {
                return (current_module, current_name);
            }

            if let Some(reexport) = self.by_module_and_name.get(&key) {
                current_module = reexport.source_path.clone();
                current_name = reexport.original_name.clone().unwrap_or(current_name);
                continue;
            }

            if let Some(wildcards) = self.wildcard_by_module.get(&current_module) {
                if let Some(first) = wildcards.first() {
                    current_module = first.source_path.clone();
                    continue;
                }
            }

            return (current_module, current_name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Language;

    fn file_with_reexport(path: &str, module_path: &str, reexport: ParsedReexport) -> ParsedFile {
        let mut file = ParsedFile::new(path, Language::TypeScript);
        file.module_path = Some(module_path.to_string());
        file.reexports.push(reexport);
        file
    }

    #[test]
    fn resolves_single_hop_named_reexport() {
        let files = vec![file_with_reexport(
            "src/index.ts",
            "src/index",
            ParsedReexport {
                source_path: "src/impl".to_string(),
                original_name: Some("Widget".to_string()),
                exported_name: Some("Widget".to_string()),
                is_wildcard: false,
                is_namespace_reexport: false,
                is_type_only: false,
            },
        )];
        let index = ReexportIndex::build(&files);
        let (module, name) = index.resolve_through("src/index", "Widget");
        assert_eq!(module, "src/impl");
        assert_eq!(name, "Widget");
    }

    #[test]
    fn cycle_terminates_instead_of_hanging() {
        let files = vec![
            file_with_reexport(
                "a.ts",
                "a",
                ParsedReexport {
                    source_path: "b".to_string(),
                    original_name: Some("X".to_string()),
                    exported_name: Some("X".to_string()),
                    is_wildcard: false,
                    is_namespace_reexport: false,
                    is_type_only: false,
                },
            ),
            file_with_reexport(
                "b.ts",
                "b",
                ParsedReexport {
                    source_path: "a".to_string(),
                    original_name: Some("X".to_string()),
                    exported_name: Some("X".to_string()),
                    is_wildcard: false,
                    is_namespace_reexport: false,
                    is_type_only: false,
                },
            ),
        ];
        let index = ReexportIndex::build(&files);
        // Must return promptly rather than loop forever.
        let _ = index.resolve_through("a", "X");
    }
}
