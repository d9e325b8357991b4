//! Orchestration entry point: parse → build symbol table → resolve →
//! domains, wiring together C1-C7 behind the single public `analyze()` call
//! (SPEC_FULL.md §2 pipeline, §5 concurrency model, §6 sink boundary).

use crate::cancellation::CancellationToken;
use crate::domain::{infer_domains, Domain};
use crate::error::Diagnostic;
use crate::options::AnalysisOptions;
use crate::parsing::{create_parser, language_for_extension};
use crate::resolve::resolve_all;
use crate::symbol::{build_symbol_table, SymbolTable};
use crate::types::{Language, ResolvedFile};
use rayon::prelude::*;
use std::path::Path;

/// One source file as handed to `analyze()` by the caller — the crate does
/// no file I/O or directory walking of its own (SPEC_FULL.md §1).
#[derive(Debug, Clone)]
pub struct SourceInput {
    pub file_path: String,
    pub source_text: String,
}

impl SourceInput {
    pub fn new(file_path: impl Into<String>, source_text: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            source_text: source_text.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisResult {
    pub parsed: Vec<ResolvedFile>,
    pub table: SymbolTable,
    pub domains: Vec<Domain>,
    pub diagnostics: Vec<Diagnostic>,
}

fn extension_of(path: &str) -> Option<&str> {
    Path::new(path).extension().and_then(|e| e.to_str())
}

/// Runs the full pipeline over `inputs`. Files under an excluded directory,
/// or whose extension has no registered parser, are skipped without a
/// diagnostic (they were never claimed to be source the crate understands).
pub fn analyze(inputs: &[SourceInput], options: &AnalysisOptions, cancellation: &CancellationToken) -> AnalysisResult {
    analyze_impl(inputs, options, cancellation)
}

#[tracing::instrument(skip_all, fields(input_count = inputs.len()))]
fn analyze_impl(inputs: &[SourceInput], options: &AnalysisOptions, cancellation: &CancellationToken) -> AnalysisResult {
    let mut diagnostics = Vec::new();

    let eligible: Vec<&SourceInput> = inputs
        .iter()
        .filter(|input| !options.path_is_excluded(&input.file_path))
        .filter(|input| extension_of(&input.file_path).and_then(language_for_extension).is_some())
        .collect();

    tracing::debug!(eligible = eligible.len(), total = inputs.len(), "starting parse phase");

    let parsed: Vec<(Language, crate::types::ParsedFile)> = eligible
        .par_iter()
        .filter_map(|input| {
            if cancellation.is_cancelled() {
                return None;
            }
            let language = extension_of(&input.file_path).and_then(language_for_extension)?;
            let mut parser = create_parser(language);
            match parser.parse(&input.source_text, &input.file_path) {
                Ok(file) => Some((language, file)),
                Err(err) => {
                    tracing::warn!(path = %input.file_path, error = %err, "parse failed");
                    None
                }
            }
        })
        .collect();

    if cancellation.is_cancelled() {
        return AnalysisResult::default();
    }

    let failed = eligible.len() - parsed.len();
    if failed > 0 {
        tracing::debug!(failed, "files dropped due to parse failures");
    }

    let files: Vec<crate::types::ParsedFile> = parsed.iter().map(|(_, f)| f.clone()).collect();

    tracing::debug!(parsed = files.len(), "building symbol table");
    let (table, table_diagnostics) = build_symbol_table(&files);
    diagnostics.extend(table_diagnostics);

    if cancellation.is_cancelled() {
        return AnalysisResult {
            parsed: Vec::new(),
            table,
            domains: Vec::new(),
            diagnostics,
        };
    }

    tracing::debug!("resolving call sites");
    let (resolved, resolve_diagnostics) = resolve_all(&files, &table);
    diagnostics.extend(resolve_diagnostics);

    let domain_paths: Vec<(Language, String)> = parsed
        .iter()
        .filter_map(|(language, file)| file.root_prefix().map(|p| (*language, p.to_string())))
        .collect();
    let domains = infer_domains(&domain_paths, options.domain_segment_index);

    AnalysisResult {
        parsed: resolved,
        table,
        domains,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excluded_directories_are_skipped_without_diagnostics() {
        let inputs = vec![SourceInput::new(
            "project/node_modules/pkg/index.ts",
            "export function f() {}",
        )];
        let options = AnalysisOptions::default();
        let result = analyze(&inputs, &options, &CancellationToken::new());
        assert!(result.parsed.is_empty());
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn end_to_end_resolves_a_cross_function_call() {
        let inputs = vec![SourceInput::new(
            "src/a.kt",
            "package com.acme\n\nfun run() {\n    doThing()\n}\n\nfun doThing() {}\n",
        )];
        let options = AnalysisOptions::default();
        let result = analyze(&inputs, &options, &CancellationToken::new());
        assert_eq!(result.parsed.len(), 1);
        assert_eq!(result.parsed[0].resolved_calls.len(), 1);
        assert_eq!(result.parsed[0].resolved_calls[0].to_fqn, "com.acme.doThing");
    }

    #[test]
    fn cancellation_before_parse_yields_empty_result() {
        let inputs = vec![SourceInput::new("src/a.kt", "package com.acme\n")];
        let options = AnalysisOptions::default();
        let token = CancellationToken::new();
        token.cancel();
        let result = analyze(&inputs, &options, &token);
        assert!(result.parsed.is_empty());
    }

    #[test]
    fn unsupported_extension_is_skipped() {
        let inputs = vec![SourceInput::new("README.md", "# hi")];
        let options = AnalysisOptions::default();
        let result = analyze(&inputs, &options, &CancellationToken::new());
        assert!(result.parsed.is_empty());
    }
}
