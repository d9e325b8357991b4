//! Module-path inference (C3) for slash-separated languages (TS/JS).
//!
//! The algorithmic shape — extension stripping, trailing special-segment
//! handling, prefix matching against a known root list — is grounded on the
//! teacher's `indexing/resolver.rs::module_path_from_file` (which does the
//! analogous job for Rust's `::`-joined paths) and its
//! `parsing/javascript/jsconfig.rs` path-alias resolver, which tries
//! longest-prefix-first against a small ordered root list. Unlike the
//! teacher's `read_jsconfig`, nothing here reads a file from disk: the root
//! list is caller-supplied in-memory data (`AnalysisOptions::source_roots`).

const JS_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "cjs"];

/// Derives a stable module path for a TS/JS file given its filesystem path
/// and the ordered list of known source-root segments (longest-prefix-first
/// is achieved by the caller passing roots in priority order; we scan all
/// and prefer the longest matching prefix within the path itself).
pub fn module_path_from_file(file_path: &str, source_roots: &[&str]) -> String {
    let normalized = file_path.replace('\\', "/");
    let without_ext = strip_known_extension(&normalized);
    let segments: Vec<&str> = without_ext.split('/').filter(|s| !s.is_empty()).collect();
    let segments = drop_trailing_index(segments);

    if let Some(root_start) = find_longest_root_prefix(&segments, source_roots) {
        segments[root_start..].join("/")
    } else {
        segments.join("/")
    }
}

fn strip_known_extension(path: &str) -> &str {
    for ext in JS_EXTENSIONS {
        let suffix = format!(".{ext}");
        if let Some(stripped) = path.strip_suffix(&suffix) {
            return stripped;
        }
    }
    path
}

/// Drops a trailing `index` segment (`foo/index` → `foo`), matching how a
/// bundler resolves a directory import to its index file.
fn drop_trailing_index(segments: Vec<&str>) -> Vec<&str> {
    if segments.len() > 1 && *segments.last().unwrap() == "index" {
        segments[..segments.len() - 1].to_vec()
    } else {
        segments
    }
}

/// Finds the start index of the longest known root segment occurring in
/// `segments`, trying each candidate root and preferring the one that
/// starts latest (closest to the file) among exact segment matches, which
/// in practice means the deepest nested root wins when roots overlap.
fn find_longest_root_prefix(segments: &[&str], source_roots: &[&str]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (idx, seg) in segments.iter().enumerate() {
        if source_roots.contains(seg) {
            best = Some(idx);
        }
    }
    best
}

/// Resolves a relative TS/JS import specifier (`./impl`, `../shared/util`)
/// against the file that contains it, returning a module path comparable
/// against [`crate::types::ParsedFile::module_path`] — i.e. it runs the
/// joined path back through the same extension-stripping/root-matching
/// rules `module_path_from_file` applies when a file is parsed, so a
/// relative specifier and the target file's own derived module path land on
/// the same string.
pub fn resolve_relative_to_module_path(importer_file_path: &str, relative: &str) -> String {
    let normalized = importer_file_path.replace('\\', "/");
    let dir = normalized.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");
    let mut segments: Vec<&str> = dir.split('/').filter(|s| !s.is_empty()).collect();

    for part in relative.split('/').filter(|s| !s.is_empty()) {
        match part {
            "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    module_path_from_file(&segments.join("/"), &["src", "lib"])
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOTS: &[&str] = &["src", "lib"];

    #[test]
    fn strips_extension_and_keeps_relative_path() {
        assert_eq!(
            module_path_from_file("project/src/billing/invoice.ts", ROOTS),
            "src/billing/invoice"
        );
    }

    #[test]
    fn drops_trailing_index_segment() {
        assert_eq!(
            module_path_from_file("project/src/billing/index.ts", ROOTS),
            "src/billing"
        );
    }

    #[test]
    fn falls_back_to_relative_path_without_known_root() {
        assert_eq!(
            module_path_from_file("billing/invoice.js", ROOTS),
            "billing/invoice"
        );
    }

    #[test]
    fn prefers_deepest_matching_root_when_roots_overlap() {
        let roots = &["src", "app"];
        assert_eq!(
            module_path_from_file("monorepo/src/app/billing/invoice.tsx", roots),
            "app/billing/invoice"
        );
    }

    #[test]
    fn caller_supplied_roots_are_honored() {
        let roots = &["packages"];
        assert_eq!(
            module_path_from_file("repo/packages/core/index.mjs", roots),
            "packages/core"
        );
    }

    #[test]
    fn relative_specifier_resolves_against_importer_directory() {
        assert_eq!(
            resolve_relative_to_module_path("src/app.ts", "./impl"),
            "src/impl"
        );
    }

    #[test]
    fn relative_specifier_pointing_at_directory_index_collapses_like_its_target() {
        assert_eq!(
            resolve_relative_to_module_path("src/app.ts", "./index"),
            "src"
        );
    }

    #[test]
    fn parent_relative_specifier_ascends_a_directory() {
        assert_eq!(
            resolve_relative_to_module_path("src/billing/invoice.ts", "../shared/util"),
            "src/shared/util"
        );
    }
}
