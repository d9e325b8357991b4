//! In-memory analysis configuration. No file format, no environment
//! variables, no profile merging lives in this crate — config *loading* is
//! a collaborator's concern (SPEC_FULL.md §1, §6, §10.3).

/// The directories excluded from analysis by default, regardless of
/// extension. Callers extend this set; they cannot shrink it.
pub const DEFAULT_EXCLUDED_DIRECTORIES: &[&str] = &[
    "node_modules",
    "build",
    "target",
    "dist",
    ".git",
    "out",
    ".gradle",
    ".idea",
];

/// The default source-root segments tried by module-path inference (C3),
/// longest-prefix-first, before falling back to the bare relative path.
pub const DEFAULT_SOURCE_ROOTS: &[&str] = &["src", "lib"];

#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Overrides the per-language default package-segment index domain
    /// inference (C6) clusters on.
    pub domain_segment_index: Option<usize>,
    /// Directory names to exclude from analysis, in addition to
    /// [`DEFAULT_EXCLUDED_DIRECTORIES`].
    pub excluded_directories: Vec<String>,
    /// Whether `require("x")` call expressions are extracted as imports.
    pub include_commonjs_requires: bool,
    /// Source-root segments fed to C3's longest-prefix matcher, in addition
    /// to [`DEFAULT_SOURCE_ROOTS`].
    pub source_roots: Vec<String>,
    /// Enables the depth-guard's debug trace and verbose per-phase spans.
    pub debug: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            domain_segment_index: None,
            excluded_directories: Vec::new(),
            include_commonjs_requires: true,
            source_roots: Vec::new(),
            debug: false,
        }
    }
}

impl AnalysisOptions {
    pub fn is_excluded_directory(&self, segment: &str) -> bool {
        DEFAULT_EXCLUDED_DIRECTORIES.contains(&segment)
            || self.excluded_directories.iter().any(|d| d == segment)
    }

    pub fn all_source_roots(&self) -> Vec<&str> {
        let mut roots: Vec<&str> = DEFAULT_SOURCE_ROOTS.to_vec();
        roots.extend(self.source_roots.iter().map(|s| s.as_str()));
        roots
    }

    /// Whether any path segment of `path` names an excluded directory.
    pub fn path_is_excluded(&self, path: &str) -> bool {
        path.split(['/', '\\']).any(|seg| self.is_excluded_directory(seg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_excluded_directories_catch_node_modules() {
        let opts = AnalysisOptions::default();
        assert!(opts.path_is_excluded("project/node_modules/pkg/index.js"));
        assert!(!opts.path_is_excluded("project/src/index.js"));
    }

    #[test]
    fn caller_supplied_exclusions_augment_defaults() {
        let mut opts = AnalysisOptions::default();
        opts.excluded_directories.push("vendor".to_string());
        assert!(opts.path_is_excluded("project/vendor/lib.ts"));
        assert!(opts.path_is_excluded("project/node_modules/lib.ts"));
    }
}
