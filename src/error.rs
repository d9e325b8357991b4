//! Error taxonomy. Structural failures use `thiserror`-derived enums and
//! propagate with `?`; everything else that the pipeline can route around
//! (an unresolved call, a single bad file) becomes a [`Diagnostic`] value
//! collected into the result instead of aborting the run (SPEC_FULL.md §7).

use crate::types::SourceLocation;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no parser registered for extension '{0}'")]
    UnsupportedExtension(String),

    #[error("{language} grammar failed to produce a usable tree for {path}")]
    GrammarFailure { language: &'static str, path: String },

    #[error("source file exceeded the recursion depth guard at {path}:{line}")]
    DepthExceeded { path: String, line: u32 },
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("duplicate fully-qualified name '{fqn}' in {path} after disambiguation")]
    DuplicateFqn { fqn: String, path: String },

    #[error("resolution context requested for unknown file '{0}'")]
    UnknownFile(String),
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("analysis run was cancelled")]
    Cancelled,
}

/// Non-fatal, per-file outcomes accumulated into `AnalysisResult::diagnostics`
/// rather than returned as errors. `UnresolvedReference` in particular is
/// the expected, common case for a best-effort polyglot analysis and is
/// never surfaced as a warning-level log (SPEC_FULL.md §7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    Parse {
        path: String,
        reason: String,
    },
    Invariant {
        path: String,
        detail: String,
    },
    Io {
        path: String,
        reason: String,
    },
    UnresolvedReference {
        path: String,
        name: String,
        location: SourceLocation,
    },
}

impl Diagnostic {
    pub fn path(&self) -> &str {
        match self {
            Diagnostic::Parse { path, .. }
            | Diagnostic::Invariant { path, .. }
            | Diagnostic::Io { path, .. }
            | Diagnostic::UnresolvedReference { path, .. } => path,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::Parse { path, reason } => write!(f, "parse error in {path}: {reason}"),
            Diagnostic::Invariant { path, detail } => {
                write!(f, "invariant violation in {path}: {detail}")
            }
            Diagnostic::Io { path, reason } => write!(f, "io error for {path}: {reason}"),
            Diagnostic::UnresolvedReference { path, name, .. } => {
                write!(f, "unresolved reference '{name}' in {path}")
            }
        }
    }
}
