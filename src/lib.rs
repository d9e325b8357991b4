//! Typed, cross-referenced code graph extraction for Kotlin, Java,
//! TypeScript, and JavaScript source trees.
//!
//! The crate is a library: callers hand it already-read `(path, source)`
//! pairs via [`analyze::analyze`] and get back a typed graph of files,
//! symbols, and resolved call edges. It performs no file I/O, no directory
//! walking, and carries no CLI.

pub mod analyze;
pub mod ast_util;
pub mod cancellation;
pub mod domain;
pub mod error;
pub mod logging;
pub mod module_path;
pub mod options;
pub mod parsing;
pub mod pattern;
pub mod resolve;
pub mod symbol;
pub mod types;

pub use analyze::{analyze, AnalysisResult, SourceInput};
pub use cancellation::CancellationToken;
pub use error::{AnalysisError, Diagnostic, ParseError, ResolveError};
pub use options::AnalysisOptions;
pub use types::{Language, ResolvedCall, ResolvedFile};
