//! Supplies placeholder FQNs for standard-library symbols so the resolver
//! never hard-codes stdlib names inline (SPEC_FULL.md §9). Each language's
//! provider only needs to answer "is this plausibly a stdlib call" — the
//! placeholder FQN it returns is never looked up in the symbol table, it's
//! a terminal resolution outcome.

use crate::types::Language;

pub trait StdlibProvider {
    /// Returns a stable placeholder FQN if `simple_name` is a well-known
    /// standard-library identifier for this language, `None` otherwise.
    fn resolve(&self, simple_name: &str) -> Option<String>;
}

pub struct KotlinStdlib;
pub struct JavaStdlib;
pub struct EcmaStdlib;

impl StdlibProvider for KotlinStdlib {
    fn resolve(&self, simple_name: &str) -> Option<String> {
        const NAMES: &[&str] = &[
            "println", "print", "listOf", "mapOf", "setOf", "arrayOf", "require", "check",
            "let", "apply", "also", "run", "with", "lazy",
        ];
        NAMES
            .contains(&simple_name)
            .then(|| format!("kotlin.{simple_name}"))
    }
}

impl StdlibProvider for JavaStdlib {
    fn resolve(&self, simple_name: &str) -> Option<String> {
        const NAMES: &[&str] = &["println", "print", "valueOf", "toString", "equals", "hashCode"];
        NAMES
            .contains(&simple_name)
            .then(|| format!("java.lang.{simple_name}"))
    }
}

impl StdlibProvider for EcmaStdlib {
    fn resolve(&self, simple_name: &str) -> Option<String> {
        const NAMES: &[&str] = &[
            "console", "log", "parseInt", "parseFloat", "setTimeout", "fetch", "JSON", "Promise",
        ];
        NAMES
            .contains(&simple_name)
            .then(|| format!("globalThis.{simple_name}"))
    }
}

pub fn provider_for(language: Language) -> Box<dyn StdlibProvider + Send + Sync> {
    match language {
        Language::Kotlin => Box::new(KotlinStdlib),
        Language::Java => Box::new(JavaStdlib),
        Language::TypeScript | Language::JavaScript => Box::new(EcmaStdlib),
    }
}
