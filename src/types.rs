//! The shared intermediate representation produced by the parser layer (C2),
//! indexed by the symbol table builder (C4), and annotated by the resolver (C5).
//!
//! Every type here is value data: built once, read many times, never mutated
//! after its owning phase hands it off (see `SPEC_FULL.md` §3 Lifecycle).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The four source languages this crate understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Kotlin,
    Java,
    TypeScript,
    JavaScript,
}

impl Language {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "kt" | "kts" => Some(Language::Kotlin),
            "java" => Some(Language::Java),
            "ts" | "tsx" | "mts" | "cts" => Some(Language::TypeScript),
            "js" | "jsx" | "mjs" | "cjs" => Some(Language::JavaScript),
            _ => None,
        }
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::Kotlin => &["kt", "kts"],
            Language::Java => &["java"],
            Language::TypeScript => &["ts", "tsx", "mts", "cts"],
            Language::JavaScript => &["js", "jsx", "mjs", "cjs"],
        }
    }

    /// Whether this language builds FQNs by joining slash-separated module
    /// paths (TS/JS) rather than dot-separated packages (Kotlin/Java).
    pub fn is_slash_separated(&self) -> bool {
        matches!(self, Language::TypeScript | Language::JavaScript)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::Kotlin => "Kotlin",
            Language::Java => "Java",
            Language::TypeScript => "TypeScript",
            Language::JavaScript => "JavaScript",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Per-language defaults the symbol table builder and resolver consult
/// instead of sniffing file extensions at use sites (see `SPEC_FULL.md` §9).
#[derive(Debug, Clone, Copy)]
pub struct LanguageSpec {
    pub language: Language,
    /// Type substituted for an untyped parameter (`Any`/`Object`/`any`).
    pub default_param_type: &'static str,
    /// `.` for Kotlin/Java, `/` then `.` for TS/JS (see FQN construction rules).
    pub member_separator: char,
    pub implicit_wildcard_imports: &'static [&'static str],
}

impl LanguageSpec {
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::Kotlin => LanguageSpec {
                language,
                default_param_type: "Any",
                member_separator: '.',
                implicit_wildcard_imports: &[
                    "kotlin",
                    "kotlin.collections",
                    "kotlin.io",
                    "kotlin.text",
                    "kotlin.ranges",
                    "kotlin.sequences",
                ],
            },
            Language::Java => LanguageSpec {
                language,
                default_param_type: "Object",
                member_separator: '.',
                implicit_wildcard_imports: &["java.lang"],
            },
            Language::TypeScript | Language::JavaScript => LanguageSpec {
                language,
                default_param_type: "any",
                member_separator: '.',
                implicit_wildcard_imports: &[],
            },
        }
    }
}

/// A 1-based source range. Parsers emit `file_path=""`; the parser driver
/// back-fills it on every location before the tree leaves C2 (invariant:
/// no `SourceLocation` with an empty `file_path` reaches the resolver).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file_path: String,
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl SourceLocation {
    pub fn new(start_line: u32, start_column: u32, end_line: u32, end_column: u32) -> Self {
        Self {
            file_path: String::new(),
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    pub fn with_file_path(mut self, file_path: impl Into<String>) -> Self {
        self.file_path = file_path.into();
        self
    }

    /// Property test 1 (SPEC_FULL.md §8): 1-basedness.
    pub fn is_well_formed(&self) -> bool {
        self.start_line >= 1
            && self.start_column >= 1
            && self.end_line >= self.start_line
            && (self.end_line > self.start_line || self.end_column >= self.start_column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    Private,
    Protected,
    Internal,
}

impl Default for Visibility {
    fn default() -> Self {
        Visibility::Public
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedImport {
    pub path: String,
    pub alias: Option<String>,
    pub is_wildcard: bool,
    pub name: Option<String>,
    pub is_dynamic: bool,
    pub is_template_literal: bool,
}

impl ParsedImport {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: None,
            is_wildcard: false,
            name: None,
            is_dynamic: false,
            is_template_literal: false,
        }
    }

    /// The name this import binds locally under — the alias when present,
    /// otherwise the last path segment (property test 5, SPEC_FULL.md §8).
    pub fn local_name(&self) -> Option<&str> {
        if let Some(alias) = &self.alias {
            return Some(alias.as_str());
        }
        if let Some(name) = &self.name {
            return Some(name.as_str());
        }
        if self.is_wildcard || self.is_dynamic {
            return None;
        }
        self.path.rsplit(['.', '/']).next()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedReexport {
    pub source_path: String,
    pub original_name: Option<String>,
    pub exported_name: Option<String>,
    pub is_wildcard: bool,
    pub is_namespace_reexport: bool,
    pub is_type_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ParsedAnnotation {
    pub name: String,
    pub arguments: HashMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variance {
    In,
    Out,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTypeParameter {
    pub name: String,
    pub bounds: Vec<String>,
    pub variance: Option<Variance>,
    pub is_reified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedParameter {
    pub name: String,
    pub r#type: Option<String>,
    pub default_value: Option<String>,
    pub annotations: Vec<ParsedAnnotation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedProperty {
    pub name: String,
    pub r#type: Option<String>,
    pub visibility: Visibility,
    pub is_val: bool,
    pub initializer: Option<String>,
    pub annotations: Vec<ParsedAnnotation>,
    pub location: SourceLocation,
}

/// Whether a call target's receiver reached a null-safe suffix operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CallFlags {
    pub is_safe_call: bool,
    pub is_constructor_call: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCall {
    pub name: String,
    pub receiver: Option<String>,
    pub receiver_type: Option<String>,
    pub argument_count: u32,
    pub argument_types: Option<Vec<String>>,
    pub is_safe_call: bool,
    pub is_constructor_call: bool,
    pub location: SourceLocation,
}

impl ParsedCall {
    pub fn new(name: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            name: name.into(),
            receiver: None,
            receiver_type: None,
            argument_count: 0,
            argument_types: None,
            is_safe_call: false,
            is_constructor_call: false,
            location,
        }
    }
}

/// A secondary constructor's delegation target, kept as a discriminated
/// field rather than a synthetic `ParsedCall` (SPEC_FULL.md §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Delegation {
    #[default]
    None,
    This,
    Super,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedConstructor {
    pub parameters: Vec<ParsedParameter>,
    pub delegation: Delegation,
    pub body_calls: Vec<ParsedCall>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedFunction {
    pub name: String,
    pub visibility: Visibility,
    pub parameters: Vec<ParsedParameter>,
    pub return_type: Option<String>,
    pub is_abstract: bool,
    pub is_suspend: bool,
    pub is_extension: bool,
    pub receiver_type: Option<String>,
    pub is_inline: bool,
    pub is_infix: bool,
    pub is_operator: bool,
    pub type_parameters: Vec<ParsedTypeParameter>,
    pub annotations: Vec<ParsedAnnotation>,
    pub location: SourceLocation,
    pub calls: Vec<ParsedCall>,
}

impl ParsedFunction {
    pub fn new(name: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            parameters: Vec::new(),
            return_type: None,
            is_abstract: false,
            is_suspend: false,
            is_extension: false,
            receiver_type: None,
            is_inline: false,
            is_infix: false,
            is_operator: false,
            type_parameters: Vec::new(),
            annotations: Vec::new(),
            location,
            calls: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Object,
    Annotation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedClass {
    pub name: String,
    pub kind: ClassKind,
    pub visibility: Visibility,
    pub is_abstract: bool,
    pub is_data: bool,
    pub is_sealed: bool,
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub type_parameters: Vec<ParsedTypeParameter>,
    pub annotations: Vec<ParsedAnnotation>,
    pub properties: Vec<ParsedProperty>,
    pub functions: Vec<ParsedFunction>,
    pub nested_classes: Vec<ParsedClass>,
    pub companion_object: Option<Box<ParsedClass>>,
    pub secondary_constructors: Vec<ParsedConstructor>,
    pub permits: Vec<String>,
    pub location: SourceLocation,
}

impl ParsedClass {
    pub fn new(name: impl Into<String>, kind: ClassKind, location: SourceLocation) -> Self {
        Self {
            name: name.into(),
            kind,
            visibility: Visibility::Public,
            is_abstract: false,
            is_data: false,
            is_sealed: false,
            super_class: None,
            interfaces: Vec::new(),
            type_parameters: Vec::new(),
            annotations: Vec::new(),
            properties: Vec::new(),
            functions: Vec::new(),
            nested_classes: Vec::new(),
            companion_object: None,
            secondary_constructors: Vec::new(),
            permits: Vec::new(),
            location,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTypeAlias {
    pub name: String,
    pub target: String,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDestructuring {
    pub names: Vec<String>,
    pub source_type: Option<String>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedObjectExpression {
    pub implemented_types: Vec<String>,
    pub location: SourceLocation,
}

/// The uniform record produced by every language parser (C2's output type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedFile {
    pub file_path: String,
    pub language: Language,
    pub package_name: Option<String>,
    pub module_path: Option<String>,
    pub imports: Vec<ParsedImport>,
    pub reexports: Vec<ParsedReexport>,
    pub classes: Vec<ParsedClass>,
    pub top_level_functions: Vec<ParsedFunction>,
    pub top_level_properties: Vec<ParsedProperty>,
    pub type_aliases: Vec<ParsedTypeAlias>,
    pub destructuring_declarations: Vec<ParsedDestructuring>,
    pub object_expressions: Vec<ParsedObjectExpression>,
    /// Calls made directly at module scope (TS/JS module-initializer
    /// statements) rather than inside any function or class body — attached
    /// to a synthetic `<top>` function by the resolver (SPEC_FULL.md §4.5).
    pub module_level_calls: Vec<ParsedCall>,
}

impl ParsedFile {
    pub fn new(file_path: impl Into<String>, language: Language) -> Self {
        Self {
            file_path: file_path.into(),
            language,
            package_name: None,
            module_path: None,
            imports: Vec::new(),
            reexports: Vec::new(),
            classes: Vec::new(),
            top_level_functions: Vec::new(),
            top_level_properties: Vec::new(),
            type_aliases: Vec::new(),
            destructuring_declarations: Vec::new(),
            object_expressions: Vec::new(),
            module_level_calls: Vec::new(),
        }
    }

    /// The module/package prefix calls and declarations are rooted under:
    /// `module_path` for slash-separated languages, `package_name` otherwise.
    pub fn root_prefix(&self) -> Option<&str> {
        if self.language.is_slash_separated() {
            self.module_path.as_deref()
        } else {
            self.package_name.as_deref()
        }
    }

    /// Whether this looks like a test file by path/extension convention.
    /// Surfaced for callers; does not cause exclusion (SPEC_FULL.md §6).
    pub fn is_test_file(&self) -> bool {
        let lower = self.file_path.to_lowercase();
        lower.contains("/test/")
            || lower.contains("/tests/")
            || lower.ends_with("test.kt")
            || lower.ends_with("test.java")
            || lower.ends_with(".test.ts")
            || lower.ends_with(".test.tsx")
            || lower.ends_with(".test.js")
            || lower.ends_with(".spec.ts")
            || lower.ends_with(".spec.js")
    }
}

/// A value originating from a specific kind of declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    Class,
    Interface,
    Enum,
    Object,
    Annotation,
    Function,
    Property,
    Package,
}

/// A resolved call-site edge: `fromFqn` calls `toFqn` at `location`.
/// `toFqn` for constructors is `<TypeFqn>.<init>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedCall {
    pub from_fqn: String,
    pub to_fqn: String,
    pub location: SourceLocation,
}

/// A `ParsedFile` wrapped with the `ResolvedCall`s the resolver produced
/// from its call sites (C5's output type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedFile {
    pub file: ParsedFile,
    pub resolved_calls: Vec<ResolvedCall>,
}
