//! Configuration for AST-based analysis.

use super::language::Language;

/// Configuration for the AST analyzer.
#[derive(Debug, Clone)]
pub struct AstAnalyzerConfig {
    /// Enable JavaScript/TypeScript AST analysis.
    pub enable_javascript: bool,
    /// Enable Python AST analysis.
    pub enable_python: bool,
    /// Maximum source size to parse (in bytes).
    pub max_file_size: usize,
    /// Parse time budget per snippet, in microseconds.
    pub parse_timeout_micros: u64,
    /// Language assumed when neither a hint nor a shebang names one.
    pub default_language: Option<Language>,
    /// Maximum member-chain length resolved for a callee.
    pub max_callee_depth: usize,
    /// Maximum string concatenation chain length to resolve.
    pub max_concat_depth: usize,
}

impl Default for AstAnalyzerConfig {
    fn default() -> Self {
        Self {
            enable_javascript: true,
            enable_python: true,
            max_file_size: 1024 * 1024, // 1 MB
            parse_timeout_micros: 250_000,
            default_language: Some(Language::JavaScript),
            max_callee_depth: 16,
            max_concat_depth: 10,
        }
    }
}

impl AstAnalyzerConfig {
    /// Whether a grammar for this language is enabled.
    pub fn language_enabled(&self, language: Language) -> bool {
        match language {
            Language::JavaScript | Language::TypeScript | Language::Tsx => self.enable_javascript,
            Language::Python => self.enable_python,
            Language::Shell => false,
        }
    }
}
