//! Syntax-aware analysis of hook source.
//!
//! The syntax strategy is optional. When the `ast` feature is disabled, or no
//! grammar matches the hook, callers only see `None` and fall back to the
//! heuristic result.

pub mod config;
pub mod language;

#[cfg(feature = "ast")]
mod analyzer;
#[cfg(feature = "ast")]
pub mod detectors;

pub use config::AstAnalyzerConfig;
pub use language::Language;

#[cfg(feature = "ast")]
pub use analyzer::TreeSitterAnalyzer;

use crate::rules::PatternCatalog;
use crate::scanner::ScanOptions;
use crate::types::ScanResult;

/// A structural analyzer that may or may not produce a result for a source.
pub trait SyntaxAnalyzer: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Analyze a source. `None` means the strategy is unavailable for it.
    ///
    /// Category weights are read from `catalog` so both strategies score on
    /// the same scale.
    fn analyze(
        &self,
        source: &str,
        options: &ScanOptions,
        catalog: &PatternCatalog,
    ) -> Option<ScanResult>;
}

/// The syntax analyzer compiled into this build, if any.
#[cfg(feature = "ast")]
pub fn syntax_capability(config: AstAnalyzerConfig) -> Option<Box<dyn SyntaxAnalyzer>> {
    Some(Box::new(TreeSitterAnalyzer::new(config)))
}

/// The syntax analyzer compiled into this build, if any.
#[cfg(not(feature = "ast"))]
pub fn syntax_capability(_config: AstAnalyzerConfig) -> Option<Box<dyn SyntaxAnalyzer>> {
    tracing::debug!("Syntax analysis not compiled in, using heuristics only");
    None
}
