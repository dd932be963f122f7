//! Analysis strategies for hook source.

pub mod ast;
pub mod heuristic;
pub mod merge;

pub use ast::{syntax_capability, AstAnalyzerConfig, Language, SyntaxAnalyzer};
pub use heuristic::HeuristicScanner;
pub use merge::merge;
