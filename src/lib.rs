//! hookguard: static risk scoring for agent lifecycle hooks.
//!
//! Hooks are small scripts (or inline snippets inside a settings document)
//! that run on lifecycle events such as `PreToolUse` or `SessionStart`. This
//! crate scores each one for risky capabilities: filesystem mutation, network
//! calls, process execution, dangerous imports and credential access.
//!
//! Two strategies run on every piece of text. A regex catalog always applies;
//! a tree-sitter pass (cargo feature `ast`) adds structural evidence when the
//! source parses. Their results are merged.
//!
//! ```no_run
//! use hookguard::{scan, ScanOptions, RiskLevel};
//!
//! let result = scan("console.log('hello')", &ScanOptions::default());
//! assert_eq!(result.risk_level(), RiskLevel::Safe);
//! ```

pub mod analyzers;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod hooks;
pub mod reporters;
pub mod rules;
pub mod scanner;
pub mod settings;
pub mod types;

pub use analyzers::{Language, SyntaxAnalyzer};
pub use error::{Error, Result};
pub use hooks::HookDescriptor;
pub use rules::PatternCatalog;
pub use scanner::{scan, scan_bytes, scan_configuration_tree, ScanConfig, ScanOptions, Scanner};
pub use settings::{collect_inline_snippets, AddressedSnippet};
pub use types::{classify, Category, HookKind, RiskLevel, ScanResult};
