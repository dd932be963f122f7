//! Tree-sitter backed syntax analyzer.

use super::config::AstAnalyzerConfig;
use super::detectors::{DetectorSet, SourceContext, SyntaxHit};
use super::language::Language;
use super::SyntaxAnalyzer;
use crate::rules::PatternCatalog;
use crate::scanner::ScanOptions;
use crate::types::{Category, ScanResult};
use std::collections::HashSet;
use tree_sitter::{Parser, Tree};

pub struct TreeSitterAnalyzer {
    config: AstAnalyzerConfig,
    detectors: DetectorSet,
}

impl TreeSitterAnalyzer {
    pub fn new(config: AstAnalyzerConfig) -> Self {
        Self {
            config,
            detectors: DetectorSet::new(),
        }
    }

    fn grammar(language: Language) -> Option<tree_sitter::Language> {
        match language {
            Language::JavaScript => Some(tree_sitter_javascript::LANGUAGE.into()),
            Language::TypeScript => Some(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()),
            Language::Tsx => Some(tree_sitter_typescript::LANGUAGE_TSX.into()),
            Language::Python => Some(tree_sitter_python::LANGUAGE.into()),
            Language::Shell => None,
        }
    }

    /// Parse a source within the time budget.
    ///
    /// Returns `None` on grammar errors and timeouts. Trees with syntax errors
    /// are kept: detectors still run over the parts that were recovered.
    fn parse(&self, source: &str, language: Language) -> Option<Tree> {
        let grammar = Self::grammar(language)?;

        let mut parser = Parser::new();
        if let Err(e) = parser.set_language(&grammar) {
            tracing::warn!("Failed to load {} grammar: {}", language, e);
            return None;
        }
        // A zero timeout means "unlimited" to tree-sitter
        let budget = match self.config.parse_timeout_micros {
            0 => AstAnalyzerConfig::default().parse_timeout_micros,
            micros => micros,
        };
        parser.set_timeout_micros(budget);

        let Some(tree) = parser.parse(source, None) else {
            tracing::warn!(
                "Syntax analysis of {} source exceeded its time budget, using heuristics only",
                language
            );
            return None;
        };

        if tree.root_node().has_error() {
            tracing::debug!("Source has {} syntax errors, analyzing the recovered tree", language);
        }

        Some(tree)
    }

    /// Run every detector over every node of the source.
    pub fn collect_hits(&self, source: &str, language: Language) -> Option<Vec<SyntaxHit>> {
        let tree = self.parse(source, language)?;
        let ctx = SourceContext {
            source,
            language,
            config: &self.config,
        };

        let mut hits = Vec::new();
        let mut cursor = tree.walk();

        // Pre-order walk without recursion so deeply nested input cannot
        // exhaust the stack.
        'walk: loop {
            let node = cursor.node();
            for detector in self.detectors.for_node_type(node.kind()) {
                let found = detector.analyze(node, &ctx);
                if !found.is_empty() {
                    tracing::trace!(detector = detector.name(), count = found.len(), "syntax hits");
                }
                hits.extend(found);
            }

            if cursor.goto_first_child() {
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    continue 'walk;
                }
                if !cursor.goto_parent() {
                    break 'walk;
                }
            }
        }

        Some(hits)
    }
}

impl Default for TreeSitterAnalyzer {
    fn default() -> Self {
        Self::new(AstAnalyzerConfig::default())
    }
}

impl SyntaxAnalyzer for TreeSitterAnalyzer {
    fn name(&self) -> &'static str {
        "tree-sitter"
    }

    fn analyze(
        &self,
        source: &str,
        options: &ScanOptions,
        catalog: &PatternCatalog,
    ) -> Option<ScanResult> {
        if source.len() > self.config.max_file_size {
            tracing::debug!(
                "Source of {} bytes exceeds syntax analysis limit of {} bytes",
                source.len(),
                self.config.max_file_size
            );
            return None;
        }
        if source.contains('\0') {
            tracing::debug!("Source looks binary, skipping syntax analysis");
            return None;
        }

        let language = Language::resolve(
            options.language,
            options.filename_hint.as_deref(),
            source,
            self.config.default_language,
        )?;
        if !self.config.language_enabled(language) {
            return None;
        }

        let hits = self.collect_hits(source, language)?;

        let mut result = ScanResult::new();
        let mut scored: HashSet<Category> = HashSet::new();
        for hit in hits {
            result.record(hit.category, hit.evidence());
            if scored.insert(hit.category) {
                result.add_score(catalog.weight_of(hit.category));
            }
        }

        tracing::debug!(%language, score = result.score, "syntax analysis complete");
        Some(result)
    }
}
