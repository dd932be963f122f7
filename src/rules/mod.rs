//! Pattern catalog used by the heuristic scanner.

pub mod patterns;

use crate::types::Category;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Compiled program size cap for catalog patterns.
const REGEX_SIZE_LIMIT: usize = 1 << 20;

/// One catalog entry: a category, its matching rule and its weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternRule {
    /// Category this rule detects.
    pub category: Category,
    /// Regex pattern to match (as string for serialization).
    pub pattern: String,
    /// Points added once when the category matches.
    pub weight: u32,
    /// Short human-readable description.
    pub description: String,
}

impl PatternRule {
    /// Compile the regex pattern for this rule.
    pub fn compile(&self) -> Result<CompiledPattern, regex::Error> {
        let regex = RegexBuilder::new(&self.pattern)
            .size_limit(REGEX_SIZE_LIMIT)
            .build()?;
        Ok(CompiledPattern {
            rule: self.clone(),
            regex,
        })
    }
}

/// A rule with its compiled regex.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub rule: PatternRule,
    pub regex: Regex,
}

impl CompiledPattern {
    pub fn category(&self) -> Category {
        self.rule.category
    }

    pub fn weight(&self) -> u32 {
        self.rule.weight
    }

    /// Count non-overlapping matches in the given content.
    pub fn count_matches(&self, content: &str) -> usize {
        self.regex.find_iter(content).count()
    }
}

/// Immutable table of compiled catalog entries.
#[derive(Debug, Default)]
pub struct PatternCatalog {
    entries: Vec<CompiledPattern>,
}

impl PatternCatalog {
    fn shared_builtin() -> &'static Arc<PatternCatalog> {
        static BUILTIN: OnceLock<Arc<PatternCatalog>> = OnceLock::new();
        BUILTIN.get_or_init(|| Arc::new(Self::from_rules(patterns::builtin_rules())))
    }

    /// The built-in catalog, compiled once per process.
    pub fn builtin() -> &'static PatternCatalog {
        Self::shared_builtin()
    }

    /// Shared handle to the built-in catalog.
    pub fn builtin_shared() -> Arc<PatternCatalog> {
        Arc::clone(Self::shared_builtin())
    }

    /// Build a catalog from the built-in rules with some weights replaced.
    pub fn with_weights(overrides: &HashMap<Category, u32>) -> PatternCatalog {
        let rules = patterns::builtin_rules()
            .into_iter()
            .map(|mut rule| {
                if let Some(weight) = overrides.get(&rule.category) {
                    rule.weight = *weight;
                }
                rule
            })
            .collect();
        Self::from_rules(rules)
    }

    /// Compile a catalog. Rules that fail to compile are skipped.
    pub fn from_rules(rules: Vec<PatternRule>) -> PatternCatalog {
        let mut entries = Vec::with_capacity(rules.len());
        for rule in rules {
            match rule.compile() {
                Ok(compiled) => entries.push(compiled),
                Err(e) => {
                    tracing::warn!("Skipping catalog rule for {}: {}", rule.category, e);
                }
            }
        }
        PatternCatalog { entries }
    }

    /// Get all entries.
    pub fn entries(&self) -> &[CompiledPattern] {
        &self.entries
    }

    /// Weight of a category, or zero if the category has no entry.
    pub fn weight_of(&self, category: Category) -> u32 {
        self.entries
            .iter()
            .find(|e| e.category() == category)
            .map(|e| e.weight())
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
