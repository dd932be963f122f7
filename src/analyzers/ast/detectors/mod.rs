//! Structural detectors run over the syntax tree.
//!
//! Each detector looks at specific node kinds and reports hits in the same
//! category vocabulary as the pattern catalog.

mod call_target;
mod dynamic_exec;
mod env_access;
mod imports;
mod literal;

pub use call_target::CallTargetDetector;
pub use dynamic_exec::DynamicExecDetector;
pub use env_access::EnvAccessDetector;
pub use imports::ImportDetector;

use super::config::AstAnalyzerConfig;
use super::language::Language;
use crate::types::Category;
use tree_sitter::Node;

/// One structural match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxHit {
    pub category: Category,
    pub detail: String,
}

impl SyntaxHit {
    pub fn new(category: Category, detail: impl Into<String>) -> Self {
        Self {
            category,
            detail: detail.into(),
        }
    }

    /// Evidence string in the catalog vocabulary.
    pub fn evidence(&self) -> String {
        format!("{}: {}", self.category, self.detail)
    }
}

/// Source text and settings shared by detectors during one walk.
pub struct SourceContext<'a> {
    pub source: &'a str,
    pub language: Language,
    pub config: &'a AstAnalyzerConfig,
}

impl<'a> SourceContext<'a> {
    pub fn text(&self, node: Node) -> Option<&'a str> {
        node.utf8_text(self.source.as_bytes()).ok()
    }

    /// Dotted path of a callee such as `fs.promises.rm`.
    ///
    /// Segments that are not plain names are rendered as `<expr>`.
    pub fn callee_path(&self, node: Node) -> Option<String> {
        self.callee_path_at(node, 0)
    }

    fn callee_path_at(&self, node: Node, depth: usize) -> Option<String> {
        if depth > self.config.max_callee_depth {
            return None;
        }

        match node.kind() {
            "identifier" | "property_identifier" | "this" => self.text(node).map(str::to_string),
            "member_expression" | "attribute" => {
                let property_field = if node.kind() == "attribute" {
                    "attribute"
                } else {
                    "property"
                };
                let object = node.child_by_field_name("object")?;
                let property = self.text(node.child_by_field_name(property_field)?)?;
                let base = self
                    .callee_path_at(object, depth + 1)
                    .unwrap_or_else(|| "<expr>".to_string());
                Some(format!("{}.{}", base, property))
            }
            "parenthesized_expression" => self.callee_path_at(node.named_child(0)?, depth + 1),
            _ => None,
        }
    }

    /// First argument of a call, for both grammars.
    pub fn first_argument<'t>(&self, call: Node<'t>) -> Option<Node<'t>> {
        call.child_by_field_name("arguments")?.named_child(0)
    }

    /// Statically resolve a string-valued node.
    pub fn string_value(&self, node: Node) -> Option<String> {
        literal::resolve_string(node, self, 0)
    }
}

/// A detector that analyzes syntax nodes for specific risky constructs.
pub trait Detector: Send + Sync {
    /// Returns the detector name used in logs.
    fn name(&self) -> &'static str;

    /// Check if this detector should analyze a given node type.
    fn handles_node_type(&self, node_type: &str) -> bool;

    /// Analyze a node and return any hits.
    fn analyze(&self, node: Node, ctx: &SourceContext) -> Vec<SyntaxHit>;
}

/// Collection of all detectors.
pub struct DetectorSet {
    detectors: Vec<Box<dyn Detector>>,
}

impl DetectorSet {
    /// Create a new detector set with all built-in detectors.
    pub fn new() -> Self {
        Self {
            detectors: vec![
                Box::new(CallTargetDetector::new()),
                Box::new(ImportDetector::new()),
                Box::new(DynamicExecDetector::new()),
                Box::new(EnvAccessDetector::new()),
            ],
        }
    }

    /// Get all detectors that handle a specific node type.
    pub fn for_node_type<'s>(&'s self, node_type: &'s str) -> impl Iterator<Item = &'s dyn Detector> {
        self.detectors
            .iter()
            .filter(move |d| d.handles_node_type(node_type))
            .map(|d| d.as_ref())
    }
}

impl Default for DetectorSet {
    fn default() -> Self {
        Self::new()
    }
}
