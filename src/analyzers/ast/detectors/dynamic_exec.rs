//! Detector for dynamic code execution.
//!
//! Detects direct forms:
//! - `eval(code)`, `new Function(body)`, `setTimeout("code", 0)`
//! - Python `eval`, `exec`, `compile` and `__import__`
//!
//! and the obfuscated forms regex matching misses:
//! - `window['eval'](code)` - computed property access
//! - `window['ev' + 'al'](code)` - string concatenation
//! - `window["\x65\x76\x61\x6c"](code)` - escape sequences
//! - `(0, eval)(code)` - comma operator indirect call

use super::{Detector, SourceContext, SyntaxHit};
use crate::types::Category;
use tree_sitter::Node;

/// Dangerous global objects that can access dangerous functions.
const DANGEROUS_GLOBALS: &[&str] = &["window", "globalThis", "global", "self", "this"];

/// JavaScript functions that evaluate strings as code.
const JS_EVAL_FUNCTIONS: &[&str] = &["eval", "Function"];

/// Timers that evaluate a string first argument.
const JS_STRING_TIMERS: &[&str] = &["setTimeout", "setInterval", "setImmediate"];

/// Python builtins that evaluate or load code.
const PYTHON_EVAL_FUNCTIONS: &[&str] = &["eval", "exec", "compile", "__import__"];

fn is_dangerous_js_function(name: &str) -> bool {
    JS_EVAL_FUNCTIONS.contains(&name) || JS_STRING_TIMERS.contains(&name)
}

fn hit(detail: String) -> SyntaxHit {
    SyntaxHit::new(Category::ProcessExecution, detail)
}

pub struct DynamicExecDetector;

impl DynamicExecDetector {
    pub fn new() -> Self {
        Self
    }

    fn analyze_js_call(node: Node, ctx: &SourceContext) -> Option<SyntaxHit> {
        let callee = node.child_by_field_name("function")?;

        match callee.kind() {
            "identifier" => {
                let name = ctx.text(callee)?;
                if JS_EVAL_FUNCTIONS.contains(&name) {
                    return Some(hit(format!("dynamic code execution via {}", name)));
                }
                if JS_STRING_TIMERS.contains(&name) {
                    let first = ctx.first_argument(node)?;
                    if matches!(first.kind(), "string" | "template_string") {
                        return Some(hit(format!("string evaluated by {}", name)));
                    }
                }
                None
            }
            "member_expression" => {
                // window.eval(code)
                let object = ctx.text(callee.child_by_field_name("object")?)?;
                let property = ctx.text(callee.child_by_field_name("property")?)?;
                if DANGEROUS_GLOBALS.contains(&object) && JS_EVAL_FUNCTIONS.contains(&property) {
                    Some(hit(format!("dynamic code execution via {}.{}", object, property)))
                } else {
                    None
                }
            }
            "subscript_expression" => Self::check_subscript(callee, ctx),
            "parenthesized_expression" => Self::check_comma_operator(callee, ctx),
            _ => None,
        }
    }

    /// `window['eval']`, `window['ev' + 'al']`, `window["\x65val"]`.
    fn check_subscript(node: Node, ctx: &SourceContext) -> Option<SyntaxHit> {
        let object = ctx.text(node.child_by_field_name("object")?)?;
        if !DANGEROUS_GLOBALS.contains(&object) {
            return None;
        }

        let index = node.child_by_field_name("index")?;
        let property = ctx.string_value(index)?;
        if is_dangerous_js_function(&property) {
            Some(hit(format!("obfuscated access to {} on {}", property, object)))
        } else {
            None
        }
    }

    /// `(0, eval)(code)`: the last expression of the sequence is called.
    fn check_comma_operator(callee: Node, ctx: &SourceContext) -> Option<SyntaxHit> {
        let inner = callee.named_child(0)?;
        if inner.kind() != "sequence_expression" {
            return None;
        }

        let mut cursor = inner.walk();
        let target = inner.named_children(&mut cursor).last()?;
        if target.kind() != "identifier" {
            return None;
        }

        let name = ctx.text(target)?;
        if is_dangerous_js_function(name) {
            Some(hit(format!("indirect call to {}", name)))
        } else {
            None
        }
    }

    fn analyze_js_new(node: Node, ctx: &SourceContext) -> Option<SyntaxHit> {
        let constructor = node.child_by_field_name("constructor")?;
        if ctx.text(constructor)? == "Function" {
            Some(hit("dynamic code execution via new Function".to_string()))
        } else {
            None
        }
    }

    fn analyze_python_call(node: Node, ctx: &SourceContext) -> Option<SyntaxHit> {
        let callee = node.child_by_field_name("function")?;
        if callee.kind() != "identifier" {
            return None;
        }
        let name = ctx.text(callee)?;
        if PYTHON_EVAL_FUNCTIONS.contains(&name) {
            Some(hit(format!("dynamic code execution via {}", name)))
        } else {
            None
        }
    }
}

impl Default for DynamicExecDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for DynamicExecDetector {
    fn name(&self) -> &'static str {
        "dynamic-exec"
    }

    fn handles_node_type(&self, node_type: &str) -> bool {
        matches!(node_type, "call_expression" | "new_expression" | "call")
    }

    fn analyze(&self, node: Node, ctx: &SourceContext) -> Vec<SyntaxHit> {
        let found = match node.kind() {
            "call_expression" => Self::analyze_js_call(node, ctx),
            "new_expression" => Self::analyze_js_new(node, ctx),
            "call" => Self::analyze_python_call(node, ctx),
            _ => None,
        };

        found.into_iter().collect()
    }
}
