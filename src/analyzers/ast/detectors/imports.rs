//! Detector for imports of high-risk modules.
//!
//! Detects patterns like:
//! - `require('child_process')` and `await import('node:fs')`
//! - `import { exec } from 'child_process'`
//! - `import subprocess` and `from os import system`

use super::{Detector, SourceContext, SyntaxHit};
use crate::types::Category;
use tree_sitter::Node;

/// High-risk Node.js modules (root name, without `node:`).
const JS_MODULES: &[&str] = &[
    "child_process",
    "fs",
    "net",
    "http",
    "https",
    "http2",
    "dgram",
    "dns",
    "tls",
    "vm",
    "os",
    "cluster",
    "worker_threads",
];

/// High-risk Python modules (top-level package).
const PYTHON_MODULES: &[&str] = &[
    "subprocess",
    "os",
    "socket",
    "shutil",
    "ctypes",
    "pickle",
    "marshal",
    "pty",
    "multiprocessing",
    "importlib",
];

pub struct ImportDetector;

impl ImportDetector {
    pub fn new() -> Self {
        Self
    }

    fn js_root(module: &str) -> &str {
        let module = module.strip_prefix("node:").unwrap_or(module);
        module.split('/').next().unwrap_or(module)
    }

    fn python_root(module: &str) -> &str {
        module.split('.').next().unwrap_or(module).trim()
    }

    fn check_js(module: &str, hits: &mut Vec<SyntaxHit>) {
        if JS_MODULES.contains(&Self::js_root(module)) {
            hits.push(SyntaxHit::new(
                Category::DangerousImport,
                format!("import of '{}'", module),
            ));
        }
    }

    fn check_python(module: &str, hits: &mut Vec<SyntaxHit>) {
        if PYTHON_MODULES.contains(&Self::python_root(module)) {
            hits.push(SyntaxHit::new(
                Category::DangerousImport,
                format!("import of '{}'", module),
            ));
        }
    }

    /// Module names of `import a, b.c as d`.
    fn python_import_names(node: Node, ctx: &SourceContext) -> Vec<String> {
        let mut cursor = node.walk();
        node.children_by_field_name("name", &mut cursor)
            .filter_map(|name| {
                let dotted = if name.kind() == "aliased_import" {
                    name.child_by_field_name("name")?
                } else {
                    name
                };
                ctx.text(dotted).map(str::to_string)
            })
            .collect()
    }
}

impl Default for ImportDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for ImportDetector {
    fn name(&self) -> &'static str {
        "imports"
    }

    fn handles_node_type(&self, node_type: &str) -> bool {
        matches!(
            node_type,
            "import_statement" | "call_expression" | "import_from_statement"
        )
    }

    fn analyze(&self, node: Node, ctx: &SourceContext) -> Vec<SyntaxHit> {
        let mut hits = Vec::new();

        match (ctx.language.is_javascript_family(), node.kind()) {
            (true, "import_statement") => {
                if let Some(module) = node
                    .child_by_field_name("source")
                    .and_then(|s| ctx.string_value(s))
                {
                    Self::check_js(&module, &mut hits);
                }
            }
            (true, "call_expression") => {
                let callee = match node.child_by_field_name("function") {
                    Some(c) => c,
                    None => return hits,
                };
                let is_loader = callee.kind() == "import"
                    || (callee.kind() == "identifier" && ctx.text(callee) == Some("require"));
                if !is_loader {
                    return hits;
                }
                if let Some(module) = ctx.first_argument(node).and_then(|a| ctx.string_value(a)) {
                    Self::check_js(&module, &mut hits);
                }
            }
            (false, "import_statement") => {
                for module in Self::python_import_names(node, ctx) {
                    Self::check_python(&module, &mut hits);
                }
            }
            (false, "import_from_statement") => {
                if let Some(module) = node
                    .child_by_field_name("module_name")
                    .and_then(|m| ctx.text(m))
                {
                    Self::check_python(module, &mut hits);
                }
            }
            _ => {}
        }

        hits
    }
}
