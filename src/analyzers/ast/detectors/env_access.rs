//! Detector for environment and credential reads.
//!
//! Detects patterns like:
//! - `process.env.GITHUB_TOKEN`, `process.env['HOME']`, `JSON.stringify(process.env)`
//! - `os.environ["AWS_SECRET_ACCESS_KEY"]`, `os.getenv("HOME")`
//! - string literals naming credential files (`~/.ssh/id_rsa`)

use super::{Detector, SourceContext, SyntaxHit};
use crate::types::Category;
use tree_sitter::Node;

/// Variable name fragments that mark a secret.
const SECRET_MARKERS: &[&str] = &[
    "TOKEN",
    "SECRET",
    "PASSWORD",
    "PASSWD",
    "API_KEY",
    "APIKEY",
    "PRIVATE_KEY",
    "CREDENTIAL",
    "AUTH",
];

/// Path fragments of well-known credential stores.
const CREDENTIAL_FILES: &[&str] = &[
    ".ssh/",
    "id_rsa",
    "id_ed25519",
    ".aws/credentials",
    ".npmrc",
    ".netrc",
    ".pgpass",
    ".git-credentials",
    ".docker/config.json",
    ".kube/config",
];

const ENV_OBJECTS: &[&str] = &["process.env", "os.environ", "Bun.env"];

const ENV_GETTERS: &[&str] = &["os.getenv", "getenv", "os.environ.get", "Deno.env.get"];

pub struct EnvAccessDetector;

impl EnvAccessDetector {
    pub fn new() -> Self {
        Self
    }

    fn variable_hits(name: &str) -> Vec<SyntaxHit> {
        let mut hits = vec![SyntaxHit::new(
            Category::EnvironmentAccess,
            format!("read of environment variable {}", name),
        )];

        let upper = name.to_uppercase();
        if SECRET_MARKERS.iter().any(|m| upper.contains(m)) {
            hits.push(SyntaxHit::new(
                Category::CredentialAccess,
                format!("read of secret {}", name),
            ));
        }

        hits
    }

    /// `process.env.NAME` / `process.env['NAME']` / `os.environ['NAME']`.
    fn keyed_access(node: Node, ctx: &SourceContext) -> Option<Vec<SyntaxHit>> {
        let (object_field, key_field) = match node.kind() {
            "member_expression" => ("object", "property"),
            "subscript_expression" => ("object", "index"),
            "subscript" => ("value", "subscript"),
            _ => return None,
        };

        let object = ctx.text(node.child_by_field_name(object_field)?)?;
        if !ENV_OBJECTS.contains(&object) {
            return None;
        }

        let key = node.child_by_field_name(key_field)?;
        let name = if node.kind() == "member_expression" {
            ctx.text(key)?.to_string()
        } else {
            ctx.string_value(key)?
        };

        Some(Self::variable_hits(&name))
    }

    /// A bare `process.env` / `os.environ` that is not indexed further.
    fn whole_environment(node: Node, ctx: &SourceContext) -> Option<SyntaxHit> {
        if !matches!(node.kind(), "member_expression" | "attribute") {
            return None;
        }
        if !ENV_OBJECTS.contains(&ctx.text(node)?) {
            return None;
        }

        if let Some(parent) = node.parent() {
            let object_field = match parent.kind() {
                "member_expression" | "subscript_expression" | "attribute" => Some("object"),
                "subscript" => Some("value"),
                _ => None,
            };
            if let Some(field) = object_field {
                if parent.child_by_field_name(field) == Some(node) {
                    return None;
                }
            }
        }

        Some(SyntaxHit::new(
            Category::EnvironmentAccess,
            "read of entire environment",
        ))
    }

    /// `os.getenv('NAME')` and friends.
    fn getter_call(node: Node, ctx: &SourceContext) -> Option<Vec<SyntaxHit>> {
        let callee = ctx.callee_path(node.child_by_field_name("function")?)?;
        if !ENV_GETTERS.contains(&callee.as_str()) {
            return None;
        }
        let name = ctx.string_value(ctx.first_argument(node)?)?;
        Some(Self::variable_hits(&name))
    }

    fn credential_file(node: Node, ctx: &SourceContext) -> Option<SyntaxHit> {
        let text = ctx.text(node)?;
        let marker = CREDENTIAL_FILES.iter().find(|m| text.contains(*m))?;
        Some(SyntaxHit::new(
            Category::CredentialAccess,
            format!("reference to credential file {}", marker),
        ))
    }
}

impl Default for EnvAccessDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for EnvAccessDetector {
    fn name(&self) -> &'static str {
        "env-access"
    }

    fn handles_node_type(&self, node_type: &str) -> bool {
        matches!(
            node_type,
            "member_expression"
                | "subscript_expression"
                | "attribute"
                | "subscript"
                | "call_expression"
                | "call"
                | "string"
                | "template_string"
        )
    }

    fn analyze(&self, node: Node, ctx: &SourceContext) -> Vec<SyntaxHit> {
        match node.kind() {
            "call_expression" | "call" => Self::getter_call(node, ctx).unwrap_or_default(),
            "string" | "template_string" => Self::credential_file(node, ctx).into_iter().collect(),
            _ => {
                if let Some(hits) = Self::keyed_access(node, ctx) {
                    return hits;
                }
                Self::whole_environment(node, ctx).into_iter().collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_names_raise_credential_hits() {
        let hits = EnvAccessDetector::variable_hits("GITHUB_TOKEN");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[1].category, Category::CredentialAccess);

        let hits = EnvAccessDetector::variable_hits("HOME");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].category, Category::EnvironmentAccess);
    }
}
