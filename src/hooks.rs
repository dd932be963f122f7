//! Hook descriptors and hook-file loading.

use crate::error::{Error, Result};
use crate::types::{HookKind, RiskLevel, ScanResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// A hook discovered in a project or stack.
///
/// `scan_result` and `risk_level` are derived from `content` on demand and are
/// not part of the hook's identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookDescriptor {
    pub name: String,
    pub kind: HookKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matcher: Option<String>,
    #[serde(skip_serializing)]
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_result: Option<ScanResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
}

impl PartialEq for HookDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.kind == other.kind
            && self.matcher == other.matcher
            && self.content == other.content
            && self.file_path == other.file_path
            && self.description == other.description
    }
}

impl HookDescriptor {
    /// Create an unscanned hook with its kind inferred from the name.
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            kind: HookKind::infer_from_filename(&name),
            name,
            matcher: None,
            content: content.into(),
            file_path: None,
            description: None,
            scan_result: None,
            risk_level: None,
        }
    }

    pub fn with_kind(mut self, kind: HookKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_matcher(mut self, matcher: impl Into<String>) -> Self {
        self.matcher = Some(matcher.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Load a hook from a file. Non-UTF-8 content is decoded lossily.
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let content = String::from_utf8_lossy(&bytes).into_owned();

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown");
        let name = path
            .file_stem()
            .and_then(|n| n.to_str())
            .unwrap_or(file_name)
            .to_string();

        Ok(Self {
            kind: HookKind::infer_from_filename(file_name),
            name,
            matcher: None,
            description: extract_description(&content),
            content,
            file_path: Some(path.display().to_string()),
            scan_result: None,
            risk_level: None,
        })
    }

    /// Risk level, derived from the scan result when not set explicitly.
    pub fn effective_risk_level(&self) -> Option<RiskLevel> {
        self.risk_level
            .or_else(|| self.scan_result.as_ref().map(ScanResult::risk_level))
    }
}

/// Description from a leading `// description: ...` or `# description: ...` line.
fn extract_description(content: &str) -> Option<String> {
    static DESCRIPTION: OnceLock<Option<Regex>> = OnceLock::new();
    let re = DESCRIPTION
        .get_or_init(|| Regex::new(r"(?i)^\s*(?://+|#+|\*)\s*@?description:\s*(.+?)\s*$").ok())
        .as_ref()?;

    content
        .lines()
        .take(20)
        .find_map(|line| re.captures(line))
        .map(|caps| caps[1].to_string())
}
