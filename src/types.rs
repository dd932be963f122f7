//! Core types shared by the scanners, the tree walker and the reporters.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Upper bound of every risk score.
pub const MAX_SCORE: u32 = 100;

/// Detection category of the pattern catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    DestructiveFileOp,
    FileWrite,
    SystemModification,
    NetworkCall,
    ProcessExecution,
    DangerousImport,
    CredentialAccess,
    EnvironmentAccess,
    DatabaseAccess,
    CryptoUse,
}

impl Category {
    /// Every category, in catalog order.
    pub const ALL: [Category; 10] = [
        Category::DestructiveFileOp,
        Category::FileWrite,
        Category::SystemModification,
        Category::NetworkCall,
        Category::ProcessExecution,
        Category::DangerousImport,
        Category::CredentialAccess,
        Category::EnvironmentAccess,
        Category::DatabaseAccess,
        Category::CryptoUse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::DestructiveFileOp => "destructive-file-op",
            Category::FileWrite => "file-write",
            Category::SystemModification => "system-modification",
            Category::NetworkCall => "network-call",
            Category::ProcessExecution => "process-execution",
            Category::DangerousImport => "dangerous-import",
            Category::CredentialAccess => "credential-access",
            Category::EnvironmentAccess => "environment-access",
            Category::DatabaseAccess => "database-access",
            Category::CryptoUse => "crypto-use",
        }
    }

    /// The boolean flag raised by evidence of this category, if any.
    pub fn flag(&self) -> Option<Flag> {
        match self {
            Category::DestructiveFileOp | Category::FileWrite | Category::SystemModification => {
                Some(Flag::FileSystemAccess)
            }
            Category::NetworkCall => Some(Flag::NetworkAccess),
            Category::ProcessExecution => Some(Flag::ProcessExecution),
            Category::DangerousImport => Some(Flag::DangerousImports),
            Category::CredentialAccess => Some(Flag::CredentialAccess),
            Category::EnvironmentAccess | Category::DatabaseAccess | Category::CryptoUse => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

/// Boolean capability flags carried by a [`ScanResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    FileSystemAccess,
    NetworkAccess,
    ProcessExecution,
    DangerousImports,
    CredentialAccess,
}

impl Flag {
    /// Field name in serialized results.
    pub fn as_str(&self) -> &'static str {
        match self {
            Flag::FileSystemAccess => "hasFileSystemAccess",
            Flag::NetworkAccess => "hasNetworkAccess",
            Flag::ProcessExecution => "hasProcessExecution",
            Flag::DangerousImports => "hasDangerousImports",
            Flag::CredentialAccess => "hasCredentialAccess",
        }
    }
}

/// Insertion-ordered, duplicate-free list of evidence strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct EvidenceSet {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl EvidenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an item, returning `false` if it was already present.
    pub fn insert(&mut self, item: impl Into<String>) -> bool {
        let item = item.into();
        if self.seen.contains(&item) {
            return false;
        }
        self.seen.insert(item.clone());
        self.items.push(item);
        true
    }

    pub fn extend<I, S>(&mut self, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for item in items {
            self.insert(item);
        }
    }

    pub fn contains(&self, item: &str) -> bool {
        self.seen.contains(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }
}

impl From<Vec<String>> for EvidenceSet {
    fn from(items: Vec<String>) -> Self {
        let mut set = EvidenceSet::new();
        set.extend(items);
        set
    }
}

impl From<EvidenceSet> for Vec<String> {
    fn from(set: EvidenceSet) -> Self {
        set.items
    }
}

impl<'a> IntoIterator for &'a EvidenceSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Risk assessment for one piece of hook text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub has_file_system_access: bool,
    pub has_network_access: bool,
    pub has_process_execution: bool,
    pub has_dangerous_imports: bool,
    pub has_credential_access: bool,
    pub evidence: EvidenceSet,
    pub score: u32,
}

impl ScanResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one piece of evidence for a category, raising its flag.
    pub fn record(&mut self, category: Category, evidence: impl Into<String>) {
        self.evidence.insert(evidence);
        if let Some(flag) = category.flag() {
            self.set_flag(flag);
        }
    }

    /// Add points to the score, saturating at [`MAX_SCORE`].
    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points).min(MAX_SCORE);
    }

    pub fn set_flag(&mut self, flag: Flag) {
        match flag {
            Flag::FileSystemAccess => self.has_file_system_access = true,
            Flag::NetworkAccess => self.has_network_access = true,
            Flag::ProcessExecution => self.has_process_execution = true,
            Flag::DangerousImports => self.has_dangerous_imports = true,
            Flag::CredentialAccess => self.has_credential_access = true,
        }
    }

    pub fn flag(&self, flag: Flag) -> bool {
        match flag {
            Flag::FileSystemAccess => self.has_file_system_access,
            Flag::NetworkAccess => self.has_network_access,
            Flag::ProcessExecution => self.has_process_execution,
            Flag::DangerousImports => self.has_dangerous_imports,
            Flag::CredentialAccess => self.has_credential_access,
        }
    }

    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_score(self.score)
    }

    /// True when nothing was detected.
    pub fn is_clean(&self) -> bool {
        self.score == 0 && self.evidence.is_empty()
    }
}

/// Categorical risk level derived from a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Safe,
    Warning,
    Dangerous,
}

impl RiskLevel {
    pub const WARNING_THRESHOLD: u32 = 30;
    pub const DANGEROUS_THRESHOLD: u32 = 70;

    pub fn from_score(score: u32) -> Self {
        if score >= Self::DANGEROUS_THRESHOLD {
            RiskLevel::Dangerous
        } else if score >= Self::WARNING_THRESHOLD {
            RiskLevel::Warning
        } else {
            RiskLevel::Safe
        }
    }

    /// Indicator glyph used in text reports.
    pub fn glyph(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "✓",
            RiskLevel::Warning => "⚠",
            RiskLevel::Dangerous => "✖",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Safe => write!(f, "safe"),
            RiskLevel::Warning => write!(f, "warning"),
            RiskLevel::Dangerous => write!(f, "dangerous"),
        }
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "safe" => Ok(RiskLevel::Safe),
            "warning" | "warn" => Ok(RiskLevel::Warning),
            "dangerous" | "danger" => Ok(RiskLevel::Dangerous),
            _ => Err(format!("Unknown risk level: {}", s)),
        }
    }
}

/// Map a score to its risk level.
pub fn classify(score: u32) -> RiskLevel {
    RiskLevel::from_score(score)
}

/// Lifecycle event a hook is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HookKind {
    #[default]
    PreToolUse,
    PostToolUse,
    SessionStart,
    SessionEnd,
    UserPromptSubmit,
    Notification,
    SubagentStop,
    PreCompact,
    Stop,
}

impl HookKind {
    /// Infer the kind from a file name by case-insensitive substring match.
    ///
    /// Underscores are treated as hyphens. Unrecognized names default to
    /// [`HookKind::PreToolUse`].
    pub fn infer_from_filename(name: &str) -> Self {
        let name = name.to_lowercase().replace('_', "-");
        let has = |needles: &[&str]| needles.iter().any(|n| name.contains(n));

        if has(&["pre-tool", "pretool"]) {
            HookKind::PreToolUse
        } else if has(&["post-tool", "posttool"]) {
            HookKind::PostToolUse
        } else if has(&["session-start", "sessionstart"]) {
            HookKind::SessionStart
        } else if has(&["session-end", "sessionend"]) {
            HookKind::SessionEnd
        } else if has(&["user-prompt", "userprompt", "prompt-submit"]) {
            HookKind::UserPromptSubmit
        } else if has(&["notification"]) {
            HookKind::Notification
        } else if has(&["subagent-stop", "subagentstop"]) {
            // checked before plain stop
            HookKind::SubagentStop
        } else if has(&["pre-compact", "precompact"]) {
            HookKind::PreCompact
        } else if has(&["stop"]) {
            HookKind::Stop
        } else {
            HookKind::PreToolUse
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HookKind::PreToolUse => "PreToolUse",
            HookKind::PostToolUse => "PostToolUse",
            HookKind::SessionStart => "SessionStart",
            HookKind::SessionEnd => "SessionEnd",
            HookKind::UserPromptSubmit => "UserPromptSubmit",
            HookKind::Notification => "Notification",
            HookKind::SubagentStop => "SubagentStop",
            HookKind::PreCompact => "PreCompact",
            HookKind::Stop => "Stop",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(0), RiskLevel::Safe);
        assert_eq!(classify(29), RiskLevel::Safe);
        assert_eq!(classify(30), RiskLevel::Warning);
        assert_eq!(classify(69), RiskLevel::Warning);
        assert_eq!(classify(70), RiskLevel::Dangerous);
        assert_eq!(classify(100), RiskLevel::Dangerous);
    }

    #[test]
    fn test_evidence_set_keeps_first_seen_order() {
        let mut set = EvidenceSet::new();
        assert!(set.insert("b"));
        assert!(set.insert("a"));
        assert!(!set.insert("b"));
        assert_eq!(set.as_slice(), &["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_record_sets_category_flag() {
        let mut result = ScanResult::new();
        result.record(Category::SystemModification, "system-modification: 1 occurrence(s)");
        assert!(result.has_file_system_access);
        assert!(!result.has_network_access);

        result.record(Category::CryptoUse, "crypto-use: 1 occurrence(s)");
        assert_eq!(result.evidence.len(), 2);
        assert!(!result.has_credential_access);
    }

    #[test]
    fn test_add_score_saturates() {
        let mut result = ScanResult::new();
        result.add_score(80);
        result.add_score(80);
        assert_eq!(result.score, MAX_SCORE);
    }

    #[test]
    fn test_scan_result_json_field_names() {
        let mut result = ScanResult::new();
        result.record(Category::NetworkCall, "network-call: 1 occurrence(s)");
        result.add_score(15);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["hasNetworkAccess"], true);
        assert_eq!(json["hasFileSystemAccess"], false);
        assert_eq!(json["evidence"][0], "network-call: 1 occurrence(s)");
        assert_eq!(json["score"], 15);

        let back: ScanResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("network-call".parse::<Category>().unwrap(), Category::NetworkCall);
        assert_eq!("CRYPTO_USE".parse::<Category>().unwrap(), Category::CryptoUse);
        assert!("teleport".parse::<Category>().is_err());
    }

    #[test]
    fn test_infer_hook_kind() {
        assert_eq!(HookKind::infer_from_filename("pre-tool-guard.js"), HookKind::PreToolUse);
        assert_eq!(HookKind::infer_from_filename("PreToolLint.ts"), HookKind::PreToolUse);
        assert_eq!(HookKind::infer_from_filename("post_tool_format.py"), HookKind::PostToolUse);
        assert_eq!(HookKind::infer_from_filename("SessionStart.sh"), HookKind::SessionStart);
        assert_eq!(HookKind::infer_from_filename("session-end.js"), HookKind::SessionEnd);
        assert_eq!(HookKind::infer_from_filename("user-prompt-check.js"), HookKind::UserPromptSubmit);
        assert_eq!(HookKind::infer_from_filename("notification.py"), HookKind::Notification);
        assert_eq!(HookKind::infer_from_filename("subagent-stop.js"), HookKind::SubagentStop);
        assert_eq!(HookKind::infer_from_filename("precompact.js"), HookKind::PreCompact);
        assert_eq!(HookKind::infer_from_filename("on-stop.sh"), HookKind::Stop);
        assert_eq!(HookKind::infer_from_filename("format.js"), HookKind::PreToolUse);
    }
}
