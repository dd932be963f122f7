//! Combines heuristic and syntax results into one assessment.

use crate::types::{ScanResult, MAX_SCORE};

/// Merge a heuristic result with an optional syntax result.
///
/// Flags are OR'ed, evidence keeps heuristic items first and drops exact
/// duplicates, and the score is the larger of the two, clamped.
pub fn merge(heuristic: ScanResult, syntax: Option<ScanResult>) -> ScanResult {
    let Some(syntax) = syntax else {
        return heuristic;
    };

    let mut merged = heuristic;
    merged.has_file_system_access |= syntax.has_file_system_access;
    merged.has_network_access |= syntax.has_network_access;
    merged.has_process_execution |= syntax.has_process_execution;
    merged.has_dangerous_imports |= syntax.has_dangerous_imports;
    merged.has_credential_access |= syntax.has_credential_access;
    merged.evidence.extend(Vec::from(syntax.evidence));
    merged.score = merged.score.max(syntax.score).min(MAX_SCORE);
    merged
}
