use crate::hooks::HookDescriptor;
use crate::types::{RiskLevel, ScanResult};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Render a plain-text summary of scanned hooks.
///
/// File hooks come first, then inline snippets in address order. Returns an
/// empty string when there is nothing to report.
pub fn format_report(hooks: &[HookDescriptor], inline: &BTreeMap<String, ScanResult>) -> String {
    let mut out = String::new();

    if !hooks.is_empty() {
        out.push_str("Hook files:\n");
        for hook in hooks {
            let level = hook.effective_risk_level().unwrap_or(RiskLevel::Safe);
            let _ = writeln!(out, "  {} {} ({})", level.glyph(), hook.name, hook.kind);
            if let Some(result) = &hook.scan_result {
                for item in &result.evidence {
                    let _ = writeln!(out, "      - {}", item);
                }
            }
            if let Some(description) = &hook.description {
                let _ = writeln!(out, "      {}", description);
            }
        }
    }

    if !inline.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("Inline hooks:\n");
        for (address, result) in inline {
            let _ = writeln!(
                out,
                "  {} {} (score {})",
                result.risk_level().glyph(),
                address,
                result.score
            );
            for item in &result.evidence {
                let _ = writeln!(out, "      - {}", item);
            }
        }
    }

    out
}
