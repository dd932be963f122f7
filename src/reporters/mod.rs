//! Report output for scan results.

mod json;
mod text;

pub use json::JsonReport;
pub use text::format_report;

use crate::hooks::HookDescriptor;
use crate::types::{RiskLevel, ScanResult};
use std::collections::BTreeMap;
use std::io::Write;
use std::str::FromStr;

/// Output format for reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "cli" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Scanned hook files plus scanned inline snippets, keyed by address.
#[derive(Debug, Default)]
pub struct HookReport {
    pub hooks: Vec<HookDescriptor>,
    pub inline: BTreeMap<String, ScanResult>,
}

impl HookReport {
    pub fn new(hooks: Vec<HookDescriptor>, inline: BTreeMap<String, ScanResult>) -> Self {
        Self { hooks, inline }
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty() && self.inline.is_empty()
    }

    /// Every risk level in the report.
    pub fn risk_levels(&self) -> impl Iterator<Item = RiskLevel> + '_ {
        self.hooks
            .iter()
            .filter_map(HookDescriptor::effective_risk_level)
            .chain(self.inline.values().map(ScanResult::risk_level))
    }

    /// Highest risk level in the report.
    pub fn max_risk_level(&self) -> Option<RiskLevel> {
        self.risk_levels().max()
    }

    /// Count hooks per risk level: (safe, warning, dangerous).
    pub fn counts(&self) -> (usize, usize, usize) {
        self.risk_levels()
            .fold((0, 0, 0), |(safe, warning, dangerous), level| match level {
                RiskLevel::Safe => (safe + 1, warning, dangerous),
                RiskLevel::Warning => (safe, warning + 1, dangerous),
                RiskLevel::Dangerous => (safe, warning, dangerous + 1),
            })
    }
}

/// Write a report in the given format.
pub fn report<W: Write>(report: &HookReport, format: OutputFormat, writer: &mut W) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            let rendered = format_report(&report.hooks, &report.inline);
            if rendered.is_empty() {
                writeln!(writer, "No hooks found.")?;
            } else {
                write!(writer, "{}", rendered)?;
            }
        }
        OutputFormat::Json => {
            let json = JsonReport::from(report);
            writeln!(writer, "{}", serde_json::to_string_pretty(&json)?)?;
        }
    }
    Ok(())
}
