use super::HookReport;
use crate::hooks::HookDescriptor;
use crate::types::ScanResult;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
pub struct JsonSummary {
    pub total: usize,
    pub safe: usize,
    pub warning: usize,
    pub dangerous: usize,
}

/// Serializable form of a [`HookReport`].
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub summary: JsonSummary,
    pub hooks: &'a [HookDescriptor],
    pub inline: &'a BTreeMap<String, ScanResult>,
}

impl<'a> From<&'a HookReport> for JsonReport<'a> {
    fn from(report: &'a HookReport) -> Self {
        let (safe, warning, dangerous) = report.counts();
        Self {
            summary: JsonSummary {
                total: safe + warning + dangerous,
                safe,
                warning,
                dangerous,
            },
            hooks: &report.hooks,
            inline: &report.inline,
        }
    }
}
