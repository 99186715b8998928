//! The complete output of one audit run.

use serde::{Deserialize, Serialize};

use crate::config::ReportSettings;

use super::{AuditFinding, GapInterval, InsuranceInterval, MonthAllocation, ReportTable};

/// Everything one run of the engine produces.
///
/// Two runs over the same rows with the same settings produce equal reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    /// The settings the report was produced with.
    pub settings: ReportSettings,
    /// Canonical intervals, in source order.
    pub intervals: Vec<InsuranceInterval>,
    /// Monthly allocations, grouped by interval in source order.
    pub allocations: Vec<MonthAllocation>,
    /// Coverage gaps in chronological order.
    pub gaps: Vec<GapInterval>,
    /// Pivoted report tables, one per requested layout.
    pub tables: Vec<ReportTable>,
    /// Ordered audit findings.
    pub findings: Vec<AuditFinding>,
}

impl AuditReport {
    /// Returns the findings that need attention.
    pub fn flagged_findings(&self) -> impl Iterator<Item = &AuditFinding> {
        self.findings.iter().filter(|f| f.flagged)
    }
}
