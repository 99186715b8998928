//! Audit finding models.
//!
//! Findings are the presentation-ready result of the audit pass. Each one
//! carries a short headline, a detail paragraph with concrete examples, a
//! suggested action and the structured evidence the text was written from.

use serde::{Deserialize, Serialize};

/// The kind of check a finding reports on.
///
/// The declaration order is the order in which findings are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCategory {
    /// Whether the person is an "old" (pre-1993) or "new" insured.
    OldOrNew,
    /// Which funds the person has been insured with and when.
    FundHistory,
    /// Periods with no declared coverage.
    Gaps,
    /// Records whose money and duration disagree.
    UnpaidContributions,
    /// Simultaneous coverage in two classified fund categories.
    ParallelInsurance,
    /// Months with more than one employer.
    MultiEmployer,
    /// Months where contributions are low relative to earnings.
    LowRetention,
    /// Months where earnings exceed the contribution ceiling.
    CeilingExcess,
    /// Rows declared as a lump sum over many months.
    AggregatedIntervals,
}

impl std::fmt::Display for FindingCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FindingCategory::OldOrNew => "Old or new insured",
            FindingCategory::FundHistory => "Fund history",
            FindingCategory::Gaps => "Coverage gaps",
            FindingCategory::UnpaidContributions => "Unpaid contributions",
            FindingCategory::ParallelInsurance => "Parallel insurance",
            FindingCategory::MultiEmployer => "Multiple employers",
            FindingCategory::LowRetention => "Low retention",
            FindingCategory::CeilingExcess => "Ceiling excess",
            FindingCategory::AggregatedIntervals => "Aggregated intervals",
        };
        write!(f, "{}", label)
    }
}

/// A single audit finding.
///
/// # Example
///
/// ```
/// use coverage_audit::models::{AuditFinding, FindingCategory};
///
/// let finding = AuditFinding {
///     id: "F03".to_string(),
///     category: FindingCategory::Gaps,
///     headline: "1 coverage gap found".to_string(),
///     detail: "01/01/2011 - 31/12/2011 (365 days)".to_string(),
///     suggested_action: "Check whether the period was insured elsewhere.".to_string(),
///     flagged: true,
///     evidence: serde_json::json!([{"start": "2011-01-01", "end": "2011-12-31"}]),
/// };
/// assert!(finding.flagged);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditFinding {
    /// Sequential identifier within one report (e.g. "F01").
    pub id: String,
    /// The check this finding reports on.
    pub category: FindingCategory,
    /// One-line summary.
    pub headline: String,
    /// Human-readable detail with concrete examples.
    pub detail: String,
    /// What the reviewer should do next.
    pub suggested_action: String,
    /// Whether the finding needs attention.
    pub flagged: bool,
    /// Structured examples backing the detail text.
    pub evidence: serde_json::Value,
}
