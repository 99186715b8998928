//! Retention ratio analysis.
//!
//! The retention ratio is contributions over ceiling-adjusted gross earnings.
//! A low ratio suggests contributions were under-declared.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ceiling::CeilingAssessment;

/// The retention check for one allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionAssessment {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1 to 12.
    pub month: u32,
    /// Position of the source row.
    pub source_index: usize,
    /// Fund name of the source row.
    pub fund_id: String,
    /// Contributions for the month.
    pub contrib_share: Decimal,
    /// Gross earnings capped at the ceiling.
    pub adjusted_gross: Decimal,
    /// Contributions over adjusted gross.
    pub ratio: Decimal,
    /// Whether the ratio is below the threshold.
    pub is_low: bool,
}

/// Computes the retention ratio; zero when adjusted gross is not positive.
///
/// A quotient too large for a decimal saturates at `Decimal::MAX` (or `MIN`).
///
/// # Example
///
/// ```
/// use coverage_audit::analysis::retention_ratio;
/// use rust_decimal::Decimal;
///
/// assert_eq!(retention_ratio(Decimal::from(200), Decimal::from(1000)), Decimal::new(2, 1));
/// assert_eq!(retention_ratio(Decimal::from(200), Decimal::ZERO), Decimal::ZERO);
/// ```
pub fn retention_ratio(contributions: Decimal, adjusted_gross: Decimal) -> Decimal {
    if adjusted_gross > Decimal::ZERO {
        contributions
            .checked_div(adjusted_gross)
            .unwrap_or(if contributions < Decimal::ZERO { Decimal::MIN } else { Decimal::MAX })
    } else {
        Decimal::ZERO
    }
}

/// Evaluates retention for each ceiling assessment.
pub fn analyze_retention(
    assessments: &[CeilingAssessment],
    threshold: Decimal,
) -> Vec<RetentionAssessment> {
    assessments
        .iter()
        .map(|a| {
            let ratio = retention_ratio(a.contrib_share, a.adjusted_gross);
            RetentionAssessment {
                year: a.year,
                month: a.month,
                source_index: a.source_index,
                fund_id: a.fund_id.clone(),
                contrib_share: a.contrib_share,
                adjusted_gross: a.adjusted_gross,
                ratio,
                is_low: ratio < threshold,
            }
        })
        .collect()
}
