//! Monthly allocation model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One calendar month's even share of an interval's duration and money.
///
/// Allocations are derived from [`InsuranceInterval`](super::InsuranceInterval)s
/// on every run and carry the parent's categorical fields so that they can be
/// grouped without looking the parent up again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthAllocation {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1 to 12.
    pub month: u32,
    /// Source row position of the parent interval.
    pub source_index: usize,
    /// Parent fund name.
    pub fund_id: String,
    /// Parent insurance type.
    pub insurance_type: String,
    /// Parent coverage category code.
    pub coverage_category: String,
    /// Parent earnings type code.
    pub earnings_type_code: String,
    /// Parent employer identifier.
    pub employer_id: String,
    /// Parent duration under the run's convention.
    pub record_duration_days: Decimal,
    /// This month's share of the duration.
    pub days_share: Decimal,
    /// This month's share of the gross earnings.
    pub gross_share: Decimal,
    /// This month's share of the contributions.
    pub contrib_share: Decimal,
    /// Whether the parent looks like a reporting-system lump sum.
    pub is_synthetic_aggregate: bool,
}

impl MonthAllocation {
    /// Returns the `(year, month)` pair this allocation belongs to.
    pub fn period(&self) -> (i32, u32) {
        (self.year, self.month)
    }
}
