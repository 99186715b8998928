//! Aggregated interval listing.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::InsuranceInterval;
use crate::timeline::MonthAllocator;

/// A source row declared as a lump sum over several months.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedInterval {
    /// Position of the source row.
    pub source_index: usize,
    /// Fund name of the source row.
    pub fund_id: String,
    /// First covered day.
    pub start_date: NaiveDate,
    /// Last covered day.
    pub end_date: NaiveDate,
    /// Number of calendar months the row was spread over.
    pub month_span: u32,
    /// Canonical duration of the row.
    pub duration_days: Decimal,
}

/// Lists the intervals the allocator flags as synthetic aggregates.
pub fn find_aggregated_intervals(
    intervals: &[InsuranceInterval],
    allocator: &MonthAllocator,
) -> Vec<AggregatedInterval> {
    intervals
        .iter()
        .filter(|i| allocator.is_synthetic_aggregate(i))
        .map(|i| AggregatedInterval {
            source_index: i.source_index,
            fund_id: i.fund_id.clone(),
            start_date: i.start_date,
            end_date: i.end_date,
            month_span: i.month_span(),
            duration_days: i.duration_days,
        })
        .collect()
}
