//! Interval timeline construction.
//!
//! Turns reconciled rows into [`InsuranceInterval`](crate::models::InsuranceInterval)s,
//! classifies their funds and spreads them over calendar months.

mod allocation;
mod builder;
mod classification;

pub use allocation::{
    AGGREGATE_MIN_SPAN_DAYS, AggregateExemption, MonthAllocator, SEMESTER_DAY_TOLERANCE,
    SEMESTER_DAYS, SEMESTER_MONTHS, SEMESTER_SPAN_DAYS, SHORT_AGGREGATE_DAY_TOLERANCE,
    SHORT_AGGREGATE_MAX_MONTHS, SHORT_AGGREGATE_MAX_SPAN_DAYS, aggregate_cutoff_date,
    is_expected_semester_aggregate, is_expected_short_aggregate,
};
pub use builder::{SOURCE_DATE_FORMAT, build_interval, normalize_earnings_type, parse_source_date};
pub use classification::{CategoryRule, FundClassifier, fund_has_marker};
