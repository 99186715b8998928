//! Timeline analyzers.
//!
//! Every analyzer is a pure function over intervals or monthly allocations.
//! The [`assembler`](crate::report) turns their results into findings.

mod aggregates;
mod ceiling;
mod gaps;
mod history;
mod multi_employer;
mod parallel;
mod records;
mod retention;

pub use aggregates::{AggregatedInterval, find_aggregated_intervals};
pub use ceiling::{
    CeilingAssessment, FULL_MONTH_DAYS, assess_ceiling, audit_ceilings, prorate_ceiling,
};
pub use gaps::{detect_gaps, detect_gaps_in_ranges};
pub use history::{CohortDetermination, FundSpan, determine_cohort, summarize_fund_history};
pub use multi_employer::{MultiEmployerMonth, detect_multi_employer_months};
pub use parallel::{ParallelMonth, detect_parallel_months};
pub use records::{detect_unpaid, detect_zero_duration};
pub use retention::{RetentionAssessment, analyze_retention, retention_ratio};
