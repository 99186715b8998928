//! Fund history and insured cohort.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{InsuranceInterval, InsuredCohort};

/// The span of coverage recorded with one fund.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundSpan {
    /// Fund name as it appears in the records.
    pub fund_id: String,
    /// Earliest start date with this fund.
    pub first_start: NaiveDate,
    /// Latest end date with this fund.
    pub last_end: NaiveDate,
    /// Number of records.
    pub record_count: usize,
    /// Sum of canonical durations, corrections included.
    pub total_duration_days: Decimal,
}

/// Summarizes coverage per fund, ordered by first start then fund name.
///
/// Records without a fund name are left out.
pub fn summarize_fund_history(intervals: &[InsuranceInterval]) -> Vec<FundSpan> {
    let mut spans: HashMap<&str, FundSpan> = HashMap::new();

    for interval in intervals {
        let fund = interval.fund_id.trim();
        if fund.is_empty() {
            continue;
        }
        spans
            .entry(fund)
            .and_modify(|span| {
                span.first_start = span.first_start.min(interval.start_date);
                span.last_end = span.last_end.max(interval.end_date);
                span.record_count += 1;
                span.total_duration_days += interval.duration_days;
            })
            .or_insert_with(|| FundSpan {
                fund_id: fund.to_string(),
                first_start: interval.start_date,
                last_end: interval.end_date,
                record_count: 1,
                total_duration_days: interval.duration_days,
            });
    }

    let mut history: Vec<FundSpan> = spans.into_values().collect();
    history.sort_by(|a, b| {
        a.first_start
            .cmp(&b.first_start)
            .then_with(|| a.fund_id.cmp(&b.fund_id))
    });
    history
}

/// The cohort and the date it was decided from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortDetermination {
    /// Old or new insured.
    pub cohort: InsuredCohort,
    /// The earliest start date across all records.
    pub earliest_start: NaiveDate,
}

/// Determines the insured cohort from the earliest record.
///
/// Returns `None` when there are no records.
///
/// # Example
///
/// ```
/// use coverage_audit::analysis::determine_cohort;
/// use coverage_audit::models::{InsuranceInterval, InsuredCohort};
/// use chrono::NaiveDate;
///
/// let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
/// let intervals = vec![
///     InsuranceInterval::new(d(2001, 1, 1), d(2001, 12, 31)).unwrap(),
///     InsuranceInterval::new(d(1992, 5, 1), d(1992, 5, 31)).unwrap(),
/// ];
///
/// let cohort = determine_cohort(&intervals).unwrap();
/// assert_eq!(cohort.cohort, InsuredCohort::Old);
/// assert_eq!(cohort.earliest_start, d(1992, 5, 1));
/// ```
pub fn determine_cohort(intervals: &[InsuranceInterval]) -> Option<CohortDetermination> {
    let earliest_start = intervals.iter().map(|i| i.start_date).min()?;
    Some(CohortDetermination {
        cohort: InsuredCohort::from_first_insured(earliest_start),
        earliest_start,
    })
}
