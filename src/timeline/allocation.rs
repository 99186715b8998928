//! Month allocation and synthetic-aggregate detection.
//!
//! Each interval is spread evenly over the calendar months it touches. Old
//! reporting systems often declared many months as one row; such rows are
//! flagged as synthetic aggregates unless they match a known short-cycle
//! declaration pattern.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::config::{AuditConfig, ExemptionMarkers};
use crate::models::{DurationConvention, InsuranceInterval, MonthAllocation};

use super::classification::fund_has_marker;

// The thresholds below were fitted to observed register data rather than taken
// from a published rule; they are kept as named constants so they can be tuned.

/// Intervals ending on or after this date are never synthetic aggregates.
pub fn aggregate_cutoff_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2002, 1, 1).expect("valid cutoff date")
}

/// Calendar span, in days, above which a multi-month row may be an aggregate.
pub const AGGREGATE_MIN_SPAN_DAYS: i64 = 31;

/// Most declared months a short-cycle row may carry.
pub const SHORT_AGGREGATE_MAX_MONTHS: Decimal = Decimal::from_parts(2, 0, 0, false, 0);

/// Allowed distance between declared days and `months * 25` for short cycles.
pub const SHORT_AGGREGATE_DAY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 0);

/// Longest calendar span of a short-cycle row without declared days.
pub const SHORT_AGGREGATE_MAX_SPAN_DAYS: i64 = 62;

/// Declared months of a semester row.
pub const SEMESTER_MONTHS: Decimal = Decimal::from_parts(6, 0, 0, false, 0);

/// Expected declared days of a semester row.
pub const SEMESTER_DAYS: Decimal = Decimal::from_parts(150, 0, 0, false, 0);

/// Allowed distance between declared days and [`SEMESTER_DAYS`].
pub const SEMESTER_DAY_TOLERANCE: Decimal = Decimal::from_parts(2, 0, 0, false, 0);

/// Calendar span window of a semester row without declared days.
pub const SEMESTER_SPAN_DAYS: std::ops::RangeInclusive<i64> = 150..=190;

/// A named rule describing a legitimate multi-month declaration.
///
/// An exemption applies when the fund name contains one of its markers and its
/// predicate accepts the interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateExemption {
    /// Name used in logs and evidence.
    pub name: &'static str,
    /// Fund name markers the exemption is limited to.
    pub fund_markers: Vec<String>,
    /// Shape check on the interval.
    pub predicate: fn(&InsuranceInterval) -> bool,
}

impl AggregateExemption {
    /// Returns true if the exemption covers the interval.
    pub fn applies(&self, interval: &InsuranceInterval) -> bool {
        fund_has_marker(&interval.fund_id, &self.fund_markers) && (self.predicate)(interval)
    }

    /// Builds the standard exemption table from configured markers.
    pub fn standard(markers: &ExemptionMarkers) -> Vec<AggregateExemption> {
        vec![
            AggregateExemption {
                name: "expected_short_aggregate",
                fund_markers: markers.short_cycle_markers.clone(),
                predicate: is_expected_short_aggregate,
            },
            AggregateExemption {
                name: "expected_semester_aggregate",
                fund_markers: markers.semester_cycle_markers.clone(),
                predicate: is_expected_semester_aggregate,
            },
        ]
    }
}

/// One or two declared months whose days agree with the 25-day month.
pub fn is_expected_short_aggregate(interval: &InsuranceInterval) -> bool {
    let Some(months) = interval.months else {
        return false;
    };
    if months > SHORT_AGGREGATE_MAX_MONTHS {
        return false;
    }

    match interval.days {
        Some(days) => {
            let expected = months * DurationConvention::Registry.days_per_month();
            (days - expected).abs() <= SHORT_AGGREGATE_DAY_TOLERANCE
        }
        None => interval.calendar_span_days() <= SHORT_AGGREGATE_MAX_SPAN_DAYS,
    }
}

/// One half-year (January to June or July to December) declared as six months.
pub fn is_expected_semester_aggregate(interval: &InsuranceInterval) -> bool {
    let start = interval.start_date;
    let end = interval.end_date;

    let same_year = start.year() == end.year();
    let is_half_year =
        (start.month() == 1 && end.month() == 6) || (start.month() == 7 && end.month() == 12);
    if !same_year || !is_half_year {
        return false;
    }
    if interval.months != Some(SEMESTER_MONTHS) {
        return false;
    }

    match interval.days {
        Some(days) => (days - SEMESTER_DAYS).abs() <= SEMESTER_DAY_TOLERANCE,
        None => SEMESTER_SPAN_DAYS.contains(&interval.calendar_span_days()),
    }
}

/// Spreads intervals over calendar months.
///
/// # Example
///
/// ```
/// use coverage_audit::models::{DurationConvention, InsuranceInterval};
/// use coverage_audit::timeline::MonthAllocator;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let interval = InsuranceInterval::new(
///     NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2010, 3, 31).unwrap(),
/// )
/// .unwrap()
/// .with_declared(None, Some(Decimal::from(3)), None)
/// .with_money(Decimal::from(3000), Decimal::from(600));
///
/// let allocator = MonthAllocator::new(DurationConvention::Registry, vec![]);
/// let allocations = allocator.allocate(&interval);
///
/// assert_eq!(allocations.len(), 3);
/// assert!(allocations.iter().all(|a| a.days_share == Decimal::from(25)));
/// assert!(allocations.iter().all(|a| a.gross_share == Decimal::from(1000)));
/// ```
#[derive(Debug, Clone)]
pub struct MonthAllocator {
    convention: DurationConvention,
    exemptions: Vec<AggregateExemption>,
}

impl MonthAllocator {
    /// Creates an allocator with an explicit exemption table.
    pub fn new(convention: DurationConvention, exemptions: Vec<AggregateExemption>) -> Self {
        Self {
            convention,
            exemptions,
        }
    }

    /// Creates an allocator with the standard exemptions from configuration.
    pub fn from_config(config: &AuditConfig, convention: DurationConvention) -> Self {
        Self::new(
            convention,
            AggregateExemption::standard(config.exemption_markers()),
        )
    }

    /// Returns the convention durations are resolved under.
    pub fn convention(&self) -> DurationConvention {
        self.convention
    }

    /// Returns the name of the first exemption covering the interval.
    pub fn matching_exemption(&self, interval: &InsuranceInterval) -> Option<&'static str> {
        self.exemptions
            .iter()
            .find(|e| e.applies(interval))
            .map(|e| e.name)
    }

    /// Returns true if the interval looks like a reporting-system lump sum.
    pub fn is_synthetic_aggregate(&self, interval: &InsuranceInterval) -> bool {
        interval.month_span() > 1
            && interval.end_date < aggregate_cutoff_date()
            && interval.calendar_span_days() > AGGREGATE_MIN_SPAN_DAYS
            && self.matching_exemption(interval).is_none()
    }

    /// Allocates one interval, one entry per calendar month it touches.
    ///
    /// # Panics
    ///
    /// Panics if the interval ends before it starts; intervals built through
    /// [`InsuranceInterval::new`] never do.
    pub fn allocate(&self, interval: &InsuranceInterval) -> Vec<MonthAllocation> {
        assert!(
            interval.start_date <= interval.end_date,
            "interval {} ends before it starts ({} > {})",
            interval.source_index,
            interval.start_date,
            interval.end_date
        );

        let months = Decimal::from(interval.month_span());
        let duration = interval.duration_in(self.convention);
        let days_share = duration / months;
        let gross_share = interval.gross_earnings / months;
        let contrib_share = interval.total_contributions / months;
        let is_synthetic_aggregate = self.is_synthetic_aggregate(interval);

        interval
            .months_covered()
            .map(|(year, month)| MonthAllocation {
                year,
                month,
                source_index: interval.source_index,
                fund_id: interval.fund_id.clone(),
                insurance_type: interval.insurance_type.clone(),
                coverage_category: interval.coverage_category.clone(),
                earnings_type_code: interval.earnings_type_code.clone(),
                employer_id: interval.employer_id.clone(),
                record_duration_days: duration,
                days_share,
                gross_share,
                contrib_share,
                is_synthetic_aggregate,
            })
            .collect()
    }

    /// Allocates every interval, keeping interval order.
    pub fn allocate_all(&self, intervals: &[InsuranceInterval]) -> Vec<MonthAllocation> {
        intervals.iter().flat_map(|i| self.allocate(i)).collect()
    }
}
