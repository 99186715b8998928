//! Coverage gap model.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Average days per calendar month used to express gaps in months.
pub const AVERAGE_DAYS_PER_MONTH: Decimal = Decimal::from_parts(3044, 0, 0, false, 2);

/// Average days per calendar year used to express gaps in years.
pub const AVERAGE_DAYS_PER_YEAR: Decimal = Decimal::from_parts(36525, 0, 0, false, 2);

/// A period with no declared coverage.
///
/// Months and years describe elapsed calendar time and are rounded to two
/// decimal places; they are not contributory time.
///
/// # Example
///
/// ```
/// use coverage_audit::models::GapInterval;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let gap = GapInterval::new(
///     NaiveDate::from_ymd_opt(2011, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2011, 12, 31).unwrap(),
/// );
/// assert_eq!(gap.calendar_days, 365);
/// assert_eq!(gap.years, Decimal::new(100, 2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapInterval {
    /// First uncovered day.
    pub start_date: NaiveDate,
    /// Last uncovered day.
    pub end_date: NaiveDate,
    /// Number of uncovered calendar days, inclusive.
    pub calendar_days: i64,
    /// Approximate length in months.
    pub months: Decimal,
    /// Approximate length in years.
    pub years: Decimal,
}

impl GapInterval {
    /// Creates a gap covering `start_date..=end_date`.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        let calendar_days = (end_date - start_date).num_days() + 1;
        let days = Decimal::from(calendar_days);
        Self {
            start_date,
            end_date,
            calendar_days,
            months: (days / AVERAGE_DAYS_PER_MONTH).round_dp(2),
            years: (days / AVERAGE_DAYS_PER_YEAR).round_dp(2),
        }
    }
}
