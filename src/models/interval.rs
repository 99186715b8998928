//! Insurance interval model and the duration conventions.
//!
//! An [`InsuranceInterval`] is one declared coverage period from the source
//! register: a date range, the declared days/months/years, the money paid for
//! it and the fund/employer it belongs to.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Days counted for one declared month under the registry convention.
pub const REGISTRY_DAYS_PER_MONTH: Decimal = Decimal::from_parts(25, 0, 0, false, 0);

/// Days counted for one declared year under the registry convention.
pub const REGISTRY_DAYS_PER_YEAR: Decimal = Decimal::from_parts(300, 0, 0, false, 0);

/// Days counted for one declared month under the calendar convention.
pub const CALENDAR_DAYS_PER_MONTH: Decimal = Decimal::from_parts(30, 0, 0, false, 0);

/// Days counted for one declared year under the calendar convention.
pub const CALENDAR_DAYS_PER_YEAR: Decimal = Decimal::from_parts(360, 0, 0, false, 0);

/// How declared months and years are converted into days.
///
/// The stored [`InsuranceInterval::duration_days`] always uses
/// [`DurationConvention::Registry`]. Reports may be produced under
/// [`DurationConvention::Calendar`] instead; the choice is fixed for a whole
/// report run and passed explicitly.
///
/// # Example
///
/// ```
/// use coverage_audit::models::DurationConvention;
/// use rust_decimal::Decimal;
///
/// assert_eq!(DurationConvention::Registry.days_per_month(), Decimal::from(25));
/// assert_eq!(DurationConvention::Calendar.days_per_year(), Decimal::from(360));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationConvention {
    /// 25 days per month, 300 days per year.
    #[default]
    Registry,
    /// 30 days per month, 360 days per year.
    Calendar,
}

impl DurationConvention {
    /// Days counted for one declared month.
    pub fn days_per_month(self) -> Decimal {
        match self {
            DurationConvention::Registry => REGISTRY_DAYS_PER_MONTH,
            DurationConvention::Calendar => CALENDAR_DAYS_PER_MONTH,
        }
    }

    /// Days counted for one declared year.
    pub fn days_per_year(self) -> Decimal {
        match self {
            DurationConvention::Registry => REGISTRY_DAYS_PER_YEAR,
            DurationConvention::Calendar => CALENDAR_DAYS_PER_YEAR,
        }
    }
}

impl std::fmt::Display for DurationConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DurationConvention::Registry => write!(f, "25/300"),
            DurationConvention::Calendar => write!(f, "30/360"),
        }
    }
}

/// Combines declared quantities into a single day count.
///
/// Missing quantities count as zero. When `is_correction` is set the result is
/// forced negative so that reversal entries net out against the entries they
/// correct.
///
/// # Example
///
/// ```
/// use coverage_audit::models::{resolve_duration, DurationConvention};
/// use rust_decimal::Decimal;
///
/// let days = resolve_duration(
///     Some(Decimal::from(5)),
///     Some(Decimal::from(2)),
///     None,
///     DurationConvention::Registry,
///     false,
/// );
/// assert_eq!(days, Decimal::from(55));
///
/// let reversed = resolve_duration(None, Some(Decimal::from(1)), None, DurationConvention::Registry, true);
/// assert_eq!(reversed, Decimal::from(-25));
/// ```
pub fn resolve_duration(
    days: Option<Decimal>,
    months: Option<Decimal>,
    years: Option<Decimal>,
    convention: DurationConvention,
    is_correction: bool,
) -> Decimal {
    let total = days.unwrap_or(Decimal::ZERO)
        + months.unwrap_or(Decimal::ZERO) * convention.days_per_month()
        + years.unwrap_or(Decimal::ZERO) * convention.days_per_year();

    if is_correction { -total.abs() } else { total }
}

/// One declared coverage period.
///
/// Built once per source row and never mutated afterwards; the `with_*`
/// methods consume the interval and return an updated copy with the duration
/// re-resolved.
///
/// # Example
///
/// ```
/// use coverage_audit::models::InsuranceInterval;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let interval = InsuranceInterval::new(
///     NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2010, 3, 31).unwrap(),
/// )
/// .unwrap()
/// .with_fund("ΙΚΑ-ΕΤΑΜ")
/// .with_declared(None, Some(Decimal::from(3)), None)
/// .with_money(Decimal::from(3000), Decimal::from(600));
///
/// assert_eq!(interval.duration_days, Decimal::from(75));
/// assert_eq!(interval.month_span(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceInterval {
    /// Position of the source row this interval was built from.
    pub source_index: usize,
    /// First covered day (inclusive).
    pub start_date: NaiveDate,
    /// Last covered day (inclusive).
    pub end_date: NaiveDate,
    /// Declared days, if the row had a days value.
    pub days: Option<Decimal>,
    /// Declared months, if the row had a months value.
    pub months: Option<Decimal>,
    /// Declared years, if the row had a years value.
    pub years: Option<Decimal>,
    /// Canonical duration in days under the registry convention.
    pub duration_days: Decimal,
    /// Gross earnings in current currency (zero for legacy-currency rows).
    pub gross_earnings: Decimal,
    /// Total contributions in current currency (zero for legacy-currency rows).
    pub total_contributions: Decimal,
    /// Whether the row's amounts were stated in the legacy currency.
    pub legacy_currency: bool,
    /// The insurance fund name.
    pub fund_id: String,
    /// The insurance type (e.g. main or supplementary).
    pub insurance_type: String,
    /// The fund-specific coverage category code.
    pub coverage_category: String,
    /// The earnings type code.
    pub earnings_type_code: String,
    /// The employer identifier.
    pub employer_id: String,
}

impl InsuranceInterval {
    /// Creates an interval covering `start_date..=end_date` with no declared
    /// quantities, no money and empty categorical fields.
    ///
    /// Returns [`EngineError::InvalidInterval`] when `end_date` precedes
    /// `start_date`.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> EngineResult<Self> {
        if end_date < start_date {
            return Err(EngineError::InvalidInterval {
                start: start_date,
                end: end_date,
                message: "end date precedes start date".to_string(),
            });
        }

        Ok(Self {
            source_index: 0,
            start_date,
            end_date,
            days: None,
            months: None,
            years: None,
            duration_days: Decimal::ZERO,
            gross_earnings: Decimal::ZERO,
            total_contributions: Decimal::ZERO,
            legacy_currency: false,
            fund_id: String::new(),
            insurance_type: String::new(),
            coverage_category: String::new(),
            earnings_type_code: String::new(),
            employer_id: String::new(),
        })
    }

    /// Sets the declared days, months and years.
    pub fn with_declared(
        mut self,
        days: Option<Decimal>,
        months: Option<Decimal>,
        years: Option<Decimal>,
    ) -> Self {
        self.days = days;
        self.months = months;
        self.years = years;
        self.refresh_duration();
        self
    }

    /// Sets the current-currency gross earnings and contributions.
    pub fn with_money(mut self, gross_earnings: Decimal, total_contributions: Decimal) -> Self {
        self.gross_earnings = gross_earnings;
        self.total_contributions = total_contributions;
        self.refresh_duration();
        self
    }

    /// Marks the row as stated in the legacy currency.
    pub fn with_legacy_currency(mut self, legacy_currency: bool) -> Self {
        self.legacy_currency = legacy_currency;
        self
    }

    /// Sets the fund name.
    pub fn with_fund(mut self, fund_id: impl Into<String>) -> Self {
        self.fund_id = fund_id.into();
        self
    }

    /// Sets the insurance type.
    pub fn with_insurance_type(mut self, insurance_type: impl Into<String>) -> Self {
        self.insurance_type = insurance_type.into();
        self
    }

    /// Sets the coverage category code.
    pub fn with_coverage_category(mut self, coverage_category: impl Into<String>) -> Self {
        self.coverage_category = coverage_category.into();
        self
    }

    /// Sets the earnings type code.
    pub fn with_earnings_type(mut self, earnings_type_code: impl Into<String>) -> Self {
        self.earnings_type_code = earnings_type_code.into();
        self
    }

    /// Sets the employer identifier.
    pub fn with_employer(mut self, employer_id: impl Into<String>) -> Self {
        self.employer_id = employer_id.into();
        self
    }

    /// Sets the source row position.
    pub fn with_source_index(mut self, source_index: usize) -> Self {
        self.source_index = source_index;
        self
    }

    fn refresh_duration(&mut self) {
        self.duration_days = self.duration_in(DurationConvention::Registry);
    }

    /// Returns true if the row is a correction (reversal) entry, i.e. any of
    /// its current-currency amounts is negative.
    pub fn is_correction(&self) -> bool {
        self.gross_earnings < Decimal::ZERO || self.total_contributions < Decimal::ZERO
    }

    /// Resolves the duration in days under the given convention.
    pub fn duration_in(&self, convention: DurationConvention) -> Decimal {
        resolve_duration(
            self.days,
            self.months,
            self.years,
            convention,
            self.is_correction(),
        )
    }

    /// Number of calendar days from start to end, inclusive.
    pub fn calendar_span_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Number of calendar months the interval touches, counting both the
    /// start and the end month.
    pub fn month_span(&self) -> u32 {
        let start = self.start_date.year() * 12 + self.start_date.month0() as i32;
        let end = self.end_date.year() * 12 + self.end_date.month0() as i32;
        (end - start + 1).max(0) as u32
    }

    /// Iterates over the `(year, month)` pairs the interval touches.
    pub fn months_covered(&self) -> impl Iterator<Item = (i32, u32)> + use<> {
        let first = self.start_date.year() * 12 + self.start_date.month0() as i32;
        let last = self.end_date.year() * 12 + self.end_date.month0() as i32;
        (first..=last).map(|index| (index.div_euclid(12), index.rem_euclid(12) as u32 + 1))
    }
}
