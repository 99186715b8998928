//! Contribution ceiling auditing.
//!
//! Earnings above the monthly ceiling (plafond) carry no contributions. Each
//! general-employment allocation with positive gross is compared against the
//! ceiling in force for its year, pro-rated for short records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::CeilingTables;
use crate::models::{FundCategory, InsuredCohort, MonthAllocation};
use crate::timeline::FundClassifier;

/// Days that make a full month for ceiling purposes.
pub const FULL_MONTH_DAYS: Decimal = Decimal::from_parts(25, 0, 0, false, 0);

/// The ceiling check for one allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CeilingAssessment {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1 to 12.
    pub month: u32,
    /// Position of the source row.
    pub source_index: usize,
    /// Fund name of the source row.
    pub fund_id: String,
    /// The allocation's gross earnings.
    pub gross_share: Decimal,
    /// The allocation's contributions.
    pub contrib_share: Decimal,
    /// The monthly ceiling in force, if the table covers the year.
    pub ceiling: Option<Decimal>,
    /// The ceiling after pro-rating for a short record.
    pub prorated_ceiling: Option<Decimal>,
    /// Gross earnings capped at the pro-rated ceiling.
    pub adjusted_gross: Decimal,
    /// Gross earnings above the pro-rated ceiling; zero when within it.
    pub excess: Decimal,
}

impl CeilingAssessment {
    /// Returns true if earnings exceeded the ceiling.
    pub fn has_excess(&self) -> bool {
        self.excess > Decimal::ZERO
    }
}

/// Pro-rates a monthly ceiling by the record's duration.
///
/// The duration is taken in absolute value and capped at [`FULL_MONTH_DAYS`];
/// below that the ceiling shrinks linearly.
///
/// # Example
///
/// ```
/// use coverage_audit::analysis::prorate_ceiling;
/// use rust_decimal::Decimal;
///
/// let ceiling = Decimal::from(5000);
/// assert_eq!(prorate_ceiling(ceiling, Decimal::from(75)), Decimal::from(5000));
/// assert_eq!(prorate_ceiling(ceiling, Decimal::from(10)), Decimal::from(2000));
/// assert_eq!(prorate_ceiling(ceiling, Decimal::from(-10)), Decimal::from(2000));
/// ```
pub fn prorate_ceiling(ceiling: Decimal, record_duration_days: Decimal) -> Decimal {
    let days = record_duration_days.abs().min(FULL_MONTH_DAYS);
    if days < FULL_MONTH_DAYS {
        ceiling * days / FULL_MONTH_DAYS
    } else {
        ceiling
    }
}

/// Checks one allocation against an optional ceiling.
///
/// Without a ceiling the gross share passes through unchanged with no excess.
pub fn assess_ceiling(allocation: &MonthAllocation, ceiling: Option<Decimal>) -> CeilingAssessment {
    let prorated_ceiling = ceiling.map(|c| prorate_ceiling(c, allocation.record_duration_days));
    let gross = allocation.gross_share;

    let (adjusted_gross, excess) = match prorated_ceiling {
        Some(limit) => (gross.min(limit), (gross - limit).max(Decimal::ZERO)),
        None => (gross, Decimal::ZERO),
    };

    CeilingAssessment {
        year: allocation.year,
        month: allocation.month,
        source_index: allocation.source_index,
        fund_id: allocation.fund_id.clone(),
        gross_share: gross,
        contrib_share: allocation.contrib_share,
        ceiling,
        prorated_ceiling,
        adjusted_gross,
        excess,
    }
}

/// Assesses every general-employment allocation with positive gross.
///
/// # Example
///
/// ```
/// use coverage_audit::analysis::audit_ceilings;
/// use coverage_audit::config::ConfigLoader;
/// use coverage_audit::models::{DurationConvention, InsuranceInterval, InsuredCohort};
/// use coverage_audit::timeline::MonthAllocator;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::builtin().unwrap();
/// let config = loader.config();
/// let interval = InsuranceInterval::new(
///     NaiveDate::from_ymd_opt(2015, 6, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2015, 6, 30).unwrap(),
/// )
/// .unwrap()
/// .with_fund("ΙΚΑ-ΕΤΑΜ")
/// .with_declared(Some(Decimal::from(25)), None, None)
/// .with_money(Decimal::from(9000), Decimal::from(1500));
///
/// let allocations = MonthAllocator::from_config(config, DurationConvention::Registry)
///     .allocate(&interval);
/// let assessments = audit_ceilings(
///     &allocations,
///     config.classifier(),
///     config.ceilings(),
///     InsuredCohort::New,
/// );
///
/// assert_eq!(assessments.len(), 1);
/// assert!(assessments[0].has_excess());
/// ```
pub fn audit_ceilings(
    allocations: &[MonthAllocation],
    classifier: &FundClassifier,
    ceilings: &CeilingTables,
    cohort: InsuredCohort,
) -> Vec<CeilingAssessment> {
    allocations
        .iter()
        .filter(|a| a.gross_share > Decimal::ZERO)
        .filter(|a| {
            classifier.is(
                FundCategory::GeneralEmployment,
                &a.fund_id,
                &a.coverage_category,
            )
        })
        .map(|a| assess_ceiling(a, ceilings.ceiling_for(cohort, a.year)))
        .collect()
}
