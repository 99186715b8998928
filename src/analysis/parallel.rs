//! Parallel insurance detection.
//!
//! A month is parallel when two fund categories forming a configured pair
//! both carry positive days in it. Only years up to the configured cutoff are
//! audited.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{FundCategory, MonthAllocation};
use crate::timeline::FundClassifier;

/// One month of simultaneous coverage in a pair of categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelMonth {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1 to 12.
    pub month: u32,
    /// The configured pair that overlapped.
    pub categories: (FundCategory, FundCategory),
    /// Summed days in the first category.
    pub first_days: Decimal,
    /// Summed days in the second category.
    pub second_days: Decimal,
    /// Fund names that contributed to either side, sorted.
    pub funds: Vec<String>,
}

#[derive(Default)]
struct CategoryMonth {
    days: Decimal,
    funds: BTreeSet<String>,
}

/// Detects parallel months over the allocations.
///
/// Allocations are classified by fund name and coverage category code; an
/// allocation may count towards several categories. Months after
/// `cutoff_year` are ignored. Results are ordered by month, then by pair
/// order in `pairs`.
///
/// # Example
///
/// ```
/// use coverage_audit::analysis::detect_parallel_months;
/// use coverage_audit::config::ConfigLoader;
/// use coverage_audit::models::{DurationConvention, InsuranceInterval};
/// use coverage_audit::timeline::MonthAllocator;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::builtin().unwrap();
/// let config = loader.config();
/// let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
///
/// let salaried = InsuranceInterval::new(d(2015, 3, 1), d(2015, 3, 31)).unwrap()
///     .with_fund("ΙΚΑ-ΕΤΑΜ")
///     .with_declared(Some(Decimal::from(25)), None, None);
/// let self_employed = InsuranceInterval::new(d(2015, 3, 1), d(2015, 3, 31)).unwrap()
///     .with_fund("ΟΑΕΕ")
///     .with_coverage_category("Κ")
///     .with_declared(None, Some(Decimal::ONE), None);
///
/// let allocator = MonthAllocator::from_config(config, DurationConvention::Registry);
/// let allocations = allocator.allocate_all(&[salaried, self_employed]);
///
/// let parallel = detect_parallel_months(
///     &allocations,
///     config.classifier(),
///     config.parallel_pairs(),
///     config.parallel_cutoff_year(),
/// );
/// assert_eq!(parallel.len(), 1);
/// assert_eq!((parallel[0].year, parallel[0].month), (2015, 3));
/// ```
pub fn detect_parallel_months(
    allocations: &[MonthAllocation],
    classifier: &FundClassifier,
    pairs: &[(FundCategory, FundCategory)],
    cutoff_year: i32,
) -> Vec<ParallelMonth> {
    let mut by_month: BTreeMap<(i32, u32), BTreeMap<FundCategory, CategoryMonth>> =
        BTreeMap::new();

    for allocation in allocations.iter().filter(|a| a.year <= cutoff_year) {
        for category in classifier.classify(&allocation.fund_id, &allocation.coverage_category) {
            let entry = by_month
                .entry(allocation.period())
                .or_default()
                .entry(category)
                .or_default();
            entry.days += allocation.days_share;
            entry.funds.insert(allocation.fund_id.clone());
        }
    }

    let mut parallel = Vec::new();
    for ((year, month), categories) in &by_month {
        for &(first, second) in pairs {
            let (Some(a), Some(b)) = (categories.get(&first), categories.get(&second)) else {
                continue;
            };
            if a.days > Decimal::ZERO && b.days > Decimal::ZERO {
                parallel.push(ParallelMonth {
                    year: *year,
                    month: *month,
                    categories: (first, second),
                    first_days: a.days,
                    second_days: b.days,
                    funds: a.funds.union(&b.funds).cloned().collect(),
                });
            }
        }
    }

    parallel
}
