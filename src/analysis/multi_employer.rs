//! Multi-employer month detection.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{FundCategory, InsuranceInterval};
use crate::timeline::FundClassifier;

/// A month in which more than one employer declared regular pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiEmployerMonth {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1 to 12.
    pub month: u32,
    /// Distinct employer ids, sorted.
    pub employers: Vec<String>,
}

/// Detects months with more than one employer.
///
/// Only general-employment intervals with positive duration and one of the
/// recognized earnings type codes are considered. Each interval marks every
/// month it touches; blank employer ids are skipped.
pub fn detect_multi_employer_months(
    intervals: &[InsuranceInterval],
    classifier: &FundClassifier,
    earnings_types: &[String],
) -> Vec<MultiEmployerMonth> {
    let mut employers_by_month: BTreeMap<(i32, u32), BTreeSet<&str>> = BTreeMap::new();

    let eligible = intervals.iter().filter(|i| {
        i.duration_days > Decimal::ZERO
            && earnings_types
                .iter()
                .any(|code| code.trim() == i.earnings_type_code.trim())
            && classifier.is(
                FundCategory::GeneralEmployment,
                &i.fund_id,
                &i.coverage_category,
            )
    });

    for interval in eligible {
        let employer = interval.employer_id.trim();
        if employer.is_empty() {
            continue;
        }
        for period in interval.months_covered() {
            employers_by_month.entry(period).or_default().insert(employer);
        }
    }

    employers_by_month
        .into_iter()
        .filter(|(_, employers)| employers.len() > 1)
        .map(|((year, month), employers)| MultiEmployerMonth {
            year,
            month,
            employers: employers.into_iter().map(str::to_string).collect(),
        })
        .collect()
}
