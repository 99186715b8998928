//! Record-level consistency checks.
//!
//! These detectors look at single intervals whose money and duration disagree.
//! Both feed the unpaid-contributions finding.

use rust_decimal::Decimal;

use crate::models::InsuranceInterval;

/// Finds intervals with zero duration that still carry money.
///
/// # Example
///
/// ```
/// use coverage_audit::analysis::detect_zero_duration;
/// use coverage_audit::models::InsuranceInterval;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let d = NaiveDate::from_ymd_opt(2014, 4, 1).unwrap();
/// let interval = InsuranceInterval::new(d, d).unwrap()
///     .with_declared(Some(Decimal::ZERO), None, None)
///     .with_money(Decimal::from(300), Decimal::from(60));
///
/// assert_eq!(detect_zero_duration(&[interval]).len(), 1);
/// ```
pub fn detect_zero_duration(intervals: &[InsuranceInterval]) -> Vec<&InsuranceInterval> {
    intervals
        .iter()
        .filter(|i| i.duration_days.is_zero())
        .filter(|i| !i.gross_earnings.is_zero() || !i.total_contributions.is_zero())
        .collect()
}

/// Finds intervals with positive duration and gross but no contributions.
///
/// Legacy-currency rows are skipped because their amounts are not read.
pub fn detect_unpaid(intervals: &[InsuranceInterval]) -> Vec<&InsuranceInterval> {
    intervals
        .iter()
        .filter(|i| !i.legacy_currency)
        .filter(|i| i.duration_days > Decimal::ZERO && i.gross_earnings > Decimal::ZERO)
        .filter(|i| i.total_contributions.is_zero())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn interval(days: i64, gross: i64, contrib: i64) -> InsuranceInterval {
        let start = NaiveDate::from_ymd_opt(2014, 4, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2014, 4, 30).unwrap();
        InsuranceInterval::new(start, end)
            .unwrap()
            .with_declared(Some(Decimal::from(days)), None, None)
            .with_money(Decimal::from(gross), Decimal::from(contrib))
    }

    #[test]
    fn test_zero_duration_without_money_is_ignored() {
        assert!(detect_zero_duration(&[interval(0, 0, 0)]).is_empty());
    }

    #[test]
    fn test_zero_duration_with_contributions_only() {
        assert_eq!(detect_zero_duration(&[interval(0, 0, 50)]).len(), 1);
    }

    #[test]
    fn test_positive_duration_is_not_zero_duration() {
        assert!(detect_zero_duration(&[interval(25, 1000, 200)]).is_empty());
    }

    #[test]
    fn test_unpaid_interval() {
        let intervals = vec![interval(25, 1000, 0), interval(25, 1000, 200)];
        let unpaid = detect_unpaid(&intervals);
        assert_eq!(unpaid.len(), 1);
        assert!(unpaid[0].total_contributions.is_zero());
    }

    #[test]
    fn test_unpaid_skips_legacy_and_corrections() {
        let legacy = interval(25, 0, 0).with_legacy_currency(true);
        let correction = interval(25, -1000, 0);
        assert!(detect_unpaid(&[legacy, correction]).is_empty());
    }
}
