//! Interval building from reconciled rows.
//!
//! This module turns one [`ReconciledRow`] into a canonical
//! [`InsuranceInterval`], resolving the declared duration and sign-correcting
//! reversal entries.

use chrono::NaiveDate;
use tracing::debug;

use crate::models::InsuranceInterval;
use crate::parsing::{
    CanonicalColumn, ReconciledRow, has_legacy_currency, parse_amount_with, parse_optional_amount,
};

/// The date format used by the source register.
pub const SOURCE_DATE_FORMAT: &str = "%d/%m/%Y";

/// Parses a `dd/mm/yyyy` date.
///
/// # Example
///
/// ```
/// use coverage_audit::timeline::parse_source_date;
/// use chrono::NaiveDate;
///
/// assert_eq!(parse_source_date("31/03/2010"), NaiveDate::from_ymd_opt(2010, 3, 31));
/// assert_eq!(parse_source_date("2010-03-31"), None);
/// assert_eq!(parse_source_date("31/02/2010"), None);
/// ```
pub fn parse_source_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), SOURCE_DATE_FORMAT).ok()
}

/// Builds an interval from a reconciled row.
///
/// Returns `None` when either date is missing or not `dd/mm/yyyy`, or when the
/// end date precedes the start date. Such rows are dropped, not escalated.
///
/// Gross earnings and contributions are read in current currency only; a row
/// stated in the legacy currency keeps zero amounts and sets
/// `legacy_currency`. A negative amount marks a correction entry, which forces
/// the duration negative.
///
/// # Example
///
/// ```
/// use coverage_audit::models::SourceRow;
/// use coverage_audit::parsing::ColumnReconciler;
/// use coverage_audit::timeline::build_interval;
/// use rust_decimal::Decimal;
///
/// let row = SourceRow::from_pairs([
///     ("Ταμείο", "ΙΚΑ-ΕΤΑΜ"),
///     ("Από", "01/01/2010"),
///     ("Έως", "31/03/2010"),
///     ("Μήνες", "3"),
///     ("Μικτές αποδοχές", "3.000,00"),
///     ("Συνολικές εισφορές", "600,00"),
/// ]);
/// let reconciled = ColumnReconciler::default().reconcile_row(&row);
/// let interval = build_interval(&reconciled, 0).unwrap();
///
/// assert_eq!(interval.duration_days, Decimal::from(75));
/// assert_eq!(interval.gross_earnings, Decimal::from(3000));
/// ```
pub fn build_interval(row: &ReconciledRow, source_index: usize) -> Option<InsuranceInterval> {
    let start = row.get(CanonicalColumn::StartDate).and_then(parse_source_date);
    let end = row.get(CanonicalColumn::EndDate).and_then(parse_source_date);

    let (start, end) = match (start, end) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            debug!(
                source_index,
                start = ?row.get(CanonicalColumn::StartDate),
                end = ?row.get(CanonicalColumn::EndDate),
                "Dropping row without valid dates"
            );
            return None;
        }
    };

    let interval = match InsuranceInterval::new(start, end) {
        Ok(interval) => interval,
        Err(err) => {
            debug!(source_index, error = %err, "Dropping row with inverted dates");
            return None;
        }
    };

    let gross_raw = row.get(CanonicalColumn::GrossEarnings).unwrap_or_default();
    let contributions_raw = row
        .get(CanonicalColumn::TotalContributions)
        .unwrap_or_default();
    let legacy_currency = has_legacy_currency(gross_raw) || has_legacy_currency(contributions_raw);

    Some(
        interval
            .with_source_index(source_index)
            .with_fund(row.text(CanonicalColumn::Fund))
            .with_insurance_type(row.text(CanonicalColumn::InsuranceType))
            .with_coverage_category(row.text(CanonicalColumn::CoverageCategory))
            .with_earnings_type(normalize_earnings_type(
                row.get(CanonicalColumn::EarningsType).unwrap_or_default(),
            ))
            .with_employer(row.text(CanonicalColumn::Employer))
            .with_declared(
                parse_optional_amount(row.get(CanonicalColumn::Days)),
                parse_optional_amount(row.get(CanonicalColumn::Months)),
                parse_optional_amount(row.get(CanonicalColumn::Years)),
            )
            .with_money(
                parse_amount_with(gross_raw, true),
                parse_amount_with(contributions_raw, true),
            )
            .with_legacy_currency(legacy_currency),
    )
}

/// Pads single-digit numeric earnings type codes to two digits.
///
/// # Example
///
/// ```
/// use coverage_audit::timeline::normalize_earnings_type;
///
/// assert_eq!(normalize_earnings_type("1"), "01");
/// assert_eq!(normalize_earnings_type(" 16 "), "16");
/// assert_eq!(normalize_earnings_type("ΑΠ"), "ΑΠ");
/// ```
pub fn normalize_earnings_type(code: &str) -> String {
    let code = code.trim();
    if code.len() == 1 && code.chars().all(|c| c.is_ascii_digit()) {
        format!("0{}", code)
    } else {
        code.to_string()
    }
}
