//! Month-pivoted coverage tables.
//!
//! Allocations are grouped by the layout's key fields and pivoted into twelve
//! month columns of summed days, followed by gross earnings, contributions and
//! the contribution percentage. Each year closes with a total row and a blank
//! separator row.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::config::PivotLayout;
use crate::models::{Cell, Highlight, MonthAllocation, ReportTable};

/// Labels of the twelve month columns.
pub const MONTH_COLUMNS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Label of the year column.
pub const YEAR_COLUMN: &str = "Year";
/// Label of the summed gross earnings column.
pub const GROSS_COLUMN: &str = "Gross";
/// Label of the summed contributions column.
pub const CONTRIBUTIONS_COLUMN: &str = "Contributions";
/// Label of the contribution percentage column.
pub const PERCENT_COLUMN: &str = "%";

const HUNDRED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

impl PivotLayout {
    /// Table title for this layout.
    pub fn title(self) -> &'static str {
        match self {
            PivotLayout::Detailed => "Coverage by year, fund, employer and earnings type",
            PivotLayout::ByFund => "Coverage by year and fund",
        }
    }

    /// Labels of the grouping columns that follow the year column.
    pub fn key_columns(self) -> &'static [&'static str] {
        match self {
            PivotLayout::Detailed => &[
                "Fund",
                "Insurance type",
                "Employer",
                "Category",
                "Earnings type",
            ],
            PivotLayout::ByFund => &["Fund", "Insurance type"],
        }
    }

    /// Full column list for this layout.
    pub fn columns(self) -> Vec<String> {
        std::iter::once(YEAR_COLUMN)
            .chain(self.key_columns().iter().copied())
            .chain(MONTH_COLUMNS)
            .chain([GROSS_COLUMN, CONTRIBUTIONS_COLUMN, PERCENT_COLUMN])
            .map(str::to_string)
            .collect()
    }

    fn key_of(self, allocation: &MonthAllocation) -> Vec<String> {
        match self {
            PivotLayout::Detailed => vec![
                allocation.fund_id.clone(),
                allocation.insurance_type.clone(),
                allocation.employer_id.clone(),
                allocation.coverage_category.clone(),
                allocation.earnings_type_code.clone(),
            ],
            PivotLayout::ByFund => vec![
                allocation.fund_id.clone(),
                allocation.insurance_type.clone(),
            ],
        }
    }
}

#[derive(Default)]
struct PivotGroup {
    days: [Option<Decimal>; 12],
    synthetic: [bool; 12],
    gross: Decimal,
    contributions: Decimal,
}

/// Contribution percentage; `None` when gross is zero or the percentage
/// does not fit a decimal.
///
/// # Example
///
/// ```
/// use coverage_audit::report::contribution_percent;
/// use rust_decimal::Decimal;
///
/// assert_eq!(
///     contribution_percent(Decimal::from(200), Decimal::from(1000)),
///     Some(Decimal::from(20))
/// );
/// assert_eq!(contribution_percent(Decimal::from(200), Decimal::ZERO), None);
/// ```
pub fn contribution_percent(contributions: Decimal, gross: Decimal) -> Option<Decimal> {
    if gross.is_zero() {
        return None;
    }
    contributions
        .checked_div(gross)
        .and_then(|ratio| ratio.checked_mul(HUNDRED))
        .map(|percent| percent.round_dp(2))
}

/// Builds one pivot table.
///
/// Percentage cells below `highlight_threshold` (a ratio, e.g. 0.30) are
/// marked [`Highlight::LowRetention`]; month cells holding days from a
/// synthetic aggregate are marked [`Highlight::SyntheticAggregate`].
///
/// # Example
///
/// ```
/// use coverage_audit::config::PivotLayout;
/// use coverage_audit::models::{Cell, DurationConvention, InsuranceInterval};
/// use coverage_audit::report::build_pivot;
/// use coverage_audit::timeline::MonthAllocator;
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
/// let allocations = MonthAllocator::new(DurationConvention::Registry, vec![]).allocate(&interval);
///
/// let table = build_pivot(&allocations, PivotLayout::ByFund, Decimal::new(30, 2));
///
/// // One group row, the total row and the separator.
/// assert_eq!(table.row_count(), 3);
/// assert_eq!(table.cell(0, "Feb"), Some(&Cell::Amount(Decimal::from(25))));
/// assert_eq!(table.cell(1, "Year"), Some(&Cell::Text("Total 2010".to_string())));
/// ```
pub fn build_pivot(
    allocations: &[MonthAllocation],
    layout: PivotLayout,
    highlight_threshold: Decimal,
) -> ReportTable {
    let mut groups: BTreeMap<i32, BTreeMap<Vec<String>, PivotGroup>> = BTreeMap::new();

    for allocation in allocations {
        let group = groups
            .entry(allocation.year)
            .or_default()
            .entry(layout.key_of(allocation))
            .or_default();
        let slot = (allocation.month as usize).saturating_sub(1).min(11);
        *group.days[slot].get_or_insert(Decimal::ZERO) += allocation.days_share;
        group.synthetic[slot] |= allocation.is_synthetic_aggregate;
        group.gross += allocation.gross_share;
        group.contributions += allocation.contrib_share;
    }

    let columns = layout.columns();
    let width = columns.len();
    let mut table = ReportTable::new(layout.title(), columns);
    let low_percent = highlight_threshold * HUNDRED;

    for (year, year_groups) in &groups {
        let mut year_gross = Decimal::ZERO;
        let mut year_contributions = Decimal::ZERO;

        for (key, group) in year_groups {
            let mut cells = Vec::with_capacity(width);
            let mut mask = Vec::with_capacity(width);

            cells.push(Cell::Integer(i64::from(*year)));
            cells.extend(key.iter().map(|value| Cell::Text(value.clone())));
            mask.resize(cells.len(), Highlight::Plain);

            for (days, synthetic) in group.days.iter().zip(group.synthetic) {
                cells.push(days.map_or(Cell::Empty, |d| Cell::Amount(d.round_dp(2))));
                mask.push(if synthetic && days.is_some() {
                    Highlight::SyntheticAggregate
                } else {
                    Highlight::Plain
                });
            }

            push_money_cells(
                &mut cells,
                &mut mask,
                group.gross,
                group.contributions,
                low_percent,
            );
            table.push_row(cells, mask);

            year_gross += group.gross;
            year_contributions += group.contributions;
        }

        let mut cells = vec![Cell::Text(format!("Total {}", year))];
        cells.resize(width - 3, Cell::Empty);
        let mut mask = vec![Highlight::Plain; cells.len()];
        push_money_cells(
            &mut cells,
            &mut mask,
            year_gross,
            year_contributions,
            low_percent,
        );
        table.push_row(cells, mask);

        table.push_row(vec![Cell::Empty; width], vec![Highlight::Plain; width]);
    }

    table
}

fn push_money_cells(
    cells: &mut Vec<Cell>,
    mask: &mut Vec<Highlight>,
    gross: Decimal,
    contributions: Decimal,
    low_percent: Decimal,
) {
    cells.push(Cell::Amount(gross.round_dp(2)));
    cells.push(Cell::Amount(contributions.round_dp(2)));
    mask.extend([Highlight::Plain, Highlight::Plain]);

    match contribution_percent(contributions, gross) {
        Some(percent) => {
            cells.push(Cell::Amount(percent));
            mask.push(if percent < low_percent {
                Highlight::LowRetention
            } else {
                Highlight::Plain
            });
        }
        None => {
            cells.push(Cell::Empty);
            mask.push(Highlight::Plain);
        }
    }
}

/// Builds one table per requested layout, in order.
pub fn build_pivots(
    allocations: &[MonthAllocation],
    layouts: &[PivotLayout],
    highlight_threshold: Decimal,
) -> Vec<ReportTable> {
    layouts
        .iter()
        .map(|layout| build_pivot(allocations, *layout, highlight_threshold))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn allocation(year: i32, month: u32, employer: &str, days: &str, gross: &str, contrib: &str) -> MonthAllocation {
        MonthAllocation {
            year,
            month,
            source_index: 0,
            fund_id: "ΙΚΑ-ΕΤΑΜ".to_string(),
            insurance_type: "Κύρια".to_string(),
            coverage_category: "0101".to_string(),
            earnings_type_code: "01".to_string(),
            employer_id: employer.to_string(),
            record_duration_days: dec(days),
            days_share: dec(days),
            gross_share: dec(gross),
            contrib_share: dec(contrib),
            is_synthetic_aggregate: false,
        }
    }

    #[test]
    fn test_columns_per_layout() {
        assert_eq!(PivotLayout::Detailed.columns().len(), 1 + 5 + 12 + 3);
        assert_eq!(PivotLayout::ByFund.columns().len(), 1 + 2 + 12 + 3);
        assert_eq!(PivotLayout::ByFund.columns()[3], "Jan");
    }

    #[test]
    fn test_empty_allocations_give_empty_table() {
        let table = build_pivot(&[], PivotLayout::Detailed, dec("0.30"));
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.columns.len(), 21);
    }

    #[test]
    fn test_detailed_layout_splits_employers() {
        let allocations = vec![
            allocation(2012, 1, "111", "25", "1000", "400"),
            allocation(2012, 1, "222", "10", "500", "200"),
        ];
        let detailed = build_pivot(&allocations, PivotLayout::Detailed, dec("0.30"));
        let by_fund = build_pivot(&allocations, PivotLayout::ByFund, dec("0.30"));

        // Two groups + total + separator, versus one group + total + separator.
        assert_eq!(detailed.row_count(), 4);
        assert_eq!(by_fund.row_count(), 3);
        assert_eq!(by_fund.cell(0, "Jan"), Some(&Cell::Amount(dec("35"))));
        assert_eq!(by_fund.cell(0, "Feb"), Some(&Cell::Empty));
    }

    #[test]
    fn test_year_total_and_separator_rows() {
        let allocations = vec![
            allocation(2011, 5, "111", "25", "1000", "400"),
            allocation(2012, 1, "111", "25", "2000", "300"),
        ];
        let table = build_pivot(&allocations, PivotLayout::ByFund, dec("0.30"));

        assert_eq!(table.row_count(), 6);
        assert_eq!(table.cell(1, "Year"), Some(&Cell::Text("Total 2011".to_string())));
        assert_eq!(table.cell(1, "Gross"), Some(&Cell::Amount(dec("1000"))));
        assert_eq!(table.cell(1, "Fund"), Some(&Cell::Empty));
        assert!(table.rows[2].iter().all(Cell::is_empty));
        assert_eq!(table.cell(3, "Year"), Some(&Cell::Integer(2012)));
        assert_eq!(table.cell(4, "Contributions"), Some(&Cell::Amount(dec("300"))));
    }

    #[test]
    fn test_percent_and_low_retention_highlight() {
        let allocations = vec![
            allocation(2012, 1, "111", "25", "1000", "400"),
            allocation(2013, 1, "111", "25", "1000", "200"),
        ];
        let table = build_pivot(&allocations, PivotLayout::ByFund, dec("0.30"));

        assert_eq!(table.cell(0, "%"), Some(&Cell::Amount(dec("40"))));
        assert_eq!(table.highlight(0, "%"), Some(Highlight::Plain));
        assert_eq!(table.cell(3, "%"), Some(&Cell::Amount(dec("20"))));
        assert_eq!(table.highlight(3, "%"), Some(Highlight::LowRetention));
        // The year total carries the same highlight.
        assert_eq!(table.highlight(4, "%"), Some(Highlight::LowRetention));
    }

    #[test]
    fn test_zero_gross_leaves_percent_blank() {
        let allocations = vec![allocation(2012, 1, "111", "25", "0", "0")];
        let table = build_pivot(&allocations, PivotLayout::ByFund, dec("0.30"));
        assert_eq!(table.cell(0, "%"), Some(&Cell::Empty));
        assert_eq!(table.highlight(0, "%"), Some(Highlight::Plain));
    }

    #[test]
    fn test_overflowing_percent_is_blank() {
        let tiny = dec("0.0000000000000000000000001");
        assert_eq!(contribution_percent(dec("900000000000000"), tiny), None);
    }

    #[test]
    fn test_synthetic_months_are_highlighted() {
        let mut lump = allocation(1985, 3, "111", "25", "0", "0");
        lump.is_synthetic_aggregate = true;
        let table = build_pivot(&[lump], PivotLayout::ByFund, dec("0.30"));

        assert_eq!(table.highlight(0, "Mar"), Some(Highlight::SyntheticAggregate));
        assert_eq!(table.highlight(0, "Apr"), Some(Highlight::Plain));
    }

    #[test]
    fn test_build_pivots_follows_layout_order() {
        let allocations = vec![allocation(2012, 1, "111", "25", "1000", "400")];
        let tables = build_pivots(
            &allocations,
            &[PivotLayout::ByFund, PivotLayout::Detailed],
            dec("0.30"),
        );
        assert_eq!(tables[0].title, PivotLayout::ByFund.title());
        assert_eq!(tables[1].title, PivotLayout::Detailed.title());
    }
}
