//! Integration tests for the coverage audit engine.
//!
//! This test suite drives the engine from string rows, as extracted from a
//! coverage register, and covers:
//! - Even month allocation and retention
//! - Parallel insurance before and after the cutoff year
//! - Lump-sum declarations and their exemptions
//! - Gaps, multiple employers and ceiling excess
//! - Header reconciliation and legacy currency
//! - Reporting conventions and thresholds
//! - Idempotence and timeline properties

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::str::FromStr;

use coverage_audit::analysis::{assess_ceiling, detect_gaps_in_ranges, prorate_ceiling};
use coverage_audit::config::{ConfigLoader, PivotLayout, ReportSettings};
use coverage_audit::engine::AuditEngine;
use coverage_audit::models::{
    AuditFinding, AuditReport, Cell, DescriptionLookups, DurationConvention, FindingCategory,
    Highlight, InsuranceInterval, MonthAllocation, SourceRow,
};
use coverage_audit::timeline::MonthAllocator;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_engine() -> AuditEngine {
    AuditEngine::new(ConfigLoader::load("./config/efka").expect("Failed to load config"))
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn row(pairs: &[(&str, &str)]) -> SourceRow {
    SourceRow::from_pairs(pairs.iter().copied())
}

/// A salaried row with the full set of register columns.
fn salaried_row(
    employer: &str,
    from: &str,
    to: &str,
    days: &str,
    gross: &str,
    contributions: &str,
) -> SourceRow {
    row(&[
        ("Ταμείο", "ΙΚΑ-ΕΤΑΜ"),
        ("Τύπος Ασφάλισης", "Κύρια"),
        ("Α.Μ. Εργοδότη", employer),
        ("Κλάδος/Πακέτο Κάλυψης", "0101"),
        ("Τύπος Αποδοχών", "01"),
        ("Από", from),
        ("Έως", to),
        ("Ημέρες", days),
        ("Μικτές Αποδοχές", gross),
        ("Συνολικές Εισφορές", contributions),
    ])
}

fn run(rows: &[SourceRow]) -> AuditReport {
    create_engine().run(rows, &DescriptionLookups::default(), &ReportSettings::default())
}

fn finding(report: &AuditReport, category: FindingCategory) -> &AuditFinding {
    report
        .findings
        .iter()
        .find(|f| f.category == category)
        .unwrap_or_else(|| panic!("missing finding {:?}", category))
}

// =============================================================================
// Month allocation and retention
// =============================================================================

#[test]
fn test_three_month_row_is_split_evenly() {
    let rows = vec![row(&[
        ("Ταμείο", "ΙΚΑ-ΕΤΑΜ"),
        ("Από", "01/01/2010"),
        ("Έως", "31/03/2010"),
        ("Μήνες", "3"),
        ("Μικτές Αποδοχές", "3.000,00"),
        ("Συνολικές Εισφορές", "600,00"),
    ])];
    let report = run(&rows);

    assert_eq!(report.intervals.len(), 1);
    assert_eq!(report.intervals[0].duration_days, decimal("75"));
    assert_eq!(report.allocations.len(), 3);
    for allocation in &report.allocations {
        assert_eq!(allocation.days_share, decimal("25"));
        assert_eq!(allocation.gross_share, decimal("1000"));
        assert_eq!(allocation.contrib_share, decimal("200"));
        assert!(!allocation.is_synthetic_aggregate);
    }

    let retention = finding(&report, FindingCategory::LowRetention);
    assert!(retention.flagged);
    assert!(retention.detail.contains("20.00%"));
    let ratio = retention.evidence[0]["ratio"].as_str().unwrap();
    assert_eq!(decimal(ratio), decimal("0.2"));
}

#[test]
fn test_low_retention_is_highlighted_in_pivot() {
    let rows = vec![salaried_row(
        "1001001",
        "01/01/2010",
        "31/03/2010",
        "75",
        "3.000,00",
        "600,00",
    )];
    let report = run(&rows);
    let detailed = &report.tables[0];

    assert_eq!(detailed.title, PivotLayout::Detailed.title());
    assert_eq!(detailed.cell(0, "Jan"), Some(&Cell::Amount(decimal("25"))));
    assert_eq!(detailed.cell(0, "Employer"), Some(&Cell::Text("1001001".to_string())));
    assert_eq!(detailed.cell(0, "%"), Some(&Cell::Amount(decimal("20"))));
    assert_eq!(detailed.highlight(0, "%"), Some(Highlight::LowRetention));
}

#[test]
fn test_highlight_threshold_is_independent_of_audit_threshold() {
    let rows = vec![salaried_row(
        "1001001",
        "01/01/2010",
        "31/03/2010",
        "75",
        "3.000,00",
        "600,00",
    )];
    let settings = ReportSettings {
        highlight_retention_threshold: decimal("0.10"),
        ..ReportSettings::default()
    };
    let report = create_engine().run(&rows, &DescriptionLookups::default(), &settings);

    assert!(finding(&report, FindingCategory::LowRetention).flagged);
    assert_eq!(report.tables[0].highlight(0, "%"), Some(Highlight::Plain));
}

#[test]
fn test_calendar_convention_changes_allocations_only() {
    let rows = vec![row(&[
        ("Ταμείο", "ΙΚΑ-ΕΤΑΜ"),
        ("Από", "01/01/2010"),
        ("Έως", "31/03/2010"),
        ("Μήνες", "3"),
    ])];
    let settings = ReportSettings {
        convention: DurationConvention::Calendar,
        ..ReportSettings::default()
    };
    let report = create_engine().run(&rows, &DescriptionLookups::default(), &settings);

    assert_eq!(report.intervals[0].duration_days, decimal("75"));
    assert!(report.allocations.iter().all(|a| a.days_share == decimal("30")));
    assert_eq!(report.settings.convention, DurationConvention::Calendar);
}

// =============================================================================
// Parallel insurance
// =============================================================================

fn parallel_rows(year: i32) -> Vec<SourceRow> {
    let from = format!("01/03/{}", year);
    let to = format!("31/03/{}", year);
    vec![
        row(&[
            ("Ταμείο", "ΙΚΑ-ΕΤΑΜ"),
            ("Από", from.as_str()),
            ("Έως", to.as_str()),
            ("Ημέρες", "25"),
        ]),
        row(&[
            ("Ταμείο", "ΟΑΕΕ"),
            ("Κλάδος", "Κ"),
            ("Από", from.as_str()),
            ("Έως", to.as_str()),
            ("Μήνες", "1"),
        ]),
    ]
}

#[test]
fn test_parallel_insurance_before_cutoff() {
    let report = run(&parallel_rows(2015));
    let parallel = finding(&report, FindingCategory::ParallelInsurance);

    assert!(parallel.flagged);
    assert!(parallel.detail.contains("03/2015"));
    assert_eq!(parallel.evidence[0]["year"], 2015);
}

#[test]
fn test_parallel_insurance_after_cutoff_is_clear() {
    let report = run(&parallel_rows(2017));
    let parallel = finding(&report, FindingCategory::ParallelInsurance);

    assert!(!parallel.flagged);
    assert!(parallel.detail.contains("2016"));
}

// =============================================================================
// Lump-sum declarations
// =============================================================================

#[test]
fn test_full_year_lump_is_flagged() {
    let rows = vec![row(&[
        ("Ταμείο", "ΙΚΑ"),
        ("Από", "01/01/1985"),
        ("Έως", "31/12/1985"),
        ("Ημέρες", "300"),
    ])];
    let report = run(&rows);

    assert_eq!(report.allocations.len(), 12);
    assert!(report.allocations.iter().all(|a| a.is_synthetic_aggregate));
    assert!(report.allocations.iter().all(|a| a.days_share == decimal("25")));

    let aggregated = finding(&report, FindingCategory::AggregatedIntervals);
    assert!(aggregated.flagged);
    assert!(aggregated.detail.contains("01/01/1985 - 31/12/1985"));

    let by_fund = &report.tables[1];
    assert_eq!(by_fund.highlight(0, "Jun"), Some(Highlight::SyntheticAggregate));
}

#[test]
fn test_engineers_semester_rows_are_exempt() {
    let rows = vec![
        row(&[
            ("Ταμείο", "ΤΣΜΕΔΕ"),
            ("Κλάδος", "ΚΣ"),
            ("Από", "01/01/1985"),
            ("Έως", "30/06/1985"),
            ("Μήνες", "6"),
        ]),
        row(&[
            ("Ταμείο", "ΤΣΜΕΔΕ"),
            ("Κλάδος", "ΚΣ"),
            ("Από", "01/07/1985"),
            ("Έως", "31/12/1985"),
            ("Μήνες", "6"),
        ]),
    ];
    let report = run(&rows);

    assert_eq!(report.allocations.len(), 12);
    assert!(report.allocations.iter().all(|a| !a.is_synthetic_aggregate));
    assert!(!finding(&report, FindingCategory::AggregatedIntervals).flagged);
}

// =============================================================================
// Gaps, employers and ceilings
// =============================================================================

#[test]
fn test_gap_between_rows() {
    let rows = vec![
        salaried_row("1", "01/01/2010", "31/12/2010", "300", "12.000,00", "4.000,00"),
        salaried_row("1", "01/01/2012", "31/12/2012", "300", "12.000,00", "4.000,00"),
    ];
    let report = run(&rows);

    assert_eq!(report.gaps.len(), 1);
    assert_eq!(report.gaps[0].start_date, date(2011, 1, 1));
    assert_eq!(report.gaps[0].end_date, date(2011, 12, 31));
    assert_eq!(report.gaps[0].calendar_days, 365);

    let gaps = finding(&report, FindingCategory::Gaps);
    assert!(gaps.flagged);
    assert!(gaps.detail.contains("01/01/2011 - 31/12/2011"));
}

#[test]
fn test_two_employers_in_one_month() {
    let rows = vec![
        salaried_row("111", "01/01/2012", "31/01/2012", "13", "600,00", "200,00"),
        salaried_row("222", "01/01/2012", "31/01/2012", "12", "600,00", "200,00"),
    ];
    let report = run(&rows);
    let multi = finding(&report, FindingCategory::MultiEmployer);

    assert!(multi.flagged);
    assert!(multi.detail.contains("01/2012"));
    assert!(multi.detail.contains("111, 222"));
}

#[test]
fn test_multi_employer_text_uses_earnings_type_descriptions() {
    let rows = vec![salaried_row("111", "01/01/2012", "31/01/2012", "25", "1.000,00", "400,00")];
    let mut lookups = DescriptionLookups::default();
    lookups
        .earnings_types
        .insert("01".to_string(), "Τακτικές αποδοχές".to_string());
    let report = create_engine().run(&rows, &lookups, &ReportSettings::default());

    let multi = finding(&report, FindingCategory::MultiEmployer);
    assert!(!multi.flagged);
    assert!(multi.detail.contains("01 (Τακτικές αποδοχές)"));
}

#[test]
fn test_ceiling_excess() {
    let rows = vec![salaried_row(
        "111",
        "01/06/2015",
        "30/06/2015",
        "25",
        "9.000,00",
        "2.000,00",
    )];
    let report = run(&rows);
    let ceiling = finding(&report, FindingCategory::CeilingExcess);

    assert!(ceiling.flagged);
    assert!(ceiling.detail.contains("06/2015"));
    assert_eq!(ceiling.evidence[0]["excess"], "3456.45");
    assert!(!finding(&report, FindingCategory::LowRetention).flagged);
}

#[test]
fn test_short_record_prorates_ceiling() {
    let rows = vec![salaried_row(
        "111",
        "01/06/2015",
        "10/06/2015",
        "10",
        "3.000,00",
        "900,00",
    )];
    let report = run(&rows);
    let ceiling = finding(&report, FindingCategory::CeilingExcess);

    // 5543.55 * 10 / 25 = 2217.42
    assert!(ceiling.flagged);
    let evidence = &ceiling.evidence[0];
    assert_eq!(decimal(evidence["prorated_ceiling"].as_str().unwrap()), decimal("2217.42"));
    assert_eq!(decimal(evidence["excess"].as_str().unwrap()), decimal("782.58"));
}

#[test]
fn test_old_insured_cohort() {
    let rows = vec![
        salaried_row("1", "01/05/1990", "31/05/1990", "25", "", ""),
        salaried_row("1", "01/01/2015", "31/01/2015", "25", "1.000,00", "400,00"),
    ];
    let report = run(&rows);
    let cohort = finding(&report, FindingCategory::OldOrNew);

    assert!(!cohort.flagged);
    assert_eq!(cohort.evidence["cohort"], "old");
    assert!(cohort.detail.contains("01/05/1990"));
}

// =============================================================================
// Records, headers and currency
// =============================================================================

#[test]
fn test_unpaid_and_zero_duration_rows() {
    let rows = vec![
        salaried_row("1", "01/01/2014", "31/01/2014", "25", "1.000,00", "0"),
        salaried_row("1", "01/02/2014", "28/02/2014", "0", "500,00", "100,00"),
        salaried_row("1", "01/03/2014", "31/03/2014", "25", "1.000,00", "400,00"),
    ];
    let report = run(&rows);
    let unpaid = finding(&report, FindingCategory::UnpaidContributions);

    assert!(unpaid.flagged);
    assert!(unpaid.headline.starts_with("2 record(s)"));
    assert!(unpaid.detail.contains("row 1,"));
    assert!(unpaid.detail.contains("row 2,"));
    assert_eq!(unpaid.evidence[1]["kind"], "zero_duration");
}

#[test]
fn test_english_and_wrapped_headers() {
    let rows = vec![row(&[
        ("Fund", "IKA"),
        ("Start\ndate", "01/01/2010"),
        ("End   date", "31/01/2010"),
        ("Days", "25"),
        ("Gross earnings (EUR)", "1,000.00"),
        ("Total\ncontributions (EUR)", "400.00"),
        ("Notes", "manual entry"),
    ])];
    let report = run(&rows);

    assert_eq!(report.intervals.len(), 1);
    let interval = &report.intervals[0];
    assert_eq!(interval.fund_id, "IKA");
    assert_eq!(interval.gross_earnings, decimal("1000"));
    assert_eq!(interval.total_contributions, decimal("400"));
}

#[test]
fn test_legacy_currency_rows_keep_duration_only() {
    let rows = vec![salaried_row(
        "1",
        "01/01/1995",
        "31/01/1995",
        "25",
        "150.000 ΔΡΧ",
        "30.000 ΔΡΧ",
    )];
    let report = run(&rows);
    let interval = &report.intervals[0];

    assert!(interval.legacy_currency);
    assert_eq!(interval.gross_earnings, Decimal::ZERO);
    assert_eq!(interval.duration_days, decimal("25"));
    assert!(!finding(&report, FindingCategory::UnpaidContributions).flagged);
}

#[test]
fn test_unparsable_rows_are_dropped() {
    let rows = vec![
        salaried_row("1", "31/02/2010", "31/03/2010", "25", "1.000,00", "400,00"),
        salaried_row("1", "01/04/2010", "31/03/2010", "25", "1.000,00", "400,00"),
        salaried_row("1", "01/05/2010", "31/05/2010", "25", "1.000,00", "400,00"),
    ];
    let report = run(&rows);

    assert_eq!(report.intervals.len(), 1);
    assert_eq!(report.intervals[0].source_index, 2);
}

#[test]
fn test_missing_columns_skip_findings() {
    let rows = vec![row(&[("Από", "01/01/2010"), ("Έως", "31/01/2010")])];
    let report = run(&rows);

    let categories: Vec<FindingCategory> = report.findings.iter().map(|f| f.category).collect();
    assert_eq!(
        categories,
        vec![
            FindingCategory::OldOrNew,
            FindingCategory::Gaps,
            FindingCategory::AggregatedIntervals,
        ]
    );
}

#[test]
fn test_oversized_numeric_cells_do_not_abort_the_run() {
    let rows = vec![
        row(&[
            ("Ταμείο", "ΙΚΑ-ΕΤΑΜ"),
            ("Από", "01/01/2010"),
            ("Έως", "31/01/2010"),
            ("Μήνες", "9999999999999999999999999999"),
        ]),
        salaried_row(
            "1",
            "01/02/2010",
            "28/02/2010",
            "25",
            "70000000000000000000000000000",
            "100,00",
        ),
        salaried_row(
            "1",
            "01/03/2010",
            "31/03/2010",
            "25",
            "70000000000000000000000000000",
            "100,00",
        ),
        salaried_row(
            "1",
            "01/04/2010",
            "30/04/2010",
            "25",
            "0,0000000000000000000000001",
            "900.000.000.000.000",
        ),
    ];
    let report = run(&rows);

    assert_eq!(report.intervals.len(), 4);
    assert_eq!(report.intervals[0].duration_days, Decimal::ZERO);
    assert_eq!(report.intervals[1].gross_earnings, Decimal::ZERO);
    assert_eq!(report.intervals[3].total_contributions, decimal("900000000000000"));
    assert!(!finding(&report, FindingCategory::LowRetention).flagged);

    let detailed = &report.tables[0];
    let april = (0..detailed.row_count())
        .find(|&r| detailed.cell(r, "Apr").is_some_and(|c| !c.is_empty()))
        .unwrap();
    assert_eq!(detailed.cell(april, "%"), Some(&Cell::Empty));
}

// =============================================================================
// Idempotence and serialization
// =============================================================================

fn mixed_rows() -> Vec<SourceRow> {
    let mut rows = vec![
        row(&[
            ("Ταμείο", "ΙΚΑ"),
            ("Από", "01/01/1985"),
            ("Έως", "31/12/1985"),
            ("Ημέρες", "300"),
        ]),
        salaried_row("111", "01/01/2012", "31/01/2012", "13", "600,00", "100,00"),
        salaried_row("222", "01/01/2012", "31/01/2012", "12", "9.600,00", "2.000,00"),
    ];
    rows.extend(parallel_rows(2015));
    rows
}

#[test]
fn test_runs_are_idempotent() {
    let engine = create_engine();
    let lookups = DescriptionLookups::default();
    let settings = ReportSettings::default();

    let first = engine.run(&mixed_rows(), &lookups, &settings);
    let second = engine.run(&mixed_rows(), &lookups, &settings);

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_report_serializes_to_json() {
    let report = run(&mixed_rows());
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["findings"][0]["id"], "F01");
    assert_eq!(value["findings"][0]["category"], "old_or_new");
    assert_eq!(value["settings"]["convention"], "registry");
    assert!(value["tables"][0]["rows"].as_array().unwrap().len() > 2);

    let back: AuditReport = serde_json::from_value(value).unwrap();
    assert_eq!(back, report);
}

#[test]
fn test_every_flagged_finding_has_an_example() {
    let report = run(&mixed_rows());

    let flagged: Vec<&AuditFinding> = report.flagged_findings().collect();
    assert!(flagged.len() >= 4);
    for finding in flagged {
        assert!(!finding.detail.is_empty(), "{} has no detail", finding.id);
        assert!(
            finding.detail.chars().any(|c| c.is_ascii_digit()),
            "{} quotes no date or amount",
            finding.id
        );
    }
}

// =============================================================================
// Timeline properties
// =============================================================================

fn base_date() -> NaiveDate {
    date(1980, 1, 1)
}

fn arb_interval() -> impl Strategy<Value = InsuranceInterval> {
    (
        0u64..15_000,
        0u64..800,
        proptest::option::of(0i64..400),
        proptest::option::of(0i64..24),
        -500_000i64..5_000_000,
        0i64..1_000_000,
    )
        .prop_map(|(offset, span, days, months, gross_cents, contrib_cents)| {
            let start = base_date() + Days::new(offset);
            let end = start + Days::new(span);
            InsuranceInterval::new(start, end)
                .unwrap()
                .with_fund("ΙΚΑ")
                .with_declared(days.map(Decimal::from), months.map(Decimal::from), None)
                .with_money(Decimal::new(gross_cents, 2), Decimal::new(contrib_cents, 2))
        })
}

fn tolerance() -> Decimal {
    Decimal::new(1, 6)
}

fn salaried_allocation(gross: Decimal, record_duration_days: Decimal) -> MonthAllocation {
    MonthAllocation {
        year: 2015,
        month: 6,
        source_index: 0,
        fund_id: "ΙΚΑ".to_string(),
        insurance_type: String::new(),
        coverage_category: String::new(),
        earnings_type_code: "01".to_string(),
        employer_id: String::new(),
        record_duration_days,
        days_share: record_duration_days,
        gross_share: gross,
        contrib_share: Decimal::ZERO,
        is_synthetic_aggregate: false,
    }
}

fn allocate(interval: &InsuranceInterval) -> Vec<MonthAllocation> {
    MonthAllocator::new(DurationConvention::Registry, vec![]).allocate(interval)
}

proptest! {
    #[test]
    fn prop_duration_is_conserved(interval in arb_interval()) {
        let allocations = allocate(&interval);
        let total: Decimal = allocations.iter().map(|a| a.days_share).sum();
        prop_assert_eq!(allocations.len() as u32, interval.month_span());
        prop_assert!((total - interval.duration_days).abs() < tolerance());
    }

    #[test]
    fn prop_money_is_conserved(interval in arb_interval()) {
        let allocations = allocate(&interval);
        let gross: Decimal = allocations.iter().map(|a| a.gross_share).sum();
        let contrib: Decimal = allocations.iter().map(|a| a.contrib_share).sum();
        prop_assert!((gross - interval.gross_earnings).abs() < tolerance());
        prop_assert!((contrib - interval.total_contributions).abs() < tolerance());
    }

    #[test]
    fn prop_negative_gross_gives_non_positive_days(interval in arb_interval()) {
        let allocations = allocate(&interval);
        if interval.gross_earnings < Decimal::ZERO {
            prop_assert!(allocations.iter().all(|a| a.days_share <= Decimal::ZERO));
        }
    }

    #[test]
    fn prop_months_are_valid_and_ordered(interval in arb_interval()) {
        let allocations = allocate(&interval);
        prop_assert!(allocations.iter().all(|a| (1..=12).contains(&a.month)));
        prop_assert!(allocations.windows(2).all(|w| w[0].period() < w[1].period()));
    }

    #[test]
    fn prop_gaps_tile_the_covered_range(
        ranges in proptest::collection::vec((0u64..2_000, 0u64..120), 1..12)
    ) {
        let ranges: Vec<(NaiveDate, NaiveDate)> = ranges
            .into_iter()
            .map(|(offset, span)| {
                let start = base_date() + Days::new(offset);
                (start, start + Days::new(span))
            })
            .collect();
        let gaps = detect_gaps_in_ranges(&ranges);

        let mut covered: HashSet<NaiveDate> = HashSet::new();
        for (start, end) in &ranges {
            covered.extend(start.iter_days().take_while(|d| d <= end));
        }
        let mut uncovered: HashSet<NaiveDate> = HashSet::new();
        for gap in &gaps {
            let days: Vec<NaiveDate> =
                gap.start_date.iter_days().take_while(|d| *d <= gap.end_date).collect();
            prop_assert_eq!(days.len() as i64, gap.calendar_days);
            for day in days {
                prop_assert!(!covered.contains(&day));
                prop_assert!(uncovered.insert(day));
            }
        }

        let first = ranges.iter().map(|r| r.0).min().unwrap();
        let last = ranges.iter().map(|r| r.1).max().unwrap();
        let total = (last - first).num_days() as usize + 1;
        prop_assert_eq!(covered.len() + uncovered.len(), total);
    }

    #[test]
    fn prop_raising_the_ceiling_never_raises_excess(
        gross_cents in 0i64..2_000_000,
        duration in 0i64..60,
        low_cents in 0i64..1_000_000,
        raise_cents in 0i64..1_000_000,
    ) {
        let allocation = salaried_allocation(Decimal::new(gross_cents, 2), Decimal::from(duration));
        let low = Decimal::new(low_cents, 2);
        let high = low + Decimal::new(raise_cents, 2);

        let at_low = assess_ceiling(&allocation, Some(low));
        let at_high = assess_ceiling(&allocation, Some(high));
        prop_assert!(at_high.excess <= at_low.excess);
        prop_assert!(at_high.adjusted_gross >= at_low.adjusted_gross);
    }

    #[test]
    fn prop_excess_grows_with_gross_above_the_ceiling(
        ceiling_cents in 0i64..1_000_000,
        duration in -60i64..60,
        first_cents in 0i64..2_000_000,
        raise_cents in 1i64..1_000_000,
    ) {
        let ceiling = Decimal::new(ceiling_cents, 2);
        let days = Decimal::from(duration);
        let prorated = prorate_ceiling(ceiling, days);
        let g1 = Decimal::new(first_cents, 2);
        let g2 = g1 + Decimal::new(raise_cents, 2);

        let at_g1 = assess_ceiling(&salaried_allocation(g1, days), Some(ceiling));
        let at_g2 = assess_ceiling(&salaried_allocation(g2, days), Some(ceiling));

        for (gross, assessment) in [(g1, &at_g1), (g2, &at_g2)] {
            if gross <= prorated {
                prop_assert_eq!(assessment.excess, Decimal::ZERO);
            } else {
                prop_assert_eq!(assessment.excess, gross - prorated);
            }
        }
        if g1 > prorated {
            prop_assert!(at_g2.excess > at_g1.excess);
        }
    }
}
