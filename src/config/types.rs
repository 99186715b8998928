//! Configuration types for coverage audits.
//!
//! This module contains the strongly-typed structures deserialized from the
//! YAML configuration files, the validated [`AuditConfig`] built from them,
//! and the per-run [`ReportSettings`].

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{DurationConvention, FundCategory, InsuredCohort};
use crate::timeline::FundClassifier;

/// A category rule as written in `funds.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRuleConfig {
    /// The snake_case category name.
    pub category: String,
    /// Fund name keywords; any one must appear in the fund name.
    pub fund_keywords: Vec<String>,
    /// Coverage category codes; empty means any code.
    #[serde(default)]
    pub coverage_codes: Vec<String>,
}

/// Fund markers for the expected-aggregate exemptions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExemptionMarkers {
    /// Funds that declare in short (one or two month) cycles.
    #[serde(default)]
    pub short_cycle_markers: Vec<String>,
    /// Funds that declare per half-year.
    #[serde(default)]
    pub semester_cycle_markers: Vec<String>,
}

/// Fund configuration file structure (`funds.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct FundsConfig {
    /// Classification rules, evaluated in order.
    pub categories: Vec<CategoryRuleConfig>,
    /// Category pairs that count as parallel insurance.
    pub parallel_pairs: Vec<[String; 2]>,
    /// Last year audited for parallel insurance.
    pub parallel_cutoff_year: i32,
    /// Earnings type codes counted by the multi-employer check.
    pub multi_employer_earnings_types: Vec<String>,
    /// Markers for the expected-aggregate exemptions.
    #[serde(default)]
    pub aggregate_exemptions: ExemptionMarkers,
}

/// Ceiling configuration file structure (`ceilings.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct CeilingsConfig {
    /// Monthly ceilings by year for old insured.
    pub old_insured: BTreeMap<i32, Decimal>,
    /// Monthly ceilings by year for new insured.
    pub new_insured: BTreeMap<i32, Decimal>,
}

/// Year-indexed monthly earnings ceilings for both cohorts.
///
/// # Example
///
/// ```
/// use coverage_audit::config::CeilingTables;
/// use coverage_audit::models::InsuredCohort;
/// use rust_decimal::Decimal;
/// use std::collections::BTreeMap;
///
/// let tables = CeilingTables::new(
///     BTreeMap::from([(2002, Decimal::from(1900))]),
///     BTreeMap::from([(2002, Decimal::from(4400)), (2008, Decimal::from(5500))]),
/// );
///
/// assert_eq!(tables.ceiling_for(InsuredCohort::New, 2010), Some(Decimal::from(5500)));
/// assert_eq!(tables.ceiling_for(InsuredCohort::Old, 2001), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CeilingTables {
    old_insured: BTreeMap<i32, Decimal>,
    new_insured: BTreeMap<i32, Decimal>,
}

impl CeilingTables {
    /// Creates the tables from their year-indexed entries.
    pub fn new(old_insured: BTreeMap<i32, Decimal>, new_insured: BTreeMap<i32, Decimal>) -> Self {
        Self {
            old_insured,
            new_insured,
        }
    }

    /// Returns the monthly ceiling in force for `year`.
    ///
    /// A year without its own entry uses the most recent earlier entry; years
    /// before the first entry have no ceiling.
    pub fn ceiling_for(&self, cohort: InsuredCohort, year: i32) -> Option<Decimal> {
        let table = match cohort {
            InsuredCohort::Old => &self.old_insured,
            InsuredCohort::New => &self.new_insured,
        };
        table.range(..=year).next_back().map(|(_, ceiling)| *ceiling)
    }
}

/// The validated audit configuration.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    classifier: FundClassifier,
    parallel_pairs: Vec<(FundCategory, FundCategory)>,
    parallel_cutoff_year: i32,
    multi_employer_earnings_types: Vec<String>,
    exemption_markers: ExemptionMarkers,
    ceilings: CeilingTables,
}

impl AuditConfig {
    /// Creates a new AuditConfig from its component parts.
    pub fn new(
        classifier: FundClassifier,
        parallel_pairs: Vec<(FundCategory, FundCategory)>,
        parallel_cutoff_year: i32,
        multi_employer_earnings_types: Vec<String>,
        exemption_markers: ExemptionMarkers,
        ceilings: CeilingTables,
    ) -> Self {
        Self {
            classifier,
            parallel_pairs,
            parallel_cutoff_year,
            multi_employer_earnings_types,
            exemption_markers,
            ceilings,
        }
    }

    /// Returns the fund classifier.
    pub fn classifier(&self) -> &FundClassifier {
        &self.classifier
    }

    /// Returns the category pairs that count as parallel insurance.
    pub fn parallel_pairs(&self) -> &[(FundCategory, FundCategory)] {
        &self.parallel_pairs
    }

    /// Returns the last year audited for parallel insurance.
    pub fn parallel_cutoff_year(&self) -> i32 {
        self.parallel_cutoff_year
    }

    /// Returns the earnings type codes counted by the multi-employer check.
    pub fn multi_employer_earnings_types(&self) -> &[String] {
        &self.multi_employer_earnings_types
    }

    /// Returns the expected-aggregate exemption markers.
    pub fn exemption_markers(&self) -> &ExemptionMarkers {
        &self.exemption_markers
    }

    /// Returns the ceiling tables.
    pub fn ceilings(&self) -> &CeilingTables {
        &self.ceilings
    }
}

/// The grouping used by a pivot table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PivotLayout {
    /// Year, fund, insurance type, employer, category and earnings type.
    Detailed,
    /// Year, fund and insurance type.
    ByFund,
}

/// Default retention threshold: 30%.
pub const DEFAULT_RETENTION_THRESHOLD: Decimal = Decimal::from_parts(30, 0, 0, false, 2);

/// Parameters fixed for the duration of one report run.
///
/// # Example
///
/// ```
/// use coverage_audit::config::{ReportSettings, PivotLayout};
/// use coverage_audit::models::DurationConvention;
/// use rust_decimal::Decimal;
///
/// let settings = ReportSettings {
///     convention: DurationConvention::Calendar,
///     highlight_retention_threshold: Decimal::new(25, 2),
///     layouts: vec![PivotLayout::ByFund],
///     ..ReportSettings::default()
/// };
/// assert_eq!(settings.audit_retention_threshold, Decimal::new(30, 2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSettings {
    /// How declared months and years are converted to days.
    pub convention: DurationConvention,
    /// Retention ratio below which the audit pass reports a month.
    pub audit_retention_threshold: Decimal,
    /// Retention ratio below which pivot percentage cells are highlighted.
    pub highlight_retention_threshold: Decimal,
    /// Pivot tables to produce, in order.
    pub layouts: Vec<PivotLayout>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            convention: DurationConvention::Registry,
            audit_retention_threshold: DEFAULT_RETENTION_THRESHOLD,
            highlight_retention_threshold: DEFAULT_RETENTION_THRESHOLD,
            layouts: vec![PivotLayout::Detailed, PivotLayout::ByFund],
        }
    }
}
