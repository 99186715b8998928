//! Column reconciliation.
//!
//! The extraction step yields inconsistent header text across pages: labels
//! broken over several lines, extra spaces, accents dropped or kept. The
//! [`ColumnReconciler`] maps whatever arrives onto a fixed canonical schema.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::SourceRow;

use super::text::normalize_label;

/// Patterns shorter than or equal to this many characters only match exactly.
pub const MIN_SUBSTRING_PATTERN_CHARS: usize = 5;

/// The canonical input schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalColumn {
    /// Insurance fund name.
    Fund,
    /// Insurance type.
    InsuranceType,
    /// Employer identifier.
    Employer,
    /// Coverage category code.
    CoverageCategory,
    /// Earnings type code.
    EarningsType,
    /// First covered day.
    StartDate,
    /// Last covered day.
    EndDate,
    /// Declared years.
    Years,
    /// Declared months.
    Months,
    /// Declared days.
    Days,
    /// Gross earnings.
    GrossEarnings,
    /// Total contributions.
    TotalContributions,
}

/// Priority-ordered canonical column patterns.
const COLUMN_PATTERNS: &[(CanonicalColumn, &[&str])] = &[
    (
        CanonicalColumn::Fund,
        &["Ταμείο", "Ταμείο Ασφάλισης", "Φορέας", "Fund"],
    ),
    (
        CanonicalColumn::InsuranceType,
        &["Τύπος Ασφάλισης", "Τύπος Ασφ.", "Insurance type"],
    ),
    (
        CanonicalColumn::Employer,
        &["Α.Μ. Εργοδότη", "ΑΜ Εργοδότη", "Εργοδότης", "ΑΜΕ", "Employer"],
    ),
    (
        CanonicalColumn::CoverageCategory,
        &[
            "Κλάδος/Πακέτο Κάλυψης",
            "Πακέτο Κάλυψης",
            "Κλάδος",
            "Coverage category",
        ],
    ),
    (
        CanonicalColumn::EarningsType,
        &["Τύπος Αποδοχών", "Τύπος Αποδ.", "Earnings type"],
    ),
    (
        CanonicalColumn::StartDate,
        &["Από", "Από Ημερομηνία", "Start date", "From"],
    ),
    (
        CanonicalColumn::EndDate,
        &["Έως", "Μέχρι", "Έως Ημερομηνία", "End date", "To"],
    ),
    (CanonicalColumn::Years, &["Έτη", "Years"]),
    (CanonicalColumn::Months, &["Μήνες", "Months"]),
    (
        CanonicalColumn::Days,
        &["Ημέρες", "Ημέρες Ασφάλισης", "Days"],
    ),
    (
        CanonicalColumn::GrossEarnings,
        &["Μικτές Αποδοχές", "Αποδοχές", "Gross earnings"],
    ),
    (
        CanonicalColumn::TotalContributions,
        &[
            "Συνολικές Εισφορές",
            "Σύνολο Εισφορών",
            "Εισφορές",
            "Total contributions",
        ],
    ),
];

/// The outcome of reconciling one label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconciledColumn {
    /// The label maps onto a canonical column.
    Canonical(CanonicalColumn),
    /// The label matched nothing and keeps its original text.
    Passthrough(String),
}

/// A source row with its cells keyed by canonical column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciledRow {
    fields: HashMap<CanonicalColumn, String>,
    extras: Vec<(String, String)>,
}

impl ReconciledRow {
    /// Returns the trimmed value of a canonical column, or `None` if the
    /// column is missing or blank.
    pub fn get(&self, column: CanonicalColumn) -> Option<&str> {
        self.fields
            .get(&column)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Returns the trimmed value of a canonical column or an empty string.
    pub fn text(&self, column: CanonicalColumn) -> String {
        self.get(column).unwrap_or_default().to_string()
    }

    /// Returns true if the row has the column, even with a blank value.
    pub fn has_column(&self, column: CanonicalColumn) -> bool {
        self.fields.contains_key(&column)
    }

    /// Returns the canonical columns present in the row.
    pub fn columns(&self) -> impl Iterator<Item = CanonicalColumn> + '_ {
        self.fields.keys().copied()
    }

    /// Returns the cells whose labels matched no canonical column.
    pub fn extras(&self) -> &[(String, String)] {
        &self.extras
    }
}

/// Maps arbitrary column labels onto [`CanonicalColumn`]s.
///
/// Matching runs in two passes over the labels, in order. The first pass
/// accepts exact matches of the normalized label against any pattern. The
/// second pass, for labels still unmatched, accepts substring matches in
/// either direction with patterns longer than
/// [`MIN_SUBSTRING_PATTERN_CHARS`]. In both passes the first canonical column
/// in priority order that is still unclaimed wins.
///
/// Label order only breaks ties within a pass. An exact match anywhere in the
/// row claims its column before any substring match is tried, so a later
/// label matching exactly takes the column from an earlier label that would
/// only have matched as a substring.
///
/// # Example
///
/// ```
/// use coverage_audit::parsing::{CanonicalColumn, ColumnReconciler, ReconciledColumn};
///
/// let reconciler = ColumnReconciler::default();
/// let columns = reconciler.reconcile_labels(&["Από", "Μικτές\nαποδοχές", "Σχόλια"]);
///
/// assert_eq!(columns[0], ReconciledColumn::Canonical(CanonicalColumn::StartDate));
/// assert_eq!(columns[1], ReconciledColumn::Canonical(CanonicalColumn::GrossEarnings));
/// assert_eq!(columns[2], ReconciledColumn::Passthrough("Σχόλια".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnReconciler {
    patterns: Vec<(CanonicalColumn, Vec<String>)>,
}

impl Default for ColumnReconciler {
    fn default() -> Self {
        Self::new(
            COLUMN_PATTERNS
                .iter()
                .map(|(column, patterns)| (*column, patterns.iter().map(|p| p.to_string()).collect()))
                .collect(),
        )
    }
}

impl ColumnReconciler {
    /// Creates a reconciler from a priority-ordered pattern table.
    pub fn new(patterns: Vec<(CanonicalColumn, Vec<String>)>) -> Self {
        Self {
            patterns: patterns
                .into_iter()
                .map(|(column, list)| {
                    let normalized = list
                        .iter()
                        .map(|p| normalize_label(p))
                        .filter(|p| !p.is_empty())
                        .collect();
                    (column, normalized)
                })
                .collect(),
        }
    }

    /// Reconciles an ordered list of labels.
    pub fn reconcile_labels(&self, labels: &[&str]) -> Vec<ReconciledColumn> {
        let normalized: Vec<String> = labels.iter().map(|l| normalize_label(l)).collect();
        let mut assigned: Vec<Option<CanonicalColumn>> = vec![None; labels.len()];
        let mut claimed: HashSet<CanonicalColumn> = HashSet::new();

        for (index, label) in normalized.iter().enumerate() {
            if let Some(column) = self.find(label, &claimed, exact_match) {
                claimed.insert(column);
                assigned[index] = Some(column);
            }
        }

        for (index, label) in normalized.iter().enumerate() {
            if assigned[index].is_some() {
                continue;
            }
            if let Some(column) = self.find(label, &claimed, substring_match) {
                claimed.insert(column);
                assigned[index] = Some(column);
            }
        }

        labels
            .iter()
            .zip(assigned)
            .map(|(label, column)| match column {
                Some(column) => ReconciledColumn::Canonical(column),
                None => ReconciledColumn::Passthrough(label.to_string()),
            })
            .collect()
    }

    /// Reconciles a source row into canonical fields.
    pub fn reconcile_row(&self, row: &SourceRow) -> ReconciledRow {
        let labels: Vec<&str> = row.labels().collect();
        let columns = self.reconcile_labels(&labels);

        let mut reconciled = ReconciledRow::default();
        for ((_, value), column) in row.cells().iter().zip(columns) {
            match column {
                ReconciledColumn::Canonical(column) => {
                    reconciled.fields.insert(column, value.clone());
                }
                ReconciledColumn::Passthrough(label) => {
                    reconciled.extras.push((label, value.clone()));
                }
            }
        }
        reconciled
    }

    fn find(
        &self,
        label: &str,
        claimed: &HashSet<CanonicalColumn>,
        matcher: fn(&str, &str) -> bool,
    ) -> Option<CanonicalColumn> {
        if label.is_empty() {
            return None;
        }
        self.patterns
            .iter()
            .filter(|(column, _)| !claimed.contains(column))
            .find(|(_, patterns)| patterns.iter().any(|p| matcher(label, p)))
            .map(|(column, _)| *column)
    }
}

fn exact_match(label: &str, pattern: &str) -> bool {
    label == pattern
}

fn substring_match(label: &str, pattern: &str) -> bool {
    pattern.chars().count() > MIN_SUBSTRING_PATTERN_CHARS
        && (label.contains(pattern) || pattern.contains(label))
}

/// Which canonical columns appeared anywhere in the input.
///
/// Analyzers whose columns are entirely absent are skipped rather than run
/// over empty values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaCoverage {
    columns: HashSet<CanonicalColumn>,
}

impl SchemaCoverage {
    /// Records the columns of one reconciled row.
    pub fn record(&mut self, row: &ReconciledRow) {
        self.columns.extend(row.columns());
    }

    /// Returns true if the column appeared in at least one row.
    pub fn has(&self, column: CanonicalColumn) -> bool {
        self.columns.contains(&column)
    }

    /// Returns true if every listed column appeared.
    pub fn has_all(&self, columns: &[CanonicalColumn]) -> bool {
        columns.iter().all(|c| self.has(*c))
    }

    /// Returns true if at least one listed column appeared.
    pub fn has_any(&self, columns: &[CanonicalColumn]) -> bool {
        columns.iter().any(|c| self.has(*c))
    }

    /// Coverage with every canonical column present.
    pub fn complete() -> Self {
        Self {
            columns: COLUMN_PATTERNS.iter().map(|(column, _)| *column).collect(),
        }
    }
}
