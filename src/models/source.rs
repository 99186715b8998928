//! Input models: extracted source rows and description lookups.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One row produced by the document extraction step.
///
/// Cells keep the order and the exact labels the extractor produced; the
/// labels are reconciled against the canonical schema later.
///
/// # Example
///
/// ```
/// use coverage_audit::models::SourceRow;
///
/// let row = SourceRow::from_pairs([("Από", "01/01/2010"), ("Έως", "31/03/2010")]);
/// assert_eq!(row.len(), 2);
/// assert_eq!(row.labels().next(), Some("Από"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRow {
    cells: Vec<(String, String)>,
}

impl SourceRow {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a row from `(label, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            cells: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Appends a cell.
    pub fn push(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.cells.push((label.into(), value.into()));
    }

    /// Returns the cells in extraction order.
    pub fn cells(&self) -> &[(String, String)] {
        &self.cells
    }

    /// Returns the labels in extraction order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(label, _)| label.as_str())
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true when the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Human-readable descriptions used to enrich finding text.
///
/// These never influence the analysis itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionLookups {
    /// Coverage category code to description.
    #[serde(default)]
    pub coverage_categories: HashMap<String, String>,
    /// Earnings type code to description.
    #[serde(default)]
    pub earnings_types: HashMap<String, String>,
}

impl DescriptionLookups {
    /// Describes a coverage category code, e.g. `Κ (Κύρια ασφάλιση)`.
    ///
    /// Falls back to the bare code when no description is known.
    pub fn describe_category(&self, code: &str) -> String {
        describe(&self.coverage_categories, code)
    }

    /// Describes an earnings type code.
    pub fn describe_earnings_type(&self, code: &str) -> String {
        describe(&self.earnings_types, code)
    }
}

fn describe(lookup: &HashMap<String, String>, code: &str) -> String {
    let code = code.trim();
    match lookup.get(code) {
        Some(description) if !description.trim().is_empty() => {
            format!("{} ({})", code, description.trim())
        }
        _ => code.to_string(),
    }
}
