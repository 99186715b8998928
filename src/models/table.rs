//! Semantic report tables.
//!
//! A [`ReportTable`] is an ordered column list plus ordered rows of [`Cell`]s,
//! with a highlight mask of the same shape. Rendering and export are left to
//! the caller.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Cell {
    /// No value.
    Empty,
    /// Free text.
    Text(String),
    /// Whole number (e.g. a year).
    Integer(i64),
    /// Decimal quantity or amount.
    Amount(Decimal),
}

impl Cell {
    /// Returns the decimal value of an `Amount` or `Integer` cell.
    pub fn as_amount(&self) -> Option<Decimal> {
        match self {
            Cell::Amount(value) => Some(*value),
            Cell::Integer(value) => Some(Decimal::from(*value)),
            _ => None,
        }
    }

    /// Returns the text of a `Text` cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Returns true for `Empty` cells.
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// Why a cell should be visually flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Highlight {
    /// Nothing to flag.
    #[default]
    Plain,
    /// The cell holds days from a synthetic aggregate interval.
    SyntheticAggregate,
    /// The contribution percentage is below the highlight threshold.
    LowRetention,
}

/// A pivoted report table and its highlight mask.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTable {
    /// Table title.
    pub title: String,
    /// Ordered column labels.
    pub columns: Vec<String>,
    /// Ordered rows; each has one cell per column.
    pub rows: Vec<Vec<Cell>>,
    /// Highlight mask; same shape as `rows`.
    pub highlights: Vec<Vec<Highlight>>,
}

impl ReportTable {
    /// Creates an empty table with the given columns.
    pub fn new(title: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            title: title.into(),
            columns,
            rows: Vec::new(),
            highlights: Vec::new(),
        }
    }

    /// Appends a row with its highlight mask.
    ///
    /// # Panics
    ///
    /// Panics if either slice does not have one entry per column.
    pub fn push_row(&mut self, cells: Vec<Cell>, highlights: Vec<Highlight>) {
        assert_eq!(cells.len(), self.columns.len(), "row width must match columns");
        assert_eq!(highlights.len(), self.columns.len(), "mask width must match columns");
        self.rows.push(cells);
        self.highlights.push(highlights);
    }

    /// Returns the index of a column by label.
    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == label)
    }

    /// Returns the cell at `row`, column `label`.
    pub fn cell(&self, row: usize, label: &str) -> Option<&Cell> {
        let column = self.column_index(label)?;
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Returns the highlight at `row`, column `label`.
    pub fn highlight(&self, row: usize, label: &str) -> Option<Highlight> {
        let column = self.column_index(label)?;
        self.highlights.get(row).and_then(|r| r.get(column)).copied()
    }

    /// Number of rows, including total and separator rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
