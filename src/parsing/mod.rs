//! Parsing of extracted cells and headers.
//!
//! This module turns the raw strings produced by document extraction into
//! typed values: amounts, normalized labels and canonical columns.

mod columns;
mod text;
mod value;

pub use columns::{
    CanonicalColumn, ColumnReconciler, MIN_SUBSTRING_PATTERN_CHARS, ReconciledColumn,
    ReconciledRow, SchemaCoverage,
};
pub use text::{normalize_code, normalize_label};
pub use value::{
    CURRENT_CURRENCY_MARKERS, LEGACY_CURRENCY_MARKERS, MAX_AMOUNT_MAGNITUDE, has_legacy_currency,
    parse_amount, parse_amount_with, parse_optional_amount,
};
