//! Report tables and finding assembly.

mod assembler;
mod pivot;

pub use assembler::{AssemblyInput, MAX_EXAMPLES, ReportAssembler};
pub use pivot::{
    CONTRIBUTIONS_COLUMN, GROSS_COLUMN, MONTH_COLUMNS, PERCENT_COLUMN, YEAR_COLUMN, build_pivot,
    build_pivots, contribution_percent,
};
