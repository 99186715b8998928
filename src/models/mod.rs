//! Core data models for the coverage audit engine.
//!
//! This module contains the input rows, the canonical interval and its
//! monthly allocations, and the report outputs.

mod allocation;
mod category;
mod cohort;
mod finding;
mod gap;
mod interval;
mod report;
mod source;
mod table;

pub use allocation::MonthAllocation;
pub use category::FundCategory;
pub use cohort::InsuredCohort;
pub use finding::{AuditFinding, FindingCategory};
pub use gap::{AVERAGE_DAYS_PER_MONTH, AVERAGE_DAYS_PER_YEAR, GapInterval};
pub use interval::{
    CALENDAR_DAYS_PER_MONTH, CALENDAR_DAYS_PER_YEAR, DurationConvention, InsuranceInterval,
    REGISTRY_DAYS_PER_MONTH, REGISTRY_DAYS_PER_YEAR, resolve_duration,
};
pub use report::AuditReport;
pub use source::{DescriptionLookups, SourceRow};
pub use table::{Cell, Highlight, ReportTable};
