//! Configuration loading and per-run settings.
//!
//! This module loads the fund classification table, parallel-insurance pairs,
//! recognized earnings types and the earnings ceiling tables from YAML files,
//! and defines the [`ReportSettings`] passed explicitly to each audit run.
//!
//! # Example
//!
//! ```no_run
//! use coverage_audit::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/efka").unwrap();
//! println!("Parallel insurance audited up to {}", config.config().parallel_cutoff_year());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AuditConfig, CategoryRuleConfig, CeilingTables, CeilingsConfig, DEFAULT_RETENTION_THRESHOLD,
    ExemptionMarkers, FundsConfig, PivotLayout, ReportSettings,
};
