//! The audit engine.
//!
//! [`AuditEngine`] is the single entry point that runs the whole pipeline over
//! a collection of source rows: column reconciliation, interval building,
//! month allocation, gap detection, pivot tables and finding assembly.

use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::analysis::detect_gaps;
use crate::config::{AuditConfig, ConfigLoader, ReportSettings};
use crate::models::{AuditReport, DescriptionLookups, InsuranceInterval, SourceRow};
use crate::parsing::{ColumnReconciler, SchemaCoverage};
use crate::report::{AssemblyInput, ReportAssembler, build_pivots};
use crate::timeline::{MonthAllocator, build_interval};

/// Runs coverage audits against a loaded configuration.
///
/// The engine holds no per-run state; every run receives its
/// [`ReportSettings`] explicitly, so cloning an engine and running it from
/// several places is safe.
///
/// # Example
///
/// ```
/// use coverage_audit::config::{ConfigLoader, ReportSettings};
/// use coverage_audit::engine::AuditEngine;
/// use coverage_audit::models::{DescriptionLookups, SourceRow};
///
/// let engine = AuditEngine::new(ConfigLoader::builtin().unwrap());
/// let rows = vec![SourceRow::from_pairs([
///     ("Ταμείο", "ΙΚΑ-ΕΤΑΜ"),
///     ("Από", "01/01/2010"),
///     ("Έως", "31/03/2010"),
///     ("Μήνες", "3"),
///     ("Μικτές αποδοχές", "3.000,00"),
///     ("Συνολικές εισφορές", "600,00"),
/// ])];
///
/// let report = engine.run(&rows, &DescriptionLookups::default(), &ReportSettings::default());
/// assert_eq!(report.intervals.len(), 1);
/// assert_eq!(report.allocations.len(), 3);
/// assert_eq!(report.tables.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct AuditEngine {
    config: Arc<ConfigLoader>,
    reconciler: ColumnReconciler,
}

impl AuditEngine {
    /// Creates an engine with the built-in column patterns.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
            reconciler: ColumnReconciler::default(),
        }
    }

    /// Replaces the column reconciler.
    pub fn with_reconciler(mut self, reconciler: ColumnReconciler) -> Self {
        self.reconciler = reconciler;
        self
    }

    /// Returns the audit configuration.
    pub fn config(&self) -> &AuditConfig {
        self.config.config()
    }

    /// Reconciles and builds intervals, recording which columns appeared.
    ///
    /// Rows that cannot be built are dropped; `source_index` keeps each
    /// interval's position among the input rows.
    pub fn build_intervals(&self, rows: &[SourceRow]) -> (Vec<InsuranceInterval>, SchemaCoverage) {
        let mut coverage = SchemaCoverage::default();
        let intervals = rows
            .iter()
            .enumerate()
            .filter_map(|(index, row)| {
                let reconciled = self.reconciler.reconcile_row(row);
                coverage.record(&reconciled);
                build_interval(&reconciled, index)
            })
            .collect();
        (intervals, coverage)
    }

    /// Runs a full audit.
    pub fn run(
        &self,
        rows: &[SourceRow],
        lookups: &DescriptionLookups,
        settings: &ReportSettings,
    ) -> AuditReport {
        let start_time = Instant::now();
        let config = self.config();

        let (intervals, coverage) = self.build_intervals(rows);

        let allocator = MonthAllocator::from_config(config, settings.convention);
        let allocations = allocator.allocate_all(&intervals);
        let gaps = detect_gaps(&intervals);
        let tables = build_pivots(
            &allocations,
            &settings.layouts,
            settings.highlight_retention_threshold,
        );

        let findings = ReportAssembler::new(config, settings, &allocator).assemble(&AssemblyInput {
            intervals: &intervals,
            allocations: &allocations,
            gaps: &gaps,
            coverage: &coverage,
            lookups,
        });

        info!(
            rows = rows.len(),
            intervals = intervals.len(),
            dropped = rows.len() - intervals.len(),
            allocations = allocations.len(),
            gaps = gaps.len(),
            findings = findings.len(),
            flagged = findings.iter().filter(|f| f.flagged).count(),
            convention = %settings.convention,
            duration_us = start_time.elapsed().as_micros(),
            "Audit completed"
        );

        AuditReport {
            settings: settings.clone(),
            intervals,
            allocations,
            gaps,
            tables,
            findings,
        }
    }
}
