//! Audit report assembly.
//!
//! Runs every analyzer once over the timeline and turns the results into
//! presentation-ready [`AuditFinding`]s in a fixed category order. Flagged
//! findings quote concrete examples; clear findings state what was checked.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tracing::debug;

use crate::analysis::{
    CeilingAssessment, CohortDetermination, analyze_retention, audit_ceilings,
    detect_multi_employer_months, detect_parallel_months, detect_unpaid, detect_zero_duration,
    determine_cohort, find_aggregated_intervals, summarize_fund_history,
};
use crate::config::{AuditConfig, ReportSettings};
use crate::models::{
    AuditFinding, DescriptionLookups, FindingCategory, GapInterval, InsuranceInterval,
    InsuredCohort, MonthAllocation,
};
use crate::parsing::{CanonicalColumn, SchemaCoverage};
use crate::timeline::{MonthAllocator, SOURCE_DATE_FORMAT, aggregate_cutoff_date};

/// Most examples quoted in a finding's detail text.
pub const MAX_EXAMPLES: usize = 5;

const HUNDRED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Everything the assembler reads.
#[derive(Debug, Clone, Copy)]
pub struct AssemblyInput<'a> {
    /// Built intervals, in source order.
    pub intervals: &'a [InsuranceInterval],
    /// Monthly allocations of those intervals.
    pub allocations: &'a [MonthAllocation],
    /// Coverage gaps between the intervals.
    pub gaps: &'a [GapInterval],
    /// Which canonical columns the input carried.
    pub coverage: &'a SchemaCoverage,
    /// Descriptions used to enrich finding text.
    pub lookups: &'a DescriptionLookups,
}

/// Builds the ordered finding list for one audit run.
pub struct ReportAssembler<'a> {
    config: &'a AuditConfig,
    settings: &'a ReportSettings,
    allocator: &'a MonthAllocator,
}

struct Draft {
    category: FindingCategory,
    headline: String,
    detail: String,
    suggested_action: String,
    flagged: bool,
    evidence: Value,
}

impl<'a> ReportAssembler<'a> {
    /// Creates an assembler over a configuration and run settings.
    pub fn new(
        config: &'a AuditConfig,
        settings: &'a ReportSettings,
        allocator: &'a MonthAllocator,
    ) -> Self {
        Self {
            config,
            settings,
            allocator,
        }
    }

    /// Runs every analyzer whose columns are present and returns the findings
    /// ordered by category, with ids `F01`, `F02`, ...
    pub fn assemble(&self, input: &AssemblyInput<'_>) -> Vec<AuditFinding> {
        let coverage = input.coverage;
        let money = [
            CanonicalColumn::GrossEarnings,
            CanonicalColumn::TotalContributions,
        ];

        let determination = determine_cohort(input.intervals);
        let cohort = determination
            .as_ref()
            .map_or(InsuredCohort::New, |d| d.cohort);

        let mut drafts: Vec<Draft> = Vec::new();
        drafts.push(self.cohort_finding(input, determination.as_ref()));

        if skip_unless(coverage.has(CanonicalColumn::Fund), FindingCategory::FundHistory) {
            drafts.push(self.fund_history_finding(input));
        }

        drafts.push(self.gaps_finding(input));

        if skip_unless(coverage.has_all(&money), FindingCategory::UnpaidContributions) {
            drafts.push(self.unpaid_finding(input));
        }

        if skip_unless(
            coverage.has(CanonicalColumn::Fund),
            FindingCategory::ParallelInsurance,
        ) {
            drafts.push(self.parallel_finding(input));
        }

        if skip_unless(
            coverage.has_all(&[
                CanonicalColumn::Fund,
                CanonicalColumn::Employer,
                CanonicalColumn::EarningsType,
            ]),
            FindingCategory::MultiEmployer,
        ) {
            drafts.push(self.multi_employer_finding(input));
        }

        let ceiling_columns =
            coverage.has_all(&[CanonicalColumn::Fund, CanonicalColumn::GrossEarnings]);
        let assessments = if ceiling_columns {
            audit_ceilings(
                input.allocations,
                self.config.classifier(),
                self.config.ceilings(),
                cohort,
            )
        } else {
            Vec::new()
        };

        if skip_unless(
            ceiling_columns && coverage.has(CanonicalColumn::TotalContributions),
            FindingCategory::LowRetention,
        ) {
            drafts.push(self.retention_finding(&assessments));
        }

        if skip_unless(ceiling_columns, FindingCategory::CeilingExcess) {
            drafts.push(self.ceiling_finding(&assessments, cohort));
        }

        drafts.push(self.aggregated_finding(input));

        drafts.sort_by_key(|d| d.category);
        drafts
            .into_iter()
            .enumerate()
            .map(|(index, draft)| AuditFinding {
                id: format!("F{:02}", index + 1),
                category: draft.category,
                headline: draft.headline,
                detail: draft.detail,
                suggested_action: draft.suggested_action,
                flagged: draft.flagged,
                evidence: draft.evidence,
            })
            .collect()
    }

    fn cohort_finding(
        &self,
        input: &AssemblyInput<'_>,
        determination: Option<&CohortDetermination>,
    ) -> Draft {
        let Some(determination) = determination else {
            return Draft {
                category: FindingCategory::OldOrNew,
                headline: "Cohort could not be determined".to_string(),
                detail: "No record carried valid start and end dates.".to_string(),
                suggested_action: "Check that the extracted rows include the period columns."
                    .to_string(),
                flagged: true,
                evidence: Value::Null,
            };
        };

        let first_funds: Vec<&str> = input
            .intervals
            .iter()
            .filter(|i| i.start_date == determination.earliest_start)
            .map(|i| i.fund_id.as_str())
            .filter(|f| !f.is_empty())
            .collect();

        Draft {
            category: FindingCategory::OldOrNew,
            headline: format!("Insured as {}", determination.cohort),
            detail: format!(
                "The earliest record starts on {}{}; people first insured before {} count as old insured.",
                fmt_date(determination.earliest_start),
                if first_funds.is_empty() {
                    String::new()
                } else {
                    format!(" ({})", first_funds.join(", "))
                },
                fmt_date(InsuredCohort::cutoff()),
            ),
            suggested_action: "Confirm the first insurance date; the cohort selects the ceiling table."
                .to_string(),
            flagged: false,
            evidence: json!({
                "cohort": determination.cohort,
                "earliest_start": determination.earliest_start.to_string(),
            }),
        }
    }

    fn fund_history_finding(&self, input: &AssemblyInput<'_>) -> Draft {
        let history = summarize_fund_history(input.intervals);
        let lines: Vec<String> = history
            .iter()
            .map(|span| {
                format!(
                    "{}: {} - {}, {} record(s), {} days",
                    span.fund_id,
                    fmt_date(span.first_start),
                    fmt_date(span.last_end),
                    span.record_count,
                    span.total_duration_days.round_dp(2)
                )
            })
            .collect();

        Draft {
            category: FindingCategory::FundHistory,
            headline: format!("{} fund(s) on record", history.len()),
            detail: if lines.is_empty() {
                "No record names a fund.".to_string()
            } else {
                lines.join("\n")
            },
            suggested_action: "Check that every known employment appears under the expected fund."
                .to_string(),
            flagged: false,
            evidence: Value::Array(
                history
                    .iter()
                    .map(|span| {
                        json!({
                            "fund": span.fund_id,
                            "first_start": span.first_start.to_string(),
                            "last_end": span.last_end.to_string(),
                            "records": span.record_count,
                            "duration_days": span.total_duration_days.to_string(),
                        })
                    })
                    .collect(),
            ),
        }
    }

    fn gaps_finding(&self, input: &AssemblyInput<'_>) -> Draft {
        let gaps = input.gaps;
        if gaps.is_empty() {
            return clear(
                FindingCategory::Gaps,
                "No coverage gaps",
                format!("No uncovered days {}.", checked_range(input.intervals)),
            );
        }

        let total_days: i64 = gaps.iter().map(|g| g.calendar_days).sum();
        let examples = gaps.iter().map(|g| {
            format!(
                "{} - {} ({} days, {} months)",
                fmt_date(g.start_date),
                fmt_date(g.end_date),
                g.calendar_days,
                g.months
            )
        });

        Draft {
            category: FindingCategory::Gaps,
            headline: format!("{} coverage gap(s) totalling {} days", gaps.len(), total_days),
            detail: list_examples(examples, gaps.len()),
            suggested_action:
                "Check whether the gaps were insured with another fund or can be recognized."
                    .to_string(),
            flagged: true,
            evidence: Value::Array(
                gaps.iter()
                    .map(|g| {
                        json!({
                            "start": g.start_date.to_string(),
                            "end": g.end_date.to_string(),
                            "calendar_days": g.calendar_days,
                            "months": g.months.to_string(),
                            "years": g.years.to_string(),
                        })
                    })
                    .collect(),
            ),
        }
    }

    fn unpaid_finding(&self, input: &AssemblyInput<'_>) -> Draft {
        let unpaid = detect_unpaid(input.intervals);
        let zero_duration = detect_zero_duration(input.intervals);
        let count = unpaid.len() + zero_duration.len();

        if count == 0 {
            return clear(
                FindingCategory::UnpaidContributions,
                "Every paid record carries contributions",
                format!(
                    "Money and duration agree for all {} record(s).",
                    input.intervals.len()
                ),
            );
        }

        let examples = unpaid
            .iter()
            .map(|i| {
                format!(
                    "row {}, {}: gross {:.2} with no contributions",
                    i.source_index + 1,
                    describe_interval(i, input.lookups),
                    i.gross_earnings
                )
            })
            .chain(zero_duration.iter().map(|i| {
                format!(
                    "row {}, {}: zero days but gross {:.2} and contributions {:.2}",
                    i.source_index + 1,
                    describe_interval(i, input.lookups),
                    i.gross_earnings,
                    i.total_contributions
                )
            }));

        let evidence_for = |kind: &str, i: &InsuranceInterval| {
            json!({
                "kind": kind,
                "row": i.source_index,
                "fund": i.fund_id,
                "start": i.start_date.to_string(),
                "end": i.end_date.to_string(),
                "duration_days": i.duration_days.to_string(),
                "gross": i.gross_earnings.to_string(),
                "contributions": i.total_contributions.to_string(),
            })
        };

        Draft {
            category: FindingCategory::UnpaidContributions,
            headline: format!("{} record(s) with missing contributions or duration", count),
            detail: list_examples(examples, count),
            suggested_action: "Ask the employer or fund whether the contributions were paid."
                .to_string(),
            flagged: true,
            evidence: Value::Array(
                unpaid
                    .iter()
                    .map(|i| evidence_for("unpaid", *i))
                    .chain(zero_duration.iter().map(|i| evidence_for("zero_duration", *i)))
                    .collect(),
            ),
        }
    }

    fn parallel_finding(&self, input: &AssemblyInput<'_>) -> Draft {
        let cutoff = self.config.parallel_cutoff_year();
        let parallel = detect_parallel_months(
            input.allocations,
            self.config.classifier(),
            self.config.parallel_pairs(),
            cutoff,
        );

        if parallel.is_empty() {
            return clear(
                FindingCategory::ParallelInsurance,
                "No parallel insurance",
                format!("No month up to {} is covered by two paired fund categories.", cutoff),
            );
        }

        let examples = parallel.iter().map(|p| {
            format!(
                "{:02}/{}: {} ({} days) with {} ({} days), funds {}",
                p.month,
                p.year,
                p.categories.0,
                p.first_days.round_dp(2),
                p.categories.1,
                p.second_days.round_dp(2),
                p.funds.join(", ")
            )
        });

        Draft {
            category: FindingCategory::ParallelInsurance,
            headline: format!("{} month(s) of parallel insurance", parallel.len()),
            detail: list_examples(examples, parallel.len()),
            suggested_action: "Check whether the parallel periods can be recognized separately."
                .to_string(),
            flagged: true,
            evidence: Value::Array(
                parallel
                    .iter()
                    .map(|p| {
                        json!({
                            "year": p.year,
                            "month": p.month,
                            "categories": [p.categories.0, p.categories.1],
                            "first_days": p.first_days.to_string(),
                            "second_days": p.second_days.to_string(),
                            "funds": p.funds,
                        })
                    })
                    .collect(),
            ),
        }
    }

    fn multi_employer_finding(&self, input: &AssemblyInput<'_>) -> Draft {
        let earnings_types = self.config.multi_employer_earnings_types();
        let months = detect_multi_employer_months(
            input.intervals,
            self.config.classifier(),
            earnings_types,
        );
        let described_types: Vec<String> = earnings_types
            .iter()
            .map(|code| input.lookups.describe_earnings_type(code))
            .collect();

        if months.is_empty() {
            return clear(
                FindingCategory::MultiEmployer,
                "One employer per month",
                format!(
                    "No month has more than one employer for earnings types {}.",
                    described_types.join(", ")
                ),
            );
        }

        let examples = months.iter().map(|m| {
            format!(
                "{:02}/{}: employers {}",
                m.month,
                m.year,
                m.employers.join(", ")
            )
        });

        Draft {
            category: FindingCategory::MultiEmployer,
            headline: format!("{} month(s) with more than one employer", months.len()),
            detail: format!(
                "{}\nEarnings types counted: {}.",
                list_examples(examples, months.len()),
                described_types.join(", ")
            ),
            suggested_action: "Check the combined earnings of those months against the ceiling."
                .to_string(),
            flagged: true,
            evidence: Value::Array(
                months
                    .iter()
                    .map(|m| json!({"year": m.year, "month": m.month, "employers": m.employers}))
                    .collect(),
            ),
        }
    }

    fn retention_finding(&self, assessments: &[CeilingAssessment]) -> Draft {
        let threshold = self.settings.audit_retention_threshold;
        let low: Vec<_> = analyze_retention(assessments, threshold)
            .into_iter()
            .filter(|r| r.is_low)
            .collect();
        let threshold_percent = (threshold * HUNDRED).normalize();

        if low.is_empty() {
            return clear(
                FindingCategory::LowRetention,
                "Retention at or above threshold",
                format!(
                    "All {} salaried month(s) retain at least {}% of earnings as contributions.",
                    assessments.len(),
                    threshold_percent
                ),
            );
        }

        let examples = low.iter().map(|r| {
            format!(
                "{:02}/{} {}: contributions {:.2} on {:.2} ({:.2}%)",
                r.month,
                r.year,
                r.fund_id,
                r.contrib_share,
                r.adjusted_gross,
                r.ratio * HUNDRED
            )
        });

        Draft {
            category: FindingCategory::LowRetention,
            headline: format!(
                "{} month(s) with retention below {}%",
                low.len(),
                threshold_percent
            ),
            detail: list_examples(examples, low.len()),
            suggested_action: "Compare the declared contributions with the payslips.".to_string(),
            flagged: true,
            evidence: Value::Array(
                low.iter()
                    .map(|r| {
                        json!({
                            "year": r.year,
                            "month": r.month,
                            "row": r.source_index,
                            "fund": r.fund_id,
                            "contributions": r.contrib_share.to_string(),
                            "adjusted_gross": r.adjusted_gross.to_string(),
                            "ratio": r.ratio.round_dp(4).to_string(),
                        })
                    })
                    .collect(),
            ),
        }
    }

    fn ceiling_finding(&self, assessments: &[CeilingAssessment], cohort: InsuredCohort) -> Draft {
        let excess: Vec<_> = assessments.iter().filter(|a| a.has_excess()).collect();

        if excess.is_empty() {
            return clear(
                FindingCategory::CeilingExcess,
                "Earnings within the ceiling",
                format!(
                    "All {} salaried month(s) are within the {} ceiling.",
                    assessments.len(),
                    cohort
                ),
            );
        }

        let total_excess: Decimal = excess.iter().map(|a| a.excess).sum();
        let examples = excess.iter().map(|a| {
            format!(
                "{:02}/{} {}: gross {:.2} over ceiling {:.2} by {:.2}",
                a.month,
                a.year,
                a.fund_id,
                a.gross_share,
                a.prorated_ceiling.unwrap_or_default(),
                a.excess
            )
        });

        Draft {
            category: FindingCategory::CeilingExcess,
            headline: format!(
                "{} month(s) above the ceiling, {:.2} in excess",
                excess.len(),
                total_excess
            ),
            detail: list_examples(examples, excess.len()),
            suggested_action: "Check whether contributions were charged on earnings above the ceiling."
                .to_string(),
            flagged: true,
            evidence: Value::Array(
                excess
                    .iter()
                    .map(|a| {
                        json!({
                            "year": a.year,
                            "month": a.month,
                            "row": a.source_index,
                            "fund": a.fund_id,
                            "gross": a.gross_share.to_string(),
                            "ceiling": a.ceiling.map(|c| c.to_string()),
                            "prorated_ceiling": a.prorated_ceiling.map(|c| c.to_string()),
                            "excess": a.excess.to_string(),
                        })
                    })
                    .collect(),
            ),
        }
    }

    fn aggregated_finding(&self, input: &AssemblyInput<'_>) -> Draft {
        let aggregated = find_aggregated_intervals(input.intervals, self.allocator);

        if aggregated.is_empty() {
            return clear(
                FindingCategory::AggregatedIntervals,
                "No lump-sum rows",
                format!(
                    "No multi-month row ending before {} was declared as a single lump.",
                    fmt_date(aggregate_cutoff_date())
                ),
            );
        }

        let examples = aggregated.iter().map(|a| {
            format!(
                "row {}, {} {} - {}: {} days spread over {} months",
                a.source_index + 1,
                a.fund_id,
                fmt_date(a.start_date),
                fmt_date(a.end_date),
                a.duration_days.round_dp(2),
                a.month_span
            )
        });

        Draft {
            category: FindingCategory::AggregatedIntervals,
            headline: format!("{} row(s) declared as lump sums", aggregated.len()),
            detail: list_examples(examples, aggregated.len()),
            suggested_action:
                "Request the monthly breakdown; the even split may misplace days between months."
                    .to_string(),
            flagged: true,
            evidence: Value::Array(
                aggregated
                    .iter()
                    .map(|a| {
                        json!({
                            "row": a.source_index,
                            "fund": a.fund_id,
                            "start": a.start_date.to_string(),
                            "end": a.end_date.to_string(),
                            "months": a.month_span,
                            "duration_days": a.duration_days.to_string(),
                        })
                    })
                    .collect(),
            ),
        }
    }
}

fn skip_unless(present: bool, category: FindingCategory) -> bool {
    if !present {
        debug!(%category, "Skipping analyzer; required columns are absent");
    }
    present
}

fn clear(category: FindingCategory, headline: &str, detail: String) -> Draft {
    Draft {
        category,
        headline: headline.to_string(),
        detail,
        suggested_action: "No action needed.".to_string(),
        flagged: false,
        evidence: Value::Array(Vec::new()),
    }
}

fn fmt_date(date: NaiveDate) -> String {
    date.format(SOURCE_DATE_FORMAT).to_string()
}

fn checked_range(intervals: &[InsuranceInterval]) -> String {
    let first = intervals.iter().map(|i| i.start_date).min();
    let last = intervals.iter().map(|i| i.end_date).max();
    match (first, last) {
        (Some(first), Some(last)) => {
            format!("between {} and {}", fmt_date(first), fmt_date(last))
        }
        _ => "in the records".to_string(),
    }
}

fn describe_interval(interval: &InsuranceInterval, lookups: &DescriptionLookups) -> String {
    let mut text = format!(
        "{} {} - {}",
        interval.fund_id,
        fmt_date(interval.start_date),
        fmt_date(interval.end_date)
    );
    if !interval.coverage_category.trim().is_empty() {
        text.push_str(&format!(
            ", category {}",
            lookups.describe_category(&interval.coverage_category)
        ));
    }
    text
}

fn list_examples(examples: impl Iterator<Item = String>, total: usize) -> String {
    let mut lines: Vec<String> = examples.take(MAX_EXAMPLES).collect();
    if total > MAX_EXAMPLES {
        lines.push(format!("... and {} more", total - MAX_EXAMPLES));
    }
    lines.join("\n")
}
