//! Insured cohort.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Whether a person counts as an "old" or a "new" insured.
///
/// People first insured before 1993-01-01 are old insured and fall under a
/// different ceiling table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsuredCohort {
    /// First insured before 1993-01-01.
    Old,
    /// First insured on or after 1993-01-01.
    New,
}

impl InsuredCohort {
    /// The first day on which a first insurance makes someone a new insured.
    pub fn cutoff() -> NaiveDate {
        NaiveDate::from_ymd_opt(1993, 1, 1).expect("valid cutoff date")
    }

    /// Classifies by the earliest insured day.
    pub fn from_first_insured(first: NaiveDate) -> Self {
        if first < Self::cutoff() {
            InsuredCohort::Old
        } else {
            InsuredCohort::New
        }
    }
}

impl std::fmt::Display for InsuredCohort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InsuredCohort::Old => write!(f, "old insured (before 1993)"),
            InsuredCohort::New => write!(f, "new insured (from 1993)"),
        }
    }
}
