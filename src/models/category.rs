//! Fund category tags.

use serde::{Deserialize, Serialize};

/// The closed set of fund categories the analyzers reason about.
///
/// Records are mapped onto these tags by the
/// [`FundClassifier`](crate::timeline::FundClassifier); a record may carry
/// none of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundCategory {
    /// Salaried employment in the general scheme.
    GeneralEmployment,
    /// Self-employed lump-sum coverage, category K.
    SelfEmployedLumpK,
    /// Engineers' fund lump-sum coverage, categories ΚΣ / ΠΚΣ.
    EngineersLump,
    /// Farmers' fund lump-sum coverage, category K.
    FarmersLumpK,
}

impl FundCategory {
    /// All categories, in declaration order.
    pub const ALL: [FundCategory; 4] = [
        FundCategory::GeneralEmployment,
        FundCategory::SelfEmployedLumpK,
        FundCategory::EngineersLump,
        FundCategory::FarmersLumpK,
    ];

    /// Parses the snake_case name used in configuration files.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "general_employment" => Some(FundCategory::GeneralEmployment),
            "self_employed_lump_k" => Some(FundCategory::SelfEmployedLumpK),
            "engineers_lump" => Some(FundCategory::EngineersLump),
            "farmers_lump_k" => Some(FundCategory::FarmersLumpK),
            _ => None,
        }
    }
}

impl std::fmt::Display for FundCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FundCategory::GeneralEmployment => write!(f, "general employment"),
            FundCategory::SelfEmployedLumpK => write!(f, "self-employed lump K"),
            FundCategory::EngineersLump => write!(f, "engineers' fund lump ΚΣ/ΠΚΣ"),
            FundCategory::FarmersLumpK => write!(f, "farmers' fund lump K"),
        }
    }
}
