//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading audit
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::{FundCategory, InsuredCohort};
use crate::timeline::{CategoryRule, FundClassifier};

use super::types::{AuditConfig, CeilingTables, CeilingsConfig, FundsConfig};

const FUNDS_FILE: &str = "funds.yaml";
const CEILINGS_FILE: &str = "ceilings.yaml";

const BUILTIN_FUNDS: &str = include_str!("../../config/efka/funds.yaml");
const BUILTIN_CEILINGS: &str = include_str!("../../config/efka/ceilings.yaml");

/// Loads and provides access to audit configuration.
///
/// # Directory Structure
///
/// ```text
/// config/efka/
/// ├── funds.yaml     # Fund classification, parallel pairs, earnings types
/// └── ceilings.yaml  # Monthly earnings ceilings per cohort and year
/// ```
///
/// # Example
///
/// ```no_run
/// use coverage_audit::config::ConfigLoader;
/// use coverage_audit::models::{FundCategory, InsuredCohort};
///
/// let loader = ConfigLoader::load("./config/efka").unwrap();
///
/// assert!(loader.classifier().is(FundCategory::GeneralEmployment, "ΙΚΑ-ΕΤΑΜ", "01"));
/// let ceiling = loader.ceiling_for(InsuredCohort::New, 2015);
/// println!("Ceiling: {:?}", ceiling);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AuditConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - A category name in `funds.yaml` is unknown
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let funds = Self::load_yaml::<FundsConfig>(&path.join(FUNDS_FILE))?;
        let ceilings = Self::load_yaml::<CeilingsConfig>(&path.join(CEILINGS_FILE))?;

        Self::from_parts(funds, ceilings)
    }

    /// Loads the configuration compiled into the crate.
    ///
    /// # Example
    ///
    /// ```
    /// use coverage_audit::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::builtin().unwrap();
    /// assert_eq!(loader.config().parallel_cutoff_year(), 2016);
    /// ```
    pub fn builtin() -> EngineResult<Self> {
        let funds = Self::parse_yaml::<FundsConfig>(BUILTIN_FUNDS, FUNDS_FILE)?;
        let ceilings = Self::parse_yaml::<CeilingsConfig>(BUILTIN_CEILINGS, CEILINGS_FILE)?;

        Self::from_parts(funds, ceilings)
    }

    /// Validates the raw files into an [`AuditConfig`].
    fn from_parts(funds: FundsConfig, ceilings: CeilingsConfig) -> EngineResult<Self> {
        let rules = funds
            .categories
            .iter()
            .map(|rule| {
                Ok(CategoryRule::new(
                    Self::category(&rule.category)?,
                    &rule.fund_keywords,
                    &rule.coverage_codes,
                ))
            })
            .collect::<EngineResult<Vec<_>>>()?;

        let parallel_pairs = funds
            .parallel_pairs
            .iter()
            .map(|[a, b]| Ok((Self::category(a)?, Self::category(b)?)))
            .collect::<EngineResult<Vec<_>>>()?;

        let config = AuditConfig::new(
            FundClassifier::new(rules),
            parallel_pairs,
            funds.parallel_cutoff_year,
            funds.multi_employer_earnings_types,
            funds.aggregate_exemptions,
            CeilingTables::new(ceilings.old_insured, ceilings.new_insured),
        );

        Ok(Self { config })
    }

    fn category(name: &str) -> EngineResult<FundCategory> {
        FundCategory::from_name(name).ok_or_else(|| {
            warn!(category = name, "Unknown fund category in configuration");
            EngineError::UnknownCategory {
                name: name.to_string(),
            }
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse_yaml(&content, &path_str)
    }

    fn parse_yaml<T: serde::de::DeserializeOwned>(content: &str, path: &str) -> EngineResult<T> {
        serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Returns the underlying audit configuration.
    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Returns the fund classifier.
    pub fn classifier(&self) -> &FundClassifier {
        self.config.classifier()
    }

    /// Gets the monthly earnings ceiling for a cohort and year.
    ///
    /// Years without their own entry use the most recent earlier entry.
    pub fn ceiling_for(&self, cohort: InsuredCohort, year: i32) -> Option<rust_decimal::Decimal> {
        self.config.ceilings().ceiling_for(cohort, year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/efka"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.config().parallel_cutoff_year(), 2016);
        assert_eq!(loader.classifier().rules().len(), 4);
    }

    #[test]
    fn test_builtin_matches_directory() {
        let loaded = ConfigLoader::load(config_path()).unwrap();
        let builtin = ConfigLoader::builtin().unwrap();

        assert_eq!(loaded.classifier(), builtin.classifier());
        assert_eq!(loaded.config().ceilings(), builtin.config().ceilings());
        assert_eq!(
            loaded.config().parallel_pairs(),
            builtin.config().parallel_pairs()
        );
    }

    #[test]
    fn test_parallel_pairs_loaded() {
        let loader = ConfigLoader::builtin().unwrap();
        let pairs = loader.config().parallel_pairs();

        assert_eq!(pairs.len(), 4);
        assert!(pairs.contains(&(
            FundCategory::GeneralEmployment,
            FundCategory::SelfEmployedLumpK
        )));
    }

    #[test]
    fn test_multi_employer_earnings_types_loaded() {
        let loader = ConfigLoader::builtin().unwrap();
        assert_eq!(
            loader.config().multi_employer_earnings_types(),
            &["01".to_string(), "16".to_string(), "99".to_string()]
        );
    }

    #[test]
    fn test_exemption_markers_loaded() {
        let loader = ConfigLoader::builtin().unwrap();
        let markers = loader.config().exemption_markers();
        assert!(markers.short_cycle_markers.contains(&"ΟΑΕΕ".to_string()));
        assert!(markers.semester_cycle_markers.contains(&"ΤΣΜΕΔΕ".to_string()));
    }

    #[test]
    fn test_ceiling_lookup_falls_back_to_earlier_year() {
        let loader = ConfigLoader::builtin().unwrap();

        assert_eq!(loader.ceiling_for(InsuredCohort::New, 2008), Some(dec("5543.55")));
        assert_eq!(
            loader.ceiling_for(InsuredCohort::New, 2009),
            loader.ceiling_for(InsuredCohort::New, 2008)
        );
        assert_eq!(loader.ceiling_for(InsuredCohort::Old, 1990), None);
    }

    #[test]
    fn test_classifier_from_config() {
        let loader = ConfigLoader::builtin().unwrap();
        let classifier = loader.classifier();

        assert!(classifier.is(FundCategory::GeneralEmployment, "ΙΚΑ-ΕΤΑΜ", "0101"));
        assert!(classifier.is(FundCategory::SelfEmployedLumpK, "ΟΑΕΕ-ΤΕΒΕ", "Κ"));
        assert!(classifier.is(FundCategory::EngineersLump, "ΤΣΜΕΔΕ", "ΚΣ"));
        assert!(classifier.is(FundCategory::FarmersLumpK, "ΟΓΑ", "Κ"));
        assert!(!classifier.is(FundCategory::FarmersLumpK, "ΟΓΑ", "ΕΠ"));
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");
        assert!(result.is_err());

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("funds.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_invalid_yaml_returns_parse_error() {
        let result = ConfigLoader::parse_yaml::<FundsConfig>("categories: [", "funds.yaml");

        match result {
            Err(EngineError::ConfigParseError { path, .. }) => assert_eq!(path, "funds.yaml"),
            _ => panic!("Expected ConfigParseError"),
        }
    }

    #[test]
    fn test_unknown_category_returns_error() {
        let funds = ConfigLoader::parse_yaml::<FundsConfig>(
            r#"
categories:
  - category: sailors
    fund_keywords: ["ΝΑΤ"]
parallel_pairs: []
parallel_cutoff_year: 2016
multi_employer_earnings_types: []
"#,
            "funds.yaml",
        )
        .unwrap();
        let ceilings =
            ConfigLoader::parse_yaml::<CeilingsConfig>(BUILTIN_CEILINGS, CEILINGS_FILE).unwrap();

        match ConfigLoader::from_parts(funds, ceilings) {
            Err(EngineError::UnknownCategory { name }) => assert_eq!(name, "sailors"),
            _ => panic!("Expected UnknownCategory error"),
        }
    }
}
