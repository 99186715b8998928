//! Fund classification.
//!
//! Maps a record's fund name and coverage category code onto the closed set of
//! [`FundCategory`] tags through a keyword table, so that new fund aliases are
//! a configuration change rather than an analyzer change.

use crate::models::FundCategory;
use crate::parsing::{normalize_code, normalize_label};

/// Returns true if the normalized fund name contains any of the markers.
pub fn fund_has_marker(fund: &str, markers: &[String]) -> bool {
    let fund = normalize_label(fund);
    markers
        .iter()
        .map(|m| normalize_label(m))
        .any(|m| !m.is_empty() && fund.contains(&m))
}

/// One row of the classification table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    /// The category assigned when the rule matches.
    pub category: FundCategory,
    fund_keywords: Vec<String>,
    coverage_codes: Vec<String>,
}

impl CategoryRule {
    /// Creates a rule; keywords and codes are normalized here.
    ///
    /// An empty `coverage_codes` list matches any code.
    pub fn new<K, C>(category: FundCategory, fund_keywords: K, coverage_codes: C) -> Self
    where
        K: IntoIterator,
        K::Item: AsRef<str>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        Self {
            category,
            fund_keywords: fund_keywords
                .into_iter()
                .map(|k| normalize_label(k.as_ref()))
                .filter(|k| !k.is_empty())
                .collect(),
            coverage_codes: coverage_codes
                .into_iter()
                .map(|c| normalize_code(c.as_ref()))
                .filter(|c| !c.is_empty())
                .collect(),
        }
    }

    fn matches(&self, fund: &str, code: &str) -> bool {
        let fund_matches = self.fund_keywords.iter().any(|k| fund.contains(k.as_str()));
        let code_matches =
            self.coverage_codes.is_empty() || self.coverage_codes.iter().any(|c| c == code);
        fund_matches && code_matches
    }
}

/// Classifies records into [`FundCategory`] tags.
///
/// # Example
///
/// ```
/// use coverage_audit::timeline::{CategoryRule, FundClassifier};
/// use coverage_audit::models::FundCategory;
///
/// let classifier = FundClassifier::new(vec![
///     CategoryRule::new(FundCategory::GeneralEmployment, ["ΙΚΑ"], Vec::<&str>::new()),
///     CategoryRule::new(FundCategory::SelfEmployedLumpK, ["ΟΑΕΕ"], ["Κ"]),
/// ]);
///
/// assert_eq!(classifier.classify("ΙΚΑ-ΕΤΑΜ", "01"), vec![FundCategory::GeneralEmployment]);
/// assert!(classifier.is(FundCategory::SelfEmployedLumpK, "ΟΑΕΕ", "K"));
/// assert!(classifier.classify("ΟΑΕΕ", "ΕΠ").is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FundClassifier {
    rules: Vec<CategoryRule>,
}

impl FundClassifier {
    /// Creates a classifier from an ordered rule list.
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        Self { rules }
    }

    /// Returns the rules in evaluation order.
    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Returns every category the record belongs to, in rule order, without
    /// duplicates.
    pub fn classify(&self, fund: &str, coverage_code: &str) -> Vec<FundCategory> {
        let fund = normalize_label(fund);
        let code = normalize_code(coverage_code);
        let mut categories = Vec::new();
        for rule in &self.rules {
            if rule.matches(&fund, &code) && !categories.contains(&rule.category) {
                categories.push(rule.category);
            }
        }
        categories
    }

    /// Returns true if the record belongs to `category`.
    pub fn is(&self, category: FundCategory, fund: &str, coverage_code: &str) -> bool {
        let fund = normalize_label(fund);
        let code = normalize_code(coverage_code);
        self.rules
            .iter()
            .filter(|r| r.category == category)
            .any(|r| r.matches(&fund, &code))
    }
}
