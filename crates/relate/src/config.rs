use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use crate::assertion::FeatureAssertion;
use crate::error::RelateError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RelateConfig {
    pub name: String,
    pub datasets: HashMap<String, DatasetConfig>,
    pub pair: PairConfig,
    #[serde(default)]
    pub policy: Option<LinkPolicy>,
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    pub file: String,
    pub columns: ColumnMapping,
}

/// Maps record features to CSV column headers. Only `id` is required;
/// every unmapped feature loads as absent.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnMapping {
    pub id: String,
    #[serde(default)]
    pub dataset_key: Option<String>,
    #[serde(default)]
    pub occurrence_id: Option<String>,
    #[serde(default)]
    pub record_number: Option<String>,
    #[serde(default)]
    pub catalog_number: Option<String>,
    #[serde(default)]
    pub species_key: Option<String>,
    #[serde(default)]
    pub taxon_key: Option<String>,
    #[serde(default)]
    pub latitude: Option<String>,
    #[serde(default)]
    pub longitude: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub day: Option<String>,
    #[serde(default)]
    pub event_date: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub recorded_by: Option<String>,
    #[serde(default)]
    pub type_status: Option<String>,
}

// ---------------------------------------------------------------------------
// Pair
// ---------------------------------------------------------------------------

/// The two datasets whose cross product is compared. Left/right fixes the
/// report orientation only; the fired assertion set is symmetric.
#[derive(Debug, Clone, Deserialize)]
pub struct PairConfig {
    pub left: String,
    pub right: String,
}

// ---------------------------------------------------------------------------
// Link policy
// ---------------------------------------------------------------------------

/// Externally configured link decision. The engine ships no built-in
/// threshold; whether a justified pair is actually linked is the
/// deployment's call, expressed here.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkPolicy {
    pub name: String,
    pub rules: Vec<PolicyRule>,
}

/// A policy rule matches when every assertion in `all_of` fired.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyRule {
    pub name: String,
    pub all_of: Vec<FeatureAssertion>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl RelateConfig {
    pub fn from_toml(input: &str) -> Result<Self, RelateError> {
        let config: RelateConfig =
            toml::from_str(input).map_err(|e| RelateError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RelateError> {
        if self.datasets.len() != 2 {
            return Err(RelateError::ConfigValidation(format!(
                "exactly 2 datasets are required, got {}",
                self.datasets.len()
            )));
        }

        for side in [&self.pair.left, &self.pair.right] {
            if !self.datasets.contains_key(side) {
                return Err(RelateError::UnknownDataset(format!(
                    "pair references dataset '{side}' which is not defined"
                )));
            }
        }

        if self.pair.left == self.pair.right {
            return Err(RelateError::ConfigValidation(
                "pair must reference two different datasets".into(),
            ));
        }

        if let Some(ref policy) = self.policy {
            if policy.rules.is_empty() {
                return Err(RelateError::ConfigValidation(format!(
                    "policy '{}' has no rules",
                    policy.name
                )));
            }
            let mut seen = HashSet::new();
            for rule in &policy.rules {
                if rule.all_of.is_empty() {
                    return Err(RelateError::ConfigValidation(format!(
                        "policy rule '{}' has an empty all_of set",
                        rule.name
                    )));
                }
                if !seen.insert(rule.name.as_str()) {
                    return Err(RelateError::ConfigValidation(format!(
                        "duplicate policy rule name '{}'",
                        rule.name
                    )));
                }
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
