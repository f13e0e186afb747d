use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::assertion::FeatureAssertion;

// ---------------------------------------------------------------------------
// Feature capability
// ---------------------------------------------------------------------------

/// The comparable attributes of one occurrence record, independent of its
/// backing representation (raw import, interpreted record, test fixture).
///
/// Every accessor is total: cross-dataset records routinely lack fields,
/// so absence is a value, never an error. Implementors do not need a
/// shared base type; only these signatures matter.
pub trait OccurrenceFeatures {
    fn id(&self) -> Option<&str>;
    fn dataset_key(&self) -> Option<&str>;
    fn occurrence_id(&self) -> Option<&str>;
    fn record_number(&self) -> Option<&str>;
    fn catalog_number(&self) -> Option<&str>;
    fn species_key(&self) -> Option<i64>;
    fn taxon_key(&self) -> Option<i64>;
    fn decimal_latitude(&self) -> Option<f64>;
    fn decimal_longitude(&self) -> Option<f64>;
    fn year(&self) -> Option<i32>;
    fn month(&self) -> Option<u32>;
    fn day(&self) -> Option<u32>;
    fn event_date(&self) -> Option<&str>;
    fn country_code(&self) -> Option<&str>;
    fn recorded_by(&self) -> Option<&str>;
    fn type_status(&self) -> Option<&str>;
}

/// A plain occurrence record with every feature optional.
///
/// The concrete implementor shipped with the crate; the CSV loader
/// produces these, and tests build them with struct-update syntax.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OccurrenceRecord {
    pub id: Option<String>,
    pub dataset_key: Option<String>,
    pub occurrence_id: Option<String>,
    pub record_number: Option<String>,
    pub catalog_number: Option<String>,
    pub species_key: Option<i64>,
    pub taxon_key: Option<i64>,
    pub decimal_latitude: Option<f64>,
    pub decimal_longitude: Option<f64>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub event_date: Option<String>,
    pub country_code: Option<String>,
    pub recorded_by: Option<String>,
    pub type_status: Option<String>,
}

impl OccurrenceFeatures for OccurrenceRecord {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
    fn dataset_key(&self) -> Option<&str> {
        self.dataset_key.as_deref()
    }
    fn occurrence_id(&self) -> Option<&str> {
        self.occurrence_id.as_deref()
    }
    fn record_number(&self) -> Option<&str> {
        self.record_number.as_deref()
    }
    fn catalog_number(&self) -> Option<&str> {
        self.catalog_number.as_deref()
    }
    fn species_key(&self) -> Option<i64> {
        self.species_key
    }
    fn taxon_key(&self) -> Option<i64> {
        self.taxon_key
    }
    fn decimal_latitude(&self) -> Option<f64> {
        self.decimal_latitude
    }
    fn decimal_longitude(&self) -> Option<f64> {
        self.decimal_longitude
    }
    fn year(&self) -> Option<i32> {
        self.year
    }
    fn month(&self) -> Option<u32> {
        self.month
    }
    fn day(&self) -> Option<u32> {
        self.day
    }
    fn event_date(&self) -> Option<&str> {
        self.event_date.as_deref()
    }
    fn country_code(&self) -> Option<&str> {
        self.country_code.as_deref()
    }
    fn recorded_by(&self) -> Option<&str> {
        self.recorded_by.as_deref()
    }
    fn type_status(&self) -> Option<&str> {
        self.type_status.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Type-status vocabulary
// ---------------------------------------------------------------------------

/// Recognized type-status designations.
///
/// Lookup is case-insensitive over publisher free text (`"HoloType"`
/// parses). Anything outside the vocabulary is treated as no recognized
/// status: the specimen rule does not apply on that route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeStatus {
    Holotype,
    Lectotype,
    Neotype,
    Syntype,
    Paratype,
    Paralectotype,
    Isotype,
    Isolectotype,
    Isosyntype,
    Allotype,
    Topotype,
}

impl TypeStatus {
    pub fn parse(raw: &str) -> Option<TypeStatus> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "HOLOTYPE" => Some(Self::Holotype),
            "LECTOTYPE" => Some(Self::Lectotype),
            "NEOTYPE" => Some(Self::Neotype),
            "SYNTYPE" => Some(Self::Syntype),
            "PARATYPE" => Some(Self::Paratype),
            "PARALECTOTYPE" => Some(Self::Paralectotype),
            "ISOTYPE" => Some(Self::Isotype),
            "ISOLECTOTYPE" => Some(Self::Isolectotype),
            "ISOSYNTYPE" => Some(Self::Isosyntype),
            "ALLOTYPE" => Some(Self::Allotype),
            "TOPOTYPE" => Some(Self::Topotype),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Pre-loaded records grouped by dataset name.
pub struct RelateInput {
    pub records: HashMap<String, Vec<OccurrenceRecord>>,
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// One cross-dataset pair with a non-empty justification.
#[derive(Debug, Clone, Serialize)]
pub struct RelatedPair {
    pub left_dataset: String,
    pub left_id: String,
    pub right_dataset: String,
    pub right_id: String,
    pub justification: Vec<FeatureAssertion>,
    /// Name of the first policy rule satisfied, when a policy is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_rule: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RelateSummary {
    pub pairs_compared: usize,
    pub pairs_related: usize,
    pub pairs_linked: usize,
    pub assertion_counts: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RelateMeta {
    pub config_name: String,
    pub left_dataset: String,
    pub right_dataset: String,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RelateReport {
    pub meta: RelateMeta,
    pub summary: RelateSummary,
    pub pairs: Vec<RelatedPair>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
