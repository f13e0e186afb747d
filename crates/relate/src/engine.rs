use std::collections::BTreeMap;

use crate::assertion::{FeatureAssertion, RelationshipAssertion};
use crate::config::{DatasetConfig, RelateConfig};
use crate::error::RelateError;
use crate::model::{
    OccurrenceFeatures, OccurrenceRecord, RelateInput, RelateMeta, RelateReport, RelateSummary,
    RelatedPair,
};
use crate::{policy, rules};

type RuleFn<T> = fn(&T, &T) -> Option<FeatureAssertion>;

/// The fixed rule battery, in evaluation order.
///
/// The order is stable so the justification sequence is reproducible
/// across runs; consumers query by membership, not position.
fn rule_battery<T: OccurrenceFeatures>() -> [RuleFn<T>; 7] {
    [
        rules::same_accepted_species,
        rules::same_specimen,
        rules::same_date,
        rules::approximate_date,
        rules::within_200m,
        rules::same_country,
        rules::same_recorder_name,
    ]
}

/// Compare two occurrence records and package every fired assertion.
///
/// Total: never fails, whatever is absent on either side; no rule firing
/// yields an empty justification. Symmetric: swapping the operands yields
/// the same fired set, in the same order.
pub fn generate<'a, T: OccurrenceFeatures>(a: &'a T, b: &'a T) -> RelationshipAssertion<'a, T> {
    let battery = rule_battery::<T>();
    let mut justification = Vec::with_capacity(battery.len());
    for rule in battery {
        if let Some(kind) = rule(a, b) {
            justification.push(kind);
        }
    }
    RelationshipAssertion::new(a, b, justification)
}

/// Run a configured cross-dataset comparison. Returns every pair with a
/// non-empty justification, annotated with the policy verdict when a
/// policy is configured.
pub fn run(config: &RelateConfig, input: &RelateInput) -> Result<RelateReport, RelateError> {
    let left_name = &config.pair.left;
    let right_name = &config.pair.right;

    let left = input.records.get(left_name).ok_or_else(|| {
        RelateError::UnknownDataset(format!("left dataset '{left_name}' has no data"))
    })?;
    let right = input.records.get(right_name).ok_or_else(|| {
        RelateError::UnknownDataset(format!("right dataset '{right_name}' has no data"))
    })?;

    let mut pairs = Vec::new();
    let mut assertion_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut pairs_linked = 0;

    for left_record in left {
        for right_record in right {
            let relationship = generate(left_record, right_record);
            if relationship.is_empty() {
                continue;
            }

            for kind in relationship.justification() {
                *assertion_counts.entry(kind.to_string()).or_insert(0) += 1;
            }

            let link_rule = config
                .policy
                .as_ref()
                .and_then(|p| policy::decide_link(p, &relationship))
                .map(str::to_string);
            if link_rule.is_some() {
                pairs_linked += 1;
            }

            pairs.push(RelatedPair {
                left_dataset: left_name.clone(),
                left_id: left_record.id.clone().unwrap_or_default(),
                right_dataset: right_name.clone(),
                right_id: right_record.id.clone().unwrap_or_default(),
                justification: relationship.justification().to_vec(),
                link_rule,
            });
        }
    }

    Ok(RelateReport {
        meta: RelateMeta {
            config_name: config.name.clone(),
            left_dataset: left_name.clone(),
            right_dataset: right_name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary: RelateSummary {
            pairs_compared: left.len() * right.len(),
            pairs_related: pairs.len(),
            pairs_linked,
            assertion_counts,
        },
        pairs,
    })
}

/// Load CSV rows into occurrence records, applying the dataset's column
/// mapping.
///
/// A missing mapped column is a config-level error. Cell-level anomalies
/// follow the engine's tolerance: empty cells and numeric cells that fail
/// to parse load as absent, so the affected rules skip instead of the run
/// aborting.
pub fn load_csv_records(
    dataset: &str,
    csv_data: &str,
    config: &DatasetConfig,
) -> Result<Vec<OccurrenceRecord>, RelateError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| RelateError::Io(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let col = &config.columns;

    let idx = |name: &str| -> Result<usize, RelateError> {
        headers.iter().position(|h| h == name).ok_or_else(|| RelateError::MissingColumn {
            dataset: dataset.into(),
            column: name.into(),
        })
    };
    let opt_idx = |name: &Option<String>| -> Result<Option<usize>, RelateError> {
        match name {
            Some(n) => Ok(Some(idx(n)?)),
            None => Ok(None),
        }
    };

    let id_idx = idx(&col.id)?;
    let dataset_key_idx = opt_idx(&col.dataset_key)?;
    let occurrence_id_idx = opt_idx(&col.occurrence_id)?;
    let record_number_idx = opt_idx(&col.record_number)?;
    let catalog_number_idx = opt_idx(&col.catalog_number)?;
    let species_key_idx = opt_idx(&col.species_key)?;
    let taxon_key_idx = opt_idx(&col.taxon_key)?;
    let latitude_idx = opt_idx(&col.latitude)?;
    let longitude_idx = opt_idx(&col.longitude)?;
    let year_idx = opt_idx(&col.year)?;
    let month_idx = opt_idx(&col.month)?;
    let day_idx = opt_idx(&col.day)?;
    let event_date_idx = opt_idx(&col.event_date)?;
    let country_code_idx = opt_idx(&col.country_code)?;
    let recorded_by_idx = opt_idx(&col.recorded_by)?;
    let type_status_idx = opt_idx(&col.type_status)?;

    let mut records = Vec::new();

    for row in reader.records() {
        let row = row.map_err(|e| RelateError::Io(e.to_string()))?;

        let text = |i: Option<usize>| -> Option<String> {
            let value = row.get(i?)?.trim();
            if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        };
        let int = |i: Option<usize>| text(i).and_then(|v| v.parse::<i64>().ok());
        let float = |i: Option<usize>| text(i).and_then(|v| v.parse::<f64>().ok());

        records.push(OccurrenceRecord {
            id: text(Some(id_idx)),
            dataset_key: text(dataset_key_idx).or_else(|| Some(dataset.to_string())),
            occurrence_id: text(occurrence_id_idx),
            record_number: text(record_number_idx),
            catalog_number: text(catalog_number_idx),
            species_key: int(species_key_idx),
            taxon_key: int(taxon_key_idx),
            decimal_latitude: float(latitude_idx),
            decimal_longitude: float(longitude_idx),
            year: int(year_idx).and_then(|v| i32::try_from(v).ok()),
            month: int(month_idx).and_then(|v| u32::try_from(v).ok()),
            day: int(day_idx).and_then(|v| u32::try_from(v).ok()),
            event_date: text(event_date_idx),
            country_code: text(country_code_idx),
            recorded_by: text(recorded_by_idx),
            type_status: text(type_status_idx),
        });
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
