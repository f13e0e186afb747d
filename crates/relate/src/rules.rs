//! Pairwise feature comparison rules.
//!
//! Each rule is a pure, symmetric predicate over two feature accessors:
//! it fires by returning its assertion kind, and skips (returns `None`)
//! whenever a required field is missing or unparseable on either side.
//! Rules are independent: one firing never suppresses another.

use chrono::NaiveDate;

use crate::assertion::FeatureAssertion;
use crate::distance::distance_m;
use crate::model::{OccurrenceFeatures, TypeStatus};
use crate::normalize::normalize_opt;

/// Maximum surface distance for `WITHIN_200m`, meters. Inclusive.
pub const WITHIN_DISTANCE_M: f64 = 200.0;

/// Maximum calendar-day difference for `APPROXIMATE_DATE`. Covers the
/// trap-set-one-evening, collected-next-morning pattern and timezone slip.
pub const APPROXIMATE_DATE_DAYS: i64 = 1;

pub fn same_accepted_species<T: OccurrenceFeatures>(a: &T, b: &T) -> Option<FeatureAssertion> {
    let (ka, kb) = (a.species_key()?, b.species_key()?);
    if ka == kb {
        Some(FeatureAssertion::SameAcceptedSpecies)
    } else {
        None
    }
}

/// Same physical specimen: same taxon plus either a shared specimen
/// identifier or a shared recognized type status. The type-status route
/// fires even when location and country disagree; a holotype duplicated
/// under the same taxon is the same specimen (or a data issue worth
/// surfacing) regardless of where the records place it.
pub fn same_specimen<T: OccurrenceFeatures>(a: &T, b: &T) -> Option<FeatureAssertion> {
    if !same_taxon(a, b) {
        return None;
    }
    if shares_specimen_identifier(a, b) || shares_type_status(a, b) {
        Some(FeatureAssertion::SameSpecimen)
    } else {
        None
    }
}

pub fn same_date<T: OccurrenceFeatures>(a: &T, b: &T) -> Option<FeatureAssertion> {
    let (ya, ma, da) = (a.year()?, a.month()?, a.day()?);
    let (yb, mb, db) = (b.year()?, b.month()?, b.day()?);
    if ya == yb && ma == mb && da == db {
        Some(FeatureAssertion::SameDate)
    } else {
        None
    }
}

/// Calendar dates at most one day apart. Fires alongside `SAME_DATE` on
/// identical dates; consumers query by membership, so co-firing is
/// harmless and the zero-day case is not carved out.
pub fn approximate_date<T: OccurrenceFeatures>(a: &T, b: &T) -> Option<FeatureAssertion> {
    let da = event_day(a)?;
    let db = event_day(b)?;
    if (da - db).num_days().abs() <= APPROXIMATE_DATE_DAYS {
        Some(FeatureAssertion::ApproximateDate)
    } else {
        None
    }
}

pub fn within_200m<T: OccurrenceFeatures>(a: &T, b: &T) -> Option<FeatureAssertion> {
    let from = (a.decimal_latitude()?, a.decimal_longitude()?);
    let to = (b.decimal_latitude()?, b.decimal_longitude()?);
    if distance_m(from, to) <= WITHIN_DISTANCE_M {
        Some(FeatureAssertion::Within200m)
    } else {
        None
    }
}

pub fn same_country<T: OccurrenceFeatures>(a: &T, b: &T) -> Option<FeatureAssertion> {
    let ca = a.country_code()?.trim();
    let cb = b.country_code()?.trim();
    if !ca.is_empty() && ca.eq_ignore_ascii_case(cb) {
        Some(FeatureAssertion::SameCountry)
    } else {
        None
    }
}

pub fn same_recorder_name<T: OccurrenceFeatures>(a: &T, b: &T) -> Option<FeatureAssertion> {
    let ka = normalize_opt(a.recorded_by())?;
    let kb = normalize_opt(b.recorded_by())?;
    if ka == kb {
        Some(FeatureAssertion::SameRecorderName)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Taxon identity for the specimen rule: taxon keys when both sides carry
/// one, species keys otherwise.
fn same_taxon<T: OccurrenceFeatures>(a: &T, b: &T) -> bool {
    match (a.taxon_key(), b.taxon_key()) {
        (Some(ka), Some(kb)) => ka == kb,
        _ => match (a.species_key(), b.species_key()) {
            (Some(ka), Some(kb)) => ka == kb,
            _ => false,
        },
    }
}

/// Non-empty normalized specimen identifiers of one record. Identifiers
/// are compared across fields: a catalog number republished as a record
/// number still matches.
fn specimen_identifiers<T: OccurrenceFeatures>(o: &T) -> Vec<String> {
    [o.occurrence_id(), o.catalog_number(), o.record_number()]
        .into_iter()
        .filter_map(normalize_opt)
        .collect()
}

fn shares_specimen_identifier<T: OccurrenceFeatures>(a: &T, b: &T) -> bool {
    let left = specimen_identifiers(a);
    if left.is_empty() {
        return false;
    }
    specimen_identifiers(b).iter().any(|key| left.contains(key))
}

fn shares_type_status<T: OccurrenceFeatures>(a: &T, b: &T) -> bool {
    match (lookup_type_status(a.type_status()), lookup_type_status(b.type_status())) {
        (Some(sa), Some(sb)) => sa == sb,
        _ => false,
    }
}

fn lookup_type_status(raw: Option<&str>) -> Option<TypeStatus> {
    let raw = raw?;
    let status = TypeStatus::parse(raw);
    if status.is_none() {
        log::debug!("unrecognized type status {raw:?}, skipping type comparison");
    }
    status
}

/// Calendar day of the record: complete year/month/day when available and
/// valid, otherwise the date prefix of the event timestamp.
fn event_day<T: OccurrenceFeatures>(o: &T) -> Option<NaiveDate> {
    if let (Some(y), Some(m), Some(d)) = (o.year(), o.month(), o.day()) {
        if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
            return Some(date);
        }
    }
    let raw = o.event_date()?;
    NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
