//! Externally configured link decision.
//!
//! The engine stops at justified-assertion production; whether a pair of
//! records should actually be linked is a policy question, answered by
//! configuration rather than code.

use crate::assertion::RelationshipAssertion;
use crate::config::LinkPolicy;
use crate::model::OccurrenceFeatures;

/// Name of the first policy rule whose `all_of` set fired in full, or
/// `None` when no rule matches. Rules are checked in configuration order,
/// so deployments put their most specific rule first.
pub fn decide_link<'p, T: OccurrenceFeatures>(
    policy: &'p LinkPolicy,
    relationship: &RelationshipAssertion<'_, T>,
) -> Option<&'p str> {
    policy
        .rules
        .iter()
        .find(|rule| relationship.justification_contains_all(&rule.all_of))
        .map(|rule| rule.name.as_str())
}
