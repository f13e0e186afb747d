use serde::{Deserialize, Serialize};

use crate::model::OccurrenceFeatures;

// ---------------------------------------------------------------------------
// Assertion kinds
// ---------------------------------------------------------------------------

/// A fact kind that a pairwise comparison may establish.
///
/// Closed set; firing is binary and carries no payload. The serialized
/// names follow the upstream vocabulary, so configuration files and JSON
/// reports use `SAME_ACCEPTED_SPECIES`, `WITHIN_200m`, etc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeatureAssertion {
    SameAcceptedSpecies,
    SameSpecimen,
    SameDate,
    ApproximateDate,
    #[serde(rename = "WITHIN_200m")]
    Within200m,
    SameCountry,
    SameRecorderName,
}

impl FeatureAssertion {
    /// Every assertion kind, in rule-evaluation order.
    pub const ALL: [FeatureAssertion; 7] = [
        Self::SameAcceptedSpecies,
        Self::SameSpecimen,
        Self::SameDate,
        Self::ApproximateDate,
        Self::Within200m,
        Self::SameCountry,
        Self::SameRecorderName,
    ];
}

impl std::fmt::Display for FeatureAssertion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SameAcceptedSpecies => write!(f, "SAME_ACCEPTED_SPECIES"),
            Self::SameSpecimen => write!(f, "SAME_SPECIMEN"),
            Self::SameDate => write!(f, "SAME_DATE"),
            Self::ApproximateDate => write!(f, "APPROXIMATE_DATE"),
            Self::Within200m => write!(f, "WITHIN_200m"),
            Self::SameCountry => write!(f, "SAME_COUNTRY"),
            Self::SameRecorderName => write!(f, "SAME_RECORDER_NAME"),
        }
    }
}

// ---------------------------------------------------------------------------
// Comparison result
// ---------------------------------------------------------------------------

/// Immutable result of comparing exactly two feature accessors.
///
/// Borrows both operands and owns the justification: the fired assertions
/// in rule-evaluation order. Constructed once by the generator, queried by
/// membership afterwards.
#[derive(Debug)]
pub struct RelationshipAssertion<'a, T: OccurrenceFeatures> {
    left: &'a T,
    right: &'a T,
    justification: Vec<FeatureAssertion>,
}

impl<'a, T: OccurrenceFeatures> RelationshipAssertion<'a, T> {
    pub(crate) fn new(left: &'a T, right: &'a T, justification: Vec<FeatureAssertion>) -> Self {
        Self { left, right, justification }
    }

    pub fn left(&self) -> &T {
        self.left
    }

    pub fn right(&self) -> &T {
        self.right
    }

    /// Fired assertions, in rule-evaluation order.
    pub fn justification(&self) -> &[FeatureAssertion] {
        &self.justification
    }

    /// True when no rule fired for this pair.
    pub fn is_empty(&self) -> bool {
        self.justification.is_empty()
    }

    /// True iff `kind` fired for this pair.
    pub fn justification_contains(&self, kind: FeatureAssertion) -> bool {
        self.justification.contains(&kind)
    }

    /// True iff every given kind fired for this pair.
    pub fn justification_contains_all(&self, kinds: &[FeatureAssertion]) -> bool {
        kinds.iter().all(|kind| self.justification.contains(kind))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
