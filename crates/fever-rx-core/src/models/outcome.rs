//! Recommendation outcome models.

use serde::{Deserialize, Serialize};

/// Why a nearest-age match was approximate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApproximateMatch {
    /// Position of the chosen rule in the reference table
    pub rule_index: usize,
    /// The chosen rule's minimum age (0 when the rule only has a maximum)
    pub rule_min_age: u32,
    /// Absolute difference between patient age and `rule_min_age`
    pub age_difference: u32,
}

/// Decision produced by one recommendation call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecommendationOutcome {
    /// Temperature below the fever threshold
    NoFeverDetected,
    /// Patient younger than the pediatric cutoff
    PediatricReferral,
    /// Fever outside every handled range; seek immediate care
    HighFeverNoMatch,
    /// No exact rule matched; closest rule by age
    NearestAgeMatch { medication: String, note: ApproximateMatch },
    /// Ranges matched directly
    DirectMatch { medication: String },
    /// Previous medication failed; a different one is suggested
    AlternativeSuggested { medication: String },
    /// The only alternative found is the medication that already failed
    AlternativeIneffective,
    /// Nothing suitable; a doctor must decide
    ConsultationRequired,
}

impl RecommendationOutcome {
    /// The medication this outcome names, if any.
    pub fn medication(&self) -> Option<&str> {
        match self {
            RecommendationOutcome::NearestAgeMatch { medication, .. }
            | RecommendationOutcome::DirectMatch { medication }
            | RecommendationOutcome::AlternativeSuggested { medication } => Some(medication),
            RecommendationOutcome::NoFeverDetected
            | RecommendationOutcome::PediatricReferral
            | RecommendationOutcome::HighFeverNoMatch
            | RecommendationOutcome::AlternativeIneffective
            | RecommendationOutcome::ConsultationRequired => None,
        }
    }

    /// Whether the patient should be sent to a doctor instead of self-medicating.
    pub fn requires_referral(&self) -> bool {
        matches!(
            self,
            RecommendationOutcome::PediatricReferral
                | RecommendationOutcome::HighFeverNoMatch
                | RecommendationOutcome::AlternativeIneffective
                | RecommendationOutcome::ConsultationRequired
        )
    }

    /// Stable short name, used for flat history rows.
    pub fn kind(&self) -> &'static str {
        match self {
            RecommendationOutcome::NoFeverDetected => "no_fever_detected",
            RecommendationOutcome::PediatricReferral => "pediatric_referral",
            RecommendationOutcome::HighFeverNoMatch => "high_fever_no_match",
            RecommendationOutcome::NearestAgeMatch { .. } => "nearest_age_match",
            RecommendationOutcome::DirectMatch { .. } => "direct_match",
            RecommendationOutcome::AlternativeSuggested { .. } => "alternative_suggested",
            RecommendationOutcome::AlternativeIneffective => "alternative_ineffective",
            RecommendationOutcome::ConsultationRequired => "consultation_required",
        }
    }
}

/// Condition that makes a selected medication unsafe.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ContraindicationReason {
    Pregnancy,
}

/// Safety flag attached after medication selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contraindication {
    /// The medication that must not be presented as safe
    pub medication: String,
    pub reason: ContraindicationReason,
}

/// Full engine result: the decision plus any safety flag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub outcome: RecommendationOutcome,
    pub contraindication: Option<Contraindication>,
}

impl Recommendation {
    /// Wrap an outcome with no safety flag.
    pub fn new(outcome: RecommendationOutcome) -> Self {
        Self {
            outcome,
            contraindication: None,
        }
    }

    pub fn is_contraindicated(&self) -> bool {
        self.contraindication.is_some()
    }

    /// The medication to show the patient, withheld when contraindicated.
    pub fn presentable_medication(&self) -> Option<&str> {
        if self.is_contraindicated() {
            return None;
        }
        self.outcome.medication()
    }
}

impl From<RecommendationOutcome> for Recommendation {
    fn from(outcome: RecommendationOutcome) -> Self {
        Self::new(outcome)
    }
}
