//! Similar-case matching against a dataset of past patients.
//!
//! A case is similar when its age, temperature and BMI fall inside the
//! tolerance windows around the patient and every categorical attribute is
//! equal. The recommended medication is the mode over similar cases.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::engine::{apply_contraindications, mode};
use crate::models::{PatientCase, PatientProfile, Recommendation, RecommendationOutcome, Symptom};

/// Half-widths of the numeric similarity windows (inclusive).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CaseTolerance {
    pub age_years: u32,
    pub temperature_f: f64,
    pub bmi: f64,
}

impl Default for CaseTolerance {
    fn default() -> Self {
        Self {
            age_years: 5,
            temperature_f: 0.5,
            bmi: 2.0,
        }
    }
}

/// Matcher over a borrowed case dataset.
pub struct CaseMatcher<'a> {
    cases: &'a [PatientCase],
    tolerance: CaseTolerance,
    config: &'a EngineConfig,
}

impl<'a> CaseMatcher<'a> {
    /// Create a matcher with default tolerances.
    pub fn new(cases: &'a [PatientCase], config: &'a EngineConfig) -> Self {
        Self {
            cases,
            tolerance: CaseTolerance::default(),
            config,
        }
    }

    /// Override the tolerance windows.
    pub fn with_tolerance(mut self, tolerance: CaseTolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Cases similar to the profile, in dataset order.
    pub fn find_similar(&self, profile: &PatientProfile) -> Vec<&'a PatientCase> {
        self.cases
            .iter()
            .filter(|case| self.is_similar(case, profile))
            .collect()
    }

    /// Recommend the most common medication among similar cases.
    pub fn recommend(&self, profile: &PatientProfile) -> Recommendation {
        let outcome = self.decide(profile);
        tracing::debug!(outcome = outcome.kind(), "similar-case recommendation decided");
        apply_contraindications(outcome.into(), profile, self.config)
    }

    fn decide(&self, profile: &PatientProfile) -> RecommendationOutcome {
        if profile.age < self.config.pediatric_age_cutoff {
            return RecommendationOutcome::PediatricReferral;
        }
        if profile.temperature_f < self.config.fever_threshold_f {
            return RecommendationOutcome::NoFeverDetected;
        }

        let similar = self.find_similar(profile);
        match mode(similar.iter().map(|case| case.recommended_medication.as_str())) {
            Some(medication) => RecommendationOutcome::DirectMatch {
                medication: medication.to_string(),
            },
            None => RecommendationOutcome::ConsultationRequired,
        }
    }

    fn is_similar(&self, case: &PatientCase, profile: &PatientProfile) -> bool {
        let tol = &self.tolerance;

        // Profiles without a BMI use 0.0, as the intake form does
        let bmi = profile.bmi.unwrap_or(0.0);

        case.age.abs_diff(profile.age) <= tol.age_years
            && (case.temperature_f - profile.temperature_f).abs() <= tol.temperature_f
            && (case.bmi - bmi).abs() <= tol.bmi
            && same_symptoms(&case.symptoms, &profile.symptoms)
            && case.gender == profile.gender
            && case.allergies == profile.allergies.is_present()
            && case.diet == profile.diet
            && case.pregnant == profile.pregnant
    }
}

/// Symptoms compare as sets; datasets may list them in any order.
fn same_symptoms(a: &[Symptom], b: &[Symptom]) -> bool {
    a.iter().collect::<BTreeSet<_>>() == b.iter().collect::<BTreeSet<_>>()
}
