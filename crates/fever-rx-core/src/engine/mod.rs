//! Recommendation engine.
//!
//! Pipeline: Pediatric guard → Fever check → Range filter → Fallback / Mode
//! selection → Previous-medication substitution → Safety override

mod normalizer;
mod safety;
mod selection;

pub use normalizer::*;
pub use safety::*;
pub use selection::*;

use crate::config::EngineConfig;
use crate::models::{ApproximateMatch, PatientProfile, Recommendation, RecommendationOutcome};
use crate::table::ReferenceTable;
use thiserror::Error;

/// Engine errors. Raised only while loading tables or configs.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Stateless engine over a borrowed table and config.
pub struct Engine<'a> {
    table: &'a ReferenceTable,
    config: &'a EngineConfig,
}

impl<'a> Engine<'a> {
    /// Create a new engine.
    pub fn new(table: &'a ReferenceTable, config: &'a EngineConfig) -> Self {
        Self { table, config }
    }

    /// Recommend using the previous medication recorded on the profile.
    pub fn recommend_profile(&self, profile: &PatientProfile) -> Recommendation {
        self.recommend(profile, profile.previous_medication.as_deref())
    }

    /// Recommend a medication. Never fails; "no match" is an outcome.
    pub fn recommend(&self, profile: &PatientProfile, previous_medication: Option<&str>) -> Recommendation {
        let outcome = self.decide(profile, previous_medication);
        tracing::debug!(
            age = profile.age,
            temperature_f = profile.temperature_f,
            outcome = outcome.kind(),
            "recommendation decided"
        );
        apply_contraindications(outcome.into(), profile, self.config)
    }

    /// Run the decision steps in priority order.
    fn decide(&self, profile: &PatientProfile, previous_medication: Option<&str>) -> RecommendationOutcome {
        // 1. Children under the cutoff always go to a doctor
        if profile.age < self.config.pediatric_age_cutoff {
            return RecommendationOutcome::PediatricReferral;
        }

        // 2. No fever, no medication
        if profile.temperature_f < self.config.fever_threshold_f {
            return RecommendationOutcome::NoFeverDetected;
        }

        if self.table.is_empty() {
            return RecommendationOutcome::ConsultationRequired;
        }

        // 3. Range filter
        let rules = self.table.rules();
        let matched = matching_rules(rules, profile.age, profile.temperature_f);

        // 4. Nothing matched: nearest age band, or give up
        if matched.is_empty() {
            return match nearest_by_age(rules, profile.age) {
                Some((rule_index, rule)) => RecommendationOutcome::NearestAgeMatch {
                    medication: rule.medication.clone(),
                    note: ApproximateMatch {
                        rule_index,
                        rule_min_age: rule.min_age.unwrap_or(0),
                        age_difference: rule.age_distance(profile.age),
                    },
                },
                None => RecommendationOutcome::HighFeverNoMatch,
            };
        }

        // 5. Most frequent medication among matches
        let Some(candidate) = mode(matched.iter().map(|rule| rule.medication.as_str())) else {
            return RecommendationOutcome::ConsultationRequired;
        };

        // 6. Candidate already tried and failed
        let previous_key = previous_medication
            .map(medication_key)
            .filter(|key| !key.is_empty());
        if let Some(previous_key) = previous_key {
            if medication_key(candidate) == previous_key {
                return self.substitute(&previous_key);
            }
        }

        // 7. Direct match
        RecommendationOutcome::DirectMatch {
            medication: candidate.to_string(),
        }
    }

    /// Find a replacement anywhere in the table for a medication that failed.
    fn substitute(&self, previous_key: &str) -> RecommendationOutcome {
        match alternative_medication(self.table.rules(), previous_key) {
            Some(alternative) if medication_key(alternative) == previous_key => {
                RecommendationOutcome::AlternativeIneffective
            }
            Some(alternative) => RecommendationOutcome::AlternativeSuggested {
                medication: alternative.to_string(),
            },
            None => RecommendationOutcome::ConsultationRequired,
        }
    }

    /// Get the table for direct access.
    pub fn table(&self) -> &ReferenceTable {
        self.table
    }

    /// Get the config for direct access.
    pub fn config(&self) -> &EngineConfig {
        self.config
    }
}

/// Recommend a medication for one profile against one table.
pub fn recommend(
    profile: &PatientProfile,
    table: &ReferenceTable,
    config: &EngineConfig,
    previous_medication: Option<&str>,
) -> Recommendation {
    Engine::new(table, config).recommend(profile, previous_medication)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, MedicationRule};

    fn table(rules: Vec<MedicationRule>) -> ReferenceTable {
        ReferenceTable::new(rules).unwrap()
    }

    fn two_band_table() -> ReferenceTable {
        table(vec![
            MedicationRule::new(102.0, 104.0, "Ibuprofen").with_ages(18, 60),
            MedicationRule::new(100.0, 101.9, "Paracetamol").with_ages(5, 17),
        ])
    }

    fn outcome(table: &ReferenceTable, profile: &PatientProfile, previous: Option<&str>) -> RecommendationOutcome {
        recommend(profile, table, &EngineConfig::default(), previous).outcome
    }

    #[test]
    fn test_direct_match() {
        let profile = PatientProfile::new(30, 103.0, Gender::Male);
        assert_eq!(
            outcome(&two_band_table(), &profile, None),
            RecommendationOutcome::DirectMatch {
                medication: "Ibuprofen".into()
            }
        );
    }

    #[test]
    fn test_pediatric_guard_wins() {
        let profile = PatientProfile::new(4, 103.0, Gender::Male);
        assert_eq!(
            outcome(&two_band_table(), &profile, None),
            RecommendationOutcome::PediatricReferral
        );
    }

    #[test]
    fn test_afebrile() {
        let profile = PatientProfile::new(30, 98.6, Gender::Male);
        assert_eq!(
            outcome(&two_band_table(), &profile, None),
            RecommendationOutcome::NoFeverDetected
        );
    }

    #[test]
    fn test_threshold_is_febrile() {
        let rules = table(vec![MedicationRule::new(99.0, 101.0, "Paracetamol")]);
        let profile = PatientProfile::new(30, 99.0, Gender::Male);
        assert_eq!(
            outcome(&rules, &profile, None),
            RecommendationOutcome::DirectMatch {
                medication: "Paracetamol".into()
            }
        );
    }

    #[test]
    fn test_empty_table_requires_consultation() {
        let profile = PatientProfile::new(30, 103.0, Gender::Male);
        assert_eq!(
            outcome(&table(Vec::new()), &profile, None),
            RecommendationOutcome::ConsultationRequired
        );
    }

    #[test]
    fn test_high_fever_no_match_without_age_ranges() {
        let rules = table(vec![MedicationRule::new(100.0, 104.0, "A")]);
        let profile = PatientProfile::new(30, 106.0, Gender::Male);
        assert_eq!(outcome(&rules, &profile, None), RecommendationOutcome::HighFeverNoMatch);
    }

    #[test]
    fn test_nearest_age_fallback() {
        let profile = PatientProfile::new(70, 103.0, Gender::Male);
        match outcome(&two_band_table(), &profile, None) {
            RecommendationOutcome::NearestAgeMatch { medication, note } => {
                assert_eq!(medication, "Ibuprofen");
                assert_eq!(note.rule_index, 0);
                assert_eq!(note.rule_min_age, 18);
                assert_eq!(note.age_difference, 52);
            }
            other => panic!("expected NearestAgeMatch, got {:?}", other),
        }
    }

    #[test]
    fn test_mode_tie_break() {
        let rules = table(vec![
            MedicationRule::new(100.0, 104.0, "A"),
            MedicationRule::new(100.0, 104.0, "A"),
            MedicationRule::new(100.0, 104.0, "B"),
        ]);
        let profile = PatientProfile::new(30, 101.0, Gender::Other);
        assert_eq!(
            outcome(&rules, &profile, None),
            RecommendationOutcome::DirectMatch { medication: "A".into() }
        );
    }

    #[test]
    fn test_substitution_case_and_whitespace_insensitive() {
        let rules = table(vec![
            MedicationRule::new(100.0, 104.0, "A"),
            MedicationRule::new(100.0, 104.0, "A"),
            MedicationRule::new(105.0, 106.0, "B"),
        ]);
        let profile = PatientProfile::new(30, 101.0, Gender::Other);
        assert_eq!(
            outcome(&rules, &profile, Some("  a ")),
            RecommendationOutcome::AlternativeSuggested { medication: "B".into() }
        );
    }

    #[test]
    fn test_substitution_without_alternative() {
        let rules = table(vec![
            MedicationRule::new(100.0, 104.0, "A"),
            MedicationRule::new(100.0, 104.0, "a"),
        ]);
        let profile = PatientProfile::new(30, 101.0, Gender::Other);
        assert_eq!(
            outcome(&rules, &profile, Some("A")),
            RecommendationOutcome::ConsultationRequired
        );
    }

    #[test]
    fn test_different_previous_medication_keeps_candidate() {
        let profile = PatientProfile::new(30, 103.0, Gender::Male);
        assert_eq!(
            outcome(&two_band_table(), &profile, Some("Aspirin")),
            RecommendationOutcome::DirectMatch {
                medication: "Ibuprofen".into()
            }
        );
    }

    #[test]
    fn test_blank_previous_medication_ignored() {
        let profile = PatientProfile::new(30, 103.0, Gender::Male);
        assert_eq!(
            outcome(&two_band_table(), &profile, Some("   ")),
            RecommendationOutcome::DirectMatch {
                medication: "Ibuprofen".into()
            }
        );
    }

    #[test]
    fn test_recommend_profile_uses_profile_previous() {
        let rules = two_band_table();
        let config = EngineConfig::default();
        let engine = Engine::new(&rules, &config);
        let profile = PatientProfile::new(30, 103.0, Gender::Male)
            .with_previous_medication(Some("ibuprofen".into()));

        assert_eq!(
            engine.recommend_profile(&profile).outcome,
            RecommendationOutcome::AlternativeSuggested {
                medication: "Paracetamol".into()
            }
        );
    }

    #[test]
    fn test_pregnancy_override_applied() {
        let profile = PatientProfile::new(30, 103.0, Gender::Female).with_pregnant(true);
        let result = recommend(&profile, &two_band_table(), &EngineConfig::default(), None);

        assert!(result.is_contraindicated());
        assert_eq!(result.presentable_medication(), None);
    }

    #[test]
    fn test_pregnancy_override_on_nearest_age() {
        let profile = PatientProfile::new(70, 103.0, Gender::Female).with_pregnant(true);
        let result = recommend(&profile, &two_band_table(), &EngineConfig::default(), None);

        assert!(matches!(
            result.outcome,
            RecommendationOutcome::NearestAgeMatch { .. }
        ));
        assert!(result.is_contraindicated());
    }
}
