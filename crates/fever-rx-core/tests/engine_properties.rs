//! Property tests for engine invariants.

use fever_rx_core::config::EngineConfig;
use fever_rx_core::engine::recommend;
use fever_rx_core::models::{Gender, MedicationRule, PatientProfile, RecommendationOutcome};
use fever_rx_core::table::ReferenceTable;
use proptest::prelude::*;

fn arb_rule() -> impl Strategy<Value = MedicationRule> {
    (
        prop::option::of((0u32..60, 0u32..60)),
        95.0..106.0f64,
        0.0..4.0f64,
        prop::sample::select(vec!["Paracetamol", "Ibuprofen", "Aspirin"]),
    )
        .prop_map(|(ages, min_temp, width, medication)| {
            let rule = MedicationRule::new(min_temp, min_temp + width, medication);
            match ages {
                Some((a, b)) => rule.with_ages(a.min(b), a.max(b)),
                None => rule,
            }
        })
}

fn arb_table() -> impl Strategy<Value = ReferenceTable> {
    prop::collection::vec(arb_rule(), 0..12).prop_map(|rules| ReferenceTable::new(rules).unwrap())
}

fn arb_gender() -> impl Strategy<Value = Gender> {
    prop::sample::select(vec![Gender::Male, Gender::Female, Gender::Other])
}

proptest! {
    /// Children under the cutoff are always referred
    #[test]
    fn pediatric_always_referred(
        table in arb_table(),
        age in 0u32..5,
        temperature in 90.0..110.0f64,
        gender in arb_gender(),
    ) {
        let profile = PatientProfile::new(age, temperature, gender);
        let result = recommend(&profile, &table, &EngineConfig::default(), Some("Paracetamol"));
        prop_assert_eq!(result.outcome, RecommendationOutcome::PediatricReferral);
    }

    /// Temperatures below the threshold never reach medication logic
    #[test]
    fn afebrile_never_medicated(
        table in arb_table(),
        age in 5u32..100,
        temperature in 90.0..99.0f64,
    ) {
        let profile = PatientProfile::new(age, temperature, Gender::Other);
        let result = recommend(&profile, &table, &EngineConfig::default(), None);
        prop_assert_eq!(result.outcome, RecommendationOutcome::NoFeverDetected);
    }

    /// Identical inputs give identical outputs
    #[test]
    fn deterministic(
        table in arb_table(),
        age in 0u32..100,
        temperature in 95.0..108.0f64,
        previous in prop::option::of(prop::sample::select(vec!["paracetamol", " IBUPROFEN", "aspirin"])),
    ) {
        let profile = PatientProfile::new(age, temperature, Gender::Male);
        let config = EngineConfig::default();
        let first = recommend(&profile, &table, &config, previous);
        let second = recommend(&profile, &table, &config, previous);
        prop_assert_eq!(first, second);
    }

    /// A suggested alternative never repeats the failed medication
    #[test]
    fn alternative_differs_from_previous(
        table in arb_table(),
        age in 5u32..100,
        temperature in 99.0..108.0f64,
        previous in prop::sample::select(vec!["Paracetamol", "ibuprofen", "ASPIRIN"]),
    ) {
        let profile = PatientProfile::new(age, temperature, Gender::Male);
        let result = recommend(&profile, &table, &EngineConfig::default(), Some(previous));
        if let RecommendationOutcome::AlternativeSuggested { medication } = result.outcome {
            prop_assert_ne!(medication.to_lowercase(), previous.to_lowercase());
        }
    }

    /// Direct matches always come from a rule that covers the patient
    #[test]
    fn direct_match_is_covered(
        table in arb_table(),
        age in 5u32..100,
        temperature in 99.0..108.0f64,
    ) {
        let profile = PatientProfile::new(age, temperature, Gender::Male);
        let result = recommend(&profile, &table, &EngineConfig::default(), None);
        if let RecommendationOutcome::DirectMatch { medication } = result.outcome {
            prop_assert!(table
                .rules()
                .iter()
                .any(|r| r.medication == medication && r.applies_to(age, temperature)));
        }
    }

    /// Pregnant patients are never shown ibuprofen as safe
    #[test]
    fn pregnant_never_presented_ibuprofen(
        table in arb_table(),
        age in 5u32..60,
        temperature in 99.0..108.0f64,
    ) {
        let profile = PatientProfile::new(age, temperature, Gender::Female).with_pregnant(true);
        let result = recommend(&profile, &table, &EngineConfig::default(), None);
        prop_assert_ne!(result.presentable_medication(), Some("Ibuprofen"));
    }
}
