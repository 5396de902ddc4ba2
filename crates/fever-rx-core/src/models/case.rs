//! Past patient cases used by the similar-case matcher.

use serde::{Deserialize, Serialize};

use super::{DietType, Gender, Symptom};

/// One historical case with the medication that was given.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientCase {
    pub age: u32,
    pub temperature_f: f64,
    pub bmi: f64,
    /// Deduplicated, sorted
    pub symptoms: Vec<Symptom>,
    pub gender: Gender,
    pub allergies: bool,
    pub diet: DietType,
    pub pregnant: bool,
    pub recommended_medication: String,
}

impl PatientCase {
    /// Create a case with no symptoms, allergies or pregnancy.
    pub fn new(
        age: u32,
        temperature_f: f64,
        bmi: f64,
        gender: Gender,
        recommended_medication: impl Into<String>,
    ) -> Self {
        Self {
            age,
            temperature_f,
            bmi,
            symptoms: Vec::new(),
            gender,
            allergies: false,
            diet: DietType::NonVegetarian,
            pregnant: false,
            recommended_medication: recommended_medication.into(),
        }
    }

    /// Set symptoms, dropping duplicates.
    pub fn with_symptoms(mut self, symptoms: impl IntoIterator<Item = Symptom>) -> Self {
        let mut symptoms: Vec<Symptom> = symptoms.into_iter().collect();
        symptoms.sort();
        symptoms.dedup();
        self.symptoms = symptoms;
        self
    }
}
