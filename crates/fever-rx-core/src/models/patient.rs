//! Patient models.

use serde::{Deserialize, Serialize};

/// BMI below this is underweight.
pub const BMI_UNDERWEIGHT_BELOW: f64 = 18.5;
/// BMI below this (and at or above underweight) is normal.
pub const BMI_NORMAL_BELOW: f64 = 25.0;
/// BMI below this (and at or above normal) is overweight.
pub const BMI_OVERWEIGHT_BELOW: f64 = 30.0;

/// Biological sex as collected on the intake form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Reported symptoms.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symptom {
    Headache,
    BodyAche,
    Fatigue,
}

/// Diet type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DietType {
    Vegetarian,
    NonVegetarian,
    Vegan,
}

/// Allergy information. Some intake forms ask yes/no, others take free text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Allergies {
    #[default]
    None,
    /// Yes/no form answered "yes"
    Present,
    /// Free-text description
    Described(String),
}

impl Allergies {
    /// Whether the patient reported any allergy.
    pub fn is_present(&self) -> bool {
        match self {
            Allergies::None => false,
            Allergies::Present => true,
            Allergies::Described(text) => !text.trim().is_empty(),
        }
    }
}

/// BMI category derived from the numeric BMI.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
    NotCalculated,
}

impl BmiCategory {
    /// Categorize a BMI value. Absent or non-positive values were never computed.
    pub fn from_bmi(bmi: Option<f64>) -> Self {
        match bmi {
            Some(b) if b.is_finite() && b > 0.0 => {
                if b < BMI_UNDERWEIGHT_BELOW {
                    BmiCategory::Underweight
                } else if b < BMI_NORMAL_BELOW {
                    BmiCategory::Normal
                } else if b < BMI_OVERWEIGHT_BELOW {
                    BmiCategory::Overweight
                } else {
                    BmiCategory::Obese
                }
            }
            _ => BmiCategory::NotCalculated,
        }
    }
}

/// Compute BMI from weight (kg) and height (cm).
///
/// Returns `None` when either value is non-positive.
pub fn compute_bmi(weight_kg: f64, height_cm: f64) -> Option<f64> {
    if weight_kg <= 0.0 || height_cm <= 0.0 {
        return None;
    }
    let height_m = height_cm / 100.0;
    Some(weight_kg / (height_m * height_m))
}

/// Immutable snapshot of one intake submission.
///
/// Deserialized profiles are normalized, so stored or hand-written JSON
/// cannot break the invariants the builders maintain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "ProfileFields")]
pub struct PatientProfile {
    /// Age in whole years
    pub age: u32,
    /// Body temperature in °F
    pub temperature_f: f64,
    /// BMI, if computed
    pub bmi: Option<f64>,
    /// Derived from `bmi`
    pub bmi_category: BmiCategory,
    pub gender: Gender,
    /// Deduplicated, sorted
    pub symptoms: Vec<Symptom>,
    pub allergies: Allergies,
    pub diet: DietType,
    /// Always false unless gender is Female
    pub pregnant: bool,
    /// Medication already tried for this episode
    pub previous_medication: Option<String>,
}

/// Wire form of [`PatientProfile`] before normalization.
#[derive(Deserialize)]
struct ProfileFields {
    age: u32,
    temperature_f: f64,
    #[serde(default)]
    bmi: Option<f64>,
    gender: Gender,
    #[serde(default)]
    symptoms: Vec<Symptom>,
    #[serde(default)]
    allergies: Allergies,
    diet: DietType,
    #[serde(default)]
    pregnant: bool,
    #[serde(default)]
    previous_medication: Option<String>,
}

impl From<ProfileFields> for PatientProfile {
    fn from(f: ProfileFields) -> Self {
        PatientProfile::new(f.age, f.temperature_f, f.gender)
            .with_bmi(f.bmi)
            .with_symptoms(f.symptoms)
            .with_allergies(f.allergies)
            .with_diet(f.diet)
            .with_pregnant(f.pregnant)
            .with_previous_medication(f.previous_medication)
    }
}

impl Default for PatientProfile {
    fn default() -> Self {
        Self::new(30, 98.6, Gender::Other)
    }
}

impl PatientProfile {
    /// Create a profile with required fields; everything else neutral.
    pub fn new(age: u32, temperature_f: f64, gender: Gender) -> Self {
        Self {
            age,
            temperature_f,
            bmi: None,
            bmi_category: BmiCategory::NotCalculated,
            gender,
            symptoms: Vec::new(),
            allergies: Allergies::None,
            diet: DietType::NonVegetarian,
            pregnant: false,
            previous_medication: None,
        }
    }

    /// Set BMI and recompute its category.
    pub fn with_bmi(mut self, bmi: Option<f64>) -> Self {
        let bmi = bmi.filter(|b| *b > 0.0);
        self.bmi = bmi;
        self.bmi_category = BmiCategory::from_bmi(bmi);
        self
    }

    /// Set symptoms, dropping duplicates.
    pub fn with_symptoms(mut self, symptoms: impl IntoIterator<Item = Symptom>) -> Self {
        let mut symptoms: Vec<Symptom> = symptoms.into_iter().collect();
        symptoms.sort();
        symptoms.dedup();
        self.symptoms = symptoms;
        self
    }

    pub fn with_allergies(mut self, allergies: Allergies) -> Self {
        self.allergies = allergies;
        self
    }

    pub fn with_diet(mut self, diet: DietType) -> Self {
        self.diet = diet;
        self
    }

    /// Set pregnancy status. Ignored unless the patient is female.
    pub fn with_pregnant(mut self, pregnant: bool) -> Self {
        self.pregnant = pregnant && self.gender == Gender::Female;
        self
    }

    /// Set the previously tried medication. Blank input means none.
    pub fn with_previous_medication(mut self, medication: Option<String>) -> Self {
        self.previous_medication = medication.filter(|m| !m.trim().is_empty());
        self
    }

    /// Re-derive the BMI category and re-apply the builder invariants after
    /// fields were set directly.
    pub fn normalized(mut self) -> Self {
        let symptoms = std::mem::take(&mut self.symptoms);
        let previous = self.previous_medication.take();
        let (bmi, pregnant) = (self.bmi, self.pregnant);
        self.with_bmi(bmi)
            .with_symptoms(symptoms)
            .with_pregnant(pregnant)
            .with_previous_medication(previous)
    }

    pub fn has_symptom(&self, symptom: Symptom) -> bool {
        self.symptoms.contains(&symptom)
    }
}
