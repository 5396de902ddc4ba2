//! Reference table rows.

use serde::{Deserialize, Serialize};

/// One row of the medication reference table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicationRule {
    /// Youngest applicable age in years (inclusive)
    #[serde(default)]
    pub min_age: Option<u32>,
    /// Oldest applicable age in years (inclusive)
    #[serde(default)]
    pub max_age: Option<u32>,
    /// Lowest applicable temperature in °F (inclusive)
    pub min_temp_f: f64,
    /// Highest applicable temperature in °F (inclusive)
    pub max_temp_f: f64,
    /// Recommended medication identifier
    pub medication: String,
}

impl MedicationRule {
    /// Create a rule that applies to all ages.
    pub fn new(min_temp_f: f64, max_temp_f: f64, medication: impl Into<String>) -> Self {
        Self {
            min_age: None,
            max_age: None,
            min_temp_f,
            max_temp_f,
            medication: medication.into(),
        }
    }

    /// Restrict the rule to an inclusive age band.
    pub fn with_ages(mut self, min_age: u32, max_age: u32) -> Self {
        self.min_age = Some(min_age);
        self.max_age = Some(max_age);
        self
    }

    /// Whether this rule carries any age bound.
    pub fn has_age_range(&self) -> bool {
        self.min_age.is_some() || self.max_age.is_some()
    }

    /// Check if the rule applies to an age. No bound means all ages.
    pub fn covers_age(&self, age: u32) -> bool {
        self.min_age.map_or(true, |min| age >= min) && self.max_age.map_or(true, |max| age <= max)
    }

    /// Check if the rule applies to a temperature.
    pub fn covers_temperature(&self, temperature_f: f64) -> bool {
        temperature_f >= self.min_temp_f && temperature_f <= self.max_temp_f
    }

    /// Check if both ranges contain the patient.
    pub fn applies_to(&self, age: u32, temperature_f: f64) -> bool {
        self.covers_temperature(temperature_f) && self.covers_age(age)
    }

    /// Distance used by the nearest-age fallback.
    pub fn age_distance(&self, age: u32) -> u32 {
        age.abs_diff(self.min_age.unwrap_or(0))
    }
}
