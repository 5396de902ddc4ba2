//! Deployment configuration for the recommendation engine.

use serde::{Deserialize, Serialize};

use crate::engine::{medication_key, EngineError, EngineResult};

/// Fever threshold for tables with age-ranged rules (°F).
pub const AGE_RANGED_FEVER_THRESHOLD_F: f64 = 99.0;

/// Fever threshold for temperature-only tables (°F).
pub const TEMPERATURE_ONLY_FEVER_THRESHOLD_F: f64 = 100.0;

/// Children younger than this always get a referral.
pub const DEFAULT_PEDIATRIC_AGE_CUTOFF: u32 = 5;

/// Thresholds and safety settings for one deployment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum temperature treated as fever (°F, inclusive)
    pub fever_threshold_f: f64,
    /// Patients younger than this are referred without a medication
    pub pediatric_age_cutoff: u32,
    /// Medications that must not be presented as safe during pregnancy
    pub contraindicated_medications: Vec<String>,
    /// Whether the pregnancy contraindication check runs at all
    pub pregnancy_override: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::age_ranged()
    }
}

impl EngineConfig {
    /// Preset for reference tables with age bands.
    pub fn age_ranged() -> Self {
        Self {
            fever_threshold_f: AGE_RANGED_FEVER_THRESHOLD_F,
            pediatric_age_cutoff: DEFAULT_PEDIATRIC_AGE_CUTOFF,
            contraindicated_medications: vec!["ibuprofen".into()],
            pregnancy_override: true,
        }
    }

    /// Preset for the simpler temperature-only table.
    pub fn temperature_only() -> Self {
        Self {
            fever_threshold_f: TEMPERATURE_ONLY_FEVER_THRESHOLD_F,
            ..Self::age_ranged()
        }
    }

    /// Parse from JSON and validate. Missing fields take the age-ranged defaults.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the engine cannot apply.
    pub fn validate(&self) -> EngineResult<()> {
        if !self.fever_threshold_f.is_finite() || self.fever_threshold_f < 0.0 {
            tracing::warn!(threshold = self.fever_threshold_f, "rejecting engine config");
            return Err(EngineError::InvalidInput(format!(
                "fever threshold must be a non-negative number, got {}",
                self.fever_threshold_f
            )));
        }
        if let Some(blank) = self
            .contraindicated_medications
            .iter()
            .position(|m| m.trim().is_empty())
        {
            return Err(EngineError::InvalidInput(format!(
                "contraindicated medication {} is blank",
                blank
            )));
        }
        Ok(())
    }

    /// Check if a medication is on the contraindication list.
    pub fn is_contraindicated(&self, medication: &str) -> bool {
        let key = medication_key(medication);
        self.contraindicated_medications
            .iter()
            .any(|m| medication_key(m) == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(EngineConfig::default().fever_threshold_f, 99.0);
        assert_eq!(EngineConfig::temperature_only().fever_threshold_f, 100.0);
        assert_eq!(EngineConfig::temperature_only().pediatric_age_cutoff, 5);
        assert!(EngineConfig::default().pregnancy_override);
    }

    #[test]
    fn test_contraindication_lookup() {
        let config = EngineConfig::default();
        assert!(config.is_contraindicated("Ibuprofen"));
        assert!(config.is_contraindicated(" IBU PROFEN "));
        assert!(!config.is_contraindicated("Paracetamol"));
    }

    #[test]
    fn test_from_json_partial() {
        let config = EngineConfig::from_json(r#"{"fever_threshold_f": 100.4}"#).unwrap();
        assert_eq!(config.fever_threshold_f, 100.4);
        assert_eq!(config.pediatric_age_cutoff, 5);
        assert_eq!(config.contraindicated_medications, vec!["ibuprofen"]);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let result = EngineConfig::from_json(r#"{"fever_threshold_f": -1.0}"#);
        assert!(matches!(result, Err(EngineError::InvalidInput(_))));
    }

    #[test]
    fn test_blank_contraindication_rejected() {
        let config = EngineConfig {
            contraindicated_medications: vec!["aspirin".into(), " ".into()],
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
