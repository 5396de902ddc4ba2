//! Validated medication reference table.
//!
//! Rules are checked once when the table is built. After that the engine
//! can trust every range and never fails at call time.

pub mod builtin;

use serde::Serialize;

use crate::engine::{medication_key, EngineError, EngineResult};
use crate::models::MedicationRule;

/// Ordered, read-only set of medication rules.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct ReferenceTable {
    rules: Vec<MedicationRule>,
}

impl ReferenceTable {
    /// Validate rules and build a table. An empty table is valid.
    pub fn new(rules: Vec<MedicationRule>) -> EngineResult<Self> {
        for (index, rule) in rules.iter().enumerate() {
            if let Err(e) = validate_rule(index, rule) {
                tracing::warn!(index, error = %e, "rejecting reference table");
                return Err(e);
            }
        }
        tracing::debug!(rules = rules.len(), "reference table loaded");
        Ok(Self { rules })
    }

    /// Parse a JSON array of rules and validate it.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let rules: Vec<MedicationRule> = serde_json::from_str(json)?;
        Self::new(rules)
    }

    /// Serialize the rules as a JSON array.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.rules)
    }

    pub fn rules(&self) -> &[MedicationRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether any rule carries an age bound.
    pub fn has_age_ranges(&self) -> bool {
        self.rules.iter().any(MedicationRule::has_age_range)
    }

    /// Distinct medication names in first-seen order, compared by key.
    pub fn medications(&self) -> Vec<&str> {
        let mut seen: Vec<String> = Vec::new();
        let mut names = Vec::new();
        for rule in &self.rules {
            let key = medication_key(&rule.medication);
            if !seen.contains(&key) {
                seen.push(key);
                names.push(rule.medication.as_str());
            }
        }
        names
    }

    /// Give the rules back.
    pub fn into_rules(self) -> Vec<MedicationRule> {
        self.rules
    }
}

/// Check a single rule.
fn validate_rule(index: usize, rule: &MedicationRule) -> EngineResult<()> {
    if !rule.min_temp_f.is_finite() || !rule.max_temp_f.is_finite() {
        return Err(EngineError::InvalidInput(format!(
            "rule {}: temperature bounds must be finite",
            index
        )));
    }
    if rule.min_temp_f < 0.0 {
        return Err(EngineError::InvalidInput(format!(
            "rule {}: negative minimum temperature {}",
            index, rule.min_temp_f
        )));
    }
    if rule.min_temp_f > rule.max_temp_f {
        return Err(EngineError::InvalidInput(format!(
            "rule {}: minimum temperature {} exceeds maximum {}",
            index, rule.min_temp_f, rule.max_temp_f
        )));
    }
    if let (Some(min), Some(max)) = (rule.min_age, rule.max_age) {
        if min > max {
            return Err(EngineError::InvalidInput(format!(
                "rule {}: minimum age {} exceeds maximum {}",
                index, min, max
            )));
        }
    }
    if rule.medication.trim().is_empty() {
        return Err(EngineError::InvalidInput(format!(
            "rule {}: medication is blank",
            index
        )));
    }
    Ok(())
}
