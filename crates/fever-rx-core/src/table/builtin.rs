//! Built-in reference tables.
//!
//! Each table is paired with the config preset whose fever threshold it was
//! written for.

use crate::config::EngineConfig;
use crate::models::MedicationRule;

use super::ReferenceTable;

/// Age- and temperature-banded rules.
pub fn age_ranged_rules() -> Vec<MedicationRule> {
    vec![
        MedicationRule::new(99.0, 101.9, "Paracetamol").with_ages(5, 17),
        MedicationRule::new(102.0, 104.0, "Ibuprofen").with_ages(5, 17),
        MedicationRule::new(99.0, 101.9, "Paracetamol").with_ages(18, 60),
        MedicationRule::new(102.0, 104.0, "Ibuprofen").with_ages(18, 60),
        MedicationRule::new(99.0, 102.9, "Paracetamol").with_ages(61, 120),
    ]
}

/// Temperature-only rules for the simple deployment.
pub fn temperature_only_rules() -> Vec<MedicationRule> {
    vec![
        MedicationRule::new(100.0, 101.9, "Paracetamol"),
        MedicationRule::new(102.0, 103.9, "Ibuprofen"),
        MedicationRule::new(102.0, 103.9, "Paracetamol"),
        MedicationRule::new(104.0, 105.0, "Ibuprofen"),
    ]
}

/// Age-ranged table with its config.
pub fn age_ranged() -> (ReferenceTable, EngineConfig) {
    (
        ReferenceTable {
            rules: age_ranged_rules(),
        },
        EngineConfig::age_ranged(),
    )
}

/// Temperature-only table with its config.
pub fn temperature_only() -> (ReferenceTable, EngineConfig) {
    (
        ReferenceTable {
            rules: temperature_only_rules(),
        },
        EngineConfig::temperature_only(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_validate() {
        assert!(ReferenceTable::new(age_ranged_rules()).is_ok());
        assert!(ReferenceTable::new(temperature_only_rules()).is_ok());
    }

    #[test]
    fn test_builtin_presets() {
        let (table, config) = age_ranged();
        assert!(table.has_age_ranges());
        assert_eq!(config.fever_threshold_f, 99.0);

        let (table, config) = temperature_only();
        assert!(!table.has_age_ranges());
        assert_eq!(config.fever_threshold_f, 100.0);
    }
}
