//! Medication name normalization.
//!
//! Handles:
//! - Identity keys (case and whitespace folding)
//! - Brand expansion (tylenol→paracetamol, advil→ibuprofen)
//! - Typo suggestions against known medication names

use std::collections::HashMap;

use strsim::{jaro_winkler, normalized_levenshtein};

/// Minimum similarity for a typo suggestion.
const MIN_SUGGESTION_SIMILARITY: f64 = 0.80;

/// Identity key for a medication name: lowercase with all whitespace removed.
pub fn medication_key(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Normalizer for free-text medication names typed by patients.
pub struct MedicationNormalizer {
    /// Alias map: brand key → generic key
    aliases: HashMap<String, String>,
}

impl Default for MedicationNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl MedicationNormalizer {
    /// Create a normalizer with default brand mappings.
    pub fn new() -> Self {
        Self {
            aliases: Self::default_aliases(),
        }
    }

    /// Expand a brand name to its generic key. Unknown names pass through as keys.
    pub fn canonicalize(&self, name: &str) -> String {
        let key = medication_key(name);
        self.aliases.get(&key).cloned().unwrap_or(key)
    }

    /// Find the known medication closest to `name`, if any is close enough.
    ///
    /// Exact key matches (after brand expansion) always win.
    pub fn suggest<'a>(&self, name: &str, known: &[&'a str]) -> Option<&'a str> {
        let query = self.canonicalize(name);
        if query.is_empty() {
            return None;
        }

        if let Some(exact) = known.iter().find(|k| medication_key(k) == query) {
            return Some(*exact);
        }

        let mut best: Option<(&'a str, f64)> = None;
        for &candidate in known {
            let score = similarity(&query, &medication_key(candidate));
            if score >= MIN_SUGGESTION_SIMILARITY && best.map_or(true, |(_, s)| score > s) {
                best = Some((candidate, score));
            }
        }
        best.map(|(candidate, _)| candidate)
    }

    /// Add a custom brand mapping.
    pub fn add_alias(&mut self, alias: &str, generic: &str) {
        self.aliases
            .insert(medication_key(alias), medication_key(generic));
    }

    /// Default brand mappings.
    fn default_aliases() -> HashMap<String, String> {
        let mut map = HashMap::new();

        // Paracetamol
        map.insert("acetaminophen".into(), "paracetamol".into());
        map.insert("tylenol".into(), "paracetamol".into());
        map.insert("crocin".into(), "paracetamol".into());
        map.insert("dolo".into(), "paracetamol".into());
        map.insert("dolo650".into(), "paracetamol".into());
        map.insert("calpol".into(), "paracetamol".into());
        map.insert("panadol".into(), "paracetamol".into());

        // Ibuprofen
        map.insert("advil".into(), "ibuprofen".into());
        map.insert("motrin".into(), "ibuprofen".into());
        map.insert("brufen".into(), "ibuprofen".into());
        map.insert("nurofen".into(), "ibuprofen".into());

        // Aspirin
        map.insert("disprin".into(), "aspirin".into());
        map.insert("aspro".into(), "aspirin".into());
        map.insert("acetylsalicylicacid".into(), "aspirin".into());

        map
    }
}

/// Combined string similarity.
fn similarity(a: &str, b: &str) -> f64 {
    // Jaro-Winkler favors shared prefixes, Levenshtein overall edits
    jaro_winkler(a, b) * 0.6 + normalized_levenshtein(a, b) * 0.4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_medication_key() {
        assert_eq!(medication_key("Ibuprofen"), "ibuprofen");
        assert_eq!(medication_key("  IBU profen \t"), "ibuprofen");
        assert_eq!(medication_key(""), "");
    }

    #[test]
    fn test_canonicalize_brand() {
        let normalizer = MedicationNormalizer::new();

        assert_eq!(normalizer.canonicalize("Tylenol"), "paracetamol");
        assert_eq!(normalizer.canonicalize("ADVIL"), "ibuprofen");
        assert_eq!(normalizer.canonicalize("Dolo 650"), "paracetamol");

        // Unknown names pass through as keys
        assert_eq!(normalizer.canonicalize("Some Drug"), "somedrug");
    }

    #[test]
    fn test_suggest_typo() {
        let normalizer = MedicationNormalizer::new();
        let known = ["Paracetamol", "Ibuprofen"];

        assert_eq!(normalizer.suggest("ibuprofn", &known), Some("Ibuprofen"));
        assert_eq!(normalizer.suggest("paracetmol", &known), Some("Paracetamol"));
        assert_eq!(normalizer.suggest("crocin", &known), Some("Paracetamol"));
        assert_eq!(normalizer.suggest("amoxicillin", &known), None);
        assert_eq!(normalizer.suggest("  ", &known), None);
    }

    #[test]
    fn test_custom_alias() {
        let mut normalizer = MedicationNormalizer::new();
        normalizer.add_alias("Fevadol", "Paracetamol");

        assert_eq!(normalizer.canonicalize("fevadol"), "paracetamol");
    }
}
