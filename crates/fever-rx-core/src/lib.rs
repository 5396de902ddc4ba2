//! Fever-Rx Core Library
//!
//! Local-first fever medication recommendation with an append-only visit log.
//!
//! # Architecture
//!
//! ```text
//! Intake form → PatientProfile ─────────────┐
//!                                           ▼
//!             ReferenceTable + EngineConfig → Engine::recommend
//!                                           │
//!                  Pediatric guard → Fever check → Range filter
//!                                           │
//!                      Nearest-age fallback / Mode selection
//!                                           │
//!                        Previous-medication substitution
//!                                           │
//!                               Safety override
//!                                           │
//!                                           ▼
//!                                    Recommendation
//!                                           │
//!                        ┌──────────────────┴──────────────────┐
//!                        ▼                                     ▼
//!                   Presentation                      Visit history (hash chain)
//!                                                              │
//!                                                        JSON / CSV export
//! ```
//!
//! # Core Principle
//!
//! **No match is an outcome, not an error.** The engine only fails when a
//! reference table or config is malformed, and that is caught at load time.
//!
//! # Modules
//!
//! - [`engine`]: Recommendation engine (selection, substitution, safety override)
//! - [`table`]: Validated reference table and built-in tables
//! - [`config`]: Deployment thresholds and contraindications
//! - [`models`]: Domain types (PatientProfile, MedicationRule, Recommendation, etc.)
//! - [`similarity`]: Similar-case matcher over past patients
//! - [`db`]: SQLite storage for rules and visit history
//! - [`export`]: History export

pub mod config;
pub mod db;
pub mod engine;
pub mod export;
pub mod models;
pub mod similarity;
pub mod table;

// Re-export commonly used types
pub use config::EngineConfig;
pub use db::Database;
pub use engine::{recommend, Engine, EngineError, MedicationNormalizer};
pub use models::{
    Allergies, BmiCategory, DietType, Gender, HistoryRecord, MedicationRule, PatientProfile,
    Recommendation, RecommendationOutcome, Symptom,
};
pub use similarity::{CaseMatcher, CaseTolerance};
pub use table::ReferenceTable;

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum FeverRxError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("History integrity error: {0}")]
    IntegrityError(String),
}

impl From<db::DbError> for FeverRxError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::Engine(inner) => inner.into(),
            db::DbError::Json(inner) => inner.into(),
            other => FeverRxError::DatabaseError(other.to_string()),
        }
    }
}

impl From<EngineError> for FeverRxError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::InvalidInput(msg) => FeverRxError::InvalidInput(msg),
            EngineError::Json(inner) => inner.into(),
        }
    }
}

impl From<models::HistoryError> for FeverRxError {
    fn from(e: models::HistoryError) -> Self {
        FeverRxError::IntegrityError(e.to_string())
    }
}

impl From<serde_json::Error> for FeverRxError {
    fn from(e: serde_json::Error) -> Self {
        FeverRxError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for FeverRxError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        FeverRxError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<FeverRxCore>, FeverRxError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(FeverRxCore::with_database(db)))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<FeverRxCore>, FeverRxError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(FeverRxCore::with_database(db)))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe database and config wrapper for FFI.
#[derive(uniffi::Object)]
pub struct FeverRxCore {
    db: Arc<Mutex<Database>>,
    config: Mutex<EngineConfig>,
}

impl FeverRxCore {
    fn with_database(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            config: Mutex::new(EngineConfig::default()),
        }
    }

    /// Run the engine against the stored table.
    fn recommend_domain(&self, profile: &PatientProfile) -> Result<Recommendation, FeverRxError> {
        let table = self.db.lock()?.load_reference_table()?;
        let config = self.config.lock()?;
        Ok(Engine::new(&table, &config).recommend_profile(profile))
    }
}

#[uniffi::export]
impl FeverRxCore {
    // =========================================================================
    // Configuration
    // =========================================================================

    /// Replace the reference table from a JSON array of rules.
    pub fn load_rules_json(&self, json: String) -> Result<u32, FeverRxError> {
        let table = ReferenceTable::from_json(&json)?;
        let db = self.db.lock()?;
        db.replace_rules(table.rules())?;
        Ok(table.len() as u32)
    }

    /// Replace the reference table from FFI records.
    pub fn replace_rules(&self, rules: Vec<FfiMedicationRule>) -> Result<(), FeverRxError> {
        let rules: Vec<MedicationRule> = rules.into_iter().map(Into::into).collect();
        let db = self.db.lock()?;
        db.replace_rules(&rules)?;
        Ok(())
    }

    /// List stored rules in table order.
    pub fn list_rules(&self) -> Result<Vec<FfiMedicationRule>, FeverRxError> {
        let db = self.db.lock()?;
        let rules = db.load_rules()?;
        Ok(rules.into_iter().map(|r| r.into()).collect())
    }

    /// Replace the engine config from JSON.
    pub fn set_config_json(&self, json: String) -> Result<(), FeverRxError> {
        let parsed = EngineConfig::from_json(&json)?;
        *self.config.lock()? = parsed;
        Ok(())
    }

    // =========================================================================
    // Recommendation
    // =========================================================================

    /// Recommend a medication for a patient.
    pub fn recommend(&self, profile: FfiPatientProfile) -> Result<FfiRecommendation, FeverRxError> {
        let profile: PatientProfile = profile.into();
        Ok(self.recommend_domain(&profile)?.into())
    }

    /// Suggest the closest stored medication name for free text.
    pub fn suggest_medication(&self, name: String) -> Result<Option<String>, FeverRxError> {
        let table = self.db.lock()?.load_reference_table()?;
        let known = table.medications();
        Ok(MedicationNormalizer::new()
            .suggest(&name, &known)
            .map(str::to_string))
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Save a visit, optionally with the recommendation it produced.
    pub fn save_visit(
        &self,
        profile: FfiPatientProfile,
        include_outcome: bool,
    ) -> Result<FfiHistoryRecord, FeverRxError> {
        let profile: PatientProfile = profile.into();
        let outcome = if include_outcome {
            Some(self.recommend_domain(&profile)?)
        } else {
            None
        };

        let db = self.db.lock()?;
        let record = HistoryRecord::new(profile, outcome, db.latest_visit_hash()?)?;
        db.append_visit(&record)?;
        Ok(record.into())
    }

    /// List saved visits in save order.
    pub fn list_visits(&self) -> Result<Vec<FfiHistoryRecord>, FeverRxError> {
        let db = self.db.lock()?;
        let visits = db.list_visits()?;
        Ok(visits.into_iter().map(|v| v.into()).collect())
    }

    /// Verify the history hash chain. Returns the number of verified visits.
    pub fn verify_history(&self) -> Result<u32, FeverRxError> {
        let db = self.db.lock()?;
        let visits = db.list_visits()?;
        models::verify_chain(&visits)?;
        Ok(visits.len() as u32)
    }

    // =========================================================================
    // Export Operations
    // =========================================================================

    /// Export history as JSON.
    pub fn export_history_json(&self) -> Result<String, FeverRxError> {
        let db = self.db.lock()?;
        let export = export::HistoryExport::from_database(&db)?;
        Ok(export.to_json()?)
    }

    /// Export history as CSV.
    pub fn export_history_csv(&self) -> Result<String, FeverRxError> {
        let db = self.db.lock()?;
        let export = export::HistoryExport::from_database(&db)?;
        Ok(export.to_csv())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiGender {
    Male,
    Female,
    Other,
}

impl From<FfiGender> for Gender {
    fn from(g: FfiGender) -> Self {
        match g {
            FfiGender::Male => Gender::Male,
            FfiGender::Female => Gender::Female,
            FfiGender::Other => Gender::Other,
        }
    }
}

/// FFI-safe symptom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiSymptom {
    Headache,
    BodyAche,
    Fatigue,
}

impl From<FfiSymptom> for Symptom {
    fn from(s: FfiSymptom) -> Self {
        match s {
            FfiSymptom::Headache => Symptom::Headache,
            FfiSymptom::BodyAche => Symptom::BodyAche,
            FfiSymptom::Fatigue => Symptom::Fatigue,
        }
    }
}

/// FFI-safe diet type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiDietType {
    Vegetarian,
    NonVegetarian,
    Vegan,
}

impl From<FfiDietType> for DietType {
    fn from(d: FfiDietType) -> Self {
        match d {
            FfiDietType::Vegetarian => DietType::Vegetarian,
            FfiDietType::NonVegetarian => DietType::NonVegetarian,
            FfiDietType::Vegan => DietType::Vegan,
        }
    }
}

/// FFI-safe patient profile.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientProfile {
    pub age: u32,
    pub temperature_f: f64,
    pub bmi: Option<f64>,
    pub gender: FfiGender,
    pub symptoms: Vec<FfiSymptom>,
    pub has_allergies: bool,
    pub allergy_notes: Option<String>,
    pub diet: FfiDietType,
    pub pregnant: bool,
    pub previous_medication: Option<String>,
}

impl From<FfiPatientProfile> for PatientProfile {
    fn from(p: FfiPatientProfile) -> Self {
        let allergies = match p.allergy_notes.filter(|n| !n.trim().is_empty()) {
            Some(notes) => Allergies::Described(notes),
            None if p.has_allergies => Allergies::Present,
            None => Allergies::None,
        };

        PatientProfile::new(p.age, p.temperature_f, p.gender.into())
            .with_bmi(p.bmi)
            .with_symptoms(p.symptoms.into_iter().map(Symptom::from))
            .with_allergies(allergies)
            .with_diet(p.diet.into())
            .with_pregnant(p.pregnant)
            .with_previous_medication(p.previous_medication)
    }
}

/// FFI-safe medication rule.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicationRule {
    pub min_age: Option<u32>,
    pub max_age: Option<u32>,
    pub min_temp_f: f64,
    pub max_temp_f: f64,
    pub medication: String,
}

impl From<MedicationRule> for FfiMedicationRule {
    fn from(rule: MedicationRule) -> Self {
        Self {
            min_age: rule.min_age,
            max_age: rule.max_age,
            min_temp_f: rule.min_temp_f,
            max_temp_f: rule.max_temp_f,
            medication: rule.medication,
        }
    }
}

impl From<FfiMedicationRule> for MedicationRule {
    fn from(rule: FfiMedicationRule) -> Self {
        MedicationRule {
            min_age: rule.min_age,
            max_age: rule.max_age,
            min_temp_f: rule.min_temp_f,
            max_temp_f: rule.max_temp_f,
            medication: rule.medication,
        }
    }
}

/// FFI-safe recommendation.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRecommendation {
    /// Outcome kind, e.g. "direct_match"
    pub kind: String,
    /// Medication safe to show; `None` when flagged
    pub medication: Option<String>,
    /// Medication withheld by a contraindication
    pub flagged_medication: Option<String>,
    /// Set for nearest-age matches
    pub approximate_age_difference: Option<u32>,
    pub contraindicated: bool,
    pub requires_referral: bool,
}

impl From<Recommendation> for FfiRecommendation {
    fn from(rec: Recommendation) -> Self {
        let approximate_age_difference = match &rec.outcome {
            RecommendationOutcome::NearestAgeMatch { note, .. } => Some(note.age_difference),
            _ => None,
        };
        Self {
            kind: rec.outcome.kind().to_string(),
            medication: rec.presentable_medication().map(str::to_string),
            flagged_medication: rec.contraindication.as_ref().map(|c| c.medication.clone()),
            approximate_age_difference,
            contraindicated: rec.is_contraindicated(),
            requires_referral: rec.outcome.requires_referral(),
        }
    }
}

/// FFI-safe history record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiHistoryRecord {
    pub record_id: String,
    pub recorded_at: String,
    pub age: u32,
    pub temperature_f: f64,
    pub recommendation: Option<FfiRecommendation>,
    pub record_hash: String,
}

impl From<HistoryRecord> for FfiHistoryRecord {
    fn from(record: HistoryRecord) -> Self {
        Self {
            record_id: record.record_id,
            recorded_at: record.recorded_at,
            age: record.profile.age,
            temperature_f: record.profile.temperature_f,
            recommendation: record.outcome.map(Into::into),
            record_hash: record.record_hash,
        }
    }
}
