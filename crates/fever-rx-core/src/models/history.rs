//! Visit history records.
//!
//! History is a flat append-only log. Each record commits to the previous
//! record's hash, so editing or dropping an earlier visit breaks the chain.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::{PatientProfile, Recommendation};

/// Hash-chain verification errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum HistoryError {
    #[error("Record {record_id} hash mismatch")]
    HashMismatch { record_id: String },

    #[error("Record {record_id} does not follow the previous record")]
    BrokenLink { record_id: String },

    #[error("JSON serialization error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for HistoryError {
    fn from(e: serde_json::Error) -> Self {
        HistoryError::Json(e.to_string())
    }
}

pub type HistoryResult<T> = Result<T, HistoryError>;

/// One saved visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryRecord {
    /// UUID v4
    pub record_id: String,
    /// RFC 3339 timestamp
    pub recorded_at: String,
    pub profile: PatientProfile,
    /// The outcome shown to the patient, if one was produced
    pub outcome: Option<Recommendation>,
    /// Hash of the preceding record; empty for the first record
    pub prev_hash: String,
    /// SHA-256 over `prev_hash` and the canonical body
    pub record_hash: String,
}

/// Hashed portion of a record.
#[derive(Serialize)]
struct RecordBody<'a> {
    record_id: &'a str,
    recorded_at: &'a str,
    profile: &'a PatientProfile,
    outcome: &'a Option<Recommendation>,
}

impl HistoryRecord {
    /// Create a record chained after `prev_hash`.
    pub fn new(
        profile: PatientProfile,
        outcome: Option<Recommendation>,
        prev_hash: Option<String>,
    ) -> HistoryResult<Self> {
        let mut record = Self {
            record_id: uuid::Uuid::new_v4().to_string(),
            recorded_at: chrono::Utc::now().to_rfc3339(),
            profile: profile.normalized(),
            outcome,
            prev_hash: prev_hash.unwrap_or_default(),
            record_hash: String::new(),
        };
        record.record_hash = record.compute_hash()?;
        Ok(record)
    }

    /// Serialize the hashed fields to canonical JSON.
    pub fn to_canonical_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&RecordBody {
            record_id: &self.record_id,
            recorded_at: &self.recorded_at,
            profile: &self.profile,
            outcome: &self.outcome,
        })
    }

    /// Recompute this record's hash from its contents.
    pub fn compute_hash(&self) -> HistoryResult<String> {
        let body = self.to_canonical_json()?;
        let mut hasher = Sha256::new();
        hasher.update(self.prev_hash.as_bytes());
        hasher.update(body.as_bytes());
        Ok(hex::encode(hasher.finalize()))
    }

    /// Check the stored hash against the contents.
    pub fn verify_hash(&self) -> HistoryResult<()> {
        if self.compute_hash()? != self.record_hash {
            return Err(HistoryError::HashMismatch {
                record_id: self.record_id.clone(),
            });
        }
        Ok(())
    }
}

/// Verify an ordered run of records starting from the first ever saved.
pub fn verify_chain(records: &[HistoryRecord]) -> HistoryResult<()> {
    let mut expected_prev = String::new();
    for record in records {
        if record.prev_hash != expected_prev {
            return Err(HistoryError::BrokenLink {
                record_id: record.record_id.clone(),
            });
        }
        record.verify_hash()?;
        expected_prev = record.record_hash.clone();
    }
    Ok(())
}
