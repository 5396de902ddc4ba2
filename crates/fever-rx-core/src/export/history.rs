//! History export for download and spreadsheet use.

use serde::{Deserialize, Serialize};

use crate::db::{Database, DbResult};
use crate::models::{Allergies, HistoryRecord, Symptom};

/// Batch export of saved visits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryExport {
    /// Export timestamp
    pub exported_at: String,
    /// Visits in save order
    pub records: Vec<HistoryRecord>,
    /// Hash of the last record, empty when there are none
    pub head_hash: String,
}

const CSV_HEADER: &str = "record_id,recorded_at,age,temperature_f,bmi,bmi_category,gender,symptoms,allergies,diet,pregnant,previous_medication,outcome,medication,contraindicated,record_hash\n";

impl HistoryExport {
    /// Build an export from records already loaded.
    pub fn from_records(records: Vec<HistoryRecord>) -> Self {
        let head_hash = records
            .last()
            .map(|r| r.record_hash.clone())
            .unwrap_or_default();
        Self {
            exported_at: chrono::Utc::now().to_rfc3339(),
            records,
            head_hash,
        }
    }

    /// Export every stored visit.
    pub fn from_database(db: &Database) -> DbResult<Self> {
        Ok(Self::from_records(db.list_visits()?))
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV, one flat row per visit.
    pub fn to_csv(&self) -> String {
        let mut csv = String::from(CSV_HEADER);

        for record in &self.records {
            let profile = &record.profile;
            let symptoms = profile
                .symptoms
                .iter()
                .map(|s| symptom_label(*s))
                .collect::<Vec<_>>()
                .join(";");
            let allergies = match &profile.allergies {
                Allergies::None => String::new(),
                Allergies::Present => "yes".to_string(),
                Allergies::Described(text) => text.clone(),
            };
            let (outcome_kind, medication, contraindicated) = match &record.outcome {
                Some(rec) => (
                    rec.outcome.kind(),
                    rec.outcome.medication().unwrap_or(""),
                    rec.is_contraindicated(),
                ),
                None => ("", "", false),
            };

            csv.push_str(&format!(
                "{},{},{},{},{},{:?},{:?},{},{},{:?},{},{},{},{},{},{}\n",
                escape_csv(&record.record_id),
                escape_csv(&record.recorded_at),
                profile.age,
                profile.temperature_f,
                profile.bmi.map(|b| format!("{:.1}", b)).unwrap_or_default(),
                profile.bmi_category,
                profile.gender,
                escape_csv(&symptoms),
                escape_csv(&allergies),
                profile.diet,
                profile.pregnant,
                escape_csv(profile.previous_medication.as_deref().unwrap_or("")),
                outcome_kind,
                escape_csv(medication),
                contraindicated,
                record.record_hash,
            ));
        }

        csv
    }
}

fn symptom_label(symptom: Symptom) -> &'static str {
    match symptom {
        Symptom::Headache => "headache",
        Symptom::BodyAche => "body_ache",
        Symptom::Fatigue => "fatigue",
    }
}

/// Escape a CSV field.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
