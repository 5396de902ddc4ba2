//! Visit history storage (append-only).

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::HistoryRecord;

impl Database {
    /// Append a visit. The record must extend the current chain head.
    pub fn append_visit(&self, record: &HistoryRecord) -> DbResult<()> {
        let head = self.latest_visit_hash()?.unwrap_or_default();
        if record.prev_hash != head {
            return Err(DbError::Constraint(format!(
                "record {} does not extend the history head",
                record.record_id
            )));
        }

        let profile_json = serde_json::to_string(&record.profile)?;
        let outcome_json = record
            .outcome
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        self.conn.execute(
            r#"
            INSERT INTO visit_history (
                record_id, recorded_at, profile, outcome, prev_hash, record_hash
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                record.record_id,
                record.recorded_at,
                profile_json,
                outcome_json,
                record.prev_hash,
                record.record_hash,
            ],
        )?;
        tracing::debug!(record_id = %record.record_id, "visit appended");
        Ok(())
    }

    /// Get a visit by record ID.
    pub fn get_visit(&self, record_id: &str) -> DbResult<Option<HistoryRecord>> {
        let result = self
            .conn
            .query_row(
                r#"
                SELECT record_id, recorded_at, profile, outcome, prev_hash, record_hash
                FROM visit_history
                WHERE record_id = ?
                "#,
                [record_id],
                VisitRow::from_row,
            )
            .optional()?;

        result.map(|row| row.try_into()).transpose()
    }

    /// List all visits in insertion order.
    pub fn list_visits(&self) -> DbResult<Vec<HistoryRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT record_id, recorded_at, profile, outcome, prev_hash, record_hash
            FROM visit_history
            ORDER BY seq
            "#,
        )?;

        let rows = stmt.query_map([], VisitRow::from_row)?;

        rows.map(|row| HistoryRecord::try_from(row?))
            .collect::<DbResult<Vec<_>>>()
    }

    /// Hash of the most recent visit, if any.
    pub fn latest_visit_hash(&self) -> DbResult<Option<String>> {
        self.conn
            .query_row(
                "SELECT record_hash FROM visit_history ORDER BY seq DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Number of stored visits.
    pub fn count_visits(&self) -> DbResult<u32> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM visit_history", [], |row| row.get(0))?;
        Ok(count as u32)
    }
}

/// Raw row before JSON decoding.
struct VisitRow {
    record_id: String,
    recorded_at: String,
    profile: String,
    outcome: Option<String>,
    prev_hash: String,
    record_hash: String,
}

impl VisitRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            record_id: row.get(0)?,
            recorded_at: row.get(1)?,
            profile: row.get(2)?,
            outcome: row.get(3)?,
            prev_hash: row.get(4)?,
            record_hash: row.get(5)?,
        })
    }
}

impl TryFrom<VisitRow> for HistoryRecord {
    type Error = DbError;

    fn try_from(row: VisitRow) -> Result<Self, Self::Error> {
        Ok(HistoryRecord {
            record_id: row.record_id,
            recorded_at: row.recorded_at,
            profile: serde_json::from_str(&row.profile)?,
            outcome: row
                .outcome
                .map(|s| serde_json::from_str(&s))
                .transpose()?,
            prev_hash: row.prev_hash,
            record_hash: row.record_hash,
        })
    }
}
