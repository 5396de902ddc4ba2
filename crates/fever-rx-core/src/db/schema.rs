//! SQLite schema definition.

/// Complete database schema for fever-rx.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Medication Reference Table
-- ============================================================================

CREATE TABLE IF NOT EXISTS medication_rules (
    position INTEGER PRIMARY KEY,                -- table order, used for tie-breaks
    min_age INTEGER,
    max_age INTEGER,
    min_temp_f REAL NOT NULL,
    max_temp_f REAL NOT NULL,
    medication TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- ============================================================================
-- Visit History (Append-Only)
-- ============================================================================

CREATE TABLE IF NOT EXISTS visit_history (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    record_id TEXT NOT NULL UNIQUE,
    recorded_at TEXT NOT NULL,
    profile TEXT NOT NULL,                       -- JSON PatientProfile
    outcome TEXT,                                -- JSON Recommendation
    prev_hash TEXT NOT NULL,
    record_hash TEXT NOT NULL UNIQUE
);

CREATE INDEX IF NOT EXISTS idx_history_recorded_at ON visit_history(recorded_at);

CREATE TRIGGER IF NOT EXISTS visit_history_no_update BEFORE UPDATE ON visit_history
BEGIN
    SELECT RAISE(ABORT, 'visit_history is append-only');
END;

CREATE TRIGGER IF NOT EXISTS visit_history_no_delete BEFORE DELETE ON visit_history
BEGIN
    SELECT RAISE(ABORT, 'visit_history is append-only');
END;
"#;
