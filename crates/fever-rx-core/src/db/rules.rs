//! Reference table storage.

use rusqlite::params;

use super::{Database, DbResult};
use crate::models::MedicationRule;
use crate::table::ReferenceTable;

impl Database {
    /// Replace the stored reference table, keeping rule order.
    ///
    /// Rules are validated before anything is written.
    pub fn replace_rules(&self, rules: &[MedicationRule]) -> DbResult<()> {
        ReferenceTable::new(rules.to_vec())?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM medication_rules", [])?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO medication_rules (
                    position, min_age, max_age, min_temp_f, max_temp_f, medication
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )?;
            for (position, rule) in rules.iter().enumerate() {
                stmt.execute(params![
                    position as i64,
                    rule.min_age,
                    rule.max_age,
                    rule.min_temp_f,
                    rule.max_temp_f,
                    rule.medication,
                ])?;
            }
        }
        tx.commit()?;

        tracing::info!(rules = rules.len(), "reference table replaced");
        Ok(())
    }

    /// Load stored rules in table order.
    pub fn load_rules(&self) -> DbResult<Vec<MedicationRule>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT min_age, max_age, min_temp_f, max_temp_f, medication
            FROM medication_rules
            ORDER BY position
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(MedicationRule {
                min_age: row.get(0)?,
                max_age: row.get(1)?,
                min_temp_f: row.get(2)?,
                max_temp_f: row.get(3)?,
                medication: row.get(4)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Load and validate the stored reference table.
    pub fn load_reference_table(&self) -> DbResult<ReferenceTable> {
        Ok(ReferenceTable::new(self.load_rules()?)?)
    }
}
