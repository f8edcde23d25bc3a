use super::error::check_width;
use super::{Database, DbError};
use rusqlite::params;
use tracing::debug;

pub const MAX_SETTING_LEN: usize = 30;
pub const MAX_VALUE_LEN: usize = 30;

impl Database {
    /// Reads a setting, storing `default` first if the row is missing.
    /// `setting` must already be lower-cased.
    pub fn get_or_init_setting(
        &self,
        scope_id: i64,
        setting: &str,
        default: &str,
    ) -> Result<String, DbError> {
        check_width("setting", setting, MAX_SETTING_LEN)?;
        check_width("value", default, MAX_VALUE_LEN)?;

        self.with_transaction(|tx| {
            let inserted = tx.execute(
                "INSERT INTO config_entry (scope_id, setting, value) VALUES (?1, ?2, ?3)
                 ON CONFLICT(scope_id, setting) DO NOTHING",
                params![scope_id, setting, default],
            )?;
            if inserted > 0 {
                debug!("Database: Created setting {} for scope {}", setting, scope_id);
            }
            let value = tx.query_row(
                "SELECT value FROM config_entry WHERE scope_id = ?1 AND setting = ?2",
                params![scope_id, setting],
                |row| row.get(0),
            )?;
            Ok(value)
        })
    }

    pub fn set_setting(&self, scope_id: i64, setting: &str, value: &str) -> Result<(), DbError> {
        check_width("setting", setting, MAX_SETTING_LEN)?;
        check_width("value", value, MAX_VALUE_LEN)?;

        self.with_transaction(|tx| {
            tx.execute(
                "INSERT INTO config_entry (scope_id, setting, value) VALUES (?1, ?2, ?3)
                 ON CONFLICT(scope_id, setting) DO UPDATE SET value = excluded.value",
                params![scope_id, setting, value],
            )?;
            Ok(())
        })
    }

    pub fn list_settings(&self, scope_id: i64) -> Result<Vec<(String, String)>, DbError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT setting, value FROM config_entry WHERE scope_id = ?1 ORDER BY setting",
        )?;
        let rows = stmt.query_map([scope_id], |row| Ok((row.get(0)?, row.get(1)?)))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_db;

    #[test]
    fn test_missing_setting_is_created_with_default() {
        let db = test_db();

        assert_eq!(db.get_or_init_setting(-1, "web:should_run", "False").unwrap(), "False");
        // The first default sticks
        assert_eq!(db.get_or_init_setting(-1, "web:should_run", "True").unwrap(), "False");
        assert_eq!(
            db.list_settings(-1).unwrap(),
            vec![("web:should_run".to_string(), "False".to_string())]
        );
    }

    #[test]
    fn test_set_overwrites() {
        let db = test_db();

        db.set_setting(7, "greeting", "hi").unwrap();
        db.set_setting(7, "greeting", "hello").unwrap();
        assert_eq!(db.get_or_init_setting(7, "greeting", "unused").unwrap(), "hello");

        // Scopes are independent
        assert_eq!(db.get_or_init_setting(8, "greeting", "hey").unwrap(), "hey");
        assert_eq!(db.list_settings(7).unwrap().len(), 1);
    }

    #[test]
    fn test_width_limits() {
        let db = test_db();
        let long = "x".repeat(MAX_VALUE_LEN + 1);

        assert!(matches!(
            db.set_setting(1, "name", &long),
            Err(DbError::FieldTooLong { field: "value", .. })
        ));
        assert!(matches!(
            db.get_or_init_setting(1, &long, ""),
            Err(DbError::FieldTooLong { field: "setting", .. })
        ));
        assert!(db.list_settings(1).unwrap().is_empty());
    }
}
