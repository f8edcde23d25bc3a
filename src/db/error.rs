//! Error types for the storage layer.
//!
//! Missing rows are never reported here: lookups resolve them to `None`,
//! an empty list, or a lazily created row.

/// Errors that can occur while talking to the bot database.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// An SQLite operation failed.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A thread panicked while holding the shared connection.
    #[error("database connection lock poisoned")]
    LockPoisoned,

    /// The blocking worker running a query could not be joined.
    #[error("database task join error: {0}")]
    TaskJoin(String),

    /// A key or value is wider than its column.
    #[error("{field} is {len} characters long, the limit is {max}")]
    FieldTooLong {
        /// Which input was rejected.
        field: &'static str,
        /// Column width in characters.
        max: usize,
        /// Actual length in characters.
        len: usize,
    },
}

/// Rejects `value` if it holds more than `max` characters.
pub(crate) fn check_width(field: &'static str, value: &str, max: usize) -> Result<(), DbError> {
    let len = value.chars().count();
    if len > max {
        return Err(DbError::FieldTooLong { field, max, len });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_width_counts_chars_not_bytes() {
        // Four emoji are 16 bytes but only 4 characters
        assert!(check_width("substat", "😀😀😀😀", 4).is_ok());

        let err = check_width("setting", "abcdef", 5).unwrap_err();
        match err {
            DbError::FieldTooLong { field, max, len } => {
                assert_eq!(field, "setting");
                assert_eq!(max, 5);
                assert_eq!(len, 6);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
