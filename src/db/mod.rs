mod error;
pub mod settings;
pub mod stats;

pub use error::DbError;
pub use stats::{SortOrder, StatRecord};

use crate::config::Config;
use rusqlite::{Connection, Transaction};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info};

const SCHEMA: &str = include_str!("schema.sql");

/// Shared handle to the bot database. Cloning is cheap; all clones use the
/// same connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn new(config: &Config) -> Result<Self, DbError> {
        Self::open(
            &config.database_url,
            Duration::from_millis(config.database_busy_timeout_ms),
        )
    }

    /// Opens `path` and applies the per-connection pragmas. Use `:memory:`
    /// for a throwaway database.
    pub fn open(path: &str, busy_timeout: Duration) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;

        if path != ":memory:" {
            let mode: String =
                conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
            debug!("Database: journal mode is {}", mode);
        }
        conn.busy_timeout(busy_timeout)?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "foreign_keys", true)?;

        info!("Database: Opened {}", path);
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Creates any missing tables. Safe to call repeatedly.
    pub fn ensure_schema(&self) -> Result<(), DbError> {
        info!("Database: Ensuring schema...");
        let conn = self.lock()?;
        conn.execute_batch(SCHEMA)?;
        debug!("Database: Schema ready");
        Ok(())
    }

    /// Runs `f` inside one transaction on the shared connection. The
    /// transaction commits if `f` succeeds and rolls back otherwise.
    pub fn with_transaction<T, F>(&self, f: F) -> Result<T, DbError>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, DbError>,
    {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// Runs a synchronous database call on tokio's blocking pool.
    pub async fn run_blocking<T, F>(&self, f: F) -> Result<T, DbError>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> Result<T, DbError> + Send + 'static,
    {
        let db = self.clone();
        tokio::task::spawn_blocking(move || f(&db))
            .await
            .map_err(|e| DbError::TaskJoin(e.to_string()))?
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, DbError> {
        self.conn.lock().map_err(|_| DbError::LockPoisoned)
    }
}

#[cfg(test)]
pub(crate) fn test_db() -> Database {
    let db = Database::open(":memory:", Duration::from_millis(5000)).unwrap();
    db.ensure_schema().unwrap();
    db
}
