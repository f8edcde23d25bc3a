use crate::db::{Database, DbError};
use crate::scope::Scope;

/// Persisted key/value settings, per guild or global.
///
/// Setting names are case-insensitive. Values are plain strings; booleans
/// follow the convention that any non-empty string is true and the empty
/// string is false (see [`ConfigStore::get_flag`]).
#[derive(Clone)]
pub struct ConfigStore {
    db: Database,
}

impl ConfigStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Returns the stored value. On a miss the default is persisted and
    /// returned, so later reads see it even if they pass another default.
    pub async fn get(
        &self,
        scope: impl Into<Scope>,
        setting: &str,
        default: &str,
    ) -> Result<String, DbError> {
        let scope_id = scope.into().id();
        let setting = setting.to_lowercase();
        let default = default.to_string();
        self.db
            .run_blocking(move |db| db.get_or_init_setting(scope_id, &setting, &default))
            .await
    }

    /// Stores `value`, replacing any previous one. Durable once this returns.
    pub async fn set(
        &self,
        scope: impl Into<Scope>,
        setting: &str,
        value: &str,
    ) -> Result<(), DbError> {
        let scope_id = scope.into().id();
        let setting = setting.to_lowercase();
        let value = value.to_string();
        self.db
            .run_blocking(move |db| db.set_setting(scope_id, &setting, &value))
            .await
    }

    pub async fn get_flag(
        &self,
        scope: impl Into<Scope>,
        setting: &str,
        default: bool,
    ) -> Result<bool, DbError> {
        let value = self.get(scope, setting, flag_value(default)).await?;
        Ok(is_truthy(&value))
    }

    pub async fn set_flag(
        &self,
        scope: impl Into<Scope>,
        setting: &str,
        enabled: bool,
    ) -> Result<(), DbError> {
        self.set(scope, setting, flag_value(enabled)).await
    }

    /// All settings stored for `scope`, sorted by name.
    pub async fn list(&self, scope: impl Into<Scope>) -> Result<Vec<(String, String)>, DbError> {
        let scope_id = scope.into().id();
        self.db
            .run_blocking(move |db| db.list_settings(scope_id))
            .await
    }
}

pub fn is_truthy(value: &str) -> bool {
    !value.is_empty()
}

fn flag_value(enabled: bool) -> &'static str {
    if enabled {
        "1"
    } else {
        ""
    }
}
