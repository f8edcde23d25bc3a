use dotenvy::dotenv;
use serde::Deserialize;
use std::env;

#[derive(Clone, Deserialize)]
pub struct Config {
    pub discord_token: String,
    pub application_id: u64,
    pub owner_id: Option<u64>,
    /// Text-command prefix. Longer values mean "any one of these characters".
    pub prefix: String,
    pub description: String,
    pub database_url: String,
    pub database_busy_timeout_ms: u64,
    pub status_message: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        Self::build()
    }

    fn build() -> anyhow::Result<Self> {
        Ok(Config {
            discord_token: env::var("DISCORD_TOKEN")
                .map_err(|_| anyhow::anyhow!("DISCORD_TOKEN must be set"))?,
            application_id: env::var("APPLICATION_ID")
                .map_err(|_| anyhow::anyhow!("APPLICATION_ID must be set"))?
                .parse()
                .map_err(|_| anyhow::anyhow!("APPLICATION_ID must be a valid u64"))?,
            owner_id: env::var("OWNER_ID").ok().and_then(|id| id.parse().ok()),
            prefix: env::var("PREFIX")
                .ok()
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| "$".to_string()),
            description: env::var("DESCRIPTION").unwrap_or_else(|_| "Example bot".to_string()),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "Bot.db".to_string()),
            database_busy_timeout_ms: env::var("DATABASE_BUSY_TIMEOUT_MS")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(5000),
            status_message: env::var("STATUS_MESSAGE").unwrap_or_else(|_| "Ready!".to_string()),
        })
    }

    /// Splits a leading command prefix off `content`. A single-character
    /// prefix setting behaves as usual; a longer one lets any of its
    /// characters start a command.
    pub fn split_prefix<'a>(&self, content: &'a str) -> Option<(&'a str, &'a str)> {
        if self.prefix.chars().count() <= 1 {
            return content
                .strip_prefix(self.prefix.as_str())
                .map(|rest| (&content[..self.prefix.len()], rest));
        }
        let first = content.chars().next()?;
        if self.prefix.contains(first) {
            Some(content.split_at(first.len_utf8()))
        } else {
            None
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("discord_token", &"[REDACTED]")
            .field("application_id", &self.application_id)
            .field("owner_id", &self.owner_id)
            .field("prefix", &self.prefix)
            .field("description", &self.description)
            .field("database_url", &self.database_url)
            .field("database_busy_timeout_ms", &self.database_busy_timeout_ms)
            .field("status_message", &self.status_message)
            .finish()
    }
}
