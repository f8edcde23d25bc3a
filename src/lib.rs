pub mod clock;
pub mod commands;
pub mod config;
pub mod db;
pub mod scope;
pub mod services;

/// Custom data passed to all commands
pub struct Data {
    pub config: config::Config,
    pub settings: services::ConfigStore,
    pub stats: services::StatsTracker,
}

impl Data {
    pub fn new(config: config::Config, db: db::Database) -> Self {
        Self {
            config,
            settings: services::ConfigStore::new(db.clone()),
            stats: services::StatsTracker::new(db),
        }
    }
}

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
