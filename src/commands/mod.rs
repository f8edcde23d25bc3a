pub mod admin;
pub mod help;
pub mod settings;
pub mod stats;

use crate::{Data, Error};

/// Every command the bot registers.
pub fn all() -> Vec<poise::Command<Data, Error>> {
    vec![
        admin::ping(),
        admin::register(),
        admin::shutdown(),
        help::help(),
        settings::config(),
        stats::stats(),
    ]
}
