use poise::serenity_prelude::GuildId;
use std::fmt;

/// Stored scope id for data that is not tied to a guild. A NULL guild id
/// cannot be part of a primary key, so the global scope uses this sentinel.
pub const GLOBAL_SCOPE_ID: i64 = -1;

/// Who a setting or counter belongs to: one guild, or the whole bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Global,
    Guild(u64),
}

impl Scope {
    /// The value stored in the `scope_id` columns.
    pub fn id(self) -> i64 {
        match self {
            Scope::Global => GLOBAL_SCOPE_ID,
            // Snowflakes use 63 bits, so they always fit.
            Scope::Guild(id) => id as i64,
        }
    }

    pub fn from_id(id: i64) -> Self {
        if id < 0 {
            Scope::Global
        } else {
            Scope::Guild(id as u64)
        }
    }
}

impl From<u64> for Scope {
    fn from(id: u64) -> Self {
        Scope::Guild(id)
    }
}

impl From<Option<u64>> for Scope {
    fn from(id: Option<u64>) -> Self {
        id.map_or(Scope::Global, Scope::Guild)
    }
}

impl From<GuildId> for Scope {
    fn from(id: GuildId) -> Self {
        Scope::Guild(id.get())
    }
}

impl From<Option<GuildId>> for Scope {
    fn from(id: Option<GuildId>) -> Self {
        id.map_or(Scope::Global, Scope::from)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => write!(f, "global"),
            Scope::Guild(id) => write!(f, "guild {}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_guild_is_global() {
        assert_eq!(Scope::from(None::<u64>), Scope::Global);
        assert_eq!(Scope::from(None::<GuildId>).id(), GLOBAL_SCOPE_ID);
        assert_eq!(Scope::from(Some(42u64)).id(), 42);
    }

    #[test]
    fn test_id_round_trip() {
        assert_eq!(Scope::from_id(-1), Scope::Global);
        assert_eq!(Scope::from_id(GuildId::new(81384788765712384).get() as i64).id(), 81384788765712384);
    }
}
