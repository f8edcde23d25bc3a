//! Named usage counters, per guild or global.
//!
//! Every counter is kept twice: a running total, and a history split into
//! UTC day buckets that backs windowed sums and top-N rankings. Both views
//! are updated in the same transaction, so the buckets of a key always sum
//! to its total.

use crate::clock::{format_sqlite_utc, parse_sqlite_utc, Clock, SystemClock};
use crate::db::{Database, DbError, SortOrder};
use crate::scope::Scope;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Query shape for [`StatsTracker::fetch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Maximum number of sub-stats returned.
    pub limit: usize,
    /// Buckets from `today - days` onwards are summed.
    pub days: u32,
    pub order: SortOrder,
    /// Keep only sub-stats containing this text (case-sensitive).
    pub submatch: Option<String>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            limit: 10,
            days: 7,
            order: SortOrder::Descending,
            submatch: None,
        }
    }
}

impl FetchOptions {
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_days(mut self, days: u32) -> Self {
        self.days = days;
        self
    }

    pub fn ascending(mut self) -> Self {
        self.order = SortOrder::Ascending;
        self
    }

    pub fn with_submatch(mut self, submatch: impl Into<String>) -> Self {
        self.submatch = Some(submatch.into());
        self
    }
}

#[derive(Clone)]
pub struct StatsTracker {
    db: Database,
    clock: Arc<dyn Clock>,
}

impl StatsTracker {
    pub fn new(db: Database) -> Self {
        Self::with_clock(db, Arc::new(SystemClock))
    }

    pub fn with_clock(db: Database, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    /// Days since 1970-01-01, in UTC. History rows are keyed by this.
    pub fn get_current_day(&self) -> i64 {
        self.clock.today()
    }

    /// Current value of a counter.
    ///
    /// With `days = None` this is the running total. With `days = Some(n)` it
    /// is the sum of the buckets from `today - n` onwards. Either way `None`
    /// means nothing was ever recorded for the key in that range.
    pub async fn get(
        &self,
        scope: impl Into<Scope>,
        stat: &str,
        sub_stat: &str,
        days: Option<u32>,
    ) -> Result<Option<i64>, DbError> {
        let scope_id = scope.into().id();
        let stat = stat.to_string();
        let sub_stat = sub_stat.to_string();

        match days {
            None => {
                let record = self
                    .db
                    .run_blocking(move |db| db.get_stat_total(scope_id, &stat, &sub_stat))
                    .await?;
                Ok(record.map(|r| r.count))
            }
            Some(days) => {
                let since = self.get_current_day() - i64::from(days);
                self.db
                    .run_blocking(move |db| db.sum_stat_since(scope_id, &stat, &sub_stat, since))
                    .await
            }
        }
    }

    /// Top sub-stats of `stat` over the recent window, e.g. the most used
    /// emoji this week. Empty when nothing matches.
    pub async fn fetch(
        &self,
        scope: impl Into<Scope>,
        stat: &str,
        options: FetchOptions,
    ) -> Result<Vec<(String, i64)>, DbError> {
        let scope_id = scope.into().id();
        let stat = stat.to_string();
        let since = self.get_current_day() - i64::from(options.days);
        self.db
            .run_blocking(move |db| {
                db.top_substats(
                    scope_id,
                    &stat,
                    since,
                    options.limit,
                    options.order,
                    options.submatch.as_deref(),
                )
            })
            .await
    }

    /// Adds `count` to the counter, creating it if needed. Returns the new
    /// running total.
    pub async fn increment(
        &self,
        scope: impl Into<Scope>,
        stat: &str,
        count: i64,
        sub_stat: &str,
    ) -> Result<i64, DbError> {
        self.apply(scope.into(), stat, sub_stat, count).await
    }

    /// Subtracts `count` from both the running total and today's bucket.
    /// Totals may go negative.
    pub async fn decrement(
        &self,
        scope: impl Into<Scope>,
        stat: &str,
        count: i64,
        sub_stat: &str,
    ) -> Result<i64, DbError> {
        self.apply(scope.into(), stat, sub_stat, count.saturating_neg())
            .await
    }

    /// When the counter last changed, if it exists.
    pub async fn last_update(
        &self,
        scope: impl Into<Scope>,
        stat: &str,
        sub_stat: &str,
    ) -> Result<Option<DateTime<Utc>>, DbError> {
        let scope_id = scope.into().id();
        let stat = stat.to_string();
        let sub_stat = sub_stat.to_string();
        let record = self
            .db
            .run_blocking(move |db| db.get_stat_total(scope_id, &stat, &sub_stat))
            .await?;
        Ok(record.and_then(|r| parse_sqlite_utc(&r.last_update)))
    }

    async fn apply(
        &self,
        scope: Scope,
        stat: &str,
        sub_stat: &str,
        delta: i64,
    ) -> Result<i64, DbError> {
        let now = self.clock.now();
        let day = crate::clock::day_number(now);
        let now = format_sqlite_utc(now);
        let scope_id = scope.id();
        let stat = stat.to_string();
        let sub_stat = sub_stat.to_string();
        self.db
            .run_blocking(move |db| {
                db.apply_stat_delta(scope_id, &stat, &sub_stat, delta, day, &now)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::db::test_db;
    use chrono::TimeZone;

    fn tracker() -> (StatsTracker, Arc<FixedClock>) {
        let start = Utc.with_ymd_and_hms(2026, 3, 10, 15, 0, 0).unwrap();
        let clock = Arc::new(FixedClock::new(start));
        (StatsTracker::with_clock(test_db(), clock.clone()), clock)
    }

    #[tokio::test]
    async fn test_emoji_counts() {
        let (stats, _) = tracker();
        for _ in 0..3 {
            stats.increment(42u64, "emoji", 1, "😀").await.unwrap();
        }
        for _ in 0..5 {
            stats.increment(42u64, "emoji", 1, "😂").await.unwrap();
        }

        assert_eq!(stats.get(42u64, "emoji", "😀", None).await.unwrap(), Some(3));

        let top = stats
            .fetch(42u64, "emoji", FetchOptions::default().with_limit(1))
            .await
            .unwrap();
        assert_eq!(top, vec![("😂".to_string(), 5)]);
    }

    #[tokio::test]
    async fn test_unknown_counter_is_absent() {
        let (stats, _) = tracker();
        assert_eq!(stats.get(1u64, "never", "", None).await.unwrap(), None);
        assert_eq!(stats.get(1u64, "never", "", Some(7)).await.unwrap(), None);
        assert!(stats
            .fetch(1u64, "never", FetchOptions::default())
            .await
            .unwrap()
            .is_empty());
        assert_eq!(stats.last_update(1u64, "never", "").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_decrement_keeps_history_consistent() {
        let (stats, clock) = tracker();

        stats.increment(Scope::Global, "members", 10, "").await.unwrap();
        clock.advance_days(1);
        assert_eq!(stats.decrement(None::<u64>, "members", 4, "").await.unwrap(), 6);
        clock.advance_days(1);
        stats.decrement(Scope::Global, "members", 9, "").await.unwrap();

        let total = stats.get(Scope::Global, "members", "", None).await.unwrap();
        assert_eq!(total, Some(-3));

        // Every bucket is in the window, so the windowed sum equals the total
        let history = stats.get(Scope::Global, "members", "", Some(30)).await.unwrap();
        assert_eq!(history, total);

        // Only yesterday and today
        let recent = stats.get(Scope::Global, "members", "", Some(1)).await.unwrap();
        assert_eq!(recent, Some(-13));
    }

    #[tokio::test]
    async fn test_window_moves_with_clock() {
        let (stats, clock) = tracker();

        stats.increment(5u64, "emoji", 4, "old").await.unwrap();
        clock.advance_days(10);
        stats.increment(5u64, "emoji", 1, "new").await.unwrap();

        let week = stats.fetch(5u64, "emoji", FetchOptions::default()).await.unwrap();
        assert_eq!(week, vec![("new".to_string(), 1)]);

        let month = stats
            .fetch(5u64, "emoji", FetchOptions::default().with_days(30))
            .await
            .unwrap();
        assert_eq!(month, vec![("old".to_string(), 4), ("new".to_string(), 1)]);

        let bottom = stats
            .fetch(5u64, "emoji", FetchOptions::default().with_days(30).ascending())
            .await
            .unwrap();
        assert_eq!(bottom[0], ("new".to_string(), 1));

        // The running total ignores the window
        assert_eq!(stats.get(5u64, "emoji", "old", None).await.unwrap(), Some(4));
        assert_eq!(stats.get(5u64, "emoji", "old", Some(7)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_fetch_submatch_and_limit() {
        let (stats, _) = tracker();
        for (sub, n) in [(":party_cat:", 2), (":catjam:", 5), (":dog:", 9), (":Cat:", 1)] {
            stats.increment(9u64, "emoji", n, sub).await.unwrap();
        }

        let cats = stats
            .fetch(9u64, "emoji", FetchOptions::default().with_submatch("cat"))
            .await
            .unwrap();
        assert_eq!(
            cats,
            vec![(":catjam:".to_string(), 5), (":party_cat:".to_string(), 2)]
        );

        let top = stats
            .fetch(9u64, "emoji", FetchOptions::default().with_limit(3))
            .await
            .unwrap();
        assert_eq!(top.len(), 3);
        assert!(top.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[tokio::test]
    async fn test_last_update_follows_clock() {
        let (stats, clock) = tracker();
        stats.increment(1u64, "commands", 1, "ping").await.unwrap();

        let later = Utc.with_ymd_and_hms(2026, 3, 12, 9, 30, 0).unwrap();
        clock.set(later);
        stats.increment(1u64, "commands", 1, "ping").await.unwrap();

        assert_eq!(
            stats.last_update(1u64, "commands", "ping").await.unwrap(),
            Some(later)
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_increments_are_not_lost() {
        let (stats, _) = tracker();
        let tasks: Vec<_> = (0..64)
            .map(|_| {
                let stats = stats.clone();
                tokio::spawn(async move { stats.increment(7u64, "x", 1, "").await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(stats.get(7u64, "x", "", None).await.unwrap(), Some(64));
        assert_eq!(stats.get(7u64, "x", "", Some(0)).await.unwrap(), Some(64));
    }
}
