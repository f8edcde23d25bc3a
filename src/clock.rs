//! Time source for stats bookkeeping.
//!
//! History rows are bucketed by day index: whole UTC days since the unix
//! epoch. The host timezone never enters the computation.

use chrono::{DateTime, Utc};
use std::sync::Mutex;

const SECONDS_PER_DAY: i64 = 86_400;

/// Where "now" comes from. Production code uses [`SystemClock`].
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Index of the current UTC day.
    fn today(&self) -> i64 {
        day_number(self.now())
    }
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a caller-chosen instant, for tests and replays.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        let mut guard = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *guard = now;
    }

    pub fn advance_days(&self, days: i64) {
        let mut guard = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *guard += chrono::Duration::days(days);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Day index of `at`. Floors toward negative infinity so instants before
/// 1970 still land in the right bucket.
pub fn day_number(at: DateTime<Utc>) -> i64 {
    at.timestamp().div_euclid(SECONDS_PER_DAY)
}

/// Timestamp format used for `DATETIME` columns.
pub const SQLITE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_sqlite_utc(at: DateTime<Utc>) -> String {
    at.format(SQLITE_TIMESTAMP_FORMAT).to_string()
}

pub fn parse_sqlite_utc(ts: &str) -> Option<DateTime<Utc>> {
    let naive = chrono::NaiveDateTime::parse_from_str(ts, SQLITE_TIMESTAMP_FORMAT).ok()?;
    Some(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_day_number_boundaries() {
        let epoch = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(day_number(epoch), 0);

        let last_second = Utc.with_ymd_and_hms(1970, 1, 1, 23, 59, 59).unwrap();
        assert_eq!(day_number(last_second), 0);

        let next_midnight = Utc.with_ymd_and_hms(1970, 1, 2, 0, 0, 0).unwrap();
        assert_eq!(day_number(next_midnight), 1);

        let before_epoch = Utc.with_ymd_and_hms(1969, 12, 31, 23, 0, 0).unwrap();
        assert_eq!(day_number(before_epoch), -1);

        // 2023-12-28 is 19719 days after the epoch
        let day = Utc.with_ymd_and_hms(2023, 12, 28, 12, 30, 0).unwrap();
        assert_eq!(day_number(day), 19719);
    }

    #[test]
    fn test_fixed_clock_advances() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let clock = FixedClock::new(start);
        let today = clock.today();

        clock.advance_days(2);
        assert_eq!(clock.today(), today + 2);

        clock.set(start);
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn test_sqlite_timestamp_round_trip() {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 13, 5, 9).unwrap();
        let text = format_sqlite_utc(at);
        assert_eq!(text, "2026-01-01 13:05:09");
        assert_eq!(parse_sqlite_utc(&text), Some(at));
        assert_eq!(parse_sqlite_utc("yesterday"), None);
    }
}
