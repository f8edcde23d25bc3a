use super::error::check_width;
use super::{Database, DbError};
use rusqlite::{params, OptionalExtension};

pub const MAX_STAT_NAME_LEN: usize = 100;

/// Running-total row for one (scope, stat, sub-stat) key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatRecord {
    pub count: i64,
    pub last_update: String,
}

/// Direction of a top-N ranking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Descending,
    Ascending,
}

impl SortOrder {
    fn sql(self) -> &'static str {
        match self {
            SortOrder::Descending => "DESC",
            SortOrder::Ascending => "ASC",
        }
    }
}

impl Database {
    /// Adds `delta` to the running total and to the `day` bucket of one key,
    /// in a single transaction. Each table is touched with one atomic upsert
    /// so concurrent writers on the same key cannot lose updates.
    ///
    /// Returns the new running total.
    pub fn apply_stat_delta(
        &self,
        scope_id: i64,
        stat: &str,
        sub_stat: &str,
        delta: i64,
        day: i64,
        now: &str,
    ) -> Result<i64, DbError> {
        check_width("stat", stat, MAX_STAT_NAME_LEN)?;
        check_width("substat", sub_stat, MAX_STAT_NAME_LEN)?;

        self.with_transaction(|tx| {
            let total: i64 = tx.query_row(
                "INSERT INTO stats (scope_id, statname, substat, count, last_update)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(scope_id, statname, substat) DO UPDATE SET
                    count = count + excluded.count,
                    last_update = excluded.last_update
                 RETURNING count",
                params![scope_id, stat, sub_stat, delta, now],
                |row| row.get(0),
            )?;

            tx.execute(
                "INSERT INTO stats_granular (scope_id, statname, substat, day_number, count)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(scope_id, statname, substat, day_number) DO UPDATE SET
                    count = count + excluded.count",
                params![scope_id, stat, sub_stat, day, delta],
            )?;

            Ok(total)
        })
    }

    pub fn get_stat_total(
        &self,
        scope_id: i64,
        stat: &str,
        sub_stat: &str,
    ) -> Result<Option<StatRecord>, DbError> {
        let conn = self.lock()?;
        let record = conn
            .query_row(
                "SELECT count, last_update FROM stats
                 WHERE scope_id = ?1 AND statname = ?2 AND substat = ?3",
                params![scope_id, stat, sub_stat],
                |row| {
                    Ok(StatRecord {
                        count: row.get(0)?,
                        last_update: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    /// Sums the day buckets of one key from `since_day` onwards. `None` when
    /// no bucket falls in the window.
    pub fn sum_stat_since(
        &self,
        scope_id: i64,
        stat: &str,
        sub_stat: &str,
        since_day: i64,
    ) -> Result<Option<i64>, DbError> {
        let conn = self.lock()?;
        let sum = conn.query_row(
            "SELECT SUM(count) FROM stats_granular
             WHERE scope_id = ?1 AND statname = ?2 AND substat = ?3 AND day_number >= ?4",
            params![scope_id, stat, sub_stat, since_day],
            |row| row.get(0),
        )?;
        Ok(sum)
    }

    /// Ranks the sub-stats of `stat` by their summed buckets from `since_day`
    /// onwards. Equal sums are ordered by sub-stat. `submatch` keeps only
    /// sub-stats containing it, compared case-sensitively and literally.
    pub fn top_substats(
        &self,
        scope_id: i64,
        stat: &str,
        since_day: i64,
        limit: usize,
        order: SortOrder,
        submatch: Option<&str>,
    ) -> Result<Vec<(String, i64)>, DbError> {
        let sql = format!(
            "SELECT substat, SUM(count) AS total FROM stats_granular
             WHERE scope_id = ?1 AND statname = ?2 AND day_number >= ?3
               AND (?4 IS NULL OR instr(substat, ?4) > 0)
             GROUP BY substat
             ORDER BY total {}, substat ASC
             LIMIT ?5",
            order.sql()
        );

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![scope_id, stat, since_day, submatch, limit],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }
}
