//! SQLite-based storage.
//!
//! Provides persistent storage for:
//! - Key-value store for application state (growth level, saved timer)
//! - A log of completed and manually credited sessions
//! - Session statistics (daily and all-time)

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use super::{data_dir, KvStore};
use crate::error::{DatabaseError, Result};
use crate::events::GrowthCause;

/// Where a logged session came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionSource {
    /// The countdown ran to zero.
    Timer,
    /// "Complete Session" button.
    Manual,
    /// "Bonus +2" button.
    Bonus,
}

impl SessionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionSource::Timer => "timer",
            SessionSource::Manual => "manual",
            SessionSource::Bonus => "bonus",
        }
    }

    /// Growth causes that count as a session for the log.
    pub fn from_cause(cause: GrowthCause) -> Option<Self> {
        match cause {
            GrowthCause::SessionCompleted => Some(SessionSource::Timer),
            GrowthCause::ManualSession => Some(SessionSource::Manual),
            GrowthCause::Bonus => Some(SessionSource::Bonus),
            GrowthCause::Adjusted | GrowthCause::Reset => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: i64,
    pub source: String,
    pub duration_secs: u64,
    pub growth_after: u8,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Stats {
    pub total_sessions: u64,
    pub timer_sessions: u64,
    pub manual_sessions: u64,
    pub bonus_sessions: u64,
    pub total_focus_secs: u64,
    pub today_sessions: u64,
    pub today_focus_secs: u64,
}

/// SQLite database at `<data_dir>/plantify.db`.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database in the data directory.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("plantify.db"))
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        tracing::debug!(path = %path.display(), "database opened");
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS sessions (
                    id            INTEGER PRIMARY KEY AUTOINCREMENT,
                    source        TEXT NOT NULL,
                    duration_secs INTEGER NOT NULL DEFAULT 0,
                    growth_after  INTEGER NOT NULL,
                    completed_at  TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_sessions_completed_at ON sessions(completed_at);",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
    }

    /// Append a session to the log.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn record_session(
        &self,
        source: SessionSource,
        duration_secs: u64,
        growth_after: u8,
        completed_at: DateTime<Utc>,
    ) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO sessions (source, duration_secs, growth_after, completed_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    source.as_str(),
                    duration_secs,
                    growth_after,
                    completed_at.to_rfc3339(),
                ],
            )
            .map_err(DatabaseError::from)?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Most recent sessions first.
    pub fn recent_sessions(&self, limit: usize) -> Result<Vec<SessionRecord>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, source, duration_secs, growth_after, completed_at
                 FROM sessions ORDER BY completed_at DESC, id DESC LIMIT ?1",
            )
            .map_err(DatabaseError::from)?;
        let rows = stmt
            .query_map(params![limit as i64], |row| {
                let completed_at: String = row.get(4)?;
                Ok(SessionRecord {
                    id: row.get(0)?,
                    source: row.get(1)?,
                    duration_secs: row.get(2)?,
                    growth_after: row.get(3)?,
                    completed_at: DateTime::parse_from_rfc3339(&completed_at)
                        .map(|dt| dt.with_timezone(&Utc))
                        .unwrap_or_default(),
                })
            })
            .map_err(DatabaseError::from)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row.map_err(DatabaseError::from)?);
        }
        Ok(records)
    }

    pub fn stats_today(&self) -> Result<Stats> {
        let mut stats = self.tally(Some(today_cutoff()))?;
        stats.today_sessions = stats.total_sessions;
        stats.today_focus_secs = stats.total_focus_secs;
        Ok(stats)
    }

    pub fn stats_all(&self) -> Result<Stats> {
        let mut stats = self.tally(None)?;
        let today = self.tally(Some(today_cutoff()))?;
        stats.today_sessions = today.total_sessions;
        stats.today_focus_secs = today.total_focus_secs;
        Ok(stats)
    }

    fn tally(&self, since: Option<String>) -> Result<Stats> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT source, COUNT(*), COALESCE(SUM(duration_secs), 0)
                 FROM sessions
                 WHERE ?1 IS NULL OR completed_at >= ?1
                 GROUP BY source",
            )
            .map_err(DatabaseError::from)?;

        let rows = stmt
            .query_map(params![since], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, u64>(1)?,
                    row.get::<_, u64>(2)?,
                ))
            })
            .map_err(DatabaseError::from)?;

        let mut stats = Stats::default();
        for row in rows {
            let (source, count, secs) = row.map_err(DatabaseError::from)?;
            stats.total_sessions += count;
            match source.as_str() {
                "timer" => {
                    stats.timer_sessions += count;
                    stats.total_focus_secs += secs;
                }
                "manual" => stats.manual_sessions += count,
                "bonus" => stats.bonus_sessions += count,
                _ => {}
            }
        }
        Ok(stats)
    }
}

impl KvStore for Database {
    fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM kv WHERE key = ?1")
            .map_err(DatabaseError::from)?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DatabaseError::from(e).into()),
        }
    }

    fn kv_set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .map_err(DatabaseError::from)?;
        Ok(())
    }
}

fn today_cutoff() -> String {
    let today = Utc::now().format("%Y-%m-%d").to_string();
    format!("{today}T00:00:00+00:00")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn kv_store() {
        let mut db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
        db.kv_set("test", "again").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "again");
    }

    #[test]
    fn record_and_query() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now();
        db.record_session(SessionSource::Timer, 1500, 1, now).unwrap();
        db.record_session(SessionSource::Manual, 0, 2, now).unwrap();
        db.record_session(SessionSource::Bonus, 0, 4, now).unwrap();

        let stats = db.stats_all().unwrap();
        assert_eq!(stats.total_sessions, 3);
        assert_eq!(stats.timer_sessions, 1);
        assert_eq!(stats.manual_sessions, 1);
        assert_eq!(stats.bonus_sessions, 1);
        assert_eq!(stats.total_focus_secs, 1500);
        assert_eq!(stats.today_sessions, 3);
    }

    #[test]
    fn today_excludes_older_sessions() {
        let db = Database::open_memory().unwrap();
        let old = Utc::now() - Duration::days(3);
        db.record_session(SessionSource::Timer, 600, 1, old).unwrap();
        db.record_session(SessionSource::Timer, 900, 2, Utc::now()).unwrap();

        let today = db.stats_today().unwrap();
        assert_eq!(today.timer_sessions, 1);
        assert_eq!(today.today_focus_secs, 900);

        let all = db.stats_all().unwrap();
        assert_eq!(all.total_focus_secs, 1500);
        assert_eq!(all.today_focus_secs, 900);
    }

    #[test]
    fn recent_sessions_newest_first() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now();
        db.record_session(SessionSource::Timer, 60, 1, now - Duration::minutes(5))
            .unwrap();
        db.record_session(SessionSource::Bonus, 0, 3, now).unwrap();

        let recent = db.recent_sessions(10).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].source, "bonus");
        assert_eq!(recent[0].growth_after, 3);
        assert_eq!(recent[1].duration_secs, 60);
    }

    #[test]
    fn adjustments_are_not_sessions() {
        assert_eq!(SessionSource::from_cause(GrowthCause::Adjusted), None);
        assert_eq!(SessionSource::from_cause(GrowthCause::Reset), None);
        assert_eq!(
            SessionSource::from_cause(GrowthCause::Bonus),
            Some(SessionSource::Bonus)
        );
    }
}
