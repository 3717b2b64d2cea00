//! SQLite-based workout storage and statistics.
//!
//! Provides persistent storage for:
//! - Completed (and abandoned) workout sessions
//! - Workout statistics (all-time and daily)
//! - Key-value store for application state (the CLI keeps the live
//!   engine snapshot here between invocations)

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use super::{data_dir, CompletionStore};
use crate::completion::CompletionData;
use crate::error::DatabaseError;

/// One stored workout row (summary columns; the full
/// [`CompletionData`] JSON lives in the `detail` column).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub id: i64,
    pub user_id: String,
    pub session_id: String,
    pub workout_name: String,
    pub workout_kind: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub duration_secs: u64,
    pub total_calories: u64,
    pub exercises_completed: u64,
    pub fully_completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WorkoutStats {
    pub total_workouts: u64,
    pub fully_completed: u64,
    pub total_duration_secs: u64,
    pub total_calories: u64,
    pub today_workouts: u64,
}

/// SQLite database for workout storage.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/setflow/setflow.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let path = data_dir()?.join("setflow.db");
        Ok(Self::open_at(&path)?)
    }

    /// Open (and migrate) a database at an explicit path.
    pub fn open_at(path: &std::path::Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS workouts (
                    id              INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id         TEXT NOT NULL,
                    session_id      TEXT NOT NULL,
                    workout_name    TEXT NOT NULL DEFAULT '',
                    workout_kind    TEXT NOT NULL DEFAULT '',
                    started_at      TEXT NOT NULL,
                    ended_at        TEXT NOT NULL,
                    duration_secs   INTEGER NOT NULL,
                    total_calories  INTEGER NOT NULL,
                    exercises_completed INTEGER NOT NULL,
                    fully_completed INTEGER NOT NULL,
                    detail          TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_workouts_ended_at ON workouts(ended_at);
                CREATE INDEX IF NOT EXISTS idx_workouts_user ON workouts(user_id);",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
    }

    /// List the most recent stored workouts, newest first.
    pub fn recent_workouts(&self, limit: u32) -> Result<Vec<WorkoutRecord>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, session_id, workout_name, workout_kind,
                    started_at, ended_at, duration_secs, total_calories,
                    exercises_completed, fully_completed
             FROM workouts
             ORDER BY ended_at DESC
             LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
                row.get::<_, u64>(7)?,
                row.get::<_, u64>(8)?,
                row.get::<_, u64>(9)?,
                row.get::<_, bool>(10)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (
                id,
                user_id,
                session_id,
                workout_name,
                workout_kind,
                started_at,
                ended_at,
                duration_secs,
                total_calories,
                exercises_completed,
                fully_completed,
            ) = row?;
            records.push(WorkoutRecord {
                id,
                user_id,
                session_id,
                workout_name,
                workout_kind,
                started_at: parse_ts(&started_at)?,
                ended_at: parse_ts(&ended_at)?,
                duration_secs,
                total_calories,
                exercises_completed,
                fully_completed,
            });
        }
        Ok(records)
    }

    /// Full stored summary for one workout row.
    pub fn workout_detail(&self, id: i64) -> Result<Option<CompletionData>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT detail FROM workouts WHERE id = ?1")?;
        let result = stmt.query_row(params![id], |row| row.get::<_, String>(0));
        match result {
            Ok(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| DatabaseError::QueryFailed(e.to_string())),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn stats_all(&self) -> Result<WorkoutStats, DatabaseError> {
        let mut stats = WorkoutStats::default();

        let row = self.conn.query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(fully_completed), 0),
                    COALESCE(SUM(duration_secs), 0),
                    COALESCE(SUM(total_calories), 0)
             FROM workouts",
            [],
            |row| {
                Ok((
                    row.get::<_, u64>(0)?,
                    row.get::<_, u64>(1)?,
                    row.get::<_, u64>(2)?,
                    row.get::<_, u64>(3)?,
                ))
            },
        )?;
        stats.total_workouts = row.0;
        stats.fully_completed = row.1;
        stats.total_duration_secs = row.2;
        stats.total_calories = row.3;

        let today = Utc::now().format("%Y-%m-%d").to_string();
        stats.today_workouts = self.conn.query_row(
            "SELECT COUNT(*) FROM workouts WHERE ended_at >= ?1",
            params![format!("{today}T00:00:00+00:00")],
            |row| row.get::<_, u64>(0),
        )?;

        Ok(stats)
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    /// Delete a key from the kv store.
    pub fn kv_delete(&self, key: &str) -> Result<(), DatabaseError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

impl CompletionStore for Database {
    fn save_completion(&self, user_id: &str, data: &CompletionData) -> Result<i64, DatabaseError> {
        let detail =
            serde_json::to_string(data).map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        self.conn.execute(
            "INSERT INTO workouts (user_id, session_id, workout_name, workout_kind,
                                   started_at, ended_at, duration_secs, total_calories,
                                   exercises_completed, fully_completed, detail)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                user_id,
                data.session_id,
                data.workout_name,
                data.workout_kind,
                data.started_at.to_rfc3339(),
                data.ended_at.to_rfc3339(),
                data.duration_secs,
                data.total_calories,
                data.exercises.len() as u64,
                data.is_fully_completed,
                detail,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }
}

fn parse_ts(raw: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::QueryFailed(format!("bad timestamp '{raw}': {e}")))
}
