//! SQLite-based persistence for the habitgram backend.
//!
//! This crate owns the schema and every query. The uniqueness constraint on
//! `completions (habit_id, date)` is the concurrency arbiter for completion
//! toggles: concurrent inserts for the same key leave exactly one row, and
//! the loser surfaces as [`StoreError::DuplicateCompletion`] so callers can
//! degrade to the idempotent path. Ledger fields are mutated with atomic
//! in-database increments, never read-modify-write.

mod completions;
mod error;
mod habits;
mod models;
mod schema;
mod users;

pub use completions::DailyCount;
pub use error::StoreError;
pub use habits::{HabitPatch, NewHabit};
pub use models::{CompletionRow, HabitRow, UserRow};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::info;

/// Common result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Persistent storage handle, cheap to clone.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Opens (creating if missing) the database at `path` and brings the
    /// schema up to date.
    pub async fn connect(path: &str, max_connections: u32) -> Result<Self> {
        info!(path, "opening database");

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{path}"))
            .map_err(StoreError::Database)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.initialize_schema().await?;
        Ok(store)
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
