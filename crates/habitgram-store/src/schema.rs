//! Database schema initialization.
//!
//! Follows a version-table approach: the current version is recorded in
//! `schema_version` and the DDL below is applied when the database is new
//! or behind.

use crate::{Result, Store};
use tracing::{debug, info};

/// Database schema version for migrations
const SCHEMA_VERSION: i32 = 1;

impl Store {
    /// Initialize the database schema
    pub(crate) async fn initialize_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY,
                applied_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(self.pool())
        .await?;

        let current_version: Option<i32> =
            sqlx::query_scalar("SELECT version FROM schema_version ORDER BY version DESC LIMIT 1")
                .fetch_optional(self.pool())
                .await?;

        match current_version {
            Some(version) if version >= SCHEMA_VERSION => {
                debug!(version, "database schema is up to date");
                return Ok(());
            }
            Some(version) => {
                info!(from = version, to = SCHEMA_VERSION, "upgrading database schema");
            }
            None => {
                info!(version = SCHEMA_VERSION, "creating initial database schema");
            }
        }

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                telegram_id INTEGER PRIMARY KEY,
                xp INTEGER NOT NULL DEFAULT 0,
                level INTEGER NOT NULL DEFAULT 1,
                total_coins INTEGER NOT NULL DEFAULT 0,
                current_streak INTEGER NOT NULL DEFAULT 0,
                notifications_enabled BOOLEAN NOT NULL DEFAULT 1,
                timezone TEXT NOT NULL DEFAULT 'UTC',
                referred_by INTEGER,
                created_at DATETIME NOT NULL
            )
            "#,
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS habits (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(telegram_id),
                title TEXT NOT NULL,
                category TEXT NOT NULL DEFAULT '',
                priority TEXT NOT NULL DEFAULT 'medium',
                color TEXT NOT NULL DEFAULT '#4caf50',
                coins_reward INTEGER NOT NULL DEFAULT 10,
                reminder_time TEXT,
                reminder_date TEXT,
                reminder_days TEXT,
                is_archived BOOLEAN NOT NULL DEFAULT 0,
                created_at DATETIME NOT NULL
            )
            "#,
        )
        .execute(self.pool())
        .await?;

        // UNIQUE (habit_id, date) is the concurrency arbiter for toggles.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS completions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                habit_id INTEGER NOT NULL REFERENCES habits(id),
                user_id INTEGER NOT NULL REFERENCES users(telegram_id),
                date TEXT NOT NULL,
                completed_at DATETIME NOT NULL,
                note TEXT,
                UNIQUE (habit_id, date)
            )
            "#,
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_completions_user_date ON completions (user_id, date)",
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_habits_reminder_time ON habits (reminder_time)",
        )
        .execute(self.pool())
        .await?;

        sqlx::query("INSERT OR REPLACE INTO schema_version (version) VALUES (?)")
            .bind(SCHEMA_VERSION)
            .execute(self.pool())
            .await?;

        info!("database schema initialized");
        Ok(())
    }
}
