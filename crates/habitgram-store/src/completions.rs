//! Completion repository.
//!
//! All inserts go through the `(habit_id, date)` unique constraint; the
//! racing loser gets `StoreError::DuplicateCompletion` back instead of a
//! raw database error.

use crate::{CompletionRow, Result, Store, StoreError};
use chrono::{DateTime, NaiveDate, Utc};
use habitgram_core::{HabitId, UserId};
use sqlx::FromRow;

/// One day's completion count, for weekly and heatmap aggregation.
#[derive(Debug, Clone, FromRow)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: i64,
}

impl Store {
    /// Looks up the completion for a `(habit, date)` key.
    pub async fn find_completion(
        &self,
        habit_id: HabitId,
        date: NaiveDate,
    ) -> Result<Option<CompletionRow>> {
        let row = sqlx::query_as::<_, CompletionRow>(
            "SELECT * FROM completions WHERE habit_id = ? AND date = ?",
        )
        .bind(habit_id.0)
        .bind(date)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    /// Inserts a completion. A concurrent insert for the same key surfaces
    /// as [`StoreError::DuplicateCompletion`].
    pub async fn insert_completion(
        &self,
        habit_id: HabitId,
        user_id: UserId,
        date: NaiveDate,
        completed_at: DateTime<Utc>,
        note: Option<&str>,
    ) -> Result<CompletionRow> {
        let row = sqlx::query_as::<_, CompletionRow>(
            r#"
            INSERT INTO completions (habit_id, user_id, date, completed_at, note)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(habit_id.0)
        .bind(user_id.0)
        .bind(date)
        .bind(completed_at)
        .bind(note)
        // Drained with fetch_all: stopping at the first row leaves the
        // statement unfinalized, so the implicit write transaction can
        // commit after this call returns and race readers on other pool
        // connections.
        .fetch_all(self.pool())
        .await
        .map_err(|e| StoreError::from_insert(e, habit_id, date))?
        .into_iter()
        .next()
        .ok_or(StoreError::Database(sqlx::Error::RowNotFound))?;
        Ok(row)
    }

    /// Deletes the completion for a key, returning the removed row.
    /// Deleting a non-existent row is a no-op `None`.
    pub async fn delete_completion(
        &self,
        habit_id: HabitId,
        date: NaiveDate,
    ) -> Result<Option<CompletionRow>> {
        let row = sqlx::query_as::<_, CompletionRow>(
            "DELETE FROM completions WHERE habit_id = ? AND date = ? RETURNING *",
        )
        .bind(habit_id.0)
        .bind(date)
        // fetch_all for the same drain-before-return reason as
        // insert_completion.
        .fetch_all(self.pool())
        .await?
        .into_iter()
        .next();
        Ok(row)
    }

    /// Updates the free-text note on an existing completion.
    pub async fn update_completion_note(
        &self,
        habit_id: HabitId,
        date: NaiveDate,
        note: Option<&str>,
    ) -> Result<()> {
        sqlx::query("UPDATE completions SET note = ? WHERE habit_id = ? AND date = ?")
            .bind(note)
            .bind(habit_id.0)
            .bind(date)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    /// All completion dates for one habit.
    pub async fn completion_dates_for_habit(&self, habit_id: HabitId) -> Result<Vec<NaiveDate>> {
        let dates = sqlx::query_scalar::<_, NaiveDate>(
            "SELECT date FROM completions WHERE habit_id = ? ORDER BY date",
        )
        .bind(habit_id.0)
        .fetch_all(self.pool())
        .await?;
        Ok(dates)
    }

    /// Distinct completion dates across all of a user's habits; the input
    /// to the global streak.
    pub async fn completion_dates_for_user(&self, user_id: UserId) -> Result<Vec<NaiveDate>> {
        let dates = sqlx::query_scalar::<_, NaiveDate>(
            "SELECT DISTINCT date FROM completions WHERE user_id = ? ORDER BY date",
        )
        .bind(user_id.0)
        .fetch_all(self.pool())
        .await?;
        Ok(dates)
    }

    /// Global completion count for a user across all habits.
    pub async fn count_completions_for_user(&self, user_id: UserId) -> Result<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM completions WHERE user_id = ?")
                .bind(user_id.0)
                .fetch_one(self.pool())
                .await?;
        Ok(count.max(0) as u64)
    }

    /// Completions for a user on one date, across all habits. Used to
    /// annotate the habit list view.
    pub async fn completions_for_user_on(
        &self,
        user_id: UserId,
        date: NaiveDate,
    ) -> Result<Vec<CompletionRow>> {
        let rows = sqlx::query_as::<_, CompletionRow>(
            "SELECT * FROM completions WHERE user_id = ? AND date = ?",
        )
        .bind(user_id.0)
        .bind(date)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    /// Per-day completion counts within a date range (inclusive).
    pub async fn daily_counts(
        &self,
        user_id: UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyCount>> {
        let rows = sqlx::query_as::<_, DailyCount>(
            r#"
            SELECT date, COUNT(*) AS count
            FROM completions
            WHERE user_id = ? AND date >= ? AND date <= ?
            GROUP BY date
            ORDER BY date
            "#,
        )
        .bind(user_id.0)
        .bind(from)
        .bind(to)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    /// Completion counts grouped by habit category, feeding the radar
    /// chart. Archived habits still count: earned history is not erased.
    pub async fn category_completion_counts(
        &self,
        user_id: UserId,
    ) -> Result<Vec<(String, i64)>> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT h.category, COUNT(c.id)
            FROM completions c
            JOIN habits h ON h.id = c.habit_id
            WHERE c.user_id = ?
            GROUP BY h.category
            "#,
        )
        .bind(user_id.0)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }
}
