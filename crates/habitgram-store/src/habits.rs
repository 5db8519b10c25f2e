//! Habit repository.

use crate::{HabitRow, Result, Store, StoreError};
use chrono::{NaiveDate, Utc};
use habitgram_core::{HabitId, Priority, UserId};

/// Fields for creating a habit.
#[derive(Debug, Clone)]
pub struct NewHabit {
    pub user_id: UserId,
    pub title: String,
    pub category: String,
    pub priority: Priority,
    pub color: String,
    pub coins_reward: Option<u32>,
    pub reminder_time: Option<String>,
    pub reminder_date: Option<NaiveDate>,
    pub reminder_days: Option<String>,
}

/// Partial update for a habit edit; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct HabitPatch {
    pub title: Option<String>,
    pub category: Option<String>,
    pub priority: Option<Priority>,
    pub color: Option<String>,
    pub coins_reward: Option<u32>,
    pub reminder_time: Option<Option<String>>,
    pub reminder_date: Option<Option<NaiveDate>>,
    pub reminder_days: Option<Option<String>>,
}

impl Store {
    /// Creates a habit and returns the stored row.
    pub async fn create_habit(&self, habit: NewHabit) -> Result<HabitRow> {
        let reward = habit
            .coins_reward
            .unwrap_or(habitgram_core::progression::DEFAULT_COINS_REWARD);

        let row = sqlx::query_as::<_, HabitRow>(
            r#"
            INSERT INTO habits
                (user_id, title, category, priority, color, coins_reward,
                 reminder_time, reminder_date, reminder_days, is_archived, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?)
            RETURNING *
            "#,
        )
        .bind(habit.user_id.0)
        .bind(&habit.title)
        .bind(&habit.category)
        .bind(habit.priority.as_str())
        .bind(&habit.color)
        .bind(i64::from(reward))
        .bind(&habit.reminder_time)
        .bind(habit.reminder_date)
        .bind(&habit.reminder_days)
        .bind(Utc::now())
        // Drained with fetch_all: stopping at the first row leaves the
        // statement unfinalized, so the implicit write transaction can
        // commit after this call returns and race readers on other pool
        // connections.
        .fetch_all(self.pool())
        .await?
        .into_iter()
        .next()
        .ok_or(StoreError::Database(sqlx::Error::RowNotFound))?;
        Ok(row)
    }

    /// Fetches a habit row by id.
    pub async fn get_habit(&self, habit_id: HabitId) -> Result<Option<HabitRow>> {
        let row = sqlx::query_as::<_, HabitRow>("SELECT * FROM habits WHERE id = ?")
            .bind(habit_id.0)
            .fetch_optional(self.pool())
            .await?;
        Ok(row)
    }

    /// All non-archived habits for a user, newest first.
    pub async fn list_active_habits(&self, user_id: UserId) -> Result<Vec<HabitRow>> {
        let rows = sqlx::query_as::<_, HabitRow>(
            "SELECT * FROM habits WHERE user_id = ? AND is_archived = 0 ORDER BY created_at DESC",
        )
        .bind(user_id.0)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    /// Applies a partial edit, scoped to the owner. Returns the updated row
    /// or `NotFound` if the habit does not exist or belongs to someone else.
    pub async fn update_habit(
        &self,
        habit_id: HabitId,
        user_id: UserId,
        patch: HabitPatch,
    ) -> Result<HabitRow> {
        // Optional-of-optional reminder fields distinguish "leave alone"
        // from "clear": the inner Option is written through when present.
        let current = self
            .get_habit(habit_id)
            .await?
            .filter(|h| h.owner() == user_id)
            .ok_or(StoreError::NotFound)?;

        let reminder_time = patch.reminder_time.unwrap_or(current.reminder_time);
        let reminder_date = patch.reminder_date.unwrap_or(current.reminder_date);
        let reminder_days = patch.reminder_days.unwrap_or(current.reminder_days);

        let row = sqlx::query_as::<_, HabitRow>(
            r#"
            UPDATE habits
            SET title = COALESCE(?, title),
                category = COALESCE(?, category),
                priority = COALESCE(?, priority),
                color = COALESCE(?, color),
                coins_reward = COALESCE(?, coins_reward),
                reminder_time = ?,
                reminder_date = ?,
                reminder_days = ?
            WHERE id = ? AND user_id = ?
            RETURNING *
            "#,
        )
        .bind(patch.title)
        .bind(patch.category)
        .bind(patch.priority.map(|p| p.as_str()))
        .bind(patch.color)
        .bind(patch.coins_reward.map(i64::from))
        .bind(reminder_time)
        .bind(reminder_date)
        .bind(reminder_days)
        .bind(habit_id.0)
        .bind(user_id.0)
        // fetch_all for the same drain-before-return reason as
        // create_habit.
        .fetch_all(self.pool())
        .await?
        .into_iter()
        .next()
        .ok_or(StoreError::NotFound)?;
        Ok(row)
    }

    /// Soft-deletes a habit; archived habits drop out of list views and
    /// reminder scans but keep their completion history.
    pub async fn archive_habit(&self, habit_id: HabitId, user_id: UserId) -> Result<()> {
        let result = sqlx::query("UPDATE habits SET is_archived = 1 WHERE id = ? AND user_id = ?")
            .bind(habit_id.0)
            .bind(user_id.0)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    /// Non-archived habits whose reminder time matches one of the candidate
    /// "HH:MM" slot strings and whose owner has notifications enabled.
    pub async fn habits_with_reminder_at(&self, slots: &[String]) -> Result<Vec<HabitRow>> {
        // Slot candidates are a fixed pair (primary tz + UTC), so a static
        // two-placeholder query covers the scan.
        let (first, second) = match slots {
            [a, b] => (a.as_str(), b.as_str()),
            [a] => (a.as_str(), a.as_str()),
            _ => return Ok(Vec::new()),
        };

        let rows = sqlx::query_as::<_, HabitRow>(
            r#"
            SELECT h.*
            FROM habits h
            JOIN users u ON u.telegram_id = h.user_id
            WHERE h.is_archived = 0
              AND u.notifications_enabled = 1
              AND h.reminder_time IN (?, ?)
            "#,
        )
        .bind(first)
        .bind(second)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }
}
