//! Row types mapped from the database.

use chrono::{DateTime, NaiveDate, Utc};
use habitgram_core::{CompletionId, HabitId, Priority, UserId, UserTotals};
use sqlx::FromRow;

/// A user row.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub telegram_id: i64,
    pub xp: i64,
    pub level: i64,
    pub total_coins: i64,
    pub current_streak: i64,
    pub notifications_enabled: bool,
    pub timezone: String,
    pub referred_by: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    pub fn id(&self) -> UserId {
        UserId(self.telegram_id)
    }

    /// Gamification totals, clamped into the domain's unsigned range.
    pub fn totals(&self) -> UserTotals {
        UserTotals {
            xp: self.xp.max(0) as u32,
            level: self.level.max(1) as u32,
            total_coins: self.total_coins.max(0) as u32,
        }
    }
}

/// A habit row.
#[derive(Debug, Clone, FromRow)]
pub struct HabitRow {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub category: String,
    pub priority: String,
    pub color: String,
    pub coins_reward: i64,
    pub reminder_time: Option<String>,
    pub reminder_date: Option<NaiveDate>,
    pub reminder_days: Option<String>,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
}

impl HabitRow {
    pub fn id(&self) -> HabitId {
        HabitId(self.id)
    }

    pub fn owner(&self) -> UserId {
        UserId(self.user_id)
    }

    /// Coin reward for one completion, falling back to the domain default
    /// for rows with a non-positive value.
    pub fn reward(&self) -> u32 {
        if self.coins_reward > 0 {
            self.coins_reward as u32
        } else {
            habitgram_core::progression::DEFAULT_COINS_REWARD
        }
    }

    /// Parsed priority; unknown stored values degrade to medium.
    pub fn priority(&self) -> Priority {
        self.priority.parse().unwrap_or_default()
    }
}

/// A completion row.
#[derive(Debug, Clone, FromRow)]
pub struct CompletionRow {
    pub id: i64,
    pub habit_id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub completed_at: DateTime<Utc>,
    pub note: Option<String>,
}

impl CompletionRow {
    pub fn id(&self) -> CompletionId {
        CompletionId(self.id)
    }
}
