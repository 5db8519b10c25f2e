//! User repository: idempotent registration and ledger updates.

use crate::{Result, Store, StoreError, UserRow};
use chrono::Utc;
use habitgram_core::progression::{XP_PER_COMPLETION, XP_PER_LEVEL};
use habitgram_core::{level_for_xp, LedgerDelta, UserId};
use tracing::debug;

impl Store {
    /// Idempotent registration: inserts the user if absent, then reads the
    /// row back. Safe to call on every app open and across instances, which
    /// is what makes an in-memory "already registered" guard unnecessary.
    ///
    /// `referred_by` and `timezone` only take effect on first creation;
    /// existing rows are never overwritten by this call.
    pub async fn ensure_user(
        &self,
        user_id: UserId,
        referred_by: Option<UserId>,
        timezone: &str,
    ) -> Result<UserRow> {
        sqlx::query(
            r#"
            INSERT INTO users (telegram_id, timezone, referred_by, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (telegram_id) DO NOTHING
            "#,
        )
        .bind(user_id.0)
        .bind(timezone)
        .bind(referred_by.map(|r| r.0))
        .bind(Utc::now())
        .execute(self.pool())
        .await?;

        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE telegram_id = ?")
            .bind(user_id.0)
            .fetch_one(self.pool())
            .await?;
        Ok(row)
    }

    /// Fetches a user row.
    pub async fn get_user(&self, user_id: UserId) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE telegram_id = ?")
            .bind(user_id.0)
            .fetch_optional(self.pool())
            .await?;
        Ok(row)
    }

    /// Applies signed xp/coin deltas with atomic in-database increments,
    /// clamping at zero and deriving the level from the resulting xp. The
    /// arithmetic happens in SQL so concurrent toggles on different habits
    /// for the same user cannot lose an increment.
    ///
    /// Errors with [`StoreError::NotFound`] when no user row matched, so a
    /// delta aimed at a nonexistent user never passes silently.
    pub async fn apply_ledger_delta(&self, user_id: UserId, delta: LedgerDelta) -> Result<()> {
        debug!(user = %user_id, xp = delta.xp, coins = delta.coins, "applying ledger delta");
        let result = sqlx::query(
            r#"
            UPDATE users
            SET xp = MAX(0, xp + ?1),
                total_coins = MAX(0, total_coins + ?2),
                level = MAX(0, xp + ?1) / ?3 + 1
            WHERE telegram_id = ?4
            "#,
        )
        .bind(delta.xp)
        .bind(delta.coins)
        .bind(i64::from(XP_PER_LEVEL))
        .bind(user_id.0)
        .execute(self.pool())
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    /// Stores the informational streak value shown in profile views.
    pub async fn set_current_streak(&self, user_id: UserId, streak: u32) -> Result<()> {
        sqlx::query("UPDATE users SET current_streak = ? WHERE telegram_id = ?")
            .bind(i64::from(streak))
            .bind(user_id.0)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    /// Enables or disables reminder notifications for a user.
    pub async fn set_notifications_enabled(&self, user_id: UserId, enabled: bool) -> Result<()> {
        sqlx::query("UPDATE users SET notifications_enabled = ? WHERE telegram_id = ?")
            .bind(enabled)
            .bind(user_id.0)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    /// Integrity check: recomputes xp and coins from the completion history
    /// and overwrites the accumulated totals. Detects and corrects drift
    /// left behind by a completion insert whose ledger update failed.
    pub async fn recompute_user_totals(&self, user_id: UserId) -> Result<()> {
        let (count, coins): (i64, Option<i64>) = sqlx::query_as(
            r#"
            SELECT COUNT(c.id), SUM(h.coins_reward)
            FROM completions c
            JOIN habits h ON h.id = c.habit_id
            WHERE c.user_id = ?
            "#,
        )
        .bind(user_id.0)
        .fetch_one(self.pool())
        .await?;

        let xp = (count.max(0) as u32).saturating_mul(XP_PER_COMPLETION);
        let level = level_for_xp(xp);

        sqlx::query("UPDATE users SET xp = ?, total_coins = ?, level = ? WHERE telegram_id = ?")
            .bind(i64::from(xp))
            .bind(coins.unwrap_or(0).max(0))
            .bind(i64::from(level))
            .bind(user_id.0)
            .execute(self.pool())
            .await?;
        Ok(())
    }
}
