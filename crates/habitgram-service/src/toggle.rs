//! Completion toggling with ledger and badge side effects.
//!
//! The flow for toggling on: ownership check → idempotent insert (the
//! unique constraint arbitrates races) → ledger add → badge evaluation.
//! Toggling off mirrors it with a clamped ledger removal and never a badge.

use crate::timeutil::{local_date, local_hour, parse_tz};
use crate::{Result, ServiceError};
use chrono::{DateTime, NaiveDate, Utc};
use habitgram_core::{
    current_streak, evaluate_badge, Badge, BadgeContext, CompletionId, HabitId, LedgerEvent,
    UserId,
};
use habitgram_store::{HabitRow, Store, StoreError, UserRow};
use serde::Serialize;
use tracing::{debug, error, info, warn};

/// A toggle request, already authenticated.
#[derive(Debug, Clone)]
pub struct ToggleRequest {
    pub habit_id: HabitId,
    pub user_id: UserId,
    pub date: NaiveDate,
    pub want_completed: bool,
    pub note: Option<String>,
}

/// The outcome of a successful toggle. `coins_earned` is the signed coin
/// delta so clients can reconcile optimistic state without re-deriving
/// business rules.
#[derive(Debug, Clone, Serialize)]
pub struct ToggleOutcome {
    pub coins_earned: i64,
    pub new_badge: Option<Badge>,
    pub completion_id: Option<CompletionId>,
}

/// Orchestrates completion toggles.
#[derive(Clone)]
pub struct ToggleService {
    store: Store,
}

impl ToggleService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Toggles a completion. Fully idempotent: repeating either direction
    /// of a toggle yields a success with a zero delta, and any calendar
    /// date is accepted so users can log retroactively.
    pub async fn toggle(&self, request: ToggleRequest) -> Result<ToggleOutcome> {
        let (habit, user) = self.load_checked(request.habit_id, request.user_id).await?;

        if request.want_completed {
            self.complete(&habit, &user, request.date, request.note.as_deref())
                .await
        } else {
            self.uncomplete(&habit, request.date).await
        }
    }

    /// The "done" callback entry point: completes the habit for today in
    /// the owner's timezone. Same semantics as [`ToggleService::toggle`].
    pub async fn toggle_done_today(
        &self,
        habit_id: HabitId,
        user_id: UserId,
    ) -> Result<ToggleOutcome> {
        let (habit, user) = self.load_checked(habit_id, user_id).await?;
        let tz = parse_tz(&user.timezone);
        let today = local_date(Utc::now(), &tz);
        self.complete(&habit, &user, today, None).await
    }

    /// Ownership check; rejects before any mutation.
    async fn load_checked(
        &self,
        habit_id: HabitId,
        user_id: UserId,
    ) -> Result<(HabitRow, UserRow)> {
        let habit = self
            .store
            .get_habit(habit_id)
            .await?
            .ok_or_else(|| ServiceError::Validation(format!("unknown habit {habit_id}")))?;

        if habit.owner() != user_id {
            return Err(ServiceError::NotOwner {
                habit_id: habit_id.0,
                user_id: user_id.0,
            });
        }

        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or_else(|| ServiceError::Validation(format!("unknown user {user_id}")))?;

        Ok((habit, user))
    }

    async fn complete(
        &self,
        habit: &HabitRow,
        user: &UserRow,
        date: NaiveDate,
        note: Option<&str>,
    ) -> Result<ToggleOutcome> {
        if let Some(existing) = self.store.find_completion(habit.id(), date).await? {
            debug!(habit = %habit.id(), %date, "already completed, idempotent no-op");
            return Ok(ToggleOutcome {
                coins_earned: 0,
                new_badge: None,
                completion_id: Some(existing.id()),
            });
        }

        let completed_at = Utc::now();
        let inserted = match self
            .store
            .insert_completion(habit.id(), habit.owner(), date, completed_at, note)
            .await
        {
            Ok(row) => row,
            Err(StoreError::DuplicateCompletion { .. }) => {
                // Lost the race to a concurrent toggle; degrade to the
                // idempotent path.
                debug!(habit = %habit.id(), %date, "concurrent insert won, idempotent no-op");
                let existing = self.store.find_completion(habit.id(), date).await?;
                return Ok(ToggleOutcome {
                    coins_earned: 0,
                    new_badge: None,
                    completion_id: existing.map(|c| c.id()),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let reward = habit.reward();
        let event = LedgerEvent::Added { reward };
        if let Err(source) = self.store.apply_ledger_delta(user.id(), event.delta()).await {
            // Completion persisted, reward not granted. Surfaced distinctly
            // so a retry or recompute_user_totals can reconcile.
            error!(
                habit = %habit.id(),
                user = %user.id(),
                %date,
                %source,
                "completion persisted but ledger update failed"
            );
            return Err(ServiceError::LedgerInconsistency { source });
        }

        let totals_before = user.totals();
        let totals_after = totals_before.apply(event);
        let badge = self
            .evaluate_badge_for(user, completed_at, totals_before.level, totals_after.level)
            .await?;

        info!(
            habit = %habit.id(),
            user = %user.id(),
            %date,
            coins = reward,
            badge = badge.map(|b| b.as_str()).unwrap_or("none"),
            "completion recorded"
        );

        Ok(ToggleOutcome {
            coins_earned: i64::from(reward),
            new_badge: badge,
            completion_id: Some(inserted.id()),
        })
    }

    async fn uncomplete(&self, habit: &HabitRow, date: NaiveDate) -> Result<ToggleOutcome> {
        let removed = self.store.delete_completion(habit.id(), date).await?;
        if removed.is_none() {
            // Nothing to remove; deleting a non-existent row is a success.
            return Ok(ToggleOutcome {
                coins_earned: 0,
                new_badge: None,
                completion_id: None,
            });
        }

        let reward = habit.reward();
        let event = LedgerEvent::Removed { reward };
        if let Err(source) = self
            .store
            .apply_ledger_delta(habit.owner(), event.delta())
            .await
        {
            error!(
                habit = %habit.id(),
                user = %habit.owner(),
                %date,
                %source,
                "completion removed but ledger update failed"
            );
            return Err(ServiceError::LedgerInconsistency { source });
        }

        self.refresh_streak(habit.owner()).await;

        info!(habit = %habit.id(), user = %habit.owner(), %date, coins = -(i64::from(reward)), "completion removed");

        Ok(ToggleOutcome {
            coins_earned: -i64::from(reward),
            new_badge: None,
            completion_id: None,
        })
    }

    /// Gathers badge inputs after the insert and ledger update.
    async fn evaluate_badge_for(
        &self,
        user: &UserRow,
        completed_at: DateTime<Utc>,
        level_before: u32,
        level_after: u32,
    ) -> Result<Option<Badge>> {
        let tz = parse_tz(&user.timezone);
        let total_completions = self.store.count_completions_for_user(user.id()).await?;
        let dates = self.store.completion_dates_for_user(user.id()).await?;
        let today = local_date(Utc::now(), &tz);
        let global_streak = current_streak(&dates, today);

        // Informational only; a failure here must not fail the toggle.
        if let Err(e) = self.store.set_current_streak(user.id(), global_streak).await {
            warn!(user = %user.id(), error = %e, "failed to store informational streak");
        }

        Ok(evaluate_badge(&BadgeContext {
            local_hour: local_hour(completed_at, &tz),
            total_completions,
            global_streak,
            level_before,
            level_after,
        }))
    }

    async fn refresh_streak(&self, user_id: UserId) {
        let recomputed = async {
            let user = self.store.get_user(user_id).await?.ok_or(StoreError::NotFound)?;
            let tz = parse_tz(&user.timezone);
            let dates = self.store.completion_dates_for_user(user_id).await?;
            let streak = current_streak(&dates, local_date(Utc::now(), &tz));
            self.store.set_current_streak(user_id, streak).await
        }
        .await;

        if let Err(e) = recomputed {
            warn!(user = %user_id, error = %e, "failed to refresh informational streak");
        }
    }
}
