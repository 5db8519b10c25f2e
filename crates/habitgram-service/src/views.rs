//! Registration and habit list views.

use crate::timeutil::{local_date, parse_tz};
use crate::Result;
use chrono::{NaiveDate, Utc};
use habitgram_core::{current_streak, CompletionId, UserId};
use habitgram_store::{HabitRow, Store, UserRow};
use std::collections::HashMap;

/// A habit annotated with its state for one viewing date.
#[derive(Debug, Clone)]
pub struct AnnotatedHabit {
    pub habit: HabitRow,
    pub completed: bool,
    pub completion_id: Option<CompletionId>,
    pub today_note: Option<String>,
    pub current_streak: u32,
}

/// Read-side service: registration and the annotated habit list.
#[derive(Clone)]
pub struct ViewService {
    store: Store,
    default_timezone: String,
}

impl ViewService {
    pub fn new(store: Store, default_timezone: String) -> Self {
        Self {
            store,
            default_timezone,
        }
    }

    /// Idempotent registration, called on every app open. Replaces the
    /// old process-global "already verified" flag: the upsert itself is the
    /// guard, so it survives restarts and multiple instances.
    pub async fn ensure_user(
        &self,
        user_id: UserId,
        referred_by: Option<UserId>,
        timezone: Option<String>,
    ) -> Result<UserRow> {
        let tz = timezone.unwrap_or_else(|| self.default_timezone.clone());
        let row = self.store.ensure_user(user_id, referred_by, &tz).await?;
        Ok(row)
    }

    /// Non-archived habits annotated with completion state and per-habit
    /// streak for `date` (defaulting to today in the user's timezone).
    pub async fn habits_for_date(
        &self,
        user_id: UserId,
        date: Option<NaiveDate>,
    ) -> Result<Vec<AnnotatedHabit>> {
        let user = self.store.ensure_user(user_id, None, &self.default_timezone).await?;
        let tz = parse_tz(&user.timezone);
        let today = local_date(Utc::now(), &tz);
        let view_date = date.unwrap_or(today);

        let habits = self.store.list_active_habits(user_id).await?;
        let completions = self.store.completions_for_user_on(user_id, view_date).await?;
        let by_habit: HashMap<i64, _> = completions.into_iter().map(|c| (c.habit_id, c)).collect();

        let mut annotated = Vec::with_capacity(habits.len());
        for habit in habits {
            let dates = self.store.completion_dates_for_habit(habit.id()).await?;
            let streak = current_streak(&dates, today);
            let completion = by_habit.get(&habit.id);
            annotated.push(AnnotatedHabit {
                completed: completion.is_some(),
                completion_id: completion.map(|c| c.id()),
                today_note: completion.and_then(|c| c.note.clone()),
                current_streak: streak,
                habit,
            });
        }
        Ok(annotated)
    }
}
