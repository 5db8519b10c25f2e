//! Time-driven reminder dispatch.
//!
//! Each scan computes the current 10-minute slot in two representations
//! (primary timezone and UTC) and notifies every matching habit's owner.
//! A failed send is logged and skipped; the next cycle re-evaluates, and
//! already-sent reminders are not suppressed within a day.

use crate::Result;
use chrono::{DateTime, Datelike, Timelike, Utc};
use chrono_tz::Tz;
use habitgram_store::{HabitRow, Store};
use habitgram_telegram::{MessagingGateway, ReminderMessage};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// The outcome of one reminder scan.
#[derive(Debug, Clone, Serialize)]
pub struct ReminderReport {
    /// The two "HH:MM" slot strings that were checked.
    pub checked: [String; 2],
    /// Habits whose reminder time matched a slot.
    pub found: usize,
    /// Reminders actually delivered.
    pub sent: usize,
}

/// Scans for due reminders and pushes them through the messaging gateway.
pub struct ReminderDispatcher {
    store: Store,
    gateway: Arc<dyn MessagingGateway>,
    primary_tz: Tz,
}

impl ReminderDispatcher {
    pub fn new(store: Store, gateway: Arc<dyn MessagingGateway>, primary_tz: Tz) -> Self {
        Self {
            store,
            gateway,
            primary_tz,
        }
    }

    /// The current time rounded down to the 10-minute boundary, rendered in
    /// the primary timezone and in UTC. Only exact slot strings match, so a
    /// habit at "14:35" never fires.
    pub fn slot_candidates(&self, now: DateTime<Utc>) -> [String; 2] {
        let floored = now - chrono::Duration::minutes(i64::from(now.minute() % 10));
        let primary = floored.with_timezone(&self.primary_tz);
        [
            primary.format("%H:%M").to_string(),
            floored.format("%H:%M").to_string(),
        ]
    }

    /// Runs one scan cycle.
    pub async fn dispatch(&self, now: DateTime<Utc>) -> Result<ReminderReport> {
        let checked = self.slot_candidates(now);
        let candidates = self.store.habits_with_reminder_at(&checked).await?;
        let due: Vec<HabitRow> = candidates
            .into_iter()
            .filter(|h| self.is_scheduled_today(h, now))
            .collect();
        let found = due.len();

        let mut sent = 0;
        for habit in due {
            let reminder = ReminderMessage {
                habit_id: habit.id(),
                habit_title: habit.title.clone(),
            };
            match self.gateway.send_reminder(habit.owner(), &reminder).await {
                Ok(()) => sent += 1,
                Err(e) => {
                    // One broken recipient must not block the rest.
                    warn!(habit = %habit.id(), user = %habit.owner(), error = %e, "reminder delivery failed");
                }
            }
        }

        info!(slots = ?checked, found, sent, "reminder scan complete");
        Ok(ReminderReport { checked, found, sent })
    }

    /// Applies the optional day filters: a one-off `reminder_date` must be
    /// today, and `reminder_days` (CSV of weekday numbers, Monday = 1) must
    /// include today's weekday. Absent filters match every day.
    fn is_scheduled_today(&self, habit: &HabitRow, now: DateTime<Utc>) -> bool {
        let local_now = now.with_timezone(&self.primary_tz);
        let today = local_now.date_naive();

        if let Some(date) = habit.reminder_date {
            if date != today {
                return false;
            }
        }
        if let Some(days) = &habit.reminder_days {
            if !days.trim().is_empty() {
                let weekday = local_now.weekday().number_from_monday();
                let scheduled = days
                    .split(',')
                    .filter_map(|d| d.trim().parse::<u32>().ok())
                    .any(|d| d == weekday);
                if !scheduled {
                    return false;
                }
            }
        }
        true
    }
}
