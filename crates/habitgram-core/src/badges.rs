//! Achievement badge evaluation.
//!
//! Badges are recomputed from raw stats on every newly added completion;
//! there is no persisted unlocked-badges table. The evaluator returns at
//! most one badge per event so clients only ever show a single unlock modal.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Hour of day (local to the user) before which a completion counts as an
/// early-bird completion.
pub const EARLY_BIRD_HOUR: u32 = 8;

/// Global streak length at which the week-streak badge fires.
pub const WEEK_STREAK_DAYS: u32 = 7;

/// Level threshold for the level badge.
pub const LEVEL_BADGE_THRESHOLD: u32 = 5;

/// An achievement badge identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    EarlyBird,
    FirstStep,
    WeekStreak,
    Level5,
}

impl Badge {
    /// Stable wire identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Badge::EarlyBird => "early_bird",
            Badge::FirstStep => "first_step",
            Badge::WeekStreak => "week_streak",
            Badge::Level5 => "level_5",
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the evaluator needs about the completion event, gathered by
/// the caller after the completion row is persisted and the ledger updated.
#[derive(Debug, Clone, Copy)]
pub struct BadgeContext {
    /// Wall-clock hour of `completed_at` in the user's timezone.
    pub local_hour: u32,
    /// The user's global completion count across all habits, including the
    /// completion that triggered this evaluation.
    pub total_completions: u64,
    /// The user's global streak after this completion.
    pub global_streak: u32,
    /// Level before the ledger update for this completion.
    pub level_before: u32,
    /// Level after the ledger update for this completion.
    pub level_after: u32,
}

/// Evaluates the badge (if any) unlocked by a newly added completion.
///
/// Priority when several conditions hold at once: `level_5` >
/// `week_streak` > `first_step` > `early_bird`. Removal events never reach
/// this function.
pub fn evaluate_badge(ctx: &BadgeContext) -> Option<Badge> {
    if ctx.level_before < LEVEL_BADGE_THRESHOLD && ctx.level_after >= LEVEL_BADGE_THRESHOLD {
        return Some(Badge::Level5);
    }
    if ctx.global_streak == WEEK_STREAK_DAYS {
        return Some(Badge::WeekStreak);
    }
    if ctx.total_completions == 1 {
        return Some(Badge::FirstStep);
    }
    if ctx.local_hour < EARLY_BIRD_HOUR {
        return Some(Badge::EarlyBird);
    }
    None
}
