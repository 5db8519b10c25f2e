//! Consecutive-day streak counting.

use chrono::{Duration, NaiveDate};
use std::collections::BTreeSet;

/// Counts the consecutive-day run of completions ending at `today` or
/// `yesterday`.
///
/// `today` is injected by the caller, evaluated in the owning user's
/// timezone, so the function stays pure. Duplicate dates are collapsed.
///
/// A streak survives `today` not being completed yet (one-day grace), but a
/// missing yesterday breaks it regardless of how much history exists before
/// the gap.
pub fn current_streak(dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let distinct: BTreeSet<NaiveDate> = dates.iter().copied().collect();
    if distinct.is_empty() {
        return 0;
    }

    let yesterday = today - Duration::days(1);
    let mut cursor = if distinct.contains(&today) {
        today
    } else if distinct.contains(&yesterday) {
        yesterday
    } else {
        return 0;
    };

    let mut streak = 0;
    while distinct.contains(&cursor) {
        streak += 1;
        cursor = cursor - Duration::days(1);
    }
    streak
}
