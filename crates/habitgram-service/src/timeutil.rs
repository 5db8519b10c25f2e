//! Timezone helpers.
//!
//! One policy, applied uniformly: each user carries an IANA timezone and
//! every day-boundary decision (streaks, early-bird hour, "today" for the
//! callback toggle) is evaluated in that zone.

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use tracing::warn;

/// Parses an IANA timezone name, degrading to UTC on unknown input so a
/// corrupt stored value never breaks reads.
pub(crate) fn parse_tz(name: &str) -> Tz {
    name.parse().unwrap_or_else(|_| {
        warn!(timezone = name, "unknown timezone, falling back to UTC");
        Tz::UTC
    })
}

/// The calendar date of `instant` in `tz`.
pub(crate) fn local_date(instant: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// The wall-clock hour of `instant` in `tz`.
pub(crate) fn local_hour(instant: DateTime<Utc>, tz: &Tz) -> u32 {
    instant.with_timezone(tz).hour()
}
