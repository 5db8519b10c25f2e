//! Aggregate statistics: weekly counts, the year heatmap and the radar.

use crate::timeutil::{local_date, parse_tz};
use crate::Result;
use chrono::{Duration, NaiveDate, Utc};
use habitgram_core::{axis_for_category, current_streak, heatmap_level, StatAxis, UserId};
use habitgram_store::Store;
use serde::Serialize;
use std::collections::HashMap;

/// One day in the weekly view.
#[derive(Debug, Clone, Serialize)]
pub struct WeeklyCount {
    pub date: NaiveDate,
    pub count: u32,
}

/// One day in the 365-day heatmap.
#[derive(Debug, Clone, Serialize)]
pub struct HeatmapCell {
    pub date: NaiveDate,
    pub count: u32,
    pub level: u8,
}

/// The heatmap plus its global summary numbers.
#[derive(Debug, Clone, Serialize)]
pub struct HeatmapStats {
    pub cells: Vec<HeatmapCell>,
    pub total_completions: u64,
    pub current_streak: u32,
}

/// A score on one radar axis.
#[derive(Debug, Clone, Serialize)]
pub struct RadarScore {
    pub axis: StatAxis,
    pub score: u32,
}

/// Read-only aggregation over completion history. Everything here degrades
/// to zeros on empty data, never errors.
#[derive(Clone)]
pub struct StatsService {
    store: Store,
}

impl StatsService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    async fn today_for(&self, user_id: UserId) -> Result<NaiveDate> {
        let tz = match self.store.get_user(user_id).await? {
            Some(user) => parse_tz(&user.timezone),
            None => chrono_tz::Tz::UTC,
        };
        Ok(local_date(Utc::now(), &tz))
    }

    /// Completion counts for the last 7 days, zero-filled, oldest first.
    pub async fn weekly(&self, user_id: UserId) -> Result<Vec<WeeklyCount>> {
        let today = self.today_for(user_id).await?;
        let from = today - Duration::days(6);
        let counts = self.store.daily_counts(user_id, from, today).await?;
        let by_date: HashMap<NaiveDate, i64> =
            counts.into_iter().map(|c| (c.date, c.count)).collect();

        Ok((0..7)
            .map(|offset| {
                let date = from + Duration::days(offset);
                WeeklyCount {
                    date,
                    count: by_date.get(&date).copied().unwrap_or(0).max(0) as u32,
                }
            })
            .collect())
    }

    /// The last 365 days of per-day counts bucketed into levels 0-4, plus
    /// the global completion count and global streak.
    pub async fn heatmap(&self, user_id: UserId) -> Result<HeatmapStats> {
        let today = self.today_for(user_id).await?;
        let from = today - Duration::days(364);
        let counts = self.store.daily_counts(user_id, from, today).await?;
        let by_date: HashMap<NaiveDate, i64> =
            counts.into_iter().map(|c| (c.date, c.count)).collect();

        let cells = (0..365)
            .map(|offset| {
                let date = from + Duration::days(offset);
                let count = by_date.get(&date).copied().unwrap_or(0).max(0) as u32;
                HeatmapCell {
                    date,
                    count,
                    level: heatmap_level(count),
                }
            })
            .collect();

        let total_completions = self.store.count_completions_for_user(user_id).await?;
        let dates = self.store.completion_dates_for_user(user_id).await?;
        let current_streak = current_streak(&dates, today);

        Ok(HeatmapStats {
            cells,
            total_completions,
            current_streak,
        })
    }

    /// Completion counts folded onto the six fixed stat axes. Categories
    /// that map to no axis are left unscored; all six axes are always
    /// present in the output.
    pub async fn radar(&self, user_id: UserId) -> Result<Vec<RadarScore>> {
        let by_category = self.store.category_completion_counts(user_id).await?;

        let mut scores: HashMap<StatAxis, u32> = HashMap::new();
        for (category, count) in by_category {
            if let Some(axis) = axis_for_category(&category) {
                *scores.entry(axis).or_default() += count.max(0) as u32;
            }
        }

        Ok(StatAxis::ALL
            .iter()
            .map(|axis| RadarScore {
                axis: *axis,
                score: scores.get(axis).copied().unwrap_or(0),
            })
            .collect())
    }
}
