//! Orchestration layer for the habitgram backend.
//!
//! Sits between the HTTP surface and the store: completion toggles with
//! their ledger and badge side effects, the time-driven reminder
//! dispatcher, list-view annotation and the three stats aggregations.

pub mod reminders;
pub mod stats;
pub mod toggle;
pub mod views;

mod error;
mod timeutil;

pub use error::ServiceError;
pub use reminders::{ReminderDispatcher, ReminderReport};
pub use stats::{HeatmapCell, HeatmapStats, RadarScore, StatsService, WeeklyCount};
pub use toggle::{ToggleOutcome, ToggleRequest, ToggleService};
pub use views::{AnnotatedHabit, ViewService};

/// Common result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
