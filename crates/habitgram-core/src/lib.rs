//! Pure domain logic for the habitgram backend.
//!
//! Everything in this crate is side-effect free: streak counting, badge
//! evaluation, XP/coin ledger arithmetic and the category-to-stat-axis
//! mapping. Persistence and transport live in the sibling crates.

pub mod badges;
pub mod progression;
pub mod stats;
pub mod streak;
pub mod types;

mod error;

pub use badges::{evaluate_badge, Badge, BadgeContext};
pub use error::CoreError;
pub use progression::{level_for_xp, LedgerDelta, LedgerEvent, UserTotals};
pub use stats::{axis_for_category, heatmap_level, StatAxis};
pub use streak::current_streak;
pub use types::{CompletionId, HabitId, Priority, UserId};

/// Common result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
