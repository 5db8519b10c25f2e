//! XP, level and coin bookkeeping for completion events.

use serde::{Deserialize, Serialize};

/// XP granted per completion.
pub const XP_PER_COMPLETION: u32 = 10;

/// XP required per level; level is `xp / 100 + 1`.
pub const XP_PER_LEVEL: u32 = 100;

/// Default coin reward when a habit has none configured.
pub const DEFAULT_COINS_REWARD: u32 = 10;

/// Derives the level from an XP total.
pub fn level_for_xp(xp: u32) -> u32 {
    xp / XP_PER_LEVEL + 1
}

/// A user's gamification totals as read from storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTotals {
    pub xp: u32,
    pub level: u32,
    pub total_coins: u32,
}

impl UserTotals {
    /// Applies a ledger event, clamping xp and coins at zero. Level is
    /// always recomputed from the resulting xp, never trusted from input.
    pub fn apply(&self, event: LedgerEvent) -> UserTotals {
        let (xp, total_coins) = match event {
            LedgerEvent::Added { reward } => (
                self.xp + XP_PER_COMPLETION,
                self.total_coins + reward,
            ),
            LedgerEvent::Removed { reward } => (
                self.xp.saturating_sub(XP_PER_COMPLETION),
                self.total_coins.saturating_sub(reward),
            ),
        };
        UserTotals {
            xp,
            level: level_for_xp(xp),
            total_coins,
        }
    }
}

/// A completion was added to or removed from the ledger.
///
/// The two variants are exact mirrors so a toggle round-trip restores the
/// original totals, modulo the zero clamp on removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerEvent {
    Added { reward: u32 },
    Removed { reward: u32 },
}

impl LedgerEvent {
    /// Signed xp/coin deltas for storage layers that apply the event with
    /// atomic increments instead of read-modify-write.
    pub fn delta(&self) -> LedgerDelta {
        match *self {
            LedgerEvent::Added { reward } => LedgerDelta {
                xp: i64::from(XP_PER_COMPLETION),
                coins: i64::from(reward),
            },
            LedgerEvent::Removed { reward } => LedgerDelta {
                xp: -i64::from(XP_PER_COMPLETION),
                coins: -i64::from(reward),
            },
        }
    }
}

/// Signed deltas for one ledger event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerDelta {
    pub xp: i64,
    pub coins: i64,
}
