//! Service error types using thiserror.

use habitgram_store::StoreError;
use habitgram_telegram::TelegramError;

/// Errors produced by the orchestration layer.
#[derive(thiserror::Error, Debug)]
pub enum ServiceError {
    /// A request missing or naming a nonexistent entity; rejected before
    /// any mutation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The habit exists but belongs to a different user.
    #[error("habit {habit_id} is not owned by user {user_id}")]
    NotOwner { habit_id: i64, user_id: i64 },

    /// Storage failure; no mutation is assumed to have applied.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// The completion row was persisted but the ledger update failed.
    /// Real inconsistency: logged distinctly and correctable by
    /// `recompute_user_totals` or a retry.
    #[error("ledger update failed after completion insert: {source}")]
    LedgerInconsistency {
        #[source]
        source: StoreError,
    },

    /// Messaging gateway failure.
    #[error("gateway error: {0}")]
    Gateway(#[from] TelegramError),
}
