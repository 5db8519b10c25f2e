//! Storage error types using thiserror.

use chrono::NaiveDate;
use habitgram_core::HabitId;

/// Errors produced by the persistence layer.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// Underlying database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A completion already exists for this habit and date. Benign: callers
    /// treat it as the idempotent already-done outcome.
    #[error("completion already exists for habit {habit_id} on {date}")]
    DuplicateCompletion { habit_id: HabitId, date: NaiveDate },

    /// The referenced row does not exist.
    #[error("row not found")]
    NotFound,
}

impl StoreError {
    /// Wraps a sqlx error, converting a unique-constraint violation on the
    /// completions key into the benign duplicate variant.
    pub(crate) fn from_insert(err: sqlx::Error, habit_id: HabitId, date: NaiveDate) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StoreError::DuplicateCompletion { habit_id, date };
            }
        }
        StoreError::Database(err)
    }
}
