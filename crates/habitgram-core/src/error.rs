//! Domain error type using thiserror.

/// Errors produced by the pure domain layer.
#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    /// A priority string that is not one of `high`, `medium`, `low`.
    #[error("invalid priority: {0}")]
    InvalidPriority(String),
}
