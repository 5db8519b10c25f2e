//! HTTP surface for the habitgram backend.
//!
//! Stateless JSON handlers over the service layer. Every response carries a
//! definite `success` boolean; internal storage errors are never detailed
//! to the caller beyond that.

mod auth;
mod error;
mod routes;
mod state;

pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
