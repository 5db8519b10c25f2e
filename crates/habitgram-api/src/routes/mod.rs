//! Router assembly.

use crate::AppState;
use axum::routing::{get, patch, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

mod completions;
mod habits;
mod reminders;
mod stats;
mod users;
mod webhook;

/// Builds the full application router.
pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    let cors = if allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<axum::http::HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .route("/api/user/ensure", post(users::ensure_user))
        .route("/api/user/notifications", patch(users::set_notifications))
        .route("/api/habits", get(habits::list_habits).post(habits::create_habit))
        .route("/api/habits/:id", patch(habits::update_habit))
        .route("/api/habits/:id/archive", post(habits::archive_habit))
        .route("/api/completions/toggle", post(completions::toggle_completion))
        .route("/api/stats/weekly", get(stats::weekly))
        .route("/api/stats/heatmap", get(stats::heatmap))
        .route("/api/stats/radar", get(stats::radar))
        .route("/api/reminders/scan", post(reminders::scan))
        .route("/api/telegram/webhook", post(webhook::receive_update))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
        .with_state(state)
}
