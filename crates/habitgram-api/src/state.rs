//! Shared application state for the HTTP surface.

use habitgram_service::{ReminderDispatcher, StatsService, ToggleService, ViewService};
use habitgram_store::Store;
use habitgram_telegram::MessagingGateway;
use std::sync::Arc;

/// Everything the handlers need, cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub toggle: ToggleService,
    pub views: ViewService,
    pub stats: StatsService,
    pub dispatcher: Arc<ReminderDispatcher>,
    pub gateway: Arc<dyn MessagingGateway>,
    /// Bearer token expected on the reminder-scan endpoint.
    pub cron_secret: String,
}
