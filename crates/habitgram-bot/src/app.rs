//! Application wiring: store, services, HTTP server and the reminder cron.

use anyhow::{Context, Result};
use chrono::Utc;
use chrono_tz::Tz;
use habitgram_api::{build_router, AppState};
use habitgram_config::Config;
use habitgram_service::{ReminderDispatcher, StatsService, ToggleService, ViewService};
use habitgram_store::Store;
use habitgram_telegram::TelegramClient;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

pub async fn run(config: Config) -> Result<()> {
    let store = Store::connect(&config.database.path, config.database.max_connections)
        .await
        .context("failed to open database")?;

    let gateway = Arc::new(
        TelegramClient::new(
            config.telegram.api_base.clone(),
            config.telegram.token.clone(),
            config.telegram.request_timeout_seconds,
        )
        .context("failed to build telegram client")?,
    );

    let primary_tz: Tz = config
        .reminders
        .timezone
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid reminder timezone: {e}"))?;

    let dispatcher = Arc::new(ReminderDispatcher::new(
        store.clone(),
        gateway.clone(),
        primary_tz,
    ));

    let state = AppState {
        store: store.clone(),
        toggle: ToggleService::new(store.clone()),
        views: ViewService::new(store.clone(), config.reminders.default_user_timezone.clone()),
        stats: StatsService::new(store.clone()),
        dispatcher: dispatcher.clone(),
        gateway,
        cron_secret: config.server.cron_secret.clone(),
    };

    let scheduler = if config.reminders.enabled {
        Some(start_reminder_cron(&config.reminders.cron, dispatcher).await?)
    } else {
        info!("in-process reminder scheduler disabled");
        None
    };

    let router = build_router(state, &config.server.allowed_origins);
    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_addr))?;
    info!(addr = %config.server.bind_addr, "listening");

    axum::serve(listener, router)
        .await
        .context("http server failed")?;

    if let Some(mut scheduler) = scheduler {
        scheduler.shutdown().await.ok();
    }
    Ok(())
}

async fn start_reminder_cron(
    cron: &str,
    dispatcher: Arc<ReminderDispatcher>,
) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new()
        .await
        .context("failed to create job scheduler")?;

    let job = Job::new_async(cron, move |_id, _lock| {
        let dispatcher = dispatcher.clone();
        Box::pin(async move {
            if let Err(e) = dispatcher.dispatch(Utc::now()).await {
                error!(error = %e, "reminder scan failed");
            }
        })
    })
    .with_context(|| format!("invalid reminder cron expression: {cron}"))?;

    scheduler.add(job).await.context("failed to add reminder job")?;
    scheduler.start().await.context("failed to start scheduler")?;
    info!(cron, "reminder scheduler started");
    Ok(scheduler)
}
