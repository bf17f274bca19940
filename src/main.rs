//! # MemoryPing Bot Main Entry Point
//!
//! Initializes logging, loads configuration, opens the data store, starts
//! the reminder service and health server, and runs the Telegram bot.

use anyhow::Result;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use memoryping_bot::bot::handlers::{BotHandler, BotState};
use memoryping_bot::config::Config;
use memoryping_bot::services::health::HealthService;
use memoryping_bot::services::reminder::ReminderService;
use memoryping_bot::storage::DataStore;
use memoryping_bot::utils::logging::log_system_event;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memoryping_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    info!("Starting MemoryPing Bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded - Data dir: {}, HTTP Port: {}, Default timezone: {}",
        config.data_dir.display(),
        config.http_port,
        config.default_timezone.name()
    );

    info!("Opening data store...");
    let store = DataStore::open(&config.data_dir)?;
    info!("Data store ready at {}", store.data_dir().display());

    info!("Initializing Telegram bot...");
    let bot = Bot::new(&config.telegram_bot_token);
    let handler = BotHandler::new(BotState::new(store.clone(), config.default_timezone));
    info!("Telegram bot initialized successfully");

    info!("Initializing reminder service...");
    let mut reminder_service = match ReminderService::new(
        bot.clone(),
        store.clone(),
        config.default_timezone,
        config.reminder_check_interval,
    )
    .await
    {
        Ok(service) => {
            info!("Reminder service initialized successfully");
            service
        }
        Err(e) => {
            tracing::error!("Failed to create reminder service: {}", e);
            return Err(anyhow::anyhow!("Failed to create reminder service: {}", e));
        }
    };

    if let Err(e) = reminder_service.start().await {
        tracing::error!("Failed to start reminder service: {}", e);
    } else {
        info!("Reminder service started successfully");
    }

    // Catch up on anything that fell due while the bot was down
    let caught_up = reminder_service.check_reminders_now().await;
    if caught_up > 0 {
        info!("Delivered {} reminders that were due during downtime", caught_up);
    }

    let health_service = HealthService::new(store);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.http_port, e))?;

    info!("Health check server starting on port {}", config.http_port);
    log_system_event("startup", Some("bot, scheduler and health server running"));

    let bot_task = tokio::spawn(async move {
        Dispatcher::builder(bot, handler.schema())
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    });

    let health_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, health_service.router).await {
            tracing::error!("Health server error: {}", e);
        }
    });

    // Either task finishing means shutdown
    tokio::select! {
        result = bot_task => {
            if let Err(e) = result {
                tracing::error!("Bot task error: {}", e);
            }
        }
        result = health_task => {
            if let Err(e) = result {
                tracing::error!("Health task error: {}", e);
            }
        }
    }

    if let Err(e) = reminder_service.stop().await {
        tracing::warn!("Error stopping reminder service: {}", e);
    }

    log_system_event("shutdown", None);
    info!("Application stopped");
    Ok(())
}
