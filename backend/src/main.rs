//! Main entry point for the events backend.
//!
//! Loads the configuration, opens the database, applies the schema and runs
//! the periodic cost recomputation until Ctrl-C.

use anyhow::Result;
use events_backend::EventServices;
use events_backend::config::Config;
use events_backend::database::Database;
use events_backend::repositories::event_repository::EventRepository;
use events_backend::repositories::logistics_repository::LogisticsRepository;
use events_backend::repositories::participant_repository::ParticipantRepository;
use events_backend::services::cost_schedule::run_cost_schedule;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    let db = Database::new(&config).await?;
    db.migrate().await?;

    let pool = db.pool();
    let services = EventServices::new(
        EventRepository::new(pool),
        ParticipantRepository::new(pool),
        LogisticsRepository::new(pool),
    )
    .with_cost_filter(config.cost_filter.clone());

    info!(
        "Starting events backend, recomputing costs for {} {} ({})",
        config.cost_filter.first_name, config.cost_filter.name, config.cost_filter.role
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
        }
    };
    run_cost_schedule(&services, config.cost_schedule_period(), shutdown).await;

    db.close().await;
    Ok(())
}
