//! Central module for application-wide configuration settings.
//!
//! This module handles loading the database settings and the parameters of
//! the periodic cost recomputation from the environment.

use crate::database::models::Role;
use crate::services::event_services::CostFilter;
use anyhow::{Context, Result, anyhow};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub cost_schedule_seconds: u64,
    pub cost_filter: CostFilter,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL not set")?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .context("DB_MAX_CONNECTIONS must be a valid number")?;

        let acquire_timeout_seconds = env::var("DB_ACQUIRE_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "3".to_string())
            .parse::<u64>()
            .context("DB_ACQUIRE_TIMEOUT_SECONDS must be a valid number")?;

        let cost_schedule_seconds = env::var("COST_SCHEDULE_SECONDS")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<u64>()
            .context("COST_SCHEDULE_SECONDS must be a valid number")?;
        if cost_schedule_seconds == 0 {
            return Err(anyhow!("COST_SCHEDULE_SECONDS must be greater than zero"));
        }

        let defaults = CostFilter::default();
        let name = env::var("COST_ORGANIZER_NAME").unwrap_or(defaults.name);
        let first_name = env::var("COST_ORGANIZER_FIRST_NAME").unwrap_or(defaults.first_name);
        let role = match env::var("COST_ORGANIZER_ROLE") {
            Ok(raw) => raw
                .parse::<Role>()
                .map_err(|e| anyhow!(e))
                .context("COST_ORGANIZER_ROLE must be ORGANISATEUR, INTERVENANT or VISITEUR")?,
            Err(_) => defaults.role,
        };

        Ok(Config {
            database_url,
            max_connections,
            acquire_timeout_seconds,
            cost_schedule_seconds,
            cost_filter: CostFilter {
                name,
                first_name,
                role,
            },
        })
    }

    pub fn cost_schedule_period(&self) -> Duration {
        Duration::from_secs(self.cost_schedule_seconds)
    }
}
