pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::exchange::ExchangeRateService;
use crate::core::trip::StatusFilter;
use crate::providers::exchange_rate_api::ExchangeRateApiProvider;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Commands that need the loaded configuration and the rate service.
#[derive(Debug, Clone)]
pub enum AppCommand {
    Rates {
        refresh: bool,
    },
    Convert {
        amount: String,
        from: String,
        to: String,
    },
    Trips {
        status: StatusFilter,
    },
    Budget {
        trip: String,
        from: Option<String>,
    },
    Itinerary {
        trip: String,
    },
}

/// Wires the live provider and the configured cache into a rate service.
pub fn build_rate_service(config: &AppConfig) -> Result<ExchangeRateService> {
    let provider_config = &config.providers.exchange_rate;
    let provider =
        ExchangeRateApiProvider::new(&provider_config.base_url, provider_config.timeout())?;
    let cache = store::open_rate_cache(config);
    Ok(ExchangeRateService::new(Arc::new(provider), cache).with_ttl(config.cache.ttl()))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Trip ledger starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load_or_default()?,
    };
    debug!("Loaded config: {config:#?}");

    let rates = build_rate_service(&config)?;

    match command {
        AppCommand::Rates { refresh } => cli::rates::run(&rates, refresh).await,
        AppCommand::Convert { amount, from, to } => {
            cli::convert::run(&rates, &amount, &from, &to).await
        }
        AppCommand::Trips { status } => {
            let today = chrono::Local::now().date_naive();
            cli::trips::run(&config.trips, status, today, &rates, &config.currency).await
        }
        AppCommand::Budget { trip, from } => {
            let trip = config.find_trip(&trip)?;
            cli::budget::run(trip, &rates, from.as_deref()).await
        }
        AppCommand::Itinerary { trip } => {
            cli::itinerary::run(config.find_trip(&trip)?);
            Ok(())
        }
    }
}
