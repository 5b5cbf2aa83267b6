pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::{
    AppConfig, CurrencySource, DEFAULT_AWESOMEAPI_URL, DEFAULT_BCB_URL, DEFAULT_HGBRASIL_URL,
    DEFAULT_IBGE_URL, DEFAULT_WORLDBANK_URL,
};
use crate::core::{Aggregator, AggregatorSettings, CurrencyQuoteProvider, Providers};
use crate::providers::{
    awesome_api::AwesomeApiProvider, bcb::BcbProvider, hg_brasil::HgBrasilProvider,
    ibge::IbgeProvider, world_bank::WorldBankProvider,
};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Snapshot { json: bool },
    Gdp,
}

/// Wires the configured providers into a fresh aggregator.
pub fn build_aggregator(config: &AppConfig) -> Result<Aggregator> {
    let client = providers::http::build_client()?;
    let urls = &config.providers;

    let hg_config = urls.hgbrasil.as_ref();
    let hgbrasil = Arc::new(HgBrasilProvider::new(
        hg_config.map_or(DEFAULT_HGBRASIL_URL, |p| &p.base_url),
        hg_config.and_then(|p| p.key.clone()),
        client.clone(),
    ));

    let currency: Arc<dyn CurrencyQuoteProvider> = match config.currency_source {
        CurrencySource::AwesomeApi => Arc::new(AwesomeApiProvider::new(
            urls.awesomeapi
                .as_ref()
                .map_or(DEFAULT_AWESOMEAPI_URL, |p| &p.base_url),
            client.clone(),
        )),
        CurrencySource::HgBrasil => Arc::clone(&hgbrasil) as Arc<dyn CurrencyQuoteProvider>,
    };
    debug!(source = ?config.currency_source, "Selected currency source");

    let providers = Providers {
        currency,
        equity_index: hgbrasil,
        central_bank: Arc::new(BcbProvider::new(
            urls.bcb.as_ref().map_or(DEFAULT_BCB_URL, |p| &p.base_url),
            client.clone(),
        )),
        inflation: Arc::new(IbgeProvider::new(
            urls.ibge.as_ref().map_or(DEFAULT_IBGE_URL, |p| &p.base_url),
            client.clone(),
        )),
        gdp_growth: Arc::new(WorldBankProvider::new(
            urls.worldbank
                .as_ref()
                .map_or(DEFAULT_WORLDBANK_URL, |p| &p.base_url),
            client,
        )),
    };

    Ok(Aggregator::new(
        providers,
        AggregatorSettings::from_config(config),
    ))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("ecopulse starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let aggregator = build_aggregator(&config)?;
    let labels: Vec<String> = config
        .gdp
        .countries
        .iter()
        .map(|c| c.label.clone())
        .collect();

    match command {
        AppCommand::Snapshot { json } => cli::snapshot::run(aggregator, &labels, json).await,
        AppCommand::Gdp => cli::gdp::run(aggregator, &labels).await,
    }
}
