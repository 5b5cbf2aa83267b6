//! Merges every provider's result into one [`MarketSnapshot`].
//!
//! All provider calls run concurrently and are settled independently: a
//! failure is logged and leaves the fields it owns at their fallback value.
//! Nothing is retried, cached or cancelled.

use crate::core::config::{
    AppConfig, DEFAULT_POLICY_RATE_SERIES, DEFAULT_RESERVES_SERIES, GdpConfig,
};
use crate::core::format::round_to;
use crate::core::provider::{
    CentralBankSeriesProvider, CurrencyQuoteProvider, CurrencyQuotes, EquityIndexProvider,
    GdpGrowthProvider, InflationProvider,
};
use crate::core::snapshot::{BITCOIN_KUSD, MarketSnapshot, group_growth_by_year};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// Progress of a load as seen by the rendering layer.
#[derive(Debug, Clone)]
pub enum LoadState {
    Loading,
    Ready(Arc<MarketSnapshot>),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn snapshot(&self) -> Option<&Arc<MarketSnapshot>> {
        match self {
            LoadState::Loading => None,
            LoadState::Ready(snapshot) => Some(snapshot),
        }
    }
}

/// One provider per data concern.
pub struct Providers {
    pub currency: Arc<dyn CurrencyQuoteProvider>,
    pub equity_index: Arc<dyn EquityIndexProvider>,
    pub central_bank: Arc<dyn CentralBankSeriesProvider>,
    pub inflation: Arc<dyn InflationProvider>,
    pub gdp_growth: Arc<dyn GdpGrowthProvider>,
}

#[derive(Debug, Clone)]
pub struct AggregatorSettings {
    pub policy_rate_series: u32,
    pub reserves_series: u32,
    pub gdp: GdpConfig,
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        AggregatorSettings {
            policy_rate_series: DEFAULT_POLICY_RATE_SERIES,
            reserves_series: DEFAULT_RESERVES_SERIES,
            gdp: GdpConfig::default(),
        }
    }
}

impl AggregatorSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        let bcb = config.providers.bcb.as_ref();
        AggregatorSettings {
            policy_rate_series: bcb
                .map_or(DEFAULT_POLICY_RATE_SERIES, |b| b.policy_rate_series),
            reserves_series: bcb.map_or(DEFAULT_RESERVES_SERIES, |b| b.reserves_series),
            gdp: config.gdp.clone(),
        }
    }
}

pub struct Aggregator {
    providers: Providers,
    settings: AggregatorSettings,
    state: watch::Sender<LoadState>,
}

impl Aggregator {
    pub fn new(providers: Providers, settings: AggregatorSettings) -> Self {
        let (state, _) = watch::channel(LoadState::Loading);
        Aggregator {
            providers,
            settings,
            state,
        }
    }

    /// Receiver that observes `Loading` until [`Aggregator::load`] publishes
    /// the snapshot. The channel closes once the load returns.
    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.state.subscribe()
    }

    /// Runs every provider, merges the successes over the fallback values and
    /// publishes the result. Never fails.
    #[instrument(name = "LoadSnapshot", skip_all)]
    pub async fn load(self) -> MarketSnapshot {
        let gdp = &self.settings.gdp;
        let countries = gdp.labels_by_code();
        let mut snapshot = MarketSnapshot::fallback_for(&countries);
        let country_codes: Vec<String> = gdp.countries.iter().map(|c| c.code.clone()).collect();

        let (currency, index, policy_rate, reserves, inflation, growth) = futures::join!(
            self.providers.currency.fetch_quotes(),
            self.providers.equity_index.fetch_index(),
            self.providers
                .central_bank
                .latest(self.settings.policy_rate_series),
            self.providers
                .central_bank
                .latest(self.settings.reserves_series),
            self.providers.inflation.fetch_inflation(),
            self.providers
                .gdp_growth
                .fetch_growth(&country_codes, gdp.from_year, gdp.to_year),
        );

        let currency = settle("currency", currency);
        if let Some(quotes) = &currency {
            snapshot.apply_currency(quotes);
        }
        if let Some(quote) = settle("equity index", index) {
            snapshot.apply_index(&quote);
        }
        if let Some(observation) = settle("policy rate", policy_rate) {
            debug!(date = %observation.date, "Policy rate observation");
            snapshot.apply_policy_rate(&observation);
        }
        if let Some(observation) = settle("reserves", reserves) {
            debug!(date = %observation.date, "Reserves observation");
            snapshot.apply_reserves(&observation);
        }
        if let Some(value) = settle("inflation", inflation) {
            snapshot.apply_inflation(value);
        }
        match settle("gdp growth", growth) {
            Some(observations) if observations.is_empty() => {
                warn!(
                    provider = "gdp growth",
                    "Provider returned no records, keeping fallback"
                );
            }
            Some(observations) => {
                snapshot.apply_gdp_growth(group_growth_by_year(&observations, &countries));
            }
            None => {}
        }

        // Derived from the currency result of this load, never from fallbacks.
        match currency.as_ref().and_then(bitcoin_in_kusd) {
            Some(value) => {
                snapshot.set_commodity(BITCOIN_KUSD, value);
            }
            None => debug!("Keeping fallback for {}", BITCOIN_KUSD),
        }

        self.state
            .send_replace(LoadState::Ready(Arc::new(snapshot.clone())));
        info!("Snapshot ready");
        snapshot
    }
}

/// BTC price in thousands of dollars, from BRL-denominated BTC and USD quotes.
pub fn bitcoin_in_kusd(quotes: &CurrencyQuotes) -> Option<Decimal> {
    let bitcoin = quotes.bitcoin?;
    let in_dollars = bitcoin.checked_div(quotes.dollar.price)?;
    Some(round_to(in_dollars / Decimal::from(1000), 1))
}

fn settle<T>(provider: &str, result: anyhow::Result<T>) -> Option<T> {
    match result {
        Ok(value) => {
            debug!(provider, "Provider succeeded");
            Some(value)
        }
        Err(e) => {
            warn!(provider, error = %format!("{e:#}"), "Provider failed, keeping fallback");
            None
        }
    }
}
