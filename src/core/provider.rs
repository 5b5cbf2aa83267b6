//! Provider abstractions for the external data sources.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// A price or level together with its percent change.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketQuote {
    pub price: Decimal,
    pub variation: f64,
}

/// Quotes against the real.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyQuotes {
    pub dollar: MarketQuote,
    pub euro: MarketQuote,
    /// BTC price in BRL, when the provider reports it.
    pub bitcoin: Option<Decimal>,
}

/// Latest data point of a central-bank time series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesObservation {
    pub date: NaiveDate,
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GdpObservation {
    pub country_code: String,
    pub year: String,
    pub value: Option<f64>,
}

#[async_trait]
pub trait CurrencyQuoteProvider: Send + Sync {
    async fn fetch_quotes(&self) -> Result<CurrencyQuotes>;
}

#[async_trait]
pub trait EquityIndexProvider: Send + Sync {
    async fn fetch_index(&self) -> Result<MarketQuote>;
}

#[async_trait]
pub trait CentralBankSeriesProvider: Send + Sync {
    async fn latest(&self, series: u32) -> Result<SeriesObservation>;
}

#[async_trait]
pub trait InflationProvider: Send + Sync {
    /// Twelve-month accumulated inflation, in percent.
    async fn fetch_inflation(&self) -> Result<Decimal>;
}

#[async_trait]
pub trait GdpGrowthProvider: Send + Sync {
    /// Annual GDP growth for `country_codes` between `from_year` and
    /// `to_year`, both inclusive.
    async fn fetch_growth(
        &self,
        country_codes: &[String],
        from_year: i32,
        to_year: i32,
    ) -> Result<Vec<GdpObservation>>;
}
