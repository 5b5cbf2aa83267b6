use super::http::get_json;
use crate::core::{CurrencyQuoteProvider, CurrencyQuotes, MarketQuote};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::instrument;

const PAIRS: &str = "USD-BRL,EUR-BRL,BTC-BRL";

/// Last quotes from AwesomeAPI, keyed by pair without the dash (`USDBRL`).
pub struct AwesomeApiProvider {
    base_url: String,
    client: reqwest::Client,
}

impl AwesomeApiProvider {
    pub fn new(base_url: &str, client: reqwest::Client) -> Self {
        AwesomeApiProvider {
            base_url: base_url.to_string(),
            client,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LastQuote {
    ask: Decimal,
    #[serde(rename = "pctChange")]
    pct_change: String,
}

impl LastQuote {
    fn to_market_quote(&self, pair: &str) -> Result<MarketQuote> {
        let variation = self
            .pct_change
            .trim()
            .parse::<f64>()
            .with_context(|| format!("Invalid pctChange '{}' for {pair}", self.pct_change))?;
        Ok(MarketQuote {
            price: self.ask,
            variation,
        })
    }
}

fn required<'a>(quotes: &'a HashMap<String, LastQuote>, pair: &str) -> Result<&'a LastQuote> {
    quotes
        .get(pair)
        .ok_or_else(|| anyhow!("No quote found for currency pair: {}", pair))
}

#[async_trait]
impl CurrencyQuoteProvider for AwesomeApiProvider {
    #[instrument(name = "AwesomeApiQuotes", skip(self))]
    async fn fetch_quotes(&self) -> Result<CurrencyQuotes> {
        let url = format!("{}/json/last/{}", self.base_url, PAIRS);
        let quotes: HashMap<String, LastQuote> =
            get_json(&self.client, &url, "currency pairs").await?;

        Ok(CurrencyQuotes {
            dollar: required(&quotes, "USDBRL")?.to_market_quote("USDBRL")?,
            euro: required(&quotes, "EURBRL")?.to_market_quote("EURBRL")?,
            bitcoin: quotes.get("BTCBRL").map(|q| q.ask),
        })
    }
}
