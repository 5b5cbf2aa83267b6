use super::http::get_json;
use crate::core::{CurrencyQuoteProvider, CurrencyQuotes, EquityIndexProvider, MarketQuote};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{debug, instrument};

/// HG Brasil finance endpoint: currencies against the real plus the Ibovespa
/// level in one body.
///
/// Serving as both currency and index source still costs one request: the
/// first caller fetches `/finance` and later callers reuse that outcome,
/// failure included. Build a new provider for every load.
pub struct HgBrasilProvider {
    base_url: String,
    key: Option<String>,
    client: reqwest::Client,
    finance: OnceCell<Result<FinanceResults, String>>,
}

impl HgBrasilProvider {
    pub fn new(base_url: &str, key: Option<String>, client: reqwest::Client) -> Self {
        HgBrasilProvider {
            base_url: base_url.to_string(),
            key,
            client,
            finance: OnceCell::new(),
        }
    }

    async fn finance(&self) -> Result<&FinanceResults> {
        self.finance
            .get_or_init(|| async { self.fetch_finance().await.map_err(|e| format!("{e:#}")) })
            .await
            .as_ref()
            .map_err(|e| anyhow!("{e}"))
    }

    async fn fetch_finance(&self) -> Result<FinanceResults> {
        let mut url = format!("{}/finance?format=json-cors", self.base_url);
        if let Some(key) = &self.key {
            url.push_str("&key=");
            url.push_str(key);
        }
        let response: FinanceResponse = get_json(&self.client, &url, "HG Brasil finance").await?;
        let results = response.results;
        if results.error {
            return Err(anyhow!(
                "HG Brasil finance error: {}",
                results.message.as_deref().unwrap_or("no message")
            ));
        }
        debug!(
            currencies = results.currencies.is_some(),
            stocks = results.stocks.is_some(),
            "HG Brasil finance sections"
        );
        Ok(results)
    }
}

#[derive(Debug, Deserialize)]
struct FinanceResponse {
    results: FinanceResults,
}

/// Sections stay raw until a caller needs them, so a broken `stocks` block
/// does not cost the currency quotes and vice versa.
#[derive(Debug, Deserialize)]
struct FinanceResults {
    #[serde(default)]
    error: bool,
    message: Option<String>,
    currencies: Option<Value>,
    stocks: Option<Value>,
}

fn section<T: DeserializeOwned>(value: Option<&Value>, name: &str) -> Result<T> {
    let value = value.ok_or_else(|| anyhow!("No {name} in HG Brasil finance response"))?;
    T::deserialize(value).with_context(|| format!("Malformed {name} in HG Brasil finance response"))
}

#[derive(Debug, Deserialize)]
struct Currencies {
    #[serde(rename = "USD")]
    usd: PricedItem,
    #[serde(rename = "EUR")]
    eur: PricedItem,
    #[serde(rename = "BTC")]
    btc: Option<PricedItem>,
}

#[derive(Debug, Deserialize)]
struct PricedItem {
    buy: Decimal,
    variation: f64,
}

#[derive(Debug, Deserialize)]
struct Stocks {
    #[serde(rename = "IBOVESPA")]
    ibovespa: StockIndex,
}

#[derive(Debug, Deserialize)]
struct StockIndex {
    points: Decimal,
    variation: f64,
}

impl From<&PricedItem> for MarketQuote {
    fn from(item: &PricedItem) -> Self {
        MarketQuote {
            price: item.buy,
            variation: item.variation,
        }
    }
}

#[async_trait]
impl CurrencyQuoteProvider for HgBrasilProvider {
    #[instrument(name = "HgBrasilQuotes", skip(self))]
    async fn fetch_quotes(&self) -> Result<CurrencyQuotes> {
        let results = self.finance().await?;
        let currencies: Currencies = section(results.currencies.as_ref(), "currencies")?;
        Ok(CurrencyQuotes {
            dollar: (&currencies.usd).into(),
            euro: (&currencies.eur).into(),
            bitcoin: currencies.btc.as_ref().map(|btc| btc.buy),
        })
    }
}

#[async_trait]
impl EquityIndexProvider for HgBrasilProvider {
    #[instrument(name = "HgBrasilIndex", skip(self))]
    async fn fetch_index(&self) -> Result<MarketQuote> {
        let results = self.finance().await?;
        let stocks: Stocks = section(results.stocks.as_ref(), "stocks")?;
        Ok(MarketQuote {
            price: stocks.ibovespa.points,
            variation: stocks.ibovespa.variation,
        })
    }
}
