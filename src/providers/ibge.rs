use super::http::get_json;
use crate::core::InflationProvider;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::{debug, instrument};

/// IPCA accumulated over twelve months: aggregate 1737, variable 2265.
const IPCA_PATH: &str = "/api/v3/agregados/1737/periodos/-1/variaveis/2265?localidades=N1[all]";

/// IBGE aggregates API.
pub struct IbgeProvider {
    base_url: String,
    client: reqwest::Client,
}

impl IbgeProvider {
    pub fn new(base_url: &str, client: reqwest::Client) -> Self {
        IbgeProvider {
            base_url: base_url.to_string(),
            client,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Variable {
    resultados: Vec<VariableResult>,
}

#[derive(Debug, Deserialize)]
struct VariableResult {
    series: Vec<LocalitySeries>,
}

#[derive(Debug, Deserialize)]
struct LocalitySeries {
    /// Values keyed by period (`YYYYMM`). Unavailable values come as `"..."` or `"-"`.
    serie: BTreeMap<String, String>,
}

#[async_trait]
impl InflationProvider for IbgeProvider {
    #[instrument(name = "IbgeInflationFetch", skip(self))]
    async fn fetch_inflation(&self) -> Result<Decimal> {
        let url = format!("{}{}", self.base_url, IPCA_PATH);
        let variables: Vec<Variable> = get_json(&self.client, &url, "IPCA aggregate").await?;

        let series = variables
            .first()
            .and_then(|v| v.resultados.first())
            .and_then(|r| r.series.first())
            .ok_or_else(|| anyhow!("No IPCA series found in IBGE response"))?;

        let (period, value) = series
            .serie
            .iter()
            .next_back()
            .ok_or_else(|| anyhow!("IPCA series has no periods"))?;
        debug!(period = %period, value = %value, "Latest IPCA period");

        Decimal::from_str(value.trim())
            .with_context(|| format!("Invalid IPCA value '{value}' for period {period}"))
    }
}
