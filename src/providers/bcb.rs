use super::http::get_json;
use crate::core::{CentralBankSeriesProvider, SeriesObservation};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

/// Banco Central do Brasil time series (SGS).
pub struct BcbProvider {
    base_url: String,
    client: reqwest::Client,
}

impl BcbProvider {
    pub fn new(base_url: &str, client: reqwest::Client) -> Self {
        BcbProvider {
            base_url: base_url.to_string(),
            client,
        }
    }

    fn parse_api_date(date_str: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(date_str, "%d/%m/%Y")
            .with_context(|| format!("Failed to parse date: {date_str}"))
    }
}

#[derive(Debug, Deserialize)]
struct SgsPoint {
    data: String,
    valor: Decimal,
}

#[async_trait]
impl CentralBankSeriesProvider for BcbProvider {
    #[instrument(name = "BcbSeriesFetch", skip(self))]
    async fn latest(&self, series: u32) -> Result<SeriesObservation> {
        let url = format!(
            "{}/dados/serie/bcdata.sgs.{}/dados/ultimos/1?formato=json",
            self.base_url, series
        );
        let what = format!("SGS series {series}");
        let points: Vec<SgsPoint> = get_json(&self.client, &url, &what).await?;

        let point = points
            .last()
            .ok_or_else(|| anyhow!("No observations found for {}", what))?;

        Ok(SeriesObservation {
            date: Self::parse_api_date(&point.data)?,
            value: point.valor,
        })
    }
}
