use super::http::get_json;
use crate::core::{GdpGrowthProvider, GdpObservation};
use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

/// Real GDP growth, annual %.
const GDP_GROWTH_INDICATOR: &str = "NY.GDP.MKTP.KD.ZG";

/// World Bank indicators API (v2).
pub struct WorldBankProvider {
    base_url: String,
    client: reqwest::Client,
}

impl WorldBankProvider {
    pub fn new(base_url: &str, client: reqwest::Client) -> Self {
        WorldBankProvider {
            base_url: base_url.to_string(),
            client,
        }
    }
}

#[derive(Debug, Deserialize)]
struct IndicatorRecord {
    countryiso3code: String,
    date: String,
    value: Option<f64>,
}

/// The API answers `[paging, records]`, or `[{"message": [...]}]` on error.
fn parse_records(body: Vec<Value>) -> Result<Vec<IndicatorRecord>> {
    let mut parts = body.into_iter();
    let header = parts.next().ok_or_else(|| anyhow!("Empty World Bank response"))?;

    if let Some(message) = header.get("message") {
        bail!("World Bank API error: {}", message);
    }

    match parts.next() {
        Some(Value::Null) | None => Ok(Vec::new()),
        Some(records) => serde_json::from_value(records)
            .map_err(|e| anyhow!("Failed to parse World Bank records: {}", e)),
    }
}

#[async_trait]
impl GdpGrowthProvider for WorldBankProvider {
    #[instrument(name = "WorldBankGdpFetch", skip(self))]
    async fn fetch_growth(
        &self,
        country_codes: &[String],
        from_year: i32,
        to_year: i32,
    ) -> Result<Vec<GdpObservation>> {
        if country_codes.is_empty() {
            bail!("No countries configured for GDP growth");
        }

        let url = format!(
            "{}/v2/country/{}/indicator/{}?format=json&date={}:{}&per_page=100",
            self.base_url,
            country_codes.join(";"),
            GDP_GROWTH_INDICATOR,
            from_year,
            to_year
        );
        let body: Vec<Value> = get_json(&self.client, &url, "GDP growth").await?;
        let records = parse_records(body)?;
        debug!(count = records.len(), "Received GDP growth records");

        Ok(records
            .into_iter()
            .map(|r| GdpObservation {
                country_code: r.countryiso3code,
                year: r.date,
                value: r.value,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::http::build_client;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GROWTH_JSON: &str = r#"[
        {"page": 1, "pages": 1, "per_page": 100, "total": 4, "sourceid": "2", "lastupdated": "2026-07-01"},
        [
            {"indicator": {"id": "NY.GDP.MKTP.KD.ZG", "value": "GDP growth (annual %)"}, "country": {"id": "BR", "value": "Brazil"}, "countryiso3code": "BRA", "date": "2024", "value": 3.4, "unit": "", "obs_status": "", "decimal": 1},
            {"indicator": {"id": "NY.GDP.MKTP.KD.ZG", "value": "GDP growth (annual %)"}, "country": {"id": "BR", "value": "Brazil"}, "countryiso3code": "BRA", "date": "2023", "value": 3.2, "unit": "", "obs_status": "", "decimal": 1},
            {"indicator": {"id": "NY.GDP.MKTP.KD.ZG", "value": "GDP growth (annual %)"}, "country": {"id": "US", "value": "United States"}, "countryiso3code": "USA", "date": "2024", "value": 2.8, "unit": "", "obs_status": "", "decimal": 1},
            {"indicator": {"id": "NY.GDP.MKTP.KD.ZG", "value": "GDP growth (annual %)"}, "country": {"id": "US", "value": "United States"}, "countryiso3code": "USA", "date": "2023", "value": null, "unit": "", "obs_status": "", "decimal": 1}
        ]
    ]"#;

    async fn create_mock_server(status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/country/USA;BRA/indicator/NY.GDP.MKTP.KD.ZG"))
            .and(query_param("format", "json"))
            .and(query_param("date", "2023:2024"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;
        mock_server
    }

    fn codes() -> Vec<String> {
        vec!["USA".to_string(), "BRA".to_string()]
    }

    async fn fetch(server: &MockServer) -> Result<Vec<GdpObservation>> {
        WorldBankProvider::new(&server.uri(), build_client().unwrap())
            .fetch_growth(&codes(), 2023, 2024)
            .await
    }

    #[tokio::test]
    async fn test_successful_growth_fetch() {
        let server = create_mock_server(200, GROWTH_JSON).await;

        let observations = fetch(&server).await.unwrap();
        assert_eq!(observations.len(), 4);
        assert_eq!(
            observations[0],
            GdpObservation {
                country_code: "BRA".to_string(),
                year: "2024".to_string(),
                value: Some(3.4),
            }
        );
        assert_eq!(observations[3].value, None);
    }

    #[tokio::test]
    async fn test_no_data() {
        let body = r#"[{"page": 0, "pages": 0, "per_page": 0, "total": 0}, null]"#;
        let server = create_mock_server(200, body).await;

        assert!(fetch(&server).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_api_error_message() {
        let body = r#"[{"message": [{"id": "120", "key": "Invalid value", "value": "The provided parameter value is not valid"}]}]"#;
        let server = create_mock_server(200, body).await;

        let result = fetch(&server).await;
        assert!(
            result
                .unwrap_err()
                .to_string()
                .starts_with("World Bank API error:")
        );
    }

    #[tokio::test]
    async fn test_malformed_records() {
        let body = r#"[{"page": 1}, [{"date": "2024", "value": 1.0}]]"#;
        let server = create_mock_server(200, body).await;

        let result = fetch(&server).await;
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse World Bank records")
        );
    }

    #[tokio::test]
    async fn test_api_error_response() {
        let server = create_mock_server(502, "").await;

        let result = fetch(&server).await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 502 Bad Gateway for GDP growth"
        );
    }

    #[tokio::test]
    async fn test_no_countries() {
        let provider = WorldBankProvider::new("http://localhost", build_client().unwrap());
        let result = provider.fetch_growth(&[], 2020, 2024).await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "No countries configured for GDP growth"
        );
    }
}
