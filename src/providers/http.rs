use anyhow::{Context, Result, anyhow};
use serde::de::DeserializeOwned;
use tracing::debug;

pub const USER_AGENT: &str = concat!("ecopulse/", env!("CARGO_PKG_VERSION"));

/// Client shared by every provider.
pub fn build_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")
}

/// Sends a single GET and parses the body as JSON. `what` names the resource
/// in error messages.
pub async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    what: &str,
) -> Result<T> {
    debug!("Requesting {} from {}", what, url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| anyhow!("Request error: {} for {}", e, what))?;

    if !response.status().is_success() {
        return Err(anyhow!("HTTP error: {} for {}", response.status(), what));
    }

    let text = response
        .text()
        .await
        .with_context(|| format!("Failed to get response text for {what}"))?;

    serde_json::from_str(&text)
        .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", what, e))
}
