use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_AWESOMEAPI_URL: &str = "https://economia.awesomeapi.com.br";
pub const DEFAULT_HGBRASIL_URL: &str = "https://api.hgbrasil.com";
pub const DEFAULT_BCB_URL: &str = "https://api.bcb.gov.br";
pub const DEFAULT_IBGE_URL: &str = "https://servicodados.ibge.gov.br";
pub const DEFAULT_WORLDBANK_URL: &str = "https://api.worldbank.org";

/// SGS series 432: Selic target rate.
pub const DEFAULT_POLICY_RATE_SERIES: u32 = 432;
/// SGS series 13621: international reserves, daily, USD millions.
pub const DEFAULT_RESERVES_SERIES: u32 = 13621;

/// Which provider supplies the dollar, euro and bitcoin quotes.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CurrencySource {
    #[default]
    AwesomeApi,
    HgBrasil,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AwesomeApiProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HgBrasilProviderConfig {
    pub base_url: String,
    #[serde(default)]
    pub key: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BcbProviderConfig {
    pub base_url: String,
    #[serde(default = "default_policy_rate_series")]
    pub policy_rate_series: u32,
    #[serde(default = "default_reserves_series")]
    pub reserves_series: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct IbgeProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WorldBankProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub awesomeapi: Option<AwesomeApiProviderConfig>,
    pub hgbrasil: Option<HgBrasilProviderConfig>,
    pub bcb: Option<BcbProviderConfig>,
    pub ibge: Option<IbgeProviderConfig>,
    pub worldbank: Option<WorldBankProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            awesomeapi: Some(AwesomeApiProviderConfig {
                base_url: DEFAULT_AWESOMEAPI_URL.to_string(),
            }),
            hgbrasil: Some(HgBrasilProviderConfig {
                base_url: DEFAULT_HGBRASIL_URL.to_string(),
                key: None,
            }),
            bcb: Some(BcbProviderConfig {
                base_url: DEFAULT_BCB_URL.to_string(),
                policy_rate_series: DEFAULT_POLICY_RATE_SERIES,
                reserves_series: DEFAULT_RESERVES_SERIES,
            }),
            ibge: Some(IbgeProviderConfig {
                base_url: DEFAULT_IBGE_URL.to_string(),
            }),
            worldbank: Some(WorldBankProviderConfig {
                base_url: DEFAULT_WORLDBANK_URL.to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct GdpCountry {
    /// ISO 3166 alpha-3 code, as the World Bank reports it.
    pub code: String,
    /// Column name shown for the country.
    pub label: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GdpConfig {
    pub from_year: i32,
    pub to_year: i32,
    pub countries: Vec<GdpCountry>,
}

impl GdpConfig {
    /// `(code, label)` pairs in configured order.
    pub fn labels_by_code(&self) -> Vec<(String, String)> {
        self.countries
            .iter()
            .map(|c| (c.code.clone(), c.label.clone()))
            .collect()
    }
}

impl Default for GdpConfig {
    fn default() -> Self {
        let country = |code: &str, label: &str| GdpCountry {
            code: code.to_string(),
            label: label.to_string(),
        };
        GdpConfig {
            from_year: 2020,
            to_year: 2024,
            countries: vec![
                country("USA", "EUA"),
                country("CHN", "China"),
                country("EUU", "UE"),
                country("BRA", "Brasil"),
            ],
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub currency_source: CurrencySource,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub gdp: GdpConfig,
}

impl AppConfig {
    /// Loads the config from the default location, or built-in defaults when
    /// no file has been set up there.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("br", "ecopulse", "ecopulse")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

fn default_policy_rate_series() -> u32 {
    DEFAULT_POLICY_RATE_SERIES
}

fn default_reserves_series() -> u32 {
    DEFAULT_RESERVES_SERIES
}
