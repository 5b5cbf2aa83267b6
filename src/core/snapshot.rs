//! The merged, point-in-time view of every indicator the dashboard shows.
//!
//! A [`MarketSnapshot`] always starts from [`MarketSnapshot::fallback`] so it
//! can be rendered even when every provider is unreachable. The aggregator
//! overwrites a field only with a value its provider returned successfully.

use crate::core::config::GdpConfig;
use crate::core::format::{format_pt_br, round_to};
use crate::core::provider::{CurrencyQuotes, GdpObservation, MarketQuote, SeriesObservation};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Label of the commodity entry derived from the BTC and USD quotes.
pub const BITCOIN_KUSD: &str = "Bitcoin (kUSD)";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub buy: Decimal,
    pub variation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexQuote {
    pub points: Decimal,
    pub variation: f64,
}

impl IndexQuote {
    /// Index level with `pt-BR` thousands grouping, e.g. `128.500`.
    pub fn points_display(&self) -> String {
        format_pt_br(self.points)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Indicator {
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reserves {
    pub billions: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: Decimal,
}

/// GDP growth for one year, keyed by country display label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GdpYear {
    pub year: String,
    pub growth: BTreeMap<String, Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSnapshot {
    pub dollar: Quote,
    pub euro: Quote,
    pub ibovespa: IndexQuote,
    pub policy_rate: Indicator,
    pub inflation: Indicator,
    pub reserves: Reserves,
    pub commodities: Vec<SeriesPoint>,
    pub gdp_growth: Vec<GdpYear>,
    pub as_of: DateTime<Utc>,
}

impl MarketSnapshot {
    /// Static values shown when a provider fails or is unreachable, with the
    /// GDP history of the default countries.
    pub fn fallback() -> Self {
        Self::fallback_for(&GdpConfig::default().labels_by_code())
    }

    /// Fallback snapshot whose GDP rows carry exactly the given `(code, label)`
    /// countries. Codes without built-in history are `None` in every year.
    pub fn fallback_for(countries: &[(String, String)]) -> Self {
        MarketSnapshot {
            dollar: Quote {
                buy: Decimal::new(505, 2),
                variation: 0.2,
            },
            euro: Quote {
                buy: Decimal::new(555, 2),
                variation: -0.1,
            },
            ibovespa: IndexQuote {
                points: Decimal::from(128_500),
                variation: 1.2,
            },
            policy_rate: Indicator {
                value: Decimal::new(1075, 2),
            },
            inflation: Indicator {
                value: Decimal::new(450, 2),
            },
            reserves: Reserves {
                billions: Decimal::new(3550, 1),
            },
            commodities: vec![
                series_point("Ouro (g/BRL)", 350),
                series_point(BITCOIN_KUSD, 65),
                series_point("Petróleo (WTI)", 78),
                series_point("Soja (sc)", 120),
            ],
            gdp_growth: group_growth_by_year(&fallback_gdp_observations(), countries),
            as_of: Utc::now(),
        }
    }

    pub fn apply_currency(&mut self, quotes: &CurrencyQuotes) {
        self.dollar = to_quote(&quotes.dollar);
        self.euro = to_quote(&quotes.euro);
    }

    pub fn apply_index(&mut self, quote: &MarketQuote) {
        self.ibovespa = IndexQuote {
            points: quote.price,
            variation: quote.variation,
        };
    }

    pub fn apply_policy_rate(&mut self, observation: &SeriesObservation) {
        self.policy_rate = Indicator {
            value: round_to(observation.value, 2),
        };
    }

    /// The central bank publishes reserves in USD millions.
    pub fn apply_reserves(&mut self, observation: &SeriesObservation) {
        self.reserves = Reserves {
            billions: round_to(observation.value / Decimal::from(1000), 1),
        };
    }

    pub fn apply_inflation(&mut self, value: Decimal) {
        self.inflation = Indicator {
            value: round_to(value, 2),
        };
    }

    pub fn apply_gdp_growth(&mut self, series: Vec<GdpYear>) {
        self.gdp_growth = series;
    }

    /// Overwrites the value of an existing commodity entry. Returns `false`
    /// when no entry carries `label`.
    pub fn set_commodity(&mut self, label: &str, value: Decimal) -> bool {
        match self.commodities.iter_mut().find(|c| c.label == label) {
            Some(point) => {
                point.value = value;
                true
            }
            None => false,
        }
    }

    pub fn commodity(&self, label: &str) -> Option<&SeriesPoint> {
        self.commodities.iter().find(|c| c.label == label)
    }
}

/// Groups flat per-country observations into one entry per distinct year,
/// sorted by ascending year.
///
/// `countries` maps a provider country code to its display label. Records for
/// unknown codes still contribute their year; every known label is present in
/// each year, as `None` when no value was reported.
pub fn group_growth_by_year(
    observations: &[GdpObservation],
    countries: &[(String, String)],
) -> Vec<GdpYear> {
    let labels: BTreeMap<&str, &str> = countries
        .iter()
        .map(|(code, label)| (code.as_str(), label.as_str()))
        .collect();
    let years: BTreeSet<&str> = observations.iter().map(|o| o.year.as_str()).collect();

    let mut grouped: BTreeMap<&str, BTreeMap<String, Option<f64>>> = years
        .into_iter()
        .map(|year| {
            let empty: BTreeMap<String, Option<f64>> =
                labels.values().map(|l| (l.to_string(), None)).collect();
            (year, empty)
        })
        .collect();

    for observation in observations {
        if let (Some(label), Some(row)) = (
            labels.get(observation.country_code.as_str()),
            grouped.get_mut(observation.year.as_str()),
        ) {
            row.insert(label.to_string(), observation.value);
        }
    }

    grouped
        .into_iter()
        .map(|(year, growth)| GdpYear {
            year: year.to_string(),
            growth,
        })
        .collect()
}

fn to_quote(quote: &MarketQuote) -> Quote {
    Quote {
        buy: round_to(quote.price, 2),
        variation: quote.variation,
    }
}

fn series_point(label: &str, value: i64) -> SeriesPoint {
    SeriesPoint {
        label: label.to_string(),
        value: Decimal::from(value),
    }
}

const FALLBACK_GDP_FIRST_YEAR: i32 = 2020;

/// Yearly growth from `FALLBACK_GDP_FIRST_YEAR` on, by World Bank code.
const FALLBACK_GDP_GROWTH: [(&str, [f64; 5]); 4] = [
    ("USA", [-3.4, 5.7, 2.1, 2.5, 1.5]),
    ("CHN", [2.2, 8.1, 3.0, 5.2, 4.6]),
    ("EUU", [-6.1, 5.3, 3.4, 0.5, 0.8]),
    ("BRA", [-3.9, 4.6, 2.9, 2.9, 1.5]),
];

fn fallback_gdp_observations() -> Vec<GdpObservation> {
    FALLBACK_GDP_GROWTH
        .iter()
        .flat_map(|(code, values)| {
            (FALLBACK_GDP_FIRST_YEAR..)
                .zip(values)
                .map(move |(year, value)| GdpObservation {
                    country_code: code.to_string(),
                    year: year.to_string(),
                    value: Some(*value),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn obs(code: &str, year: &str, value: Option<f64>) -> GdpObservation {
        GdpObservation {
            country_code: code.to_string(),
            year: year.to_string(),
            value,
        }
    }

    fn countries() -> Vec<(String, String)> {
        vec![
            ("USA".to_string(), "EUA".to_string()),
            ("BRA".to_string(), "Brasil".to_string()),
        ]
    }

    #[test]
    fn test_fallback_has_every_field() {
        let snapshot = MarketSnapshot::fallback();
        assert_eq!(snapshot.dollar.buy.to_string(), "5.05");
        assert_eq!(snapshot.euro.variation, -0.1);
        assert_eq!(snapshot.ibovespa.points_display(), "128.500");
        assert_eq!(snapshot.policy_rate.value.to_string(), "10.75");
        assert_eq!(snapshot.inflation.value.to_string(), "4.50");
        assert_eq!(snapshot.reserves.billions.to_string(), "355.0");
        assert_eq!(snapshot.commodities.len(), 4);
        assert_eq!(
            snapshot.commodity(BITCOIN_KUSD).map(|c| c.value),
            Some(Decimal::from(65))
        );
        let years: Vec<_> = snapshot.gdp_growth.iter().map(|g| g.year.as_str()).collect();
        assert_eq!(years, vec!["2020", "2021", "2022", "2023", "2024"]);
        assert_eq!(snapshot.gdp_growth[0].growth["Brasil"], Some(-3.9));
        assert_eq!(snapshot.gdp_growth[1].growth["China"], Some(8.1));
        assert_eq!(snapshot.gdp_growth[3].growth["UE"], Some(0.5));
    }

    #[test]
    fn test_apply_reserves_converts_millions_to_billions() {
        let mut snapshot = MarketSnapshot::fallback();
        snapshot.apply_reserves(&SeriesObservation {
            date: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
            value: Decimal::from_str("355200").unwrap(),
        });
        assert_eq!(snapshot.reserves.billions.to_string(), "355.2");
    }

    #[test]
    fn test_apply_policy_rate_rounds() {
        let mut snapshot = MarketSnapshot::fallback();
        snapshot.apply_policy_rate(&SeriesObservation {
            date: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
            value: Decimal::from_str("15").unwrap(),
        });
        assert_eq!(snapshot.policy_rate.value.to_string(), "15.00");
    }

    #[test]
    fn test_set_commodity_unknown_label() {
        let mut snapshot = MarketSnapshot::fallback();
        assert!(!snapshot.set_commodity("Café", Decimal::ONE));
        assert!(snapshot.set_commodity("Soja (sc)", Decimal::ONE));
        assert_eq!(
            snapshot.commodity("Soja (sc)").map(|c| c.value),
            Some(Decimal::ONE)
        );
    }

    #[test]
    fn test_group_growth_sorts_years_ascending() {
        let records = vec![
            obs("USA", "2023", Some(2.5)),
            obs("BRA", "2021", Some(4.6)),
            obs("USA", "2021", Some(5.7)),
            obs("BRA", "2023", Some(2.9)),
            obs("USA", "2022", Some(2.1)),
        ];

        let grouped = group_growth_by_year(&records, &countries());
        let years: Vec<_> = grouped.iter().map(|g| g.year.as_str()).collect();
        assert_eq!(years, vec!["2021", "2022", "2023"]);
        assert_eq!(grouped[0].growth["EUA"], Some(5.7));
        assert_eq!(grouped[0].growth["Brasil"], Some(4.6));
        assert_eq!(grouped[1].growth["EUA"], Some(2.1));
        assert_eq!(grouped[1].growth["Brasil"], None);
    }

    #[test]
    fn test_group_growth_keeps_years_of_unknown_countries() {
        let records = vec![
            obs("USA", "2020", Some(-3.4)),
            obs("JPN", "2019", Some(-0.4)),
            obs("BRA", "2020", None),
        ];

        let grouped = group_growth_by_year(&records, &countries());
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].year, "2019");
        assert!(grouped[0].growth.values().all(Option::is_none));
        assert!(!grouped[0].growth.contains_key("JPN"));
        assert_eq!(grouped[1].growth["Brasil"], None);
    }

    #[test]
    fn test_fallback_gdp_rows_follow_configured_countries() {
        let countries = vec![
            ("BRA".to_string(), "Brazil".to_string()),
            ("ARG".to_string(), "Argentina".to_string()),
        ];

        let snapshot = MarketSnapshot::fallback_for(&countries);
        assert_eq!(snapshot.gdp_growth.len(), 5);
        for row in &snapshot.gdp_growth {
            let labels: Vec<_> = row.growth.keys().map(String::as_str).collect();
            assert_eq!(labels, vec!["Argentina", "Brazil"]);
            assert_eq!(row.growth["Argentina"], None);
        }
        assert_eq!(snapshot.gdp_growth[0].growth["Brazil"], Some(-3.9));
        assert_eq!(snapshot.gdp_growth[4].growth["Brazil"], Some(1.5));
    }

    #[test]
    fn test_group_growth_empty() {
        assert!(group_growth_by_year(&[], &countries()).is_empty());
    }
}
