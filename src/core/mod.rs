//! Core indicator model, provider abstractions and the aggregator

pub mod aggregator;
pub mod config;
pub mod format;
pub mod log;
pub mod provider;
pub mod snapshot;

// Re-export main types for cleaner imports
pub use aggregator::{Aggregator, AggregatorSettings, LoadState, Providers};
pub use provider::{
    CentralBankSeriesProvider, CurrencyQuoteProvider, CurrencyQuotes, EquityIndexProvider,
    GdpGrowthProvider, GdpObservation, InflationProvider, MarketQuote, SeriesObservation,
};
pub use snapshot::MarketSnapshot;
