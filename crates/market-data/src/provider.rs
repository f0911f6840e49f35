//! Market data provider trait definition.
//!
//! Implement this trait to back the engine with a real data source. The
//! engine launches one fetch per symbol concurrently and tolerates
//! individual failures, so implementations do not need their own retry
//! logic.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::MarketDataError;
use crate::models::PriceBar;

/// Trait for historical market data sources.
///
/// The benchmark series is exposed as its own call because providers are
/// configured with the benchmark instrument up front; callers never pass a
/// benchmark symbol over the wire.
#[async_trait]
pub trait MarketDataProviderTrait: Send + Sync {
    /// Daily closing prices for `symbol` within `[start, end]`, ascending by
    /// date. Non-trading days are absent from the result.
    async fn get_historical_prices(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, MarketDataError>;

    /// Daily values of the configured benchmark index within `[start, end]`,
    /// ascending by date.
    async fn get_historical_benchmark(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, MarketDataError>;
}
