//! Per-run price cache with backward-filled lookup.
//!
//! The cache is scoped to a single sync invocation and discarded when the
//! run ends; nothing here outlives a `sync_portfolio_history` call.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use futures::future::join_all;
use log::{debug, warn};
use rust_decimal::Decimal;

use crate::constants::{PRICE_BACKFILL_MAX_DAYS, PRICE_FETCH_LOOKBACK_DAYS};
use foliotrack_market_data::{MarketDataProviderTrait, PriceBar};

/// Date-indexed closing prices for every symbol one sync run needs:
/// tickers, FX pair symbols, and the benchmark.
#[derive(Debug, Clone, Default)]
pub struct PriceCache {
    series: HashMap<String, BTreeMap<NaiveDate, Decimal>>,
}

impl PriceCache {
    /// Merges a fetched series into the cache under `symbol`.
    pub fn insert_series(&mut self, symbol: &str, bars: Vec<PriceBar>) {
        let series = self.series.entry(symbol.to_string()).or_default();
        for bar in bars {
            series.insert(bar.date, bar.close);
        }
    }

    /// Inserts a single close; used by tests and fixture loaders.
    pub fn insert_close(&mut self, symbol: &str, date: NaiveDate, close: Decimal) {
        self.series
            .entry(symbol.to_string())
            .or_default()
            .insert(date, close);
    }

    /// Closing price for `symbol` on `date`, backward-filled: when the exact
    /// date has no close, the nearest one up to `PRICE_BACKFILL_MAX_DAYS`
    /// calendar days earlier is used. `None` when nothing usable is cached
    /// in that window; callers value the symbol at zero for the day.
    pub fn close_on_or_before(&self, symbol: &str, date: NaiveDate) -> Option<Decimal> {
        let history = self.series.get(symbol)?;
        let (found_date, close) = history.range(..=date).next_back()?;
        if (date - *found_date).num_days() <= PRICE_BACKFILL_MAX_DAYS {
            Some(*close)
        } else {
            None
        }
    }

    /// Whether any close at all is cached for `symbol`.
    pub fn has_series(&self, symbol: &str) -> bool {
        self.series.get(symbol).is_some_and(|s| !s.is_empty())
    }
}

/// Symbols and date ranges one sync run needs cached.
#[derive(Debug, Clone)]
pub struct PriceCachePlan {
    /// Every ticker the portfolio has ever traded.
    pub tickers: Vec<String>,
    /// FX pair symbols, one per non-base currency seen in the ledger.
    pub fx_pairs: Vec<String>,
    /// Cache key for the benchmark series.
    pub benchmark_symbol: String,
    /// First day the iterator will compute. Fetches reach further back so
    /// this day has a previous close to fill from.
    pub start: NaiveDate,
    /// Last day the iterator will compute (normally "today").
    pub end: NaiveDate,
    /// The benchmark needs its inception close on every run, so its fetch
    /// starts here instead of at `start`.
    pub benchmark_start: NaiveDate,
}

/// Builds a [`PriceCache`] by fanning out one fetch per symbol.
///
/// Every fetch runs concurrently and owns its own cache slot; a failure for
/// one symbol is logged and leaves that slot empty without disturbing the
/// others or aborting the sync.
pub struct PriceCacheBuilder {
    provider: Arc<dyn MarketDataProviderTrait>,
}

impl PriceCacheBuilder {
    pub fn new(provider: Arc<dyn MarketDataProviderTrait>) -> Self {
        Self { provider }
    }

    pub async fn build(&self, plan: &PriceCachePlan) -> PriceCache {
        let fetch_start = plan.start - Duration::days(PRICE_FETCH_LOOKBACK_DAYS);
        let benchmark_start = plan.benchmark_start - Duration::days(PRICE_FETCH_LOOKBACK_DAYS);

        debug!(
            "Building price cache for {} tickers, {} fx pairs, benchmark {} ({} to {})",
            plan.tickers.len(),
            plan.fx_pairs.len(),
            plan.benchmark_symbol,
            fetch_start,
            plan.end
        );

        let symbols: Vec<&String> = plan.tickers.iter().chain(plan.fx_pairs.iter()).collect();
        let price_fetches = symbols.into_iter().map(|symbol| {
            let provider = Arc::clone(&self.provider);
            async move {
                let result = provider
                    .get_historical_prices(symbol, fetch_start, plan.end)
                    .await;
                (symbol.clone(), result)
            }
        });
        let benchmark_fetch = self
            .provider
            .get_historical_benchmark(benchmark_start, plan.end);

        let (price_results, benchmark_result) = tokio::join!(join_all(price_fetches), benchmark_fetch);

        let mut cache = PriceCache::default();
        for (symbol, result) in price_results {
            match result {
                Ok(bars) => cache.insert_series(&symbol, bars),
                Err(e) => {
                    warn!(
                        "Failed to fetch prices for {}: {}. Symbol contributes nothing to valuation this run.",
                        symbol, e
                    );
                }
            }
        }
        match benchmark_result {
            Ok(bars) => cache.insert_series(&plan.benchmark_symbol, bars),
            Err(e) => {
                warn!(
                    "Failed to fetch benchmark history: {}. Benchmark return carries forward unchanged.",
                    e
                );
            }
        }

        cache
    }
}
