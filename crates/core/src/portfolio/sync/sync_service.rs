//! Orchestration of one history sync run.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;

use crate::activities::{ActivityRepositoryTrait, CashTransaction, Trade};
use crate::constants::{DEFAULT_BASE_CURRENCY, DEFAULT_BENCHMARK_SYMBOL};
use crate::errors::{Error, Result};
use crate::fx::{fx_pair_symbol, normalize_currency_code};
use crate::market_data::{MarketDataProviderTrait, PriceCacheBuilder, PriceCachePlan};
use crate::portfolio::history::HistoryRepositoryTrait;
use crate::utils::time_utils;

use super::history_calculator::calculate_history_rows;
use super::sync_model::SyncOutcome;
use super::sync_resolver::{has_activity_created_after, resolve_sync_start};

#[async_trait]
pub trait PortfolioSyncServiceTrait: Send + Sync {
    /// Fills the gap between the last stored history row and today with one
    /// freshly computed row per calendar day.
    ///
    /// Returns how many days were synced, an "already up to date" / "no new
    /// gaps" outcome, or the error of whichever fatal step failed (ledger
    /// read, history read, upsert).
    async fn sync_portfolio_history(
        &self,
        portfolio_id: &str,
        user_id: &str,
    ) -> Result<SyncOutcome>;
}

/// Default sync service over the repository and provider traits.
///
/// One invocation owns all of its working state (recovered holdings, price
/// cache) and discards it on return; nothing leaks between portfolios or
/// runs. Concurrent syncs for the same portfolio are NOT safe - both would
/// anchor on the same stored row and upsert conflicting rows for the same
/// dates. Callers must serialize syncs per portfolio.
pub struct PortfolioSyncService {
    activity_repository: Arc<dyn ActivityRepositoryTrait>,
    history_repository: Arc<dyn HistoryRepositoryTrait>,
    market_data_provider: Arc<dyn MarketDataProviderTrait>,
    base_currency: String,
    benchmark_symbol: String,
}

impl PortfolioSyncService {
    pub fn new(
        activity_repository: Arc<dyn ActivityRepositoryTrait>,
        history_repository: Arc<dyn HistoryRepositoryTrait>,
        market_data_provider: Arc<dyn MarketDataProviderTrait>,
    ) -> Self {
        Self::with_config(
            activity_repository,
            history_repository,
            market_data_provider,
            DEFAULT_BASE_CURRENCY,
            DEFAULT_BENCHMARK_SYMBOL,
        )
    }

    pub fn with_config(
        activity_repository: Arc<dyn ActivityRepositoryTrait>,
        history_repository: Arc<dyn HistoryRepositoryTrait>,
        market_data_provider: Arc<dyn MarketDataProviderTrait>,
        base_currency: &str,
        benchmark_symbol: &str,
    ) -> Self {
        Self {
            activity_repository,
            history_repository,
            market_data_provider,
            base_currency: normalize_currency_code(base_currency),
            benchmark_symbol: benchmark_symbol.to_string(),
        }
    }

    /// Collects every symbol this run needs: each ticker ever traded, one
    /// FX pair per non-base currency seen in the cash ledger, and the
    /// benchmark (fetched from inception so its baseline close is present).
    fn build_price_plan(
        &self,
        trades: &[Trade],
        cash_transactions: &[CashTransaction],
        start: NaiveDate,
        inception: NaiveDate,
        today: NaiveDate,
    ) -> PriceCachePlan {
        let tickers: HashSet<String> = trades.iter().map(|t| t.ticker.clone()).collect();
        let mut tickers: Vec<String> = tickers.into_iter().collect();
        tickers.sort();

        let currencies: HashSet<String> = cash_transactions
            .iter()
            .map(|c| normalize_currency_code(&c.currency))
            .filter(|c| *c != self.base_currency)
            .collect();
        let mut fx_pairs: Vec<String> = currencies
            .into_iter()
            .map(|c| fx_pair_symbol(&c, &self.base_currency))
            .collect();
        fx_pairs.sort();

        PriceCachePlan {
            tickers,
            fx_pairs,
            benchmark_symbol: self.benchmark_symbol.clone(),
            start,
            end: today,
            benchmark_start: inception,
        }
    }
}

#[async_trait]
impl PortfolioSyncServiceTrait for PortfolioSyncService {
    async fn sync_portfolio_history(
        &self,
        portfolio_id: &str,
        user_id: &str,
    ) -> Result<SyncOutcome> {
        if portfolio_id.trim().is_empty() {
            return Err(Error::Validation("portfolio id must not be empty".to_string()));
        }

        let run_started = Instant::now();
        debug!(
            "Starting history sync for portfolio '{}' (user '{}')",
            portfolio_id, user_id
        );

        let (trades, cash_transactions) = tokio::try_join!(
            self.activity_repository.load_trades(portfolio_id),
            self.activity_repository.load_cash_transactions(portfolio_id)
        )?;

        if trades.is_empty() && cash_transactions.is_empty() {
            return Ok(SyncOutcome::no_activity());
        }

        let today = time_utils::valuation_date_today();
        let latest = self.history_repository.load_latest_entry(portfolio_id)?;

        let anchor = match latest {
            Some(row) if row.entry_date >= today => {
                if !has_activity_created_after(&trades, &cash_transactions, row.calculated_at) {
                    debug!(
                        "Portfolio '{}' already synced through {}",
                        portfolio_id, row.entry_date
                    );
                    return Ok(SyncOutcome::up_to_date());
                }
                // Today's row predates ledger edits; rebuild it anchored on
                // the row before so today is recomputed, not skipped.
                self.history_repository
                    .load_latest_entry_before(portfolio_id, today)?
            }
            other => other,
        };

        let Some(start) = resolve_sync_start(
            &trades,
            &cash_transactions,
            anchor.as_ref(),
            &self.base_currency,
        ) else {
            return Ok(SyncOutcome::no_activity());
        };

        let plan = self.build_price_plan(
            &trades,
            &cash_transactions,
            start.first_day(),
            start.inception,
            today,
        );
        let prices = PriceCacheBuilder::new(Arc::clone(&self.market_data_provider))
            .build(&plan)
            .await;

        let rows = calculate_history_rows(
            portfolio_id,
            &start,
            &trades,
            &cash_transactions,
            &prices,
            &self.base_currency,
            &self.benchmark_symbol,
            today,
        );

        if rows.is_empty() {
            return Ok(SyncOutcome::no_new_gaps());
        }

        self.history_repository.upsert_entries(&rows).await?;

        debug!(
            "Synced {} day(s) for portfolio '{}' in {:?}",
            rows.len(),
            portfolio_id,
            run_started.elapsed()
        );
        Ok(SyncOutcome::synced(rows.len()))
    }
}
