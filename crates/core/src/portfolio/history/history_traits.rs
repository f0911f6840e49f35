//! Repository trait for portfolio history rows.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::HistoryEntry;
use crate::errors::Result;

/// Persistence contract for computed history rows.
///
/// Failures on any of these are fatal to a sync.
#[async_trait]
pub trait HistoryRepositoryTrait: Send + Sync {
    /// The most recent stored row for the portfolio, if any.
    fn load_latest_entry(&self, portfolio_id: &str) -> Result<Option<HistoryEntry>>;

    /// The most recent stored row strictly before `date`. Used when the
    /// latest row is today's but stale, so today can be recomputed from
    /// yesterday's state.
    fn load_latest_entry_before(
        &self,
        portfolio_id: &str,
        date: NaiveDate,
    ) -> Result<Option<HistoryEntry>>;

    /// Upserts rows keyed by (portfolio_id, date). Must be idempotent:
    /// re-running with identical input leaves storage unchanged.
    async fn upsert_entries(&self, entries: &[HistoryEntry]) -> Result<()>;
}
