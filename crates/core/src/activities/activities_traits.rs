//! Loader contract for the activity ledger.

use async_trait::async_trait;

use super::{CashTransaction, Trade};
use crate::errors::Result;

/// Repository trait for reading a portfolio's ledger.
///
/// Both reads are expected to return rows in ascending date order; the
/// replay fold re-sorts defensively if a backend cannot guarantee it.
/// Failures here are fatal to a sync - the engine cannot establish a
/// trustworthy state without the full ledger.
#[async_trait]
pub trait ActivityRepositoryTrait: Send + Sync {
    /// All trades of the portfolio, ascending by trade date.
    async fn load_trades(&self, portfolio_id: &str) -> Result<Vec<Trade>>;

    /// All cash transactions of the portfolio, ascending by transaction date.
    async fn load_cash_transactions(&self, portfolio_id: &str)
        -> Result<Vec<CashTransaction>>;
}
