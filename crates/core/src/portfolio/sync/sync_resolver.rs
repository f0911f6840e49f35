//! Resolves where a resumable history computation starts.
//!
//! The engine persists no working state between runs. A resumed sync reads
//! its numeric state (cost basis, realized P&L, compounded factors,
//! previous total) from the last stored row and rebuilds holdings by
//! replaying the ledger through that row's date.

use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use rust_decimal::Decimal;

use crate::activities::{CashTransaction, Trade};
use crate::portfolio::history::HistoryEntry;
use crate::portfolio::holdings::{replay_ledger, HoldingsState};

/// Starting point and recovered state for one sync run.
#[derive(Debug, Clone)]
pub struct SyncStart {
    /// Last day already covered by stored history; iteration begins the day
    /// after. `None` bootstraps from inception.
    pub resume_from: Option<NaiveDate>,
    /// Earliest date any ledger activity carries.
    pub inception: NaiveDate,
    /// Holdings as of `resume_from` (empty at inception).
    pub holdings: HoldingsState,
    pub cost_basis: Decimal,
    pub realized_pnl: Decimal,
    /// Product of (1 + daily return) through `resume_from`.
    pub twr_factor: Decimal,
    /// Benchmark growth factor through `resume_from`.
    pub bench_factor: Decimal,
    pub previous_total_value: Decimal,
}

impl SyncStart {
    /// First calendar day the iterator computes.
    pub fn first_day(&self) -> NaiveDate {
        match self.resume_from {
            // succ_opt is None only at the end of chrono's date range; the
            // iteration range is empty there either way.
            Some(date) => date.succ_opt().unwrap_or(date),
            None => self.inception,
        }
    }
}

/// True when any ledger record was created after `instant` - i.e. the
/// stored row predates ledger edits and can no longer be trusted as final.
pub fn has_activity_created_after(
    trades: &[Trade],
    cash_transactions: &[CashTransaction],
    instant: DateTime<Utc>,
) -> bool {
    trades.iter().any(|t| t.created_at > instant)
        || cash_transactions.iter().any(|c| c.created_at > instant)
}

/// Earliest activity date in the ledger: the portfolio's inception.
pub fn inception_date(
    trades: &[Trade],
    cash_transactions: &[CashTransaction],
) -> Option<NaiveDate> {
    let first_trade = trades.iter().map(|t| t.trade_date).min();
    let first_cash = cash_transactions.iter().map(|c| c.transaction_date).min();
    match (first_trade, first_cash) {
        (Some(t), Some(c)) => Some(t.min(c)),
        (t, c) => t.or(c),
    }
}

/// Resolves the resume point from the ledger and the anchor row (the most
/// recent stored row this run builds on). Returns `None` when the ledger is
/// empty and there is nothing to compute from.
pub fn resolve_sync_start(
    trades: &[Trade],
    cash_transactions: &[CashTransaction],
    anchor: Option<&HistoryEntry>,
    base_currency: &str,
) -> Option<SyncStart> {
    let inception = inception_date(trades, cash_transactions)?;

    match anchor {
        Some(row) => {
            debug!(
                "Resuming sync for portfolio '{}' from stored row {}",
                row.portfolio_id, row.entry_date
            );
            Some(SyncStart {
                resume_from: Some(row.entry_date),
                inception,
                holdings: replay_ledger(
                    trades,
                    cash_transactions,
                    Some(row.entry_date),
                    base_currency,
                ),
                cost_basis: row.cost_basis,
                realized_pnl: row.realized_pnl,
                twr_factor: Decimal::ONE + row.cumulative_twr,
                bench_factor: Decimal::ONE + row.bench_cumulative,
                previous_total_value: row.total_value,
            })
        }
        None => Some(SyncStart {
            resume_from: None,
            inception,
            holdings: HoldingsState::default(),
            cost_basis: Decimal::ZERO,
            realized_pnl: Decimal::ZERO,
            twr_factor: Decimal::ONE,
            bench_factor: Decimal::ONE,
            previous_total_value: Decimal::ZERO,
        }),
    }
}
