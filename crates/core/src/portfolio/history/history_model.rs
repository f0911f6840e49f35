use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One computed row of portfolio history.
///
/// Rows are unique per (portfolio, date) and form an unbroken ascending
/// date sequence from inception to the last synced day. They are created
/// by the daily iterator and upserted idempotently; re-running a sync
/// overwrites a date's row with identical content, and nothing in the
/// engine ever deletes one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub portfolio_id: String,
    pub entry_date: NaiveDate,
    /// Portfolio value in base currency: positions plus cash.
    pub total_value: Decimal,
    /// Cumulative external capital: deposits net of withdrawals, in base
    /// currency.
    pub cost_basis: Decimal,
    /// Cumulative realized P&L. Computed upstream when positions close;
    /// this engine carries it through unchanged.
    pub realized_pnl: Decimal,
    /// Flow-adjusted return of this single day.
    pub daily_return: Decimal,
    /// Compounded time-weighted return since inception.
    pub cumulative_twr: Decimal,
    /// Benchmark return since inception.
    pub bench_cumulative: Decimal,
    /// When this row was computed; the resolver compares ledger
    /// `created_at` stamps against it to detect staleness.
    pub calculated_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Canonical row id, `"{portfolio_id}_{date}"`.
    pub fn entry_id(portfolio_id: &str, date: NaiveDate) -> String {
        format!("{}_{}", portfolio_id, date)
    }
}
