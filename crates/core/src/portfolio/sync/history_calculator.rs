//! The daily state iterator - day-by-day portfolio history reconstruction.
//!
//! A strictly sequential scan: each day's return needs the previous day's
//! total value, and each day's valuation needs the holdings accumulated
//! through that day, so the loop cannot be parallelized. All the I/O
//! happened before this module runs; everything here is pure in-memory
//! computation, and nothing inside the loop can fail - missing prices,
//! missing rates and oversized sells all degrade per the rules of the
//! individual helpers.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use log::debug;
use rust_decimal::Decimal;

use crate::activities::{CashTransaction, Trade};
use crate::fx::to_base;
use crate::market_data::PriceCache;
use crate::portfolio::history::HistoryEntry;
use crate::portfolio::holdings::HoldingsState;
use crate::portfolio::performance::{daily_flow_adjusted_return, is_external_flow};
use crate::utils::time_utils::get_days_between;

use super::sync_resolver::SyncStart;

/// Walks every calendar day from the resolved start through `today` and
/// produces one history row per day.
///
/// Realized P&L is carried through unchanged: closing-position accounting
/// happens upstream, this engine only threads the value into each row.
#[allow(clippy::too_many_arguments)]
pub fn calculate_history_rows(
    portfolio_id: &str,
    start: &SyncStart,
    trades: &[Trade],
    cash_transactions: &[CashTransaction],
    prices: &PriceCache,
    base_currency: &str,
    benchmark_symbol: &str,
    today: NaiveDate,
) -> Vec<HistoryEntry> {
    let days = get_days_between(start.first_day(), today);
    if days.is_empty() {
        return Vec::new();
    }

    let mut trades_by_day: HashMap<NaiveDate, Vec<&Trade>> = HashMap::new();
    for trade in trades {
        trades_by_day.entry(trade.trade_date).or_default().push(trade);
    }
    let mut cash_by_day: HashMap<NaiveDate, Vec<&CashTransaction>> = HashMap::new();
    for transaction in cash_transactions {
        cash_by_day
            .entry(transaction.transaction_date)
            .or_default()
            .push(transaction);
    }

    // Looked up once; every day's benchmark factor is relative to this.
    let benchmark_at_inception = prices.close_on_or_before(benchmark_symbol, start.inception);

    let mut holdings = start.holdings.clone();
    let mut cost_basis = start.cost_basis;
    let mut twr_factor = start.twr_factor;
    let mut bench_factor = start.bench_factor;
    let mut previous_total_value = start.previous_total_value;

    let mut rows = Vec::with_capacity(days.len());
    for day in days {
        // 1. Cash transactions dated today. External flows (deposits and
        //    withdrawals) additionally accrue, converted to base, into the
        //    day's flow accumulator and into cost basis.
        let mut external_flow_today = Decimal::ZERO;
        if let Some(transactions) = cash_by_day.get(&day) {
            for transaction in transactions {
                holdings.apply_cash(transaction);
                if is_external_flow(transaction.transaction_type) {
                    match to_base(
                        transaction.amount,
                        &transaction.currency,
                        base_currency,
                        day,
                        prices,
                    ) {
                        Some(converted) => {
                            external_flow_today += converted;
                            cost_basis += converted;
                        }
                        None => {
                            debug!(
                                "No FX rate to convert {} {} flow on {}; flow invisible today",
                                transaction.amount, transaction.currency, day
                            );
                        }
                    }
                }
            }
        }

        // 2. Trades dated today, settled against base-currency cash.
        if let Some(day_trades) = trades_by_day.get(&day) {
            for trade in day_trades {
                holdings.apply_trade(trade, base_currency);
            }
        }

        // 3. Value positions and cash in base currency.
        let total_value = value_portfolio(&holdings, prices, base_currency, day);

        // 4.-5. Flow-adjusted daily return, compounded into the TWR factor.
        let day_return =
            daily_flow_adjusted_return(total_value, previous_total_value, external_flow_today);
        twr_factor *= Decimal::ONE + day_return;

        // 6. Benchmark relative to inception; carried forward unchanged
        //    when either close is unavailable.
        if let (Some(at_inception), Some(at_day)) = (
            benchmark_at_inception,
            prices.close_on_or_before(benchmark_symbol, day),
        ) {
            if !at_inception.is_zero() {
                bench_factor = at_day / at_inception;
            }
        }

        // 7. Emit the row.
        rows.push(HistoryEntry {
            id: HistoryEntry::entry_id(portfolio_id, day),
            portfolio_id: portfolio_id.to_string(),
            entry_date: day,
            total_value,
            cost_basis,
            realized_pnl: start.realized_pnl,
            daily_return: day_return,
            cumulative_twr: twr_factor - Decimal::ONE,
            bench_cumulative: bench_factor - Decimal::ONE,
            calculated_at: Utc::now(),
        });

        // 8. Today's total becomes tomorrow's denominator.
        previous_total_value = total_value;
    }

    rows
}

/// Base-currency value of all positive positions plus all cash balances.
/// Symbols without a usable price and currencies without a usable rate
/// contribute zero for the day.
fn value_portfolio(
    holdings: &HoldingsState,
    prices: &PriceCache,
    base_currency: &str,
    date: NaiveDate,
) -> Decimal {
    let mut total = Decimal::ZERO;

    for (ticker, quantity) in &holdings.shares {
        if *quantity <= Decimal::ZERO {
            continue;
        }
        match prices.close_on_or_before(ticker, date) {
            Some(close) => total += *quantity * close,
            None => {
                debug!(
                    "Missing price for {} on {}; position valued at zero",
                    ticker, date
                );
            }
        }
    }

    for (currency, balance) in &holdings.cash_balances {
        match to_base(*balance, currency, base_currency, date, prices) {
            Some(converted) => total += converted,
            None => {
                debug!(
                    "Missing FX rate for {} on {}; balance valued at zero",
                    currency, date
                );
            }
        }
    }

    total
}
