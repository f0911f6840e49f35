//! Ledger replay - a pure fold from activity events to holdings.
//!
//! The engine persists no holdings snapshots. Whenever a sync resumes, the
//! full ledger up to the resume point is replayed through this fold; ledger
//! reads are cheap enough that recomputing beats keeping snapshots in sync.

use std::borrow::Cow;

use chrono::NaiveDate;
use log::debug;

use crate::activities::{
    cash_sorted_by_date, trades_sorted_by_date, CashTransaction, Trade,
};

use super::HoldingsState;

/// Folds all trades and cash transactions dated on or before `cutoff` into
/// a fresh [`HoldingsState`]. With `None` the whole ledger is folded.
/// Trades settle against the `base_currency` balance at their recorded
/// execution price, so the fold needs nothing beyond the ledger itself.
///
/// Events are applied in the same order the daily iterator applies them:
/// day by day, each day's cash transactions before its trades. The
/// settlement floor makes that ordering observable, so replay and
/// iteration must agree on it.
///
/// The date merge requires ascending order. Loaders are expected to deliver
/// sorted rows, but the precondition is enforced rather than assumed:
/// unsorted input is copied and sorted first.
pub fn replay_ledger(
    trades: &[Trade],
    cash_transactions: &[CashTransaction],
    cutoff: Option<NaiveDate>,
    base_currency: &str,
) -> HoldingsState {
    let trades = ensure_sorted(trades, trades_sorted_by_date, |t| t.trade_date, "trades");
    let cash_transactions = ensure_sorted(
        cash_transactions,
        cash_sorted_by_date,
        |c| c.transaction_date,
        "cash transactions",
    );

    let mut state = HoldingsState::default();
    let mut next_trade = 0;
    let mut next_cash = 0;

    loop {
        let trade_date = trades
            .get(next_trade)
            .map(|t| t.trade_date)
            .filter(|d| !past_cutoff(*d, cutoff));
        let cash_date = cash_transactions
            .get(next_cash)
            .map(|c| c.transaction_date)
            .filter(|d| !past_cutoff(*d, cutoff));

        let day = match (trade_date, cash_date) {
            (Some(t), Some(c)) => t.min(c),
            (Some(t), None) => t,
            (None, Some(c)) => c,
            (None, None) => break,
        };

        while next_cash < cash_transactions.len()
            && cash_transactions[next_cash].transaction_date == day
        {
            state.apply_cash(&cash_transactions[next_cash]);
            next_cash += 1;
        }
        while next_trade < trades.len() && trades[next_trade].trade_date == day {
            state.apply_trade(&trades[next_trade], base_currency);
            next_trade += 1;
        }
    }

    state
}

fn past_cutoff(date: NaiveDate, cutoff: Option<NaiveDate>) -> bool {
    cutoff.is_some_and(|c| date > c)
}

fn ensure_sorted<'a, T: Clone>(
    items: &'a [T],
    is_sorted: fn(&[T]) -> bool,
    date_of: fn(&T) -> NaiveDate,
    label: &str,
) -> Cow<'a, [T]> {
    if is_sorted(items) {
        Cow::Borrowed(items)
    } else {
        debug!("Replay received unsorted {}; sorting before fold", label);
        let mut sorted = items.to_vec();
        sorted.sort_by_key(date_of);
        Cow::Owned(sorted)
    }
}
