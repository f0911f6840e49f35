use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::activities::{CashTransaction, Trade, TradeAction};
use crate::fx::normalize_currency_code;

/// Holdings recovered from the ledger: share counts per ticker and cash
/// balances per currency.
///
/// This is working state for one sync invocation. It is never persisted;
/// resuming a sync replays the ledger to rebuild it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoldingsState {
    /// Shares held per ticker. Entries can reach zero but never go below.
    pub shares: HashMap<String, Decimal>,
    /// Cash balance per normalized currency code. Non-base balances move
    /// only through cash transactions and are signed; fees and taxes may
    /// legitimately overdraw them.
    pub cash_balances: HashMap<String, Decimal>,
}

impl HoldingsState {
    /// Applies one trade and settles it against the base-currency balance
    /// at its recorded execution price.
    ///
    /// Two floors keep incomplete ledgers from corrupting state instead of
    /// failing: a sell larger than the tracked position executes only the
    /// tracked quantity, and settlement never drives the base balance
    /// negative (a buy whose funding deposit was never recorded spends the
    /// balance down to zero, no further).
    pub fn apply_trade(&mut self, trade: &Trade, base_currency: &str) {
        let shares = self
            .shares
            .entry(trade.ticker.clone())
            .or_insert(Decimal::ZERO);
        let cash_delta = match trade.action {
            TradeAction::Buy => {
                *shares += trade.quantity;
                -(trade.quantity * trade.unit_price) - trade.fee
            }
            TradeAction::Sell => {
                let executed = trade.quantity.min(*shares);
                *shares -= executed;
                executed * trade.unit_price - trade.fee
            }
        };

        let balance = self
            .cash_balances
            .entry(normalize_currency_code(base_currency))
            .or_insert(Decimal::ZERO);
        *balance = (*balance + cash_delta).max(Decimal::ZERO);
    }

    /// Applies one cash transaction. Every type moves the balance of its
    /// currency; flow classification happens elsewhere.
    pub fn apply_cash(&mut self, transaction: &CashTransaction) {
        *self
            .cash_balances
            .entry(normalize_currency_code(&transaction.currency))
            .or_insert(Decimal::ZERO) += transaction.amount;
    }
}
