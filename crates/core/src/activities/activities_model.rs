//! Ledger domain models.
//!
//! Trades and cash transactions are immutable once past their date as far
//! as this engine is concerned; edits happen in the surrounding CRUD layer
//! and simply show up as new ledger content (with fresh `created_at`
//! stamps) on the next sync.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeAction {
    Buy,
    Sell,
}

impl TradeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeAction::Buy => "BUY",
            TradeAction::Sell => "SELL",
        }
    }
}

impl FromStr for TradeAction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "BUY" => Ok(TradeAction::Buy),
            "SELL" => Ok(TradeAction::Sell),
            _ => Err(format!("Unknown trade action: {}", s)),
        }
    }
}

/// Kind of cash movement.
///
/// Only `Deposit` and `Withdrawal` are external flows for return
/// calculation purposes; see `portfolio::performance::classify_flow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CashTransactionType {
    Deposit,
    Withdrawal,
    Dividend,
    Interest,
    Fee,
    Tax,
    Adjustment,
}

impl CashTransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CashTransactionType::Deposit => "DEPOSIT",
            CashTransactionType::Withdrawal => "WITHDRAWAL",
            CashTransactionType::Dividend => "DIVIDEND",
            CashTransactionType::Interest => "INTEREST",
            CashTransactionType::Fee => "FEE",
            CashTransactionType::Tax => "TAX",
            CashTransactionType::Adjustment => "ADJUSTMENT",
        }
    }
}

impl FromStr for CashTransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "DEPOSIT" => Ok(CashTransactionType::Deposit),
            "WITHDRAWAL" => Ok(CashTransactionType::Withdrawal),
            "DIVIDEND" => Ok(CashTransactionType::Dividend),
            "INTEREST" => Ok(CashTransactionType::Interest),
            "FEE" => Ok(CashTransactionType::Fee),
            "TAX" => Ok(CashTransactionType::Tax),
            "ADJUSTMENT" => Ok(CashTransactionType::Adjustment),
            _ => Err(format!("Unknown cash transaction type: {}", s)),
        }
    }
}

/// A buy or sell of a quantity of one ticker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: String,
    pub portfolio_id: String,
    pub ticker: String,
    pub action: TradeAction,
    /// Number of shares; always positive, direction comes from `action`.
    pub quantity: Decimal,
    /// Execution price per share in base currency. Settlement and upstream
    /// realized P&L use this; daily valuation uses the market close.
    pub unit_price: Decimal,
    /// Flat commission in base currency, deducted from cash on settlement.
    pub fee: Decimal,
    pub trade_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// A cash movement in one currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashTransaction {
    pub id: String,
    pub portfolio_id: String,
    /// ISO currency code, e.g. "USD", "EUR", "HUF".
    pub currency: String,
    /// Signed amount; the sign encodes direction (withdrawals, fees and
    /// taxes are negative).
    pub amount: Decimal,
    pub transaction_type: CashTransactionType,
    pub transaction_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Whether the slice is in ascending `trade_date` order.
pub fn trades_sorted_by_date(trades: &[Trade]) -> bool {
    trades.windows(2).all(|w| w[0].trade_date <= w[1].trade_date)
}

/// Whether the slice is in ascending `transaction_date` order.
pub fn cash_sorted_by_date(transactions: &[CashTransaction]) -> bool {
    transactions
        .windows(2)
        .all(|w| w[0].transaction_date <= w[1].transaction_date)
}
