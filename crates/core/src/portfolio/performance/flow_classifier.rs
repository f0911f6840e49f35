//! Flow classification for the time-weighted return calculation.
//!
//! Only external flows (money crossing the portfolio boundary) are
//! subtracted out of the daily return denominator. Internal events are
//! already reflected in the valuation through cash balance changes.

use crate::activities::CashTransactionType;

/// Flow type for return calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowType {
    /// Money crossing the portfolio boundary. Adjusts the daily return
    /// denominator and accrues into cost basis.
    External,

    /// Money moving within the portfolio. Changes cash balances only.
    Internal,
}

/// Classify a cash transaction for return calculation.
///
/// External flows:
/// - DEPOSIT, WITHDRAWAL (money entering/leaving the portfolio)
///
/// Internal flows:
/// - DIVIDEND, INTEREST (investment income landing in cash)
/// - FEE, TAX (deductions from existing money)
/// - ADJUSTMENT (corrections, not new money)
pub fn classify_flow(transaction_type: CashTransactionType) -> FlowType {
    match transaction_type {
        CashTransactionType::Deposit | CashTransactionType::Withdrawal => FlowType::External,
        CashTransactionType::Dividend
        | CashTransactionType::Interest
        | CashTransactionType::Fee
        | CashTransactionType::Tax
        | CashTransactionType::Adjustment => FlowType::Internal,
    }
}

/// Check if a cash transaction is an external flow.
pub fn is_external_flow(transaction_type: CashTransactionType) -> bool {
    classify_flow(transaction_type) == FlowType::External
}
