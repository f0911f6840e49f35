//! Market data domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One daily closing price for a symbol.
///
/// Series are sparse: non-trading days (weekends, holidays, provider gaps)
/// simply have no bar.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBar {
    /// Calendar date of the close.
    pub date: NaiveDate,

    /// Closing price on that date, in the symbol's quote currency.
    pub close: Decimal,
}

impl PriceBar {
    pub fn new(date: NaiveDate, close: Decimal) -> Self {
        Self { date, close }
    }
}
