//! Daily return arithmetic for time-weighted return compounding.

use rust_decimal::Decimal;

/// Flow-adjusted daily return in the Modified Dietz style.
///
/// The denominator is the previous day's total value plus today's external
/// flow, so a deposit does not read as a gain: depositing into an otherwise
/// flat portfolio yields a return of zero, not +100%.
///
/// A non-positive denominator (empty portfolio, or a withdrawal exceeding
/// yesterday's value) yields zero rather than a meaningless ratio.
pub fn daily_flow_adjusted_return(
    total_value_today: Decimal,
    previous_total_value: Decimal,
    external_flow_today: Decimal,
) -> Decimal {
    let denominator = previous_total_value + external_flow_today;
    if denominator > Decimal::ZERO {
        (total_value_today - denominator) / denominator
    } else {
        Decimal::ZERO
    }
}
