//! Currency normalization and base-currency conversion.
//!
//! There is exactly one conversion direction in the engine: [`to_base`].
//! Cached FX rates are quoted as units of the non-base currency per one
//! unit of base (the convention of `{BASE}{CUR}=X` pair symbols), so
//! converting an amount into base always divides by the rate. Call sites
//! never divide or multiply by a raw rate themselves.

use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;

use crate::market_data::PriceCache;

/// Normalizes a currency code to its canonical uppercase form.
pub fn normalize_currency_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Symbol under which the rate converting `currency` into `base` is cached,
/// e.g. `fx_pair_symbol("HUF", "USD")` is `"USDHUF=X"` (HUF per USD).
pub fn fx_pair_symbol(currency: &str, base: &str) -> String {
    format!("{}{}=X", base, currency)
}

/// Converts an amount in `currency` into the base currency using the rate
/// cached for `date` (backward-filled by the cache lookup).
///
/// Returns `None` when no usable rate is cached within the fill window;
/// callers treat the amount as invisible for that day rather than failing.
pub fn to_base(
    amount: Decimal,
    currency: &str,
    base: &str,
    date: NaiveDate,
    prices: &PriceCache,
) -> Option<Decimal> {
    let currency = normalize_currency_code(currency);
    let base = normalize_currency_code(base);
    if currency == base {
        return Some(amount);
    }

    let symbol = fx_pair_symbol(&currency, &base);
    match prices.close_on_or_before(&symbol, date) {
        Some(rate) if !rate.is_zero() => Some(amount / rate),
        Some(_) => {
            warn!("Zero FX rate cached for {} on {}", symbol, date);
            None
        }
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn cache_with_rate(symbol: &str, date: NaiveDate, rate: Decimal) -> PriceCache {
        let mut cache = PriceCache::default();
        cache.insert_close(symbol, date, rate);
        cache
    }

    #[test]
    fn test_normalize_currency_code() {
        assert_eq!(normalize_currency_code(" huf "), "HUF");
        assert_eq!(normalize_currency_code("USD"), "USD");
    }

    #[test]
    fn test_fx_pair_symbol_direction() {
        assert_eq!(fx_pair_symbol("HUF", "USD"), "USDHUF=X");
        assert_eq!(fx_pair_symbol("EUR", "USD"), "USDEUR=X");
    }

    #[test]
    fn test_to_base_is_identity_for_base_currency() {
        let cache = PriceCache::default();
        let converted = to_base(dec!(250), "usd", "USD", d(2024, 1, 2), &cache);
        assert_eq!(converted, Some(dec!(250)));
    }

    #[test]
    fn test_to_base_divides_by_rate() {
        let cache = cache_with_rate("USDHUF=X", d(2024, 1, 2), dec!(360));
        let converted = to_base(dec!(36000), "HUF", "USD", d(2024, 1, 2), &cache);
        assert_eq!(converted, Some(dec!(100)));
    }

    #[test]
    fn test_to_base_backward_fills_through_cache() {
        let cache = cache_with_rate("USDEUR=X", d(2024, 1, 2), dec!(0.9));
        let converted = to_base(dec!(90), "EUR", "USD", d(2024, 1, 5), &cache);
        assert_eq!(converted, Some(dec!(100)));
    }

    #[test]
    fn test_to_base_missing_or_zero_rate_is_none() {
        let empty = PriceCache::default();
        assert_eq!(to_base(dec!(1), "EUR", "USD", d(2024, 1, 2), &empty), None);

        let zero = cache_with_rate("USDEUR=X", d(2024, 1, 2), Decimal::ZERO);
        assert_eq!(to_base(dec!(1), "EUR", "USD", d(2024, 1, 2), &zero), None);
    }
}
