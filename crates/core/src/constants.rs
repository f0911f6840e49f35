/// Maximum number of calendar days a price lookup may search backward when
/// the requested date has no close.
pub const PRICE_BACKFILL_MAX_DAYS: i64 = 7;

/// Extra days of history fetched before the computation window. One day for
/// the previous-total-value denominator of the first computed day, plus the
/// backfill window so that leading day can itself fill across a weekend.
pub const PRICE_FETCH_LOOKBACK_DAYS: i64 = PRICE_BACKFILL_MAX_DAYS + 1;

/// Default base currency for portfolio valuation.
pub const DEFAULT_BASE_CURRENCY: &str = "USD";

/// Default benchmark index symbol.
pub const DEFAULT_BENCHMARK_SYMBOL: &str = "^GSPC";
