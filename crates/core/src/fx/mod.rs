//! FX (Foreign Exchange) module - currency helpers and base conversion.
//!
//! Missing or stale rates are never fatal here: lookups return `None` and
//! callers degrade, per the engine's error policy.

pub mod currency;

pub use currency::{fx_pair_symbol, normalize_currency_code, to_base};
