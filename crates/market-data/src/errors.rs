//! Error types for market data operations.

use thiserror::Error;

/// Errors surfaced by market data providers.
///
/// These are deliberately coarse: the engine treats any per-symbol failure
/// as "data unavailable for this run" and degrades instead of retrying.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The provider call itself failed (network, auth, rate limit, ...).
    #[error("Provider request failed: {0}")]
    Provider(String),

    /// The provider answered but returned no usable data for the symbol.
    #[error("No data returned for symbol: {0}")]
    NoData(String),

    /// The symbol is not something the provider can resolve.
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Anything else.
    #[error("Unexpected market data error: {0}")]
    Unexpected(String),
}
