//! Core error types for the foliotrack engine.
//!
//! This module defines storage-agnostic error types. Storage-specific errors
//! (from whatever database backs the repositories) are converted to these
//! types by the storage layer.
//!
//! Only ledger reads, history reads, and the final upsert can abort a sync.
//! Market data problems are degraded locally during the history calculation
//! and never surface as an `Error` there; the `MarketData` variant exists
//! for provider implementations that need to travel through engine results.

use thiserror::Error;

use foliotrack_market_data::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Input validation failed: {0}")]
    Validation(String),

    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),
}
