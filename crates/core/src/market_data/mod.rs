//! Market data access for the engine - the per-run price cache.
//!
//! Provider-agnostic fetch types live in the `foliotrack-market-data`
//! crate; this module owns the cache one sync run builds from them.

mod price_cache;

pub use price_cache::{PriceCache, PriceCacheBuilder, PriceCachePlan};

// Re-export the provider-facing types so engine callers need one import path.
pub use foliotrack_market_data::{MarketDataError, MarketDataProviderTrait, PriceBar};
