//! Incremental history sync - resume resolution, the daily state iterator,
//! and the orchestrating service.

mod history_calculator;
mod sync_model;
mod sync_resolver;
mod sync_service;

pub use history_calculator::calculate_history_rows;
pub use sync_model::{SyncOutcome, SyncStatus};
pub use sync_resolver::{
    has_activity_created_after, inception_date, resolve_sync_start, SyncStart,
};
pub use sync_service::{PortfolioSyncService, PortfolioSyncServiceTrait};

#[cfg(test)]
mod history_calculator_tests;
