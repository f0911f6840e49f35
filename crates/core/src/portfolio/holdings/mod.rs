//! In-memory holdings and the ledger replay fold.

mod holdings_model;
mod holdings_replay;

pub use holdings_model::HoldingsState;
pub use holdings_replay::replay_ledger;
