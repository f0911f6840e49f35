//! Activity ledger - trades, cash transactions, and the loader contract.

mod activities_model;
mod activities_traits;

pub use activities_model::*;
pub use activities_traits::*;
