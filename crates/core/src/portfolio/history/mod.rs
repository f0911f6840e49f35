//! Computed history rows and their persistence contract.

mod history_model;
mod history_traits;

pub use history_model::*;
pub use history_traits::*;
