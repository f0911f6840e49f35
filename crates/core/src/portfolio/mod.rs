pub mod history;
pub mod holdings;
pub mod performance;
pub mod sync;
