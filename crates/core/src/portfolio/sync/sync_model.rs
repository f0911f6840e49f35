use serde::{Deserialize, Serialize};

/// Outcome category of one sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SyncStatus {
    /// New rows were computed and written.
    Synced,
    /// Stored history already covers every computable day.
    UpToDate,
    /// The portfolio has no ledger activity to compute from.
    NoActivity,
}

/// Caller-visible result of `sync_portfolio_history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutcome {
    pub status: SyncStatus,
    pub message: String,
    pub days_synced: Option<usize>,
}

impl SyncOutcome {
    pub fn synced(days: usize) -> Self {
        Self {
            status: SyncStatus::Synced,
            message: format!("Synced {} day(s) of portfolio history", days),
            days_synced: Some(days),
        }
    }

    pub fn up_to_date() -> Self {
        Self {
            status: SyncStatus::UpToDate,
            message: "History already up to date".to_string(),
            days_synced: None,
        }
    }

    pub fn no_new_gaps() -> Self {
        Self {
            status: SyncStatus::UpToDate,
            message: "No new gaps to sync".to_string(),
            days_synced: None,
        }
    }

    pub fn no_activity() -> Self {
        Self {
            status: SyncStatus::NoActivity,
            message: "No ledger activity to compute history from".to_string(),
            days_synced: None,
        }
    }
}
