//! Status rows reported by `Migrator::status`

use serde::Serialize;

/// Where a version stands relative to the bookkeeping table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationState {
    /// Known pair, recorded as applied
    Applied,
    /// Known pair, not yet applied
    Pending,
    /// Recorded as applied, but no pair with this version is known
    Unknown,
}

impl MigrationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            MigrationState::Applied => "applied",
            MigrationState::Pending => "pending",
            MigrationState::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for MigrationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the status report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationStatus {
    pub version: String,
    /// `None` for `Unknown` rows
    pub name: Option<String>,
    pub state: MigrationState,
}
