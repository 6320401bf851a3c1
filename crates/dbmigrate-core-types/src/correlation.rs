//! Correlation id for a single migrator run
//!
//! Every orchestrator call (apply all, apply one, rollback, status) opens a
//! span tagged with a fresh `RunId`, so the per-migration events it emits can
//! be grouped back together in JSON logs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for one orchestrator invocation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(String);

impl RunId {
    /// Generate a new RunId using UUIDv7 (time ordered)
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_id_generation() {
        let id1 = RunId::new();
        let id2 = RunId::new();

        assert_ne!(id1, id2);
        assert!(!id1.as_str().is_empty());
    }

    #[test]
    fn test_run_id_display() {
        let id = RunId::new();
        assert_eq!(format!("{}", id), id.as_str());
    }

    #[test]
    fn test_run_id_from_string() {
        let id = RunId::from_string("run-1".to_string());
        assert_eq!(id.as_str(), "run-1");
    }

    #[test]
    fn test_serialization() {
        let id = RunId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: RunId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
