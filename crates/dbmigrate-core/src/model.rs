//! Migration model
//!
//! A `MigrationPair` is the unit the orchestrator works with: one version,
//! a human label, and the two SQL bodies that move the schema forward and
//! back. Pairs are immutable once built.

use crate::errors::{MigrateError, Result};
use serde::Serialize;

/// Which half of a migration pair a body (or file) belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationRole {
    Apply,
    Rollback,
}

impl MigrationRole {
    /// The role token as it appears in migration file names
    pub fn as_str(&self) -> &'static str {
        match self {
            MigrationRole::Apply => "apply",
            MigrationRole::Rollback => "rollback",
        }
    }
}

impl std::fmt::Display for MigrationRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A matched apply/rollback pair sharing one version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationPair {
    version: String,
    name: String,
    apply_body: String,
    rollback_body: String,
}

impl MigrationPair {
    pub fn new(
        version: impl Into<String>,
        name: impl Into<String>,
        apply_body: impl Into<String>,
        rollback_body: impl Into<String>,
    ) -> Self {
        Self {
            version: version.into(),
            name: name.into(),
            apply_body: apply_body.into(),
            rollback_body: rollback_body.into(),
        }
    }

    /// Version identifier; pairs are ordered by plain string comparison on it
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Human label, not required to be unique
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply_body(&self) -> &str {
        &self.apply_body
    }

    pub fn rollback_body(&self) -> &str {
        &self.rollback_body
    }

    /// Body for the given role
    pub fn body(&self, role: MigrationRole) -> &str {
        match role {
            MigrationRole::Apply => &self.apply_body,
            MigrationRole::Rollback => &self.rollback_body,
        }
    }

    /// Check the load-time invariants: a non-empty version and two
    /// non-blank bodies.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an empty version, `EmptyBody` for a blank body.
    pub fn validate(&self) -> Result<()> {
        if self.version.is_empty() {
            return Err(MigrateError::EmptyVersion {
                name: self.name.clone(),
            }
            .into());
        }
        for role in [MigrationRole::Apply, MigrationRole::Rollback] {
            if self.body(role).trim().is_empty() {
                return Err(MigrateError::EmptyBody {
                    version: self.version.clone(),
                    role,
                }
                .into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;

    #[test]
    fn test_accessors() {
        let pair = MigrationPair::new("001", "init", "CREATE TABLE t (id INT)", "DROP TABLE t");
        assert_eq!(pair.version(), "001");
        assert_eq!(pair.name(), "init");
        assert_eq!(pair.body(MigrationRole::Apply), "CREATE TABLE t (id INT)");
        assert_eq!(pair.body(MigrationRole::Rollback), "DROP TABLE t");
    }

    #[test]
    fn test_validate_accepts_complete_pair() {
        let pair = MigrationPair::new("001", "init", "SELECT 1", "SELECT 2");
        assert!(pair.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_rollback() {
        let pair = MigrationPair::new("002", "users", "CREATE TABLE u (id INT)", "  \n");
        let err = pair.validate().unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::EmptyBody);
        assert_eq!(err.version(), Some("002"));
        assert!(err.message().contains("rollback"));
    }

    #[test]
    fn test_validate_rejects_empty_version() {
        let pair = MigrationPair::new("", "nameless", "SELECT 1", "SELECT 2");
        let err = pair.validate().unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    }

    #[test]
    fn test_role_tokens() {
        assert_eq!(MigrationRole::Apply.as_str(), "apply");
        assert_eq!(MigrationRole::Rollback.to_string(), "rollback");
    }
}
