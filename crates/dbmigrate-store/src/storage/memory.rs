use std::collections::HashSet;

use dbmigrate_core::errors::{MigrateError, Result};
use dbmigrate_core::model::MigrationPair;
use dbmigrate_core::ports::MigrationStorage;

/// Migrations held in memory
///
/// Typical use is shipping migrations inside the binary:
///
/// ```
/// use dbmigrate_store::MemoryStorage;
///
/// let storage = MemoryStorage::default()
///     .with_pair("001", "init", "CREATE TABLE t (id INTEGER)", "DROP TABLE t")
///     .with_pair("002", "seed", "INSERT INTO t VALUES (1)", "DELETE FROM t");
/// assert_eq!(storage.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    pairs: Vec<MigrationPair>,
}

impl MemoryStorage {
    pub fn new(pairs: Vec<MigrationPair>) -> Self {
        Self { pairs }
    }

    pub fn with_pair(
        mut self,
        version: impl Into<String>,
        name: impl Into<String>,
        apply_body: impl Into<String>,
        rollback_body: impl Into<String>,
    ) -> Self {
        self.pairs
            .push(MigrationPair::new(version, name, apply_body, rollback_body));
        self
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl MigrationStorage for MemoryStorage {
    fn migration_pairs(&self) -> Result<Vec<MigrationPair>> {
        let mut seen = HashSet::with_capacity(self.pairs.len());
        for pair in &self.pairs {
            pair.validate()?;
            if !seen.insert(pair.version()) {
                return Err(MigrateError::DuplicateVersion {
                    version: pair.version().to_string(),
                }
                .into());
            }
        }
        Ok(self.pairs.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbmigrate_core::errors::ExErrorKind;

    #[test]
    fn test_returns_clones_in_insertion_order() {
        let storage = MemoryStorage::default()
            .with_pair("002", "b", "SELECT 2", "SELECT 0")
            .with_pair("001", "a", "SELECT 1", "SELECT 0");
        let pairs = storage.migration_pairs().unwrap();
        let versions: Vec<&str> = pairs.iter().map(|p| p.version()).collect();
        assert_eq!(versions, vec!["002", "001"]);
        assert_eq!(storage.len(), 2);
    }

    #[test]
    fn test_blank_body_rejected() {
        let storage = MemoryStorage::default().with_pair("001", "a", "SELECT 1", "");
        let err = storage.migration_pairs().unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::EmptyBody);
    }

    #[test]
    fn test_duplicate_version_rejected() {
        let storage = MemoryStorage::new(vec![
            MigrationPair::new("001", "a", "SELECT 1", "SELECT 0"),
            MigrationPair::new("001", "b", "SELECT 1", "SELECT 0"),
        ]);
        let err = storage.migration_pairs().unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::DuplicateVersion);
    }
}
