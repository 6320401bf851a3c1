//! Migration orchestrator
//!
//! `Migrator` holds an immutable, version-sorted snapshot of every known
//! migration pair and drives a `VendorAdapter` through apply and rollback.
//! The set of applied versions is re-read from the adapter on every call, so
//! the migrator stays correct when the bookkeeping table changes between
//! calls.
//!
//! Ordering rules:
//! - pending = known versions minus applied versions, always applied in
//!   ascending version order (plain string comparison)
//! - rollback touches exactly one migration: the highest known version that
//!   is recorded as applied

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use dbmigrate_core_types::RunId;
use tracing::{debug, info, info_span, Span};

use crate::errors::{MigrateError, Result};
use crate::model::MigrationPair;
use crate::ports::{MigrationStorage, VendorAdapter};
use crate::status::{MigrationState, MigrationStatus};
use crate::{log_op_end, log_op_error, log_op_start};

/// Applies and rolls back migration pairs against one adapter
pub struct Migrator<A> {
    adapter: A,
    sorted_pairs: Vec<MigrationPair>,
    /// version -> position in `sorted_pairs`
    index: HashMap<String, usize>,
}

impl<A: VendorAdapter> Migrator<A> {
    /// Load every pair from `storage` and build the sorted snapshot.
    ///
    /// Storage is read exactly once; later calls never rescan it.
    ///
    /// # Errors
    ///
    /// Storage errors are returned unchanged. Pairs with an empty version
    /// or blank body, and two pairs sharing a version, are load errors.
    pub fn new<S>(adapter: A, storage: &S) -> Result<Self>
    where
        S: MigrationStorage + ?Sized,
    {
        let mut pairs = storage.migration_pairs()?;
        for pair in &pairs {
            pair.validate()?;
        }
        pairs.sort_by(|a, b| a.version().cmp(b.version()));

        let mut index = HashMap::with_capacity(pairs.len());
        for (position, pair) in pairs.iter().enumerate() {
            if index.insert(pair.version().to_string(), position).is_some() {
                return Err(MigrateError::DuplicateVersion {
                    version: pair.version().to_string(),
                }
                .into());
            }
        }

        debug!(
            vendor = adapter.vendor(),
            known_len = pairs.len(),
            "loaded migration pairs"
        );

        Ok(Self {
            adapter,
            sorted_pairs: pairs,
            index,
        })
    }

    /// Apply every pending migration in ascending version order.
    ///
    /// Stops at the first failure; migrations applied earlier in the same
    /// call stay applied. Calling again resumes from the failed version.
    ///
    /// Returns the versions applied by this call, in application order.
    ///
    /// # Errors
    ///
    /// The first adapter error, unchanged.
    pub fn apply_all(&mut self) -> Result<Vec<String>> {
        self.run_apply("apply_all", None)
    }

    /// Apply only the lowest pending version, if there is one.
    ///
    /// # Errors
    ///
    /// The adapter error, unchanged.
    pub fn apply_one(&mut self) -> Result<Option<String>> {
        self.run_apply("apply_one", Some(1))
            .map(|applied| applied.into_iter().next())
    }

    /// Roll back the most recently applied known migration.
    ///
    /// A no-op returning `Ok(None)` when no known version is applied.
    ///
    /// # Errors
    ///
    /// The adapter error, unchanged.
    pub fn rollback_latest(&mut self) -> Result<Option<String>> {
        let op = "rollback_latest";
        let span = self.run_span(op);
        let _guard = span.enter();
        let start = Instant::now();
        log_op_start!(op);

        let result = self.rollback_latest_inner();

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(rolled_back) => {
                log_op_end!(
                    op,
                    duration_ms = duration_ms,
                    version = rolled_back.as_deref().unwrap_or("")
                );
            }
            Err(err) => log_op_error!(op, err, duration_ms = duration_ms),
        }
        result
    }

    /// Pending pairs in the order `apply_all` would apply them.
    ///
    /// Read only: queries the adapter, executes nothing.
    ///
    /// # Errors
    ///
    /// The adapter error, unchanged.
    pub fn pending(&mut self) -> Result<Vec<&MigrationPair>> {
        let applied = self.adapter.applied_migrations_asc()?;
        let positions = self.pending_positions(&applied);
        Ok(positions
            .into_iter()
            .map(|position| &self.sorted_pairs[position])
            .collect())
    }

    /// Applied/pending state of every known pair, plus any applied version
    /// with no known pair, ascending by version.
    ///
    /// # Errors
    ///
    /// The adapter error, unchanged.
    pub fn status(&mut self) -> Result<Vec<MigrationStatus>> {
        let applied = self.adapter.applied_migrations_asc()?;
        let applied_set: HashSet<&str> = applied.iter().map(String::as_str).collect();

        let mut rows: Vec<MigrationStatus> = self
            .sorted_pairs
            .iter()
            .map(|pair| MigrationStatus {
                version: pair.version().to_string(),
                name: Some(pair.name().to_string()),
                state: if applied_set.contains(pair.version()) {
                    MigrationState::Applied
                } else {
                    MigrationState::Pending
                },
            })
            .collect();

        rows.extend(
            applied
                .iter()
                .filter(|version| !self.index.contains_key(version.as_str()))
                .map(|version| MigrationStatus {
                    version: version.clone(),
                    name: None,
                    state: MigrationState::Unknown,
                }),
        );
        rows.sort_by(|a, b| a.version.cmp(&b.version));

        Ok(rows)
    }

    /// Known pairs, ascending by version
    pub fn migrations(&self) -> &[MigrationPair] {
        &self.sorted_pairs
    }

    /// Look up a known pair by version
    pub fn migration(&self, version: &str) -> Option<&MigrationPair> {
        self.index
            .get(version)
            .map(|&position| &self.sorted_pairs[position])
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    pub fn into_adapter(self) -> A {
        self.adapter
    }

    fn run_span(&self, op: &'static str) -> Span {
        info_span!(
            "migrator",
            op = op,
            run_id = %RunId::new(),
            vendor = self.adapter.vendor()
        )
    }

    fn run_apply(&mut self, op: &'static str, limit: Option<usize>) -> Result<Vec<String>> {
        let span = self.run_span(op);
        let _guard = span.enter();
        let start = Instant::now();
        log_op_start!(op);

        let result = self.apply_pending(limit);

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(applied) => {
                log_op_end!(op, duration_ms = duration_ms, applied_len = applied.len());
            }
            Err(err) => log_op_error!(op, err, duration_ms = duration_ms),
        }
        result
    }

    fn apply_pending(&mut self, limit: Option<usize>) -> Result<Vec<String>> {
        let applied_versions = self.adapter.applied_migrations_asc()?;
        let pending = self.pending_positions(&applied_versions);
        debug!(
            applied_len = applied_versions.len(),
            pending_len = pending.len(),
            "computed pending migrations"
        );

        let mut applied = Vec::new();
        for position in pending.into_iter().take(limit.unwrap_or(usize::MAX)) {
            let pair = &self.sorted_pairs[position];
            info!(
                version = pair.version(),
                name = pair.name(),
                "applying migration"
            );
            self.adapter.apply_migration(pair)?;
            applied.push(pair.version().to_string());
        }
        Ok(applied)
    }

    fn rollback_latest_inner(&mut self) -> Result<Option<String>> {
        let applied: HashSet<String> = self.adapter.applied_migrations_asc()?.into_iter().collect();

        let Some(pair) = self
            .sorted_pairs
            .iter()
            .rev()
            .find(|pair| applied.contains(pair.version()))
        else {
            debug!(applied_len = applied.len(), "no known migration is applied");
            return Ok(None);
        };

        info!(
            version = pair.version(),
            name = pair.name(),
            "rolling back migration"
        );
        self.adapter.rollback_migration(pair)?;
        Ok(Some(pair.version().to_string()))
    }

    /// Positions of pending pairs, sorted ascending by version.
    ///
    /// The difference is taken over the hash index, whose iteration order is
    /// arbitrary, so the explicit sort is what fixes the application order.
    fn pending_positions(&self, applied: &[String]) -> Vec<usize> {
        let applied: HashSet<&str> = applied.iter().map(String::as_str).collect();
        let mut pending: Vec<&str> = self
            .index
            .keys()
            .map(String::as_str)
            .filter(|version| !applied.contains(version))
            .collect();
        pending.sort_unstable();
        pending
            .into_iter()
            .filter_map(|version| self.index.get(version).copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ExError, ExErrorKind};

    struct NullAdapter {
        applied: Vec<String>,
    }

    impl VendorAdapter for NullAdapter {
        fn vendor(&self) -> &'static str {
            "null"
        }

        fn applied_migrations_asc(&mut self) -> Result<Vec<String>> {
            Ok(self.applied.clone())
        }

        fn apply_migration(&mut self, _pair: &MigrationPair) -> Result<()> {
            Ok(())
        }

        fn rollback_migration(&mut self, _pair: &MigrationPair) -> Result<()> {
            Ok(())
        }
    }

    struct VecStorage(Vec<MigrationPair>);

    impl MigrationStorage for VecStorage {
        fn migration_pairs(&self) -> Result<Vec<MigrationPair>> {
            Ok(self.0.clone())
        }
    }

    fn pair(version: &str) -> MigrationPair {
        MigrationPair::new(version, "m", "SELECT 1", "SELECT 0")
    }

    fn migrator(versions: &[&str], applied: &[&str]) -> Migrator<NullAdapter> {
        let storage = VecStorage(versions.iter().map(|v| pair(v)).collect());
        let adapter = NullAdapter {
            applied: applied.iter().map(|v| v.to_string()).collect(),
        };
        Migrator::new(adapter, &storage).unwrap()
    }

    #[test]
    fn test_new_sorts_by_version() {
        let m = migrator(&["02", "01", "10"], &[]);
        let versions: Vec<&str> = m.migrations().iter().map(|p| p.version()).collect();
        assert_eq!(versions, vec!["01", "02", "10"]);
    }

    #[test]
    fn test_pending_positions_sorted() {
        let m = migrator(&["005", "003", "001", "004", "002"], &["002", "003"]);
        let positions = m.pending_positions(&["002".to_string(), "003".to_string()]);
        let versions: Vec<&str> = positions
            .into_iter()
            .map(|p| m.migrations()[p].version())
            .collect();
        assert_eq!(versions, vec!["001", "004", "005"]);
    }

    #[test]
    fn test_duplicate_version_rejected() {
        let storage = VecStorage(vec![pair("001"), pair("001")]);
        let err = Migrator::new(NullAdapter { applied: vec![] }, &storage)
            .err()
            .unwrap();
        assert_eq!(err.kind(), ExErrorKind::DuplicateVersion);
        assert_eq!(err.version(), Some("001"));
    }

    #[test]
    fn test_storage_error_propagates() {
        struct FailingStorage;
        impl MigrationStorage for FailingStorage {
            fn migration_pairs(&self) -> Result<Vec<MigrationPair>> {
                Err(ExError::new(ExErrorKind::Io).with_message("disk gone"))
            }
        }

        let err = Migrator::new(NullAdapter { applied: vec![] }, &FailingStorage)
            .err()
            .unwrap();
        assert_eq!(err.kind(), ExErrorKind::Io);
        assert_eq!(err.message(), "disk gone");
    }

    #[test]
    fn test_migration_lookup() {
        let m = migrator(&["001", "002"], &[]);
        assert_eq!(m.migration("002").map(|p| p.version()), Some("002"));
        assert!(m.migration("003").is_none());
    }
}
