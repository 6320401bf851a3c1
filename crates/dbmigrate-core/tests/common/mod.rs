use dbmigrate_core::{
    ExError, ExErrorKind, MigrationPair, MigrationStorage, Result, VendorAdapter,
};

/// Storage fixture returning a fixed, deliberately unsorted set of pairs
pub struct FixtureStorage {
    pub pairs: Vec<MigrationPair>,
}

impl MigrationStorage for FixtureStorage {
    fn migration_pairs(&self) -> Result<Vec<MigrationPair>> {
        Ok(self.pairs.clone())
    }
}

/// Versions 001..005, shuffled
#[allow(dead_code)]
pub fn storage_with_migrations() -> FixtureStorage {
    storage_with_versions(&["004", "003", "002", "005", "001"])
}

#[allow(dead_code)]
pub fn storage_with_versions(versions: &[&str]) -> FixtureStorage {
    FixtureStorage {
        pairs: versions.iter().map(|v| pair(v)).collect(),
    }
}

pub fn pair(version: &str) -> MigrationPair {
    MigrationPair::new(
        version,
        format!("migration_{}", version),
        format!("-- apply {}", version),
        format!("-- rollback {}", version),
    )
}

/// Adapter double that keeps an in-memory bookkeeping table and records
/// every call the orchestrator makes.
#[derive(Default)]
pub struct RecordingAdapter {
    /// Simulated bookkeeping table
    pub applied_versions: Vec<String>,
    pub applied_pairs: Vec<MigrationPair>,
    pub rolled_back_pairs: Vec<MigrationPair>,
    pub fail_apply_on: Option<String>,
    pub fail_rollback_on: Option<String>,
    pub fail_query: bool,
    pub queries: usize,
}

impl RecordingAdapter {
    #[allow(dead_code)]
    pub fn with_applied(versions: &[&str]) -> Self {
        Self {
            applied_versions: versions.iter().map(|v| v.to_string()).collect(),
            ..Self::default()
        }
    }

    #[allow(dead_code)]
    pub fn applied_order(&self) -> Vec<&str> {
        self.applied_pairs.iter().map(|p| p.version()).collect()
    }

    #[allow(dead_code)]
    pub fn rolled_back_order(&self) -> Vec<&str> {
        self.rolled_back_pairs.iter().map(|p| p.version()).collect()
    }
}

impl VendorAdapter for RecordingAdapter {
    fn vendor(&self) -> &'static str {
        "recording"
    }

    fn applied_migrations_asc(&mut self) -> Result<Vec<String>> {
        self.queries += 1;
        if self.fail_query {
            return Err(ExError::new(ExErrorKind::Connection)
                .with_op("applied_migrations")
                .with_message("connection refused"));
        }
        let mut versions = self.applied_versions.clone();
        versions.sort();
        Ok(versions)
    }

    fn apply_migration(&mut self, pair: &MigrationPair) -> Result<()> {
        if self.fail_apply_on.as_deref() == Some(pair.version()) {
            return Err(ExError::new(ExErrorKind::Persistence)
                .with_op("apply_migration")
                .with_version(pair.version())
                .with_message("syntax error near CREATE"));
        }
        self.applied_pairs.push(pair.clone());
        self.applied_versions.push(pair.version().to_string());
        Ok(())
    }

    fn rollback_migration(&mut self, pair: &MigrationPair) -> Result<()> {
        if self.fail_rollback_on.as_deref() == Some(pair.version()) {
            return Err(ExError::new(ExErrorKind::Persistence)
                .with_op("rollback_migration")
                .with_version(pair.version())
                .with_message("table is locked"));
        }
        self.rolled_back_pairs.push(pair.clone());
        self.applied_versions.retain(|v| v != pair.version());
        Ok(())
    }
}
