//! Capability traits the orchestrator is written against
//!
//! Backends implement `VendorAdapter`; migration sources implement
//! `MigrationStorage`. The orchestrator never branches on which
//! implementation it was handed.

use crate::errors::Result;
use crate::model::MigrationPair;

/// A database backend able to run migration bodies and keep the
/// bookkeeping table of applied versions.
///
/// Implementations own their connection exclusively and are expected to
/// have created the bookkeeping table (idempotently) during construction.
pub trait VendorAdapter {
    /// Short backend name used in log fields (`sqlite`, `postgres`, ...)
    fn vendor(&self) -> &'static str;

    /// Versions currently recorded in the bookkeeping table, ascending.
    ///
    /// # Errors
    ///
    /// Connectivity or query failures from the backend.
    fn applied_migrations_asc(&mut self) -> Result<Vec<String>>;

    /// Execute the apply body, then record the version.
    ///
    /// A failing body must be reported before any bookkeeping row is written.
    ///
    /// # Errors
    ///
    /// SQL failures from either the body or the bookkeeping insert.
    fn apply_migration(&mut self, pair: &MigrationPair) -> Result<()>;

    /// Execute the rollback body, then delete the version's record.
    ///
    /// # Errors
    ///
    /// SQL failures from either the body or the bookkeeping delete.
    fn rollback_migration(&mut self, pair: &MigrationPair) -> Result<()>;
}

impl<A: VendorAdapter + ?Sized> VendorAdapter for Box<A> {
    fn vendor(&self) -> &'static str {
        (**self).vendor()
    }

    fn applied_migrations_asc(&mut self) -> Result<Vec<String>> {
        (**self).applied_migrations_asc()
    }

    fn apply_migration(&mut self, pair: &MigrationPair) -> Result<()> {
        (**self).apply_migration(pair)
    }

    fn rollback_migration(&mut self, pair: &MigrationPair) -> Result<()> {
        (**self).rollback_migration(pair)
    }
}

/// A source of migration pairs (directory, embedded set, test fixture)
pub trait MigrationStorage {
    /// All known pairs, in no particular order.
    ///
    /// Half pairs (apply without rollback or the reverse) are reported here
    /// as errors, never returned.
    ///
    /// # Errors
    ///
    /// Load failures: unreadable source, incomplete or duplicate pairs.
    fn migration_pairs(&self) -> Result<Vec<MigrationPair>>;
}
