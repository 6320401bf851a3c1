#![allow(clippy::result_large_err)]

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use dbmigrate_core::errors::{ExError, MigrateError, Result};
use dbmigrate_core::model::{MigrationPair, MigrationRole};
use dbmigrate_core::ports::MigrationStorage;
use tracing::{debug, trace};

use super::file_name::MigrationFileName;
use crate::errors::io_error;

/// Extension used for scaffolded files
const SCAFFOLD_EXTENSION: &str = "sql";

/// Migrations stored as a flat directory of SQL files
///
/// Each version needs exactly one `-apply` and one `-rollback` file:
///
/// ```text
/// migrations/
///   001-init-apply.sql
///   001-init-rollback.sql
///   002-add_users-apply.sql
///   002-add_users-rollback.sql
/// ```
///
/// Sub-directories and files that do not match the pattern are ignored.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
    file_names: MigrationFileName,
}

/// One version's files as they are discovered
#[derive(Default)]
struct PartialPair {
    name: String,
    /// (file name, body)
    apply: Option<(String, String)>,
    rollback: Option<(String, String)>,
}

impl FileStorage {
    /// # Errors
    ///
    /// `Internal` if the file-name matcher cannot be built.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            dir: dir.into(),
            file_names: MigrationFileName::new()?,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// A fresh version from the current UTC time, `YYYYMMDDHHMMSS`
    pub fn next_version() -> String {
        chrono::Utc::now().format("%Y%m%d%H%M%S").to_string()
    }

    /// Write an empty apply/rollback pair for `version` and `name`.
    ///
    /// Creates the directory if needed. Neither file is written if either
    /// already exists.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the version or name would not parse back from the
    ///   generated file name
    /// - `AlreadyExists` if either file exists
    /// - `Io` on filesystem failures
    pub fn create_pair(&self, version: &str, name: &str) -> Result<(PathBuf, PathBuf)> {
        if !self.file_names.is_valid_version(version) {
            return Err(MigrateError::InvalidMigrationName {
                field: "version",
                value: version.to_string(),
            }
            .into());
        }
        if !self.file_names.is_valid_name(name) {
            return Err(MigrateError::InvalidMigrationName {
                field: "name",
                value: name.to_string(),
            }
            .into());
        }

        let apply_file = MigrationFileName::format(version, name, MigrationRole::Apply, SCAFFOLD_EXTENSION);
        // Separators are shared by version and name, so "001" + "2-x" would
        // read back as "001-2" + "x"
        let round_trips = self
            .file_names
            .parse(&apply_file)
            .is_some_and(|parsed| parsed.version == version && parsed.name == name);
        if !round_trips {
            return Err(MigrateError::InvalidMigrationName {
                field: "name",
                value: name.to_string(),
            }
            .into());
        }

        let rollback_file =
            MigrationFileName::format(version, name, MigrationRole::Rollback, SCAFFOLD_EXTENSION);
        let apply_path = self.dir.join(apply_file);
        let rollback_path = self.dir.join(rollback_file);

        for path in [&apply_path, &rollback_path] {
            if path.exists() {
                return Err(MigrateError::MigrationFileExists {
                    path: path.display().to_string(),
                }
                .into());
            }
        }

        fs::create_dir_all(&self.dir).map_err(|e| io_error("create_migration", &self.dir, e))?;
        for (path, role) in [
            (&apply_path, MigrationRole::Apply),
            (&rollback_path, MigrationRole::Rollback),
        ] {
            write_new(path, &scaffold_body(version, name, role))?;
        }

        debug!(version = version, name = name, dir = %self.dir.display(), "created migration pair");
        Ok((apply_path, rollback_path))
    }

    /// Regular files in the directory, sorted by path
    fn sorted_entries(&self) -> Result<Vec<PathBuf>> {
        let op = "load_migrations";
        let metadata = fs::metadata(&self.dir).map_err(|e| io_error(op, &self.dir, e))?;
        if !metadata.is_dir() {
            return Err(MigrateError::NotADirectory {
                path: self.dir.display().to_string(),
            }
            .into());
        }

        let mut entries = fs::read_dir(&self.dir)
            .map_err(|e| io_error(op, &self.dir, e))?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<io::Result<Vec<_>>>()
            .map_err(|e| io_error(op, &self.dir, e))?;
        entries.retain(|path| path.is_file());
        entries.sort();
        Ok(entries)
    }
}

impl MigrationStorage for FileStorage {
    fn migration_pairs(&self) -> Result<Vec<MigrationPair>> {
        let mut partial: BTreeMap<String, PartialPair> = BTreeMap::new();

        for path in self.sorted_entries()? {
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(parsed) = self.file_names.parse(file_name) else {
                trace!(file = file_name, "skipping non-migration file");
                continue;
            };

            let body =
                fs::read_to_string(&path).map_err(|e| io_error("read_migration", &path, e))?;

            let entry = partial
                .entry(parsed.version.clone())
                .or_insert_with(|| PartialPair {
                    name: parsed.name.clone(),
                    ..PartialPair::default()
                });
            let slot = match parsed.role {
                MigrationRole::Apply => &mut entry.apply,
                MigrationRole::Rollback => &mut entry.rollback,
            };
            if let Some((first, _)) = slot {
                return Err(MigrateError::DuplicateMigrationFile {
                    version: parsed.version,
                    role: parsed.role,
                    first: first.clone(),
                    second: file_name.to_string(),
                }
                .into());
            }
            *slot = Some((file_name.to_string(), body));
        }

        let mut pairs = Vec::with_capacity(partial.len());
        for (version, found) in partial {
            let Some((_, apply_body)) = found.apply else {
                return Err(MigrateError::ApplyNotFound { version }.into());
            };
            let Some((_, rollback_body)) = found.rollback else {
                return Err(MigrateError::RollbackNotFound { version }.into());
            };
            let pair = MigrationPair::new(version, found.name, apply_body, rollback_body);
            pair.validate()?;
            pairs.push(pair);
        }

        debug!(dir = %self.dir.display(), known_len = pairs.len(), "read migration directory");
        Ok(pairs)
    }
}

fn scaffold_body(version: &str, name: &str, role: MigrationRole) -> String {
    format!(
        "-- Migration: {}\n-- Version: {}\n-- Role: {}\n",
        name, version, role
    )
}

fn write_new(path: &Path, contents: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => ExError::from(MigrateError::MigrationFileExists {
                path: path.display().to_string(),
            }),
            _ => io_error("create_migration", path, e),
        })?;
    file.write_all(contents.as_bytes())
        .map_err(|e| io_error("create_migration", path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_version_shape() {
        let version = FileStorage::next_version();
        assert_eq!(version.len(), 14);
        assert!(version.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_scaffold_body_is_not_blank() {
        let body = scaffold_body("001", "init", MigrationRole::Rollback);
        assert!(!body.trim().is_empty());
        assert!(body.contains("-- Role: rollback"));
    }
}
