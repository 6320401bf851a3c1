use dbmigrate_core::errors::{ExError, ExErrorKind, Result};
use dbmigrate_core::model::MigrationRole;
use regex::Regex;

/// File name pattern: version, name, role, optional extension.
///
/// Versions are runs of digits, `-` and `_`; names are word characters and
/// `-`. Either of `-` or `_` separates the three parts.
const FILE_NAME_PATTERN: &str = r"^([\d\-_]+)[\-_]([\w\-]+)[\-_](apply|rollback)(\.\w+)?$";
const VERSION_PATTERN: &str = r"^[\d\-_]+$";
const NAME_PATTERN: &str = r"^[\w\-]+$";

/// Components recovered from a migration file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFileName {
    pub version: String,
    pub name: String,
    pub role: MigrationRole,
}

/// Compiled migration file-name matcher
///
/// Owned by the storage that uses it; there is no process-wide instance.
#[derive(Debug, Clone)]
pub struct MigrationFileName {
    file_name: Regex,
    version: Regex,
    name: Regex,
}

impl MigrationFileName {
    /// Compile the matchers
    ///
    /// # Errors
    ///
    /// `Internal` if a pattern fails to compile.
    pub fn new() -> Result<Self> {
        Ok(Self {
            file_name: compile(FILE_NAME_PATTERN)?,
            version: compile(VERSION_PATTERN)?,
            name: compile(NAME_PATTERN)?,
        })
    }

    /// Parse a bare file name (no directory part).
    ///
    /// Returns `None` for anything that is not a migration file; callers
    /// skip such entries silently.
    pub fn parse(&self, file_name: &str) -> Option<ParsedFileName> {
        let captures = self.file_name.captures(file_name)?;
        let role = match &captures[3] {
            "apply" => MigrationRole::Apply,
            _ => MigrationRole::Rollback,
        };
        Some(ParsedFileName {
            version: captures[1].to_string(),
            name: captures[2].to_string(),
            role,
        })
    }

    /// Compose the file name for one half of a pair
    pub fn format(version: &str, name: &str, role: MigrationRole, extension: &str) -> String {
        format!("{}-{}-{}.{}", version, name, role, extension)
    }

    pub fn is_valid_version(&self, version: &str) -> bool {
        self.version.is_match(version)
    }

    pub fn is_valid_name(&self, name: &str) -> bool {
        self.name.is_match(name)
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| {
        ExError::new(ExErrorKind::Internal)
            .with_op("compile_file_name_pattern")
            .with_message(e.to_string())
    })
}
