use crate::model::MigrationRole;
use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every error crossing a crate boundary carries one of these kinds. Each
/// kind maps to a stable error code that tests and callers can match on
/// without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Load/validation
    InvalidInput,
    NotFound,
    /// An apply body without its rollback counterpart, or vice versa
    MissingCounterpart,
    DuplicateVersion,
    EmptyBody,
    NotADirectory,
    AlreadyExists,

    // Backend selection
    UnsupportedVendor,

    // Integration/IO
    Connection,
    Io,
    Persistence,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::MissingCounterpart => "ERR_MISSING_COUNTERPART",
            ExErrorKind::DuplicateVersion => "ERR_DUPLICATE_VERSION",
            ExErrorKind::EmptyBody => "ERR_EMPTY_BODY",
            ExErrorKind::NotADirectory => "ERR_NOT_A_DIRECTORY",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::UnsupportedVendor => "ERR_UNSUPPORTED_VENDOR",
            ExErrorKind::Connection => "ERR_CONNECTION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification kind plus optional context (operation,
/// migration version, filesystem path) for debugging. The orchestrator
/// returns adapter and storage errors as-is, so the value a caller receives
/// is exactly the one the collaborator produced.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    version: Option<String>,
    path: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            version: None,
            path: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add migration version context
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Add filesystem path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the migration version context, if any
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Get the path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(version) = &self.version {
            write!(f, " (version: {})", version)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain errors raised while loading, validating, or scaffolding migrations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MigrateError {
    /// A rollback file exists for a version that has no apply file
    #[error("apply migration not found for version {version}")]
    ApplyNotFound { version: String },

    /// An apply file exists for a version that has no rollback file
    #[error("rollback migration not found for version {version}")]
    RollbackNotFound { version: String },

    /// A migration body is empty or whitespace only
    #[error("{role} body is empty for version {version}")]
    EmptyBody {
        version: String,
        role: MigrationRole,
    },

    /// A migration pair has an empty version string
    #[error("migration '{name}' has an empty version")]
    EmptyVersion { name: String },

    /// Two migration pairs share one version
    #[error("duplicate migration version {version}")]
    DuplicateVersion { version: String },

    /// Two files claim the same version and role
    #[error("duplicate {role} migration for version {version}: {first} and {second}")]
    DuplicateMigrationFile {
        version: String,
        role: MigrationRole,
        first: String,
        second: String,
    },

    /// The migrations path exists but is not a directory
    #[error("{path} is not a directory")]
    NotADirectory { path: String },

    /// Bookkeeping table name is not a plain SQL identifier
    #[error("invalid bookkeeping table name '{table}': expected [A-Za-z_][A-Za-z0-9_]*")]
    InvalidTableName { table: String },

    /// A migration name or version would not parse back from its file name
    #[error("invalid migration {field} '{value}'")]
    InvalidMigrationName { field: &'static str, value: String },

    /// Refusing to overwrite an existing migration file
    #[error("migration file already exists: {path}")]
    MigrationFileExists { path: String },

    /// Database URL names a backend this build cannot talk to
    #[error("unsupported database vendor '{vendor}': {reason}")]
    UnsupportedVendor { vendor: String, reason: String },
}

impl From<MigrateError> for ExError {
    fn from(err: MigrateError) -> Self {
        let message = err.to_string();
        match err {
            MigrateError::ApplyNotFound { version } | MigrateError::RollbackNotFound { version } => {
                ExError::new(ExErrorKind::MissingCounterpart)
                    .with_op("load_migrations")
                    .with_version(version)
                    .with_message(message)
            }

            MigrateError::EmptyBody { version, .. } => ExError::new(ExErrorKind::EmptyBody)
                .with_op("load_migrations")
                .with_version(version)
                .with_message(message),

            MigrateError::EmptyVersion { .. } => ExError::new(ExErrorKind::InvalidInput)
                .with_op("load_migrations")
                .with_message(message),

            MigrateError::DuplicateVersion { version }
            | MigrateError::DuplicateMigrationFile { version, .. } => {
                ExError::new(ExErrorKind::DuplicateVersion)
                    .with_op("load_migrations")
                    .with_version(version)
                    .with_message(message)
            }

            MigrateError::NotADirectory { path } => ExError::new(ExErrorKind::NotADirectory)
                .with_op("load_migrations")
                .with_path(path)
                .with_message(message),

            MigrateError::InvalidTableName { .. } => ExError::new(ExErrorKind::InvalidInput)
                .with_op("adapter_config")
                .with_message(message),

            MigrateError::InvalidMigrationName { .. } => ExError::new(ExErrorKind::InvalidInput)
                .with_op("create_migration")
                .with_message(message),

            MigrateError::MigrationFileExists { path } => ExError::new(ExErrorKind::AlreadyExists)
                .with_op("create_migration")
                .with_path(path)
                .with_message(message),

            MigrateError::UnsupportedVendor { .. } => ExError::new(ExErrorKind::UnsupportedVendor)
                .with_op("connect")
                .with_message(message),
        }
    }
}
