use thiserror::Error;

/// Unified error type for sqlbundle operations
#[derive(Error, Debug)]
pub enum BundleError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Reference not found: '{0}' does not resolve to a known commit")]
    RefNotFound(String),

    #[error("Invalid commit range: {0}")]
    Range(String),

    #[error("Content missing: '{path}' cannot be read at commit {commit}")]
    ContentMissing { path: String, commit: String },

    #[error("No files selected: {0}")]
    NoFilesSelected(String),

    #[error("Tag collision: release bundle '{0}' is already recorded as applied")]
    TagCollision(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database URI error: {0}")]
    Database(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in sqlbundle
pub type Result<T> = std::result::Result<T, BundleError>;

impl BundleError {
    /// Create a range error with context
    pub fn range(msg: impl Into<String>) -> Self {
        BundleError::Range(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        BundleError::Config(msg.into())
    }

    /// Create a database URI error with context
    pub fn database(msg: impl Into<String>) -> Self {
        BundleError::Database(msg.into())
    }

    /// Create a missing-content error for a path at a commit
    pub fn content_missing(path: impl Into<String>, commit: impl Into<String>) -> Self {
        BundleError::ContentMissing {
            path: path.into(),
            commit: commit.into(),
        }
    }

    /// Process exit code for this error kind.
    ///
    /// Each caller-visible failure gets its own code so scripts can tell
    /// them apart without parsing messages.
    pub fn exit_code(&self) -> i32 {
        match self {
            BundleError::RefNotFound(_) => 3,
            BundleError::Range(_) => 4,
            BundleError::ContentMissing { .. } => 5,
            BundleError::NoFilesSelected(_) => 6,
            BundleError::TagCollision(_) => 7,
            _ => 1,
        }
    }
}
