use std::fmt;

/// Non-fatal findings while selecting files for a bundle.
/// These are reported to the user but never stop the run.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionWarning {
    /// A touched path was left out because it does not match the pattern
    SkippedByPattern { path: String, pattern: String },
    /// A touched path was left out because it no longer exists at the end commit
    SkippedDeleted { path: String },
    /// No database was given, so the range starts from an explicit commit or the root
    NoDatabaseState,
    /// A database was given but no release is recorded for it
    NoRecordedRelease { database: String },
    /// Bypass mode: the file list was used instead of the commit range
    ExplicitFileList { count: usize },
}

impl fmt::Display for SelectionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionWarning::SkippedByPattern { path, pattern } => {
                write!(
                    f,
                    "Skipping '{}': doesn't match code pattern '{}'",
                    path, pattern
                )
            }
            SelectionWarning::SkippedDeleted { path } => {
                write!(f, "Skipping '{}': no longer in the repository", path)
            }
            SelectionWarning::NoDatabaseState => {
                write!(
                    f,
                    "No database given; release state was not consulted"
                )
            }
            SelectionWarning::NoRecordedRelease { database } => {
                write!(
                    f,
                    "No release recorded for database '{}'; starting from --from-commit or the repository root",
                    database
                )
            }
            SelectionWarning::ExplicitFileList { count } => {
                write!(
                    f,
                    "Using {} file(s) from the explicit file list; commit range not scanned",
                    count
                )
            }
        }
    }
}
