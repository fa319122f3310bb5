//! Error types for the migration engine.
//!
//! `MigrateError` covers the two fatal classes of failure: configuration
//! errors found during validation (missing roots, missing source files) and
//! filesystem errors raised while copying. Marker and checksum mismatches are
//! not errors; they are recorded as data on the job.

use std::error::Error;
use std::fmt::{self, Display};
use std::io;
use std::path::PathBuf;

/// Errors that abort a migration run.
#[derive(Debug)]
pub enum MigrateError {
    /// Source root directory does not exist
    SourceRootNotFound { path: PathBuf },

    /// Target root directory does not exist
    TargetRootNotFound { path: PathBuf },

    /// One or more mapped source files are absent (every missing path, in mapping order)
    MissingSourceFiles { paths: Vec<PathBuf> },

    /// Failed to read from a file
    ReadError { path: PathBuf, source: io::Error },

    /// Failed to write to a destination file
    WriteError { path: PathBuf, source: io::Error },

    /// Failed to create a destination directory
    DirectoryCreationFailed { path: PathBuf, source: io::Error },

    /// Failed to snapshot an existing destination file
    BackupFailed { path: PathBuf, source: io::Error },

    /// Failed to set the destination file mode
    PermissionUpdateFailed { path: PathBuf, source: io::Error },

    /// Source and destination resolve to the same file
    SameFile { source_path: PathBuf, target_path: PathBuf },

    /// Job was driven out of order (e.g. run twice)
    InvalidState { reason: String },

    /// Unusable command-line option value
    InvalidArgument { reason: String },
}

impl Display for MigrateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceRootNotFound { path } => {
                write!(f, "Source directory does not exist: {}", path.display())
            }
            Self::TargetRootNotFound { path } => {
                write!(f, "Target directory does not exist: {}", path.display())
            }
            Self::MissingSourceFiles { paths } => {
                write!(f, "Source files missing:")?;
                for path in paths {
                    write!(f, " {}", path.display())?;
                }
                Ok(())
            }
            Self::ReadError { path, source } => {
                write!(f, "Failed to read file: {} ({})", path.display(), source)
            }
            Self::WriteError { path, source } => {
                write!(f, "Failed to write file: {} ({})", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(f, "Failed to create directory: {} ({})", path.display(), source)
            }
            Self::BackupFailed { path, source } => {
                write!(f, "Failed to back up file: {} ({})", path.display(), source)
            }
            Self::PermissionUpdateFailed { path, source } => {
                write!(f, "Failed to set permissions: {} ({})", path.display(), source)
            }
            Self::SameFile {
                source_path,
                target_path,
            } => write!(
                f,
                "Source and target are the same file: {} -> {}",
                source_path.display(),
                target_path.display()
            ),
            Self::InvalidState { reason } => write!(f, "Invalid job state: {}", reason),
            Self::InvalidArgument { reason } => write!(f, "{}", reason),
        }
    }
}

impl Error for MigrateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ReadError { source, .. }
            | Self::WriteError { source, .. }
            | Self::DirectoryCreationFailed { source, .. }
            | Self::BackupFailed { source, .. }
            | Self::PermissionUpdateFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl MigrateError {
    /// Extract the OS error code from this error, if available.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            Self::ReadError { source, .. }
            | Self::WriteError { source, .. }
            | Self::DirectoryCreationFailed { source, .. }
            | Self::BackupFailed { source, .. }
            | Self::PermissionUpdateFailed { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }

    /// True for errors caused by the paths or options given, not by I/O failures.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::SourceRootNotFound { .. }
                | Self::TargetRootNotFound { .. }
                | Self::MissingSourceFiles { .. }
                | Self::SameFile { .. }
                | Self::InvalidArgument { .. }
        )
    }
}
