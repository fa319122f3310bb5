//! Filesystem operations module.
//!
//! This module provides the low-level operations the copier is built from:
//! - Copying files with timestamp preservation
//! - Creating destination directories recursively
//! - Timestamped backups of existing destination files
//! - Fixing destination permissions

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::debug;

use crate::error::MigrateError;
use crate::model::DESTINATION_MODE;

/// Fail if `dst` exists and resolves to the same file as `src`.
///
/// Creating the destination would truncate the source before it is read.
pub fn ensure_distinct_files(src: &Path, dst: &Path) -> Result<(), MigrateError> {
    if !dst.exists() {
        return Ok(());
    }

    let canonical_src = fs::canonicalize(src).map_err(|e| MigrateError::ReadError {
        path: src.to_path_buf(),
        source: e,
    })?;
    let canonical_dst = fs::canonicalize(dst).map_err(|e| MigrateError::WriteError {
        path: dst.to_path_buf(),
        source: e,
    })?;

    if canonical_src == canonical_dst {
        return Err(MigrateError::SameFile {
            source_path: src.to_path_buf(),
            target_path: dst.to_path_buf(),
        });
    }
    Ok(())
}

/// Copy a file from source to destination, preserving access and modification times.
///
/// The destination's parent directory must already exist.
///
/// # Returns
/// Number of bytes copied
///
/// # Errors
/// Returns SameFile if both paths resolve to one file, ReadError / WriteError
/// if any step of the copy fails
pub fn copy_file_with_metadata(src: &Path, dst: &Path) -> Result<u64, MigrateError> {
    ensure_distinct_files(src, dst)?;

    let mut src_file = fs::File::open(src).map_err(|e| MigrateError::ReadError {
        path: src.to_path_buf(),
        source: e,
    })?;

    let src_metadata = src_file.metadata().map_err(|e| MigrateError::ReadError {
        path: src.to_path_buf(),
        source: e,
    })?;

    let bytes_copied = {
        let mut dst_file = fs::File::create(dst).map_err(|e| MigrateError::WriteError {
            path: dst.to_path_buf(),
            source: e,
        })?;

        let bytes = io::copy(&mut src_file, &mut dst_file).map_err(|e| {
            if e.kind() == io::ErrorKind::PermissionDenied {
                MigrateError::WriteError {
                    path: dst.to_path_buf(),
                    source: e,
                }
            } else {
                MigrateError::ReadError {
                    path: src.to_path_buf(),
                    source: e,
                }
            }
        })?;

        dst_file.sync_all().map_err(|e| MigrateError::WriteError {
            path: dst.to_path_buf(),
            source: e,
        })?;
        bytes
    };

    // Destination handle must be closed before times are set.
    let atime = filetime::FileTime::from_last_access_time(&src_metadata);
    let mtime = filetime::FileTime::from_last_modification_time(&src_metadata);
    filetime::set_file_times(dst, atime, mtime).map_err(|e| MigrateError::WriteError {
        path: dst.to_path_buf(),
        source: e,
    })?;

    debug!(src = %src.display(), dst = %dst.display(), bytes = bytes_copied, "copied file");
    Ok(bytes_copied)
}

/// Ensure the parent directory of a path exists, creating it and any missing ancestors.
///
/// # Returns
/// The created directory, or None if it already existed
///
/// # Errors
/// Returns DirectoryCreationFailed if the parent is not a directory or cannot be created
pub fn ensure_parent_dir_exists(path: &Path) -> Result<Option<PathBuf>, MigrateError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => return Ok(None),
    };

    match fs::metadata(parent) {
        Ok(metadata) if metadata.is_dir() => Ok(None),
        Ok(_) => Err(MigrateError::DirectoryCreationFailed {
            path: parent.to_path_buf(),
            source: io::Error::new(
                io::ErrorKind::InvalidInput,
                "Parent path exists but is not a directory",
            ),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(parent).map_err(|e| MigrateError::DirectoryCreationFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
            debug!(dir = %parent.display(), "created directory");
            Ok(Some(parent.to_path_buf()))
        }
        Err(e) => Err(MigrateError::DirectoryCreationFailed {
            path: parent.to_path_buf(),
            source: e,
        }),
    }
}

/// Format a local time as a backup suffix (`YYYYMMDD_HHMMSS`).
pub fn backup_timestamp(now: DateTime<Local>) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}

/// Sibling path a backup of `path` is written to.
///
/// `dir/tracking.hpp` becomes `dir/tracking.backup_<timestamp>.hpp`; a name
/// without extension just gets `.backup_<timestamp>` appended.
pub fn backup_path_for(path: &Path, timestamp: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let file_name = match path.extension() {
        Some(ext) => format!("{}.backup_{}.{}", stem, timestamp, ext.to_string_lossy()),
        None => format!("{}.backup_{}", stem, timestamp),
    };

    path.with_file_name(file_name)
}

/// Claim a backup path that no file occupies yet.
///
/// Tries `<stem>.backup_<timestamp>.<ext>` first, then `_1`, `_2`, ... after the
/// timestamp. The winning path is created empty so a concurrent run cannot take it.
fn reserve_backup_path(path: &Path, timestamp: &str) -> Result<PathBuf, MigrateError> {
    let mut attempt = 0u32;
    loop {
        let candidate = if attempt == 0 {
            backup_path_for(path, timestamp)
        } else {
            backup_path_for(path, &format!("{}_{}", timestamp, attempt))
        };

        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(_) => return Ok(candidate),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => {
                return Err(MigrateError::BackupFailed {
                    path: candidate,
                    source: e,
                })
            }
        }
    }
}

/// Copy an existing file aside to a timestamped sibling. Existing backups are never overwritten.
///
/// # Returns
/// The backup path, or None if `path` is not an existing regular file
///
/// # Errors
/// Returns BackupFailed if the snapshot cannot be written
pub fn create_backup(path: &Path) -> Result<Option<PathBuf>, MigrateError> {
    if !path.is_file() {
        return Ok(None);
    }

    let backup = reserve_backup_path(path, &backup_timestamp(Local::now()))?;
    copy_file_with_metadata(path, &backup).map_err(|e| MigrateError::BackupFailed {
        path: backup.clone(),
        source: match e {
            MigrateError::ReadError { source, .. } | MigrateError::WriteError { source, .. } => {
                source
            }
            other => io::Error::other(other.to_string()),
        },
    })?;

    debug!(file = %path.display(), backup = %backup.display(), "created backup");
    Ok(Some(backup))
}

/// Set the destination file mode to owner read/write, group/other read-only.
///
/// No-op on platforms without Unix permissions.
pub fn set_destination_permissions(path: &Path) -> Result<(), MigrateError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(DESTINATION_MODE)).map_err(|e| {
            MigrateError::PermissionUpdateFailed {
                path: path.to_path_buf(),
                source: e,
            }
        })?;
    }

    #[cfg(not(unix))]
    {
        let _ = (path, DESTINATION_MODE);
    }

    Ok(())
}
