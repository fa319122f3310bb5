//! Job orchestration module.
//!
//! This module provides the migration job lifecycle:
//! - Creating a job from source/target roots and options
//! - Running a job: copying every mapping in order (execute mode) or
//!   describing what would happen (preview mode)
//!
//! Validation, verification and reporting live in their own modules and are
//! driven by the caller around `run_job`.

use std::path::Path;
use std::time::SystemTime;

use chrono::Local;
use tracing::{debug, info, info_span, warn};

use crate::checksums::compute_file_checksum;
use crate::error::MigrateError;
use crate::fs_ops;
use crate::model::{
    ActionKind, IntegrityCheck, JobOptions, JobState, Mapping, MigrationJob, OperationRecord,
    PreviewRecord, MAPPINGS,
};
use crate::observer::MigrationObserver;

/// Create a new migration job over the fixed mapping table.
///
/// Does not touch the filesystem; call `validate_paths` before running.
pub fn create_job<P: AsRef<Path>, Q: AsRef<Path>>(
    source_root: P,
    target_root: Q,
    options: JobOptions,
) -> MigrationJob {
    MigrationJob {
        source_root: source_root.as_ref().to_path_buf(),
        target_root: target_root.as_ref().to_path_buf(),
        options,
        mappings: MAPPINGS,
        operations: Vec::new(),
        previews: Vec::new(),
        state: JobState::Pending,
        start_time: None,
        end_time: None,
    }
}

/// Run a job.
///
/// Transitions job state from Pending to Running to Completed. Mappings are
/// processed strictly in order. In preview mode nothing on disk is changed
/// and one PreviewRecord per mapping is collected; in execute mode one
/// OperationRecord per mapping is collected.
///
/// # Errors
/// Any filesystem error aborts the run immediately. Earlier mappings stay
/// copied; there is no rollback.
pub fn run_job(
    job: &mut MigrationJob,
    observer: Option<&dyn MigrationObserver>,
) -> Result<(), MigrateError> {
    if job.state != JobState::Pending {
        return Err(MigrateError::InvalidState {
            reason: format!("Job must be Pending to run; current state: {:?}", job.state),
        });
    }

    job.state = JobState::Running;
    job.start_time = Some(SystemTime::now());
    info!(mode = %job.options.mode, backup = job.options.backup, "migration started");

    if let Some(observer) = observer {
        observer.on_job_started(job);
    }

    let mappings = job.mappings;
    for (index, mapping) in mappings.iter().enumerate() {
        let _span = info_span!("mapping", index, file = mapping.target).entered();

        if let Some(observer) = observer {
            observer.on_mapping_started(job, index, mapping);
        }

        if job.is_preview() {
            let preview = preview_mapping(job, mapping);
            job.previews.push(preview);
            if let (Some(observer), Some(preview)) = (observer, job.previews.last()) {
                observer.on_mapping_previewed(job, index, preview);
            }
        } else {
            let operation = copy_mapping(job, mapping)?;
            job.operations.push(operation);
            if let (Some(observer), Some(operation)) = (observer, job.operations.last()) {
                observer.on_mapping_completed(job, index, operation);
            }
        }
    }

    job.state = JobState::Completed;
    job.end_time = Some(SystemTime::now());
    info!(operations = job.operations.len(), "migration finished");

    if let Some(observer) = observer {
        observer.on_job_completed(job);
    }

    Ok(())
}

/// Describe what execute mode would do for one mapping. Read-only.
fn preview_mapping(job: &MigrationJob, mapping: &Mapping) -> PreviewRecord {
    let source_path = job.source_path(mapping);
    let target_path = job.target_path(mapping);

    let would_create_dir = target_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty() && !parent.is_dir())
        .map(Path::to_path_buf);

    let would_overwrite = target_path.exists();
    let would_backup = (job.options.backup && would_overwrite).then(|| {
        fs_ops::backup_path_for(&target_path, &fs_ops::backup_timestamp(Local::now()))
    });

    debug!(overwrite = would_overwrite, "previewed mapping");

    PreviewRecord {
        source_path,
        target_path,
        description: mapping.description,
        would_create_dir,
        would_overwrite,
        would_backup,
    }
}

/// Copy one mapping: create the directory, back up, copy, fix mode, optionally hash.
fn copy_mapping(job: &MigrationJob, mapping: &Mapping) -> Result<OperationRecord, MigrateError> {
    let source_path = job.source_path(mapping);
    let target_path = job.target_path(mapping);

    let created_dir = fs_ops::ensure_parent_dir_exists(&target_path)?;
    fs_ops::ensure_distinct_files(&source_path, &target_path)?;

    let backup_path = if job.options.backup {
        fs_ops::create_backup(&target_path)?
    } else {
        None
    };

    let bytes_copied = fs_ops::copy_file_with_metadata(&source_path, &target_path)?;
    fs_ops::set_destination_permissions(&target_path)?;

    let integrity = match job.options.checksum {
        Some(algorithm) => {
            let check = IntegrityCheck {
                source: compute_file_checksum(&source_path, algorithm)?,
                destination: compute_file_checksum(&target_path, algorithm)?,
            };
            if !check.matches() {
                warn!(file = %target_path.display(), "checksum mismatch after copy");
            }
            Some(check)
        }
        None => None,
    };

    Ok(OperationRecord {
        action: ActionKind::Copy,
        source_path,
        target_path,
        description: mapping.description,
        created_dir,
        backup_path,
        bytes_copied,
        integrity,
    })
}
