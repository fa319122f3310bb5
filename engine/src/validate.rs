//! Path validation phase.
//!
//! Checks both roots and every mapped source file before anything is copied.
//! Missing expected target subdirectories are reported but never fatal; the
//! copier creates destination directories on demand.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::MigrateError;
use crate::model::{MigrationJob, EXPECTED_TARGET_DIRS};

/// Non-fatal findings of a successful validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Expected target subdirectories that do not exist yet
    pub missing_target_dirs: Vec<PathBuf>,
}

/// Validate the job's roots and source files.
///
/// # Errors
/// - SourceRootNotFound / TargetRootNotFound if a root is not an existing directory
/// - MissingSourceFiles listing every absent mapped source file, in mapping order
pub fn validate_paths(job: &MigrationJob) -> Result<ValidationReport, MigrateError> {
    if !job.source_root.is_dir() {
        return Err(MigrateError::SourceRootNotFound {
            path: job.source_root.clone(),
        });
    }

    if !job.target_root.is_dir() {
        return Err(MigrateError::TargetRootNotFound {
            path: job.target_root.clone(),
        });
    }

    let missing_files: Vec<PathBuf> = job
        .mappings
        .iter()
        .map(|mapping| job.source_path(mapping))
        .filter(|path| !path.is_file())
        .collect();

    if !missing_files.is_empty() {
        warn!(count = missing_files.len(), "mapped source files missing");
        return Err(MigrateError::MissingSourceFiles {
            paths: missing_files,
        });
    }

    let missing_target_dirs: Vec<PathBuf> = EXPECTED_TARGET_DIRS
        .iter()
        .map(|dir| job.target_root.join(dir))
        .filter(|path| !path.is_dir())
        .collect();

    debug!(
        missing_dirs = missing_target_dirs.len(),
        "validation passed"
    );

    Ok(ValidationReport {
        missing_target_dirs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::create_job;
    use crate::model::{JobOptions, MAPPINGS};
    use std::fs;
    use std::path::Path;

    fn populate_sources(root: &Path) {
        for mapping in MAPPINGS {
            let path = root.join(mapping.source);
            fs::create_dir_all(path.parent().unwrap()).expect("Failed to create source dirs");
            fs::write(&path, mapping.description).expect("Failed to write source file");
        }
    }

    #[test]
    fn test_valid_layout_passes() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src");
        let dst = temp_dir.path().join("dst");
        populate_sources(&src);
        for dir in EXPECTED_TARGET_DIRS {
            fs::create_dir_all(dst.join(dir)).expect("Failed to create target dir");
        }

        let job = create_job(&src, &dst, JobOptions::default());
        let report = validate_paths(&job).expect("Validation should pass");
        assert!(report.missing_target_dirs.is_empty());
    }

    #[test]
    fn test_missing_target_dirs_are_advisory() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src");
        let dst = temp_dir.path().join("dst");
        populate_sources(&src);
        fs::create_dir(&dst).expect("Failed to create dst");

        let job = create_job(&src, &dst, JobOptions::default());
        let report = validate_paths(&job).expect("Validation should pass");
        assert_eq!(report.missing_target_dirs.len(), EXPECTED_TARGET_DIRS.len());
        assert_eq!(report.missing_target_dirs[0], dst.join("opencv-4.10.0"));

        // Validation never touches the filesystem
        assert_eq!(fs::read_dir(&dst).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_source_root() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("nonexistent");
        let dst = temp_dir.path().to_path_buf();

        let job = create_job(&src, &dst, JobOptions::default());
        match validate_paths(&job) {
            Err(MigrateError::SourceRootNotFound { path }) => assert_eq!(path, src),
            other => panic!("Expected SourceRootNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_target_root() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src");
        populate_sources(&src);
        let dst = temp_dir.path().join("nonexistent");

        let job = create_job(&src, &dst, JobOptions::default());
        assert!(matches!(
            validate_paths(&job),
            Err(MigrateError::TargetRootNotFound { .. })
        ));
    }

    #[test]
    fn test_all_missing_source_files_are_listed() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src");
        let dst = temp_dir.path().join("dst");
        fs::create_dir(&src).expect("Failed to create src");
        fs::create_dir(&dst).expect("Failed to create dst");

        let job = create_job(&src, &dst, JobOptions::default());
        match validate_paths(&job) {
            Err(MigrateError::MissingSourceFiles { paths }) => {
                let expected: Vec<PathBuf> = MAPPINGS.iter().map(|m| src.join(m.source)).collect();
                assert_eq!(paths, expected);
            }
            other => panic!("Expected MissingSourceFiles, got {:?}", other),
        }
    }

    #[test]
    fn test_one_missing_source_file() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src");
        let dst = temp_dir.path().join("dst");
        populate_sources(&src);
        fs::create_dir(&dst).expect("Failed to create dst");
        let removed = src.join(MAPPINGS[1].source);
        fs::remove_file(&removed).expect("Failed to remove source file");

        let job = create_job(&src, &dst, JobOptions::default());
        match validate_paths(&job) {
            Err(MigrateError::MissingSourceFiles { paths }) => assert_eq!(paths, vec![removed]),
            other => panic!("Expected MissingSourceFiles, got {:?}", other),
        }
    }
}
