//! Core data model for migration jobs.
//!
//! This module defines:
//! - Mapping: one fixed source → target file pair
//! - MigrationJob: roots, options and collected operations for a single run
//! - OperationRecord / PreviewRecord: what a run did (or would do) per mapping
//! - The static tables: mappings, expected target directories, marker tokens

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use crate::checksums::{ChecksumAlgorithm, ChecksumValue};

/// One file to migrate. Paths are relative to the source and target roots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    pub source: &'static str,
    pub target: &'static str,
    pub description: &'static str,
}

/// A marker token expected in a migrated destination file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerSpec {
    /// Target-relative path of the file to search
    pub target: &'static str,
    /// Literal substring to look for
    pub token: &'static str,
    /// What the token's presence indicates
    pub description: &'static str,
}

const HEADER_PATH: &str = "opencv_contrib-4.10.0/modules/tracking/include/opencv2/tracking.hpp";
const IMPL_PATH: &str = "opencv_contrib-4.10.0/modules/tracking/src/trackerCSRT.cpp";

/// Files copied by every run, in processing order.
pub const MAPPINGS: &[Mapping] = &[
    Mapping {
        source: HEADER_PATH,
        target: HEADER_PATH,
        description: "TrackerCSRTV2 class definition header",
    },
    Mapping {
        source: IMPL_PATH,
        target: IMPL_PATH,
        description: "TrackerCSRTV2 implementation file",
    },
];

/// Target subdirectories the layout is expected to have. Absence is advisory.
pub const EXPECTED_TARGET_DIRS: &[&str] = &[
    "opencv-4.10.0",
    "opencv_contrib-4.10.0",
    "opencv_contrib-4.10.0/modules",
    "opencv_contrib-4.10.0/modules/tracking",
    "opencv_contrib-4.10.0/modules/tracking/include",
    "opencv_contrib-4.10.0/modules/tracking/include/opencv2",
    "opencv_contrib-4.10.0/modules/tracking/src",
];

/// Marker tokens checked after an execute run.
pub const MARKERS: &[MarkerSpec] = &[
    MarkerSpec {
        target: HEADER_PATH,
        token: "TrackerCSRTV2",
        description: "TrackerCSRTV2 class definition present in header",
    },
    MarkerSpec {
        target: IMPL_PATH,
        token: "TrackerCSRTV2Impl",
        description: "TrackerCSRTV2Impl implementation present in source",
    },
    MarkerSpec {
        target: IMPL_PATH,
        token: "getLastPSRValue",
        description: "PSR accessor method present",
    },
];

/// Mode bits applied to every destination file (owner rw, group/other r).
pub const DESTINATION_MODE: u32 = 0o644;

/// Whether a run mutates the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Report intended actions only
    Preview,
    /// Copy, back up and verify
    Execute,
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunMode::Preview => write!(f, "Preview"),
            RunMode::Execute => write!(f, "Execute"),
        }
    }
}

/// Options controlling a job, built from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobOptions {
    pub mode: RunMode,
    /// Snapshot existing destination files before overwriting
    pub backup: bool,
    /// Compare source and destination checksums after each copy
    pub checksum: Option<ChecksumAlgorithm>,
}

impl Default for JobOptions {
    fn default() -> Self {
        JobOptions {
            mode: RunMode::Execute,
            backup: false,
            checksum: None,
        }
    }
}

/// The state of a migration job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// Created, not yet run
    Pending,
    /// Currently copying
    Running,
    /// All mappings processed
    Completed,
}

/// A single migration run.
#[derive(Debug)]
pub struct MigrationJob {
    /// Root of the tree holding the modified files
    pub source_root: PathBuf,

    /// Root of the tree receiving copies
    pub target_root: PathBuf,

    pub options: JobOptions,

    /// Fixed mapping table
    pub mappings: &'static [Mapping],

    /// Execute-mode records, one per mapping, in mapping order
    pub operations: Vec<OperationRecord>,

    /// Preview-mode records, one per mapping, in mapping order
    pub previews: Vec<PreviewRecord>,

    pub state: JobState,

    pub start_time: Option<SystemTime>,
    pub end_time: Option<SystemTime>,
}

impl MigrationJob {
    pub fn is_preview(&self) -> bool {
        self.options.mode == RunMode::Preview
    }

    /// Wall time between start and completion; None until the job has completed.
    pub fn elapsed(&self) -> Option<Duration> {
        let (start, end) = (self.start_time?, self.end_time?);
        end.duration_since(start).ok()
    }

    /// Resolve a mapping's source path against the source root.
    pub fn source_path(&self, mapping: &Mapping) -> PathBuf {
        self.source_root.join(mapping.source)
    }

    /// Resolve a mapping's target path against the target root.
    pub fn target_path(&self, mapping: &Mapping) -> PathBuf {
        self.target_root.join(mapping.target)
    }
}

/// What was done for a mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Copy,
}

/// Record of one mapping processed in execute mode.
#[derive(Debug, Clone)]
pub struct OperationRecord {
    pub action: ActionKind,
    pub source_path: PathBuf,
    pub target_path: PathBuf,
    pub description: &'static str,

    /// Set when the destination directory had to be created
    pub created_dir: Option<PathBuf>,

    /// Set when an existing destination was snapshotted
    pub backup_path: Option<PathBuf>,

    /// Bytes written to the destination
    pub bytes_copied: u64,

    pub integrity: Option<IntegrityCheck>,
}

/// Checksums of source and destination taken right after the copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityCheck {
    pub source: ChecksumValue,
    pub destination: ChecksumValue,
}

impl IntegrityCheck {
    pub fn matches(&self) -> bool {
        self.source == self.destination
    }
}

/// What execute mode would do for a mapping. Built without touching the filesystem.
#[derive(Debug, Clone)]
pub struct PreviewRecord {
    pub source_path: PathBuf,
    pub target_path: PathBuf,
    pub description: &'static str,
    /// Destination directory that would be created
    pub would_create_dir: Option<PathBuf>,
    /// Destination exists and would be overwritten
    pub would_overwrite: bool,
    /// Backup that would be written (backup mode and existing destination)
    pub would_backup: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_marker_targets_a_mapping() {
        for marker in MARKERS {
            assert!(
                MAPPINGS.iter().any(|m| m.target == marker.target),
                "marker {} has no mapping",
                marker.token
            );
        }
    }

    #[test]
    fn test_mapping_parents_are_expected_dirs() {
        for mapping in MAPPINGS {
            let parent = std::path::Path::new(mapping.target)
                .parent()
                .and_then(|p| p.to_str())
                .unwrap();
            assert!(EXPECTED_TARGET_DIRS.contains(&parent));
        }
    }

    #[test]
    fn test_marker_sets_per_file() {
        let header = MARKERS.iter().filter(|m| m.target == HEADER_PATH).count();
        let implementation = MARKERS.iter().filter(|m| m.target == IMPL_PATH).count();
        assert_eq!(header, 1);
        assert_eq!(implementation, 2);
    }
}
