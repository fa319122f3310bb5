//! # Migration Engine - OpenCV TrackerCSRTV2 file migration
//!
//! Copies the modified `tracking.hpp` / `trackerCSRT.cpp` pair from one
//! OpenCV contrib tree into another tree with the same layout.
//!
//! ## Overview
//!
//! A run is strictly linear: Validate → Copy (or Preview) → Verify → Report.
//! - Validation fails fast on missing roots or missing source files
//! - The copier creates directories lazily, can back up existing destinations,
//!   preserves timestamps and sets mode 0644
//! - Verification searches the destinations for marker tokens (advisory)
//! - The report summarizes counts and the fixed mapping table
//!
//! ## Basic Usage
//!
//! ```no_run
//! use migrate_engine::{
//!     build_report, create_job, run_job, validate_paths, verify_markers, JobOptions, RunMode,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = JobOptions { mode: RunMode::Execute, backup: true, checksum: None };
//! let mut job = create_job("/work/src3rd/opencv", "/work/src/opencv_src", options);
//!
//! validate_paths(&job)?;
//! run_job(&mut job, None)?;
//!
//! for check in verify_markers(&job) {
//!     println!("{}: {}", check.token, check.found);
//! }
//! println!("{}", build_report(&job));
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - **model**: Mapping table, job, operation and preview records
//! - **error**: Error type
//! - **validate**: Path validation phase
//! - **fs_ops**: Copy, backup and permission primitives
//! - **job**: Job orchestration (create, run)
//! - **verify**: Marker verification phase
//! - **report**: Report model
//! - **observer**: Progress callback trait
//! - **checksums**: Post-copy integrity checksums

pub mod checksums;
pub mod error;
pub mod fs_ops;
pub mod job;
pub mod model;
pub mod observer;
pub mod report;
pub mod validate;
pub mod verify;

// Re-export main types and functions
pub use checksums::{compute_file_checksum, ChecksumAlgorithm, ChecksumValue};
pub use error::MigrateError;
pub use job::{create_job, run_job};
pub use model::{
    ActionKind, IntegrityCheck, JobOptions, JobState, Mapping, MarkerSpec, MigrationJob,
    OperationRecord, PreviewRecord, RunMode, EXPECTED_TARGET_DIRS, MAPPINGS, MARKERS,
};
pub use observer::MigrationObserver;
pub use report::{build_report, MigrationReport, NEXT_STEPS};
pub use validate::{validate_paths, ValidationReport};
pub use verify::{verify_markers, MarkerCheck};
