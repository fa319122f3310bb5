//! Migration report model.
//!
//! A formatting pass over an already-run job: counts plus the static mapping
//! listing. No decision logic lives here.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::model::{Mapping, MigrationJob, RunMode};

/// Follow-up instructions printed after an execute run.
pub const NEXT_STEPS: &[&str] = &[
    "Build OpenCV from the target directory",
    "Replace cv::TrackerCSRT with cv::TrackerCSRTV2 in your project",
    "Test the new PSR accessor",
];

/// Summary of one run.
#[derive(Debug, Clone)]
pub struct MigrationReport {
    pub mode: RunMode,
    pub source_root: PathBuf,
    pub target_root: PathBuf,
    /// Number of mappings in the table
    pub mapping_count: usize,
    /// Execute mode only
    pub operation_count: Option<usize>,
    /// Execute mode only
    pub backup_count: Option<usize>,
    /// Operations whose checksums differed (execute mode with a checksum algorithm)
    pub integrity_mismatches: Vec<PathBuf>,
    /// Time spent in the copy phase
    pub elapsed: Option<Duration>,
    pub mappings: &'static [Mapping],
}

/// Build the report for a job that has been run.
pub fn build_report(job: &MigrationJob) -> MigrationReport {
    let (operation_count, backup_count) = match job.options.mode {
        RunMode::Preview => (None, None),
        RunMode::Execute => (
            Some(job.operations.len()),
            Some(
                job.operations
                    .iter()
                    .filter(|op| op.backup_path.is_some())
                    .count(),
            ),
        ),
    };

    let integrity_mismatches = job
        .operations
        .iter()
        .filter(|op| op.integrity.as_ref().is_some_and(|check| !check.matches()))
        .map(|op| op.target_path.clone())
        .collect();

    MigrationReport {
        mode: job.options.mode,
        source_root: job.source_root.clone(),
        target_root: job.target_root.clone(),
        mapping_count: job.mappings.len(),
        operation_count,
        backup_count,
        integrity_mismatches,
        elapsed: job.elapsed(),
        mappings: job.mappings,
    }
}

impl fmt::Display for MigrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            RunMode::Preview => writeln!(f, "Mode: preview (no changes made)")?,
            RunMode::Execute => writeln!(f, "Mode: execute")?,
        }
        writeln!(f, "Source directory: {}", self.source_root.display())?;
        writeln!(f, "Target directory: {}", self.target_root.display())?;
        writeln!(f, "Files processed: {}", self.mapping_count)?;

        if let Some(operations) = self.operation_count {
            writeln!(f, "Operations performed: {}", operations)?;
        }
        if let Some(backups) = self.backup_count {
            writeln!(f, "Backups created: {}", backups)?;
        }
        if let Some(elapsed) = self.elapsed {
            writeln!(f, "Elapsed: {} ms", elapsed.as_millis())?;
        }
        if !self.integrity_mismatches.is_empty() {
            writeln!(f, "Checksum mismatches: {}", self.integrity_mismatches.len())?;
            for path in &self.integrity_mismatches {
                writeln!(f, "  {}", path.display())?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Files:")?;
        for (i, mapping) in self.mappings.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, mapping.description)?;
            writeln!(f, "     {} -> {}", mapping.source, mapping.target)?;
        }
        Ok(())
    }
}
