//! Observer trait for migration progress.
//!
//! Decouples the engine from console output. The CLI implements this trait to
//! print each phase; tests can implement it to capture events.

use crate::model::{Mapping, MigrationJob, OperationRecord, PreviewRecord};

/// Receives callbacks while a job runs.
///
/// All methods are called synchronously, in mapping order.
pub trait MigrationObserver: Send {
    /// Called once before the first mapping is processed.
    fn on_job_started(&self, job: &MigrationJob);

    /// Called when a mapping is about to be processed.
    fn on_mapping_started(&self, job: &MigrationJob, index: usize, mapping: &Mapping);

    /// Called in preview mode instead of `on_mapping_completed`.
    fn on_mapping_previewed(&self, job: &MigrationJob, index: usize, preview: &PreviewRecord);

    /// Called after a mapping has been copied in execute mode.
    fn on_mapping_completed(&self, job: &MigrationJob, index: usize, operation: &OperationRecord);

    /// Called after the last mapping.
    fn on_job_completed(&self, job: &MigrationJob);
}
