//! Marker verification phase.
//!
//! After an execute run, each destination file is searched for the literal
//! marker tokens that indicate the modification made it across. This is an
//! advisory check: it never fails, and unreadable files count as "not found".

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::model::{MigrationJob, MARKERS};

/// Result of searching one destination file for one marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerCheck {
    pub target_path: PathBuf,
    pub token: &'static str,
    pub description: &'static str,
    pub found: bool,
}

/// Search every destination file for its markers.
///
/// Returns nothing in preview mode.
pub fn verify_markers(job: &MigrationJob) -> Vec<MarkerCheck> {
    if job.is_preview() {
        return Vec::new();
    }

    let mut contents: HashMap<&'static str, Option<String>> = HashMap::new();

    MARKERS
        .iter()
        .map(|marker| {
            let target_path = job.target_root.join(marker.target);
            let content = contents
                .entry(marker.target)
                .or_insert_with(|| match fs::read_to_string(&target_path) {
                    Ok(text) => Some(text),
                    Err(e) => {
                        warn!(file = %target_path.display(), error = %e, "cannot read for verification");
                        None
                    }
                });

            let found = content
                .as_deref()
                .is_some_and(|text| text.contains(marker.token));
            debug!(token = marker.token, found, "marker checked");

            MarkerCheck {
                target_path,
                token: marker.token,
                description: marker.description,
                found,
            }
        })
        .collect()
}
