//! Batch and single-file ingestion into the activity store.

use super::fit::parse_fit;
use super::types::{Activity, ImportError};
use crate::storage::database::Database;
use std::path::Path;
use tracing::{info, warn};

/// File the recorder writes while a ride is still running.
pub const IN_PROGRESS_FILE: &str = "inProgressActivity.fit";

/// Outcome of a directory load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Newly stored activities
    pub loaded: usize,
    /// Files already known or in progress
    pub skipped: usize,
    /// Files that failed to parse or store
    pub failed: usize,
}

/// Read and build an activity from one recording file.
pub fn read_activity(path: &Path, source_id: &str) -> Result<Activity, ImportError> {
    let content = std::fs::read(path)?;
    let recording = parse_fit(&content)?;
    Ok(Activity::from_recording(source_id, recording)?)
}

/// Load every new recording in `dir`, in file-name order.
///
/// A file that fails is logged and counted; it never stops the batch.
pub fn load_directory(db: &Database, dir: &Path) -> Result<LoadSummary, ImportError> {
    let known = db.get_known_ids()?;

    let mut file_names: Vec<String> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    file_names.sort();

    let mut summary = LoadSummary::default();

    for file_name in file_names {
        if file_name == IN_PROGRESS_FILE || known.contains(&file_name) {
            summary.skipped += 1;
            continue;
        }

        let path = dir.join(&file_name);
        let result = read_activity(&path, &file_name).and_then(|activity| {
            db.store(&activity)?;
            Ok(())
        });

        match result {
            Ok(()) => {
                info!("Loaded {}", file_name);
                summary.loaded += 1;
            }
            Err(e) => {
                warn!("Skipping {}: {}", file_name, e);
                summary.failed += 1;
            }
        }
    }

    info!("Loaded {} file(s)", summary.loaded);

    Ok(summary)
}

/// Load a single file with a caller-supplied elevation. Returns the row id.
pub fn load_file(db: &Database, path: &Path, elevation_meters: f64) -> Result<i64, ImportError> {
    let source_id = path.display().to_string();
    let mut activity = read_activity(path, &source_id)?;

    activity.source_url = Some(format!("file://{}", source_id));
    activity.name = Some(derive_title(path));
    activity.elevation_meters = Some(elevation_meters);

    let id = db.store(&activity)?;
    info!("Loaded {} as activity #{}", source_id, id);

    Ok(id)
}

/// Display name from a file name: underscores become spaces, extension dropped.
pub fn derive_title(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let stem = match file_name.find('.') {
        Some(dot) => &file_name[..dot],
        None => file_name.as_str(),
    };

    stem.replace('_', " ")
}
