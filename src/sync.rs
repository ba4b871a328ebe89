//! Remote activity provider boundary.
//!
//! The provider supplies names and elevation for rides recorded elsewhere,
//! plus the list of remote ids. Matching onto local rows is done by start
//! time, since local recordings are keyed by file name.

use crate::storage::config::SyncSettings;
use crate::storage::database::{Database, DatabaseError};
use chrono::{DateTime, Duration, Local, NaiveDateTime};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Activities requested per provider call.
pub const PAGE_SIZE: usize = 50;

/// Activity summary as reported by the remote provider.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteActivity {
    pub id: String,
    pub name: String,
    /// Local wall time
    pub start_time: NaiveDateTime,
    /// Local wall time
    pub end_time: NaiveDateTime,
    pub distance_meters: f64,
    pub elevation_meters: f64,
}

/// Source of remote activity summaries, newest first, paged.
pub trait ActivityProvider {
    /// Up to `limit` activities starting at offset `start`. Empty when exhausted.
    fn list_activities(&self, start: usize, limit: usize) -> Result<Vec<RemoteActivity>, SyncError>;
}

/// Provider backed by an exported activity list (JSON array).
#[derive(Debug, Clone, Default)]
pub struct JsonExportProvider {
    activities: Vec<RemoteActivity>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRemoteActivity {
    id: RawId,
    #[serde(default)]
    name: String,
    start_date: String,
    end_date: String,
    #[serde(default)]
    distance_in_meters: f64,
    #[serde(default)]
    total_elevation: f64,
}

impl JsonExportProvider {
    pub fn new(activities: Vec<RemoteActivity>) -> Self {
        Self { activities }
    }

    /// Load an export file.
    pub fn load(path: &Path) -> Result<Self, SyncError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| SyncError::IoError(e.to_string()))?;
        Self::from_json(&content)
    }

    /// Parse the export's JSON array.
    pub fn from_json(content: &str) -> Result<Self, SyncError> {
        let raw: Vec<RawRemoteActivity> =
            serde_json::from_str(content).map_err(|e| SyncError::ParseError(e.to_string()))?;

        let activities = raw
            .into_iter()
            .map(|r| {
                Ok(RemoteActivity {
                    id: match r.id {
                        RawId::Number(n) => n.to_string(),
                        RawId::Text(s) => s,
                    },
                    name: r.name,
                    start_time: parse_remote_time(&r.start_date)?,
                    end_time: parse_remote_time(&r.end_date)?,
                    distance_meters: r.distance_in_meters,
                    elevation_meters: r.total_elevation,
                })
            })
            .collect::<Result<Vec<_>, SyncError>>()?;

        Ok(Self { activities })
    }
}

impl ActivityProvider for JsonExportProvider {
    fn list_activities(&self, start: usize, limit: usize) -> Result<Vec<RemoteActivity>, SyncError> {
        Ok(self.activities.iter().skip(start).take(limit).cloned().collect())
    }
}

/// Parse a provider timestamp into local wall time.
///
/// Offset-bearing forms are converted to the local zone; naive forms are
/// taken as already local.
pub fn parse_remote_time(text: &str) -> Result<NaiveDateTime, SyncError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Local).naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Ok(dt.with_timezone(&Local).naive_local());
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S"))
        .map_err(|e| SyncError::ParseError(format!("Invalid timestamp {:?}: {}", text, e)))
}

/// Walk every page of the provider.
fn for_each_remote<P, F>(provider: &P, mut visit: F) -> Result<(), SyncError>
where
    P: ActivityProvider + ?Sized,
    F: FnMut(RemoteActivity) -> Result<(), SyncError>,
{
    let mut start = 0;
    loop {
        let page = provider.list_activities(start, PAGE_SIZE)?;
        if page.is_empty() {
            return Ok(());
        }
        debug!("Fetched {} remote activities from offset {}", page.len(), start);
        for activity in page {
            visit(activity)?;
        }
        start += PAGE_SIZE;
    }
}

/// Remote ids not present in `known_ids`, in provider order.
pub fn unknown_remote_ids<P>(provider: &P, known_ids: &HashSet<String>) -> Result<Vec<String>, SyncError>
where
    P: ActivityProvider + ?Sized,
{
    let mut unknown = Vec::new();
    for_each_remote(provider, |activity| {
        if !known_ids.contains(&activity.id) {
            unknown.push(activity.id);
        }
        Ok(())
    })?;
    Ok(unknown)
}

/// Copy remote names and elevation onto stored activities. Returns rows touched.
pub fn sync_metadata<P>(provider: &P, db: &Database, settings: &SyncSettings) -> Result<usize, SyncError>
where
    P: ActivityProvider + ?Sized,
{
    let slack = Duration::minutes(settings.start_slack_minutes);
    let mut touched = 0;

    for_each_remote(provider, |activity| {
        if activity.distance_meters <= 0.0 {
            return Ok(());
        }

        let name = activity
            .name
            .strip_prefix(settings.name_prefix.as_str())
            .unwrap_or(&activity.name);

        touched += db.update_metadata(
            activity.start_time - slack,
            activity.end_time,
            name,
            Some(activity.elevation_meters),
        )?;
        Ok(())
    })?;

    info!("Updated metadata on {} activities", touched);

    Ok(touched)
}

/// Sync errors.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}
