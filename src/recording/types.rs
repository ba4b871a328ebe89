//! Activity aggregate and per-second time series.

use crate::metrics::analytics::error::{ensure_same_length, AnalyticsError, AnalyticsResult};
use crate::metrics::analytics::{DailyLoad, PeakTable};
use crate::metrics::calculator::ActivityMetrics;
use crate::metrics::smoothing::{mean, normalized_power_watts};
use crate::storage::database::DatabaseError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::num::ParseIntError;
use std::ops::Deref;
use thiserror::Error;

/// Name shown for activities the provider never named.
pub const UNNAMED_ACTIVITY: &str = "Unnamed activity";

/// One sample per elapsed second; dropouts are explicit zeros.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeries(Vec<u16>);

impl TimeSeries {
    pub fn new(samples: Vec<u16>) -> Self {
        Self(samples)
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.0
    }

    /// Comma-separated storage form.
    pub fn encode(&self) -> String {
        self.0
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Parse the storage form. An empty string is an empty series.
    pub fn decode(text: &str) -> Result<Self, ParseIntError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Self::default());
        }
        text.split(',')
            .map(|s| s.trim().parse::<u16>())
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Largest sample, 0 for an empty series.
    pub fn max(&self) -> u16 {
        self.0.iter().copied().max().unwrap_or(0)
    }

    /// Truncated mean, 0 for an empty series.
    pub fn average(&self) -> u16 {
        mean(&self.0).map(|m| m as u16).unwrap_or(0)
    }
}

impl Deref for TimeSeries {
    type Target = [u16];

    fn deref(&self) -> &[u16] {
        &self.0
    }
}

impl From<Vec<u16>> for TimeSeries {
    fn from(samples: Vec<u16>) -> Self {
        Self(samples)
    }
}

/// Output of the recording file parser.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecording {
    /// First record timestamp (local wall time)
    pub start_time: NaiveDateTime,
    /// Last record timestamp (local wall time)
    pub end_time: NaiveDateTime,
    /// Final cumulative distance in meters
    pub distance_meters: f64,
    /// Seconds that had a real record
    pub moving_seconds: u32,
    /// Power per elapsed second, gaps zero-filled
    pub power: Vec<u16>,
    /// Heart rate per elapsed second, gaps zero-filled
    pub heart_rate: Vec<u16>,
}

/// One exercise session.
///
/// Raw series and cached aggregates are persisted. `metrics` and `load` are
/// recomputed on every load and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Database row id, `None` until stored
    pub id: Option<i64>,
    /// File name or remote id
    pub source_id: String,
    /// Where the recording came from
    pub source_url: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    /// Elapsed seconds (end - start)
    pub duration_seconds: u32,
    /// Seconds that had sensor samples
    pub moving_seconds: u32,
    pub distance_meters: f64,
    pub elevation_meters: Option<f64>,
    pub name: Option<String>,
    pub power: TimeSeries,
    pub heart_rate: TimeSeries,
    pub avg_power: u16,
    pub max_power: u16,
    pub normalized_power: u16,
    pub avg_heart_rate: u16,
    pub max_heart_rate: u16,
    pub power_peaks: PeakTable,
    pub hr_peaks: PeakTable,
    #[serde(skip)]
    pub metrics: Option<ActivityMetrics>,
    #[serde(skip)]
    pub load: DailyLoad,
}

impl Activity {
    /// Build an activity from a parsed recording, computing aggregates and peaks.
    pub fn from_recording(
        source_id: impl Into<String>,
        recording: ParsedRecording,
    ) -> AnalyticsResult<Self> {
        ensure_same_length(&recording.power, &recording.heart_rate)?;

        if recording.end_time < recording.start_time {
            return Err(AnalyticsError::InvalidInput(format!(
                "Recording ends ({}) before it starts ({})",
                recording.end_time, recording.start_time
            )));
        }

        let duration_seconds = (recording.end_time - recording.start_time)
            .num_seconds()
            .clamp(0, i64::from(u32::MAX)) as u32;

        let power = TimeSeries::new(recording.power);
        let heart_rate = TimeSeries::new(recording.heart_rate);

        Ok(Self {
            id: None,
            source_id: source_id.into(),
            source_url: None,
            start_time: recording.start_time,
            end_time: recording.end_time,
            duration_seconds,
            moving_seconds: recording.moving_seconds,
            distance_meters: recording.distance_meters,
            elevation_meters: None,
            name: None,
            avg_power: power.average(),
            max_power: power.max(),
            normalized_power: normalized_power_watts(&power),
            avg_heart_rate: heart_rate.average(),
            max_heart_rate: heart_rate.max(),
            power_peaks: PeakTable::extract(&power),
            hr_peaks: PeakTable::extract(&heart_rate),
            power,
            heart_rate,
            metrics: None,
            load: DailyLoad::default(),
        })
    }

    /// Display name, falling back to a placeholder.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNNAMED_ACTIVITY)
    }

    /// Calendar date the activity started on.
    pub fn date(&self) -> chrono::NaiveDate {
        self.start_time.date()
    }
}

/// Errors while importing recordings.
#[derive(Debug, Error)]
pub enum ImportError {
    /// File could not be read
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Recording could not be decoded
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Recording had no timestamped records
    #[error("Recording contains no samples")]
    NoSamples,

    /// Decoded series were inconsistent
    #[error("Invalid series: {0}")]
    InvalidSeries(#[from] AnalyticsError),

    /// Storing the activity failed
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}
