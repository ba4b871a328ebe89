//! Athlete profile: dated FTP and heart-rate parameters.
//!
//! Entries are piecewise constant. An entry takes effect the day after its
//! stated date, so a query resolves to the latest entry dated strictly
//! before it.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Date format used by the profile file ("10-Jan-2024").
pub const PROFILE_DATE_FORMAT: &str = "%d-%b-%Y";

/// One dated set of athlete parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AthleteProfileEntry {
    /// Date the entry was recorded; effective from the following day
    pub start_date: NaiveDate,
    /// Functional Threshold Power in watts
    pub ftp: u16,
    /// Resting heart rate in bpm
    pub rest_heart_rate: u16,
    /// Threshold heart rate in bpm
    pub threshold_heart_rate: u16,
    /// Maximum heart rate in bpm
    pub max_heart_rate: u16,
}

/// Heart-rate parameters in effect on a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartRateProfile {
    pub rest_heart_rate: u16,
    pub threshold_heart_rate: u16,
    pub max_heart_rate: u16,
}

/// Entry as written in the JSON file.
#[derive(Debug, Deserialize)]
struct RawEntry {
    date: String,
    ftp: u16,
    rhr: u16,
    thr: u16,
    mhr: u16,
}

impl TryFrom<RawEntry> for AthleteProfileEntry {
    type Error = ProfileError;

    fn try_from(raw: RawEntry) -> Result<Self, Self::Error> {
        let start_date = NaiveDate::parse_from_str(&raw.date, PROFILE_DATE_FORMAT)
            .map_err(|e| ProfileError::InvalidDate(format!("{}: {}", raw.date, e)))?;

        Ok(Self {
            start_date,
            ftp: raw.ftp,
            rest_heart_rate: raw.rhr,
            threshold_heart_rate: raw.thr,
            max_heart_rate: raw.mhr,
        })
    }
}

/// Read-only resolver over the athlete's dated entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AthleteProfile {
    /// Sorted by start date
    entries: Vec<AthleteProfileEntry>,
}

impl AthleteProfile {
    /// Build a resolver from entries in any order.
    pub fn new(mut entries: Vec<AthleteProfileEntry>) -> Self {
        entries.sort_by_key(|e| e.start_date);
        Self { entries }
    }

    /// Resolver with no entries; every lookup fails.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the JSON profile file.
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        if !path.exists() {
            return Err(ProfileError::NotFound(path.display().to_string()));
        }

        let content =
            std::fs::read_to_string(path).map_err(|e| ProfileError::IoError(e.to_string()))?;

        Self::from_json(&content)
    }

    /// Parse the JSON array form.
    pub fn from_json(content: &str) -> Result<Self, ProfileError> {
        let raw: Vec<RawEntry> =
            serde_json::from_str(content).map_err(|e| ProfileError::ParseError(e.to_string()))?;

        let entries = raw
            .into_iter()
            .map(AthleteProfileEntry::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Loaded {} athlete profile entries", entries.len());

        Ok(Self::new(entries))
    }

    pub fn entries(&self) -> &[AthleteProfileEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Latest entry dated strictly before `date`.
    pub fn resolve(&self, date: NaiveDate) -> Option<&AthleteProfileEntry> {
        let resolved = self.entries.iter().rev().find(|e| e.start_date < date);
        if resolved.is_none() {
            debug!("No athlete profile in effect on {}", date);
        }
        resolved
    }

    /// Resolve for a timestamp; time of day is ignored.
    pub fn resolve_at(&self, when: NaiveDateTime) -> Option<&AthleteProfileEntry> {
        self.resolve(when.date())
    }

    /// FTP in effect on `date`.
    pub fn ftp(&self, date: NaiveDate) -> Option<u16> {
        self.resolve(date).map(|e| e.ftp)
    }

    /// Heart-rate parameters in effect on `date`.
    pub fn heart_rate(&self, date: NaiveDate) -> Option<HeartRateProfile> {
        self.resolve(date).map(|e| HeartRateProfile {
            rest_heart_rate: e.rest_heart_rate,
            threshold_heart_rate: e.threshold_heart_rate,
            max_heart_rate: e.max_heart_rate,
        })
    }
}

/// Profile loading errors.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Athlete profile not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid profile date: {0}")]
    InvalidDate(String),
}
