//! Storage module for the activity database, athlete profile and configuration.

pub mod config;
pub mod database;
pub mod profile;
pub mod schema;

pub use config::{AppConfig, ConfigError, ReportSettings, SyncSettings};
pub use database::{Database, DatabaseError};
pub use profile::{AthleteProfile, AthleteProfileEntry, HeartRateProfile, ProfileError};
