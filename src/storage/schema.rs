//! Database schema definitions.

/// SQL schema for creating all database tables.
pub const SCHEMA: &str = r#"
-- Activities table: raw series, cached aggregates and peak tables
CREATE TABLE IF NOT EXISTS activities (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_id TEXT NOT NULL UNIQUE,
    source_url TEXT,
    start_time TEXT NOT NULL,
    end_time TEXT NOT NULL,
    duration_seconds INTEGER NOT NULL,
    moving_seconds INTEGER NOT NULL,
    distance_meters REAL NOT NULL DEFAULT 0,
    elevation_meters REAL,
    name TEXT,
    power_series TEXT NOT NULL,
    hr_series TEXT NOT NULL,
    avg_power INTEGER NOT NULL,
    max_power INTEGER NOT NULL,
    normalized_power INTEGER NOT NULL,
    avg_hr INTEGER NOT NULL,
    max_hr INTEGER NOT NULL,
    peak_5sec_power INTEGER,
    peak_30sec_power INTEGER,
    peak_60sec_power INTEGER,
    peak_5min_power INTEGER,
    peak_10min_power INTEGER,
    peak_20min_power INTEGER,
    peak_30min_power INTEGER,
    peak_60min_power INTEGER,
    peak_90min_power INTEGER,
    peak_120min_power INTEGER,
    peak_5sec_hr INTEGER,
    peak_30sec_hr INTEGER,
    peak_60sec_hr INTEGER,
    peak_5min_hr INTEGER,
    peak_10min_hr INTEGER,
    peak_20min_hr INTEGER,
    peak_30min_hr INTEGER,
    peak_60min_hr INTEGER,
    peak_90min_hr INTEGER,
    peak_120min_hr INTEGER,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_activities_start_time ON activities(start_time);
"#;

/// SQL for schema version tracking (migrations)
pub const SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);
"#;

/// Current schema version
pub const CURRENT_VERSION: i32 = 1;
