//! Activity store using rusqlite.
//!
//! Times are stored as local wall-clock text (`%Y-%m-%d %H:%M:%S`), which
//! sorts and compares correctly as plain strings.

use crate::metrics::analytics::error::ensure_same_length;
use crate::metrics::analytics::{PeakTable, PeakWindow};
use crate::recording::types::{Activity, TimeSeries};
use crate::storage::schema::{CURRENT_VERSION, SCHEMA, SCHEMA_VERSION_TABLE};
use chrono::{Local, NaiveDate, NaiveDateTime};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Storage format for timestamps.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Scalar columns, in select order.
const BASE_COLUMNS: [&str; 17] = [
    "id",
    "source_id",
    "source_url",
    "start_time",
    "end_time",
    "duration_seconds",
    "moving_seconds",
    "distance_meters",
    "elevation_meters",
    "name",
    "power_series",
    "hr_series",
    "avg_power",
    "max_power",
    "normalized_power",
    "avg_hr",
    "max_hr",
];

/// Offset of the first power peak column in a select.
const POWER_PEAKS_AT: usize = BASE_COLUMNS.len();
/// Offset of the first heart-rate peak column in a select.
const HR_PEAKS_AT: usize = POWER_PEAKS_AT + PeakWindow::ALL.len();

fn peak_columns(suffix: &str) -> impl Iterator<Item = String> + '_ {
    PeakWindow::ALL
        .into_iter()
        .map(move |w| format!("peak_{}_{}", w.column_key(), suffix))
}

/// Every activity column, base first, then power peaks, then heart-rate peaks.
fn activity_columns() -> Vec<String> {
    BASE_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(peak_columns("power"))
        .chain(peak_columns("hr"))
        .collect()
}

fn format_time(time: &NaiveDateTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

fn optional_integer(value: Option<u16>) -> Value {
    value.map_or(Value::Null, |v| Value::Integer(i64::from(v)))
}

/// Database wrapper for SQLite operations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create a database at the given path.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DatabaseError::IoError(e.to_string()))?;
        }

        let conn =
            Connection::open(path).map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let db = Self { conn };
        db.initialize()?;

        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let db = Self { conn };
        db.initialize()?;

        Ok(db)
    }

    /// Initialize the database schema.
    fn initialize(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(SCHEMA_VERSION_TABLE)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

        let current_version = self.get_schema_version()?;

        if current_version < CURRENT_VERSION {
            self.migrate(current_version)?;
        }

        Ok(())
    }

    /// Get the current schema version.
    pub fn get_schema_version(&self) -> Result<i32, DatabaseError> {
        let result: SqliteResult<i32> = self.conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        );

        match result {
            Ok(version) => Ok(version),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
            Err(e) => Err(DatabaseError::QueryFailed(e.to_string())),
        }
    }

    /// Run database migrations.
    fn migrate(&self, from_version: i32) -> Result<(), DatabaseError> {
        if from_version < 1 {
            self.conn
                .execute_batch(SCHEMA)
                .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

            self.conn
                .execute(
                    "INSERT INTO schema_version (version, applied_at) VALUES (?, datetime('now'))",
                    [CURRENT_VERSION],
                )
                .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

            tracing::info!("Database migrated to version {}", CURRENT_VERSION);
        }

        Ok(())
    }

    // ========== Activity Operations ==========

    /// Insert or replace an activity keyed by `source_id`. Returns its row id.
    pub fn store(&self, activity: &Activity) -> Result<i64, DatabaseError> {
        let columns: Vec<String> = activity_columns().into_iter().skip(1).collect();
        let placeholders: Vec<String> = (1..=columns.len() + 1).map(|i| format!("?{}", i)).collect();
        let updates: Vec<String> = columns
            .iter()
            .filter(|c| c.as_str() != "source_id")
            .map(|c| format!("{c} = excluded.{c}"))
            .collect();

        let sql = format!(
            "INSERT INTO activities ({}, created_at) VALUES ({})
             ON CONFLICT(source_id) DO UPDATE SET {}",
            columns.join(", "),
            placeholders.join(", "),
            updates.join(", ")
        );

        let mut values: Vec<Value> = vec![
            Value::Text(activity.source_id.clone()),
            activity
                .source_url
                .clone()
                .map_or(Value::Null, Value::Text),
            Value::Text(format_time(&activity.start_time)),
            Value::Text(format_time(&activity.end_time)),
            Value::Integer(i64::from(activity.duration_seconds)),
            Value::Integer(i64::from(activity.moving_seconds)),
            Value::Real(activity.distance_meters),
            activity.elevation_meters.map_or(Value::Null, Value::Real),
            activity.name.clone().map_or(Value::Null, Value::Text),
            Value::Text(activity.power.encode()),
            Value::Text(activity.heart_rate.encode()),
            Value::Integer(i64::from(activity.avg_power)),
            Value::Integer(i64::from(activity.max_power)),
            Value::Integer(i64::from(activity.normalized_power)),
            Value::Integer(i64::from(activity.avg_heart_rate)),
            Value::Integer(i64::from(activity.max_heart_rate)),
        ];
        values.extend(activity.power_peaks.iter().map(|(_, v)| optional_integer(v)));
        values.extend(activity.hr_peaks.iter().map(|(_, v)| optional_integer(v)));
        values.push(Value::Text(format_time(&Local::now().naive_local())));

        self.conn
            .execute(&sql, params_from_iter(values.iter()))
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        // last_insert_rowid is not updated when the upsert takes the UPDATE path.
        self.conn
            .query_row(
                "SELECT id FROM activities WHERE source_id = ?1",
                params![activity.source_id],
                |row| row.get(0),
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))
    }

    /// Get an activity by row id.
    pub fn load_by_id(&self, id: i64) -> Result<Option<Activity>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM activities WHERE id = ?1",
            activity_columns().join(", ")
        );

        let row = self
            .conn
            .query_row(&sql, params![id], ActivityRow::from_row)
            .optional()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        row.map(ActivityRow::into_activity).transpose()
    }

    /// All activities with a complete peak table, oldest first.
    pub fn load_all(&self) -> Result<Vec<Activity>, DatabaseError> {
        self.query_activities("WHERE peak_10min_power IS NOT NULL", &[])
    }

    /// Activities starting on or after `start_date`, oldest first.
    pub fn load_for_week(&self, start_date: NaiveDate) -> Result<Vec<Activity>, DatabaseError> {
        self.load_since(start_date.and_time(chrono::NaiveTime::MIN))
    }

    /// Activities starting at or after `start`, oldest first.
    pub fn load_since(&self, start: NaiveDateTime) -> Result<Vec<Activity>, DatabaseError> {
        let start = format_time(&start);
        self.query_activities("WHERE start_time >= ?1", &[&start as &dyn rusqlite::ToSql])
    }

    fn query_activities(
        &self,
        filter: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<Activity>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM activities {} ORDER BY start_time, id",
            activity_columns().join(", "),
            filter
        );

        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map(params, ActivityRow::from_row)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut activities = Vec::new();
        for row in rows {
            let row = row.map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            activities.push(row.into_activity()?);
        }

        Ok(activities)
    }

    /// Source ids of every stored activity.
    pub fn get_known_ids(&self) -> Result<HashSet<String>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT source_id FROM activities")
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?
            .collect::<SqliteResult<HashSet<String>>>()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(ids)
    }

    /// Name (and optionally set elevation of) every activity starting in `[start, end)`.
    pub fn update_metadata(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        name: &str,
        elevation_meters: Option<f64>,
    ) -> Result<usize, DatabaseError> {
        self.conn
            .execute(
                "UPDATE activities
                 SET name = ?1, elevation_meters = COALESCE(?2, elevation_meters)
                 WHERE start_time >= ?3 AND start_time < ?4",
                params![name, elevation_meters, format_time(&start), format_time(&end)],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))
    }

    /// Number of stored activities.
    pub fn count(&self) -> Result<usize, DatabaseError> {
        self.conn
            .query_row("SELECT COUNT(*) FROM activities", [], |row| row.get::<_, i64>(0))
            .map(|n| n as usize)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))
    }
}

/// Raw row before text columns are parsed.
struct ActivityRow {
    id: i64,
    source_id: String,
    source_url: Option<String>,
    start_time: String,
    end_time: String,
    duration_seconds: u32,
    moving_seconds: u32,
    distance_meters: f64,
    elevation_meters: Option<f64>,
    name: Option<String>,
    power_series: String,
    hr_series: String,
    avg_power: u16,
    max_power: u16,
    normalized_power: u16,
    avg_hr: u16,
    max_hr: u16,
    power_peaks: PeakTable,
    hr_peaks: PeakTable,
}

impl ActivityRow {
    fn from_row(row: &Row<'_>) -> SqliteResult<Self> {
        Ok(Self {
            id: row.get(0)?,
            source_id: row.get(1)?,
            source_url: row.get(2)?,
            start_time: row.get(3)?,
            end_time: row.get(4)?,
            duration_seconds: row.get(5)?,
            moving_seconds: row.get(6)?,
            distance_meters: row.get(7)?,
            elevation_meters: row.get(8)?,
            name: row.get(9)?,
            power_series: row.get(10)?,
            hr_series: row.get(11)?,
            avg_power: row.get(12)?,
            max_power: row.get(13)?,
            normalized_power: row.get(14)?,
            avg_hr: row.get(15)?,
            max_hr: row.get(16)?,
            power_peaks: read_peaks(row, POWER_PEAKS_AT)?,
            hr_peaks: read_peaks(row, HR_PEAKS_AT)?,
        })
    }

    fn into_activity(self) -> Result<Activity, DatabaseError> {
        let start_time = NaiveDateTime::parse_from_str(&self.start_time, TIME_FORMAT)
            .map_err(|e| DatabaseError::DeserializationError(format!("Invalid start time: {}", e)))?;

        let end_time = NaiveDateTime::parse_from_str(&self.end_time, TIME_FORMAT)
            .map_err(|e| DatabaseError::DeserializationError(format!("Invalid end time: {}", e)))?;

        let power = TimeSeries::decode(&self.power_series).map_err(|e| {
            DatabaseError::DeserializationError(format!("Invalid power series: {}", e))
        })?;

        let heart_rate = TimeSeries::decode(&self.hr_series).map_err(|e| {
            DatabaseError::DeserializationError(format!("Invalid heart-rate series: {}", e))
        })?;

        ensure_same_length(&power, &heart_rate).map_err(|e| {
            DatabaseError::DeserializationError(format!("Activity #{}: {}", self.id, e))
        })?;

        Ok(Activity {
            id: Some(self.id),
            source_id: self.source_id,
            source_url: self.source_url,
            start_time,
            end_time,
            duration_seconds: self.duration_seconds,
            moving_seconds: self.moving_seconds,
            distance_meters: self.distance_meters,
            elevation_meters: self.elevation_meters,
            name: self.name,
            power,
            heart_rate,
            avg_power: self.avg_power,
            max_power: self.max_power,
            normalized_power: self.normalized_power,
            avg_heart_rate: self.avg_hr,
            max_heart_rate: self.max_hr,
            power_peaks: self.power_peaks,
            hr_peaks: self.hr_peaks,
            metrics: None,
            load: Default::default(),
        })
    }
}

fn read_peaks(row: &Row<'_>, offset: usize) -> SqliteResult<PeakTable> {
    let mut table = PeakTable::default();
    for (i, window) in PeakWindow::ALL.into_iter().enumerate() {
        table.set(window, row.get(offset + i)?);
    }
    Ok(table)
}

/// Database errors.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}
