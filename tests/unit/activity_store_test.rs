//! Activity store round trips and directory ingestion.

use super::{at, steady_ride};
use fitpeaks::metrics::PeakWindow;
use fitpeaks::recording::loader::IN_PROGRESS_FILE;
use fitpeaks::recording::load_directory;
use fitpeaks::Database;

#[test]
fn test_file_backed_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("activities.db");

    let mut ride = steady_ride("2024-03-12-17-30-00.fit", at(3, 12, 17), 1500, 210, 12_000.0);
    ride.name = Some("Tempo".to_string());
    ride.elevation_meters = Some(140.0);

    let id = {
        let db = Database::open(&path).unwrap();
        db.store(&ride).unwrap()
    };

    let db = Database::open(&path).unwrap();
    let loaded = db.load_by_id(id).unwrap().unwrap();

    assert_eq!(loaded.id, Some(id));
    assert_eq!(loaded.start_time, ride.start_time);
    assert_eq!(loaded.power, ride.power);
    assert_eq!(loaded.heart_rate, ride.heart_rate);
    assert_eq!(loaded.power_peaks, ride.power_peaks);
    assert_eq!(loaded.hr_peaks.get(PeakWindow::Min20), Some(140));
    assert_eq!(loaded.hr_peaks.get(PeakWindow::Min30), None);
    assert_eq!(loaded.name.as_deref(), Some("Tempo"));
    assert!(loaded.metrics.is_none());
}

#[test]
fn test_store_is_upsert_by_source_id() {
    let db = Database::open_in_memory().unwrap();
    let ride = steady_ride("same.fit", at(3, 12, 17), 900, 200, 8_000.0);

    let first = db.store(&ride).unwrap();
    let second = db.store(&ride).unwrap();

    assert_eq!(first, second);
    assert_eq!(db.count().unwrap(), 1);
}

#[test]
fn test_peak_report_rows_need_ten_minutes() {
    let db = Database::open_in_memory().unwrap();
    db.store(&steady_ride("short.fit", at(3, 11, 7), 300, 250, 3_000.0)).unwrap();
    db.store(&steady_ride("long.fit", at(3, 12, 7), 900, 200, 8_000.0)).unwrap();

    let all = db.load_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].source_id, "long.fit");

    let week = db.load_for_week(at(3, 11, 0).date()).unwrap();
    assert_eq!(week.len(), 2);
    assert!(week[0].start_time < week[1].start_time);
}

#[test]
fn test_missing_row_is_none() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.load_by_id(99).unwrap().is_none());
}

#[test]
fn test_load_directory_skips_and_continues() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(IN_PROGRESS_FILE), b"partial").unwrap();
    std::fs::write(dir.path().join("broken.fit"), b"not a fit file").unwrap();

    let db = Database::open_in_memory().unwrap();
    db.store(&steady_ride("known.fit", at(3, 12, 7), 60, 150, 500.0)).unwrap();
    std::fs::write(dir.path().join("known.fit"), b"already stored").unwrap();

    let summary = load_directory(&db, dir.path()).unwrap();

    assert_eq!(summary.loaded, 0);
    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(db.count().unwrap(), 1);
}
