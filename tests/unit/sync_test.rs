//! Remote metadata merge through the provider trait.

use super::{at, steady_ride};
use chrono::Duration;
use fitpeaks::storage::SyncSettings;
use fitpeaks::sync::{sync_metadata, unknown_remote_ids, ActivityProvider, RemoteActivity, SyncError};
use fitpeaks::Database;
use std::cell::RefCell;

/// Provider that records which pages were requested.
struct RecordingProvider {
    activities: Vec<RemoteActivity>,
    requests: RefCell<Vec<(usize, usize)>>,
}

impl ActivityProvider for RecordingProvider {
    fn list_activities(&self, start: usize, limit: usize) -> Result<Vec<RemoteActivity>, SyncError> {
        self.requests.borrow_mut().push((start, limit));
        Ok(self.activities.iter().skip(start).take(limit).cloned().collect())
    }
}

fn remote(id: &str, name: &str, hour: u32, distance: f64) -> RemoteActivity {
    let start = at(4, 20, hour);
    RemoteActivity {
        id: id.to_string(),
        name: name.to_string(),
        start_time: start,
        end_time: start + Duration::hours(1),
        distance_meters: distance,
        elevation_meters: 312.0,
    }
}

#[test]
fn test_sync_names_rows_inside_window() {
    let db = Database::open_in_memory().unwrap();
    let early = at(4, 20, 7) - Duration::minutes(4);
    let id = db.store(&steady_ride("ride.fit", early, 3500, 200, 30_000.0)).unwrap();

    let provider = RecordingProvider {
        activities: vec![
            remote("1", "Zwift - Watopia Hilly Route", 7, 30_000.0),
            remote("2", "Zwift - Pairing only", 7, 0.0),
        ],
        requests: RefCell::new(Vec::new()),
    };

    let touched = sync_metadata(&provider, &db, &SyncSettings::default()).unwrap();
    assert_eq!(touched, 1);

    let named = db.load_by_id(id).unwrap().unwrap();
    assert_eq!(named.name.as_deref(), Some("Watopia Hilly Route"));
    assert_eq!(named.elevation_meters, Some(312.0));

    assert_eq!(*provider.requests.borrow(), vec![(0, 50), (50, 50)]);
}

#[test]
fn test_start_slack_is_configurable() {
    let db = Database::open_in_memory().unwrap();
    let early = at(4, 20, 7) - Duration::minutes(4);
    let id = db.store(&steady_ride("ride.fit", early, 3500, 200, 30_000.0)).unwrap();

    let provider = RecordingProvider {
        activities: vec![remote("1", "Zwift - Late", 7, 30_000.0)],
        requests: RefCell::new(Vec::new()),
    };
    let settings = SyncSettings {
        start_slack_minutes: 2,
        ..SyncSettings::default()
    };

    assert_eq!(sync_metadata(&provider, &db, &settings).unwrap(), 0);
    assert!(db.load_by_id(id).unwrap().unwrap().name.is_none());
}

#[test]
fn test_unknown_ids_against_store() {
    let db = Database::open_in_memory().unwrap();
    db.store(&steady_ride("1", at(4, 20, 7), 600, 200, 5_000.0)).unwrap();

    let provider = RecordingProvider {
        activities: vec![remote("1", "a", 7, 1.0), remote("2", "b", 9, 1.0)],
        requests: RefCell::new(Vec::new()),
    };

    let unknown = unknown_remote_ids(&provider, &db.get_known_ids().unwrap()).unwrap();
    assert_eq!(unknown, vec!["2".to_string()]);
}
