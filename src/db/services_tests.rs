use chrono::{TimeZone, Utc};

use crate::api::{RoomKind, RoomStatus};
use crate::db::models::{Room, TimetableEntry};
use crate::db::repository::{
    DatasetRepository, OccupancyRepository, RepositoryError, RoomRepository,
};
use crate::db::services;
use crate::db::LocalRepository;

const THRESHOLD: i32 = 30;

fn room(room_id: &str, block: &str, capacity: i32, kind: RoomKind) -> Room {
    Room {
        room_id: room_id.to_string(),
        block: block.to_string(),
        capacity,
        kind,
        ac: true,
        lat: 12.8233,
        lon: 80.0424,
        amenities: "projector,whiteboard".to_string(),
        current_level: 0,
    }
}

/// Repository with three rooms in two blocks and one Monday-slot-3 booking.
async fn fixture() -> LocalRepository {
    let repo = LocalRepository::new();
    let rooms = vec![
        room("UB-0101", "UB", 60, RoomKind::Lecture),
        room("UB-0102", "UB", 60, RoomKind::Lecture),
        room("TP-0201", "TP", 120, RoomKind::Auditorium),
    ];
    let timetable = vec![TimetableEntry {
        room_id: "UB-0102".to_string(),
        day: "Mon".to_string(),
        slot: 3,
        course: "CS101".to_string(),
    }];
    repo.replace_dataset(rooms, timetable, "test-checksum".to_string())
        .await
        .unwrap();
    repo
}

/// 2026-08-24 13:00 UTC is a Monday, slot 3.
fn monday_slot3() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 24, 13, 0, 0).unwrap()
}

/// Sunday evening: no fixture bookings apply.
fn quiet_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 23, 18, 0, 0).unwrap()
}

#[tokio::test]
async fn test_status_free_below_threshold() {
    let repo = fixture().await;
    let room = repo.get_room("UB-0101").await.unwrap();
    let status = services::compute_status(&repo, &room, THRESHOLD, quiet_time())
        .await
        .unwrap();
    assert_eq!(status, RoomStatus::Free);
}

#[tokio::test]
async fn test_status_occupied_above_threshold() {
    let repo = fixture().await;
    services::checkin(&repo, "UB-0101", 80).await.unwrap();
    let room = repo.get_room("UB-0101").await.unwrap();
    let status = services::compute_status(&repo, &room, THRESHOLD, quiet_time())
        .await
        .unwrap();
    assert_eq!(status, RoomStatus::Occupied);
}

#[tokio::test]
async fn test_status_booked_wins_over_level() {
    let repo = fixture().await;
    let room = repo.get_room("UB-0102").await.unwrap();
    let status = services::compute_status(&repo, &room, THRESHOLD, monday_slot3())
        .await
        .unwrap();
    assert_eq!(status, RoomStatus::Booked);

    // Same room outside the booked slot is free again.
    let status = services::compute_status(&repo, &room, THRESHOLD, quiet_time())
        .await
        .unwrap();
    assert_eq!(status, RoomStatus::Free);
}

#[tokio::test]
async fn test_free_rooms_excludes_occupied_and_booked() {
    let repo = fixture().await;
    services::checkin(&repo, "TP-0201", 90).await.unwrap();

    let free = services::free_rooms(&repo, THRESHOLD, None, None, monday_slot3())
        .await
        .unwrap();
    let ids: Vec<&str> = free.iter().map(|r| r.room_id.as_str()).collect();
    // UB-0102 is booked at this instant, TP-0201 is occupied.
    assert_eq!(ids, vec!["UB-0101"]);
    assert!(free.iter().all(|r| r.status == RoomStatus::Free));
}

#[tokio::test]
async fn test_free_rooms_filters() {
    let repo = fixture().await;

    let free = services::free_rooms(&repo, THRESHOLD, Some("TP"), None, quiet_time())
        .await
        .unwrap();
    assert_eq!(free.len(), 1);
    assert_eq!(free[0].room_id, "TP-0201");

    let free = services::free_rooms(&repo, THRESHOLD, None, Some(100), quiet_time())
        .await
        .unwrap();
    assert_eq!(free.len(), 1);
    assert_eq!(free[0].capacity, 120);

    let free = services::free_rooms(&repo, THRESHOLD, Some("UB"), Some(100), quiet_time())
        .await
        .unwrap();
    assert!(free.is_empty());
}

#[tokio::test]
async fn test_checkin_bounds() {
    let repo = fixture().await;
    for level in [-1, 101, 500] {
        let err = services::checkin(&repo, "UB-0101", level).await.unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError { .. }));
    }
    // Nothing was written.
    let history = repo.recent_history("UB-0101", 10).await.unwrap();
    assert!(history.is_empty());

    let record = services::checkin(&repo, "UB-0101", 100).await.unwrap();
    assert_eq!(record.level, 100);
}

#[tokio::test]
async fn test_checkin_unknown_room() {
    let repo = fixture().await;
    let err = services::checkin(&repo, "ZZ-9999", 50).await.unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}

#[tokio::test]
async fn test_room_detail_history_is_newest_first() {
    let repo = fixture().await;
    for level in [10, 20, 30] {
        services::checkin(&repo, "UB-0101", level).await.unwrap();
    }
    let detail = services::room_detail(&repo, "UB-0101", THRESHOLD, quiet_time())
        .await
        .unwrap();
    let levels: Vec<i32> = detail
        .occupancy_history
        .iter()
        .map(|o| o.occupancy_level)
        .collect();
    assert_eq!(levels, vec![30, 20, 10]);
}

#[tokio::test]
async fn test_heatmap_is_arithmetic_mean_per_block() {
    let repo = fixture().await;
    services::checkin(&repo, "UB-0101", 10).await.unwrap();
    services::checkin(&repo, "UB-0101", 20).await.unwrap();
    services::checkin(&repo, "UB-0102", 60).await.unwrap();
    services::checkin(&repo, "TP-0201", 40).await.unwrap();

    let cells = services::heatmap(&repo, 15, Utc::now()).await.unwrap();
    assert_eq!(cells.len(), 2);

    let tp = cells.iter().find(|c| c.block == "TP").unwrap();
    assert_eq!(tp.samples, 1);
    assert!((tp.avg_occupancy - 40.0).abs() < 1e-9);

    let ub = cells.iter().find(|c| c.block == "UB").unwrap();
    assert_eq!(ub.samples, 3);
    assert!((ub.avg_occupancy - 30.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_heatmap_empty_window_reports_zero() {
    let repo = fixture().await;
    let cells = services::heatmap(&repo, 15, Utc::now()).await.unwrap();
    assert_eq!(cells.len(), 2);
    for cell in cells {
        assert_eq!(cell.samples, 0);
        assert_eq!(cell.avg_occupancy, 0.0);
    }
}

#[tokio::test]
async fn test_heatmap_rejects_out_of_range_window() {
    let repo = fixture().await;
    for window in [i64::MAX, i64::MIN] {
        let err = services::heatmap(&repo, window, Utc::now()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError { .. }));
    }
}

#[tokio::test]
async fn test_summary_counts_and_coverage() {
    let repo = fixture().await;
    services::checkin(&repo, "UB-0101", 50).await.unwrap();
    services::checkin(&repo, "UB-0101", 60).await.unwrap();

    let summary = services::summary(&repo, Utc::now()).await.unwrap();
    assert_eq!(summary.total_rooms, 3);
    assert_eq!(summary.total_capacity, 240);
    assert_eq!(summary.kinds.get("lecture"), Some(&2));
    assert_eq!(summary.kinds.get("auditorium"), Some(&1));

    assert_eq!(summary.coverage.rooms_with_data, 1);
    assert_eq!(summary.coverage.total_rooms, 3);
    assert!((summary.coverage.pct - 100.0 / 3.0).abs() < 1e-9);

    assert_eq!(summary.occupancy_inserts_last_5m, 2);
    let per_minute_total: usize = summary.occupancy_inserts_per_minute.values().sum();
    assert_eq!(per_minute_total, 2);

    let ub = summary.blocks.iter().find(|b| b.block == "UB").unwrap();
    assert_eq!(ub.rooms, 2);
    assert_eq!(ub.capacity, 120);
    // Current levels: UB-0101 at 60 (last check-in), UB-0102 at 0.
    assert!((ub.avg_occupancy - 30.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_replace_dataset_rejects_orphan_timetable() {
    let repo = LocalRepository::new();
    let rooms = vec![room("UB-0101", "UB", 60, RoomKind::Lecture)];
    let timetable = vec![TimetableEntry {
        room_id: "TP-9999".to_string(),
        day: "Mon".to_string(),
        slot: 0,
        course: "CS101".to_string(),
    }];
    let err = repo
        .replace_dataset(rooms, timetable, "x".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ValidationError { .. }));
}
