//! Service layer with high-level business logic.
//!
//! These functions sit between the HTTP handlers (or the simulator) and
//! the repository traits. They derive room status, apply the check-in
//! validation rules and compute the analytics aggregations.
//!
//! All functions take the repository as `&dyn FullRepository` so they work
//! with any backend, and take `now` explicitly so the time-dependent logic
//! is testable.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use crate::api::{
    current_day_slot, BlockSummary, CoverageStats, HeatmapCell, OccupancyPoint, RoomDetailData,
    RoomSnapshot, RoomStatus, SummaryData, TimetableSlot,
};
use crate::db::models::{OccupancyRecord, Room};
use crate::db::repository::{FullRepository, RepositoryError, RepositoryResult};

/// How many history records a room detail response carries.
pub const HISTORY_LIMIT: usize = 50;

/// Window for the summary insert-rate aggregation.
pub const INSERT_RATE_WINDOW_MINUTES: i64 = 5;

/// Check that the storage backend is reachable.
pub async fn health_check(repo: &dyn FullRepository) -> RepositoryResult<bool> {
    repo.health_check().await
}

/// Derive the status of a room at the given instant.
///
/// A timetable entry covering the current day/slot makes the room
/// `Booked`; otherwise the current level against the threshold decides
/// between `Occupied` and `Free`.
pub async fn compute_status(
    repo: &dyn FullRepository,
    room: &Room,
    threshold: i32,
    now: DateTime<Utc>,
) -> RepositoryResult<RoomStatus> {
    let (day, slot) = current_day_slot(now);
    if repo.is_booked(&room.room_id, day, slot).await? {
        return Ok(RoomStatus::Booked);
    }
    if room.current_level > threshold {
        return Ok(RoomStatus::Occupied);
    }
    Ok(RoomStatus::Free)
}

fn snapshot(room: &Room, status: RoomStatus) -> RoomSnapshot {
    RoomSnapshot {
        room_id: room.room_id.clone(),
        block: room.block.clone(),
        capacity: room.capacity,
        kind: room.kind,
        ac: room.ac,
        lat: room.lat,
        lon: room.lon,
        amenities: room.amenities.clone(),
        status,
        occupancy_level: room.current_level,
    }
}

/// All rooms with their derived status.
pub async fn list_rooms(
    repo: &dyn FullRepository,
    threshold: i32,
    now: DateTime<Utc>,
) -> RepositoryResult<Vec<RoomSnapshot>> {
    let rooms = repo.list_rooms().await?;
    let mut out = Vec::with_capacity(rooms.len());
    for room in &rooms {
        let status = compute_status(repo, room, threshold, now).await?;
        out.push(snapshot(room, status));
    }
    Ok(out)
}

/// Rooms that are currently `Free`, optionally filtered by block and
/// minimum capacity.
pub async fn free_rooms(
    repo: &dyn FullRepository,
    threshold: i32,
    block: Option<&str>,
    min_capacity: Option<i32>,
    now: DateTime<Utc>,
) -> RepositoryResult<Vec<RoomSnapshot>> {
    let rooms = repo.list_rooms().await?;
    let mut out = Vec::new();
    for room in &rooms {
        if let Some(block) = block {
            if room.block != block {
                continue;
            }
        }
        if let Some(min) = min_capacity {
            if room.capacity < min {
                continue;
            }
        }
        let status = compute_status(repo, room, threshold, now).await?;
        if status == RoomStatus::Free {
            out.push(snapshot(room, status));
        }
    }
    Ok(out)
}

/// Full detail for one room: snapshot, timetable and recent history.
pub async fn room_detail(
    repo: &dyn FullRepository,
    room_id: &str,
    threshold: i32,
    now: DateTime<Utc>,
) -> RepositoryResult<RoomDetailData> {
    let room = repo.get_room(room_id).await?;
    let status = compute_status(repo, &room, threshold, now).await?;
    let timetable = repo
        .timetable_for_room(room_id)
        .await?
        .into_iter()
        .map(|t| TimetableSlot {
            day: t.day,
            slot: t.slot,
            course: t.course,
        })
        .collect();
    let occupancy_history = repo
        .recent_history(room_id, HISTORY_LIMIT)
        .await?
        .into_iter()
        .map(|o| OccupancyPoint {
            timestamp: o.timestamp,
            occupancy_level: o.level,
        })
        .collect();
    Ok(RoomDetailData {
        room: snapshot(&room, status),
        timetable,
        occupancy_history,
    })
}

/// Record a check-in for a room.
///
/// Bounds are validated before touching the store; an unknown room
/// surfaces as `RepositoryError::NotFound`.
pub async fn checkin(
    repo: &dyn FullRepository,
    room_id: &str,
    level: i32,
) -> RepositoryResult<OccupancyRecord> {
    if !(0..=100).contains(&level) {
        return Err(RepositoryError::validation(format!(
            "occupancy_level must be within 0..=100, got {}",
            level
        )));
    }
    repo.apply_occupancy(room_id, level).await
}

/// Mean occupancy per block over the trailing window.
///
/// The average is the arithmetic mean of all history records within the
/// window, grouped by the owning room's block. Blocks without samples
/// report an average of 0.
pub async fn heatmap(
    repo: &dyn FullRepository,
    window_minutes: i64,
    now: DateTime<Utc>,
) -> RepositoryResult<Vec<HeatmapCell>> {
    let rooms = repo.list_rooms().await?;
    let block_of: BTreeMap<&str, &str> = rooms
        .iter()
        .map(|r| (r.room_id.as_str(), r.block.as_str()))
        .collect();

    // Duration::minutes panics on out-of-range values, so a bad window
    // must be rejected here rather than fed into the arithmetic.
    let since = Duration::try_minutes(window_minutes)
        .and_then(|window| now.checked_sub_signed(window))
        .ok_or_else(|| {
            RepositoryError::validation(format!(
                "window_minutes {} is out of range",
                window_minutes
            ))
        })?;
    let records = repo.records_since(since).await?;

    let mut sums: BTreeMap<String, (i64, usize)> = rooms
        .iter()
        .map(|r| (r.block.clone(), (0, 0)))
        .collect();
    for record in &records {
        if let Some(block) = block_of.get(record.room_id.as_str()) {
            let entry = sums.entry((*block).to_string()).or_insert((0, 0));
            entry.0 += record.level as i64;
            entry.1 += 1;
        }
    }

    Ok(sums
        .into_iter()
        .map(|(block, (sum, samples))| HeatmapCell {
            block,
            avg_occupancy: if samples == 0 {
                0.0
            } else {
                sum as f64 / samples as f64
            },
            samples,
        })
        .collect())
}

/// Aggregate statistics over the whole dataset.
pub async fn summary(
    repo: &dyn FullRepository,
    now: DateTime<Utc>,
) -> RepositoryResult<SummaryData> {
    let rooms = repo.list_rooms().await?;
    let total_rooms = rooms.len();
    let total_capacity: i64 = rooms.iter().map(|r| r.capacity as i64).sum();

    let mut kinds: BTreeMap<String, usize> = BTreeMap::new();
    for room in &rooms {
        *kinds.entry(room.kind.as_str().to_string()).or_default() += 1;
    }

    let mut per_block: BTreeMap<String, (usize, i64, i64)> = BTreeMap::new();
    for room in &rooms {
        let entry = per_block.entry(room.block.clone()).or_insert((0, 0, 0));
        entry.0 += 1;
        entry.1 += room.capacity as i64;
        entry.2 += room.current_level as i64;
    }
    let blocks = per_block
        .into_iter()
        .map(|(block, (count, capacity, level_sum))| BlockSummary {
            block,
            rooms: count,
            capacity,
            avg_occupancy: if count == 0 {
                0.0
            } else {
                level_sum as f64 / count as f64
            },
        })
        .collect();

    let rooms_with_data = repo.rooms_with_history().await?;
    let coverage = CoverageStats {
        rooms_with_data,
        total_rooms,
        pct: if total_rooms == 0 {
            0.0
        } else {
            rooms_with_data as f64 / total_rooms as f64 * 100.0
        },
    };

    let since = now - Duration::minutes(INSERT_RATE_WINDOW_MINUTES);
    let recent = repo.records_since(since).await?;
    let mut per_minute: BTreeMap<String, usize> = BTreeMap::new();
    for record in &recent {
        let minute = record.timestamp.format("%Y-%m-%dT%H:%M:00Z").to_string();
        *per_minute.entry(minute).or_default() += 1;
    }

    Ok(SummaryData {
        total_rooms,
        total_capacity,
        kinds,
        blocks,
        coverage,
        occupancy_inserts_last_5m: recent.len(),
        occupancy_inserts_per_minute: per_minute,
    })
}
