//! Storage models for rooms, timetable entries and occupancy history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::RoomKind;

/// A campus room with its current occupancy level.
///
/// Status is not stored; it is derived from the level and the timetable
/// at query time (see `services::compute_status`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier, e.g. `UB-0101`.
    pub room_id: String,
    /// Campus block the room belongs to.
    pub block: String,
    pub capacity: i32,
    pub kind: RoomKind,
    pub ac: bool,
    pub lat: f64,
    pub lon: f64,
    /// Comma-separated amenity list, e.g. `projector,whiteboard`.
    pub amenities: String,
    /// Last known occupancy level in percent, 0..=100.
    pub current_level: i32,
}

/// A scheduled booking for a room. Read-only after seeding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableEntry {
    pub room_id: String,
    /// Day name, `Mon`..`Sun`.
    pub day: String,
    /// Slot index within the day, `0..10`.
    pub slot: u8,
    pub course: String,
}

/// One append-only occupancy history sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccupancyRecord {
    pub id: i64,
    pub room_id: String,
    pub timestamp: DateTime<Utc>,
    /// Occupancy level in percent, 0..=100.
    pub level: i32,
}

/// Metadata about the currently loaded dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetInfo {
    /// SHA-256 over the seeded CSV content.
    pub checksum: String,
    pub rooms: usize,
    pub timetable_entries: usize,
    pub loaded_at: DateTime<Utc>,
}
