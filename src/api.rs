//! Shared domain types and API response DTOs.
//!
//! These types cross the boundary between the service layer and the HTTP
//! layer, so they all derive Serialize/Deserialize.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Occupancy threshold separating "free" from "occupied", in percent.
pub const DEFAULT_OCCUPANCY_THRESHOLD: i32 = 30;

/// Day names used by the timetable, Monday first.
pub const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Number of timetable slots per day.
pub const SLOTS_PER_DAY: u8 = 10;

/// Map a UTC instant onto the timetable grid.
///
/// Returns the day name (`Mon`..`Sun`) and the slot index (`0..10`, a
/// simple hour-of-day mapping).
pub fn current_day_slot(now: DateTime<Utc>) -> (&'static str, u8) {
    let day = DAY_NAMES[now.weekday().num_days_from_monday() as usize];
    let slot = (now.hour() % SLOTS_PER_DAY as u32) as u8;
    (day, slot)
}

/// Derived status of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    /// A timetable entry covers the current day/slot.
    Booked,
    /// Occupancy level is above the threshold.
    Occupied,
    /// Below threshold and not booked.
    Free,
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RoomStatus::Booked => "booked",
            RoomStatus::Occupied => "occupied",
            RoomStatus::Free => "free",
        };
        f.write_str(s)
    }
}

/// Kind of room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomKind {
    Lecture,
    Lab,
    Auditorium,
}

impl RoomKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomKind::Lecture => "lecture",
            RoomKind::Lab => "lab",
            RoomKind::Auditorium => "auditorium",
        }
    }
}

impl std::str::FromStr for RoomKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lecture" => Ok(RoomKind::Lecture),
            "lab" => Ok(RoomKind::Lab),
            "auditorium" => Ok(RoomKind::Auditorium),
            other => Err(format!("unknown room kind: {}", other)),
        }
    }
}

/// A room with its derived status, as returned by the listing endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub room_id: String,
    pub block: String,
    pub capacity: i32,
    pub kind: RoomKind,
    pub ac: bool,
    pub lat: f64,
    pub lon: f64,
    pub amenities: String,
    pub status: RoomStatus,
    pub occupancy_level: i32,
}

/// A timetable slot for a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableSlot {
    pub day: String,
    pub slot: u8,
    pub course: String,
}

/// A single occupancy history sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccupancyPoint {
    pub timestamp: DateTime<Utc>,
    pub occupancy_level: i32,
}

/// Full detail for a single room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDetailData {
    pub room: RoomSnapshot,
    pub timetable: Vec<TimetableSlot>,
    pub occupancy_history: Vec<OccupancyPoint>,
}

/// Mean occupancy for one campus block over the heatmap window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub block: String,
    pub avg_occupancy: f64,
    /// Number of history records that contributed to the mean.
    pub samples: usize,
}

/// Per-block aggregate for the summary endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockSummary {
    pub block: String,
    pub rooms: usize,
    pub capacity: i64,
    /// Mean of the rooms' current occupancy levels.
    pub avg_occupancy: f64,
}

/// How many rooms have any occupancy data at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageStats {
    pub rooms_with_data: usize,
    pub total_rooms: usize,
    pub pct: f64,
}

/// Aggregate statistics across the whole dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryData {
    pub total_rooms: usize,
    pub total_capacity: i64,
    /// Room counts per room kind.
    pub kinds: BTreeMap<String, usize>,
    pub blocks: Vec<BlockSummary>,
    pub coverage: CoverageStats,
    /// History records inserted in the last five minutes.
    pub occupancy_inserts_last_5m: usize,
    /// Insert counts keyed by minute (RFC 3339, seconds truncated).
    pub occupancy_inserts_per_minute: BTreeMap<String, usize>,
}
