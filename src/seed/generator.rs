//! Deterministic sample data generator.
//!
//! Produces the fixed three-block campus layout as CSV files:
//!
//! - UB: 15 floors of 20 lecture rooms
//! - TP: 15 floors of 8 lecture rooms plus 4 labs
//! - TP2: 12 lecture floors of 20 rooms, 3 lab floors of 15 rooms and
//!   12 auditoriums on floor 7
//!
//! All randomness flows from the seed, so a given seed always produces
//! byte-identical output.

use anyhow::{Context, Result};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;

use crate::api::{DAY_NAMES, SLOTS_PER_DAY};

const UB_COORD: (f64, f64) = (12.8233083, 80.0424496);
const TP_COORD: (f64, f64) = (12.8250106, 80.0450886);
const TP2_COORD: (f64, f64) = (12.8247474, 80.0465691);

const COURSES: [&str; 4] = ["CS101", "MATH201", "ENG101", "PHY102"];

/// Fraction of lecture rooms booked per day/slot.
const BOOKED_FRACTION: f64 = 0.6;

/// Coordinate jitter span in degrees.
const JITTER_SPAN: f64 = 0.0006;

/// One row of `rooms.csv`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomRecord {
    pub room_id: String,
    pub block: String,
    pub capacity: i32,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "AC")]
    pub ac: String,
    pub lat: f64,
    pub lon: f64,
    pub amenities: String,
}

/// One row of `timetable.csv`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableRecord {
    pub room_id: String,
    pub day: String,
    pub slot: u8,
    pub course: String,
}

/// Deterministic per-room coordinate jitter around a block anchor.
fn jitter(lat: f64, lon: f64, key: &str, seed: u64) -> (f64, f64) {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    seed.hash(&mut hasher);
    let mut rng = StdRng::seed_from_u64(hasher.finish());
    (
        lat + rng.gen_range(-JITTER_SPAN..=JITTER_SPAN),
        lon + rng.gen_range(-JITTER_SPAN..=JITTER_SPAN),
    )
}

fn room(
    room_id: String,
    block: &str,
    capacity: i32,
    kind: &str,
    anchor: (f64, f64),
    jitter_key: &str,
    seed: u64,
    amenities: &str,
) -> RoomRecord {
    let (lat, lon) = jitter(anchor.0, anchor.1, jitter_key, seed);
    RoomRecord {
        room_id,
        block: block.to_string(),
        capacity,
        kind: kind.to_string(),
        ac: "Yes".to_string(),
        // Keep the written precision stable across platforms.
        lat: (lat * 1e6).round() / 1e6,
        lon: (lon * 1e6).round() / 1e6,
        amenities: amenities.to_string(),
    }
}

/// Build the full campus room list for a seed.
pub fn build_rooms(seed: u64) -> Vec<RoomRecord> {
    let mut rows = Vec::new();

    // UB: 15 floors, 20 classrooms per floor.
    for floor in 1..=15 {
        for rn in 1..=20 {
            rows.push(room(
                format!("UB-{:02}{:02}", floor, rn),
                "UB",
                60,
                "lecture",
                UB_COORD,
                &format!("UB-{}-{}-{}", floor, rn, seed),
                seed,
                "projector,whiteboard",
            ));
        }
    }

    // TP: 15 floors, rooms 1-4 and 9-12.
    for floor in 1..=15 {
        for rn in [1, 2, 3, 4, 9, 10, 11, 12] {
            rows.push(room(
                format!("TP-{:02}{:02}", floor, rn),
                "TP",
                60,
                "lecture",
                TP_COORD,
                &format!("TP-{}-{}-{}", floor, rn, seed),
                seed,
                "projector,whiteboard",
            ));
        }
    }
    // Four TP labs on distinct floors.
    for (floor, rn) in [(2, 21), (5, 22), (8, 23), (11, 24)] {
        rows.push(room(
            format!("TP-{:02}{:02}", floor, rn),
            "TP",
            60,
            "lab",
            TP_COORD,
            &format!("TP-LAB-{}-{}-{}", floor, rn, seed),
            seed,
            "projector,whiteboard",
        ));
    }

    // TP2 classrooms: ground floor plus 1,2,6,8-15.
    let classroom_floors: [&str; 12] = [
        "00", "01", "02", "06", "08", "09", "10", "11", "12", "13", "14", "15",
    ];
    for fl in classroom_floors {
        for rn in 1..=20 {
            rows.push(room(
                format!("TP2-{}{:02}", fl, rn),
                "TP2",
                60,
                "lecture",
                TP2_COORD,
                &format!("TP2-C-{}-{}-{}", fl, rn, seed),
                seed,
                "projector,whiteboard",
            ));
        }
    }
    // TP2 labs on floors 3-5, 15 per floor.
    for fl in 3..=5 {
        for rn in 1..=15 {
            rows.push(room(
                format!("TP2-{:02}{:02}", fl, rn),
                "TP2",
                60,
                "lab",
                TP2_COORD,
                &format!("TP2-L-{}-{}-{}", fl, rn, seed),
                seed,
                "projector,whiteboard",
            ));
        }
    }
    // TP2 auditoriums on floor 7, ~1330 total seats.
    let aud_caps = [120, 120, 120, 110, 110, 110, 110, 110, 110, 110, 100, 100];
    for (idx, cap) in aud_caps.into_iter().enumerate() {
        let rn = idx + 1;
        rows.push(room(
            format!("TP2-07{:02}", rn),
            "TP2",
            cap,
            "auditorium",
            TP2_COORD,
            &format!("TP2-AUD-7-{}-{}", rn, seed),
            seed,
            "projector",
        ));
    }

    rows
}

/// Build the timetable for a room list, booking a fixed fraction of
/// lecture rooms in every day/slot cell.
pub fn build_timetable(rooms: &[RoomRecord], seed: u64) -> Vec<TimetableRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut lecture_rooms: Vec<&str> = rooms
        .iter()
        .filter(|r| r.kind == "lecture")
        .map(|r| r.room_id.as_str())
        .collect();

    let per_slot = ((lecture_rooms.len() as f64 * BOOKED_FRACTION) as usize).max(1);
    let mut entries = Vec::with_capacity(DAY_NAMES.len() * SLOTS_PER_DAY as usize * per_slot);
    for day in DAY_NAMES {
        for slot in 0..SLOTS_PER_DAY {
            lecture_rooms.shuffle(&mut rng);
            for room_id in lecture_rooms.iter().take(per_slot) {
                let course = COURSES[rng.gen_range(0..COURSES.len())];
                entries.push(TimetableRecord {
                    room_id: room_id.to_string(),
                    day: day.to_string(),
                    slot,
                    course: course.to_string(),
                });
            }
        }
    }
    entries
}

/// Write `rooms.csv` and `timetable.csv` for a seed.
///
/// # Returns
/// The number of room rows and timetable rows written.
pub fn write_sample_data(
    rooms_path: &Path,
    timetable_path: &Path,
    seed: u64,
) -> Result<(usize, usize)> {
    let rooms = build_rooms(seed);
    let timetable = build_timetable(&rooms, seed);

    for path in [rooms_path, timetable_path] {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }

    let mut writer = csv::Writer::from_path(rooms_path)
        .with_context(|| format!("opening {}", rooms_path.display()))?;
    for row in &rooms {
        writer.serialize(row)?;
    }
    writer.flush()?;

    let mut writer = csv::Writer::from_path(timetable_path)
        .with_context(|| format!("opening {}", timetable_path.display()))?;
    for row in &timetable {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok((rooms.len(), timetable.len()))
}
