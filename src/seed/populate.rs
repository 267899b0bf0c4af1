//! Populate step: load the seeded CSVs into the repository.
//!
//! Loading always replaces the previous dataset, mirroring a fresh
//! startup. The combined file content is checksummed so the loaded
//! dataset can be identified later.

use std::path::Path;

use crate::api::{RoomKind, DAY_NAMES, SLOTS_PER_DAY};
use crate::db::checksum::calculate_checksum;
use crate::db::models::{DatasetInfo, Room, TimetableEntry};
use crate::db::repository::{FullRepository, RepositoryError, RepositoryResult};
use crate::seed::generator::{RoomRecord, TimetableRecord};

fn read_file(path: &Path) -> RepositoryResult<String> {
    std::fs::read_to_string(path).map_err(|e| {
        RepositoryError::configuration(format!("Failed to read {}: {}", path.display(), e))
    })
}

fn room_from_record(record: RoomRecord) -> RepositoryResult<Room> {
    let kind: RoomKind = record
        .kind
        .parse()
        .map_err(|e: String| RepositoryError::validation(e))?;
    Ok(Room {
        room_id: record.room_id,
        block: record.block,
        capacity: record.capacity,
        kind,
        ac: record.ac.eq_ignore_ascii_case("yes"),
        lat: record.lat,
        lon: record.lon,
        amenities: record.amenities,
        current_level: 0,
    })
}

fn entry_from_record(record: TimetableRecord) -> RepositoryResult<TimetableEntry> {
    if !DAY_NAMES.contains(&record.day.as_str()) {
        return Err(RepositoryError::validation(format!(
            "Unknown day name: {}",
            record.day
        )));
    }
    if record.slot >= SLOTS_PER_DAY {
        return Err(RepositoryError::validation(format!(
            "Slot {} outside 0..{}",
            record.slot, SLOTS_PER_DAY
        )));
    }
    Ok(TimetableEntry {
        room_id: record.room_id,
        day: record.day,
        slot: record.slot,
        course: record.course,
    })
}

/// Load rooms and timetable CSVs into the repository, replacing any
/// previously loaded dataset.
pub async fn populate_from_csv(
    repo: &dyn FullRepository,
    rooms_path: &Path,
    timetable_path: &Path,
) -> RepositoryResult<DatasetInfo> {
    let rooms_raw = read_file(rooms_path)?;
    let timetable_raw = read_file(timetable_path)?;
    let checksum = calculate_checksum(&format!("{}{}", rooms_raw, timetable_raw));

    let mut rooms = Vec::new();
    let mut reader = csv::Reader::from_reader(rooms_raw.as_bytes());
    for result in reader.deserialize::<RoomRecord>() {
        let record = result
            .map_err(|e| RepositoryError::validation(format!("Bad rooms CSV row: {}", e)))?;
        rooms.push(room_from_record(record)?);
    }

    let mut timetable = Vec::new();
    let mut reader = csv::Reader::from_reader(timetable_raw.as_bytes());
    for result in reader.deserialize::<TimetableRecord>() {
        let record = result
            .map_err(|e| RepositoryError::validation(format!("Bad timetable CSV row: {}", e)))?;
        timetable.push(entry_from_record(record)?);
    }

    repo.replace_dataset(rooms, timetable, checksum).await
}
