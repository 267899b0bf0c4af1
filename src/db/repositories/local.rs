//! In-memory repository implementation.
//!
//! Backs the default `local-repo` feature. All tables live behind a single
//! `parking_lot::RwLock`, which is the only writer coordination the system
//! needs: the simulator is the sole periodic writer and check-ins are
//! short single-row updates.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::collections::HashSet;

use super::super::models::{DatasetInfo, OccupancyRecord, Room, TimetableEntry};
use super::super::repository::{
    DatasetRepository, ErrorContext, OccupancyRepository, RepositoryError, RepositoryResult,
    RoomRepository, TimetableRepository,
};

#[derive(Default)]
struct Store {
    /// Keyed by room id; BTreeMap keeps listings ordered.
    rooms: BTreeMap<String, Room>,
    timetable: Vec<TimetableEntry>,
    occupancies: Vec<OccupancyRecord>,
    next_occupancy_id: i64,
    dataset: Option<DatasetInfo>,
}

/// In-memory repository for local development and tests.
pub struct LocalRepository {
    store: RwLock<Store>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Store {
                next_occupancy_id: 1,
                ..Default::default()
            }),
        }
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRepository for LocalRepository {
    async fn list_rooms(&self) -> RepositoryResult<Vec<Room>> {
        Ok(self.store.read().rooms.values().cloned().collect())
    }

    async fn get_room(&self, room_id: &str) -> RepositoryResult<Room> {
        self.store.read().rooms.get(room_id).cloned().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("Room {} not found", room_id),
                ErrorContext::new("get_room")
                    .with_entity("room")
                    .with_entity_id(room_id),
            )
        })
    }
}

#[async_trait]
impl TimetableRepository for LocalRepository {
    async fn timetable_for_room(&self, room_id: &str) -> RepositoryResult<Vec<TimetableEntry>> {
        Ok(self
            .store
            .read()
            .timetable
            .iter()
            .filter(|t| t.room_id == room_id)
            .cloned()
            .collect())
    }

    async fn is_booked(&self, room_id: &str, day: &str, slot: u8) -> RepositoryResult<bool> {
        Ok(self
            .store
            .read()
            .timetable
            .iter()
            .any(|t| t.room_id == room_id && t.day == day && t.slot == slot))
    }
}

#[async_trait]
impl OccupancyRepository for LocalRepository {
    async fn apply_occupancy(
        &self,
        room_id: &str,
        level: i32,
    ) -> RepositoryResult<OccupancyRecord> {
        if !(0..=100).contains(&level) {
            return Err(RepositoryError::validation_with_context(
                format!("Occupancy level {} outside 0..=100", level),
                ErrorContext::new("apply_occupancy")
                    .with_entity("occupancy")
                    .with_entity_id(room_id),
            ));
        }

        let mut store = self.store.write();
        let room = store.rooms.get_mut(room_id).ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("Room {} not found", room_id),
                ErrorContext::new("apply_occupancy")
                    .with_entity("room")
                    .with_entity_id(room_id),
            )
        })?;
        room.current_level = level;

        let record = OccupancyRecord {
            id: store.next_occupancy_id,
            room_id: room_id.to_string(),
            timestamp: Utc::now(),
            level,
        };
        store.next_occupancy_id += 1;
        store.occupancies.push(record.clone());
        Ok(record)
    }

    async fn recent_history(
        &self,
        room_id: &str,
        limit: usize,
    ) -> RepositoryResult<Vec<OccupancyRecord>> {
        let store = self.store.read();
        let mut records: Vec<OccupancyRecord> = store
            .occupancies
            .iter()
            .filter(|o| o.room_id == room_id)
            .cloned()
            .collect();
        // Appends are chronological, so newest-first is a reverse.
        records.reverse();
        records.truncate(limit);
        Ok(records)
    }

    async fn records_since(&self, since: DateTime<Utc>) -> RepositoryResult<Vec<OccupancyRecord>> {
        Ok(self
            .store
            .read()
            .occupancies
            .iter()
            .filter(|o| o.timestamp >= since)
            .cloned()
            .collect())
    }

    async fn rooms_with_history(&self) -> RepositoryResult<usize> {
        let store = self.store.read();
        let distinct: HashSet<&str> = store.occupancies.iter().map(|o| o.room_id.as_str()).collect();
        Ok(distinct.len())
    }
}

#[async_trait]
impl DatasetRepository for LocalRepository {
    async fn replace_dataset(
        &self,
        rooms: Vec<Room>,
        timetable: Vec<TimetableEntry>,
        checksum: String,
    ) -> RepositoryResult<DatasetInfo> {
        let room_ids: HashSet<&str> = rooms.iter().map(|r| r.room_id.as_str()).collect();
        if let Some(orphan) = timetable.iter().find(|t| !room_ids.contains(t.room_id.as_str())) {
            return Err(RepositoryError::validation_with_context(
                format!("Timetable entry references unknown room {}", orphan.room_id),
                ErrorContext::new("replace_dataset").with_entity("timetable"),
            ));
        }

        let info = DatasetInfo {
            checksum,
            rooms: rooms.len(),
            timetable_entries: timetable.len(),
            loaded_at: Utc::now(),
        };

        let mut store = self.store.write();
        store.rooms = rooms.into_iter().map(|r| (r.room_id.clone(), r)).collect();
        store.timetable = timetable;
        store.occupancies.clear();
        store.next_occupancy_id = 1;
        store.dataset = Some(info.clone());
        Ok(info)
    }

    async fn dataset_info(&self) -> RepositoryResult<Option<DatasetInfo>> {
        Ok(self.store.read().dataset.clone())
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }
}
