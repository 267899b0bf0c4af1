//! Repository traits for room-occupancy storage.
//!
//! The traits split storage concerns by entity: rooms, timetable,
//! occupancy history and dataset lifecycle. `FullRepository` is the
//! blanket supertrait the application passes around as a trait object.
//!
//! # Thread Safety
//! Implementations must be `Send + Sync` to work with async Rust.

mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::models::{DatasetInfo, OccupancyRecord, Room, TimetableEntry};

/// Repository trait for room lookups.
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// List all rooms, ordered by room id.
    async fn list_rooms(&self) -> RepositoryResult<Vec<Room>>;

    /// Fetch a single room by its identifier.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` if the room does not exist
    async fn get_room(&self, room_id: &str) -> RepositoryResult<Room>;
}

/// Repository trait for timetable queries. Entries are read-only after
/// seeding.
#[async_trait]
pub trait TimetableRepository: Send + Sync {
    /// All timetable entries for a room.
    async fn timetable_for_room(&self, room_id: &str) -> RepositoryResult<Vec<TimetableEntry>>;

    /// Whether the room has a booking at the given day/slot.
    async fn is_booked(&self, room_id: &str, day: &str, slot: u8) -> RepositoryResult<bool>;
}

/// Repository trait for occupancy state and history.
#[async_trait]
pub trait OccupancyRepository: Send + Sync {
    /// Record a new occupancy level for a room.
    ///
    /// Updates the room's current level and appends a history record in
    /// one call, so the two never diverge.
    ///
    /// # Returns
    /// * `Ok(OccupancyRecord)` - the appended history record
    /// * `Err(RepositoryError::NotFound)` if the room does not exist
    /// * `Err(RepositoryError::ValidationError)` if the level is outside 0..=100
    async fn apply_occupancy(&self, room_id: &str, level: i32)
        -> RepositoryResult<OccupancyRecord>;

    /// Most recent history records for a room, newest first.
    async fn recent_history(
        &self,
        room_id: &str,
        limit: usize,
    ) -> RepositoryResult<Vec<OccupancyRecord>>;

    /// All history records with a timestamp at or after `since`.
    async fn records_since(&self, since: DateTime<Utc>) -> RepositoryResult<Vec<OccupancyRecord>>;

    /// Number of distinct rooms that have at least one history record.
    async fn rooms_with_history(&self) -> RepositoryResult<usize>;
}

/// Repository trait for dataset lifecycle and health.
#[async_trait]
pub trait DatasetRepository: Send + Sync {
    /// Replace the entire dataset: clears occupancy history and swaps in
    /// the given rooms and timetable.
    ///
    /// # Returns
    /// * `Ok(DatasetInfo)` - metadata about the loaded dataset
    /// * `Err(RepositoryError::ValidationError)` if a timetable entry
    ///   references a room not present in `rooms`
    async fn replace_dataset(
        &self,
        rooms: Vec<Room>,
        timetable: Vec<TimetableEntry>,
        checksum: String,
    ) -> RepositoryResult<DatasetInfo>;

    /// Metadata about the currently loaded dataset, if any.
    async fn dataset_info(&self) -> RepositoryResult<Option<DatasetInfo>>;

    /// Check that the storage backend is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;
}

/// Combined repository interface used by the application.
pub trait FullRepository:
    RoomRepository + TimetableRepository + OccupancyRepository + DatasetRepository
{
}

impl<T> FullRepository for T where
    T: RoomRepository + TimetableRepository + OccupancyRepository + DatasetRepository
{
}
