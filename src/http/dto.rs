//! Data Transfer Objects for the HTTP API.
//!
//! These DTOs are used for request/response serialization in the REST
//! API. The aggregation payloads are re-exported from the api module
//! since they already derive Serialize/Deserialize.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use crate::api::{
    BlockSummary, CoverageStats, HeatmapCell, OccupancyPoint, RoomDetailData, RoomSnapshot,
    RoomStatus, SummaryData, TimetableSlot,
};
pub use crate::db::models::DatasetInfo;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Storage backend status
    pub database: String,
    /// Metadata of the loaded dataset, if populated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<DatasetInfo>,
}

/// Query parameters for the free-rooms endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FreeRoomsQuery {
    /// Restrict to one campus block
    #[serde(default)]
    pub block: Option<String>,
    /// Minimum capacity
    #[serde(default)]
    pub capacity: Option<i32>,
}

/// Query parameters for the heatmap endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HeatmapQuery {
    /// Aggregation window; falls back to the configured default
    #[serde(default)]
    pub window_minutes: Option<i64>,
}

/// Request body for a room check-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckinRequest {
    pub occupancy_level: i32,
}

/// Response for a room check-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckinResponse {
    pub ok: bool,
    /// Id of the appended history record
    pub occupancy_id: i64,
}

/// Request body for the admin CSV reload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadCsvRequest {
    pub rooms_path: PathBuf,
    pub timetable_path: PathBuf,
}

/// Response for the admin CSV reload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadCsvResponse {
    pub loaded: bool,
    pub dataset: DatasetInfo,
}
