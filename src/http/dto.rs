//! Data Transfer Objects for the HTTP API.
//!
//! Most payloads are re-exported from [`crate::api`] since they already
//! derive Serialize/Deserialize; this module adds request envelopes and the
//! wrappers specific to the REST surface.

use serde::{Deserialize, Serialize};

// Re-export existing DTOs that are already serializable
pub use crate::api::{
    AvailableTeacher, Conflict, ConflictCheck, ConflictKind, GenerationReport, GenerationRequest,
    PreventionSuggestion, ResolutionReport, SuggestionPriority, TimetableConstraints,
    TimetableStatistics,
};
pub use crate::models::{Day, SlotPosition};

/// Response for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub success: bool,
    /// Summary message about the run
    pub message: String,
    pub report: GenerationReport,
}

/// Response listing the conflicts of one timetable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictListResponse {
    pub schedule_id: i64,
    pub conflicts: Vec<Conflict>,
    /// Total count
    pub total: usize,
}

/// Response for a resolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub success: bool,
    pub report: ResolutionReport,
    /// Conflicts still present after the run
    pub remaining_conflicts: Vec<Conflict>,
}

/// Request body for swapping two slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapRequest {
    pub first: SlotPosition,
    pub second: SlotPosition,
}

/// Response for a swap attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapResponse {
    pub success: bool,
    pub message: String,
}

/// Query parameters identifying one (day, period) cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotQuery {
    pub day: Day,
    pub period: u8,
}

/// Query parameters for the teacher conflict check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictCheckQuery {
    pub day: Day,
    pub period: u8,
    /// Class the probe is made on behalf of; its own bookings are ignored
    pub class_id: i64,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Repository connection status
    pub database: String,
}
