//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the engine
//! facade for business logic.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::dto::{
    ConflictCheckQuery, ConflictListResponse, GenerateResponse, GenerationRequest, HealthResponse,
    ResolveResponse, SlotQuery, SwapRequest, SwapResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{
    AvailableTeacher, ClassId, ConflictCheck, PreventionSuggestion, ScheduleId, TeacherId,
    TimetableStatistics,
};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the repository
/// is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.engine.repository_health().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Generation
// =============================================================================

/// POST /v1/classes/{class_id}/timetable/generate
///
/// Generate a new active timetable for a class. The body is optional;
/// default constraints apply when it is omitted.
pub async fn generate_timetable(
    State(state): State<AppState>,
    Path(class_id): Path<i64>,
    body: Option<Json<GenerationRequest>>,
) -> HandlerResult<GenerateResponse> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let report = state
        .engine
        .generate_schedule(ClassId::new(class_id), &request)
        .await?;

    Ok(Json(GenerateResponse {
        success: true,
        message: format!(
            "Generated {} slots with {} warnings",
            report.total_slots_generated,
            report.warnings.len()
        ),
        report,
    }))
}

// =============================================================================
// Conflicts
// =============================================================================

/// GET /v1/timetables/{schedule_id}/conflicts
///
/// Re-scan a timetable for conflicts. Read-only.
pub async fn get_conflicts(
    State(state): State<AppState>,
    Path(schedule_id): Path<i64>,
) -> HandlerResult<ConflictListResponse> {
    let conflicts = state
        .engine
        .validate_schedule(ScheduleId::new(schedule_id))
        .await?;

    Ok(Json(ConflictListResponse {
        schedule_id,
        total: conflicts.len(),
        conflicts,
    }))
}

/// POST /v1/timetables/{schedule_id}/resolve-conflicts
///
/// Detect the timetable's current conflicts, relocate or remove the
/// double-booked slots, and report what remains.
pub async fn resolve_conflicts(
    State(state): State<AppState>,
    Path(schedule_id): Path<i64>,
) -> HandlerResult<ResolveResponse> {
    let schedule_id = ScheduleId::new(schedule_id);
    let conflicts = state.engine.validate_schedule(schedule_id).await?;
    let report = state
        .engine
        .resolve_conflicts(schedule_id, &conflicts)
        .await?;
    let remaining = state.engine.validate_schedule(schedule_id).await?;

    Ok(Json(ResolveResponse {
        success: report.unresolved_count == 0,
        report,
        remaining_conflicts: remaining,
    }))
}

/// GET /v1/teachers/{teacher_id}/conflict-check?day=Monday&period=3&class_id=1
///
/// Probe one teacher's availability for one cell.
pub async fn check_teacher_conflict(
    State(state): State<AppState>,
    Path(teacher_id): Path<i64>,
    Query(query): Query<ConflictCheckQuery>,
) -> HandlerResult<ConflictCheck> {
    let check = state
        .engine
        .check_teacher_conflict(
            TeacherId::new(teacher_id),
            query.day,
            query.period,
            ClassId::new(query.class_id),
        )
        .await?;
    Ok(Json(check))
}

// =============================================================================
// Manual edits
// =============================================================================

/// POST /v1/timetables/{schedule_id}/swap-slots
///
/// Exchange the (subject, teacher) pairs of two filled positions.
pub async fn swap_slots(
    State(state): State<AppState>,
    Path(schedule_id): Path<i64>,
    Json(request): Json<SwapRequest>,
) -> HandlerResult<SwapResponse> {
    let swapped = state
        .engine
        .swap_slots(ScheduleId::new(schedule_id), request.first, request.second)
        .await?;

    Ok(Json(if swapped {
        SwapResponse {
            success: true,
            message: "Slots swapped".to_string(),
        }
    } else {
        SwapResponse {
            success: false,
            message: "One or both positions have no slot".to_string(),
        }
    }))
}

// =============================================================================
// Statistics and suggestions
// =============================================================================

/// GET /v1/timetables/{schedule_id}/statistics
pub async fn get_statistics(
    State(state): State<AppState>,
    Path(schedule_id): Path<i64>,
) -> HandlerResult<TimetableStatistics> {
    let stats = state
        .engine
        .timetable_statistics(ScheduleId::new(schedule_id))
        .await?;
    Ok(Json(stats))
}

/// GET /v1/classes/{class_id}/available-teachers?day=Sunday&period=1
pub async fn get_available_teachers(
    State(state): State<AppState>,
    Path(class_id): Path<i64>,
    Query(query): Query<SlotQuery>,
) -> HandlerResult<Vec<AvailableTeacher>> {
    let teachers = state
        .engine
        .available_teachers_for_slot(ClassId::new(class_id), query.day, query.period)
        .await?;
    Ok(Json(teachers))
}

/// GET /v1/classes/{class_id}/suggestions
pub async fn get_suggestions(
    State(state): State<AppState>,
    Path(class_id): Path<i64>,
) -> HandlerResult<Vec<PreventionSuggestion>> {
    let suggestions = state
        .engine
        .conflict_prevention_suggestions(ClassId::new(class_id))
        .await?;
    Ok(Json(suggestions))
}
