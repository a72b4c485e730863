//! Public API surface for the timetable engine.
//!
//! This file consolidates the DTO types exchanged with callers of the engine
//! (the HTTP layer, the CRUD/command layer, tests). All types derive
//! Serialize/Deserialize for JSON serialization.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::Day;

// ==================== Identifier newtypes ====================

/// Class identifier (database primary key).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClassId(pub i64);

/// Teacher identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TeacherId(pub i64);

/// Subject identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubjectId(pub i64);

/// Schedule (timetable) identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScheduleId(pub i64);

/// Slot identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotId(pub i64);

macro_rules! impl_id {
    ($name:ident) => {
        impl $name {
            pub fn new(value: i64) -> Self {
                $name(value)
            }

            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

impl_id!(ClassId);
impl_id!(TeacherId);
impl_id!(SubjectId);
impl_id!(ScheduleId);
impl_id!(SlotId);

// ==================== Generation request ====================

/// Toggleable scheduling constraints.
///
/// Each flag gates one check in the constraint filter or one priority in the
/// candidate selector. Disabling a flag skips the corresponding check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct TimetableConstraints {
    /// Reject candidates whose teacher is already booked at the same
    /// (day, period), in this schedule or in another class's active schedule.
    pub avoid_double_booking: bool,
    /// Cap each subject at two placements per day and prefer the subject
    /// with the fewest placements today when selecting.
    pub spread_subjects_evenly: bool,
    /// Honor the teacher's standing `"Day-Period"` restrictions.
    pub respect_restricted_periods: bool,
    /// Prefer the teacher with the fewest placements so far.
    pub balance_workload: bool,
    /// Allow the same subject in adjacent periods of one day.
    pub allow_consecutive_classes: bool,
}

impl Default for TimetableConstraints {
    fn default() -> Self {
        Self {
            avoid_double_booking: true,
            spread_subjects_evenly: true,
            respect_restricted_periods: true,
            balance_workload: false,
            allow_consecutive_classes: false,
        }
    }
}

/// Parameters for one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationRequest {
    /// Number of periods per school day, in `[1, 8]`.
    pub max_periods_per_day: u8,
    pub constraints: TimetableConstraints,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            max_periods_per_day: 8,
            constraints: TimetableConstraints::default(),
        }
    }
}

// ==================== Generation result ====================

/// Outcome of a successful generation run.
///
/// Warnings and unassigned hours are expected outputs, not errors: they
/// report where the search space ran out of conflict-free capacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub schedule_id: ScheduleId,
    pub class_id: ClassId,
    pub total_slots_generated: usize,
    /// One entry per cell that stayed empty or assignment that had no teacher.
    pub warnings: Vec<String>,
    /// Weekly hours that could not be placed, keyed by subject name.
    pub unassigned_subject_hours: HashMap<String, u32>,
    /// Heuristic hints about skewed daily or teacher distributions.
    pub optimization_suggestions: Vec<String>,
}

// ==================== Conflicts ====================

/// Closed classification of schedule violations.
///
/// Exactly these four kinds exist; exhaustive matches over this enum are the
/// point of keeping it closed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConflictKind {
    /// Two or more slots in the same schedule share (teacher, day, period).
    TeacherDoubleBooking,
    /// A slot collides with an active slot of a different class.
    TeacherCrossClassDoubleBooking,
    /// A slot falls on one of its teacher's restricted periods.
    RestrictedPeriod,
    /// The slot's (subject, teacher) pair has no assignment row for the class.
    InvalidTeacherSubjectAssignment,
}

impl ConflictKind {
    /// Whether the resolver will attempt to relocate slots for this kind.
    /// Restricted periods and invalid pairings require manual reassignment.
    pub fn is_auto_resolvable(&self) -> bool {
        matches!(
            self,
            ConflictKind::TeacherDoubleBooking | ConflictKind::TeacherCrossClassDoubleBooking
        )
    }
}

/// One detected violation. Conflicts are derived on demand from current slot
/// state and never outlive a single validate/resolve cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conflict {
    pub kind: ConflictKind,
    pub description: String,
    pub slot_id: SlotId,
    pub day: Day,
    pub period: u8,
}

// ==================== Resolution result ====================

/// Aggregate outcome of a conflict-resolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionReport {
    pub resolved_count: usize,
    pub unresolved_count: usize,
    /// Human-readable description of each action taken.
    pub trace: Vec<String>,
}

// ==================== Availability checks ====================

/// Result of probing one teacher for one (day, period, class).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictCheck {
    pub is_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicting_class_id: Option<ClassId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicting_class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicting_subject_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ConflictCheck {
    pub fn available() -> Self {
        Self {
            is_available: true,
            conflicting_class_id: None,
            conflicting_class_name: None,
            conflicting_subject_name: None,
            message: None,
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            is_available: false,
            conflicting_class_id: None,
            conflicting_class_name: None,
            conflicting_subject_name: None,
            message: Some(message.into()),
        }
    }
}

/// Per-teacher availability detail for one slot of one class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableTeacher {
    pub teacher_id: TeacherId,
    pub teacher_name: String,
    pub subject_id: SubjectId,
    pub subject_name: String,
    pub is_available: bool,
    pub unavailable_reasons: Vec<String>,
}

// ==================== Statistics and suggestions ====================

/// Aggregate counts over one schedule's slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableStatistics {
    pub schedule_id: ScheduleId,
    pub total_slots: usize,
    pub filled_slots: usize,
    pub empty_slots: usize,
    pub subject_distribution: HashMap<String, usize>,
    pub teacher_workload: HashMap<String, usize>,
    pub daily_distribution: HashMap<String, usize>,
}

/// Severity of a conflict-prevention suggestion.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionPriority {
    High,
    Medium,
    Low,
}

/// Advisory produced before generation: conditions likely to cause
/// conflicts or unassigned hours.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreventionSuggestion {
    pub kind: String,
    pub priority: SuggestionPriority,
    pub description: String,
    pub recommendation: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affected_subjects: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affected_teachers: Vec<String>,
}
