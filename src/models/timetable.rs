//! Schedule, slot and assignment records.
//!
//! These are the rows the engine reads from and writes to the persistence
//! collaborator. Name fields (`subject_name`, `teacher_name`, `class_name`)
//! arrive denormalized from the store so the engine never has to chase
//! foreign keys mid-run.

use serde::{Deserialize, Serialize};

use crate::api::{ClassId, ScheduleId, SlotId, SubjectId, TeacherId};

use super::day::Day;

/// Lightweight class record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassInfo {
    pub id: ClassId,
    /// Display name, e.g. `"8/A"`.
    pub name: String,
}

/// A teacher-subject-class teaching relationship with its weekly hour quota.
///
/// `hours_per_week` is a property of the subject, carried here so one context
/// load suffices. `teacher_id` is absent for subjects no one has been
/// assigned to yet; such rows contribute no pool entries and are surfaced as
/// gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub class_id: ClassId,
    pub subject_id: SubjectId,
    pub subject_name: String,
    pub hours_per_week: u32,
    pub teacher_id: Option<TeacherId>,
    pub teacher_name: Option<String>,
}

/// Explicit per-slot availability override. Absence of a row means available.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityOverride {
    pub teacher_id: TeacherId,
    pub day: Day,
    pub period: u8,
    pub is_available: bool,
}

/// One materialized cell of a persisted schedule.
///
/// `subject_id`/`teacher_id` are nullable: an empty slot is a valid cell,
/// distinct from an absent one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: SlotId,
    pub schedule_id: ScheduleId,
    pub class_id: ClassId,
    pub day: Day,
    pub period: u8,
    pub subject_id: Option<SubjectId>,
    pub teacher_id: Option<TeacherId>,
}

/// A slot produced by generation, before it has been persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSlot {
    pub day: Day,
    pub period: u8,
    pub subject_id: Option<SubjectId>,
    pub teacher_id: Option<TeacherId>,
}

/// A class's weekly schedule: an ordered set of slots plus an active flag.
///
/// At most one schedule per class is active at a time; persisting a new
/// active schedule deactivates prior ones at the storage boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: ScheduleId,
    pub class_id: ClassId,
    pub name: String,
    pub is_active: bool,
    pub slots: Vec<Slot>,
}

///// Cross-class view row: an occupied cell in some other class's active
/// schedule, with names resolved for conflict messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSlot {
    pub teacher_id: TeacherId,
    pub class_id: ClassId,
    pub class_name: String,
    pub subject_name: Option<String>,
    pub day: Day,
    pub period: u8,
}

/// Addressable position of a slot within a schedule.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotPosition {
    pub day: Day,
    pub period: u8,
}

impl std::fmt::Display for SlotPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} Period {}", self.day, self.period)
    }
}
