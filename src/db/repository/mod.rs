//! Repository trait for timetable storage.
//!
//! The engine never talks to a database directly: every read and write goes
//! through [`TimetableRepository`], so storage backends can be swapped and the
//! engine can be tested against the in-memory implementation.

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use async_trait::async_trait;

use crate::api::{ClassId, ScheduleId, SlotId, TeacherId};
use crate::models::{
    ActiveSlot, Assignment, AvailabilityOverride, ClassInfo, NewSlot, Schedule, Slot,
};

/// Storage collaborator for the timetable engine.
///
/// Reads are snapshot-style: the engine loads everything it needs before the
/// cell-filling loop and never queries mid-run. The only write during
/// generation is the final [`persist_schedule`](Self::persist_schedule) call,
/// which must atomically deactivate the class's prior active schedule.
/// Per-class serialization and concurrency detection are the implementation's
/// responsibility; the engine does no locking of its own.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait TimetableRepository: Send + Sync {
    /// Look up a class. `Ok(None)` for an unknown id.
    async fn find_class(&self, class_id: ClassId) -> RepositoryResult<Option<ClassInfo>>;

    /// All teacher/subject assignment rows for one class, with subject names
    /// and weekly hours denormalized. Rows without a teacher are included.
    async fn load_assignments(&self, class_id: ClassId) -> RepositoryResult<Vec<Assignment>>;

    /// Explicit availability overrides for the given teachers.
    async fn load_availability_overrides(
        &self,
        teacher_ids: &[TeacherId],
    ) -> RepositoryResult<Vec<AvailabilityOverride>>;

    /// Occupied cells of *other* classes' active schedules for the given
    /// teachers. Used for cross-class double-booking checks.
    async fn load_active_slots_for_teachers(
        &self,
        teacher_ids: &[TeacherId],
        exclude_class: ClassId,
    ) -> RepositoryResult<Vec<ActiveSlot>>;

    /// Raw restricted-period strings stored on a teacher.
    /// Fails with `NotFound` for an unknown teacher.
    async fn load_restricted_periods(&self, teacher_id: TeacherId)
        -> RepositoryResult<Vec<String>>;

    /// Persist a generated slot set as the class's new active schedule,
    /// atomically deactivating any prior active schedule for that class.
    async fn persist_schedule(
        &self,
        class_id: ClassId,
        name: &str,
        slots: &[NewSlot],
    ) -> RepositoryResult<Schedule>;

    /// Load a schedule and its slots. Fails with `NotFound` for an unknown id.
    async fn load_schedule(&self, schedule_id: ScheduleId) -> RepositoryResult<Schedule>;

    /// Update a single slot in place (day, period, subject, teacher).
    async fn save_slot(&self, slot: &Slot) -> RepositoryResult<()>;

    /// Delete a single slot.
    async fn delete_slot(&self, slot_id: SlotId) -> RepositoryResult<()>;

    /// Cheap liveness probe for health endpoints.
    async fn health_check(&self) -> RepositoryResult<bool>;
}
