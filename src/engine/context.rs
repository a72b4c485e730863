//! Generation context: one upfront load per run.
//!
//! The original system interleaved store queries with constraint checks
//! inside the cell-filling loop. Here everything a run needs is loaded and
//! indexed once, so the filter and selector work on pure in-memory
//! structures and stay deterministic and unit-testable.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::api::{ClassId, TeacherId};
use crate::db::TimetableRepository;
use crate::models::{Assignment, ClassInfo, Day, RestrictedPeriod};

use super::error::{EngineError, EngineResult};

/// Immutable snapshot of everything one generation run reads.
#[derive(Debug)]
pub struct GenerationContext {
    pub class: ClassInfo,
    pub assignments: Vec<Assignment>,
    /// (teacher, day, period) -> explicit availability. Absent means available.
    overrides: HashMap<(TeacherId, Day, u8), bool>,
    /// Cells occupied by these teachers in other classes' active schedules.
    foreign_bookings: HashSet<(TeacherId, Day, u8)>,
    /// Parsed standing restrictions per teacher. Malformed entries are gone.
    restricted: HashMap<TeacherId, Vec<RestrictedPeriod>>,
}

impl GenerationContext {
    /// Load and index all inputs for one class's generation run.
    ///
    /// Fails with [`EngineError::NotFound`] for an unknown class and
    /// [`EngineError::NoAssignments`] when the class has no assignment rows.
    pub async fn build(
        repo: &dyn TimetableRepository,
        class_id: ClassId,
    ) -> EngineResult<GenerationContext> {
        let class = repo
            .find_class(class_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("Class {} not found", class_id)))?;

        let assignments = repo.load_assignments(class_id).await?;
        if assignments.is_empty() {
            return Err(EngineError::NoAssignments(class_id));
        }

        let teacher_ids: Vec<TeacherId> = {
            let mut ids: Vec<TeacherId> =
                assignments.iter().filter_map(|a| a.teacher_id).collect();
            ids.sort();
            ids.dedup();
            ids
        };

        let mut overrides = HashMap::new();
        for row in repo.load_availability_overrides(&teacher_ids).await? {
            overrides.insert((row.teacher_id, row.day, row.period), row.is_available);
        }

        let mut foreign_bookings = HashSet::new();
        for slot in repo
            .load_active_slots_for_teachers(&teacher_ids, class_id)
            .await?
        {
            foreign_bookings.insert((slot.teacher_id, slot.day, slot.period));
        }

        let mut restricted = HashMap::new();
        for &teacher_id in &teacher_ids {
            let raw = repo.load_restricted_periods(teacher_id).await?;
            restricted.insert(teacher_id, RestrictedPeriod::parse_list(&raw));
        }

        debug!(
            "generation context for class {}: {} assignments, {} overrides, {} foreign bookings",
            class_id,
            assignments.len(),
            overrides.len(),
            foreign_bookings.len()
        );

        Ok(GenerationContext {
            class,
            assignments,
            overrides,
            foreign_bookings,
            restricted,
        })
    }

    /// Explicit override says the teacher is unavailable at this cell.
    pub fn is_override_blocked(&self, teacher: TeacherId, day: Day, period: u8) -> bool {
        self.overrides
            .get(&(teacher, day, period))
            .is_some_and(|available| !available)
    }

    /// The teacher's standing restrictions cover this cell.
    pub fn is_restricted(&self, teacher: TeacherId, day: Day, period: u8) -> bool {
        self.restricted
            .get(&teacher)
            .is_some_and(|list| list.iter().any(|rp| rp.matches(day, period)))
    }

    /// The teacher already teaches another class at this cell.
    pub fn has_foreign_booking(&self, teacher: TeacherId, day: Day, period: u8) -> bool {
        self.foreign_bookings.contains(&(teacher, day, period))
    }

    #[cfg(test)]
    pub(crate) fn for_tests(class: ClassInfo, assignments: Vec<Assignment>) -> Self {
        GenerationContext {
            class,
            assignments,
            overrides: HashMap::new(),
            foreign_bookings: HashSet::new(),
            restricted: HashMap::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_restriction(mut self, teacher: TeacherId, rp: RestrictedPeriod) -> Self {
        self.restricted.entry(teacher).or_default().push(rp);
        self
    }

    #[cfg(test)]
    pub(crate) fn with_override(
        mut self,
        teacher: TeacherId,
        day: Day,
        period: u8,
        available: bool,
    ) -> Self {
        self.overrides.insert((teacher, day, period), available);
        self
    }

    #[cfg(test)]
    pub(crate) fn with_foreign_booking(mut self, teacher: TeacherId, day: Day, period: u8) -> Self {
        self.foreign_bookings.insert((teacher, day, period));
        self
    }
}
