//! In-memory repository implementation.
//!
//! Backs unit tests, local development and the default server configuration.
//! All state lives behind a single `RwLock`, which makes
//! `persist_schedule`'s deactivate-then-insert step atomic — the invariant
//! of at most one active schedule per class holds under concurrent runs.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::api::{ClassId, ScheduleId, SlotId, SubjectId, TeacherId};
use crate::db::repository::{
    ErrorContext, RepositoryError, RepositoryResult, TimetableRepository,
};
use crate::models::{
    ActiveSlot, Assignment, AvailabilityOverride, ClassInfo, Day, NewSlot, Schedule, Slot,
};

#[derive(Debug, Clone)]
struct TeacherRecord {
    name: String,
    restricted_periods: Vec<String>,
}

#[derive(Debug, Clone)]
struct SubjectRecord {
    name: String,
    hours_per_week: u32,
}

#[derive(Debug, Clone)]
struct AssignmentRecord {
    class_id: ClassId,
    subject_id: SubjectId,
    teacher_id: Option<TeacherId>,
}

#[derive(Debug, Default)]
struct Store {
    classes: BTreeMap<ClassId, ClassInfo>,
    teachers: BTreeMap<TeacherId, TeacherRecord>,
    subjects: BTreeMap<SubjectId, SubjectRecord>,
    assignments: Vec<AssignmentRecord>,
    overrides: Vec<AvailabilityOverride>,
    schedules: BTreeMap<ScheduleId, Schedule>,
    next_id: i64,
}

impl Store {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory [`TimetableRepository`] with seeding helpers.
#[derive(Default)]
pub struct LocalRepository {
    store: RwLock<Store>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Seeding helpers ====================

    pub fn add_class(&self, name: impl Into<String>) -> ClassId {
        let mut store = self.store.write();
        let id = ClassId::new(store.next_id());
        store.classes.insert(
            id,
            ClassInfo {
                id,
                name: name.into(),
            },
        );
        id
    }

    pub fn add_teacher(&self, name: impl Into<String>, restricted_periods: &[&str]) -> TeacherId {
        let mut store = self.store.write();
        let id = TeacherId::new(store.next_id());
        store.teachers.insert(
            id,
            TeacherRecord {
                name: name.into(),
                restricted_periods: restricted_periods.iter().map(|s| s.to_string()).collect(),
            },
        );
        id
    }

    pub fn add_subject(&self, name: impl Into<String>, hours_per_week: u32) -> SubjectId {
        let mut store = self.store.write();
        let id = SubjectId::new(store.next_id());
        store.subjects.insert(
            id,
            SubjectRecord {
                name: name.into(),
                hours_per_week,
            },
        );
        id
    }

    pub fn add_assignment(
        &self,
        class_id: ClassId,
        subject_id: SubjectId,
        teacher_id: Option<TeacherId>,
    ) {
        self.store.write().assignments.push(AssignmentRecord {
            class_id,
            subject_id,
            teacher_id,
        });
    }

    pub fn set_availability(
        &self,
        teacher_id: TeacherId,
        day: Day,
        period: u8,
        is_available: bool,
    ) {
        let mut store = self.store.write();
        store
            .overrides
            .retain(|o| !(o.teacher_id == teacher_id && o.day == day && o.period == period));
        store.overrides.push(AvailabilityOverride {
            teacher_id,
            day,
            period,
            is_available,
        });
    }
}

#[async_trait]
impl TimetableRepository for LocalRepository {
    async fn find_class(&self, class_id: ClassId) -> RepositoryResult<Option<ClassInfo>> {
        Ok(self.store.read().classes.get(&class_id).cloned())
    }

    async fn load_assignments(&self, class_id: ClassId) -> RepositoryResult<Vec<Assignment>> {
        let store = self.store.read();
        let assignments = store
            .assignments
            .iter()
            .filter(|row| row.class_id == class_id)
            .map(|row| {
                // A dangling subject reference degrades to zero schedulable
                // hours instead of failing the whole load.
                let (subject_name, hours_per_week) = match store.subjects.get(&row.subject_id) {
                    Some(subject) => (subject.name.clone(), subject.hours_per_week),
                    None => ("Unknown".to_string(), 0),
                };
                let teacher_name = row
                    .teacher_id
                    .and_then(|id| store.teachers.get(&id))
                    .map(|t| t.name.clone());
                Assignment {
                    class_id: row.class_id,
                    subject_id: row.subject_id,
                    subject_name,
                    hours_per_week,
                    teacher_id: row.teacher_id,
                    teacher_name,
                }
            })
            .collect();
        Ok(assignments)
    }

    async fn load_availability_overrides(
        &self,
        teacher_ids: &[TeacherId],
    ) -> RepositoryResult<Vec<AvailabilityOverride>> {
        let store = self.store.read();
        Ok(store
            .overrides
            .iter()
            .filter(|o| teacher_ids.contains(&o.teacher_id))
            .copied()
            .collect())
    }

    async fn load_active_slots_for_teachers(
        &self,
        teacher_ids: &[TeacherId],
        exclude_class: ClassId,
    ) -> RepositoryResult<Vec<ActiveSlot>> {
        let store = self.store.read();
        let mut active = Vec::new();
        for schedule in store.schedules.values() {
            if !schedule.is_active || schedule.class_id == exclude_class {
                continue;
            }
            let class_name = store
                .classes
                .get(&schedule.class_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| schedule.class_id.to_string());
            for slot in &schedule.slots {
                let Some(teacher_id) = slot.teacher_id else {
                    continue;
                };
                if !teacher_ids.contains(&teacher_id) {
                    continue;
                }
                active.push(ActiveSlot {
                    teacher_id,
                    class_id: schedule.class_id,
                    class_name: class_name.clone(),
                    subject_name: slot
                        .subject_id
                        .and_then(|id| store.subjects.get(&id))
                        .map(|s| s.name.clone()),
                    day: slot.day,
                    period: slot.period,
                });
            }
        }
        Ok(active)
    }

    async fn load_restricted_periods(
        &self,
        teacher_id: TeacherId,
    ) -> RepositoryResult<Vec<String>> {
        let store = self.store.read();
        store
            .teachers
            .get(&teacher_id)
            .map(|t| t.restricted_periods.clone())
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("Teacher {} not found", teacher_id),
                    ErrorContext::new("load_restricted_periods")
                        .with_entity("teacher")
                        .with_entity_id(teacher_id),
                )
            })
    }

    async fn persist_schedule(
        &self,
        class_id: ClassId,
        name: &str,
        slots: &[NewSlot],
    ) -> RepositoryResult<Schedule> {
        let mut store = self.store.write();
        if !store.classes.contains_key(&class_id) {
            return Err(RepositoryError::not_found_with_context(
                format!("Class {} not found", class_id),
                ErrorContext::new("persist_schedule")
                    .with_entity("class")
                    .with_entity_id(class_id),
            ));
        }

        // Deactivate and insert under one write lock.
        for schedule in store.schedules.values_mut() {
            if schedule.class_id == class_id {
                schedule.is_active = false;
            }
        }

        let schedule_id = ScheduleId::new(store.next_id());
        let slots = slots
            .iter()
            .map(|slot| {
                let id = SlotId::new(store.next_id());
                Slot {
                    id,
                    schedule_id,
                    class_id,
                    day: slot.day,
                    period: slot.period,
                    subject_id: slot.subject_id,
                    teacher_id: slot.teacher_id,
                }
            })
            .collect();

        let schedule = Schedule {
            id: schedule_id,
            class_id,
            name: name.to_string(),
            is_active: true,
            slots,
        };
        store.schedules.insert(schedule_id, schedule.clone());
        Ok(schedule)
    }

    async fn load_schedule(&self, schedule_id: ScheduleId) -> RepositoryResult<Schedule> {
        self.store
            .read()
            .schedules
            .get(&schedule_id)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("Schedule {} not found", schedule_id),
                    ErrorContext::new("load_schedule")
                        .with_entity("schedule")
                        .with_entity_id(schedule_id),
                )
            })
    }

    async fn save_slot(&self, slot: &Slot) -> RepositoryResult<()> {
        let mut store = self.store.write();
        let schedule = store.schedules.get_mut(&slot.schedule_id).ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("Schedule {} not found", slot.schedule_id),
                ErrorContext::new("save_slot")
                    .with_entity("schedule")
                    .with_entity_id(slot.schedule_id),
            )
        })?;
        let stored = schedule
            .slots
            .iter_mut()
            .find(|s| s.id == slot.id)
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("Slot {} not found", slot.id),
                    ErrorContext::new("save_slot")
                        .with_entity("slot")
                        .with_entity_id(slot.id),
                )
            })?;
        *stored = slot.clone();
        Ok(())
    }

    async fn delete_slot(&self, slot_id: SlotId) -> RepositoryResult<()> {
        let mut store = self.store.write();
        for schedule in store.schedules.values_mut() {
            let before = schedule.slots.len();
            schedule.slots.retain(|s| s.id != slot_id);
            if schedule.slots.len() != before {
                return Ok(());
            }
        }
        Err(RepositoryError::not_found_with_context(
            format!("Slot {} not found", slot_id),
            ErrorContext::new("delete_slot")
                .with_entity("slot")
                .with_entity_id(slot_id),
        ))
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(day: Day, period: u8) -> NewSlot {
        NewSlot {
            day,
            period,
            subject_id: None,
            teacher_id: None,
        }
    }

    #[tokio::test]
    async fn persist_deactivates_prior_active_schedule() {
        let repo = LocalRepository::new();
        let class = repo.add_class("8/A");

        let first = repo
            .persist_schedule(class, "first", &[slot(Day::Sunday, 1)])
            .await
            .unwrap();
        assert!(first.is_active);

        let second = repo
            .persist_schedule(class, "second", &[slot(Day::Monday, 2)])
            .await
            .unwrap();
        assert!(second.is_active);

        let first_reloaded = repo.load_schedule(first.id).await.unwrap();
        assert!(!first_reloaded.is_active);
        let second_reloaded = repo.load_schedule(second.id).await.unwrap();
        assert!(second_reloaded.is_active);
    }

    #[tokio::test]
    async fn persist_does_not_touch_other_classes() {
        let repo = LocalRepository::new();
        let class_a = repo.add_class("8/A");
        let class_b = repo.add_class("8/B");

        let a = repo.persist_schedule(class_a, "a", &[]).await.unwrap();
        let _b = repo.persist_schedule(class_b, "b", &[]).await.unwrap();

        assert!(repo.load_schedule(a.id).await.unwrap().is_active);
    }

    #[tokio::test]
    async fn restricted_periods_for_unknown_teacher_is_not_found() {
        let repo = LocalRepository::new();
        let err = repo
            .load_restricted_periods(TeacherId::new(99))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn availability_override_is_replaced_not_duplicated() {
        let repo = LocalRepository::new();
        let teacher = repo.add_teacher("T", &[]);
        repo.set_availability(teacher, Day::Monday, 1, false);
        repo.set_availability(teacher, Day::Monday, 1, true);

        let overrides = repo.load_availability_overrides(&[teacher]).await.unwrap();
        assert_eq!(overrides.len(), 1);
        assert!(overrides[0].is_available);
    }

    #[tokio::test]
    async fn cross_class_active_slots_carry_names() {
        let repo = LocalRepository::new();
        let class_a = repo.add_class("8/A");
        let class_b = repo.add_class("8/B");
        let teacher = repo.add_teacher("Ms. Vance", &[]);
        let subject = repo.add_subject("History", 2);

        repo.persist_schedule(
            class_b,
            "b",
            &[NewSlot {
                day: Day::Tuesday,
                period: 3,
                subject_id: Some(subject),
                teacher_id: Some(teacher),
            }],
        )
        .await
        .unwrap();

        let active = repo
            .load_active_slots_for_teachers(&[teacher], class_a)
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].class_name, "8/B");
        assert_eq!(active[0].subject_name.as_deref(), Some("History"));

        // The teacher's own class is excluded.
        let none = repo
            .load_active_slots_for_teachers(&[teacher], class_b)
            .await
            .unwrap();
        assert!(none.is_empty());
    }
}
