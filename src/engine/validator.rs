//! Schedule validator: recomputes conflicts from current slot state.
//!
//! Validation is read-only and idempotent: two calls with no mutation in
//! between produce identical conflict lists. An empty result is a valid,
//! successful outcome.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::api::{Conflict, ConflictKind, ScheduleId, SubjectId, TeacherId};
use crate::db::TimetableRepository;
use crate::models::{Day, RestrictedPeriod, Schedule};

use super::error::EngineResult;

/// Detect all conflicts in a persisted schedule.
///
/// Fails with `NotFound` for an unknown schedule id; never mutates state.
pub async fn validate_schedule(
    repo: &dyn TimetableRepository,
    schedule_id: ScheduleId,
) -> EngineResult<Vec<Conflict>> {
    let schedule = repo.load_schedule(schedule_id).await?;

    let teacher_ids: Vec<TeacherId> = {
        let mut ids: Vec<TeacherId> = schedule.slots.iter().filter_map(|s| s.teacher_id).collect();
        ids.sort();
        ids.dedup();
        ids
    };

    let mut teacher_names = HashMap::new();
    let mut subject_names = HashMap::new();
    let assignments = repo.load_assignments(schedule.class_id).await?;
    for assignment in &assignments {
        subject_names.insert(assignment.subject_id, assignment.subject_name.clone());
        if let (Some(id), Some(name)) = (assignment.teacher_id, assignment.teacher_name.clone()) {
            teacher_names.insert(id, name);
        }
    }

    let mut restricted: HashMap<TeacherId, Vec<RestrictedPeriod>> = HashMap::new();
    for &teacher_id in &teacher_ids {
        // A teacher deleted out from under the schedule degrades to "no
        // restrictions" rather than failing the whole validation.
        let raw = repo
            .load_restricted_periods(teacher_id)
            .await
            .unwrap_or_default();
        restricted.insert(teacher_id, RestrictedPeriod::parse_list(&raw));
    }

    let foreign: HashSet<(TeacherId, Day, u8)> = repo
        .load_active_slots_for_teachers(&teacher_ids, schedule.class_id)
        .await?
        .into_iter()
        .map(|slot| (slot.teacher_id, slot.day, slot.period))
        .collect();

    let mut conflicts = Vec::new();
    collect_double_bookings(&schedule, &teacher_names, &mut conflicts);
    collect_cross_class(&schedule, &foreign, &teacher_names, &mut conflicts);
    collect_restricted(&schedule, &restricted, &teacher_names, &mut conflicts);
    collect_invalid_pairings(
        &schedule,
        &assignments,
        &teacher_names,
        &subject_names,
        &mut conflicts,
    );

    debug!(
        "validated schedule {}: {} conflicts",
        schedule_id,
        conflicts.len()
    );
    Ok(conflicts)
}

fn teacher_label(names: &HashMap<TeacherId, String>, id: TeacherId) -> String {
    names
        .get(&id)
        .cloned()
        .unwrap_or_else(|| format!("#{}", id))
}

/// Two-or-more slots sharing (teacher, day, period) within this schedule.
/// Every slot in an offending group is reported.
fn collect_double_bookings(
    schedule: &Schedule,
    teacher_names: &HashMap<TeacherId, String>,
    conflicts: &mut Vec<Conflict>,
) {
    let mut groups: HashMap<(TeacherId, Day, u8), usize> = HashMap::new();
    for slot in &schedule.slots {
        if let Some(teacher_id) = slot.teacher_id {
            *groups.entry((teacher_id, slot.day, slot.period)).or_insert(0) += 1;
        }
    }

    for slot in &schedule.slots {
        let Some(teacher_id) = slot.teacher_id else {
            continue;
        };
        if groups[&(teacher_id, slot.day, slot.period)] > 1 {
            conflicts.push(Conflict {
                kind: ConflictKind::TeacherDoubleBooking,
                description: format!(
                    "Teacher {} has multiple classes at {} Period {} in same timetable",
                    teacher_label(teacher_names, teacher_id),
                    slot.day,
                    slot.period
                ),
                slot_id: slot.id,
                day: slot.day,
                period: slot.period,
            });
        }
    }
}

/// Slots colliding with an active slot of a different class.
fn collect_cross_class(
    schedule: &Schedule,
    foreign: &HashSet<(TeacherId, Day, u8)>,
    teacher_names: &HashMap<TeacherId, String>,
    conflicts: &mut Vec<Conflict>,
) {
    for slot in &schedule.slots {
        let Some(teacher_id) = slot.teacher_id else {
            continue;
        };
        if foreign.contains(&(teacher_id, slot.day, slot.period)) {
            conflicts.push(Conflict {
                kind: ConflictKind::TeacherCrossClassDoubleBooking,
                description: format!(
                    "Teacher {} is assigned to another active class at {} Period {}",
                    teacher_label(teacher_names, teacher_id),
                    slot.day,
                    slot.period
                ),
                slot_id: slot.id,
                day: slot.day,
                period: slot.period,
            });
        }
    }
}

/// Slots falling on their teacher's standing restricted periods.
fn collect_restricted(
    schedule: &Schedule,
    restricted: &HashMap<TeacherId, Vec<RestrictedPeriod>>,
    teacher_names: &HashMap<TeacherId, String>,
    conflicts: &mut Vec<Conflict>,
) {
    for slot in &schedule.slots {
        let Some(teacher_id) = slot.teacher_id else {
            continue;
        };
        let blocked = restricted
            .get(&teacher_id)
            .is_some_and(|list| list.iter().any(|rp| rp.matches(slot.day, slot.period)));
        if blocked {
            conflicts.push(Conflict {
                kind: ConflictKind::RestrictedPeriod,
                description: format!(
                    "Teacher {} cannot teach at {} Period {} (restricted period)",
                    teacher_label(teacher_names, teacher_id),
                    slot.day,
                    slot.period
                ),
                slot_id: slot.id,
                day: slot.day,
                period: slot.period,
            });
        }
    }
}

/// Slots whose (subject, teacher) pair no assignment row backs — the
/// schedule drifted from the assignment source of truth.
fn collect_invalid_pairings(
    schedule: &Schedule,
    assignments: &[crate::models::Assignment],
    teacher_names: &HashMap<TeacherId, String>,
    subject_names: &HashMap<SubjectId, String>,
    conflicts: &mut Vec<Conflict>,
) {
    let valid_pairs: HashSet<(SubjectId, TeacherId)> = assignments
        .iter()
        .filter_map(|a| a.teacher_id.map(|t| (a.subject_id, t)))
        .collect();

    for slot in &schedule.slots {
        let (Some(subject_id), Some(teacher_id)) = (slot.subject_id, slot.teacher_id) else {
            continue;
        };
        if !valid_pairs.contains(&(subject_id, teacher_id)) {
            let subject = subject_names
                .get(&subject_id)
                .cloned()
                .unwrap_or_else(|| format!("#{}", subject_id));
            conflicts.push(Conflict {
                kind: ConflictKind::InvalidTeacherSubjectAssignment,
                description: format!(
                    "Teacher {} is not assigned to teach {} in this class",
                    teacher_label(teacher_names, teacher_id),
                    subject
                ),
                slot_id: slot.id,
                day: slot.day,
                period: slot.period,
            });
        }
    }
}
