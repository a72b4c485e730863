//! Conflict resolver: relocates or removes double-booked slots.
//!
//! Only double-booking conflicts are auto-resolved; restricted-period and
//! invalid-pairing conflicts require manual reassignment and are skipped.
//! For each offending slot the full grid is scanned in fixed order for a
//! free, non-restricted, cross-class-clean cell; the first hit wins. When
//! the grid is exhausted the slot is deleted outright — a deliberately lossy
//! fallback, and the removed hour is surfaced in the trace for manual
//! follow-up rather than re-queued.

use std::collections::{HashMap, HashSet};

use log::{info, warn};

use crate::api::{Conflict, ResolutionReport, ScheduleId, SubjectId, TeacherId};
use crate::db::TimetableRepository;
use crate::models::{Day, RestrictedPeriod, Slot};

use super::error::EngineResult;

/// Attempt to resolve the given conflicts on one schedule.
///
/// Per-conflict failures do not abort the rest; the report always carries
/// exact resolved/unresolved counts and a trace of every action.
pub async fn resolve_conflicts(
    repo: &dyn TimetableRepository,
    schedule_id: ScheduleId,
    conflicts: &[Conflict],
    school_days: &[Day],
    max_periods_per_day: u8,
) -> EngineResult<ResolutionReport> {
    let schedule = repo.load_schedule(schedule_id).await?;
    let mut slots = schedule.slots.clone();

    let subject_names: HashMap<SubjectId, String> = repo
        .load_assignments(schedule.class_id)
        .await?
        .into_iter()
        .map(|a| (a.subject_id, a.subject_name))
        .collect();

    let teacher_ids: Vec<TeacherId> = {
        let mut ids: Vec<TeacherId> = slots.iter().filter_map(|s| s.teacher_id).collect();
        ids.sort();
        ids.dedup();
        ids
    };

    let foreign: HashSet<(TeacherId, Day, u8)> = repo
        .load_active_slots_for_teachers(&teacher_ids, schedule.class_id)
        .await?
        .into_iter()
        .map(|slot| (slot.teacher_id, slot.day, slot.period))
        .collect();

    let mut restricted: HashMap<TeacherId, Vec<RestrictedPeriod>> = HashMap::new();
    for &teacher_id in &teacher_ids {
        let raw = repo
            .load_restricted_periods(teacher_id)
            .await
            .unwrap_or_default();
        restricted.insert(teacher_id, RestrictedPeriod::parse_list(&raw));
    }

    let mut resolved_count = 0;
    let mut unresolved_count = 0;
    let mut trace = Vec::new();

    for conflict in conflicts
        .iter()
        .filter(|c| c.kind.is_auto_resolvable())
    {
        let Some(position) = slots.iter().position(|s| s.id == conflict.slot_id) else {
            // Already moved or deleted while resolving an earlier conflict of
            // the same group.
            unresolved_count += 1;
            trace.push(format!("Slot {} no longer exists", conflict.slot_id));
            continue;
        };

        let slot = slots[position].clone();
        let subject = slot
            .subject_id
            .and_then(|id| subject_names.get(&id).cloned())
            .unwrap_or_else(|| format!("slot {}", slot.id));

        match find_alternative_cell(
            &slot,
            &slots,
            &foreign,
            &restricted,
            school_days,
            max_periods_per_day,
        ) {
            Some((day, period)) => {
                let mut moved = slot.clone();
                moved.day = day;
                moved.period = period;
                match repo.save_slot(&moved).await {
                    Ok(()) => {
                        slots[position] = moved;
                        resolved_count += 1;
                        trace.push(format!("Moved {} to {} Period {}", subject, day, period));
                    }
                    Err(e) => {
                        warn!("failed to relocate slot {}: {}", slot.id, e);
                        unresolved_count += 1;
                        trace.push(format!("Error resolving conflict: {}", e));
                    }
                }
            }
            None => match repo.delete_slot(slot.id).await {
                Ok(()) => {
                    slots.remove(position);
                    resolved_count += 1;
                    trace.push(format!(
                        "Removed conflicting slot: {} on {} Period {}",
                        subject, slot.day, slot.period
                    ));
                }
                Err(e) => {
                    warn!("failed to delete slot {}: {}", slot.id, e);
                    unresolved_count += 1;
                    trace.push(format!("Error resolving conflict: {}", e));
                }
            },
        }
    }

    info!(
        "resolution for schedule {}: {} resolved, {} unresolved",
        schedule_id, resolved_count, unresolved_count
    );

    Ok(ResolutionReport {
        resolved_count,
        unresolved_count,
        trace,
    })
}

/// First (day, period) other than the slot's current cell that is empty in
/// this schedule, not restricted for the teacher, and free of cross-class
/// bookings. Scan order is fixed: school days in weekly order, periods
/// ascending.
fn find_alternative_cell(
    slot: &Slot,
    slots: &[Slot],
    foreign: &HashSet<(TeacherId, Day, u8)>,
    restricted: &HashMap<TeacherId, Vec<RestrictedPeriod>>,
    school_days: &[Day],
    max_periods_per_day: u8,
) -> Option<(Day, u8)> {
    let teacher_id = slot.teacher_id?;

    for &day in school_days {
        for period in 1..=max_periods_per_day {
            if day == slot.day && period == slot.period {
                continue;
            }
            if slots.iter().any(|s| s.day == day && s.period == period) {
                continue;
            }
            let is_restricted = restricted
                .get(&teacher_id)
                .is_some_and(|list| list.iter().any(|rp| rp.matches(day, period)));
            if is_restricted {
                continue;
            }
            if foreign.contains(&(teacher_id, day, period)) {
                continue;
            }
            return Some((day, period));
        }
    }
    None
}
