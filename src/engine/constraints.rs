//! Constraint filter: reduces the pool to entries eligible for one cell.
//!
//! Six checks run per entry, in a fixed order, short-circuiting on the first
//! failure. Each check is toggled by its flag in
//! [`TimetableConstraints`](crate::api::TimetableConstraints); the
//! availability-override check always runs because an explicit "unavailable"
//! row is data, not a preference.

use std::collections::HashMap;

use crate::api::{SubjectId, TeacherId, TimetableConstraints};
use crate::models::{Day, NewSlot};

use super::context::GenerationContext;
use super::pool::PoolEntry;

/// Mutable counters threaded through the cell-filling loop.
///
/// Tracks per-day subject placements (even-spread cap, spread-priority
/// selection) and per-teacher placements (workload-balance selection).
#[derive(Debug, Default)]
pub struct PlacementTally {
    daily_subject: HashMap<(Day, SubjectId), u32>,
    teacher_load: HashMap<TeacherId, u32>,
}

impl PlacementTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, day: Day, subject: SubjectId, teacher: TeacherId) {
        *self.daily_subject.entry((day, subject)).or_insert(0) += 1;
        *self.teacher_load.entry(teacher).or_insert(0) += 1;
    }

    pub fn subject_count_on(&self, day: Day, subject: SubjectId) -> u32 {
        self.daily_subject.get(&(day, subject)).copied().unwrap_or(0)
    }

    pub fn teacher_load(&self, teacher: TeacherId) -> u32 {
        self.teacher_load.get(&teacher).copied().unwrap_or(0)
    }
}

/// Maximum placements of one subject on one day under the even-spread cap.
const EVEN_SPREAD_DAILY_CAP: u32 = 2;

/// Indices of pool entries eligible for (day, period).
///
/// Returning indices rather than entries keeps pool order observable, which
/// the selector uses for tie-breaking.
pub fn eligible_entries(
    pool: &[PoolEntry],
    ctx: &GenerationContext,
    day: Day,
    period: u8,
    placed: &[NewSlot],
    tally: &PlacementTally,
    constraints: &TimetableConstraints,
) -> Vec<usize> {
    pool.iter()
        .enumerate()
        .filter(|(_, entry)| is_eligible(entry, ctx, day, period, placed, tally, constraints))
        .map(|(index, _)| index)
        .collect()
}

fn is_eligible(
    entry: &PoolEntry,
    ctx: &GenerationContext,
    day: Day,
    period: u8,
    placed: &[NewSlot],
    tally: &PlacementTally,
    constraints: &TimetableConstraints,
) -> bool {
    // 1. Standing restricted periods.
    if constraints.respect_restricted_periods && ctx.is_restricted(entry.teacher_id, day, period) {
        return false;
    }

    // 2. Explicit availability override.
    if ctx.is_override_blocked(entry.teacher_id, day, period) {
        return false;
    }

    // 3. Teacher already placed at this cell in the slots assembled so far.
    if constraints.avoid_double_booking
        && placed.iter().any(|slot| {
            slot.teacher_id == Some(entry.teacher_id) && slot.day == day && slot.period == period
        })
    {
        return false;
    }

    // 4. Teacher occupied at this cell in another class's active schedule.
    if constraints.avoid_double_booking && ctx.has_foreign_booking(entry.teacher_id, day, period) {
        return false;
    }

    // 5. Even-spread hard cap: at most two placements of a subject per day.
    if constraints.spread_subjects_evenly
        && tally.subject_count_on(day, entry.subject_id) >= EVEN_SPREAD_DAILY_CAP
    {
        return false;
    }

    // 6. Same subject in an adjacent period of the same day.
    if !constraints.allow_consecutive_classes
        && placed.iter().any(|slot| {
            slot.subject_id == Some(entry.subject_id)
                && slot.day == day
                && slot.period.abs_diff(period) == 1
        })
    {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ClassId;
    use crate::models::{ClassInfo, RestrictedPeriod};

    fn entry(teacher: i64, subject: i64) -> PoolEntry {
        PoolEntry {
            teacher_id: TeacherId::new(teacher),
            subject_id: SubjectId::new(subject),
            subject_name: format!("Subject {}", subject),
        }
    }

    fn empty_ctx() -> GenerationContext {
        GenerationContext::for_tests(
            ClassInfo {
                id: ClassId::new(1),
                name: "8/A".to_string(),
            },
            Vec::new(),
        )
    }

    fn placed(teacher: i64, subject: i64, day: Day, period: u8) -> NewSlot {
        NewSlot {
            day,
            period,
            subject_id: Some(SubjectId::new(subject)),
            teacher_id: Some(TeacherId::new(teacher)),
        }
    }

    #[test]
    fn restricted_period_excludes_entry() {
        let ctx = empty_ctx().with_restriction(
            TeacherId::new(7),
            RestrictedPeriod {
                day: Day::Monday,
                period: 3,
            },
        );
        let pool = vec![entry(7, 10)];
        let constraints = TimetableConstraints::default();

        let on_restricted = eligible_entries(
            &pool,
            &ctx,
            Day::Monday,
            3,
            &[],
            &PlacementTally::new(),
            &constraints,
        );
        assert!(on_restricted.is_empty());

        let elsewhere = eligible_entries(
            &pool,
            &ctx,
            Day::Monday,
            4,
            &[],
            &PlacementTally::new(),
            &constraints,
        );
        assert_eq!(elsewhere, vec![0]);
    }

    #[test]
    fn restricted_check_is_toggleable() {
        let ctx = empty_ctx().with_restriction(
            TeacherId::new(7),
            RestrictedPeriod {
                day: Day::Monday,
                period: 3,
            },
        );
        let pool = vec![entry(7, 10)];
        let constraints = TimetableConstraints {
            respect_restricted_periods: false,
            ..Default::default()
        };

        let candidates = eligible_entries(
            &pool,
            &ctx,
            Day::Monday,
            3,
            &[],
            &PlacementTally::new(),
            &constraints,
        );
        assert_eq!(candidates, vec![0]);
    }

    #[test]
    fn unavailable_override_always_blocks() {
        let ctx = empty_ctx().with_override(TeacherId::new(7), Day::Tuesday, 2, false);
        let pool = vec![entry(7, 10)];
        // Even with every toggle off, the override still blocks.
        let constraints = TimetableConstraints {
            avoid_double_booking: false,
            spread_subjects_evenly: false,
            respect_restricted_periods: false,
            balance_workload: false,
            allow_consecutive_classes: true,
        };

        let candidates = eligible_entries(
            &pool,
            &ctx,
            Day::Tuesday,
            2,
            &[],
            &PlacementTally::new(),
            &constraints,
        );
        assert!(candidates.is_empty());
    }

    #[test]
    fn available_override_does_not_block() {
        let ctx = empty_ctx().with_override(TeacherId::new(7), Day::Tuesday, 2, true);
        let pool = vec![entry(7, 10)];
        let candidates = eligible_entries(
            &pool,
            &ctx,
            Day::Tuesday,
            2,
            &[],
            &PlacementTally::new(),
            &TimetableConstraints::default(),
        );
        assert_eq!(candidates, vec![0]);
    }

    #[test]
    fn same_schedule_double_booking_excludes() {
        let ctx = empty_ctx();
        let pool = vec![entry(7, 10), entry(9, 11)];
        let slots = vec![placed(7, 12, Day::Sunday, 1)];

        let candidates = eligible_entries(
            &pool,
            &ctx,
            Day::Sunday,
            1,
            &slots,
            &PlacementTally::new(),
            &TimetableConstraints::default(),
        );
        assert_eq!(candidates, vec![1]);
    }

    #[test]
    fn cross_class_booking_excludes() {
        let ctx = empty_ctx().with_foreign_booking(TeacherId::new(7), Day::Sunday, 1);
        let pool = vec![entry(7, 10)];

        let candidates = eligible_entries(
            &pool,
            &ctx,
            Day::Sunday,
            1,
            &[],
            &PlacementTally::new(),
            &TimetableConstraints::default(),
        );
        assert!(candidates.is_empty());

        let relaxed = TimetableConstraints {
            avoid_double_booking: false,
            ..Default::default()
        };
        let candidates = eligible_entries(
            &pool,
            &ctx,
            Day::Sunday,
            1,
            &[],
            &PlacementTally::new(),
            &relaxed,
        );
        assert_eq!(candidates, vec![0]);
    }

    #[test]
    fn even_spread_cap_is_hard_at_two() {
        let ctx = empty_ctx();
        let pool = vec![entry(7, 10)];
        let mut tally = PlacementTally::new();
        tally.record(Day::Wednesday, SubjectId::new(10), TeacherId::new(7));
        tally.record(Day::Wednesday, SubjectId::new(10), TeacherId::new(7));

        let candidates = eligible_entries(
            &pool,
            &ctx,
            Day::Wednesday,
            5,
            &[],
            &tally,
            &TimetableConstraints::default(),
        );
        assert!(candidates.is_empty());
    }

    #[test]
    fn consecutive_subject_is_banned_by_default() {
        let ctx = empty_ctx();
        let pool = vec![entry(7, 10)];
        let slots = vec![placed(7, 10, Day::Monday, 4)];
        let constraints = TimetableConstraints::default();

        let adjacent = eligible_entries(
            &pool,
            &ctx,
            Day::Monday,
            5,
            &slots,
            &PlacementTally::new(),
            &constraints,
        );
        assert!(adjacent.is_empty());

        // Period 6 is two away; allowed.
        let distant = eligible_entries(
            &pool,
            &ctx,
            Day::Monday,
            6,
            &slots,
            &PlacementTally::new(),
            &constraints,
        );
        assert_eq!(distant, vec![0]);

        let permissive = TimetableConstraints {
            allow_consecutive_classes: true,
            ..Default::default()
        };
        let adjacent = eligible_entries(
            &pool,
            &ctx,
            Day::Monday,
            5,
            &slots,
            &PlacementTally::new(),
            &permissive,
        );
        assert_eq!(adjacent, vec![0]);
    }
}
