//! Generation driver: fills the weekly grid cell by cell.
//!
//! Iterates the configured school days crossed with periods
//! `1..=max_periods_per_day`, invoking the constraint filter and the
//! candidate selector per cell. The scan terminates after the last cell
//! regardless of remaining pool size; leftover pool entries become
//! unassigned hours, which is expected output and not an error.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, warn};
use rand::Rng;

use crate::api::TimetableConstraints;
use crate::models::{Day, NewSlot};

use super::constraints::{eligible_entries, PlacementTally};
use super::context::GenerationContext;
use super::error::{EngineError, EngineResult};
use super::pool::PoolEntry;
use super::selector::select_candidate;

/// Cooperative cancellation signal, checked at every cell boundary.
///
/// A run cancelled mid-scan aborts before the final persist, so no partial
/// schedule is ever written.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Output of the cell-filling scan, before persistence.
#[derive(Debug)]
pub struct FilledGrid {
    pub slots: Vec<NewSlot>,
    pub warnings: Vec<String>,
    /// Weekly hours left in the pool, keyed by subject name.
    pub unassigned_subject_hours: HashMap<String, u32>,
}

/// Run the days × periods scan over a shuffled pool.
pub fn fill_grid<R: Rng>(
    ctx: &GenerationContext,
    mut pool: Vec<PoolEntry>,
    school_days: &[Day],
    max_periods_per_day: u8,
    constraints: &TimetableConstraints,
    rng: &mut R,
    cancel: &CancelToken,
) -> EngineResult<FilledGrid> {
    let mut slots = Vec::new();
    let mut warnings = Vec::new();
    let mut tally = PlacementTally::new();

    // Assignments without a teacher never enter the pool; report the gap.
    for assignment in &ctx.assignments {
        if assignment.teacher_id.is_none() && assignment.hours_per_week > 0 {
            warnings.push(format!(
                "Subject {} has no teacher assigned ({} hours/week unscheduled)",
                assignment.subject_name, assignment.hours_per_week
            ));
        }
    }

    for &day in school_days {
        for period in 1..=max_periods_per_day {
            if cancel.is_cancelled() {
                warn!(
                    "generation for class {} cancelled at {} period {}",
                    ctx.class.id, day, period
                );
                return Err(EngineError::Cancelled);
            }

            let candidates =
                eligible_entries(&pool, ctx, day, period, &slots, &tally, constraints);

            match select_candidate(&pool, &candidates, day, &tally, constraints, rng) {
                Some(index) => {
                    let entry = pool.remove(index);
                    tally.record(day, entry.subject_id, entry.teacher_id);
                    slots.push(NewSlot {
                        day,
                        period,
                        subject_id: Some(entry.subject_id),
                        teacher_id: Some(entry.teacher_id),
                    });
                }
                None => {
                    warnings.push(format!("No available teacher for {} Period {}", day, period));
                }
            }
        }
    }

    let mut unassigned_subject_hours: HashMap<String, u32> = HashMap::new();
    for entry in &pool {
        *unassigned_subject_hours
            .entry(entry.subject_name.clone())
            .or_insert(0) += 1;
    }

    debug!(
        "filled grid for class {}: {} slots placed, {} warnings, {} hours unassigned",
        ctx.class.id,
        slots.len(),
        warnings.len(),
        pool.len()
    );

    Ok(FilledGrid {
        slots,
        warnings,
        unassigned_subject_hours,
    })
}

/// Heuristic post-run hints: flag skewed daily distribution (spread > 2) and
/// skewed teacher workload (spread > 3).
pub fn optimization_suggestions(slots: &[NewSlot]) -> Vec<String> {
    let mut suggestions = Vec::new();
    if slots.is_empty() {
        return suggestions;
    }

    let mut per_day: HashMap<Day, usize> = HashMap::new();
    for slot in slots {
        *per_day.entry(slot.day).or_insert(0) += 1;
    }
    let max_daily = per_day.values().copied().max().unwrap_or(0);
    let min_daily = per_day.values().copied().min().unwrap_or(0);
    if max_daily - min_daily > 2 {
        suggestions
            .push("Consider redistributing subjects for more balanced daily schedules".to_string());
    }

    let mut per_teacher: HashMap<_, usize> = HashMap::new();
    for slot in slots {
        if let Some(teacher) = slot.teacher_id {
            *per_teacher.entry(teacher).or_insert(0) += 1;
        }
    }
    if let (Some(max), Some(min)) = (
        per_teacher.values().copied().max(),
        per_teacher.values().copied().min(),
    ) {
        if max - min > 3 {
            suggestions
                .push("Some teachers have significantly more periods than others".to_string());
        }
    }

    suggestions
}
