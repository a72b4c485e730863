//! Candidate selector: picks one entry for a cell from the filtered set.
//!
//! Priority order: workload balance (when enabled), then even subject spread
//! (when enabled), then a uniform random pick. Ties inside the deterministic
//! priorities break by pool order, so a seeded run is fully reproducible.

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::api::TimetableConstraints;
use crate::models::Day;

use super::constraints::PlacementTally;
use super::pool::PoolEntry;

/// Select the pool index to place at (day, period), or `None` when the
/// filtered candidate set is empty.
pub fn select_candidate<R: Rng>(
    pool: &[PoolEntry],
    candidates: &[usize],
    day: Day,
    tally: &PlacementTally,
    constraints: &TimetableConstraints,
    rng: &mut R,
) -> Option<usize> {
    match candidates {
        [] => None,
        [only] => Some(*only),
        _ => Some(select_among(pool, candidates, day, tally, constraints, rng)),
    }
}

fn select_among<R: Rng>(
    pool: &[PoolEntry],
    candidates: &[usize],
    day: Day,
    tally: &PlacementTally,
    constraints: &TimetableConstraints,
    rng: &mut R,
) -> usize {
    // Priority 1: the teacher with the fewest placements so far. Only decides
    // the cell outright when that teacher has exactly one eligible entry;
    // otherwise fall through to the next priority.
    if constraints.balance_workload {
        let lightest = candidates
            .iter()
            .map(|&index| pool[index].teacher_id)
            .fold(None, |lightest: Option<_>, teacher| match lightest {
                Some(best) if tally.teacher_load(best) <= tally.teacher_load(teacher) => Some(best),
                _ => Some(teacher),
            });
        if let Some(teacher) = lightest {
            let of_teacher: Vec<usize> = candidates
                .iter()
                .copied()
                .filter(|&index| pool[index].teacher_id == teacher)
                .collect();
            if let [only] = of_teacher[..] {
                return only;
            }
        }
    }

    // Priority 2: the subject with the fewest placements today, first in pool
    // order on ties.
    if constraints.spread_subjects_evenly {
        let mut best = candidates[0];
        for &index in &candidates[1..] {
            if tally.subject_count_on(day, pool[index].subject_id)
                < tally.subject_count_on(day, pool[best].subject_id)
            {
                best = index;
            }
        }
        return best;
    }

    // Default: uniform random pick for variety.
    *candidates
        .choose(rng)
        .expect("candidates checked non-empty")
}
