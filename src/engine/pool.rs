//! Slot pool: the multiset of placeable teaching hours.
//!
//! Each assignment with a teacher and a positive weekly quota expands into
//! one entry per hour. The pool is shuffled once per run; pool order only
//! affects tie-breaking in the selector, never correctness.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::api::{SubjectId, TeacherId};

use super::context::GenerationContext;

/// One placeable teaching hour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolEntry {
    pub teacher_id: TeacherId,
    pub subject_id: SubjectId,
    pub subject_name: String,
}

/// Expand assignments into pool entries and shuffle them uniformly.
///
/// Assignments without a teacher contribute nothing here; the driver reports
/// them as gaps separately.
pub fn build_pool<R: Rng>(ctx: &GenerationContext, rng: &mut R) -> Vec<PoolEntry> {
    let mut pool = Vec::new();
    for assignment in &ctx.assignments {
        let Some(teacher_id) = assignment.teacher_id else {
            continue;
        };
        for _ in 0..assignment.hours_per_week {
            pool.push(PoolEntry {
                teacher_id,
                subject_id: assignment.subject_id,
                subject_name: assignment.subject_name.clone(),
            });
        }
    }
    pool.shuffle(rng);
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ClassId, SubjectId, TeacherId};
    use crate::models::{Assignment, ClassInfo};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn assignment(
        subject: i64,
        name: &str,
        hours: u32,
        teacher: Option<i64>,
    ) -> Assignment {
        Assignment {
            class_id: ClassId::new(1),
            subject_id: SubjectId::new(subject),
            subject_name: name.to_string(),
            hours_per_week: hours,
            teacher_id: teacher.map(TeacherId::new),
            teacher_name: teacher.map(|id| format!("Teacher {}", id)),
        }
    }

    fn ctx(assignments: Vec<Assignment>) -> GenerationContext {
        GenerationContext::for_tests(
            ClassInfo {
                id: ClassId::new(1),
                name: "8/A".to_string(),
            },
            assignments,
        )
    }

    #[test]
    fn one_entry_per_weekly_hour() {
        let ctx = ctx(vec![
            assignment(10, "Math", 3, Some(7)),
            assignment(11, "History", 2, Some(9)),
        ]);
        let mut rng = SmallRng::seed_from_u64(1);
        let pool = build_pool(&ctx, &mut rng);

        assert_eq!(pool.len(), 5);
        assert_eq!(
            pool.iter().filter(|e| e.subject_name == "Math").count(),
            3
        );
        assert_eq!(
            pool.iter().filter(|e| e.subject_name == "History").count(),
            2
        );
    }

    #[test]
    fn teacherless_assignments_contribute_nothing() {
        let ctx = ctx(vec![
            assignment(10, "Math", 3, Some(7)),
            assignment(11, "Art", 4, None),
        ]);
        let mut rng = SmallRng::seed_from_u64(1);
        let pool = build_pool(&ctx, &mut rng);
        assert!(pool.iter().all(|e| e.subject_name == "Math"));
    }

    #[test]
    fn zero_hour_assignments_contribute_nothing() {
        let ctx = ctx(vec![assignment(10, "Unknown", 0, Some(7))]);
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(build_pool(&ctx, &mut rng).is_empty());
    }

    #[test]
    fn shuffle_is_reproducible_under_a_seed() {
        let assignments = vec![
            assignment(10, "Math", 4, Some(7)),
            assignment(11, "History", 4, Some(9)),
        ];
        let a = build_pool(&ctx(assignments.clone()), &mut SmallRng::seed_from_u64(42));
        let b = build_pool(&ctx(assignments), &mut SmallRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
