//! Conflict resolution tests: relocate when a free cell exists, remove
//! otherwise.

use std::sync::Arc;

use crate::api::{Conflict, ConflictKind, SlotId, SubjectId, TeacherId};
use crate::config::EngineConfig;
use crate::db::repositories::local::LocalRepository;
use crate::db::repository::TimetableRepository;
use crate::engine::TimetableEngine;
use crate::models::{Day, NewSlot};

fn engine_with(repo: &Arc<LocalRepository>, days: &[Day], max_periods: u8) -> TimetableEngine {
    TimetableEngine::new(
        repo.clone(),
        EngineConfig {
            school_days: days.to_vec(),
            max_periods_per_day: max_periods,
        },
    )
}

fn slot(day: Day, period: u8, subject: SubjectId, teacher: TeacherId) -> NewSlot {
    NewSlot {
        day,
        period,
        subject_id: Some(subject),
        teacher_id: Some(teacher),
    }
}

#[tokio::test]
async fn relocates_double_booked_slots_to_free_cells() {
    let repo = Arc::new(LocalRepository::new());
    let class = repo.add_class("8/A");
    let teacher = repo.add_teacher("Mr. Ruiz", &[]);
    let math = repo.add_subject("Math", 4);
    repo.add_assignment(class, math, Some(teacher));

    let schedule = repo
        .persist_schedule(
            class,
            "clash",
            &[
                slot(Day::Sunday, 1, math, teacher),
                slot(Day::Sunday, 1, math, teacher),
            ],
        )
        .await
        .unwrap();

    let engine = engine_with(&repo, &[Day::Sunday, Day::Monday], 4);
    let conflicts = engine.validate_schedule(schedule.id).await.unwrap();
    assert_eq!(conflicts.len(), 2);

    let report = engine
        .resolve_conflicts(schedule.id, &conflicts)
        .await
        .unwrap();

    assert_eq!(report.resolved_count, 2);
    assert_eq!(report.unresolved_count, 0);
    assert!(report.trace.iter().all(|t| t.starts_with("Moved Math to")));

    // Both slots survived and the schedule is clean again.
    let reloaded = repo.load_schedule(schedule.id).await.unwrap();
    assert_eq!(reloaded.slots.len(), 2);
    assert!(engine.validate_schedule(schedule.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn removes_slots_when_no_free_cell_remains() {
    let repo = Arc::new(LocalRepository::new());
    let class = repo.add_class("8/A");
    let teacher = repo.add_teacher("Ms. Novak", &[]);
    let math = repo.add_subject("Math", 3);
    repo.add_assignment(class, math, Some(teacher));

    // A one-day, two-period grid with every cell taken.
    let schedule = repo
        .persist_schedule(
            class,
            "full",
            &[
                slot(Day::Sunday, 1, math, teacher),
                slot(Day::Sunday, 1, math, teacher),
                slot(Day::Sunday, 2, math, teacher),
            ],
        )
        .await
        .unwrap();

    let engine = engine_with(&repo, &[Day::Sunday], 2);
    let conflicts = engine.validate_schedule(schedule.id).await.unwrap();
    assert_eq!(conflicts.len(), 2);

    let report = engine
        .resolve_conflicts(schedule.id, &conflicts)
        .await
        .unwrap();

    assert_eq!(report.resolved_count, 2);
    assert!(report
        .trace
        .iter()
        .all(|t| t == "Removed conflicting slot: Math on Sunday Period 1"));

    let reloaded = repo.load_schedule(schedule.id).await.unwrap();
    assert_eq!(reloaded.slots.len(), 1);
    assert_eq!(reloaded.slots[0].period, 2);
}

#[tokio::test]
async fn relocation_skips_restricted_and_cross_class_cells() {
    let repo = Arc::new(LocalRepository::new());
    let class_a = repo.add_class("8/A");
    let class_b = repo.add_class("8/B");
    let teacher = repo.add_teacher("Mr. Deng", &["Sun-2"]);
    let math = repo.add_subject("Math", 2);
    let history = repo.add_subject("History", 1);
    repo.add_assignment(class_a, math, Some(teacher));
    repo.add_assignment(class_b, history, Some(teacher));

    // The teacher is busy with class B at Sunday Period 3.
    repo.persist_schedule(class_b, "b", &[slot(Day::Sunday, 3, history, teacher)])
        .await
        .unwrap();

    let schedule = repo
        .persist_schedule(
            class_a,
            "a",
            &[
                slot(Day::Sunday, 1, math, teacher),
                slot(Day::Sunday, 1, math, teacher),
            ],
        )
        .await
        .unwrap();

    let engine = engine_with(&repo, &[Day::Sunday], 4);
    let conflicts: Vec<Conflict> = engine
        .validate_schedule(schedule.id)
        .await
        .unwrap()
        .into_iter()
        .filter(|c| c.kind == ConflictKind::TeacherDoubleBooking)
        .collect();
    assert_eq!(conflicts.len(), 2);

    let report = engine
        .resolve_conflicts(schedule.id, &conflicts)
        .await
        .unwrap();

    // Period 2 is restricted and Period 3 is booked elsewhere, so the first
    // slot lands on Period 4 and the second has nowhere to go.
    assert_eq!(report.resolved_count, 2);
    assert!(report
        .trace
        .contains(&"Moved Math to Sunday Period 4".to_string()));
    assert!(report
        .trace
        .contains(&"Removed conflicting slot: Math on Sunday Period 1".to_string()));

    let reloaded = repo.load_schedule(schedule.id).await.unwrap();
    assert_eq!(reloaded.slots.len(), 1);
    assert_eq!(reloaded.slots[0].period, 4);
}

#[tokio::test]
async fn only_double_booking_kinds_are_attempted() {
    let repo = Arc::new(LocalRepository::new());
    let class = repo.add_class("8/A");
    let teacher = repo.add_teacher("Ms. Petrova", &[]);
    let math = repo.add_subject("Math", 1);
    repo.add_assignment(class, math, Some(teacher));

    let schedule = repo
        .persist_schedule(class, "s", &[slot(Day::Sunday, 1, math, teacher)])
        .await
        .unwrap();
    let slot_id = repo.load_schedule(schedule.id).await.unwrap().slots[0].id;

    let manual = Conflict {
        kind: ConflictKind::RestrictedPeriod,
        description: "manual".to_string(),
        slot_id,
        day: Day::Sunday,
        period: 1,
    };

    let report = engine_with(&repo, &[Day::Sunday], 4)
        .resolve_conflicts(schedule.id, &[manual])
        .await
        .unwrap();

    assert_eq!(report.resolved_count, 0);
    assert_eq!(report.unresolved_count, 0);
    assert!(report.trace.is_empty());
    assert_eq!(repo.load_schedule(schedule.id).await.unwrap().slots.len(), 1);
}

#[tokio::test]
async fn vanished_slot_counts_as_unresolved() {
    let repo = Arc::new(LocalRepository::new());
    let class = repo.add_class("8/A");
    let schedule = repo.persist_schedule(class, "s", &[]).await.unwrap();

    let stale = Conflict {
        kind: ConflictKind::TeacherDoubleBooking,
        description: "stale".to_string(),
        slot_id: SlotId::new(999),
        day: Day::Sunday,
        period: 1,
    };

    let report = engine_with(&repo, &[Day::Sunday], 4)
        .resolve_conflicts(schedule.id, &[stale])
        .await
        .unwrap();

    assert_eq!(report.resolved_count, 0);
    assert_eq!(report.unresolved_count, 1);
    assert_eq!(report.trace, vec!["Slot 999 no longer exists".to_string()]);
}
