//! End-to-end engine lifecycle tests: generate, validate, resolve, and the
//! cross-class interactions between them.

use std::collections::HashSet;
use std::sync::Arc;

use timetable_rust::api::{ConflictKind, GenerationRequest};
use timetable_rust::config::EngineConfig;
use timetable_rust::db::repositories::LocalRepository;
use timetable_rust::db::repository::TimetableRepository;
use timetable_rust::engine::TimetableEngine;
use timetable_rust::models::{Day, NewSlot};

fn engine(repo: &Arc<LocalRepository>) -> TimetableEngine {
    TimetableEngine::new(repo.clone(), EngineConfig::default())
}

#[tokio::test]
async fn generated_schedules_validate_clean() {
    let repo = Arc::new(LocalRepository::new());
    let class = repo.add_class("8/A");
    let teacher_a = repo.add_teacher("Ms. Ito", &["Mon-1"]);
    let teacher_b = repo.add_teacher("Mr. Osei", &[]);
    let math = repo.add_subject("Math", 4);
    let history = repo.add_subject("History", 3);
    repo.add_assignment(class, math, Some(teacher_a));
    repo.add_assignment(class, history, Some(teacher_b));

    let engine = engine(&repo);
    let report = engine
        .generate_schedule(class, &GenerationRequest::default())
        .await
        .unwrap();

    assert_eq!(report.total_slots_generated, 7);
    assert!(report.unassigned_subject_hours.is_empty());

    let conflicts = engine.validate_schedule(report.schedule_id).await.unwrap();
    assert!(conflicts.is_empty());
}

#[tokio::test]
async fn second_class_generation_respects_the_first() {
    let repo = Arc::new(LocalRepository::new());
    let class_a = repo.add_class("8/A");
    let class_b = repo.add_class("8/B");
    let teacher = repo.add_teacher("Mr. Haugen", &[]);
    let math_a = repo.add_subject("Math", 8);
    let math_b = repo.add_subject("Math B", 8);
    repo.add_assignment(class_a, math_a, Some(teacher));
    repo.add_assignment(class_b, math_b, Some(teacher));

    let engine = engine(&repo);
    let report_a = engine
        .generate_schedule(class_a, &GenerationRequest::default())
        .await
        .unwrap();
    let report_b = engine
        .generate_schedule(class_b, &GenerationRequest::default())
        .await
        .unwrap();

    // The shared teacher is never booked in both classes at once.
    let slots_a = repo.load_schedule(report_a.schedule_id).await.unwrap().slots;
    let slots_b = repo.load_schedule(report_b.schedule_id).await.unwrap().slots;
    let cells_a: HashSet<(Day, u8)> = slots_a.iter().map(|s| (s.day, s.period)).collect();
    assert!(slots_b.iter().all(|s| !cells_a.contains(&(s.day, s.period))));

    // Both persisted schedules stay conflict-free under validation.
    assert!(engine
        .validate_schedule(report_b.schedule_id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn teacher_conflict_check_sees_other_classes_schedule() {
    let repo = Arc::new(LocalRepository::new());
    let class_a = repo.add_class("8/A");
    let class_b = repo.add_class("8/B");
    let teacher = repo.add_teacher("Ms. Laurent", &[]);
    let history = repo.add_subject("History", 2);
    repo.add_assignment(class_a, history, Some(teacher));

    let engine = engine(&repo);
    let report = engine
        .generate_schedule(class_a, &GenerationRequest::default())
        .await
        .unwrap();
    let slot = &repo.load_schedule(report.schedule_id).await.unwrap().slots[0];

    let check = engine
        .check_teacher_conflict(teacher, slot.day, slot.period, class_b)
        .await
        .unwrap();
    assert!(!check.is_available);
    assert_eq!(check.conflicting_class_name.as_deref(), Some("8/A"));

    // From class A's own point of view the cell is simply occupied by A,
    // which the probe ignores.
    let own = engine
        .check_teacher_conflict(teacher, slot.day, slot.period, class_a)
        .await
        .unwrap();
    assert!(own.is_available);
}

#[tokio::test]
async fn resolution_strictly_reduces_double_bookings() {
    let repo = Arc::new(LocalRepository::new());
    let class = repo.add_class("8/A");
    let teacher = repo.add_teacher("Mr. Brandt", &[]);
    let math = repo.add_subject("Math", 4);
    repo.add_assignment(class, math, Some(teacher));

    let schedule = repo
        .persist_schedule(
            class,
            "manual with clash",
            &[
                NewSlot {
                    day: Day::Sunday,
                    period: 1,
                    subject_id: Some(math),
                    teacher_id: Some(teacher),
                },
                NewSlot {
                    day: Day::Sunday,
                    period: 1,
                    subject_id: Some(math),
                    teacher_id: Some(teacher),
                },
                NewSlot {
                    day: Day::Monday,
                    period: 4,
                    subject_id: Some(math),
                    teacher_id: Some(teacher),
                },
            ],
        )
        .await
        .unwrap();

    let engine = engine(&repo);
    let before = engine.validate_schedule(schedule.id).await.unwrap();
    let double_bookings = before
        .iter()
        .filter(|c| c.kind == ConflictKind::TeacherDoubleBooking)
        .count();
    assert_eq!(double_bookings, 2);

    let report = engine.resolve_conflicts(schedule.id, &before).await.unwrap();
    assert_eq!(
        report.resolved_count + report.unresolved_count,
        double_bookings
    );

    let after = engine.validate_schedule(schedule.id).await.unwrap();
    let remaining = after
        .iter()
        .filter(|c| c.kind == ConflictKind::TeacherDoubleBooking)
        .count();
    assert!(remaining < double_bookings);
}
