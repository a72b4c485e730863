//! Timetable generation and conflict-resolution engine.
//!
//! The [`TimetableEngine`] facade owns a repository handle and a deployment
//! config, and exposes every engine operation: generation, validation,
//! resolution, per-slot availability probes, slot swaps, statistics and
//! conflict-prevention suggestions.
//!
//! Generation pipeline: [`context::GenerationContext::build`] →
//! [`pool::build_pool`] → [`generator::fill_grid`] (constraint filter +
//! candidate selector per cell) → one `persist_schedule` call. Validation
//! and resolution run independently against persisted schedules.

pub mod constraints;
pub mod context;
pub mod error;
pub mod generator;
pub mod pool;
pub mod resolver;
pub mod selector;
pub mod validator;

#[cfg(all(test, feature = "local-repo"))]
#[path = "resolver_tests.rs"]
mod resolver_tests;

pub use error::{EngineError, EngineResult};
pub use generator::CancelToken;

use std::collections::HashMap;
use std::sync::Arc;

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::api::{
    AvailableTeacher, ClassId, Conflict, ConflictCheck, GenerationReport, GenerationRequest,
    PreventionSuggestion, ResolutionReport, ScheduleId, SuggestionPriority, TeacherId,
    TimetableStatistics,
};
use crate::config::{EngineConfig, PERIOD_LIMIT};
use crate::db::TimetableRepository;
use crate::models::{Day, RestrictedPeriod, SlotPosition};

use context::GenerationContext;

/// Weekly hours above which a teacher counts as overloaded in
/// conflict-prevention suggestions.
const OVERLOAD_HOURS_PER_WEEK: u32 = 20;

/// Facade over the generation, validation and resolution components.
///
/// Holds no per-run state: every operation builds its own context, so
/// concurrent runs for different classes only share state at the
/// persistence boundary.
pub struct TimetableEngine {
    repo: Arc<dyn TimetableRepository>,
    config: EngineConfig,
}

impl TimetableEngine {
    pub fn new(repo: Arc<dyn TimetableRepository>, config: EngineConfig) -> Self {
        Self { repo, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ==================== Generation ====================

    /// Generate and persist a new active schedule for a class, seeding the
    /// tie-break randomness from OS entropy.
    pub async fn generate_schedule(
        &self,
        class_id: ClassId,
        request: &GenerationRequest,
    ) -> EngineResult<GenerationReport> {
        let mut rng = StdRng::from_os_rng();
        self.generate_schedule_with(class_id, request, &mut rng, &CancelToken::new())
            .await
    }

    /// Generation with an injected random source and cancellation token.
    ///
    /// Any failure, including cancellation, aborts before the persist step;
    /// no partial schedule is ever written.
    pub async fn generate_schedule_with<R: Rng + Send>(
        &self,
        class_id: ClassId,
        request: &GenerationRequest,
        rng: &mut R,
        cancel: &CancelToken,
    ) -> EngineResult<GenerationReport> {
        self.check_period_bound(request.max_periods_per_day)?;

        let ctx = GenerationContext::build(self.repo.as_ref(), class_id).await?;
        let pool = pool::build_pool(&ctx, rng);
        let grid = generator::fill_grid(
            &ctx,
            pool,
            &self.config.school_days,
            request.max_periods_per_day,
            &request.constraints,
            rng,
            cancel,
        )?;

        let name = format!(
            "Generated timetable for {} - {}",
            ctx.class.name,
            chrono::Local::now().format("%Y-%m-%d")
        );
        let schedule = self
            .repo
            .persist_schedule(class_id, &name, &grid.slots)
            .await?;

        info!(
            "generated schedule {} for class {}: {} slots, {} unassigned hours",
            schedule.id,
            class_id,
            schedule.slots.len(),
            grid.unassigned_subject_hours.values().sum::<u32>()
        );

        Ok(GenerationReport {
            schedule_id: schedule.id,
            class_id,
            total_slots_generated: schedule.slots.len(),
            optimization_suggestions: generator::optimization_suggestions(&grid.slots),
            warnings: grid.warnings,
            unassigned_subject_hours: grid.unassigned_subject_hours,
        })
    }

    // ==================== Validation and resolution ====================

    /// Re-scan a persisted schedule for conflicts. Read-only.
    pub async fn validate_schedule(&self, schedule_id: ScheduleId) -> EngineResult<Vec<Conflict>> {
        validator::validate_schedule(self.repo.as_ref(), schedule_id).await
    }

    /// Relocate or remove the slots behind the given double-booking
    /// conflicts.
    pub async fn resolve_conflicts(
        &self,
        schedule_id: ScheduleId,
        conflicts: &[Conflict],
    ) -> EngineResult<ResolutionReport> {
        resolver::resolve_conflicts(
            self.repo.as_ref(),
            schedule_id,
            conflicts,
            &self.config.school_days,
            self.config.max_periods_per_day,
        )
        .await
    }

    // ==================== Availability probes ====================

    /// Check whether one teacher is free at (day, period) from the point of
    /// view of `class_id`. An unknown teacher is an unavailable result, not
    /// an error.
    pub async fn check_teacher_conflict(
        &self,
        teacher_id: TeacherId,
        day: Day,
        period: u8,
        class_id: ClassId,
    ) -> EngineResult<ConflictCheck> {
        self.check_period_bound(period)?;

        let raw = match self.repo.load_restricted_periods(teacher_id).await {
            Ok(raw) => raw,
            Err(e) if e.is_not_found() => {
                return Ok(ConflictCheck::unavailable("Teacher not found"))
            }
            Err(e) => return Err(EngineError::Persistence(e)),
        };

        let restricted = RestrictedPeriod::parse_list(&raw);
        if restricted.iter().any(|rp| rp.matches(day, period)) {
            return Ok(ConflictCheck::unavailable(format!(
                "Teacher has restricted period on {} Period {}",
                day, period
            )));
        }

        let overrides = self
            .repo
            .load_availability_overrides(&[teacher_id])
            .await?;
        let blocked = overrides
            .iter()
            .any(|o| o.day == day && o.period == period && !o.is_available);
        if blocked {
            return Ok(ConflictCheck::unavailable(format!(
                "Teacher is marked as unavailable on {} Period {}",
                day, period
            )));
        }

        let active = self
            .repo
            .load_active_slots_for_teachers(&[teacher_id], class_id)
            .await?;
        if let Some(hit) = active.iter().find(|s| s.day == day && s.period == period) {
            let subject = hit.subject_name.clone().unwrap_or_else(|| "?".to_string());
            return Ok(ConflictCheck {
                is_available: false,
                conflicting_class_id: Some(hit.class_id),
                conflicting_class_name: Some(hit.class_name.clone()),
                conflicting_subject_name: hit.subject_name.clone(),
                message: Some(format!(
                    "Teacher is already assigned to {} for {} on {} Period {}",
                    hit.class_name, subject, day, period
                )),
            });
        }

        Ok(ConflictCheck::available())
    }

    /// Detailed availability of every teacher assigned to a class, for one
    /// (day, period) cell.
    pub async fn available_teachers_for_slot(
        &self,
        class_id: ClassId,
        day: Day,
        period: u8,
    ) -> EngineResult<Vec<AvailableTeacher>> {
        self.check_period_bound(period)?;
        self.require_class(class_id).await?;

        let assignments = self.repo.load_assignments(class_id).await?;

        let mut teachers = Vec::new();
        for assignment in assignments {
            let Some(teacher_id) = assignment.teacher_id else {
                continue;
            };

            let mut reasons = Vec::new();

            let raw = self
                .repo
                .load_restricted_periods(teacher_id)
                .await
                .unwrap_or_default();
            if RestrictedPeriod::parse_list(&raw)
                .iter()
                .any(|rp| rp.matches(day, period))
            {
                reasons.push("Teacher has restricted period".to_string());
            }

            let overrides = self
                .repo
                .load_availability_overrides(&[teacher_id])
                .await?;
            if overrides
                .iter()
                .any(|o| o.day == day && o.period == period && !o.is_available)
            {
                reasons.push("Teacher marked as unavailable".to_string());
            }

            let active = self
                .repo
                .load_active_slots_for_teachers(&[teacher_id], class_id)
                .await?;
            if active.iter().any(|s| s.day == day && s.period == period) {
                reasons.push("Teacher is assigned to another class at this time".to_string());
            }

            teachers.push(AvailableTeacher {
                teacher_id,
                teacher_name: assignment
                    .teacher_name
                    .unwrap_or_else(|| format!("#{}", teacher_id)),
                subject_id: assignment.subject_id,
                subject_name: assignment.subject_name,
                is_available: reasons.is_empty(),
                unavailable_reasons: reasons,
            });
        }

        teachers.sort_by(|a, b| {
            b.is_available
                .cmp(&a.is_available)
                .then_with(|| a.teacher_name.cmp(&b.teacher_name))
        });
        Ok(teachers)
    }

    // ==================== Manual edits ====================

    /// Exchange the (subject, teacher) pairs of two slots, leaving their
    /// (day, period) positions unchanged. Returns `false` without mutating
    /// anything when either position has no slot.
    pub async fn swap_slots(
        &self,
        schedule_id: ScheduleId,
        first: SlotPosition,
        second: SlotPosition,
    ) -> EngineResult<bool> {
        let schedule = self.repo.load_schedule(schedule_id).await?;

        let find = |pos: SlotPosition| {
            schedule
                .slots
                .iter()
                .find(|s| s.day == pos.day && s.period == pos.period)
                .cloned()
        };
        let (Some(mut a), Some(mut b)) = (find(first), find(second)) else {
            return Ok(false);
        };

        std::mem::swap(&mut a.subject_id, &mut b.subject_id);
        std::mem::swap(&mut a.teacher_id, &mut b.teacher_id);

        self.repo.save_slot(&a).await?;
        self.repo.save_slot(&b).await?;
        info!(
            "swapped slots {} and {} in schedule {}",
            first, second, schedule_id
        );
        Ok(true)
    }

    // ==================== Statistics and suggestions ====================

    /// Aggregate counts over one schedule's slots.
    pub async fn timetable_statistics(
        &self,
        schedule_id: ScheduleId,
    ) -> EngineResult<TimetableStatistics> {
        let schedule = self.repo.load_schedule(schedule_id).await?;
        let assignments = self.repo.load_assignments(schedule.class_id).await?;

        let mut subject_names = HashMap::new();
        let mut teacher_names = HashMap::new();
        for assignment in &assignments {
            subject_names.insert(assignment.subject_id, assignment.subject_name.clone());
            if let (Some(id), Some(name)) =
                (assignment.teacher_id, assignment.teacher_name.clone())
            {
                teacher_names.insert(id, name);
            }
        }

        let mut subject_distribution: HashMap<String, usize> = HashMap::new();
        let mut teacher_workload: HashMap<String, usize> = HashMap::new();
        let mut daily_distribution: HashMap<String, usize> = HashMap::new();
        let mut filled = 0;

        for slot in &schedule.slots {
            if let Some(subject_id) = slot.subject_id {
                filled += 1;
                let name = subject_names
                    .get(&subject_id)
                    .cloned()
                    .unwrap_or_else(|| format!("#{}", subject_id));
                *subject_distribution.entry(name).or_insert(0) += 1;
                *daily_distribution.entry(slot.day.to_string()).or_insert(0) += 1;
            }
            if let Some(teacher_id) = slot.teacher_id {
                let name = teacher_names
                    .get(&teacher_id)
                    .cloned()
                    .unwrap_or_else(|| format!("#{}", teacher_id));
                *teacher_workload.entry(name).or_insert(0) += 1;
            }
        }

        Ok(TimetableStatistics {
            schedule_id,
            total_slots: schedule.slots.len(),
            filled_slots: filled,
            empty_slots: schedule.slots.len() - filled,
            subject_distribution,
            teacher_workload,
            daily_distribution,
        })
    }

    /// Pre-generation advisories: unassigned subjects, restricted teachers,
    /// and overloaded teachers.
    pub async fn conflict_prevention_suggestions(
        &self,
        class_id: ClassId,
    ) -> EngineResult<Vec<PreventionSuggestion>> {
        self.require_class(class_id).await?;
        let assignments = self.repo.load_assignments(class_id).await?;

        let mut suggestions = Vec::new();

        let unassigned: Vec<String> = assignments
            .iter()
            .filter(|a| a.teacher_id.is_none())
            .map(|a| a.subject_name.clone())
            .collect();
        if !unassigned.is_empty() {
            suggestions.push(PreventionSuggestion {
                kind: "UnassignedSubjects".to_string(),
                priority: SuggestionPriority::High,
                description: format!(
                    "You have {} subjects without assigned teachers",
                    unassigned.len()
                ),
                recommendation: "Assign teachers to these subjects before generating timetable"
                    .to_string(),
                affected_subjects: unassigned,
                affected_teachers: Vec::new(),
            });
        }

        let mut restricted_teachers = Vec::new();
        let mut hours_by_teacher: HashMap<TeacherId, (String, u32)> = HashMap::new();
        for assignment in &assignments {
            let Some(teacher_id) = assignment.teacher_id else {
                continue;
            };
            let name = assignment
                .teacher_name
                .clone()
                .unwrap_or_else(|| format!("#{}", teacher_id));
            let entry = hours_by_teacher
                .entry(teacher_id)
                .or_insert_with(|| (name.clone(), 0));
            entry.1 += assignment.hours_per_week;

            if !restricted_teachers.contains(&name) {
                let raw = self
                    .repo
                    .load_restricted_periods(teacher_id)
                    .await
                    .unwrap_or_default();
                if !RestrictedPeriod::parse_list(&raw).is_empty() {
                    restricted_teachers.push(name);
                }
            }
        }
        if !restricted_teachers.is_empty() {
            suggestions.push(PreventionSuggestion {
                kind: "RestrictedPeriods".to_string(),
                priority: SuggestionPriority::Medium,
                description: format!(
                    "{} teachers have restricted periods",
                    restricted_teachers.len()
                ),
                recommendation: "Review teacher availabilities to maximize scheduling flexibility"
                    .to_string(),
                affected_subjects: Vec::new(),
                affected_teachers: restricted_teachers,
            });
        }

        let overloaded: Vec<String> = hours_by_teacher
            .values()
            .filter(|(_, hours)| *hours > OVERLOAD_HOURS_PER_WEEK)
            .map(|(name, _)| name.clone())
            .collect();
        if !overloaded.is_empty() {
            suggestions.push(PreventionSuggestion {
                kind: "TeacherOverload".to_string(),
                priority: SuggestionPriority::Medium,
                description: format!("{} teachers may be overloaded", overloaded.len()),
                recommendation: "Consider redistributing subjects to balance teacher workload"
                    .to_string(),
                affected_subjects: Vec::new(),
                affected_teachers: overloaded,
            });
        }

        Ok(suggestions)
    }

    /// Repository liveness probe, surfaced by the health endpoint.
    pub async fn repository_health(&self) -> EngineResult<bool> {
        Ok(self.repo.health_check().await?)
    }

    // ==================== Helpers ====================

    fn check_period_bound(&self, period: u8) -> EngineResult<()> {
        if period == 0 || period > PERIOD_LIMIT {
            return Err(EngineError::InvalidInput(format!(
                "Period must be in [1, {}], got {}",
                PERIOD_LIMIT, period
            )));
        }
        Ok(())
    }

    async fn require_class(&self, class_id: ClassId) -> EngineResult<()> {
        self.repo
            .find_class(class_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| EngineError::NotFound(format!("Class {} not found", class_id)))
    }
}
