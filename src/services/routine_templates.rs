// ABOUTME: Template-to-routine materialization pipeline with calendar scheduling
// ABOUTME: Resolves the template, validates exercises, persists the routine, projects and upserts dates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Routine-from-template service
//!
//! Request validation and template resolution fail fast with no writes. The
//! routine and its exercise links are written atomically; scheduling runs
//! afterwards as a best-effort loop whose per-date failures are logged and
//! never undo the routine.

use crate::constants::request_fields;
use crate::database::routines::{CreateRoutineRequest, NewRoutineExercise};
use crate::database::{Database, ScheduledOccurrence};
use crate::errors::{AppError, AppResult};
use crate::routines::{
    assemble_routine, normalize_blueprint, partition_descriptors, project_occurrences,
    resolve_weekdays, validate_schedule_params, ExerciseDescriptor, ExerciseValidation,
    RawScheduleParams, RoutineWithExercises, ScheduleParams, SkippedExercise,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::{info, warn};
use uuid::Uuid;

/// Input of the routine-from-template operation, loosely typed as received
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FromTemplateRequest {
    /// Template to materialize (required)
    #[serde(default)]
    pub template_id: Option<Value>,
    /// Weeks to schedule, 1 to 12
    #[serde(default)]
    pub schedule_weeks: Option<Value>,
    /// Weekdays to schedule, 0 (Sunday) to 6 (Saturday)
    #[serde(default)]
    pub schedule_days_of_week: Option<Value>,
    /// First day to schedule from
    #[serde(default)]
    pub schedule_start_date: Option<Value>,
}

impl FromTemplateRequest {
    fn schedule(&self) -> RawScheduleParams<'_> {
        RawScheduleParams {
            weeks: self.schedule_weeks.as_ref(),
            days_of_week: self.schedule_days_of_week.as_ref(),
            start_date: self.schedule_start_date.as_ref(),
        }
    }
}

/// Which projected dates were persisted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleOutcome {
    /// Dates upserted successfully
    pub scheduled: Vec<NaiveDate>,
    /// Dates whose upsert failed (already logged)
    pub failed: Vec<NaiveDate>,
}

/// Result of a successful materialization
#[derive(Debug, Clone)]
pub struct MaterializedRoutine {
    /// The routine as stored, with its exercises
    pub routine: RoutineWithExercises,
    /// Template entries that were left out
    pub skipped: Vec<SkippedExercise>,
    /// Scheduling result
    pub schedule: ScheduleOutcome,
}

impl MaterializedRoutine {
    /// Names of skipped template entries
    #[must_use]
    pub fn skipped_names(&self) -> Vec<String> {
        self.skipped.iter().map(|s| s.name.clone()).collect()
    }
}

/// Materialize a template into a routine owned by `user_id` and schedule it
///
/// `today` is the base date when the request does not name a start date.
///
/// # Errors
///
/// - 400-class when `template_id` or a schedule override is invalid, the
///   template has no exercises, or none of them exist in the catalog
/// - 404 when the template does not exist
/// - 500-class on persistence failures before the routine is committed
pub async fn create_routine_from_template(
    database: &Database,
    user_id: Uuid,
    request: &FromTemplateRequest,
    today: NaiveDate,
    default_weeks: u32,
) -> AppResult<MaterializedRoutine> {
    let template_id = parse_template_id(request.template_id.as_ref())?;
    let params = validate_schedule_params(request.schedule(), default_weeks)?;

    let template = database
        .templates()
        .get(&template_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Template {template_id}")))?;

    let descriptors = normalize_blueprint(template.exercises);
    if descriptors.is_empty() {
        return Err(AppError::invalid_input("Template has no exercises"));
    }

    let validation = validate_exercises(database, &descriptors).await?;
    for skipped in &validation.skipped {
        info!(
            user_id = %user_id,
            template_id = %template_id,
            exercise = %skipped.name,
            reason = %skipped.reason,
            "Skipping template exercise"
        );
    }

    let routine = database
        .routines()
        .create_with_exercises(
            user_id,
            &CreateRoutineRequest {
                name: template.name,
                description: template.description,
            },
            &validation.valid,
        )
        .await?
        .ok_or_else(|| {
            AppError::validation_failed(format!(
                "None of the {} template exercises exist in the exercise catalog",
                descriptors.len()
            ))
        })?;

    info!(
        user_id = %user_id,
        template_id = %template_id,
        routine_id = %routine.id,
        exercises = validation.valid.len(),
        skipped = validation.skipped.len(),
        "Routine materialized from template"
    );

    let dates = plan_dates(&params, &validation.valid, today);
    let schedule = persist_schedule(database, user_id, &routine.id, &dates).await;

    let rows = database
        .routines()
        .get_with_exercise_rows(&routine.id, user_id)
        .await?;
    let assembled = assemble_routine(rows).ok_or_else(|| {
        AppError::internal(format!("Routine {} missing after creation", routine.id))
    })?;

    Ok(MaterializedRoutine {
        routine: assembled,
        skipped: validation.skipped,
        schedule,
    })
}

/// List a user's scheduled occurrences for one of their routines
///
/// # Errors
///
/// Returns 404 if the routine does not exist or belongs to another user
pub async fn list_routine_schedule(
    database: &Database,
    user_id: Uuid,
    routine_id: &str,
) -> AppResult<Vec<ScheduledOccurrence>> {
    if !database.routines().exists_for_user(routine_id, user_id).await? {
        return Err(AppError::not_found(format!("Routine {routine_id}")));
    }
    database
        .schedules()
        .list_for_routine(user_id, routine_id)
        .await
}

fn parse_template_id(value: Option<&Value>) -> AppResult<String> {
    match value {
        None | Some(Value::Null) => Err(AppError::missing_field(request_fields::TEMPLATE_ID)),
        Some(Value::String(s)) if s.trim().is_empty() => {
            Err(AppError::missing_field(request_fields::TEMPLATE_ID))
        }
        Some(Value::String(s)) => Ok(s.trim().to_owned()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(_) => Err(AppError::invalid_input(format!(
            "{} must be a string",
            request_fields::TEMPLATE_ID
        ))),
    }
}

/// Check every referenced exercise against the catalog in one query
async fn validate_exercises(
    database: &Database,
    descriptors: &[ExerciseDescriptor],
) -> AppResult<ExerciseValidation> {
    let referenced: Vec<String> = descriptors
        .iter()
        .filter_map(|d| d.exercise_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let known = database.exercises().existing_ids(&referenced).await?;
    Ok(partition_descriptors(descriptors, &known))
}

fn plan_dates(
    params: &ScheduleParams,
    exercises: &[NewRoutineExercise],
    today: NaiveDate,
) -> Vec<NaiveDate> {
    let weekdays = resolve_weekdays(
        params.weekday_override.as_deref(),
        exercises.iter().map(|e| e.day_of_week),
    );
    project_occurrences(params.base_date.unwrap_or(today), params.weeks, &weekdays)
}

/// Upsert each date on its own; a failed date is logged and skipped
async fn persist_schedule(
    database: &Database,
    user_id: Uuid,
    routine_id: &str,
    dates: &[NaiveDate],
) -> ScheduleOutcome {
    let schedules = database.schedules();
    let mut outcome = ScheduleOutcome::default();

    for &date in dates {
        match schedules.upsert_occurrence(user_id, routine_id, date).await {
            Ok(()) => outcome.scheduled.push(date),
            Err(e) => {
                warn!(
                    user_id = %user_id,
                    routine_id = %routine_id,
                    date = %date,
                    error = %e,
                    "Failed to schedule routine occurrence"
                );
                outcome.failed.push(date);
            }
        }
    }

    info!(
        user_id = %user_id,
        routine_id = %routine_id,
        scheduled = outcome.scheduled.len(),
        failed = outcome.failed.len(),
        "Routine schedule persisted"
    );
    outcome
}
