// ABOUTME: Route handlers for creating routines from templates and reading their schedule
// ABOUTME: Thin HTTP layer that resolves the acting user and delegates to the routine service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Routine routes
//!
//! All endpoints require the acting user to be resolved by the upstream
//! authentication layer.

use crate::{
    auth::authenticate,
    database::ScheduledOccurrence,
    errors::AppError,
    resources::ServerResources,
    routines::RoutineWithExercises,
    services::routine_templates::{
        create_routine_from_template, list_routine_schedule, FromTemplateRequest,
    },
};
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Non-fatal problems encountered while materializing a template
#[derive(Debug, Serialize, Deserialize)]
pub struct RoutineWarnings {
    /// Names of template exercises that were left out
    pub skipped_exercises: Vec<String>,
}

/// Response for a routine created from a template
#[derive(Debug, Serialize, Deserialize)]
pub struct FromTemplateResponse {
    /// Human-readable outcome
    pub message: String,
    /// The created routine with its exercises
    pub routine: RoutineWithExercises,
    /// Present only when some exercises were skipped
    pub warnings: Option<RoutineWarnings>,
}

/// One scheduled date of a routine
#[derive(Debug, Serialize, Deserialize)]
pub struct OccurrenceResponse {
    /// Calendar day
    pub scheduled_date: NaiveDate,
    /// Whether it was completed
    pub completed: bool,
    /// When it was completed
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<ScheduledOccurrence> for OccurrenceResponse {
    fn from(occurrence: ScheduledOccurrence) -> Self {
        Self {
            scheduled_date: occurrence.scheduled_date,
            completed: occurrence.completed,
            completed_at: occurrence.completed_at,
        }
    }
}

/// Response listing a routine's scheduled dates
#[derive(Debug, Serialize, Deserialize)]
pub struct RoutineScheduleResponse {
    /// Routine identifier
    pub routine_id: String,
    /// Occurrences, earliest first
    pub occurrences: Vec<OccurrenceResponse>,
    /// Number of occurrences
    pub total: usize,
}

/// Routine routes handler
pub struct RoutineRoutes;

impl RoutineRoutes {
    /// Create all routine routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/routines/from-template",
                post(Self::handle_create_from_template),
            )
            .route("/api/routines/:id/schedule", get(Self::handle_get_schedule))
            .with_state(resources)
    }

    /// Handle POST /api/routines/from-template - Materialize a template into a routine
    async fn handle_create_from_template(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<FromTemplateRequest>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers)?;
        let today = Local::now().date_naive();

        let created = create_routine_from_template(
            &resources.database,
            auth.user_id,
            &body,
            today,
            resources.config.default_schedule_weeks,
        )
        .await?;

        let skipped = created.skipped_names();
        let (message, warnings) = if skipped.is_empty() {
            ("Routine created from template".to_owned(), None)
        } else {
            (
                format!(
                    "Routine created from template; {} exercise(s) skipped because they are not in the exercise catalog",
                    skipped.len()
                ),
                Some(RoutineWarnings {
                    skipped_exercises: skipped,
                }),
            )
        };

        let response = FromTemplateResponse {
            message,
            routine: created.routine,
            warnings,
        };
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle GET /api/routines/:id/schedule - List a routine's scheduled dates
    async fn handle_get_schedule(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(routine_id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers)?;
        let occurrences =
            list_routine_schedule(&resources.database, auth.user_id, &routine_id).await?;

        let response = RoutineScheduleResponse {
            routine_id,
            total: occurrences.len(),
            occurrences: occurrences.into_iter().map(Into::into).collect(),
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }
}
