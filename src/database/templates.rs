// ABOUTME: Database operations for reusable workout templates authored by coaches or the system
// ABOUTME: Read-by-id for routine materialization plus inserts used by seeding and tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::warn;
use uuid::Uuid;

/// A reusable exercise blueprint not yet tied to any user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutineTemplate {
    /// Unique identifier
    pub id: String,
    /// Authoring coach; `None` for system templates
    pub coach_id: Option<String>,
    /// Display name copied onto materialized routines
    pub name: String,
    /// Optional description copied onto materialized routines
    pub description: Option<String>,
    /// Raw exercise blueprint, either `{"exercises": [...]}` or a bare list
    pub exercises: Value,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Request to store a new template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTemplateRequest {
    /// Authoring coach; `None` for system templates
    pub coach_id: Option<String>,
    /// Display name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Exercise blueprint in either accepted shape
    pub exercises: Value,
}

/// Template store operations
pub struct TemplatesManager {
    pool: SqlitePool,
}

impl TemplatesManager {
    /// Create a new templates manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Store a template
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the insert fails
    pub async fn create(&self, request: &CreateTemplateRequest) -> AppResult<RoutineTemplate> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let exercises_json = serde_json::to_string(&request.exercises)?;

        sqlx::query(
            r"
            INSERT INTO routine_templates (id, coach_id, name, description, exercises, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(&id)
        .bind(&request.coach_id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(&exercises_json)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create template: {e}")))?;

        Ok(RoutineTemplate {
            id,
            coach_id: request.coach_id.clone(),
            name: request.name.clone(),
            description: request.description.clone(),
            exercises: request.exercises.clone(),
            created_at: now,
        })
    }

    /// Get a template by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get(&self, template_id: &str) -> AppResult<Option<RoutineTemplate>> {
        let row = sqlx::query(
            r"
            SELECT id, coach_id, name, description, exercises, created_at
            FROM routine_templates
            WHERE id = $1
            ",
        )
        .bind(template_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get template: {e}")))?;

        row.map(|r| row_to_template(&r)).transpose()
    }
}

fn row_to_template(row: &SqliteRow) -> AppResult<RoutineTemplate> {
    let id: String = row.try_get("id")?;
    let exercises_json: Option<String> = row.try_get("exercises")?;
    let created_at_str: String = row.try_get("created_at")?;

    // A corrupt blueprint resolves to no exercises rather than failing the read
    let exercises = exercises_json
        .as_deref()
        .map_or(Ok(Value::Null), serde_json::from_str)
        .unwrap_or_else(|e| {
            warn!(template_id = %id, "Template has an unreadable exercise blueprint: {e}");
            Value::Null
        });

    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map_err(|e| AppError::internal(format!("Invalid created_at for template {id}: {e}")))?
        .with_timezone(&Utc);

    Ok(RoutineTemplate {
        coach_id: row.try_get("coach_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        exercises,
        created_at,
        id,
    })
}
