// ABOUTME: Database operations for user-owned routines and their exercise links
// ABOUTME: Atomic routine+exercise creation and the flat joined read-back used for assembly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::ENSURE_USER_SQL;
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

/// A routine owned by one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Routine {
    /// Unique identifier
    pub id: String,
    /// Owning user
    pub user_id: Uuid,
    /// Display name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Whether the routine is active
    pub is_active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Routine fields copied from a template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoutineRequest {
    /// Display name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
}

/// A validated exercise link ready to be inserted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRoutineExercise {
    /// Catalog exercise
    pub exercise_id: String,
    /// Target sets
    pub sets: i64,
    /// Target reps
    pub reps: Option<i64>,
    /// Target duration in minutes
    pub duration_minutes: Option<i64>,
    /// Working weight
    pub weight: f64,
    /// Position within its weekday
    pub display_order: i64,
    /// Weekday 0 (Sunday) to 6 (Saturday); `None` means unscheduled
    pub day_of_week: Option<u8>,
}

/// One row of the routine ⟕ `routine_exercises` ⟕ exercises join
///
/// Exercise columns are `None` when the routine has no links.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutineRow {
    /// Routine identifier
    pub routine_id: String,
    /// Routine name
    pub name: String,
    /// Routine description
    pub description: Option<String>,
    /// Routine active flag
    pub is_active: bool,
    /// Link row identifier
    pub routine_exercise_id: Option<String>,
    /// Catalog exercise identifier
    pub exercise_id: Option<String>,
    /// Canonical exercise name
    pub exercise_name: Option<String>,
    /// Localized exercise name
    pub exercise_name_localized: Option<String>,
    /// Exercise category
    pub category: Option<String>,
    /// Target sets
    pub sets: Option<i64>,
    /// Target reps
    pub reps: Option<i64>,
    /// Target duration in minutes
    pub duration_minutes: Option<i64>,
    /// Working weight
    pub weight: Option<f64>,
    /// Position within its weekday
    pub display_order: Option<i64>,
    /// Weekday
    pub day_of_week: Option<i64>,
}

/// Routine store operations
pub struct RoutinesManager {
    pool: SqlitePool,
}

impl RoutinesManager {
    /// Create a new routines manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a routine together with its exercise links in one transaction
    ///
    /// The owning user row is created inside the same transaction. Returns
    /// `None` when `exercises` is empty: everything is rolled back so a routine
    /// never exists without at least one exercise.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails; nothing is persisted in that case
    pub async fn create_with_exercises(
        &self,
        user_id: Uuid,
        request: &CreateRoutineRequest,
        exercises: &[NewRoutineExercise],
    ) -> AppResult<Option<Routine>> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let now_str = now.to_rfc3339();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        sqlx::query(ENSURE_USER_SQL)
            .bind(user_id.to_string())
            .bind(&now_str)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to ensure user {user_id}: {e}")))?;

        sqlx::query(
            r"
            INSERT INTO routines (id, user_id, name, description, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, 1, $5, $5)
            ",
        )
        .bind(&id)
        .bind(user_id.to_string())
        .bind(&request.name)
        .bind(&request.description)
        .bind(&now_str)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to create routine: {e}")))?;

        if exercises.is_empty() {
            tx.rollback()
                .await
                .map_err(|e| AppError::database(format!("Failed to roll back routine: {e}")))?;
            return Ok(None);
        }

        for exercise in exercises {
            sqlx::query(
                r"
                INSERT INTO routine_exercises (
                    id, routine_id, exercise_id, sets, reps, duration_minutes,
                    weight, display_order, day_of_week
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                ",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&id)
            .bind(&exercise.exercise_id)
            .bind(exercise.sets)
            .bind(exercise.reps)
            .bind(exercise.duration_minutes)
            .bind(exercise.weight)
            .bind(exercise.display_order)
            .bind(exercise.day_of_week.map(i64::from))
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to add routine exercise: {e}")))?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit routine: {e}")))?;

        Ok(Some(Routine {
            id,
            user_id,
            name: request.name.clone(),
            description: request.description.clone(),
            is_active: true,
            created_at: now,
        }))
    }

    /// Whether a routine with this ID belongs to the user
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn exists_for_user(&self, routine_id: &str, user_id: Uuid) -> AppResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM routines WHERE id = $1 AND user_id = $2")
                .bind(routine_id)
                .bind(user_id.to_string())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to look up routine: {e}")))?;
        Ok(count > 0)
    }

    /// Count routines owned by a user
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn count_for_user(&self, user_id: Uuid) -> AppResult<u32> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM routines WHERE user_id = $1")
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count routines: {e}")))?;
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    /// Read a routine joined with its exercises as flat rows
    ///
    /// Left joins keep the routine row even when it has no links. Rows are
    /// ordered by weekday (Sunday first, unscheduled last), then display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_with_exercise_rows(
        &self,
        routine_id: &str,
        user_id: Uuid,
    ) -> AppResult<Vec<RoutineRow>> {
        let rows = sqlx::query(
            r"
            SELECT r.id AS routine_id, r.name, r.description, r.is_active,
                   re.id AS routine_exercise_id, re.exercise_id,
                   e.name AS exercise_name, e.name_localized AS exercise_name_localized,
                   e.category, re.sets, re.reps, re.duration_minutes, re.weight,
                   re.display_order, re.day_of_week
            FROM routines r
            LEFT JOIN routine_exercises re ON re.routine_id = r.id
            LEFT JOIN exercises e ON e.id = re.exercise_id
            WHERE r.id = $1 AND r.user_id = $2
            ORDER BY re.day_of_week IS NULL, re.day_of_week, re.display_order
            ",
        )
        .bind(routine_id)
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to read routine: {e}")))?;

        rows.iter().map(row_to_routine_row).collect()
    }
}

fn row_to_routine_row(row: &SqliteRow) -> AppResult<RoutineRow> {
    Ok(RoutineRow {
        routine_id: row.try_get("routine_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        is_active: row.try_get::<i64, _>("is_active")? != 0,
        routine_exercise_id: row.try_get("routine_exercise_id")?,
        exercise_id: row.try_get("exercise_id")?,
        exercise_name: row.try_get("exercise_name")?,
        exercise_name_localized: row.try_get("exercise_name_localized")?,
        category: row.try_get("category")?,
        sets: row.try_get("sets")?,
        reps: row.try_get("reps")?,
        duration_minutes: row.try_get("duration_minutes")?,
        weight: row.try_get("weight")?,
        display_order: row.try_get("display_order")?,
        day_of_week: row.try_get("day_of_week")?,
    })
}
