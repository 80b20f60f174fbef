// ABOUTME: Database operations for scheduled routine occurrences on concrete calendar dates
// ABOUTME: Upsert keyed on (user, routine, date) that resets completion, plus completion and listing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

/// One calendar date on which a routine is scheduled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledOccurrence {
    /// Unique identifier
    pub id: String,
    /// Owning user
    pub user_id: Uuid,
    /// Scheduled routine
    pub routine_id: String,
    /// Calendar day (no time zone)
    pub scheduled_date: NaiveDate,
    /// Whether the user marked it done
    pub completed: bool,
    /// When it was marked done
    pub completed_at: Option<DateTime<Utc>>,
    /// Last write timestamp
    pub updated_at: DateTime<Utc>,
}

/// Scheduled occurrence store operations
pub struct ScheduleManager {
    pool: SqlitePool,
}

impl ScheduleManager {
    /// Create a new schedule manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert an occurrence, or reset an existing one for the same key
    ///
    /// An existing row is overwritten to `completed = false` with its
    /// completion timestamp cleared; prior completion is not preserved.
    ///
    /// # Errors
    ///
    /// Returns an error if the upsert fails
    pub async fn upsert_occurrence(
        &self,
        user_id: Uuid,
        routine_id: &str,
        date: NaiveDate,
    ) -> AppResult<()> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            r"
            INSERT INTO scheduled_routines (
                id, user_id, routine_id, scheduled_date, completed, completed_at,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, 0, NULL, $5, $5)
            ON CONFLICT(user_id, routine_id, scheduled_date) DO UPDATE SET
                completed = 0,
                completed_at = NULL,
                updated_at = excluded.updated_at
            ",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id.to_string())
        .bind(routine_id)
        .bind(date.to_string())
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to schedule {date}: {e}")))?;
        Ok(())
    }

    /// Mark an occurrence as completed
    ///
    /// Returns `false` when no occurrence exists for the key.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn mark_completed(
        &self,
        user_id: Uuid,
        routine_id: &str,
        date: NaiveDate,
    ) -> AppResult<bool> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            r"
            UPDATE scheduled_routines
            SET completed = 1, completed_at = $1, updated_at = $1
            WHERE user_id = $2 AND routine_id = $3 AND scheduled_date = $4
            ",
        )
        .bind(&now)
        .bind(user_id.to_string())
        .bind(routine_id)
        .bind(date.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to complete occurrence: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Get the occurrence for one key
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get(
        &self,
        user_id: Uuid,
        routine_id: &str,
        date: NaiveDate,
    ) -> AppResult<Option<ScheduledOccurrence>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, routine_id, scheduled_date, completed, completed_at, updated_at
            FROM scheduled_routines
            WHERE user_id = $1 AND routine_id = $2 AND scheduled_date = $3
            ",
        )
        .bind(user_id.to_string())
        .bind(routine_id)
        .bind(date.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get occurrence: {e}")))?;

        row.map(|r| row_to_occurrence(&r)).transpose()
    }

    /// List a user's occurrences for a routine, earliest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_for_routine(
        &self,
        user_id: Uuid,
        routine_id: &str,
    ) -> AppResult<Vec<ScheduledOccurrence>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, routine_id, scheduled_date, completed, completed_at, updated_at
            FROM scheduled_routines
            WHERE user_id = $1 AND routine_id = $2
            ORDER BY scheduled_date
            ",
        )
        .bind(user_id.to_string())
        .bind(routine_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list occurrences: {e}")))?;

        rows.iter().map(row_to_occurrence).collect()
    }
}

fn parse_timestamp(value: &str, field: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::internal(format!("Invalid {field} timestamp '{value}': {e}")))
}

fn row_to_occurrence(row: &SqliteRow) -> AppResult<ScheduledOccurrence> {
    let user_id_str: String = row.try_get("user_id")?;
    let date_str: String = row.try_get("scheduled_date")?;
    let completed_at: Option<String> = row.try_get("completed_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    Ok(ScheduledOccurrence {
        id: row.try_get("id")?,
        user_id: Uuid::parse_str(&user_id_str)
            .map_err(|e| AppError::internal(format!("Invalid user_id '{user_id_str}': {e}")))?,
        routine_id: row.try_get("routine_id")?,
        scheduled_date: date_str
            .parse::<NaiveDate>()
            .map_err(|e| AppError::internal(format!("Invalid scheduled_date '{date_str}': {e}")))?,
        completed: row.try_get::<i64, _>("completed")? != 0,
        completed_at: completed_at
            .as_deref()
            .map(|v| parse_timestamp(v, "completed_at"))
            .transpose()?,
        updated_at: parse_timestamp(&updated_at, "updated_at")?,
    })
}
