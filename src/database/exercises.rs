// ABOUTME: Database operations for the exercise catalog referenced by templates and routines
// ABOUTME: Batched existence checks for template validation plus catalog inserts for seeding
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::{AppError, AppResult};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use std::collections::HashSet;
use uuid::Uuid;

/// Upper bound on bound parameters per `IN (...)` query
const EXISTENCE_CHUNK_SIZE: usize = 500;

/// A catalog exercise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    /// Unique identifier
    pub id: String,
    /// Canonical name
    pub name: String,
    /// Localized display name
    pub name_localized: Option<String>,
    /// Category, e.g. "strength" or "cardio"
    pub category: Option<String>,
}

/// Request to add an exercise to the catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateExerciseRequest {
    /// Explicit identifier; generated when absent
    pub id: Option<String>,
    /// Canonical name
    pub name: String,
    /// Localized display name
    pub name_localized: Option<String>,
    /// Category
    pub category: Option<String>,
}

/// Exercise catalog operations
pub struct ExerciseCatalog {
    pool: SqlitePool,
}

impl ExerciseCatalog {
    /// Create a new catalog handle
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Add an exercise to the catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (including duplicate IDs)
    pub async fn create(&self, request: &CreateExerciseRequest) -> AppResult<Exercise> {
        let id = request
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        sqlx::query(
            r"
            INSERT INTO exercises (id, name, name_localized, category, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(&id)
        .bind(&request.name)
        .bind(&request.name_localized)
        .bind(&request.category)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create exercise: {e}")))?;

        Ok(Exercise {
            id,
            name: request.name.clone(),
            name_localized: request.name_localized.clone(),
            category: request.category.clone(),
        })
    }

    /// Get an exercise by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get(&self, exercise_id: &str) -> AppResult<Option<Exercise>> {
        let row = sqlx::query(
            "SELECT id, name, name_localized, category FROM exercises WHERE id = $1",
        )
        .bind(exercise_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get exercise: {e}")))?;

        row.map(|r| {
            Ok(Exercise {
                id: r.try_get("id")?,
                name: r.try_get("name")?,
                name_localized: r.try_get("name_localized")?,
                category: r.try_get("category")?,
            })
        })
        .transpose()
    }

    /// Return the subset of `ids` present in the catalog
    ///
    /// One round-trip per chunk instead of one per exercise.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails
    pub async fn existing_ids(&self, ids: &[String]) -> AppResult<HashSet<String>> {
        let unique: Vec<&String> = ids
            .iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let mut found = HashSet::with_capacity(unique.len());
        for chunk in unique.chunks(EXISTENCE_CHUNK_SIZE) {
            let mut builder: QueryBuilder<Sqlite> =
                QueryBuilder::new("SELECT id FROM exercises WHERE id IN (");
            let mut separated = builder.separated(", ");
            for id in chunk {
                separated.push_bind(id.as_str());
            }
            separated.push_unseparated(")");

            let rows = builder
                .build()
                .fetch_all(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to check exercises: {e}")))?;

            for row in rows {
                found.insert(row.try_get::<String, _>("id")?);
            }
        }
        Ok(found)
    }
}
