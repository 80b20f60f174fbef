// ABOUTME: SQLite connection management and schema migration for the routine planner
// ABOUTME: Owns the pool and hands out per-table managers for templates, catalog, routines, schedules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Database Management
//!
//! A single `SQLite` pool shared by the table managers. Each manager is a thin
//! wrapper around the pool, constructed on demand, the same way route handlers
//! build their managers from shared resources.

/// Exercise catalog lookups
pub mod exercises;
/// Routine and routine-exercise persistence plus the joined read-back
pub mod routines;
/// Scheduled occurrence upserts and listing
pub mod schedules;
/// Template store reads
pub mod templates;

pub use exercises::{Exercise, ExerciseCatalog};
pub use routines::{RoutinesManager, RoutineRow};
pub use schedules::{ScheduleManager, ScheduledOccurrence};
pub use templates::{RoutineTemplate, TemplatesManager};

use crate::config::DatabaseUrl;
use crate::errors::{AppError, AppResult};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::info;
use uuid::Uuid;

/// Database manager owning the connection pool
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the database and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or a migration fails
    pub async fn new(url: &DatabaseUrl) -> AppResult<Self> {
        if let DatabaseUrl::SQLite { path } = url {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    AppError::config(format!(
                        "Failed to create database directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        let options = SqliteConnectOptions::from_str(&url.to_connection_string())
            .map_err(|e| AppError::config(format!("Invalid database URL: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);

        // An in-memory database lives exactly as long as its one connection
        let pool = if url.is_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new().connect_with(options).await?
        };

        let db = Self { pool };
        db.migrate().await?;
        info!("Database schema ready");
        Ok(db)
    }

    /// Open a fresh in-memory database
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or a migration fails
    pub async fn in_memory() -> AppResult<Self> {
        Self::new(&DatabaseUrl::Memory).await
    }

    /// Get a reference to the database pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Template store
    #[must_use]
    pub fn templates(&self) -> TemplatesManager {
        TemplatesManager::new(self.pool.clone())
    }

    /// Exercise catalog
    #[must_use]
    pub fn exercises(&self) -> ExerciseCatalog {
        ExerciseCatalog::new(self.pool.clone())
    }

    /// Routine store
    #[must_use]
    pub fn routines(&self) -> RoutinesManager {
        RoutinesManager::new(self.pool.clone())
    }

    /// Scheduled occurrence store
    #[must_use]
    pub fn schedules(&self) -> ScheduleManager {
        ScheduleManager::new(self.pool.clone())
    }

    /// Make sure a user row exists for the acting user
    ///
    /// Identity is resolved upstream; this only anchors ownership foreign keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn ensure_user(&self, user_id: Uuid) -> AppResult<()> {
        sqlx::query(ENSURE_USER_SQL)
        .bind(user_id.to_string())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to ensure user {user_id}: {e}")))?;
        Ok(())
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

/// Idempotent insert of the user row anchoring ownership foreign keys
pub(crate) const ENSURE_USER_SQL: &str = r"
    INSERT INTO users (id, created_at) VALUES ($1, $2)
    ON CONFLICT(id) DO NOTHING
    ";

const SCHEMA: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        email TEXT,
        created_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS exercises (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        name_localized TEXT,
        category TEXT,
        created_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS routine_templates (
        id TEXT PRIMARY KEY,
        coach_id TEXT,
        name TEXT NOT NULL,
        description TEXT,
        exercises TEXT NOT NULL DEFAULT '[]',
        created_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS routines (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        description TEXT,
        is_active INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS routine_exercises (
        id TEXT PRIMARY KEY,
        routine_id TEXT NOT NULL REFERENCES routines(id) ON DELETE CASCADE,
        exercise_id TEXT NOT NULL REFERENCES exercises(id),
        sets INTEGER NOT NULL,
        reps INTEGER,
        duration_minutes INTEGER,
        weight REAL NOT NULL DEFAULT 0,
        display_order INTEGER NOT NULL DEFAULT 1,
        day_of_week INTEGER CHECK (day_of_week IS NULL OR day_of_week BETWEEN 0 AND 6)
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_routine_exercises_routine ON routine_exercises(routine_id)",
    r"
    CREATE TABLE IF NOT EXISTS scheduled_routines (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        routine_id TEXT NOT NULL REFERENCES routines(id) ON DELETE CASCADE,
        scheduled_date TEXT NOT NULL,
        completed INTEGER NOT NULL DEFAULT 0,
        completed_at TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        UNIQUE(user_id, routine_id, scheduled_date)
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_scheduled_routines_user_date ON scheduled_routines(user_id, scheduled_date)",
];
