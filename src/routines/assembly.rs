// ABOUTME: Groups flat routine/exercise join rows back into one nested routine object
// ABOUTME: Skips link-less rows and prefers localized exercise names over canonical ones
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::database::routines::RoutineRow;
use serde::{Deserialize, Serialize};

/// A routine with its exercises, as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineWithExercises {
    /// Routine identifier
    pub routine_id: String,
    /// Display name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Whether the routine is active
    pub is_active: bool,
    /// Exercises ordered by weekday (unscheduled last), then display order
    pub exercises: Vec<RoutineExerciseView>,
}

impl RoutineWithExercises {
    /// Weekdays carried by the routine's exercises, in exercise order
    pub fn exercise_weekdays(&self) -> impl Iterator<Item = Option<u8>> + '_ {
        self.exercises
            .iter()
            .map(|e| e.day_of_week.and_then(|d| u8::try_from(d).ok()))
    }
}

/// One exercise inside a routine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineExerciseView {
    /// Link row identifier
    pub id: Option<String>,
    /// Catalog exercise identifier
    pub exercise_id: String,
    /// Localized name when available, canonical name otherwise
    pub exercise_name: Option<String>,
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
    /// Weekday 0 (Sunday) to 6 (Saturday), `None` when unscheduled
    pub day_of_week: Option<i64>,
}

/// Fold join rows into a nested routine
///
/// Returns `None` when there are no rows (routine not found). Routine-level
/// fields come from the first row; row order is kept for the exercise list.
#[must_use]
pub fn assemble_routine(rows: Vec<RoutineRow>) -> Option<RoutineWithExercises> {
    let mut rows = rows.into_iter().peekable();
    let first = rows.peek()?;

    let mut routine = RoutineWithExercises {
        routine_id: first.routine_id.clone(),
        name: first.name.clone(),
        description: first.description.clone(),
        is_active: first.is_active,
        exercises: Vec::new(),
    };

    routine.exercises = rows
        .filter_map(|row| {
            let exercise_id = row.exercise_id?;
            Some(RoutineExerciseView {
                id: row.routine_exercise_id,
                exercise_id,
                exercise_name: row.exercise_name_localized.or(row.exercise_name),
                category: row.category,
                sets: row.sets,
                reps: row.reps,
                duration_minutes: row.duration_minutes,
                weight: row.weight,
                display_order: row.display_order,
                day_of_week: row.day_of_week,
            })
        })
        .collect();

    Some(routine)
}
