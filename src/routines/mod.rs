// ABOUTME: Domain logic for turning templates into routines and projecting their schedule
// ABOUTME: Pure, store-independent pieces used by the routine template service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Routines
//!
//! Each stage of template materialization that does not need the database
//! lives here so it can be tested against fixed inputs:
//!
//! - [`blueprint`]: normalizes a template's stored exercise blueprint
//! - [`validation`]: splits descriptors into insertable records and skips
//! - [`schedule_params`]: validates week count, weekday and start date overrides
//! - [`projection`]: computes the calendar dates to schedule
//! - [`assembly`]: regroups joined rows into a nested routine

/// Result re-assembly from flat join rows
pub mod assembly;
/// Template blueprint normalization
pub mod blueprint;
/// Occurrence date projection
pub mod projection;
/// Schedule override validation
pub mod schedule_params;
/// Exercise descriptor validation
pub mod validation;

pub use assembly::{assemble_routine, RoutineExerciseView, RoutineWithExercises};
pub use blueprint::{normalize_blueprint, ExerciseBlueprint, ExerciseDescriptor};
pub use projection::{project_occurrences, resolve_weekdays};
pub use schedule_params::{validate_schedule_params, RawScheduleParams, ScheduleParams};
pub use validation::{partition_descriptors, ExerciseValidation, SkipReason, SkippedExercise};
