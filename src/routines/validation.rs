// ABOUTME: Partitions template exercise descriptors into persistable records and skipped entries
// ABOUTME: Applies per-field defaults and records a reason for every entry that cannot be used
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::blueprint::ExerciseDescriptor;
use crate::constants::{exercise_defaults, scheduling};
use crate::database::routines::NewRoutineExercise;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::hash::BuildHasher;

/// Why a descriptor could not be materialized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The descriptor names no exercise at all
    MissingReference,
    /// The referenced exercise is not in the catalog
    UnknownExercise,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingReference => write!(f, "missing exercise reference"),
            Self::UnknownExercise => write!(f, "exercise not found in catalog"),
        }
    }
}

/// A descriptor left out of the materialized routine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedExercise {
    /// Name or ID shown to the user
    pub name: String,
    /// Why it was skipped
    pub reason: SkipReason,
}

/// Result of checking descriptors against the catalog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExerciseValidation {
    /// Records ready to insert, in template order
    pub valid: Vec<NewRoutineExercise>,
    /// Entries left out, in template order
    pub skipped: Vec<SkippedExercise>,
}

impl ExerciseValidation {
    /// Names of the skipped entries for user-facing reporting
    #[must_use]
    pub fn skipped_names(&self) -> Vec<String> {
        self.skipped.iter().map(|s| s.name.clone()).collect()
    }
}

/// Split descriptors into valid records and skipped entries
///
/// `known_ids` is the subset of referenced IDs that exist in the catalog.
#[must_use]
pub fn partition_descriptors<S: BuildHasher>(
    descriptors: &[ExerciseDescriptor],
    known_ids: &HashSet<String, S>,
) -> ExerciseValidation {
    let mut validation = ExerciseValidation::default();

    for descriptor in descriptors {
        match descriptor.exercise_id.as_deref() {
            None => validation.skipped.push(SkippedExercise {
                name: descriptor.display_name(),
                reason: SkipReason::MissingReference,
            }),
            Some(id) if !known_ids.contains(id) => validation.skipped.push(SkippedExercise {
                name: descriptor.display_name(),
                reason: SkipReason::UnknownExercise,
            }),
            Some(id) => validation.valid.push(to_record(id, descriptor)),
        }
    }

    validation
}

fn to_record(exercise_id: &str, descriptor: &ExerciseDescriptor) -> NewRoutineExercise {
    NewRoutineExercise {
        exercise_id: exercise_id.to_owned(),
        sets: descriptor.sets.unwrap_or(exercise_defaults::SETS),
        reps: descriptor.reps,
        duration_minutes: descriptor.duration_minutes,
        weight: descriptor.weight.unwrap_or(exercise_defaults::WEIGHT),
        display_order: descriptor
            .display_order
            .unwrap_or(exercise_defaults::DISPLAY_ORDER),
        // 0 is Sunday, not "absent"; only out-of-range values are dropped
        day_of_week: descriptor
            .day_of_week
            .and_then(|d| u8::try_from(d).ok())
            .filter(|d| (scheduling::MIN_WEEKDAY..=scheduling::MAX_WEEKDAY).contains(d)),
    }
}
