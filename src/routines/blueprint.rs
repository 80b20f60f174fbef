// ABOUTME: Normalization of template exercise blueprints into an ordered descriptor list
// ABOUTME: Accepts object-wrapped or bare-list blueprints and tolerates loosely typed fields
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Template blueprints arrive in two shapes depending on where the template
//! came from: `{"exercises": [...]}` or a bare `[...]`. The shape is resolved
//! once here so nothing downstream has to look at raw JSON again.

use crate::constants::exercise_defaults::BLUEPRINT_LIST_FIELD;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// The stored shape of a template's exercise blueprint
#[derive(Debug, Clone, PartialEq)]
pub enum ExerciseBlueprint {
    /// An object carrying the list under the `exercises` field
    Wrapped(Vec<Value>),
    /// A bare list of descriptors
    List(Vec<Value>),
    /// Anything else; contributes no exercises
    Unrecognized,
}

impl From<Value> for ExerciseBlueprint {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(mut map) => match map.remove(BLUEPRINT_LIST_FIELD) {
                Some(Value::Array(entries)) => Self::Wrapped(entries),
                _ => Self::Unrecognized,
            },
            Value::Array(entries) => Self::List(entries),
            _ => Self::Unrecognized,
        }
    }
}

impl ExerciseBlueprint {
    /// Convert the blueprint into descriptors, preserving order
    #[must_use]
    pub fn into_descriptors(self) -> Vec<ExerciseDescriptor> {
        match self {
            Self::Wrapped(entries) | Self::List(entries) => entries
                .into_iter()
                .enumerate()
                .map(|(index, entry)| ExerciseDescriptor::from_entry(index, entry))
                .collect(),
            Self::Unrecognized => Vec::new(),
        }
    }
}

/// Normalize a stored blueprint into an ordered descriptor list (possibly empty)
#[must_use]
pub fn normalize_blueprint(value: Value) -> Vec<ExerciseDescriptor> {
    ExerciseBlueprint::from(value).into_descriptors()
}

/// One exercise entry of a template blueprint
///
/// Every field is optional; numbers may arrive as JSON numbers or numeric strings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExerciseDescriptor {
    /// Catalog exercise reference
    #[serde(default, deserialize_with = "lenient_string")]
    pub exercise_id: Option<String>,
    /// Exercise name as written by the template author
    #[serde(default, deserialize_with = "lenient_string")]
    pub exercise_name: Option<String>,
    /// Generic name field some template sources use instead
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    /// Target sets
    #[serde(default, deserialize_with = "lenient_integer")]
    pub sets: Option<i64>,
    /// Target reps
    #[serde(default, deserialize_with = "lenient_integer")]
    pub reps: Option<i64>,
    /// Target duration in minutes
    #[serde(default, alias = "duration", deserialize_with = "lenient_integer")]
    pub duration_minutes: Option<i64>,
    /// Working weight
    #[serde(default, deserialize_with = "lenient_number")]
    pub weight: Option<f64>,
    /// Position within its weekday
    #[serde(default, alias = "order_index", deserialize_with = "lenient_integer")]
    pub display_order: Option<i64>,
    /// Weekday 0 (Sunday) to 6 (Saturday)
    #[serde(default, alias = "weekday", deserialize_with = "lenient_integer")]
    pub day_of_week: Option<i64>,
}

impl ExerciseDescriptor {
    fn from_entry(index: usize, entry: Value) -> Self {
        if !entry.is_object() {
            warn!(index, "Ignoring non-object entry in exercise blueprint");
            return Self::default();
        }
        serde_json::from_value(entry).unwrap_or_else(|e| {
            warn!(index, "Ignoring unreadable entry in exercise blueprint: {e}");
            Self::default()
        })
    }

    /// Name shown to the user when this entry is skipped
    #[must_use]
    pub fn display_name(&self) -> String {
        self.exercise_name
            .as_deref()
            .or(self.name.as_deref())
            .or(self.exercise_id.as_deref())
            .filter(|s| !s.is_empty())
            .unwrap_or("unnamed exercise")
            .to_owned()
    }
}

/// Coerce a JSON value into an integer the way form-ish clients send them
#[must_use]
pub fn value_as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed.parse::<i64>().ok().or_else(|| {
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            })
        }
        _ => None,
    }
}

fn lenient_integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_integer))
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite()))
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
