// ABOUTME: Exercise catalog seeding utility for the routine planner
// ABOUTME: Seeds a starter exercise catalog and a sample weekly template
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Exercise catalog seeder.
//!
//! Usage:
//! ```bash
//! # Seed the catalog (uses DATABASE_URL from environment)
//! cargo run --bin seed-exercises
//!
//! # Override database URL and skip the sample template
//! cargo run --bin seed-exercises -- --database-url sqlite:./data/routines.db --no-template
//! ```

use anyhow::Result;
use clap::Parser;
use routine_planner::{
    config::DatabaseUrl,
    constants::env_config,
    database::{
        exercises::CreateExerciseRequest, templates::CreateTemplateRequest, Database,
    },
};
use serde_json::json;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "seed-exercises",
    about = "Routine Planner Exercise Catalog Seeder",
    long_about = "Create a starter exercise catalog and a sample template for the routine planner"
)]
struct SeedArgs {
    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Do not create the sample template
    #[arg(long)]
    no_template: bool,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// Seed catalog entry: (id, name, localized name, category)
type ExerciseSeed = (&'static str, &'static str, Option<&'static str>, &'static str);

const EXERCISES: &[ExerciseSeed] = &[
    ("back-squat", "Back Squat", None, "strength"),
    ("bench-press", "Bench Press", None, "strength"),
    ("deadlift", "Deadlift", None, "strength"),
    ("overhead-press", "Overhead Press", None, "strength"),
    ("barbell-row", "Barbell Row", None, "strength"),
    ("pull-up", "Pull-Up", Some("Traction"), "strength"),
    ("plank", "Plank", Some("Gainage"), "core"),
    ("rowing-erg", "Rowing Machine", None, "cardio"),
    ("hip-flexor-stretch", "Hip Flexor Stretch", None, "mobility"),
];

#[tokio::main]
async fn main() -> Result<()> {
    let args = SeedArgs::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    info!("=== Routine Planner Exercise Seeder ===");

    let database_url = args
        .database_url
        .unwrap_or_else(env_config::database_url);
    info!("Connecting to database: {database_url}");
    let database = Database::new(&DatabaseUrl::parse_url(&database_url)?).await?;

    let catalog = database.exercises();
    let mut created = 0;
    for (id, name, localized, category) in EXERCISES {
        if catalog.get(id).await?.is_some() {
            info!("Exercise {id} already present, skipping");
            continue;
        }
        catalog
            .create(&CreateExerciseRequest {
                id: Some((*id).to_owned()),
                name: (*name).to_owned(),
                name_localized: localized.map(str::to_owned),
                category: Some((*category).to_owned()),
            })
            .await?;
        created += 1;
    }
    info!("Seeded {created} of {} exercises", EXERCISES.len());

    if !args.no_template {
        let template = database
            .templates()
            .create(&CreateTemplateRequest {
                coach_id: None,
                name: "Full Body Starter".to_owned(),
                description: Some("Three full-body sessions per week".to_owned()),
                exercises: json!({
                    "exercises": [
                        {"exercise_id": "back-squat", "exercise_name": "Back Squat", "sets": 5, "reps": 5, "day_of_week": 1, "display_order": 1},
                        {"exercise_id": "bench-press", "exercise_name": "Bench Press", "sets": 5, "reps": 5, "day_of_week": 1, "display_order": 2},
                        {"exercise_id": "deadlift", "exercise_name": "Deadlift", "sets": 3, "reps": 5, "day_of_week": 3, "display_order": 1},
                        {"exercise_id": "pull-up", "exercise_name": "Pull-Up", "sets": 3, "reps": 8, "day_of_week": 3, "display_order": 2},
                        {"exercise_id": "plank", "exercise_name": "Plank", "duration_minutes": 2, "day_of_week": 5, "display_order": 1}
                    ]
                }),
            })
            .await?;
        info!("Created sample template {} ({})", template.name, template.id);
    }

    info!("=== Seeding complete ===");
    Ok(())
}
