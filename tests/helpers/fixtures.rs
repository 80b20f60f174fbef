// ABOUTME: Database fixtures for routine planner integration tests
// ABOUTME: In-memory databases with a seeded exercise catalog and template builders

use routine_planner::database::{
    exercises::CreateExerciseRequest, templates::CreateTemplateRequest, Database,
};
use serde_json::Value;

/// Catalog IDs seeded by [`create_test_database`]
pub const SEEDED_EXERCISES: &[(&str, &str, Option<&str>)] = &[
    ("squat", "Back Squat", None),
    ("bench", "Bench Press", Some("Développé couché")),
    ("row", "Barbell Row", None),
    ("plank", "Plank", None),
];

/// Fresh in-memory database with the seeded catalog
pub async fn create_test_database() -> Database {
    let database = Database::in_memory().await.unwrap();
    let catalog = database.exercises();
    for (id, name, localized) in SEEDED_EXERCISES {
        catalog
            .create(&CreateExerciseRequest {
                id: Some((*id).to_owned()),
                name: (*name).to_owned(),
                name_localized: localized.map(str::to_owned),
                category: Some("strength".to_owned()),
            })
            .await
            .unwrap();
    }
    database
}

/// Store a template with the given blueprint and return its ID
pub async fn create_template(database: &Database, name: &str, exercises: Value) -> String {
    database
        .templates()
        .create(&CreateTemplateRequest {
            coach_id: Some("coach-1".to_owned()),
            name: name.to_owned(),
            description: Some(format!("{name} description")),
            exercises,
        })
        .await
        .unwrap()
        .id
}
