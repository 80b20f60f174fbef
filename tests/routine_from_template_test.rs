// ABOUTME: Integration tests for the routine-from-template materialization pipeline
// ABOUTME: Exercises partial validity, rollback on total failure, schedule projection, and idempotent upserts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

// Test files: allow missing_docs (rustc lint) and unwrap (valid in tests)
#![allow(missing_docs, clippy::unwrap_used)]

mod helpers;

use chrono::{Datelike, NaiveDate};
use helpers::fixtures::{create_template, create_test_database};
use routine_planner::constants::scheduling::DEFAULT_SCHEDULE_WEEKS;
use routine_planner::database::Database;
use routine_planner::errors::{AppResult, ErrorCode};
use routine_planner::services::routine_templates::{
    create_routine_from_template, list_routine_schedule, FromTemplateRequest, MaterializedRoutine,
};
use serde_json::{json, Value};
use uuid::Uuid;

/// 2025-03-10 is a Monday
fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

fn request(template_id: &str) -> FromTemplateRequest {
    FromTemplateRequest {
        template_id: Some(json!(template_id)),
        ..Default::default()
    }
}

async fn materialize(
    database: &Database,
    user_id: Uuid,
    request: &FromTemplateRequest,
) -> AppResult<MaterializedRoutine> {
    create_routine_from_template(database, user_id, request, monday(), DEFAULT_SCHEDULE_WEEKS).await
}

#[tokio::test]
async fn test_partial_validity_creates_routine_with_warnings() {
    let database = create_test_database().await;
    let template_id = create_template(
        &database,
        "Upper Body",
        json!({"exercises": [
            {"exercise_id": "bench", "exercise_name": "Bench Press", "sets": 4, "reps": 8, "day_of_week": 1},
            {"exercise_id": "unicorn-press", "exercise_name": "Unicorn Press", "day_of_week": 1},
            {"exercise_id": "row", "reps": 10, "day_of_week": 3, "display_order": 2}
        ]}),
    )
    .await;
    let user_id = Uuid::new_v4();

    let created = materialize(&database, user_id, &request(&template_id))
        .await
        .unwrap();

    assert_eq!(created.routine.name, "Upper Body");
    assert!(created.routine.is_active);
    assert_eq!(created.routine.exercises.len(), 2);
    assert_eq!(created.skipped_names(), vec!["Unicorn Press"]);

    let bench = &created.routine.exercises[0];
    assert_eq!(bench.exercise_id, "bench");
    assert_eq!(bench.exercise_name.as_deref(), Some("Développé couché"));
    assert_eq!(bench.sets, Some(4));

    let row = &created.routine.exercises[1];
    assert_eq!(row.sets, Some(3));
    assert_eq!(row.display_order, Some(2));
    assert_eq!(row.weight, Some(0.0));
}

#[tokio::test]
async fn test_total_validation_failure_leaves_no_routine() {
    let database = create_test_database().await;
    let template_id = create_template(
        &database,
        "Imaginary",
        json!([{"exercise_id": "ghost-1"}, {"exercise_id": "ghost-2"}]),
    )
    .await;
    let user_id = Uuid::new_v4();

    let err = materialize(&database, user_id, &request(&template_id))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ValidationFailed);
    assert_eq!(err.http_status(), 400);
    assert_eq!(database.routines().count_for_user(user_id).await.unwrap(), 0);

    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(database.pool())
        .await
        .unwrap();
    assert_eq!(users, 0);
}

#[tokio::test]
async fn test_missing_template_is_not_found() {
    let database = create_test_database().await;
    let err = materialize(&database, Uuid::new_v4(), &request("nope"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_template_without_exercises_is_rejected() {
    let database = create_test_database().await;
    for blueprint in [json!([]), json!({"exercises": []}), json!({"other": 1}), Value::Null] {
        let template_id = create_template(&database, "Empty", blueprint).await;
        let err = materialize(&database, Uuid::new_v4(), &request(&template_id))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
        assert!(err.message.contains("no exercises"));
    }
}

#[tokio::test]
async fn test_invalid_parameters_rejected_before_any_write() {
    let database = create_test_database().await;
    let template_id = create_template(&database, "T", json!([{"exercise_id": "squat"}])).await;
    let user_id = Uuid::new_v4();

    let missing = materialize(&database, user_id, &FromTemplateRequest::default())
        .await
        .unwrap_err();
    assert_eq!(missing.code, ErrorCode::MissingRequiredField);

    let cases = [
        (json!({"schedule_weeks": 15}), "schedule_weeks"),
        (json!({"schedule_days_of_week": "invalid"}), "schedule_days_of_week"),
        (json!({"schedule_start_date": "invalid-date"}), "schedule_start_date"),
        (json!({"schedule_start_date": "+262142-12-25"}), "schedule_start_date"),
    ];
    for (overrides, field) in cases {
        let mut body = overrides;
        body["template_id"] = json!(template_id.clone());
        let request: FromTemplateRequest = serde_json::from_value(body).unwrap();

        let err = materialize(&database, user_id, &request).await.unwrap_err();
        assert_eq!(err.http_status(), 400);
        assert!(err.message.contains(field), "{} lacks {field}", err.message);
    }

    assert_eq!(database.routines().count_for_user(user_id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_failed_occurrence_does_not_stop_scheduling() {
    let database = create_test_database().await;
    sqlx::query(
        r"
        CREATE TRIGGER reject_one_date BEFORE INSERT ON scheduled_routines
        WHEN NEW.scheduled_date = '2025-03-17'
        BEGIN SELECT RAISE(ABORT, 'date unavailable'); END
        ",
    )
    .execute(database.pool())
    .await
    .unwrap();

    let template_id = create_template(&database, "Mondays", json!([{"exercise_id": "squat"}])).await;
    let user_id = Uuid::new_v4();
    let created = materialize(
        &database,
        user_id,
        &serde_json::from_value(json!({
            "template_id": template_id,
            "schedule_weeks": 3,
            "schedule_days_of_week": [1]
        }))
        .unwrap(),
    )
    .await
    .unwrap();

    let date = |d| NaiveDate::from_ymd_opt(2025, 3, d).unwrap();
    assert_eq!(created.schedule.failed, vec![date(17)]);
    assert_eq!(created.schedule.scheduled, vec![date(24), date(31)]);
    assert!(database
        .routines()
        .exists_for_user(&created.routine.routine_id, user_id)
        .await
        .unwrap());

    let listed = list_routine_schedule(&database, user_id, &created.routine.routine_id)
        .await
        .unwrap();
    let listed: Vec<NaiveDate> = listed.iter().map(|o| o.scheduled_date).collect();
    assert_eq!(listed, vec![date(24), date(31)]);
}

#[tokio::test]
async fn test_schedule_inferred_from_exercise_weekdays() {
    let database = create_test_database().await;
    let template_id = create_template(
        &database,
        "Mon/Wed",
        json!([
            {"exercise_id": "squat", "day_of_week": 1},
            {"exercise_id": "row", "day_of_week": 3},
            {"exercise_id": "plank", "day_of_week": 3}
        ]),
    )
    .await;
    let user_id = Uuid::new_v4();

    let created = materialize(&database, user_id, &request(&template_id))
        .await
        .unwrap();

    assert_eq!(created.schedule.scheduled.len(), 8);
    assert!(created.schedule.failed.is_empty());

    let listed = list_routine_schedule(&database, user_id, &created.routine.routine_id)
        .await
        .unwrap();
    assert_eq!(listed.len(), 8);
    // Monday base date rolls Monday to the following week
    assert_eq!(listed[0].scheduled_date, NaiveDate::from_ymd_opt(2025, 3, 12).unwrap());
    assert_eq!(listed[1].scheduled_date, NaiveDate::from_ymd_opt(2025, 3, 17).unwrap());
    assert!(listed.iter().all(|o| o.scheduled_date > monday() && !o.completed));
}

#[tokio::test]
async fn test_schedule_defaults_to_weekdays_without_exercise_days() {
    let database = create_test_database().await;
    let template_id = create_template(&database, "Any day", json!([{"exercise_id": "plank"}])).await;
    let user_id = Uuid::new_v4();

    let created = materialize(
        &database,
        user_id,
        &serde_json::from_value(json!({"template_id": template_id, "schedule_weeks": 2})).unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(created.schedule.scheduled.len(), 10);
    for day in &created.schedule.scheduled {
        let weekday = day.weekday().num_days_from_sunday();
        assert!((1..=5).contains(&weekday));
    }
}

#[tokio::test]
async fn test_explicit_schedule_overrides() {
    let database = create_test_database().await;
    let template_id =
        create_template(&database, "Sunday", json!([{"exercise_id": "squat", "day_of_week": 2}])).await;
    let user_id = Uuid::new_v4();

    let created = materialize(
        &database,
        user_id,
        &serde_json::from_value(json!({
            "template_id": template_id,
            "schedule_weeks": "3",
            "schedule_days_of_week": [0, 9, "6"],
            "schedule_start_date": "2025-04-02T15:30:00Z"
        }))
        .unwrap(),
    )
    .await
    .unwrap();

    let mut dates = created.schedule.scheduled.clone();
    dates.sort();
    let expected: Vec<NaiveDate> = [(4, 5), (4, 6), (4, 12), (4, 13), (4, 19), (4, 20)]
        .into_iter()
        .map(|(m, d)| NaiveDate::from_ymd_opt(2025, m, d).unwrap())
        .collect();
    assert_eq!(dates, expected);
}

#[tokio::test]
async fn test_rematerializing_resets_completed_occurrences() {
    let database = create_test_database().await;
    let template_id = create_template(&database, "Repeat", json!([{"exercise_id": "squat"}])).await;
    let user_id = Uuid::new_v4();

    let created = materialize(&database, user_id, &request(&template_id))
        .await
        .unwrap();
    let routine_id = created.routine.routine_id.clone();
    let first_day = created.schedule.scheduled[0];

    let schedules = database.schedules();
    assert!(schedules.mark_completed(user_id, &routine_id, first_day).await.unwrap());

    // Re-scheduling the same routine onto the same dates overwrites completion
    schedules.upsert_occurrence(user_id, &routine_id, first_day).await.unwrap();
    let occurrence = schedules.get(user_id, &routine_id, first_day).await.unwrap().unwrap();
    assert!(!occurrence.completed);

    // A second materialization is a new routine with its own occurrences
    let again = materialize(&database, user_id, &request(&template_id))
        .await
        .unwrap();
    assert_ne!(again.routine.routine_id, routine_id);
    assert_eq!(database.routines().count_for_user(user_id).await.unwrap(), 2);
}

#[tokio::test]
async fn test_duplicate_override_weekdays_collapse_to_one_occurrence() {
    let database = create_test_database().await;
    let template_id = create_template(&database, "Dup", json!([{"exercise_id": "squat"}])).await;
    let user_id = Uuid::new_v4();

    let created = materialize(
        &database,
        user_id,
        &serde_json::from_value(json!({
            "template_id": template_id,
            "schedule_weeks": 1,
            "schedule_days_of_week": [2, 2]
        }))
        .unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(created.schedule.scheduled.len(), 2);
    let listed = list_routine_schedule(&database, user_id, &created.routine.routine_id)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn test_schedule_listing_is_owner_only() {
    let database = create_test_database().await;
    let template_id = create_template(&database, "Mine", json!([{"exercise_id": "squat"}])).await;
    let owner = Uuid::new_v4();
    let created = materialize(&database, owner, &request(&template_id))
        .await
        .unwrap();

    let err = list_routine_schedule(&database, Uuid::new_v4(), &created.routine.routine_id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}
