// Error handling and edge case tests

use liftcast_lib::commands::forecast::forecast_generate;
use liftcast_lib::commands::settings::{settings_get, settings_reset, settings_update};
use liftcast_lib::commands::workout::{
    profile_register, workouts_delete, workouts_log, workouts_update,
};
use liftcast_lib::commands::AppState;
use liftcast_lib::db::DbPool;
use liftcast_lib::error::AppError;
use liftcast_lib::models::forecast::ForecastQuery;
use liftcast_lib::models::settings::ForecastPolicy;
use liftcast_lib::models::workout::{WorkoutCreateInput, WorkoutUpdateInput};
use liftcast_lib::services::settings_service::SettingsUpdateInput;
use tempfile::tempdir;

fn setup_state() -> (AppState, tempfile::TempDir) {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("errors.sqlite")).expect("db pool");
    let state = AppState::new(pool).expect("app state");
    profile_register(&state, 1001, "Avery".into()).expect("profile");
    (state, dir)
}

fn log(state: &AppState, recorded_at: &str, reps: i64) -> i64 {
    workouts_log(
        state,
        WorkoutCreateInput {
            user_id: 1001,
            exercise: "lunges".into(),
            reps,
            recorded_at: Some(recorded_at.into()),
            ..WorkoutCreateInput::default()
        },
    )
    .expect("log workout")
    .id
}

fn query(degree: Option<usize>) -> ForecastQuery {
    ForecastQuery {
        user_id: 1001,
        exercise: "lunges".into(),
        degree,
        ..ForecastQuery::default()
    }
}

#[test]
fn test_single_observation_is_insufficient() {
    let (state, _dir) = setup_state();
    log(&state, "2024-02-01 08:00:00", 10);

    let error = forecast_generate(&state, query(None)).expect_err("one point");
    assert_eq!(error.code, "INSUFFICIENT_DATA");
    assert_eq!(error.details.as_ref().map(|d| d["required"].clone()), Some(serde_json::json!(2)));
}

#[test]
fn test_strict_degree_reports_underdetermined_fit() {
    let (state, _dir) = setup_state();
    log(&state, "2024-02-01 08:00:00", 10);
    log(&state, "2024-02-04 08:00:00", 12);

    let policy = ForecastPolicy {
        adapt_degree: false,
        ..ForecastPolicy::default()
    };
    settings_update(
        &state,
        SettingsUpdateInput {
            policy: Some(policy),
            ..SettingsUpdateInput::default()
        },
    )
    .expect("strict policy");

    let error = forecast_generate(&state, query(Some(2))).expect_err("degree too high");
    assert_eq!(error.code, "UNDERDETERMINED_FIT");

    let linear = forecast_generate(&state, query(Some(1))).expect("linear fit");
    assert_eq!(linear.reps.len(), 5);
}

#[test]
fn test_corrupt_row_aborts_single_series_forecast() {
    let (state, _dir) = setup_state();
    log(&state, "2024-02-01 08:00:00", 10);
    log(&state, "2024-02-04 08:00:00", 12);
    state
        .db()
        .with_connection(|conn| {
            conn.execute(
                "INSERT INTO workouts (user_id, exercise, reps, weight, is_bodyweight, recorded_at) \
                 VALUES (1001, 'lunges', 14, 0, 1, 'Feb 7th')",
                [],
            )?;
            Ok(())
        })
        .expect("corrupt row");

    let error = forecast_generate(&state, query(None)).expect_err("bad timestamp");
    assert_eq!(error.code, "MALFORMED_TIMESTAMP");
}

#[test]
fn test_zero_horizon_is_a_validation_error() {
    let (state, _dir) = setup_state();
    log(&state, "2024-02-01 08:00:00", 10);
    log(&state, "2024-02-04 08:00:00", 12);

    let error = forecast_generate(
        &state,
        ForecastQuery {
            horizon_days: Some(0),
            ..query(None)
        },
    )
    .expect_err("zero horizon");
    assert_eq!(error.code, "VALIDATION_ERROR");
}

#[test]
fn test_update_and_delete_of_missing_workout() {
    let (state, _dir) = setup_state();

    let update = workouts_update(
        &state,
        404,
        WorkoutUpdateInput {
            reps: Some(5),
            weight: None,
        },
    )
    .expect_err("missing workout");
    assert_eq!(update.code, "NOT_FOUND");

    let delete = workouts_delete(&state, 404).expect_err("missing workout");
    assert_eq!(delete.code, "NOT_FOUND");

    let id = log(&state, "2024-02-01 08:00:00", 10);
    let negative = workouts_update(
        &state,
        id,
        WorkoutUpdateInput {
            reps: None,
            weight: Some(-1.0),
        },
    )
    .expect_err("negative weight");
    assert_eq!(negative.code, "VALIDATION_ERROR");
}

#[test]
fn test_invalid_settings_are_config_errors() {
    let (state, _dir) = setup_state();

    let mut policy = ForecastPolicy::default();
    policy.promotion_ratio = 0.0;
    let error = settings_update(
        &state,
        SettingsUpdateInput {
            policy: Some(policy),
            ..SettingsUpdateInput::default()
        },
    )
    .expect_err("bad ratio");
    assert_eq!(error.code, "CONFIG_ERROR");

    settings_reset(&state).expect("reset");
    assert_eq!(settings_get(&state).expect("settings").policy, ForecastPolicy::default());
}

#[test]
fn test_recoverable_errors_are_flagged() {
    assert!(AppError::insufficient_data(2, 1).is_recoverable());
    assert!(AppError::underdetermined_fit(2, 2).is_recoverable());
    assert!(!AppError::numerical_failure("zero pivot").is_recoverable());
}
