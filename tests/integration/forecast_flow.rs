use std::sync::Arc;

use liftcast_lib::commands::forecast::{forecast_generate, forecast_reps};
use liftcast_lib::commands::workout::{profile_register, workouts_log};
use liftcast_lib::commands::AppState;
use liftcast_lib::db::observation_store::MemoryObservationStore;
use liftcast_lib::db::DbPool;
use liftcast_lib::models::forecast::{ForecastMetric, ForecastQuery, Tier};
use liftcast_lib::models::workout::WorkoutCreateInput;
use liftcast_lib::services::settings_service::SettingsUpdateInput;
use tempfile::tempdir;

fn setup_state() -> (AppState, tempfile::TempDir) {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("forecast.sqlite")).expect("db pool");
    let state = AppState::new(pool).expect("app state");
    profile_register(&state, 1001, "Avery".into()).expect("profile");
    (state, dir)
}

fn log(state: &AppState, exercise: &str, recorded_at: &str, reps: i64, weight: f64) {
    workouts_log(
        state,
        WorkoutCreateInput {
            user_id: 1001,
            exercise: exercise.into(),
            reps,
            weight,
            is_bodyweight: None,
            recorded_at: Some(recorded_at.into()),
        },
    )
    .expect("log workout");
}

#[test]
fn test_linear_history_forecast_end_to_end() {
    let (state, _dir) = setup_state();
    log(&state, "Bench Press", "2024-01-01 09:00:00", 5, 50.0);
    log(&state, "bench press", "2024-01-11 09:00:00", 10, 60.0);

    let report = forecast_generate(
        &state,
        ForecastQuery {
            user_id: 1001,
            exercise: "bench press".into(),
            degree: Some(1),
            ..ForecastQuery::default()
        },
    )
    .expect("forecast");

    assert_eq!(report.tier, Tier::Intermediate);
    assert_eq!(report.reps.len(), 5);
    let days: Vec<i64> = report.reps.iter().map(|f| f.future_day).collect();
    assert_eq!(days, vec![11, 12, 13, 14, 15]);
    assert!(report.reps.iter().all(|f| f.metric == ForecastMetric::Reps));

    // Raw 12.5 at day 15, grown 1% and boosted 5% by the heavy-load trade-off.
    let last = report.reps.last().expect("last point");
    assert!((last.projected_value - 12.5 * 1.01 * 1.05).abs() < 1e-6);
    assert!(last.confidence_radius >= 2.0);

    let weight = report.weight.expect("weighted series");
    for (index, point) in weight.iter().enumerate() {
        assert!(point.projected_value >= 60.0);
        assert!(point.projected_value <= 60.0 + 2.5 * (index + 1) as f64 + 1e-9);
    }
    assert_eq!(report.history.len(), 2);
}

#[test]
fn test_bodyweight_series_has_no_weight_track() {
    let (state, _dir) = setup_state();
    log(&state, "pushups", "2024-02-01 07:00:00", 10, 0.0);
    log(&state, "pushups", "2024-02-03 07:00:00", 12, 0.0);
    log(&state, "pushups", "2024-02-06 07:00:00", 15, 0.0);

    let report = forecast_generate(
        &state,
        ForecastQuery {
            user_id: 1001,
            exercise: "pushups".into(),
            horizon_days: Some(7),
            ..ForecastQuery::default()
        },
    )
    .expect("forecast");

    assert!(report.weight.is_none());
    assert_eq!(report.reps.len(), 7);
    assert!(report.reps.iter().all(|f| f.projected_value >= 15.0));
    assert!((report.latest_strength - 15.0).abs() < 1e-9);
}

#[test]
fn test_settings_drive_default_horizon() {
    let (state, _dir) = setup_state();
    log(&state, "squat", "2024-03-01 07:00:00", 8, 40.0);
    log(&state, "squat", "2024-03-05 07:00:00", 9, 45.0);

    state
        .settings()
        .update(SettingsUpdateInput {
            default_horizon_days: Some(10),
            ..SettingsUpdateInput::default()
        })
        .expect("update settings");

    let reps = forecast_reps(&state, 1001, "squat".into()).expect("forecast");
    assert_eq!(reps.len(), 10);
}

#[test]
fn test_near_ceiling_history_is_promoted() {
    let (state, _dir) = setup_state();
    log(&state, "situps", "2024-03-01 07:00:00", 120, 0.0);
    log(&state, "situps", "2024-03-08 07:00:00", 138, 0.0);

    let report = forecast_generate(
        &state,
        ForecastQuery {
            user_id: 1001,
            exercise: "situps".into(),
            ..ForecastQuery::default()
        },
    )
    .expect("forecast");

    assert_eq!(report.tier, Tier::Expert);
    assert!(report.reps.iter().all(|f| f.tier == Tier::Expert));
    assert!(report.reps.iter().all(|f| f.projected_value <= 200.0));
}

#[test]
fn test_memory_store_can_back_forecasts() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("memory.sqlite")).expect("db pool");
    let store = Arc::new(MemoryObservationStore::new());
    store
        .push(1001, "plank", "2024-04-01T08:00:00", 30, 0.0)
        .expect("push");
    store
        .push(1001, "plank", "2024-04-04T08:00:00", 40, 0.0)
        .expect("push");

    let state = AppState::with_store(pool, store).expect("app state");
    let reps = forecast_reps(&state, 1001, "Plank".into()).expect("forecast");
    assert_eq!(reps.len(), 5);
    assert_eq!(reps[0].future_day, 4);
}
