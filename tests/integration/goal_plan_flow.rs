use liftcast_lib::commands::goal::{goals_list, goals_plan, goals_set};
use liftcast_lib::commands::workout::{profile_register, workouts_log};
use liftcast_lib::commands::AppState;
use liftcast_lib::db::DbPool;
use liftcast_lib::models::goal::GoalCreateInput;
use liftcast_lib::models::workout::WorkoutCreateInput;
use tempfile::tempdir;

fn setup_state() -> (AppState, tempfile::TempDir) {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("goals.sqlite")).expect("db pool");
    let state = AppState::new(pool).expect("app state");
    profile_register(&state, 1001, "Avery".into()).expect("profile");
    (state, dir)
}

fn goal(exercise: &str, target_reps: i64, target_weight: f64, deadline: &str) -> GoalCreateInput {
    GoalCreateInput {
        user_id: 1001,
        exercise: exercise.into(),
        target_reps,
        target_weight,
        deadline: deadline.into(),
    }
}

#[test]
fn test_weighted_plan_reaches_target() {
    let (state, _dir) = setup_state();
    workouts_log(
        &state,
        WorkoutCreateInput {
            user_id: 1001,
            exercise: "Bench Press".into(),
            reps: 8,
            weight: 60.0,
            recorded_at: Some("2024-06-01 18:00:00".into()),
            ..WorkoutCreateInput::default()
        },
    )
    .expect("log workout");

    goals_set(&state, goal("bench press", 12, 70.0, "2024-06-29")).expect("goal");

    let plan = goals_plan(&state, 1001, "bench press".into(), Some("2024-06-01".into()))
        .expect("plan");

    assert_eq!(plan.current_reps, 8);
    assert!(!plan.is_bodyweight);
    assert_eq!(plan.weeks.len(), 4);
    let reps: Vec<i64> = plan.weeks.iter().map(|week| week.reps).collect();
    assert_eq!(reps, vec![9, 10, 11, 12]);
    let weights: Vec<f64> = plan.weeks.iter().map(|week| week.weight).collect();
    assert_eq!(weights, vec![62.5, 65.0, 67.5, 70.0]);
}

#[test]
fn test_latest_goal_wins() {
    let (state, _dir) = setup_state();
    workouts_log(
        &state,
        WorkoutCreateInput {
            user_id: 1001,
            exercise: "pullups".into(),
            reps: 5,
            recorded_at: Some("2024-06-01 18:00:00".into()),
            ..WorkoutCreateInput::default()
        },
    )
    .expect("log workout");

    goals_set(&state, goal("pullups", 10, 0.0, "2024-06-15")).expect("first goal");
    goals_set(&state, goal("pullups", 25, 0.0, "2024-06-15")).expect("second goal");

    let plan = goals_plan(&state, 1001, "pullups".into(), Some("2024-06-01".into()))
        .expect("plan");
    assert_eq!(plan.goal.target_reps, 25);
    assert_eq!(plan.weeks.len(), 2);
    assert_eq!(plan.weeks[1].reps, 25);
    assert!(plan.weeks.iter().all(|week| week.weight == 0.0));

    assert_eq!(goals_list(&state, 1001).expect("goals").len(), 2);
}

#[test]
fn test_plan_errors_map_to_codes() {
    let (state, _dir) = setup_state();

    let missing_goal = goals_plan(&state, 1001, "rows".into(), Some("2024-06-01".into()))
        .expect_err("no goal");
    assert_eq!(missing_goal.code, "NOT_FOUND");

    goals_set(&state, goal("rows", 20, 0.0, "2024-07-01")).expect("goal");
    let missing_workout = goals_plan(&state, 1001, "rows".into(), Some("2024-06-01".into()))
        .expect_err("no workout");
    assert_eq!(missing_workout.code, "INSUFFICIENT_DATA");

    let bad_deadline = goals_set(&state, goal("rows", 20, 0.0, "next month")).expect_err("deadline");
    assert_eq!(bad_deadline.code, "VALIDATION_ERROR");

    let far_deadline = goals_set(&state, goal("rows", 20, 0.0, "9999-12-31")).expect_err("far");
    assert_eq!(far_deadline.code, "VALIDATION_ERROR");

    let bad_target = goals_set(&state, goal("rows", 0, 0.0, "2024-07-01")).expect_err("target");
    assert_eq!(bad_target.code, "VALIDATION_ERROR");
}
