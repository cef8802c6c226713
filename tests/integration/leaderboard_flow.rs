use liftcast_lib::commands::leaderboard::{
    leaderboard_fetch, leaderboard_snapshot, leaderboard_user_rank,
};
use liftcast_lib::commands::workout::{profile_register, workouts_log};
use liftcast_lib::commands::AppState;
use liftcast_lib::db::DbPool;
use liftcast_lib::models::leaderboard::{LeaderboardFilter, LEADERBOARD_LIMIT};
use liftcast_lib::models::workout::WorkoutCreateInput;
use tempfile::tempdir;

fn setup_state() -> (AppState, tempfile::TempDir) {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("leaderboard.sqlite")).expect("db pool");
    let state = AppState::new(pool).expect("app state");
    (state, dir)
}

fn log(state: &AppState, user_id: i64, exercise: &str, recorded_at: &str, reps: i64) {
    workouts_log(
        state,
        WorkoutCreateInput {
            user_id,
            exercise: exercise.into(),
            reps,
            weight: 0.0,
            is_bodyweight: None,
            recorded_at: Some(recorded_at.into()),
        },
    )
    .expect("log workout");
}

#[test]
fn test_faster_improver_ranks_first() {
    let (state, _dir) = setup_state();
    profile_register(&state, 1001, "A".into()).expect("profile");
    profile_register(&state, 1002, "B".into()).expect("profile");

    log(&state, 1001, "pushups", "2024-03-01 08:00:00", 10);
    log(&state, 1001, "pushups", "2024-03-06 08:00:00", 20);
    log(&state, 1002, "pushups", "2024-03-01 08:00:00", 5);
    log(&state, 1002, "pushups", "2024-03-21 08:00:00", 25);

    let board = leaderboard_fetch(&state, LeaderboardFilter::for_exercise("pushups"))
        .expect("leaderboard");

    assert_eq!(board.len(), 2);
    assert_eq!(board.entries[0].display_name, "A");
    assert!((board.entries[0].improvement_rate - 2.0).abs() < 1e-9);
    assert_eq!(board.entries[1].display_name, "B");
    assert!((board.entries[1].improvement_rate - 1.0).abs() < 1e-9);

    let rank = leaderboard_user_rank(&state, 1002, Some("pushups".into())).expect("rank");
    assert_eq!(rank, Some(2));
}

#[test]
fn test_board_is_capped_and_sorted() {
    let (state, _dir) = setup_state();
    for offset in 0..14 {
        let user_id = 2000 + offset;
        profile_register(&state, user_id, format!("user {offset}")).expect("profile");
        log(&state, user_id, "squat", "2024-01-01 08:00:00", 5);
        log(&state, user_id, "squat", "2024-01-11 08:00:00", 5 + offset + 1);
    }

    let board = leaderboard_fetch(&state, LeaderboardFilter::default()).expect("leaderboard");
    assert_eq!(board.len(), LEADERBOARD_LIMIT);
    assert!(board
        .entries
        .windows(2)
        .all(|pair| pair[0].improvement_rate >= pair[1].improvement_rate));
    assert_eq!(board.entries[0].user_id, 2013);
    assert_eq!(board.entries[0].rank, 1);
}

#[test]
fn test_malformed_stored_timestamps_are_skipped() {
    let (state, _dir) = setup_state();
    profile_register(&state, 1001, "A".into()).expect("profile");
    profile_register(&state, 1002, "B".into()).expect("profile");
    log(&state, 1001, "dips", "2024-05-01 08:00:00", 4);
    log(&state, 1001, "dips", "2024-05-03 08:00:00", 8);

    // Rows written by an older client that did not validate dates.
    state
        .db()
        .with_connection(|conn| {
            conn.execute(
                "INSERT INTO workouts (user_id, exercise, reps, weight, is_bodyweight, recorded_at) \
                 VALUES (1001, 'dips', 90, 0, 1, '05/04/2024'), \
                        (1002, 'dips', 50, 0, 1, 'garbage')",
                [],
            )?;
            Ok(())
        })
        .expect("legacy rows");

    let board = leaderboard_fetch(&state, LeaderboardFilter::for_exercise("dips"))
        .expect("leaderboard");
    assert_eq!(board.len(), 1);
    assert_eq!(board.entries[0].user_id, 1001);
    assert!((board.entries[0].improvement_rate - 2.0).abs() < 1e-9);
}

#[test]
fn test_snapshot_covers_each_exercise() {
    let (state, _dir) = setup_state();
    profile_register(&state, 1001, "A".into()).expect("profile");
    log(&state, 1001, "pushups", "2024-03-01 08:00:00", 10);
    log(&state, 1001, "pushups", "2024-03-03 08:00:00", 14);
    log(&state, 1001, "squat", "2024-03-01 08:00:00", 5);
    log(&state, 1001, "squat", "2024-03-02 08:00:00", 6);

    let snapshot = leaderboard_snapshot(&state).expect("snapshot");
    assert_eq!(snapshot.overall.len(), 2);
    assert_eq!(snapshot.by_exercise.len(), 2);
    assert_eq!(snapshot.by_exercise[0].exercise, "pushups");
    assert_eq!(snapshot.by_exercise[1].leaderboard.len(), 1);
    assert!(!snapshot.generated_at.is_empty());
}
