use liftcast_lib::commands::workout::{profile_register, workouts_history};
use liftcast_lib::utils::logger::init_logging;
use liftcast_lib::{bootstrap, DATABASE_FILE};
use tempfile::tempdir;

// The embedding application owns the global subscriber in these tests.
fn install_host_subscriber() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn test_init_logging_defers_to_host_subscriber() {
    install_host_subscriber();
    let dir = tempdir().expect("temp dir");
    let log_dir = dir.path().join("logs");

    init_logging(&log_dir).expect("first init");
    init_logging(&log_dir).expect("second init");
    assert!(log_dir.is_dir());
}

#[test]
fn test_bootstrap_twice_into_same_directory() {
    install_host_subscriber();
    let dir = tempdir().expect("temp dir");

    let first = bootstrap(dir.path()).expect("first bootstrap");
    assert!(dir.path().join(DATABASE_FILE).exists());
    assert!(first.leaderboards().job_running());
    profile_register(&first, 1001, "Avery".into()).expect("profile");

    let second = bootstrap(dir.path()).expect("second bootstrap");
    assert!(second.leaderboards().job_running());
    assert_eq!(second.workouts().profile(1001).expect("profile").display_name, "Avery");
    assert!(workouts_history(&second, 1001).expect("history").is_empty());
}
