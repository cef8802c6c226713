use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{Duration, Local, NaiveDateTime, NaiveTime};
use tracing::{debug, error, info};

use crate::db::observation_store::ObservationStore;
use crate::error::AppResult;
use crate::models::leaderboard::{
    ExerciseLeaderboard, Leaderboard, LeaderboardFilter, LeaderboardSnapshot,
};
use crate::services::leaderboard_ranker::LeaderboardRanker;
use crate::services::settings_service::{parse_snapshot_time, SettingsService};
use crate::utils::timestamp::format_timestamp;

const RETRY_WAIT_SECS: u64 = 3600;

/// Cross-user improvement boards plus the daily snapshot job.
pub struct LeaderboardService {
    store: Arc<dyn ObservationStore>,
    settings: Arc<SettingsService>,
    ranker: LeaderboardRanker,
    job_started: AtomicBool,
}

impl LeaderboardService {
    pub fn new(store: Arc<dyn ObservationStore>, settings: Arc<SettingsService>) -> Self {
        Self {
            store,
            settings,
            ranker: LeaderboardRanker::new(),
            job_started: AtomicBool::new(false),
        }
    }

    pub fn leaderboard(&self, filter: &LeaderboardFilter) -> AppResult<Leaderboard> {
        let groups = self.store.fetch_all(filter)?;
        let exercise = filter.normalized_exercise();
        Ok(self
            .ranker
            .rank(&groups, filter.user_id, exercise.as_deref()))
    }

    /// Where `user_id` stands on the board for `exercise` (or overall).
    pub fn rank_of_user(&self, user_id: i64, exercise: Option<&str>) -> AppResult<Option<usize>> {
        let filter = LeaderboardFilter {
            user_id: None,
            exercise: exercise.map(str::to_string),
        };
        Ok(self.leaderboard(&filter)?.rank_of(user_id))
    }

    pub fn snapshot(&self) -> AppResult<LeaderboardSnapshot> {
        let groups = self.store.fetch_all(&LeaderboardFilter::default())?;
        let overall = self.ranker.rank(&groups, None, None);

        let exercises: BTreeSet<&str> = groups.iter().map(|group| group.exercise.as_str()).collect();
        let by_exercise = exercises
            .into_iter()
            .map(|exercise| ExerciseLeaderboard {
                exercise: exercise.to_string(),
                leaderboard: self.ranker.rank(&groups, None, Some(exercise)),
            })
            .collect();

        Ok(LeaderboardSnapshot {
            generated_at: format_timestamp(&Local::now().naive_local()),
            overall,
            by_exercise,
        })
    }

    /// Starts the daily snapshot thread once; later calls are no-ops.
    pub fn ensure_daily_job(self: &Arc<Self>) -> AppResult<()> {
        if self
            .job_started
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            let service = Arc::clone(self);
            std::thread::spawn(move || {
                service.run_daily_job();
            });
            info!(target: "liftcast::leaderboard", "daily leaderboard job started");
        }
        Ok(())
    }

    pub fn job_running(&self) -> bool {
        self.job_started.load(Ordering::SeqCst)
    }

    fn run_daily_job(&self) {
        loop {
            let wait_duration = match self.snapshot_time() {
                Ok(at) => {
                    let now = Local::now().naive_local();
                    (next_run_after(now, at) - now)
                        .to_std()
                        .unwrap_or(std::time::Duration::from_secs(RETRY_WAIT_SECS))
                }
                Err(err) => {
                    error!(
                        target: "liftcast::leaderboard",
                        error = %err,
                        "cannot read snapshot time, retrying later"
                    );
                    std::time::Duration::from_secs(RETRY_WAIT_SECS)
                }
            };

            debug!(
                target: "liftcast::leaderboard",
                "waiting {} seconds until next leaderboard snapshot",
                wait_duration.as_secs()
            );
            std::thread::sleep(wait_duration);

            match self.snapshot() {
                Ok(snapshot) => log_snapshot(&snapshot),
                Err(err) => {
                    error!(
                        target: "liftcast::leaderboard",
                        "daily leaderboard snapshot failed: {}",
                        err
                    );
                }
            }
        }
    }

    fn snapshot_time(&self) -> AppResult<NaiveTime> {
        let settings = self.settings.get()?;
        parse_snapshot_time(&settings.leaderboard_snapshot_time)
    }
}

/// First occurrence of `at` strictly after `now`.
pub fn next_run_after(now: NaiveDateTime, at: NaiveTime) -> NaiveDateTime {
    let today = now.date().and_time(at);
    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}

fn log_snapshot(snapshot: &LeaderboardSnapshot) {
    info!(
        target: "liftcast::leaderboard",
        generated_at = %snapshot.generated_at,
        exercises = snapshot.by_exercise.len(),
        "daily leaderboard snapshot"
    );
    log_board("overall", &snapshot.overall);
    for board in &snapshot.by_exercise {
        log_board(&board.exercise, &board.leaderboard);
    }
}

fn log_board(label: &str, board: &Leaderboard) {
    for entry in &board.entries {
        info!(
            target: "liftcast::leaderboard",
            board = label,
            rank = entry.rank,
            user_id = entry.user_id,
            name = %entry.display_name,
            exercise = %entry.exercise,
            rate = entry.improvement_rate,
            "leaderboard entry"
        );
    }
}
