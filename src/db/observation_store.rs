use std::collections::HashMap;
use std::sync::RwLock;

use crate::db::repositories::workout_repository::WorkoutRepository;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::leaderboard::LeaderboardFilter;
use crate::models::observation::Observation;
use crate::models::workout::{GroupEntry, WorkoutGroup, WorkoutRecord};
use crate::utils::timestamp::{format_timestamp, parse_timestamp};

/// Read access to logged sets. The forecasting and ranking services only ever
/// see history through this trait and never open storage themselves.
pub trait ObservationStore: Send + Sync {
    /// Sets of one user for one exercise, oldest first. A single unparseable
    /// timestamp fails the whole fetch.
    fn fetch_series(&self, user_id: i64, exercise: &str) -> AppResult<Vec<Observation>>;

    /// Raw sets grouped by `(user_id, exercise)`, each group oldest first.
    fn fetch_all(&self, filter: &LeaderboardFilter) -> AppResult<Vec<WorkoutGroup>>;
}

pub fn normalize_exercise(exercise: &str) -> String {
    exercise.trim().to_lowercase()
}

#[derive(Clone, Debug)]
pub struct SqliteObservationStore {
    db: DbPool,
}

impl SqliteObservationStore {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }
}

impl ObservationStore for SqliteObservationStore {
    fn fetch_series(&self, user_id: i64, exercise: &str) -> AppResult<Vec<Observation>> {
        let exercise = normalize_exercise(exercise);
        let rows = self
            .db
            .with_connection(|conn| WorkoutRepository::list_series(conn, user_id, &exercise))?;

        rows.into_iter()
            .map(|row| Observation::try_from(&row.into_record()))
            .collect()
    }

    fn fetch_all(&self, filter: &LeaderboardFilter) -> AppResult<Vec<WorkoutGroup>> {
        self.db
            .with_connection(|conn| WorkoutRepository::list_groups(conn, filter))
    }
}

/// Store backed by plain vectors, for hosts that keep history elsewhere.
#[derive(Debug, Default)]
pub struct MemoryObservationStore {
    inner: RwLock<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    names: HashMap<i64, String>,
    records: Vec<WorkoutRecord>,
}

impl MemoryObservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_display_name(&self, user_id: i64, display_name: impl Into<String>) -> AppResult<()> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| AppError::other("observation store lock poisoned"))?;
        guard.names.insert(user_id, display_name.into());
        Ok(())
    }

    /// Parseable timestamps are stored in the canonical storage format so
    /// string order matches time order. Anything else is kept as given.
    pub fn push(
        &self,
        user_id: i64,
        exercise: &str,
        recorded_at: impl Into<String>,
        reps: i64,
        weight: f64,
    ) -> AppResult<()> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| AppError::other("observation store lock poisoned"))?;
        let recorded_at: String = recorded_at.into();
        let recorded_at = parse_timestamp(&recorded_at)
            .map(|value| format_timestamp(&value))
            .unwrap_or(recorded_at);
        let id = guard.records.len() as i64 + 1;
        guard.records.push(WorkoutRecord {
            id,
            user_id,
            exercise: normalize_exercise(exercise),
            reps,
            weight,
            is_bodyweight: weight == 0.0,
            recorded_at,
        });
        Ok(())
    }
}

impl ObservationStore for MemoryObservationStore {
    fn fetch_series(&self, user_id: i64, exercise: &str) -> AppResult<Vec<Observation>> {
        let exercise = normalize_exercise(exercise);
        let guard = self
            .inner
            .read()
            .map_err(|_| AppError::other("observation store lock poisoned"))?;

        let mut matching: Vec<&WorkoutRecord> = guard
            .records
            .iter()
            .filter(|record| record.user_id == user_id && record.exercise == exercise)
            .collect();
        matching.sort_by(|a, b| a.recorded_at.cmp(&b.recorded_at));

        matching.into_iter().map(Observation::try_from).collect()
    }

    fn fetch_all(&self, filter: &LeaderboardFilter) -> AppResult<Vec<WorkoutGroup>> {
        let exercise = filter.normalized_exercise();
        let guard = self
            .inner
            .read()
            .map_err(|_| AppError::other("observation store lock poisoned"))?;

        let mut matching: Vec<&WorkoutRecord> = guard
            .records
            .iter()
            .filter(|record| guard.names.contains_key(&record.user_id))
            .filter(|record| filter.user_id.map_or(true, |id| record.user_id == id))
            .filter(|record| exercise.as_deref().map_or(true, |name| record.exercise == name))
            .collect();
        matching.sort_by(|a, b| {
            (a.user_id, &a.exercise, &a.recorded_at).cmp(&(b.user_id, &b.exercise, &b.recorded_at))
        });

        let mut groups: Vec<WorkoutGroup> = Vec::new();
        for record in matching {
            let entry = GroupEntry {
                recorded_at: record.recorded_at.clone(),
                reps: record.reps,
            };
            match groups.last_mut() {
                Some(group) if group.user_id == record.user_id && group.exercise == record.exercise => {
                    group.entries.push(entry);
                }
                _ => groups.push(WorkoutGroup {
                    user_id: record.user_id,
                    display_name: guard.names.get(&record.user_id).cloned().unwrap_or_default(),
                    exercise: record.exercise.clone(),
                    entries: vec![entry],
                }),
            }
        }

        Ok(groups)
    }
}
