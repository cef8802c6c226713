use std::convert::TryFrom;

use rusqlite::{named_params, Connection, OptionalExtension, Row};

use crate::error::{AppError, AppResult};
use crate::models::leaderboard::LeaderboardFilter;
use crate::models::workout::{GroupEntry, WorkoutGroup, WorkoutRecord};

const SELECT_COLUMNS: &str =
    "id, user_id, exercise, reps, weight, is_bodyweight, recorded_at";

#[derive(Debug, Clone)]
pub struct WorkoutRow {
    pub id: i64,
    pub user_id: i64,
    pub exercise: String,
    pub reps: i64,
    pub weight: f64,
    pub is_bodyweight: i64,
    pub recorded_at: String,
}

impl WorkoutRow {
    pub fn from_record(record: &WorkoutRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            exercise: record.exercise.clone(),
            reps: record.reps,
            weight: record.weight,
            is_bodyweight: i64::from(record.is_bodyweight),
            recorded_at: record.recorded_at.clone(),
        }
    }

    pub fn into_record(self) -> WorkoutRecord {
        WorkoutRecord {
            id: self.id,
            user_id: self.user_id,
            exercise: self.exercise,
            reps: self.reps,
            weight: self.weight,
            is_bodyweight: self.is_bodyweight != 0,
            recorded_at: self.recorded_at,
        }
    }
}

impl TryFrom<&Row<'_>> for WorkoutRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            exercise: row.get("exercise")?,
            reps: row.get("reps")?,
            weight: row.get("weight")?,
            is_bodyweight: row.get("is_bodyweight")?,
            recorded_at: row.get("recorded_at")?,
        })
    }
}

pub struct WorkoutRepository;

impl WorkoutRepository {
    /// Inserts the row and returns the assigned id. `row.id` is ignored.
    pub fn insert(conn: &Connection, row: &WorkoutRow) -> AppResult<i64> {
        conn.execute(
            r#"
                INSERT INTO workouts (
                    user_id,
                    exercise,
                    reps,
                    weight,
                    is_bodyweight,
                    recorded_at
                ) VALUES (
                    :user_id,
                    :exercise,
                    :reps,
                    :weight,
                    :is_bodyweight,
                    :recorded_at
                )
            "#,
            named_params! {
                ":user_id": &row.user_id,
                ":exercise": &row.exercise,
                ":reps": &row.reps,
                ":weight": &row.weight,
                ":is_bodyweight": &row.is_bodyweight,
                ":recorded_at": &row.recorded_at,
            },
        )?;

        Ok(conn.last_insert_rowid())
    }

    pub fn update_performance(conn: &Connection, id: i64, reps: i64, weight: f64) -> AppResult<()> {
        let affected = conn.execute(
            "UPDATE workouts SET reps = :reps, weight = :weight WHERE id = :id",
            named_params! {":id": id, ":reps": reps, ":weight": weight},
        )?;

        if affected == 0 {
            return Err(AppError::not_found());
        }
        Ok(())
    }

    pub fn delete(conn: &Connection, id: i64) -> AppResult<()> {
        let affected = conn.execute("DELETE FROM workouts WHERE id = ?1", [id])?;
        if affected == 0 {
            return Err(AppError::not_found());
        }
        Ok(())
    }

    pub fn find_by_id(conn: &Connection, id: i64) -> AppResult<Option<WorkoutRow>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM workouts WHERE id = ?1");
        let mut stmt = conn.prepare(&sql)?;
        let row = stmt
            .query_row([id], |row| WorkoutRow::try_from(row))
            .optional()?;
        Ok(row)
    }

    /// Sets for one user and exercise, oldest first. Ties keep insertion order.
    pub fn list_series(conn: &Connection, user_id: i64, exercise: &str) -> AppResult<Vec<WorkoutRow>> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM workouts \
             WHERE user_id = :user_id AND exercise = :exercise \
             ORDER BY recorded_at ASC, id ASC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(
                named_params! {":user_id": user_id, ":exercise": exercise},
                |row| WorkoutRow::try_from(row),
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Full log of a user, newest first.
    pub fn list_history(conn: &Connection, user_id: i64) -> AppResult<Vec<WorkoutRow>> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM workouts WHERE user_id = ?1 \
             ORDER BY recorded_at DESC, id DESC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([user_id], |row| WorkoutRow::try_from(row))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn latest_for_exercise(
        conn: &Connection,
        user_id: i64,
        exercise: &str,
    ) -> AppResult<Option<WorkoutRow>> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM workouts \
             WHERE user_id = :user_id AND exercise = :exercise \
             ORDER BY recorded_at DESC, id DESC LIMIT 1"
        );
        let mut stmt = conn.prepare(&sql)?;
        let row = stmt
            .query_row(
                named_params! {":user_id": user_id, ":exercise": exercise},
                |row| WorkoutRow::try_from(row),
            )
            .optional()?;
        Ok(row)
    }

    pub fn list_exercises(conn: &Connection, user_id: i64) -> AppResult<Vec<String>> {
        let mut stmt = conn.prepare(
            "SELECT DISTINCT exercise FROM workouts WHERE user_id = ?1 ORDER BY exercise ASC",
        )?;
        let rows = stmt
            .query_map([user_id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Every set joined with its owner's display name, grouped by
    /// `(user_id, exercise)`. Timestamps are returned untouched.
    pub fn list_groups(conn: &Connection, filter: &LeaderboardFilter) -> AppResult<Vec<WorkoutGroup>> {
        let exercise = filter.normalized_exercise();
        let mut stmt = conn.prepare(
            r#"
                SELECT
                    w.user_id,
                    u.display_name,
                    w.exercise,
                    w.recorded_at,
                    w.reps
                FROM workouts w
                JOIN users u ON u.user_id = w.user_id
                WHERE (:user_id IS NULL OR w.user_id = :user_id)
                  AND (:exercise IS NULL OR w.exercise = :exercise)
                ORDER BY w.user_id ASC, w.exercise ASC, w.recorded_at ASC, w.id ASC
            "#,
        )?;

        let mut rows = stmt.query(named_params! {
            ":user_id": filter.user_id,
            ":exercise": exercise,
        })?;

        let mut groups: Vec<WorkoutGroup> = Vec::new();
        while let Some(row) = rows.next()? {
            let user_id: i64 = row.get(0)?;
            let display_name: String = row.get(1)?;
            let exercise: String = row.get(2)?;
            let entry = GroupEntry {
                recorded_at: row.get(3)?,
                reps: row.get(4)?,
            };

            match groups.last_mut() {
                Some(group) if group.user_id == user_id && group.exercise == exercise => {
                    group.entries.push(entry);
                }
                _ => groups.push(WorkoutGroup {
                    user_id,
                    display_name,
                    exercise,
                    entries: vec![entry],
                }),
            }
        }

        Ok(groups)
    }
}
