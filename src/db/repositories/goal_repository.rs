use std::convert::TryFrom;

use rusqlite::{named_params, Connection, OptionalExtension, Row};

use crate::error::AppResult;
use crate::models::goal::GoalRecord;

impl TryFrom<&Row<'_>> for GoalRecord {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            exercise: row.get("exercise")?,
            target_reps: row.get("target_reps")?,
            target_weight: row.get("target_weight")?,
            deadline: row.get("deadline")?,
            created_at: row.get("created_at")?,
        })
    }
}

pub struct GoalRepository;

impl GoalRepository {
    pub fn insert(conn: &Connection, goal: &GoalRecord) -> AppResult<()> {
        conn.execute(
            r#"
                INSERT INTO goals (
                    id,
                    user_id,
                    exercise,
                    target_reps,
                    target_weight,
                    deadline,
                    created_at
                ) VALUES (
                    :id,
                    :user_id,
                    :exercise,
                    :target_reps,
                    :target_weight,
                    :deadline,
                    :created_at
                )
            "#,
            named_params! {
                ":id": &goal.id,
                ":user_id": goal.user_id,
                ":exercise": &goal.exercise,
                ":target_reps": goal.target_reps,
                ":target_weight": goal.target_weight,
                ":deadline": &goal.deadline,
                ":created_at": &goal.created_at,
            },
        )?;

        Ok(())
    }

    /// Most recently set goal for the exercise.
    pub fn latest_for_exercise(
        conn: &Connection,
        user_id: i64,
        exercise: &str,
    ) -> AppResult<Option<GoalRecord>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT id, user_id, exercise, target_reps, target_weight, deadline, created_at
                FROM goals
                WHERE user_id = :user_id AND exercise = :exercise
                ORDER BY created_at DESC, rowid DESC
                LIMIT 1
            "#,
        )?;

        let goal = stmt
            .query_row(
                named_params! {":user_id": user_id, ":exercise": exercise},
                |row| GoalRecord::try_from(row),
            )
            .optional()?;
        Ok(goal)
    }

    pub fn list_for_user(conn: &Connection, user_id: i64) -> AppResult<Vec<GoalRecord>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT id, user_id, exercise, target_reps, target_weight, deadline, created_at
                FROM goals
                WHERE user_id = ?1
                ORDER BY created_at DESC, rowid DESC
            "#,
        )?;

        let goals = stmt
            .query_map([user_id], |row| GoalRecord::try_from(row))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(goals)
    }
}
