use std::convert::TryFrom;

use rusqlite::{named_params, Connection, OptionalExtension, Row};

use crate::error::AppResult;
use crate::models::workout::UserProfile;

impl TryFrom<&Row<'_>> for UserProfile {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: row.get("user_id")?,
            display_name: row.get("display_name")?,
        })
    }
}

pub struct UserRepository;

impl UserRepository {
    pub fn upsert(conn: &Connection, profile: &UserProfile) -> AppResult<()> {
        conn.execute(
            r#"
                INSERT INTO users (user_id, display_name)
                VALUES (:user_id, :display_name)
                ON CONFLICT(user_id) DO UPDATE SET
                    display_name = excluded.display_name
            "#,
            named_params! {
                ":user_id": profile.user_id,
                ":display_name": &profile.display_name,
            },
        )?;

        Ok(())
    }

    pub fn find(conn: &Connection, user_id: i64) -> AppResult<Option<UserProfile>> {
        let mut stmt =
            conn.prepare("SELECT user_id, display_name FROM users WHERE user_id = ?1")?;
        let profile = stmt
            .query_row([user_id], |row| UserProfile::try_from(row))
            .optional()?;
        Ok(profile)
    }

    pub fn exists(conn: &Connection, user_id: i64) -> AppResult<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE user_id = ?1",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}
