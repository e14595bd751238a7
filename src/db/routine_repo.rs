use sqlx::SqlitePool;
use uuid::Uuid;

use super::user_repo::parse_timestamp;
use crate::models::{ItemSummary, Routine, RoutinePatch};

#[derive(Debug, Clone)]
pub struct RoutineRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct RoutineRow {
    id: String,
    name: String,
    link: String,
    workout_type: String,
    body_part: String,
    author: String,
    created_at: String,
}

impl RoutineRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, routine: &Routine) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO routines (id, name, link, workout_type, body_part, author, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(routine.id.to_string())
        .bind(&routine.name)
        .bind(&routine.link)
        .bind(routine.workout_type.to_string())
        .bind(routine.body_part.to_string())
        .bind(routine.author.to_string())
        .bind(routine.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Routine>, sqlx::Error> {
        let row: Option<RoutineRow> = sqlx::query_as("SELECT * FROM routines WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(hydrate_routine))
    }

    /// Partial overwrite; returns `None` if the id does not resolve.
    /// One statement, so concurrent patches to different fields both land.
    pub async fn update(
        &self,
        id: Uuid,
        patch: RoutinePatch,
    ) -> Result<Option<Routine>, sqlx::Error> {
        let row: Option<RoutineRow> = sqlx::query_as(
            r#"
            UPDATE routines SET
                name = COALESCE(?, name),
                link = COALESCE(?, link),
                workout_type = COALESCE(?, workout_type),
                body_part = COALESCE(?, body_part)
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(patch.name)
        .bind(patch.link)
        .bind(patch.workout_type.map(|w| w.to_string()))
        .bind(patch.body_part.map(|b| b.to_string()))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(hydrate_routine))
    }

    /// Deletes the routine, returning it (for its author) if it existed.
    pub async fn delete(&self, id: Uuid) -> Result<Option<Routine>, sqlx::Error> {
        let row: Option<RoutineRow> =
            sqlx::query_as("DELETE FROM routines WHERE id = ? RETURNING *")
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(hydrate_routine))
    }

    /// All routines authored by a user, newest first.
    pub async fn list_by_author(&self, author: Uuid) -> Result<Vec<Routine>, sqlx::Error> {
        let rows: Vec<RoutineRow> =
            sqlx::query_as("SELECT * FROM routines WHERE author = ? ORDER BY created_at DESC")
                .bind(author.to_string())
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(hydrate_routine).collect())
    }

    /// The `{id, name}` projection of a user's routines.
    pub async fn list_names_by_author(
        &self,
        author: Uuid,
    ) -> Result<Vec<ItemSummary>, sqlx::Error> {
        sqlx::query_as("SELECT id, name FROM routines WHERE author = ? ORDER BY created_at DESC")
            .bind(author.to_string())
            .fetch_all(&self.pool)
            .await
    }
}

fn hydrate_routine(row: RoutineRow) -> Routine {
    Routine {
        id: Uuid::parse_str(&row.id).unwrap(),
        name: row.name,
        link: row.link,
        workout_type: row.workout_type.parse().unwrap(),
        body_part: row.body_part.parse().unwrap(),
        author: Uuid::parse_str(&row.author).unwrap(),
        created_at: parse_timestamp(&row.created_at),
    }
}
