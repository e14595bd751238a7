use sqlx::SqlitePool;
use uuid::Uuid;

use super::user_repo::parse_timestamp;
use crate::models::{ItemSummary, Meal, MealPatch};

#[derive(Debug, Clone)]
pub struct MealRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct MealRow {
    id: String,
    name: String,
    description: String,
    recipe: String,
    time: i64,
    category: String,
    author: String,
    created_at: String,
}

impl MealRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, meal: &Meal) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO meals (id, name, description, recipe, time, category, author, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(meal.id.to_string())
        .bind(&meal.name)
        .bind(&meal.description)
        .bind(&meal.recipe)
        .bind(meal.time)
        .bind(meal.category.to_string())
        .bind(meal.author.to_string())
        .bind(meal.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Meal>, sqlx::Error> {
        let row: Option<MealRow> = sqlx::query_as("SELECT * FROM meals WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(hydrate_meal))
    }

    /// Applies a partial overwrite and returns the updated meal, or `None`
    /// if the id does not resolve. Create-time validation is not re-run.
    /// One statement, so concurrent patches to different fields both land.
    pub async fn update(&self, id: Uuid, patch: MealPatch) -> Result<Option<Meal>, sqlx::Error> {
        let row: Option<MealRow> = sqlx::query_as(
            r#"
            UPDATE meals SET
                name = COALESCE(?, name),
                description = COALESCE(?, description),
                recipe = COALESCE(?, recipe),
                time = COALESCE(?, time),
                category = COALESCE(?, category)
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(patch.name)
        .bind(patch.description)
        .bind(patch.recipe)
        .bind(patch.time)
        .bind(patch.category.map(|c| c.to_string()))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(hydrate_meal))
    }

    /// Deletes the meal, returning it (for its author) if it existed.
    pub async fn delete(&self, id: Uuid) -> Result<Option<Meal>, sqlx::Error> {
        let row: Option<MealRow> = sqlx::query_as("DELETE FROM meals WHERE id = ? RETURNING *")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(hydrate_meal))
    }

    /// All meals authored by a user, newest first.
    pub async fn list_by_author(&self, author: Uuid) -> Result<Vec<Meal>, sqlx::Error> {
        let rows: Vec<MealRow> =
            sqlx::query_as("SELECT * FROM meals WHERE author = ? ORDER BY created_at DESC")
                .bind(author.to_string())
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(hydrate_meal).collect())
    }

    /// The `{id, name}` projection of a user's meals, for selection lists.
    pub async fn list_names_by_author(&self, author: Uuid) -> Result<Vec<ItemSummary>, sqlx::Error> {
        sqlx::query_as("SELECT id, name FROM meals WHERE author = ? ORDER BY created_at DESC")
            .bind(author.to_string())
            .fetch_all(&self.pool)
            .await
    }
}

fn hydrate_meal(row: MealRow) -> Meal {
    Meal {
        id: Uuid::parse_str(&row.id).unwrap(),
        name: row.name,
        description: row.description,
        recipe: row.recipe,
        time: row.time,
        category: row.category.parse().unwrap(),
        author: Uuid::parse_str(&row.author).unwrap(),
        created_at: parse_timestamp(&row.created_at),
    }
}
