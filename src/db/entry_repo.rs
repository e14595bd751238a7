use sqlx::SqlitePool;
use uuid::Uuid;

use super::user_repo::{ids_from_json, ids_to_json, parse_timestamp};
use crate::models::{Entry, EntryPatch, ItemSummary, PopulatedEntry};

#[derive(Debug, Clone)]
pub struct EntryRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct EntryRow {
    id: String,
    date: String,
    meals: String,
    routines: String,
    author: String,
    created_at: String,
}

impl EntryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, entry: &Entry) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO entries (id, date, meals, routines, author, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.id.to_string())
        .bind(entry.date.to_string())
        .bind(ids_to_json(&entry.meals))
        .bind(ids_to_json(&entry.routines))
        .bind(entry.author.to_string())
        .bind(entry.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Entry>, sqlx::Error> {
        let row: Option<EntryRow> = sqlx::query_as("SELECT * FROM entries WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(hydrate_entry))
    }

    /// Partial overwrite; returns `None` if the id does not resolve. The
    /// non-empty reference checks from creation are not re-run.
    /// One statement, so concurrent patches to different fields both land.
    pub async fn update(&self, id: Uuid, patch: EntryPatch) -> Result<Option<Entry>, sqlx::Error> {
        let row: Option<EntryRow> = sqlx::query_as(
            r#"
            UPDATE entries SET
                date = COALESCE(?, date),
                meals = COALESCE(?, meals),
                routines = COALESCE(?, routines)
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(patch.date.map(|d| d.to_string()))
        .bind(patch.meals.as_deref().map(ids_to_json))
        .bind(patch.routines.as_deref().map(ids_to_json))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(hydrate_entry))
    }

    /// Deletes the entry, returning it (for its author) if it existed.
    pub async fn delete(&self, id: Uuid) -> Result<Option<Entry>, sqlx::Error> {
        let row: Option<EntryRow> = sqlx::query_as("DELETE FROM entries WHERE id = ? RETURNING *")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(hydrate_entry))
    }

    /// A user's entries, most recent date first, with meal and routine ids
    /// resolved to `{id, name}`. Dangling references are dropped, never an
    /// error, since meal/routine deletes do not cascade here.
    pub async fn list_populated_by_author(
        &self,
        author: Uuid,
    ) -> Result<Vec<PopulatedEntry>, sqlx::Error> {
        let rows: Vec<EntryRow> = sqlx::query_as(
            "SELECT * FROM entries WHERE author = ? ORDER BY date DESC, created_at DESC",
        )
        .bind(author.to_string())
        .fetch_all(&self.pool)
        .await?;

        let mut populated = Vec::with_capacity(rows.len());
        for row in rows {
            let entry = hydrate_entry(row);
            let meals = self.resolve_names("meals", &entry.meals).await?;
            let routines = self.resolve_names("routines", &entry.routines).await?;
            populated.push(PopulatedEntry {
                id: entry.id,
                date: entry.date,
                meals,
                routines,
                author: entry.author,
                created_at: entry.created_at,
            });
        }
        Ok(populated)
    }

    /// Fetches the `{id, name}` rows for the given ids, preserving the
    /// order of `ids`. Unknown ids are silently skipped.
    async fn resolve_names(
        &self,
        table: &str,
        ids: &[Uuid],
    ) -> Result<Vec<ItemSummary>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!("SELECT id, name FROM {table} WHERE id IN ({placeholders})");

        let mut query = sqlx::query_as::<_, ItemSummary>(&sql);
        for id in ids {
            query = query.bind(id.to_string());
        }
        let mut found = query.fetch_all(&self.pool).await?;

        let mut ordered = Vec::with_capacity(found.len());
        for id in ids {
            let id = id.to_string();
            if let Some(pos) = found.iter().position(|item| item.id == id) {
                ordered.push(found.swap_remove(pos));
            }
        }
        Ok(ordered)
    }
}

fn hydrate_entry(row: EntryRow) -> Entry {
    Entry {
        id: Uuid::parse_str(&row.id).unwrap(),
        date: row.date.parse().unwrap(),
        meals: ids_from_json(&row.meals),
        routines: ids_from_json(&row.routines),
        author: Uuid::parse_str(&row.author).unwrap(),
        created_at: parse_timestamp(&row.created_at),
    }
}
