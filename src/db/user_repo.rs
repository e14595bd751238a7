//! User persistence, including the denormalized backreference arrays.
//!
//! The `routines`/`meals`/`entries` columns hold JSON arrays of ids that
//! mirror which documents the user authored. [`UserRepository::push_ref`]
//! and [`UserRepository::pull_ref`] are the only writers; each is a single
//! statement so the array update is atomic on its own, but it is never part
//! of a transaction with the entity write it mirrors.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::User;

/// Which backreference array on the user row to touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Routines,
    Meals,
    Entries,
}

impl RefKind {
    /// Returns the users-table column for this kind.
    pub fn column(&self) -> &'static str {
        match self {
            RefKind::Routines => "routines",
            RefKind::Meals => "meals",
            RefKind::Entries => "entries",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    username: String,
    email: String,
    password_hash: String,
    profile_picture: String,
    routines: String,
    meals: String,
    entries: String,
    created_at: String,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user: &User) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, profile_picture, routines, meals, entries, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.profile_picture)
        .bind(ids_to_json(&user.routines))
        .bind(ids_to_json(&user.meals))
        .bind(ids_to_json(&user.entries))
        .bind(user.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(hydrate_user))
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error> {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(hydrate_user))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(hydrate_user))
    }

    /// Appends `id` to the user's backreference array of the given kind.
    ///
    /// A no-op if the user row does not exist, matching the lenient
    /// update-by-id semantics of the original store.
    pub async fn push_ref(&self, user_id: Uuid, kind: RefKind, id: Uuid) -> Result<(), sqlx::Error> {
        let col = kind.column();
        let sql = format!("UPDATE users SET {col} = json_insert({col}, '$[#]', ?) WHERE id = ?");
        sqlx::query(&sql)
            .bind(id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Removes `id` from the user's backreference array of the given kind.
    pub async fn pull_ref(&self, user_id: Uuid, kind: RefKind, id: Uuid) -> Result<(), sqlx::Error> {
        let col = kind.column();
        let sql = format!(
            "UPDATE users SET {col} = \
             (SELECT json_group_array(value) FROM json_each({col}) WHERE value <> ?) \
             WHERE id = ?"
        );
        sqlx::query(&sql)
            .bind(id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

pub(crate) fn ids_to_json(ids: &[Uuid]) -> String {
    serde_json::to_string(&ids.iter().map(Uuid::to_string).collect::<Vec<_>>())
        .unwrap_or_else(|_| "[]".to_string())
}

pub(crate) fn ids_from_json(json: &str) -> Vec<Uuid> {
    serde_json::from_str::<Vec<String>>(json)
        .unwrap_or_default()
        .iter()
        .filter_map(|s| Uuid::parse_str(s).ok())
        .collect()
}

pub(crate) fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn hydrate_user(row: UserRow) -> User {
    User {
        id: Uuid::parse_str(&row.id).unwrap(),
        username: row.username,
        email: row.email,
        password_hash: row.password_hash,
        profile_picture: row.profile_picture,
        routines: ids_from_json(&row.routines),
        meals: ids_from_json(&row.meals),
        entries: ids_from_json(&row.entries),
        created_at: parse_timestamp(&row.created_at),
    }
}
