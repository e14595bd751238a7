use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A registered user.
///
/// The password hash is never serialized, so the login response and any
/// future user-facing endpoint strip it automatically. The three
/// backreference arrays mirror which meals, routines, and entries this user
/// authored; they are mutated only by the entity services.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub profile_picture: String,
    pub routines: Vec<Uuid>,
    pub meals: Vec<Uuid>,
    pub entries: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Builds a new user with a freshly generated id and empty
    /// backreference arrays. `password_hash` must already be hashed.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            profile_picture: String::new(),
            routines: Vec::new(),
            meals: Vec::new(),
            entries: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_profile_picture(mut self, url: impl Into<String>) -> Self {
        self.profile_picture = url.into();
        self
    }
}
