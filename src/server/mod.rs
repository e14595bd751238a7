//! HTTP surface: application state, router, and the per-entity handlers.

pub mod auth;
pub mod entries;
pub mod meals;
pub mod routines;
pub mod tokens;

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::db::{EntryRepository, MealRepository, RoutineRepository, UserRepository};
use tokens::SessionKeys;

/// State shared across handlers. Repositories hold a cloned pool handle;
/// nothing else is shared, so requests stay independent.
#[derive(Clone)]
pub struct AppState {
    pub users: UserRepository,
    pub meals: MealRepository,
    pub routines: RoutineRepository,
    pub entries: EntryRepository,
    pub keys: Arc<SessionKeys>,
    pub cookie_secure: bool,
}

impl AppState {
    pub fn new(pool: SqlitePool, keys: SessionKeys, cookie_secure: bool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            meals: MealRepository::new(pool.clone()),
            routines: RoutineRepository::new(pool.clone()),
            entries: EntryRepository::new(pool),
            keys: Arc::new(keys),
            cookie_secure,
        }
    }
}

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        // GET takes the author id, PUT/DELETE the entity id; the paths
        // overlap, so they share one route the way the original API did.
        .route("/meals", post(meals::create))
        .route(
            "/meals/{id}",
            get(meals::list).put(meals::update).delete(meals::remove),
        )
        .route("/routines", post(routines::create))
        .route(
            "/routines/{id}",
            get(routines::list)
                .put(routines::update)
                .delete(routines::remove),
        )
        .route("/entries", post(entries::create))
        .route(
            "/entries/{id}",
            get(entries::list)
                .put(entries::update)
                .delete(entries::remove),
        )
        .route(
            "/entries/fetchMealsAndRoutines/{id}",
            get(entries::fetch_meals_and_routines),
        );

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Health check endpoint (no auth required).
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
