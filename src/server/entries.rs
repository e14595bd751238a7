//! Entry endpoints.
//!
//! An entry must reference at least one meal and one routine, but the
//! referenced ids are not existence-checked: the selection lists the client
//! builds from are the effective source of truth, and dangling ids are
//! tolerated at read time instead.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AppState;
use crate::db::RefKind;
use crate::error::ApiError;
use crate::models::{Entry, EntryPatch, ItemSummary};

#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    pub date: Option<NaiveDate>,
    pub meals: Option<Vec<Uuid>>,
    pub routines: Option<Vec<Uuid>>,
    pub author: Option<Uuid>,
}

#[derive(Serialize)]
struct EntryResponse {
    message: &'static str,
    entry: Entry,
}

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

/// Both selection lists for one user, fetched together.
#[derive(Serialize)]
pub struct MealsAndRoutines {
    pub meals: Vec<ItemSummary>,
    pub routines: Vec<ItemSummary>,
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateEntryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(date), Some(meals), Some(routines), Some(author)) =
        (body.date, body.meals, body.routines, body.author)
    else {
        return Err(ApiError::Validation(
            "Date, meals, routines, and author are required".into(),
        ));
    };

    if meals.is_empty() || routines.is_empty() {
        return Err(ApiError::Validation(
            "Please select at least one meal and one routine".into(),
        ));
    }

    let entry = Entry::new(date, meals, routines, author);
    state.entries.create(&entry).await?;

    if let Err(e) = state
        .users
        .push_ref(author, RefKind::Entries, entry.id)
        .await
    {
        tracing::error!("Error updating user entries: {}", e);
    }

    Ok((
        StatusCode::CREATED,
        Json(EntryResponse {
            message: "Entry created successfully",
            entry,
        }),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<EntryPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = state
        .entries
        .update(id, patch)
        .await?
        .ok_or(ApiError::NotFound("Entry not found"))?;

    Ok(Json(EntryResponse {
        message: "Entry updated successfully",
        entry,
    }))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = state
        .entries
        .delete(id)
        .await?
        .ok_or(ApiError::NotFound("Entry not found"))?;

    if let Err(e) = state
        .users
        .pull_ref(entry.author, RefKind::Entries, entry.id)
        .await
    {
        tracing::error!("Error removing entry from user: {}", e);
    }

    Ok(Json(MessageResponse {
        message: "Entry deleted successfully",
    }))
}

/// Populated listing, most recent date first.
pub async fn list(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let entries = state.entries.list_populated_by_author(user_id).await?;
    Ok(Json(entries))
}

/// Read-only fan-out joining a user's meal and routine selection lists,
/// used to populate the entry creation form.
pub async fn fetch_meals_and_routines(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let (meals, routines) = tokio::try_join!(
        state.meals.list_names_by_author(user_id),
        state.routines.list_names_by_author(user_id),
    )?;

    Ok(Json(MealsAndRoutines { meals, routines }))
}
