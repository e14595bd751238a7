//! Routine endpoints. Same create/backreference discipline as meals.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AppState;
use crate::db::RefKind;
use crate::error::ApiError;
use crate::models::{Routine, RoutinePatch};

#[derive(Debug, Deserialize)]
pub struct CreateRoutineRequest {
    pub name: Option<String>,
    pub link: Option<String>,
    pub workout_type: Option<String>,
    pub body_part: Option<String>,
    pub author: Option<Uuid>,
}

#[derive(Serialize)]
struct RoutineResponse {
    message: &'static str,
    routine: Routine,
}

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateRoutineRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(name), Some(workout_type), Some(body_part), Some(author)) =
        (body.name, body.workout_type, body.body_part, body.author)
    else {
        return Err(ApiError::Validation(
            "Name, workout type, body part, and author are required".into(),
        ));
    };

    if workout_type == "none" || body_part == "none" {
        return Err(ApiError::Validation(
            "Please select valid workout type and body part".into(),
        ));
    }
    let workout_type = workout_type.parse().map_err(|_| {
        ApiError::Validation("Please select valid workout type and body part".into())
    })?;
    let body_part = body_part.parse().map_err(|_| {
        ApiError::Validation("Please select valid workout type and body part".into())
    })?;

    let routine = Routine::new(
        name.trim().to_string(),
        body.link.unwrap_or_default(),
        workout_type,
        body_part,
        author,
    );
    state.routines.create(&routine).await?;

    if let Err(e) = state
        .users
        .push_ref(author, RefKind::Routines, routine.id)
        .await
    {
        tracing::error!("Error updating user routines: {}", e);
    }

    Ok((
        StatusCode::CREATED,
        Json(RoutineResponse {
            message: "Routine created successfully",
            routine,
        }),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<RoutinePatch>,
) -> Result<impl IntoResponse, ApiError> {
    let routine = state
        .routines
        .update(id, patch)
        .await?
        .ok_or(ApiError::NotFound("Routine not found"))?;

    Ok(Json(RoutineResponse {
        message: "Routine updated successfully",
        routine,
    }))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let routine = state
        .routines
        .delete(id)
        .await?
        .ok_or(ApiError::NotFound("Routine not found"))?;

    if let Err(e) = state
        .users
        .pull_ref(routine.author, RefKind::Routines, routine.id)
        .await
    {
        tracing::error!("Error removing routine from user: {}", e);
    }

    Ok(Json(MessageResponse {
        message: "Routine deleted successfully",
    }))
}

pub async fn list(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let routines = state.routines.list_by_author(user_id).await?;
    Ok(Json(routines))
}
