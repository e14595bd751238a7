//! Meal endpoints.
//!
//! Create persists the meal first and then appends its id to the author's
//! `meals` backreference array as a second, best-effort write: if that
//! write fails the creation is still reported as successful and the
//! failure is only logged. Delete mirrors this with a best-effort removal.

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
use crate::models::{Meal, MealPatch};

#[derive(Debug, Deserialize)]
pub struct CreateMealRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub recipe: Option<String>,
    pub time: Option<i64>,
    pub category: Option<String>,
    pub author: Option<Uuid>,
}

#[derive(Serialize)]
struct MealResponse {
    message: &'static str,
    meal: Meal,
}

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateMealRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(name), Some(description), Some(time), Some(category), Some(author)) = (
        body.name,
        body.description,
        body.time,
        body.category,
        body.author,
    ) else {
        return Err(ApiError::Validation(
            "Name, description, time, category, and author are required".into(),
        ));
    };

    if category == "none" {
        return Err(ApiError::Validation("Please select a valid category".into()));
    }
    let category = category
        .parse()
        .map_err(|_| ApiError::Validation("Please select a valid category".into()))?;

    if time <= 0 {
        return Err(ApiError::Validation(
            "Time must be a positive number".into(),
        ));
    }

    let meal = Meal::new(
        name.trim().to_string(),
        description.trim().to_string(),
        body.recipe.unwrap_or_default(),
        time,
        category,
        author,
    );
    state.meals.create(&meal).await?;

    // Secondary write: failure is logged and swallowed, never rolled back.
    if let Err(e) = state.users.push_ref(author, RefKind::Meals, meal.id).await {
        tracing::error!("Error updating user meals: {}", e);
    }

    Ok((
        StatusCode::CREATED,
        Json(MealResponse {
            message: "Meal created successfully",
            meal,
        }),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<MealPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let meal = state
        .meals
        .update(id, patch)
        .await?
        .ok_or(ApiError::NotFound("Meal not found"))?;

    Ok(Json(MealResponse {
        message: "Meal updated successfully",
        meal,
    }))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let meal = state
        .meals
        .delete(id)
        .await?
        .ok_or(ApiError::NotFound("Meal not found"))?;

    if let Err(e) = state
        .users
        .pull_ref(meal.author, RefKind::Meals, meal.id)
        .await
    {
        tracing::error!("Error removing meal from user: {}", e);
    }

    Ok(Json(MessageResponse {
        message: "Meal deleted successfully",
    }))
}

pub async fn list(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let meals = state.meals.list_by_author(user_id).await?;
    Ok(Json(meals))
}
