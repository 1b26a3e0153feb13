use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{MealListQuery, MealPayload, MealRequest, MealResponse};
use super::repo;
use crate::auth::services::AuthUser;
use crate::cards::repo::require_card;
use crate::error::ApiError;
use crate::params::parse_ymd;
use crate::recipes::repo::find_active;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/meals", post(create_meal).get(list_meals))
        .route(
            "/meals/:id",
            get(get_meal).patch(update_meal).delete(delete_meal),
        )
}

/// Recipes are the only payload kind referencing a shared row, so they are
/// the only one needing an ownership check up front.
async fn check_recipe(
    state: &AppState,
    card_id: Uuid,
    payload: &MealPayload,
) -> Result<(), ApiError> {
    if let MealPayload::Recipe(recipe_id) = payload {
        find_active(&state.db, *recipe_id, card_id)
            .await?
            .ok_or_else(|| ApiError::not_found("recipe not found"))?;
    }
    Ok(())
}

#[instrument(skip(state, payload))]
pub async fn create_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<MealRequest>,
) -> Result<(StatusCode, Json<MealResponse>), ApiError> {
    let card = require_card(&state.db, user_id).await?;
    let payload = payload.into_payload()?;
    check_recipe(&state, card.id, &payload).await?;

    let meal_id = repo::create(&state.db, card.id, &payload).await?;
    info!(card_id = %card.id, meal_id = %meal_id, "meal logged");

    let detail = repo::find_detail(&state.db, meal_id, card.id)
        .await?
        .ok_or_else(|| ApiError::not_found("meal not found"))?;
    Ok((StatusCode::CREATED, Json(detail.into())))
}

#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<MealListQuery>,
) -> Result<Json<Vec<MealResponse>>, ApiError> {
    let card = require_card(&state.db, user_id).await?;
    let day = query.date.as_deref().map(parse_ymd).transpose()?;
    let meals = repo::list(&state.db, card.id, day, query.limit, query.offset).await?;
    Ok(Json(meals.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn get_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(meal_id): Path<Uuid>,
) -> Result<Json<MealResponse>, ApiError> {
    let card = require_card(&state.db, user_id).await?;
    let detail = repo::find_detail(&state.db, meal_id, card.id)
        .await?
        .ok_or_else(|| ApiError::not_found("meal not found"))?;
    Ok(Json(detail.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(meal_id): Path<Uuid>,
    Json(payload): Json<MealRequest>,
) -> Result<Json<MealResponse>, ApiError> {
    let card = require_card(&state.db, user_id).await?;
    let meal = repo::find(&state.db, meal_id, card.id)
        .await?
        .ok_or_else(|| ApiError::not_found("meal not found"))?;

    let payload = payload.into_payload()?;
    check_recipe(&state, card.id, &payload).await?;

    repo::update(&state.db, &meal, &payload).await?;
    info!(card_id = %card.id, meal_id = %meal.id, "meal payload replaced");

    let detail = repo::find_detail(&state.db, meal_id, card.id)
        .await?
        .ok_or_else(|| ApiError::not_found("meal not found"))?;
    Ok(Json(detail.into()))
}

#[instrument(skip(state))]
pub async fn delete_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(meal_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let card = require_card(&state.db, user_id).await?;
    let meal = repo::find(&state.db, meal_id, card.id)
        .await?
        .ok_or_else(|| ApiError::not_found("meal not found"))?;

    repo::delete(&state.db, &meal).await?;
    info!(card_id = %card.id, meal_id = %meal_id, "meal deleted");
    Ok(StatusCode::NO_CONTENT)
}
