use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{
    merge_portions, CreateRecipeRequest, RecipeListQuery, RecipeResponse, RecipeSummary,
    UpdateRecipeRequest,
};
use super::repo::{self, RecipeRow};
use crate::auth::services::AuthUser;
use crate::cards::repo::require_card;
use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", post(create_recipe).get(list_recipes))
        .route(
            "/recipes/:id",
            get(get_recipe).patch(update_recipe).delete(delete_recipe),
        )
}

async fn with_portions(db: &PgPool, recipe: RecipeRow) -> Result<RecipeResponse, ApiError> {
    let portions = repo::portions_of(db, recipe.id).await?;
    Ok(RecipeResponse {
        recipe: recipe.into(),
        portions: portions.into_iter().map(Into::into).collect(),
    })
}

#[instrument(skip(state, payload))]
pub async fn create_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<RecipeResponse>), ApiError> {
    let card = require_card(&state.db, user_id).await?;
    payload.validate()?;

    let portions = merge_portions(&payload.portions);
    let recipe = repo::create(
        &state.db,
        card.id,
        payload.title.trim(),
        payload.description.as_deref().unwrap_or(""),
        payload.image.as_deref().unwrap_or(""),
        &portions,
    )
    .await?;
    info!(card_id = %card.id, recipe_id = %recipe.id, "recipe created");

    let response = with_portions(&state.db, recipe).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<RecipeListQuery>,
) -> Result<Json<Vec<RecipeSummary>>, ApiError> {
    let card = require_card(&state.db, user_id).await?;
    let recipes = repo::list_active(
        &state.db,
        card.id,
        query.search.as_deref(),
        query.limit,
        query.offset,
    )
    .await?;
    Ok(Json(recipes.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(recipe_id): Path<Uuid>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let card = require_card(&state.db, user_id).await?;
    let recipe = repo::find_active(&state.db, recipe_id, card.id)
        .await?
        .ok_or_else(|| ApiError::not_found("recipe not found"))?;
    Ok(Json(with_portions(&state.db, recipe).await?))
}

/// Edits never touch the stored version. The old row is deactivated and a
/// fresh one inserted, so the response carries a new recipe id.
#[instrument(skip(state, payload))]
pub async fn update_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(recipe_id): Path<Uuid>,
    Json(payload): Json<UpdateRecipeRequest>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let card = require_card(&state.db, user_id).await?;
    let old = repo::find_active(&state.db, recipe_id, card.id)
        .await?
        .ok_or_else(|| ApiError::not_found("recipe not found"))?;
    payload.validate()?;

    let portions = payload.portions.as_deref().unwrap_or_default();
    let portions = merge_portions(portions);
    let recipe = repo::revise(
        &state.db,
        &old,
        payload.title.as_deref().map(str::trim).unwrap_or(&old.title),
        payload.description.as_deref().unwrap_or(&old.description),
        payload.image.as_deref().unwrap_or(&old.image),
        &portions,
    )
    .await?;
    info!(
        card_id = %card.id,
        old_recipe_id = %old.id,
        recipe_id = %recipe.id,
        "recipe revised"
    );

    Ok(Json(with_portions(&state.db, recipe).await?))
}

#[instrument(skip(state))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(recipe_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let card = require_card(&state.db, user_id).await?;
    let deleted = repo::delete(&state.db, recipe_id, card.id).await?;
    if deleted == 0 {
        return Err(ApiError::not_found("recipe not found"));
    }
    info!(card_id = %card.id, recipe_id = %recipe_id, "recipe deleted");
    Ok(StatusCode::NO_CONTENT)
}
