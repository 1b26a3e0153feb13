use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::dto::{CardResponse, CreateCardRequest, UpdateCardRequest};
use super::repo::{self, CardRow, FemaleTypeRow};
use crate::auth::services::AuthUser;
use crate::error::ApiError;
use crate::products::dto::ProductResponse;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/personcard", post(create_card).get(get_card))
        .route("/personcard/:id", delete(delete_card).patch(update_card))
        .route("/femaletypes", get(list_female_types))
}

/// Loads the card's link lists and assembles the full response shape.
async fn enriched(db: &PgPool, card: CardRow) -> Result<CardResponse, ApiError> {
    let female_types = repo::female_types_of(db, card.id).await?;
    let excluded_products = repo::excluded_products_of(db, card.id).await?;
    let excluded_categories = repo::excluded_categories_of(db, card.id).await?;
    Ok(CardResponse {
        id: card.id,
        height: card.height,
        age: card.age,
        gender: card.gender,
        target: card.target,
        activity: card.activity,
        image: card.image,
        female_types,
        excluded_products: excluded_products.iter().map(ProductResponse::from).collect(),
        excluded_categories,
    })
}

#[instrument(skip(state, payload))]
pub async fn create_card(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateCardRequest>,
) -> Result<(StatusCode, Json<CardResponse>), ApiError> {
    payload.validate()?;

    let card = repo::create(&state.db, user_id, &payload).await?;
    info!(user_id = %user_id, card_id = %card.id, "person card created");

    let response = enriched(&state.db, card).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(state))]
pub async fn get_card(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<CardResponse>, ApiError> {
    let card = repo::require_card(&state.db, user_id).await?;
    Ok(Json(enriched(&state.db, card).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_card(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(card_id): Path<Uuid>,
    Json(payload): Json<UpdateCardRequest>,
) -> Result<Json<CardResponse>, ApiError> {
    payload.validate()?;

    let card = repo::update(&state.db, card_id, user_id, &payload)
        .await?
        .ok_or_else(|| {
            warn!(user_id = %user_id, card_id = %card_id, "card update missed");
            ApiError::not_found("person card not found")
        })?;

    info!(user_id = %user_id, card_id = %card.id, "person card updated");
    Ok(Json(enriched(&state.db, card).await?))
}

#[instrument(skip(state))]
pub async fn delete_card(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(card_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = repo::delete(&state.db, card_id, user_id).await?;
    if deleted == 0 {
        return Err(ApiError::not_found("person card not found"));
    }
    info!(user_id = %user_id, card_id = %card_id, "person card deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn list_female_types(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
) -> Result<Json<Vec<FemaleTypeRow>>, ApiError> {
    Ok(Json(repo::list_female_types(&state.db).await?))
}
