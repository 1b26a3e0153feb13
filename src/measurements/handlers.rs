use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{CreateMeasurementRequest, MeasurementResponse};
use super::repo;
use crate::auth::services::AuthUser;
use crate::cards::repo::require_card;
use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/measurements", post(create_measurement).get(list_measurements))
        .route("/measurements/:id", delete(delete_measurement))
}

/// Measurements are append-only; corrections are a delete plus a new entry,
/// so past target calculations stay reproducible.
#[instrument(skip(state, payload))]
pub async fn create_measurement(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateMeasurementRequest>,
) -> Result<(StatusCode, Json<MeasurementResponse>), ApiError> {
    let card = require_card(&state.db, user_id).await?;
    payload.validate()?;

    let measurement = repo::create(&state.db, card.id, &payload).await?;
    info!(card_id = %card.id, measurement_id = %measurement.id, "measurement recorded");
    Ok((StatusCode::CREATED, Json(measurement.into())))
}

#[instrument(skip(state))]
pub async fn list_measurements(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<MeasurementResponse>>, ApiError> {
    let card = require_card(&state.db, user_id).await?;
    let measurements = repo::list(&state.db, card.id).await?;
    Ok(Json(measurements.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn delete_measurement(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(measurement_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let card = require_card(&state.db, user_id).await?;
    let deleted = repo::delete(&state.db, measurement_id, card.id).await?;
    if deleted == 0 {
        return Err(ApiError::not_found("measurement not found"));
    }
    info!(card_id = %card.id, measurement_id = %measurement_id, "measurement deleted");
    Ok(StatusCode::NO_CONTENT)
}
