use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::{debug, instrument};

use super::body::{bmi, somatotype};
use super::dto::{CalculateQuery, RecommendationResponse, StandardResponse};
use super::intake::sum_intake;
use super::recommend;
use super::repo;
use super::targets::standard_targets;
use super::MacroTotals;
use crate::auth::services::AuthUser;
use crate::cards::repo::{require_card, CardRow};
use crate::error::ApiError;
use crate::measurements::repo::{latest_on_or_before, MeasurementRow};
use crate::params::date_or_today;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/calculate/standard", get(calculate_standard))
        .route("/calculate/current", get(calculate_current))
        .route("/recommendation", get(recommendation))
}

fn targets_for(card: &CardRow, measurement: &MeasurementRow) -> Result<MacroTotals, ApiError> {
    let gender = card.parsed_gender()?;
    Ok(standard_targets(
        gender,
        card.age as f64,
        card.height as f64,
        measurement.hand,
        measurement.weight,
        card.activity,
    ))
}

#[instrument(skip(state))]
pub async fn calculate_standard(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<CalculateQuery>,
) -> Result<Json<StandardResponse>, ApiError> {
    let day = date_or_today(query.date.as_deref())?;
    let card = require_card(&state.db, user_id).await?;
    let gender = card.parsed_gender()?;

    let measurement = latest_on_or_before(&state.db, card.id, day)
        .await?
        .ok_or_else(|| ApiError::not_found("no measurement recorded on or before this date"))?;

    let totals = targets_for(&card, &measurement)?;
    debug!(card_id = %card.id, gender = gender.as_str(), %day, "standard targets derived");

    Ok(Json(StandardResponse {
        body_type: somatotype(gender, measurement.hand),
        bmi: bmi(measurement.weight, card.height as f64),
        totals,
    }))
}

/// Totals of everything eaten on the day. Needs no measurement: the response
/// is pure aggregation over the meal log.
#[instrument(skip(state))]
pub async fn calculate_current(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<CalculateQuery>,
) -> Result<Json<MacroTotals>, ApiError> {
    let day = date_or_today(query.date.as_deref())?;
    let card = require_card(&state.db, user_id).await?;

    let portions = repo::eaten_portions(&state.db, card.id, day).await?;
    let water = repo::water_consumed(&state.db, card.id, day).await?;
    Ok(Json(sum_intake(&portions, water)))
}

#[instrument(skip(state))]
pub async fn recommendation(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<CalculateQuery>,
) -> Result<Json<RecommendationResponse>, ApiError> {
    let day = date_or_today(query.date.as_deref())?;
    let card = require_card(&state.db, user_id).await?;

    // The day must carry enough variety before anything else is looked at.
    let eaten = repo::distinct_eaten_products(&state.db, card.id, day).await?;
    recommend::ensure_enough_distinct(&eaten)?;

    let measurement = latest_on_or_before(&state.db, card.id, day)
        .await?
        .ok_or_else(|| ApiError::not_found("no measurement recorded on or before this date"))?;
    let target = targets_for(&card, &measurement)?;

    let portions = repo::eaten_portions(&state.db, card.id, day).await?;
    let water = repo::water_consumed(&state.db, card.id, day).await?;
    let current = sum_intake(&portions, water);

    let candidates = repo::candidate_products(&state.db, card.id).await?;
    let decision = recommend::decide(&eaten, &candidates, &target, &current)?;
    debug!(card_id = %card.id, %day, "recommendation decided");
    Ok(Json(decision.into()))
}
