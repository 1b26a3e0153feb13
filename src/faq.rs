use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use sqlx::FromRow;
use tracing::instrument;
use uuid::Uuid;

use crate::auth::services::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize, FromRow)]
pub struct FaqEntry {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/faq", get(list_faq))
}

#[instrument(skip(state))]
pub async fn list_faq(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
) -> Result<Json<Vec<FaqEntry>>, ApiError> {
    let entries =
        sqlx::query_as::<_, FaqEntry>("SELECT id, question, answer FROM faq ORDER BY question")
            .fetch_all(&state.db)
            .await?;
    Ok(Json(entries))
}
