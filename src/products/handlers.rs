use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::auth::services::AuthUser;
use crate::error::ApiError;
use crate::products::dto::{CatalogQuery, ProductResponse};
use crate::products::repo::{self, CategoryRow};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/categories", get(list_categories))
}

#[instrument(skip(state))]
async fn list_products(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let rows = repo::list(
        &state.db,
        query.search.as_deref(),
        query.limit,
        query.offset,
    )
    .await?;
    Ok(Json(rows.iter().map(ProductResponse::from).collect()))
}

#[instrument(skip(state))]
async fn list_categories(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
) -> Result<Json<Vec<CategoryRow>>, ApiError> {
    let rows = repo::list_categories(&state.db).await?;
    Ok(Json(rows))
}
