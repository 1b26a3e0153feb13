use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Crate-wide request error. Every handler returns this; the response body is
/// always `{"error": "<reason>"}` with a matching status code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    /// Not enough logged data to derive a result (e.g. too few distinct
    /// foods eaten for a recommendation).
    #[error("{0}")]
    InsufficientData(String),

    #[error("{0}")]
    Conflict(String),

    /// The intake/target comparison matched neither the deficit nor the
    /// surplus branch, so there is nothing to recommend.
    #[error("{0}")]
    NoRecommendation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl ApiError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        if matches!(e, sqlx::Error::RowNotFound) {
            return ApiError::NotFound("not found".into());
        }
        match e.as_database_error().and_then(|d| d.code()) {
            Some(code) if code == "23505" => ApiError::Conflict("already exists".into()),
            Some(code) if code == "23503" => {
                ApiError::Validation("referenced resource does not exist".into())
            }
            _ => ApiError::Database(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            ApiError::Validation(m) => (StatusCode::BAD_REQUEST, m.clone()),
            ApiError::InsufficientData(m) => (StatusCode::BAD_REQUEST, m.clone()),
            ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
            ApiError::NoRecommendation(m) => (StatusCode::NOT_FOUND, m.clone()),
            ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.clone()),
            ApiError::Database(e) => {
                error!(error = %e, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            ApiError::Unexpected(e) => {
                error!(error = %e, "unexpected error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_error_kinds() {
        assert_eq!(
            ApiError::not_found("x").into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::validation("x").into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InsufficientData("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::conflict("x").into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::NoRecommendation("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::unauthorized("x").into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err = ApiError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
