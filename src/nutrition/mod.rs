use crate::state::AppState;
use axum::Router;
use serde::Serialize;

pub mod body;
pub mod dto;
pub mod handlers;
pub mod intake;
pub mod recommend;
pub mod repo;
pub mod targets;

/// Daily calorie/macro/water totals, integer-rounded. Used both for the
/// derived targets and for the aggregated intake of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MacroTotals {
    pub calories: i64,
    pub proteins: i64,
    pub fats: i64,
    pub carbohydrates: i64,
    pub water: i64,
}

pub fn router() -> Router<AppState> {
    handlers::routes()
}
