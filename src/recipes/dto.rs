use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::{PortionWithProduct, RecipeRow};
use crate::error::ApiError;
use crate::params::default_limit;
use crate::products::dto::ProductResponse;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PortionInput {
    pub product_id: Uuid,
    pub weight_g: i32,
}

#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub portions: Vec<PortionInput>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRecipeRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub portions: Option<Vec<PortionInput>>,
}

#[derive(Debug, Deserialize)]
pub struct RecipeListQuery {
    pub search: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn validate_portions(portions: &[PortionInput]) -> Result<(), ApiError> {
    if portions.is_empty() {
        return Err(ApiError::validation("portions must not be empty"));
    }
    if portions.iter().any(|p| p.weight_g < 1) {
        return Err(ApiError::validation(
            "portion weight must be at least 1 gram",
        ));
    }
    Ok(())
}

impl CreateRecipeRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::validation("title must not be empty"));
        }
        validate_portions(&self.portions)
    }
}

impl UpdateRecipeRequest {
    /// An update always produces a new version, so the full composition has
    /// to be sent; scalar fields may be omitted to keep the old value.
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(ApiError::validation("title must not be empty"));
            }
        }
        match &self.portions {
            None => Err(ApiError::validation("portions are required")),
            Some(portions) => validate_portions(portions),
        }
    }
}

/// Collapses duplicate products into one portion each, summing weights.
/// First-occurrence order is kept.
pub fn merge_portions(portions: &[PortionInput]) -> Vec<PortionInput> {
    let mut merged: Vec<PortionInput> = Vec::with_capacity(portions.len());
    for portion in portions {
        match merged.iter_mut().find(|m| m.product_id == portion.product_id) {
            Some(existing) => existing.weight_g += portion.weight_g,
            None => merged.push(*portion),
        }
    }
    merged
}

#[derive(Debug, Serialize)]
pub struct RecipeSummary {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<RecipeRow> for RecipeSummary {
    fn from(row: RecipeRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            image: row.image,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecipePortion {
    pub product: ProductResponse,
    pub weight_g: i32,
}

impl From<PortionWithProduct> for RecipePortion {
    fn from(row: PortionWithProduct) -> Self {
        Self {
            product: ProductResponse {
                id: row.product_id,
                title: row.product_title,
                proteins: row.proteins,
                fats: row.fats,
                carbohydrates: row.carbohydrates,
                calories: row.calories,
                water: row.water,
            },
            weight_g: row.weight_g,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    #[serde(flatten)]
    pub recipe: RecipeSummary,
    pub portions: Vec<RecipePortion>,
}
