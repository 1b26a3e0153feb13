use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::nutrition::body::Gender;
use crate::products::dto::ProductResponse;
use crate::products::repo::CategoryRow;

use super::repo::FemaleTypeRow;

/// Accepted activity multipliers, sedentary to athlete.
pub const ACTIVITY_LEVELS: [f64; 5] = [1.2, 1.375, 1.55, 1.725, 1.9];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Loss,
    Gain,
    Keep,
}

impl Target {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "loss" => Some(Self::Loss),
            "gain" => Some(Self::Gain),
            "keep" => Some(Self::Keep),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateCardRequest {
    pub height: i32,
    pub age: i32,
    pub gender: String,
    pub target: Option<String>,
    pub activity: f64,
    pub image: Option<String>,
    pub female_types: Option<Vec<Uuid>>,
    pub excluded_products: Option<Vec<Uuid>>,
    pub excluded_categories: Option<Vec<Uuid>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCardRequest {
    pub height: Option<i32>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub target: Option<String>,
    pub activity: Option<f64>,
    pub image: Option<String>,
    pub female_types: Option<Vec<Uuid>>,
    pub excluded_products: Option<Vec<Uuid>>,
    pub excluded_categories: Option<Vec<Uuid>>,
}

pub fn validate_height(height: i32) -> Result<(), ApiError> {
    if !(100..=250).contains(&height) {
        return Err(ApiError::validation("height must be between 100 and 250"));
    }
    Ok(())
}

pub fn validate_age(age: i32) -> Result<(), ApiError> {
    if !(18..=100).contains(&age) {
        return Err(ApiError::validation("age must be between 18 and 100"));
    }
    Ok(())
}

pub fn validate_activity(activity: f64) -> Result<(), ApiError> {
    if !ACTIVITY_LEVELS.contains(&activity) {
        return Err(ApiError::validation(
            "activity must be one of 1.2, 1.375, 1.55, 1.725, 1.9",
        ));
    }
    Ok(())
}

pub fn validate_gender(gender: &str) -> Result<Gender, ApiError> {
    Gender::parse(gender).ok_or_else(|| ApiError::validation("gender must be male or female"))
}

pub fn validate_target(target: &str) -> Result<Target, ApiError> {
    Target::parse(target)
        .ok_or_else(|| ApiError::validation("target must be one of loss, gain, keep"))
}

impl CreateCardRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_height(self.height)?;
        validate_age(self.age)?;
        validate_gender(&self.gender)?;
        if let Some(target) = &self.target {
            validate_target(target)?;
        }
        validate_activity(self.activity)
    }
}

impl UpdateCardRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(height) = self.height {
            validate_height(height)?;
        }
        if let Some(age) = self.age {
            validate_age(age)?;
        }
        if let Some(gender) = &self.gender {
            validate_gender(gender)?;
        }
        if let Some(target) = &self.target {
            validate_target(target)?;
        }
        if let Some(activity) = self.activity {
            validate_activity(activity)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct CardResponse {
    pub id: Uuid,
    pub height: i32,
    pub age: i32,
    pub gender: String,
    pub target: Option<String>,
    pub activity: f64,
    pub image: String,
    pub female_types: Vec<FemaleTypeRow>,
    pub excluded_products: Vec<ProductResponse>,
    pub excluded_categories: Vec<CategoryRow>,
}
