use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::MealDetailRow;
use crate::error::ApiError;
use crate::params::default_limit;
use crate::products::dto::ProductResponse;
use crate::recipes::dto::PortionInput;

/// A log entry carries exactly one payload; the other two fields stay unset.
#[derive(Debug, Deserialize)]
pub struct MealRequest {
    pub portion: Option<PortionInput>,
    pub recipe_id: Option<Uuid>,
    pub water: Option<WaterInput>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WaterInput {
    pub volume_ml: i32,
}

#[derive(Debug, Clone, Copy)]
pub enum MealPayload {
    Portion(PortionInput),
    Recipe(Uuid),
    Water(WaterInput),
}

impl MealRequest {
    pub fn into_payload(self) -> Result<MealPayload, ApiError> {
        match (self.portion, self.recipe_id, self.water) {
            (None, None, None) => Err(ApiError::validation(
                "one of portion, recipe_id or water is required",
            )),
            (Some(portion), None, None) => {
                if portion.weight_g < 1 {
                    return Err(ApiError::validation(
                        "portion weight must be at least 1 gram",
                    ));
                }
                Ok(MealPayload::Portion(portion))
            }
            (None, Some(recipe_id), None) => Ok(MealPayload::Recipe(recipe_id)),
            (None, None, Some(water)) => {
                if water.volume_ml < 1 {
                    return Err(ApiError::validation("water volume must be at least 1 ml"));
                }
                Ok(MealPayload::Water(water))
            }
            _ => Err(ApiError::validation(
                "only one of portion, recipe_id or water can be set",
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MealListQuery {
    /// `YYYY-MM-DD`; omitting it lists the whole history.
    pub date: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Serialize)]
pub struct MealPortion {
    pub product: ProductResponse,
    pub weight_g: i32,
}

#[derive(Debug, Serialize)]
pub struct RecipeRef {
    pub id: Uuid,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct WaterOutput {
    pub volume_ml: i32,
}

#[derive(Debug, Serialize)]
pub struct MealResponse {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub eaten_at: OffsetDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portion: Option<MealPortion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe: Option<RecipeRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water: Option<WaterOutput>,
}

impl From<MealDetailRow> for MealResponse {
    fn from(row: MealDetailRow) -> Self {
        let portion = row.product_id.map(|product_id| MealPortion {
            product: ProductResponse {
                id: product_id,
                title: row.product_title.unwrap_or_default(),
                proteins: row.proteins.unwrap_or_default(),
                fats: row.fats.unwrap_or_default(),
                carbohydrates: row.carbohydrates.unwrap_or_default(),
                calories: row.calories.unwrap_or_default(),
                water: row.water.unwrap_or_default(),
            },
            weight_g: row.weight_g.unwrap_or_default(),
        });
        let recipe = row.recipe_id.map(|id| RecipeRef {
            id,
            title: row.recipe_title.unwrap_or_default(),
        });
        let water = row.volume_ml.map(|volume_ml| WaterOutput { volume_ml });

        Self {
            id: row.id,
            eaten_at: row.eaten_at,
            portion,
            recipe,
            water,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn portion(weight_g: i32) -> PortionInput {
        PortionInput {
            product_id: Uuid::new_v4(),
            weight_g,
        }
    }

    fn request(
        portion: Option<PortionInput>,
        recipe_id: Option<Uuid>,
        water: Option<WaterInput>,
    ) -> MealRequest {
        MealRequest {
            portion,
            recipe_id,
            water,
        }
    }

    #[test]
    fn empty_request_is_rejected() {
        let err = request(None, None, None).into_payload().unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn two_payloads_are_rejected() {
        let err = request(Some(portion(100)), Some(Uuid::new_v4()), None)
            .into_payload()
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn each_single_payload_is_accepted() {
        assert!(matches!(
            request(Some(portion(100)), None, None).into_payload(),
            Ok(MealPayload::Portion(_))
        ));
        assert!(matches!(
            request(None, Some(Uuid::new_v4()), None).into_payload(),
            Ok(MealPayload::Recipe(_))
        ));
        assert!(matches!(
            request(None, None, Some(WaterInput { volume_ml: 250 })).into_payload(),
            Ok(MealPayload::Water(_))
        ));
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        assert!(request(Some(portion(0)), None, None).into_payload().is_err());
        assert!(request(None, None, Some(WaterInput { volume_ml: 0 }))
            .into_payload()
            .is_err());
    }

    #[test]
    fn response_omits_absent_payload_fields() {
        let response = MealResponse {
            id: Uuid::new_v4(),
            eaten_at: OffsetDateTime::UNIX_EPOCH,
            portion: None,
            recipe: None,
            water: Some(WaterOutput { volume_ml: 250 }),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("portion").is_none());
        assert!(json.get("recipe").is_none());
        assert_eq!(json["water"]["volume_ml"], 250);
    }
}
