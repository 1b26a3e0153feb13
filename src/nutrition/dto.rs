use serde::{Deserialize, Serialize};

use super::body::Somatotype;
use super::recommend::Recommendation;
use super::MacroTotals;
use crate::products::dto::ProductResponse;

#[derive(Debug, Deserialize)]
pub struct CalculateQuery {
    /// `YYYY-MM-DD`; today when absent.
    pub date: Option<String>,
}

/// Daily targets plus the body classification they were derived from.
#[derive(Debug, Serialize)]
pub struct StandardResponse {
    pub body_type: Somatotype,
    pub bmi: f64,
    #[serde(flatten)]
    pub totals: MacroTotals,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationProducts {
    Include(Vec<ProductResponse>),
    Exclude(Vec<ProductResponse>),
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub products: RecommendationProducts,
}

impl From<Recommendation> for RecommendationResponse {
    fn from(recommendation: Recommendation) -> Self {
        let products = match recommendation {
            Recommendation::Include(rows) => {
                RecommendationProducts::Include(rows.iter().map(ProductResponse::from).collect())
            }
            Recommendation::Exclude(rows) => {
                RecommendationProducts::Exclude(rows.iter().map(ProductResponse::from).collect())
            }
        };
        Self { products }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_response_flattens_the_totals() {
        let response = StandardResponse {
            body_type: Somatotype::Ectomorph,
            bmi: 26.1,
            totals: MacroTotals {
                calories: 2173,
                proteins: 61,
                fats: 53,
                carbohydrates: 225,
                water: 2400,
            },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["body_type"], "ectomorph");
        assert_eq!(json["bmi"], 26.1);
        assert_eq!(json["calories"], 2173);
        assert!(json.get("totals").is_none());
    }

    #[test]
    fn recommendation_branches_serialize_under_lowercase_tags() {
        let include = RecommendationResponse {
            products: RecommendationProducts::Include(vec![]),
        };
        let json = serde_json::to_value(&include).unwrap();
        assert!(json["products"].get("include").is_some());

        let exclude = RecommendationResponse {
            products: RecommendationProducts::Exclude(vec![]),
        };
        let json = serde_json::to_value(&exclude).unwrap();
        assert!(json["products"].get("exclude").is_some());
    }
}
