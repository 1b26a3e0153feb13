use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::params::default_limit;
use crate::products::repo::ProductRow;

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub search: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

/// Wire shape of a catalog food: per-gram macro values only. The matching
/// proportions and the category link stay internal.
#[derive(Debug, Clone, Serialize)]
pub struct ProductResponse {
    pub id: Uuid,
    pub title: String,
    pub proteins: f64,
    pub fats: f64,
    pub carbohydrates: f64,
    pub calories: f64,
    pub water: f64,
}

impl From<&ProductRow> for ProductResponse {
    fn from(row: &ProductRow) -> Self {
        Self {
            id: row.id,
            title: row.title.clone(),
            proteins: row.proteins,
            fats: row.fats,
            carbohydrates: row.carbohydrates,
            calories: row.calories,
            water: row.water,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_hides_matching_internals() {
        let row = ProductRow {
            id: Uuid::new_v4(),
            title: "onion".into(),
            proteins: 0.014,
            fats: 0.002,
            carbohydrates: 0.082,
            calories: 0.41,
            water: 0.86,
            proteins_proportion: 7.0,
            fats_proportion: 1.0,
            carbohydrates_proportion: 41.0,
        };
        let json = serde_json::to_string(&ProductResponse::from(&row)).unwrap();
        assert!(json.contains("onion"));
        assert!(!json.contains("proportion"));
        assert!(!json.contains("category"));
    }
}
