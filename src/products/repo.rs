use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Catalog food with per-gram macro values and the proportion triple the
/// recommendation search matches against.
#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
    pub id: Uuid,
    pub title: String,
    pub proteins: f64,
    pub fats: f64,
    pub carbohydrates: f64,
    pub calories: f64,
    pub water: f64,
    pub proteins_proportion: f64,
    pub fats_proportion: f64,
    pub carbohydrates_proportion: f64,
}

#[derive(Debug, Clone, FromRow, serde::Serialize)]
pub struct CategoryRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image: String,
}

pub async fn list(
    db: &PgPool,
    search: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<ProductRow>, sqlx::Error> {
    sqlx::query_as::<_, ProductRow>(
        r#"
        SELECT id, title, proteins, fats, carbohydrates, calories, water,
               proteins_proportion, fats_proportion, carbohydrates_proportion
        FROM products
        WHERE $1::text IS NULL OR title ILIKE '%' || $1 || '%'
        ORDER BY title
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(search)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
}

pub async fn list_categories(db: &PgPool) -> Result<Vec<CategoryRow>, sqlx::Error> {
    sqlx::query_as::<_, CategoryRow>(
        r#"
        SELECT id, title, description, image
        FROM product_categories
        ORDER BY title
        "#,
    )
    .fetch_all(db)
    .await
}

