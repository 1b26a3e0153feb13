use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use super::intake::PortionMacros;
use crate::products::repo::ProductRow;

/// Every portion eaten by the card on the given UTC day. Meals logged as a
/// single portion contribute one row; meals logged as a recipe fan out into
/// one row per portion of the recipe version that was eaten.
pub async fn eaten_portions(
    db: &PgPool,
    card_id: Uuid,
    day: Date,
) -> Result<Vec<PortionMacros>, sqlx::Error> {
    sqlx::query_as::<_, PortionMacros>(
        r#"
        SELECT p.proteins, p.fats, p.carbohydrates, p.calories, p.water,
               fp.weight_g::double precision AS weight_g
        FROM meals m
        JOIN food_portions fp ON fp.id = m.portion_id
        JOIN products p ON p.id = fp.product_id
        WHERE m.person_card_id = $1
          AND (m.eaten_at AT TIME ZONE 'UTC')::date = $2
        UNION ALL
        SELECT p.proteins, p.fats, p.carbohydrates, p.calories, p.water,
               fp.weight_g::double precision AS weight_g
        FROM meals m
        JOIN food_portions fp ON fp.recipe_id = m.recipe_id
        JOIN products p ON p.id = fp.product_id
        WHERE m.person_card_id = $1
          AND (m.eaten_at AT TIME ZONE 'UTC')::date = $2
        "#,
    )
    .bind(card_id)
    .bind(day)
    .fetch_all(db)
    .await
}

/// Standalone water logged by the card on the given UTC day, in millilitres.
pub async fn water_consumed(db: &PgPool, card_id: Uuid, day: Date) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COALESCE(SUM(w.volume_ml), 0)::BIGINT
        FROM meals m
        JOIN water_entries w ON w.id = m.water_id
        WHERE m.person_card_id = $1
          AND (m.eaten_at AT TIME ZONE 'UTC')::date = $2
        "#,
    )
    .bind(card_id)
    .bind(day)
    .fetch_one(db)
    .await
}

/// Distinct foods the card ate on the given UTC day, whether logged directly
/// or through a recipe, in title order.
pub async fn distinct_eaten_products(
    db: &PgPool,
    card_id: Uuid,
    day: Date,
) -> Result<Vec<ProductRow>, sqlx::Error> {
    sqlx::query_as::<_, ProductRow>(
        r#"
        SELECT p.id, p.title, p.proteins, p.fats, p.carbohydrates, p.calories,
               p.water, p.proteins_proportion, p.fats_proportion,
               p.carbohydrates_proportion
        FROM products p
        WHERE p.id IN (
            SELECT fp.product_id
            FROM meals m
            JOIN food_portions fp ON fp.id = m.portion_id
            WHERE m.person_card_id = $1
              AND (m.eaten_at AT TIME ZONE 'UTC')::date = $2
            UNION
            SELECT fp.product_id
            FROM meals m
            JOIN food_portions fp ON fp.recipe_id = m.recipe_id
            WHERE m.person_card_id = $1
              AND (m.eaten_at AT TIME ZONE 'UTC')::date = $2
        )
        ORDER BY p.title
        "#,
    )
    .bind(card_id)
    .bind(day)
    .fetch_all(db)
    .await
}

/// Catalog foods eligible for recommendation to the card: categorized and
/// not on the card's product or category blacklist, in title order.
pub async fn candidate_products(db: &PgPool, card_id: Uuid) -> Result<Vec<ProductRow>, sqlx::Error> {
    sqlx::query_as::<_, ProductRow>(
        r#"
        SELECT p.id, p.title, p.proteins, p.fats, p.carbohydrates, p.calories,
               p.water, p.proteins_proportion, p.fats_proportion,
               p.carbohydrates_proportion
        FROM products p
        WHERE p.category_id IS NOT NULL
          AND p.id NOT IN (
              SELECT product_id FROM person_card_excluded_products
              WHERE person_card_id = $1
          )
          AND p.category_id NOT IN (
              SELECT category_id FROM person_card_excluded_categories
              WHERE person_card_id = $1
          )
        ORDER BY p.title
        "#,
    )
    .bind(card_id)
    .fetch_all(db)
    .await
}
