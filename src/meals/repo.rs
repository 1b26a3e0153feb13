use sqlx::{FromRow, PgPool, Postgres, Transaction};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::dto::MealPayload;

/// A meal and the payload rows it owns. The recipe pointer is not carried
/// here: recipes are shared and never deleted through a meal.
#[derive(Debug, Clone, FromRow)]
pub struct MealRow {
    pub id: Uuid,
    pub portion_id: Option<Uuid>,
    pub water_id: Option<Uuid>,
}

/// A meal with its payload resolved through the joins; exactly one of the
/// three column groups is populated.
#[derive(Debug, FromRow)]
pub struct MealDetailRow {
    pub id: Uuid,
    pub eaten_at: OffsetDateTime,
    pub product_id: Option<Uuid>,
    pub product_title: Option<String>,
    pub proteins: Option<f64>,
    pub fats: Option<f64>,
    pub carbohydrates: Option<f64>,
    pub calories: Option<f64>,
    pub water: Option<f64>,
    pub weight_g: Option<i32>,
    pub recipe_id: Option<Uuid>,
    pub recipe_title: Option<String>,
    pub volume_ml: Option<i32>,
}

const DETAIL_SELECT: &str = r#"
    SELECT m.id, m.eaten_at,
           p.id AS product_id, p.title AS product_title,
           p.proteins, p.fats, p.carbohydrates, p.calories, p.water,
           fp.weight_g,
           r.id AS recipe_id, r.title AS recipe_title,
           w.volume_ml
    FROM meals m
    LEFT JOIN food_portions fp ON fp.id = m.portion_id
    LEFT JOIN products p ON p.id = fp.product_id
    LEFT JOIN recipes r ON r.id = m.recipe_id
    LEFT JOIN water_entries w ON w.id = m.water_id
"#;

pub async fn list(
    db: &PgPool,
    card_id: Uuid,
    day: Option<Date>,
    limit: i64,
    offset: i64,
) -> Result<Vec<MealDetailRow>, sqlx::Error> {
    let sql = format!(
        r#"{DETAIL_SELECT}
        WHERE m.person_card_id = $1
          AND ($2::date IS NULL OR (m.eaten_at AT TIME ZONE 'UTC')::date = $2)
        ORDER BY m.eaten_at DESC
        LIMIT $3 OFFSET $4
        "#
    );
    sqlx::query_as::<_, MealDetailRow>(&sql)
        .bind(card_id)
        .bind(day)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
}

pub async fn find_detail(
    db: &PgPool,
    meal_id: Uuid,
    card_id: Uuid,
) -> Result<Option<MealDetailRow>, sqlx::Error> {
    let sql = format!("{DETAIL_SELECT} WHERE m.person_card_id = $1 AND m.id = $2");
    sqlx::query_as::<_, MealDetailRow>(&sql)
        .bind(card_id)
        .bind(meal_id)
        .fetch_optional(db)
        .await
}

pub async fn find(
    db: &PgPool,
    meal_id: Uuid,
    card_id: Uuid,
) -> Result<Option<MealRow>, sqlx::Error> {
    sqlx::query_as::<_, MealRow>(
        r#"
        SELECT id, portion_id, water_id
        FROM meals
        WHERE id = $1 AND person_card_id = $2
        "#,
    )
    .bind(meal_id)
    .bind(card_id)
    .fetch_optional(db)
    .await
}

async fn insert_payload(
    tx: &mut Transaction<'_, Postgres>,
    payload: &MealPayload,
) -> Result<(Option<Uuid>, Option<Uuid>, Option<Uuid>), sqlx::Error> {
    match payload {
        MealPayload::Portion(portion) => {
            let portion_id = sqlx::query_scalar::<_, Uuid>(
                "INSERT INTO food_portions (product_id, weight_g) VALUES ($1, $2) RETURNING id",
            )
            .bind(portion.product_id)
            .bind(portion.weight_g)
            .fetch_one(&mut **tx)
            .await?;
            Ok((Some(portion_id), None, None))
        }
        MealPayload::Recipe(recipe_id) => Ok((None, Some(*recipe_id), None)),
        MealPayload::Water(water) => {
            let water_id = sqlx::query_scalar::<_, Uuid>(
                "INSERT INTO water_entries (volume_ml) VALUES ($1) RETURNING id",
            )
            .bind(water.volume_ml)
            .fetch_one(&mut **tx)
            .await?;
            Ok((None, None, Some(water_id)))
        }
    }
}

pub async fn create(db: &PgPool, card_id: Uuid, payload: &MealPayload) -> Result<Uuid, sqlx::Error> {
    let mut tx = db.begin().await?;
    let (portion_id, recipe_id, water_id) = insert_payload(&mut tx, payload).await?;
    let meal_id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO meals (person_card_id, portion_id, recipe_id, water_id)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(card_id)
    .bind(portion_id)
    .bind(recipe_id)
    .bind(water_id)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;
    Ok(meal_id)
}

/// Swaps the meal's payload in place. The meal must be re-pointed before the
/// old owned rows are deleted: the payload foreign keys cascade, so deleting
/// first would take the meal with them.
pub async fn update(db: &PgPool, meal: &MealRow, payload: &MealPayload) -> Result<(), sqlx::Error> {
    let mut tx = db.begin().await?;
    let (portion_id, recipe_id, water_id) = insert_payload(&mut tx, payload).await?;

    sqlx::query(
        r#"
        UPDATE meals
        SET portion_id = $2, recipe_id = $3, water_id = $4
        WHERE id = $1
        "#,
    )
    .bind(meal.id)
    .bind(portion_id)
    .bind(recipe_id)
    .bind(water_id)
    .execute(&mut *tx)
    .await?;

    if let Some(old_portion) = meal.portion_id {
        sqlx::query("DELETE FROM food_portions WHERE id = $1")
            .bind(old_portion)
            .execute(&mut *tx)
            .await?;
    }
    if let Some(old_water) = meal.water_id {
        sqlx::query("DELETE FROM water_entries WHERE id = $1")
            .bind(old_water)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    Ok(())
}

/// Removes the meal and the payload rows it owns. Recipes are shared, so the
/// referenced recipe is left alone.
pub async fn delete(db: &PgPool, meal: &MealRow) -> Result<(), sqlx::Error> {
    let mut tx = db.begin().await?;
    sqlx::query("DELETE FROM meals WHERE id = $1")
        .bind(meal.id)
        .execute(&mut *tx)
        .await?;
    if let Some(portion_id) = meal.portion_id {
        sqlx::query("DELETE FROM food_portions WHERE id = $1")
            .bind(portion_id)
            .execute(&mut *tx)
            .await?;
    }
    if let Some(water_id) = meal.water_id {
        sqlx::query("DELETE FROM water_entries WHERE id = $1")
            .bind(water_id)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    Ok(())
}
