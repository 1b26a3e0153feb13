use sqlx::{FromRow, PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::PortionInput;

#[derive(Debug, Clone, FromRow)]
pub struct RecipeRow {
    pub id: Uuid,
    pub person_card_id: Uuid,
    pub title: String,
    pub description: String,
    pub image: String,
    pub created_at: OffsetDateTime,
}

/// One recipe portion joined with the macro profile of its product.
#[derive(Debug, FromRow)]
pub struct PortionWithProduct {
    pub product_id: Uuid,
    pub product_title: String,
    pub proteins: f64,
    pub fats: f64,
    pub carbohydrates: f64,
    pub calories: f64,
    pub water: f64,
    pub weight_g: i32,
}

pub async fn create(
    db: &PgPool,
    card_id: Uuid,
    title: &str,
    description: &str,
    image: &str,
    portions: &[PortionInput],
) -> Result<RecipeRow, sqlx::Error> {
    let mut tx = db.begin().await?;
    let recipe = insert_version(&mut tx, card_id, title, description, image, portions).await?;
    tx.commit().await?;
    Ok(recipe)
}

/// Publishes a replacement version: the old row is deactivated and keeps its
/// portions, so meals logged against it stay intact.
pub async fn revise(
    db: &PgPool,
    old: &RecipeRow,
    title: &str,
    description: &str,
    image: &str,
    portions: &[PortionInput],
) -> Result<RecipeRow, sqlx::Error> {
    let mut tx = db.begin().await?;
    sqlx::query("UPDATE recipes SET is_active = FALSE WHERE id = $1")
        .bind(old.id)
        .execute(&mut *tx)
        .await?;
    let recipe = insert_version(
        &mut tx,
        old.person_card_id,
        title,
        description,
        image,
        portions,
    )
    .await?;
    tx.commit().await?;
    Ok(recipe)
}

async fn insert_version(
    tx: &mut Transaction<'_, Postgres>,
    card_id: Uuid,
    title: &str,
    description: &str,
    image: &str,
    portions: &[PortionInput],
) -> Result<RecipeRow, sqlx::Error> {
    let recipe = sqlx::query_as::<_, RecipeRow>(
        r#"
        INSERT INTO recipes (person_card_id, title, description, image)
        VALUES ($1, $2, $3, $4)
        RETURNING id, person_card_id, title, description, image, created_at
        "#,
    )
    .bind(card_id)
    .bind(title)
    .bind(description)
    .bind(image)
    .fetch_one(&mut **tx)
    .await?;

    for portion in portions {
        sqlx::query(
            r#"
            INSERT INTO food_portions (product_id, weight_g, recipe_id)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(portion.product_id)
        .bind(portion.weight_g)
        .bind(recipe.id)
        .execute(&mut **tx)
        .await?;
    }
    Ok(recipe)
}

pub async fn list_active(
    db: &PgPool,
    card_id: Uuid,
    search: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<RecipeRow>, sqlx::Error> {
    sqlx::query_as::<_, RecipeRow>(
        r#"
        SELECT id, person_card_id, title, description, image, created_at
        FROM recipes
        WHERE person_card_id = $1
          AND is_active
          AND ($2::text IS NULL OR title ILIKE '%' || $2 || '%')
        ORDER BY title
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(card_id)
    .bind(search)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
}

/// Only the active version of a recipe is addressable; superseded versions
/// live on solely through the meals that reference them.
pub async fn find_active(
    db: &PgPool,
    recipe_id: Uuid,
    card_id: Uuid,
) -> Result<Option<RecipeRow>, sqlx::Error> {
    sqlx::query_as::<_, RecipeRow>(
        r#"
        SELECT id, person_card_id, title, description, image, created_at
        FROM recipes
        WHERE id = $1 AND person_card_id = $2 AND is_active
        "#,
    )
    .bind(recipe_id)
    .bind(card_id)
    .fetch_optional(db)
    .await
}

pub async fn portions_of(db: &PgPool, recipe_id: Uuid) -> Result<Vec<PortionWithProduct>, sqlx::Error> {
    sqlx::query_as::<_, PortionWithProduct>(
        r#"
        SELECT p.id AS product_id, p.title AS product_title, p.proteins, p.fats,
               p.carbohydrates, p.calories, p.water, fp.weight_g
        FROM food_portions fp
        JOIN products p ON p.id = fp.product_id
        WHERE fp.recipe_id = $1
        ORDER BY p.title
        "#,
    )
    .bind(recipe_id)
    .fetch_all(db)
    .await
}

/// Removes the addressed version; the cascade takes its portions and any
/// meals logged against it.
pub async fn delete(db: &PgPool, recipe_id: Uuid, card_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM recipes WHERE id = $1 AND person_card_id = $2")
        .bind(recipe_id)
        .bind(card_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}
