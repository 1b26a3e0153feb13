use anyhow::anyhow;
use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::dto::{CreateCardRequest, UpdateCardRequest};
use crate::error::ApiError;
use crate::nutrition::body::Gender;
use crate::products::repo::{CategoryRow, ProductRow};

#[derive(Debug, Clone, FromRow)]
pub struct CardRow {
    pub id: Uuid,
    pub height: i32,
    pub age: i32,
    pub gender: String,
    pub target: Option<String>,
    pub activity: f64,
    pub image: String,
}

impl CardRow {
    /// Stored gender re-parsed into the domain enum. Cards are only written
    /// through validated requests, so a failure here means corrupted data.
    pub fn parsed_gender(&self) -> Result<Gender, ApiError> {
        Gender::parse(&self.gender).ok_or_else(|| {
            ApiError::Unexpected(anyhow!(
                "card {} holds unknown gender {:?}",
                self.id,
                self.gender
            ))
        })
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FemaleTypeRow {
    pub id: Uuid,
    pub title: String,
}

pub async fn find_by_user(db: &PgPool, user_id: Uuid) -> Result<Option<CardRow>, sqlx::Error> {
    sqlx::query_as::<_, CardRow>(
        r#"
        SELECT id, height, age, gender, target, activity, image
        FROM person_cards
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await
}

/// The caller's card, or `NotFound` when none has been created yet. Every
/// card-scoped endpoint goes through this.
pub async fn require_card(db: &PgPool, user_id: Uuid) -> Result<CardRow, ApiError> {
    find_by_user(db, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("person card not found"))
}

pub async fn create(
    db: &PgPool,
    user_id: Uuid,
    request: &CreateCardRequest,
) -> Result<CardRow, ApiError> {
    if find_by_user(db, user_id).await?.is_some() {
        return Err(ApiError::conflict("person card already exists"));
    }

    let mut tx = db.begin().await?;
    let card = sqlx::query_as::<_, CardRow>(
        r#"
        INSERT INTO person_cards (user_id, height, age, gender, target, activity, image)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, height, age, gender, target, activity, image
        "#,
    )
    .bind(user_id)
    .bind(request.height)
    .bind(request.age)
    .bind(&request.gender)
    .bind(&request.target)
    .bind(request.activity)
    .bind(request.image.as_deref().unwrap_or(""))
    .fetch_one(&mut *tx)
    .await?;

    if let Some(ids) = &request.female_types {
        link_female_types(&mut tx, card.id, ids).await?;
    }
    if let Some(ids) = &request.excluded_products {
        link_excluded_products(&mut tx, card.id, ids).await?;
    }
    if let Some(ids) = &request.excluded_categories {
        link_excluded_categories(&mut tx, card.id, ids).await?;
    }
    tx.commit().await?;
    Ok(card)
}

/// Applies a partial update; absent scalar fields keep their stored value,
/// absent link lists stay untouched, present link lists are replaced whole.
/// `None` when the card does not exist or belongs to another user.
pub async fn update(
    db: &PgPool,
    card_id: Uuid,
    user_id: Uuid,
    request: &UpdateCardRequest,
) -> Result<Option<CardRow>, ApiError> {
    let mut tx = db.begin().await?;
    let card = sqlx::query_as::<_, CardRow>(
        r#"
        UPDATE person_cards
        SET height = COALESCE($3, height),
            age = COALESCE($4, age),
            gender = COALESCE($5, gender),
            target = COALESCE($6, target),
            activity = COALESCE($7, activity),
            image = COALESCE($8, image)
        WHERE id = $1 AND user_id = $2
        RETURNING id, height, age, gender, target, activity, image
        "#,
    )
    .bind(card_id)
    .bind(user_id)
    .bind(request.height)
    .bind(request.age)
    .bind(&request.gender)
    .bind(&request.target)
    .bind(request.activity)
    .bind(&request.image)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(card) = card else {
        return Ok(None);
    };

    if let Some(ids) = &request.female_types {
        sqlx::query("DELETE FROM person_card_female_types WHERE person_card_id = $1")
            .bind(card.id)
            .execute(&mut *tx)
            .await?;
        link_female_types(&mut tx, card.id, ids).await?;
    }
    if let Some(ids) = &request.excluded_products {
        sqlx::query("DELETE FROM person_card_excluded_products WHERE person_card_id = $1")
            .bind(card.id)
            .execute(&mut *tx)
            .await?;
        link_excluded_products(&mut tx, card.id, ids).await?;
    }
    if let Some(ids) = &request.excluded_categories {
        sqlx::query("DELETE FROM person_card_excluded_categories WHERE person_card_id = $1")
            .bind(card.id)
            .execute(&mut *tx)
            .await?;
        link_excluded_categories(&mut tx, card.id, ids).await?;
    }
    tx.commit().await?;
    Ok(Some(card))
}

/// Returns the number of deleted rows; the cascade takes measurements,
/// recipes and meal history with the card.
pub async fn delete(db: &PgPool, card_id: Uuid, user_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM person_cards WHERE id = $1 AND user_id = $2")
        .bind(card_id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

async fn link_female_types(
    tx: &mut Transaction<'_, Postgres>,
    card_id: Uuid,
    ids: &[Uuid],
) -> Result<(), sqlx::Error> {
    for id in ids {
        sqlx::query(
            r#"
            INSERT INTO person_card_female_types (person_card_id, female_type_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(card_id)
        .bind(id)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

async fn link_excluded_products(
    tx: &mut Transaction<'_, Postgres>,
    card_id: Uuid,
    ids: &[Uuid],
) -> Result<(), sqlx::Error> {
    for id in ids {
        sqlx::query(
            r#"
            INSERT INTO person_card_excluded_products (person_card_id, product_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(card_id)
        .bind(id)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

async fn link_excluded_categories(
    tx: &mut Transaction<'_, Postgres>,
    card_id: Uuid,
    ids: &[Uuid],
) -> Result<(), sqlx::Error> {
    for id in ids {
        sqlx::query(
            r#"
            INSERT INTO person_card_excluded_categories (person_card_id, category_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(card_id)
        .bind(id)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

pub async fn female_types_of(db: &PgPool, card_id: Uuid) -> Result<Vec<FemaleTypeRow>, sqlx::Error> {
    sqlx::query_as::<_, FemaleTypeRow>(
        r#"
        SELECT ft.id, ft.title
        FROM female_types ft
        JOIN person_card_female_types link ON link.female_type_id = ft.id
        WHERE link.person_card_id = $1
        ORDER BY ft.title
        "#,
    )
    .bind(card_id)
    .fetch_all(db)
    .await
}

pub async fn excluded_products_of(db: &PgPool, card_id: Uuid) -> Result<Vec<ProductRow>, sqlx::Error> {
    sqlx::query_as::<_, ProductRow>(
        r#"
        SELECT p.id, p.title, p.proteins, p.fats, p.carbohydrates, p.calories,
               p.water, p.proteins_proportion, p.fats_proportion,
               p.carbohydrates_proportion
        FROM products p
        JOIN person_card_excluded_products link ON link.product_id = p.id
        WHERE link.person_card_id = $1
        ORDER BY p.title
        "#,
    )
    .bind(card_id)
    .fetch_all(db)
    .await
}

pub async fn excluded_categories_of(
    db: &PgPool,
    card_id: Uuid,
) -> Result<Vec<CategoryRow>, sqlx::Error> {
    sqlx::query_as::<_, CategoryRow>(
        r#"
        SELECT c.id, c.title, c.description, c.image
        FROM product_categories c
        JOIN person_card_excluded_categories link ON link.category_id = c.id
        WHERE link.person_card_id = $1
        ORDER BY c.title
        "#,
    )
    .bind(card_id)
    .fetch_all(db)
    .await
}

pub async fn list_female_types(db: &PgPool) -> Result<Vec<FemaleTypeRow>, sqlx::Error> {
    sqlx::query_as::<_, FemaleTypeRow>("SELECT id, title FROM female_types ORDER BY title")
        .fetch_all(db)
        .await
}
