use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::dto::CreateMeasurementRequest;

#[derive(Debug, Clone, FromRow)]
pub struct MeasurementRow {
    pub id: Uuid,
    pub weight: f64,
    pub chest: f64,
    pub waist: f64,
    pub hips: f64,
    pub hand: f64,
    pub recorded_at: OffsetDateTime,
}

pub async fn create(
    db: &PgPool,
    card_id: Uuid,
    request: &CreateMeasurementRequest,
) -> Result<MeasurementRow, sqlx::Error> {
    sqlx::query_as::<_, MeasurementRow>(
        r#"
        INSERT INTO measurements (person_card_id, weight, chest, waist, hips, hand)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, weight, chest, waist, hips, hand, recorded_at
        "#,
    )
    .bind(card_id)
    .bind(request.weight)
    .bind(request.chest)
    .bind(request.waist)
    .bind(request.hips)
    .bind(request.hand)
    .fetch_one(db)
    .await
}

pub async fn list(db: &PgPool, card_id: Uuid) -> Result<Vec<MeasurementRow>, sqlx::Error> {
    sqlx::query_as::<_, MeasurementRow>(
        r#"
        SELECT id, weight, chest, waist, hips, hand, recorded_at
        FROM measurements
        WHERE person_card_id = $1
        ORDER BY recorded_at DESC
        "#,
    )
    .bind(card_id)
    .fetch_all(db)
    .await
}

/// The newest measurement recorded on or before the given UTC day. Target
/// derivation for a date uses the body state known at that date.
pub async fn latest_on_or_before(
    db: &PgPool,
    card_id: Uuid,
    day: Date,
) -> Result<Option<MeasurementRow>, sqlx::Error> {
    sqlx::query_as::<_, MeasurementRow>(
        r#"
        SELECT id, weight, chest, waist, hips, hand, recorded_at
        FROM measurements
        WHERE person_card_id = $1
          AND (recorded_at AT TIME ZONE 'UTC')::date <= $2
        ORDER BY recorded_at DESC
        LIMIT 1
        "#,
    )
    .bind(card_id)
    .bind(day)
    .fetch_optional(db)
    .await
}

pub async fn delete(db: &PgPool, measurement_id: Uuid, card_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM measurements WHERE id = $1 AND person_card_id = $2")
        .bind(measurement_id)
        .bind(card_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}
