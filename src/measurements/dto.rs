use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::MeasurementRow;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CreateMeasurementRequest {
    pub weight: f64,
    pub chest: f64,
    pub waist: f64,
    pub hips: f64,
    pub hand: f64,
}

impl CreateMeasurementRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if !(15.0..=350.0).contains(&self.weight) {
            return Err(ApiError::validation("weight must be between 15 and 350"));
        }
        if !(30.0..=300.0).contains(&self.chest) {
            return Err(ApiError::validation("chest must be between 30 and 300"));
        }
        if !(30.0..=300.0).contains(&self.waist) {
            return Err(ApiError::validation("waist must be between 30 and 300"));
        }
        if !(30.0..=300.0).contains(&self.hips) {
            return Err(ApiError::validation("hips must be between 30 and 300"));
        }
        if !(10.0..=30.0).contains(&self.hand) {
            return Err(ApiError::validation("hand must be between 10 and 30"));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct MeasurementResponse {
    pub id: Uuid,
    pub weight: f64,
    pub chest: f64,
    pub waist: f64,
    pub hips: f64,
    pub hand: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub recorded_at: OffsetDateTime,
}

impl From<MeasurementRow> for MeasurementResponse {
    fn from(row: MeasurementRow) -> Self {
        Self {
            id: row.id,
            weight: row.weight,
            chest: row.chest,
            waist: row.waist,
            hips: row.hips,
            hand: row.hand,
            recorded_at: row.recorded_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> CreateMeasurementRequest {
        CreateMeasurementRequest {
            weight: 80.0,
            chest: 100.0,
            waist: 85.0,
            hips: 95.0,
            hand: 16.0,
        }
    }

    #[test]
    fn typical_measurement_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn weight_bounds_are_inclusive() {
        let mut request = valid();
        request.weight = 15.0;
        assert!(request.validate().is_ok());
        request.weight = 350.0;
        assert!(request.validate().is_ok());
        request.weight = 14.9;
        assert!(request.validate().is_err());
        request.weight = 350.1;
        assert!(request.validate().is_err());
    }

    #[test]
    fn girths_share_the_same_range() {
        let fields: [fn(&mut CreateMeasurementRequest, f64); 3] = [
            |r, v| r.chest = v,
            |r, v| r.waist = v,
            |r, v| r.hips = v,
        ];
        for assign in fields {
            let mut request = valid();
            assign(&mut request, 29.9);
            assert!(request.validate().is_err());
            assign(&mut request, 30.0);
            assert!(request.validate().is_ok());
            assign(&mut request, 300.0);
            assert!(request.validate().is_ok());
            assign(&mut request, 300.1);
            assert!(request.validate().is_err());
        }
    }

    #[test]
    fn wrist_range_is_narrow() {
        let mut request = valid();
        request.hand = 9.9;
        assert!(request.validate().is_err());
        request.hand = 30.1;
        assert!(request.validate().is_err());
        request.hand = 10.0;
        assert!(request.validate().is_ok());
    }

    #[test]
    fn response_omits_the_card_id() {
        let response = MeasurementResponse {
            id: Uuid::new_v4(),
            weight: 80.0,
            chest: 100.0,
            waist: 85.0,
            hips: 95.0,
            hand: 16.0,
            recorded_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("person_card_id").is_none());
        assert_eq!(json["recorded_at"], "1970-01-01T00:00:00Z");
    }
}
