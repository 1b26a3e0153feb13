use time::{macros::format_description, Date, OffsetDateTime};

use crate::error::ApiError;

/// Parses a `YYYY-MM-DD` query parameter.
pub fn parse_ymd(s: &str) -> Result<Date, ApiError> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(s, format)
        .map_err(|_| ApiError::validation("invalid date format, expected YYYY-MM-DD"))
}

/// Resolves an optional date parameter, falling back to today (UTC).
pub fn date_or_today(raw: Option<&str>) -> Result<Date, ApiError> {
    match raw {
        Some(s) => parse_ymd(s),
        None => Ok(OffsetDateTime::now_utc().date()),
    }
}

pub fn default_limit() -> i64 {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_date() {
        let d = parse_ymd("2024-01-15").unwrap();
        assert_eq!(d.to_string(), "2024-01-15");
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_ymd("1234").unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn rejects_out_of_range_components() {
        assert!(parse_ymd("2024-13-40").is_err());
    }

    #[test]
    fn missing_date_defaults_to_today() {
        let d = date_or_today(None).unwrap();
        assert_eq!(d, OffsetDateTime::now_utc().date());
    }
}
