use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};

use crate::error::{AppError, AppResult};

/// Layout used for every stored workout timestamp (SQLite `CURRENT_TIMESTAMP`).
pub const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const ACCEPTED_NAIVE_FORMATS: [&str; 3] = [
    STORAGE_FORMAT,
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Parses a stored timestamp. RFC 3339 values with an offset are normalised to UTC.
pub fn parse_timestamp(value: &str) -> AppResult<NaiveDateTime> {
    let trimmed = value.trim();

    for format in ACCEPTED_NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed);
        }
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.with_timezone(&Utc).naive_utc())
        .map_err(|_| AppError::malformed_timestamp(value))
}

pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(STORAGE_FORMAT).to_string()
}

pub fn now_timestamp() -> String {
    format_timestamp(&Local::now().naive_local())
}

pub fn parse_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| AppError::validation(format!("date must be YYYY-MM-DD, got '{value}'")))
}

/// Whole days elapsed from `start` to `end`, truncated toward zero.
pub fn whole_days_between(start: &NaiveDateTime, end: &NaiveDateTime) -> i64 {
    (*end - *start).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_storage_format() {
        let parsed = parse_timestamp("2024-05-01 07:30:00").unwrap();
        assert_eq!(format_timestamp(&parsed), "2024-05-01 07:30:00");
    }

    #[test]
    fn parses_iso_with_fraction() {
        let parsed = parse_timestamp("2024-05-01T07:30:00.123456").unwrap();
        assert_eq!(format_timestamp(&parsed), "2024-05-01 07:30:00");
    }

    #[test]
    fn rfc3339_is_normalised_to_utc() {
        let parsed = parse_timestamp("2024-05-01T09:30:00+02:00").unwrap();
        assert_eq!(format_timestamp(&parsed), "2024-05-01 07:30:00");
    }

    #[test]
    fn rejects_garbage() {
        let result = parse_timestamp("yesterday-ish");
        assert!(matches!(result, Err(AppError::MalformedTimestamp { .. })));
    }

    #[test]
    fn partial_days_are_truncated() {
        let start = parse_timestamp("2024-05-01 20:00:00").unwrap();
        let end = parse_timestamp("2024-05-03 08:00:00").unwrap();
        assert_eq!(whole_days_between(&start, &end), 1);
    }

    #[test]
    fn rejects_bad_date() {
        assert!(parse_date("2024-13-01").is_err());
        assert_eq!(
            parse_date("2024-12-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 1).unwrap()
        );
    }
}
