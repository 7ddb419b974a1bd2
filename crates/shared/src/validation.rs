//! Common validation utilities.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use validator::{ValidateEmail, ValidationError};

/// Smallest capacity an event may declare.
pub const MIN_EVENT_CAPACITY: i64 = 1;

/// Largest capacity an event may declare.
pub const MAX_EVENT_CAPACITY: i64 = 1000;

/// Validates that an event capacity is within the allowed range (1 to 1000).
pub fn validate_capacity(capacity: i64) -> Result<(), ValidationError> {
    if capacity < MIN_EVENT_CAPACITY {
        let mut err = ValidationError::new("capacity_positive");
        err.message = Some("Capacity must be a positive number".into());
        return Err(err);
    }

    if capacity > MAX_EVENT_CAPACITY {
        let mut err = ValidationError::new("capacity_max");
        err.message = Some(format!("Capacity cannot exceed {}", MAX_EVENT_CAPACITY).into());
        return Err(err);
    }

    Ok(())
}

/// Validates an email address.
pub fn validate_email_address(email: &str) -> Result<(), ValidationError> {
    if email.validate_email() {
        Ok(())
    } else {
        let mut err = ValidationError::new("email");
        err.message = Some("Invalid email format".into());
        Err(err)
    }
}

/// Parses an event date/time.
///
/// Accepts RFC 3339 timestamps (`2025-12-31T18:00:00Z`, `2025-12-31T18:00:00+02:00`).
/// Timestamps without an offset (`2025-12-31T18:00:00`) are interpreted as UTC,
/// and a bare date (`2025-12-31`) as midnight UTC.
pub fn parse_event_date_time(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    let value = value.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }

    if let Some(midnight) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc());
    }

    let mut err = ValidationError::new("date_time_format");
    err.message =
        Some("Invalid date format. Use ISO format (e.g., 2025-12-31T18:00:00Z)".into());
    Err(err)
}
