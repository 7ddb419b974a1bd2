//! Event domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::DomainError;
use crate::models::user::{first_message, message_of};

/// Message returned when any event field is absent or blank.
pub const EVENT_FIELDS_REQUIRED: &str =
    "All fields (title, dateTime, location, capacity) are required";

/// Represents an event that users can register for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub date_time: DateTime<Utc>,
    pub location: String,
    pub capacity: i32,
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Whether the event has already started relative to `now`.
    ///
    /// An event starting exactly at `now` counts as started.
    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        self.date_time <= now
    }
}

/// Validated input for creating or replacing an event.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub title: String,
    pub date_time: DateTime<Utc>,
    pub location: String,
    pub capacity: i32,
}

/// Capacity as sent by clients: either a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CapacityInput {
    Number(serde_json::Number),
    Text(String),
}

impl CapacityInput {
    /// Integer value of the capacity, if it has one.
    ///
    /// Fractional numbers are truncated toward zero.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            CapacityInput::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                    .map(|f| f.trunc() as i64)
            }),
            CapacityInput::Text(s) => s.trim().parse::<i64>().ok(),
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, CapacityInput::Text(s) if s.trim().is_empty())
    }
}

/// Request payload for creating or replacing an event.
///
/// Updates replace every field, so the same payload and rules apply to both.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    #[validate(length(max = 255, message = "Title must be at most 255 characters"))]
    pub title: Option<String>,

    pub date_time: Option<String>,

    #[validate(length(max = 255, message = "Location must be at most 255 characters"))]
    pub location: Option<String>,

    pub capacity: Option<CapacityInput>,
}

impl EventPayload {
    /// Checks field lengths, presence, capacity bounds and date format, in that order.
    pub fn into_new_event(self) -> Result<NewEvent, DomainError> {
        self.validate()
            .map_err(|e| DomainError::InvalidInput(first_message(&e)))?;

        let title = non_blank(self.title);
        let date_time = non_blank(self.date_time);
        let location = non_blank(self.location);
        let capacity = self.capacity.filter(|c| !c.is_blank());

        let (Some(title), Some(date_time), Some(location), Some(capacity)) =
            (title, date_time, location, capacity)
        else {
            return Err(DomainError::MissingField(EVENT_FIELDS_REQUIRED.to_string()));
        };

        let capacity = capacity.as_integer().ok_or_else(|| {
            DomainError::InvalidCapacity("Capacity must be a positive number".to_string())
        })?;
        shared::validation::validate_capacity(capacity)
            .map_err(|e| DomainError::InvalidCapacity(message_of(&e)))?;

        let date_time = shared::validation::parse_event_date_time(&date_time)
            .map_err(|e| DomainError::InvalidDate(message_of(&e)))?;

        Ok(NewEvent {
            title,
            date_time,
            location,
            // Bounded by validate_capacity above.
            capacity: capacity as i32,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Response payload for event operations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: Uuid,
    pub title: String,
    pub date_time: DateTime<Utc>,
    pub location: String,
    pub capacity: i32,
}

impl From<Event> for EventResponse {
    fn from(e: Event) -> Self {
        Self {
            id: e.id,
            title: e.title,
            date_time: e.date_time,
            location: e.location,
            capacity: e.capacity,
        }
    }
}

/// A user registered for an event, as listed in event details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub registered_at: DateTime<Utc>,
}

/// Event details including the users registered for it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetailsResponse {
    pub id: Uuid,
    pub title: String,
    pub date_time: DateTime<Utc>,
    pub location: String,
    pub capacity: i32,
    pub registered_users: Vec<RegisteredUser>,
}

impl EventDetailsResponse {
    pub fn new(event: Event, registered_users: Vec<RegisteredUser>) -> Self {
        Self {
            id: event.id,
            title: event.title,
            date_time: event.date_time,
            location: event.location,
            capacity: event.capacity,
            registered_users,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn payload(value: serde_json::Value) -> EventPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_event_payload_valid() {
        let event = payload(json!({
            "title": "Launch",
            "dateTime": "2030-01-15T18:00:00Z",
            "location": "HQ",
            "capacity": 2
        }))
        .into_new_event()
        .unwrap();

        assert_eq!(event.title, "Launch");
        assert_eq!(event.location, "HQ");
        assert_eq!(event.capacity, 2);
        assert_eq!(
            event.date_time,
            Utc.with_ymd_and_hms(2030, 1, 15, 18, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_event_payload_capacity_as_string() {
        let event = payload(json!({
            "title": "Meetup",
            "dateTime": "2030-01-15T18:00:00Z",
            "location": "Library",
            "capacity": "25"
        }))
        .into_new_event()
        .unwrap();
        assert_eq!(event.capacity, 25);
    }

    #[test]
    fn test_event_payload_missing_fields() {
        let err = payload(json!({
            "title": "Launch",
            "location": "HQ",
            "capacity": 10
        }))
        .into_new_event()
        .unwrap_err();
        assert_eq!(err, DomainError::MissingField(EVENT_FIELDS_REQUIRED.into()));

        let err = payload(json!({
            "title": "   ",
            "dateTime": "2030-01-15T18:00:00Z",
            "location": "HQ",
            "capacity": 10
        }))
        .into_new_event()
        .unwrap_err();
        assert!(matches!(err, DomainError::MissingField(_)));
    }

    #[test]
    fn test_event_payload_capacity_bounds() {
        let base = |capacity: serde_json::Value| {
            payload(json!({
                "title": "Launch",
                "dateTime": "2030-01-15T18:00:00Z",
                "location": "HQ",
                "capacity": capacity
            }))
            .into_new_event()
        };

        assert_eq!(
            base(json!(0)).unwrap_err(),
            DomainError::InvalidCapacity("Capacity must be a positive number".into())
        );
        assert_eq!(
            base(json!(-3)).unwrap_err(),
            DomainError::InvalidCapacity("Capacity must be a positive number".into())
        );
        assert_eq!(
            base(json!(1001)).unwrap_err(),
            DomainError::InvalidCapacity("Capacity cannot exceed 1000".into())
        );
        assert_eq!(
            base(json!("lots")).unwrap_err(),
            DomainError::InvalidCapacity("Capacity must be a positive number".into())
        );
        assert_eq!(base(json!(1000)).unwrap().capacity, 1000);
        assert_eq!(base(json!(1)).unwrap().capacity, 1);
    }

    #[test]
    fn test_event_payload_length_limits() {
        let with = |title: String, location: String| {
            payload(json!({
                "title": title,
                "dateTime": "2030-01-15T18:00:00Z",
                "location": location,
                "capacity": 10
            }))
            .into_new_event()
        };

        assert_eq!(
            with("t".repeat(256), "HQ".into()).unwrap_err(),
            DomainError::InvalidInput("Title must be at most 255 characters".into())
        );
        assert_eq!(
            with("Launch".into(), "l".repeat(300)).unwrap_err(),
            DomainError::InvalidInput("Location must be at most 255 characters".into())
        );
        assert_eq!(with("é".repeat(255), "l".repeat(255)).unwrap().title.chars().count(), 255);
    }

    #[test]
    fn test_event_payload_date_only() {
        let event = payload(json!({
            "title": "Launch",
            "dateTime": "2030-01-15",
            "location": "HQ",
            "capacity": 10
        }))
        .into_new_event()
        .unwrap();
        assert_eq!(event.date_time, Utc.with_ymd_and_hms(2030, 1, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_event_payload_invalid_date() {
        let err = payload(json!({
            "title": "Launch",
            "dateTime": "next friday",
            "location": "HQ",
            "capacity": 10
        }))
        .into_new_event()
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidDate(_)));
    }

    #[test]
    fn test_capacity_input_as_integer() {
        let number: CapacityInput = serde_json::from_value(json!(12)).unwrap();
        assert_eq!(number.as_integer(), Some(12));

        let fractional: CapacityInput = serde_json::from_value(json!(12.9)).unwrap();
        assert_eq!(fractional.as_integer(), Some(12));

        let text: CapacityInput = serde_json::from_value(json!(" 40 ")).unwrap();
        assert_eq!(text.as_integer(), Some(40));

        let junk: CapacityInput = serde_json::from_value(json!("forty")).unwrap();
        assert_eq!(junk.as_integer(), None);
    }

    #[test]
    fn test_event_has_started() {
        let now = Utc::now();
        let mut event = Event {
            id: Uuid::new_v4(),
            title: "Launch".to_string(),
            date_time: now + Duration::hours(1),
            location: "HQ".to_string(),
            capacity: 2,
            created_at: now,
        };
        assert!(!event.has_started(now));

        event.date_time = now;
        assert!(event.has_started(now));

        event.date_time = now - Duration::seconds(1);
        assert!(event.has_started(now));
    }

    #[test]
    fn test_event_response_serialization() {
        let event = Event {
            id: Uuid::nil(),
            title: "Launch".to_string(),
            date_time: Utc.with_ymd_and_hms(2030, 1, 15, 18, 0, 0).unwrap(),
            location: "HQ".to_string(),
            capacity: 2,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(EventResponse::from(event)).unwrap();
        assert_eq!(json["title"], "Launch");
        assert_eq!(json["dateTime"], "2030-01-15T18:00:00Z");
        assert_eq!(json["capacity"], 2);
        assert!(json.get("createdAt").is_none());
    }
}
