//! Registration domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// One user's registration for one event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub registered_at: DateTime<Utc>,
}

/// Request payload for registering or cancelling a registration.
///
/// Identifiers are accepted as strings and parsed explicitly so that a missing
/// or malformed identifier yields a validation failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub event_id: Option<String>,
    pub user_id: Option<String>,
}

impl RegistrationRequest {
    /// Returns `(event_id, user_id)` once both are present and well-formed.
    pub fn ids(&self) -> Result<(Uuid, Uuid), DomainError> {
        let event_id = self.event_id.as_deref().map(str::trim).unwrap_or_default();
        let user_id = self.user_id.as_deref().map(str::trim).unwrap_or_default();

        if event_id.is_empty() || user_id.is_empty() {
            return Err(DomainError::MissingField(
                "Event ID and User ID are required".to_string(),
            ));
        }

        let event_id = Uuid::parse_str(event_id)
            .map_err(|_| DomainError::InvalidInput("Invalid event ID".to_string()))?;
        let user_id = Uuid::parse_str(user_id)
            .map_err(|_| DomainError::InvalidInput("Invalid user ID".to_string()))?;

        Ok((event_id, user_id))
    }
}

/// Response payload for a successful registration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub registration_id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub registered_at: DateTime<Utc>,
}

impl From<Registration> for RegistrationResponse {
    fn from(r: Registration) -> Self {
        Self {
            registration_id: r.id,
            event_id: r.event_id,
            user_id: r.user_id,
            registered_at: r.registered_at,
        }
    }
}
