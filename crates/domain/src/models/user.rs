//! User domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::DomainError;

/// Represents a user in the system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating or replacing a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

/// Request payload for creating or updating a user.
///
/// Fields are optional at the wire level so that a missing field is reported
/// as a validation failure rather than a deserialization failure.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 255, message = "Email must be at most 255 characters"))]
    pub email: Option<String>,
}

impl UserPayload {
    /// Checks presence and format of every field and returns the normalized input.
    pub fn into_new_user(self) -> Result<NewUser, DomainError> {
        self.validate()
            .map_err(|e| DomainError::InvalidInput(first_message(&e)))?;

        let name = self.name.map(|n| n.trim().to_string()).unwrap_or_default();
        let email = self.email.map(|e| e.trim().to_string()).unwrap_or_default();

        if name.is_empty() || email.is_empty() {
            return Err(DomainError::MissingField(
                "All fields (name, email) are required".to_string(),
            ));
        }

        shared::validation::validate_email_address(&email)
            .map_err(|e| DomainError::InvalidInput(message_of(&e)))?;

        Ok(NewUser {
            name,
            email: email.to_lowercase(),
        })
    }
}

/// Response payload for user operations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

pub(crate) fn message_of(err: &validator::ValidationError) -> String {
    err.message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| err.code.to_string())
}

pub(crate) fn first_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .map(message_of)
        .next()
        .unwrap_or_else(|| "Invalid request".to_string())
}
