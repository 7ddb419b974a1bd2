//! Domain error taxonomy.

use thiserror::Error;

/// Broad classification of a [`DomainError`], used by the HTTP layer to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidState,
    Validation,
    Internal,
}

/// Errors produced by domain operations.
///
/// Messages are user-facing and are returned verbatim in API responses,
/// except for [`DomainError::Internal`] whose detail is diagnostic.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DomainError {
    #[error("Event not found")]
    EventNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("User is not registered for this event")]
    RegistrationNotFound,

    #[error("User already registered for this event")]
    DuplicateRegistration,

    #[error("Email already in use")]
    DuplicateEmail,

    #[error("Cannot register for past events")]
    EventInPast,

    #[error("Event is at full capacity")]
    EventFull,

    #[error("{0}")]
    MissingField(String),

    #[error("{0}")]
    InvalidCapacity(String),

    #[error("{0}")]
    InvalidDate(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Returns the taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::EventNotFound
            | DomainError::UserNotFound
            | DomainError::RegistrationNotFound => ErrorKind::NotFound,
            DomainError::DuplicateRegistration | DomainError::DuplicateEmail => {
                ErrorKind::Conflict
            }
            DomainError::EventInPast | DomainError::EventFull => ErrorKind::InvalidState,
            DomainError::MissingField(_)
            | DomainError::InvalidCapacity(_)
            | DomainError::InvalidDate(_)
            | DomainError::InvalidInput(_) => ErrorKind::Validation,
            DomainError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Short machine-readable label, used for metrics and logs.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::EventNotFound => "event_not_found",
            DomainError::UserNotFound => "user_not_found",
            DomainError::RegistrationNotFound => "registration_not_found",
            DomainError::DuplicateRegistration => "duplicate_registration",
            DomainError::DuplicateEmail => "duplicate_email",
            DomainError::EventInPast => "event_in_past",
            DomainError::EventFull => "event_full",
            DomainError::MissingField(_) => "missing_field",
            DomainError::InvalidCapacity(_) => "invalid_capacity",
            DomainError::InvalidDate(_) => "invalid_date",
            DomainError::InvalidInput(_) => "invalid_input",
            DomainError::Internal(_) => "internal_error",
        }
    }

    /// Wraps a storage-layer failure.
    pub fn internal(err: impl std::fmt::Display) -> Self {
        DomainError::Internal(err.to_string())
    }
}
