//! Registration entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the event_registrations table.
#[derive(Debug, Clone, FromRow)]
pub struct RegistrationEntity {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub registered_at: DateTime<Utc>,
}

impl From<RegistrationEntity> for domain::models::Registration {
    fn from(entity: RegistrationEntity) -> Self {
        Self {
            id: entity.id,
            event_id: entity.event_id,
            user_id: entity.user_id,
            registered_at: entity.registered_at,
        }
    }
}

/// A registered user as listed in event details.
#[derive(Debug, Clone, FromRow)]
pub struct RegisteredUserEntity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub registered_at: DateTime<Utc>,
}

impl From<RegisteredUserEntity> for domain::models::RegisteredUser {
    fn from(entity: RegisteredUserEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            email: entity.email,
            registered_at: entity.registered_at,
        }
    }
}
