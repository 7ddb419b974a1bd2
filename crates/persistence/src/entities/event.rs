//! Event entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the events table.
#[derive(Debug, Clone, FromRow)]
pub struct EventEntity {
    pub id: Uuid,
    pub title: String,
    pub date_time: DateTime<Utc>,
    pub location: String,
    pub capacity: i32,
    pub created_at: DateTime<Utc>,
}

impl From<EventEntity> for domain::models::Event {
    fn from(entity: EventEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            date_time: entity.date_time,
            location: entity.location,
            capacity: entity.capacity,
            created_at: entity.created_at,
        }
    }
}

/// Event row joined with its registration count.
#[derive(Debug, Clone, FromRow)]
pub struct EventWithCountEntity {
    #[sqlx(flatten)]
    pub event: EventEntity,
    pub registration_count: i64,
}
