//! Event repository for database operations.

use domain::models::NewEvent;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{EventEntity, RegisteredUserEntity};
use crate::metrics::QueryTimer;

/// Repository for event-related database operations.
///
/// Updates go through the registration store so they share the event row lock.
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Creates a new EventRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event.
    pub async fn create(&self, event: &NewEvent) -> Result<EventEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_event");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            INSERT INTO events (title, date_time, location, capacity)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, date_time, location, capacity, created_at
            "#,
        )
        .bind(&event.title)
        .bind(event.date_time)
        .bind(&event.location)
        .bind(event.capacity)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List all events ordered by start time.
    pub async fn find_all(&self) -> Result<Vec<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_all_events");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT id, title, date_time, location, capacity, created_at
            FROM events
            ORDER BY date_time ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an event by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_event_by_id");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT id, title, date_time, location, capacity, created_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Users registered for an event, in registration order.
    pub async fn find_registered_users(
        &self,
        event_id: Uuid,
    ) -> Result<Vec<RegisteredUserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_registered_users");
        let result = sqlx::query_as::<_, RegisteredUserEntity>(
            r#"
            SELECT u.id, u.name, u.email, r.registered_at
            FROM event_registrations r
            JOIN users u ON u.id = r.user_id
            WHERE r.event_id = $1
            ORDER BY r.registered_at ASC, r.id ASC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete an event. Its registrations are removed by cascade.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_event");
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::test_support::{recorded_queries, unreachable_pool};

    #[test]
    fn test_failed_delete_still_records_duration() {
        let queries = recorded_queries(|| async {
            let repo = EventRepository::new(unreachable_pool());
            assert!(repo.delete(Uuid::new_v4()).await.is_err());
        });
        assert_eq!(queries, vec!["delete_event".to_string()]);
    }
}
