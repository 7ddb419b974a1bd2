//! PostgreSQL registration store.
//!
//! Registration and event updates serialize on the event row via
//! `SELECT ... FOR UPDATE`; the user row is held with `FOR KEY SHARE` so it
//! cannot be deleted while a registration referencing it is being inserted.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::models::{Event, NewEvent, Registration};
use domain::services::{RegistrationStore, RegistrationTransaction};
use domain::DomainError;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::entities::{EventEntity, EventWithCountEntity, RegistrationEntity};
use crate::metrics::QueryTimer;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const EVENT_FOREIGN_KEY: &str = "event_registrations_event_id_fkey";

/// Maps errors raised while writing registrations to domain errors.
fn map_registration_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION) => return DomainError::DuplicateRegistration,
            Some(FOREIGN_KEY_VIOLATION) => {
                return if db_err.constraint() == Some(EVENT_FOREIGN_KEY) {
                    DomainError::EventNotFound
                } else {
                    DomainError::UserNotFound
                };
            }
            _ => {}
        }
    }
    DomainError::internal(err)
}

/// Registration store backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PgRegistrationStore {
    pool: PgPool,
}

impl PgRegistrationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistrationStore for PgRegistrationStore {
    type Transaction = PgRegistrationTransaction;

    async fn begin(&self) -> Result<PgRegistrationTransaction, DomainError> {
        let tx = self.pool.begin().await.map_err(DomainError::internal)?;
        Ok(PgRegistrationTransaction { tx })
    }

    async fn event_with_registration_count(
        &self,
        event_id: Uuid,
    ) -> Result<Option<(Event, i64)>, DomainError> {
        let timer = QueryTimer::new("event_with_registration_count");
        let result = sqlx::query_as::<_, EventWithCountEntity>(
            r#"
            SELECT e.id, e.title, e.date_time, e.location, e.capacity, e.created_at,
                   COUNT(r.id) AS registration_count
            FROM events e
            LEFT JOIN event_registrations r ON r.event_id = e.id
            WHERE e.id = $1
            GROUP BY e.id
            "#,
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(result
            .map_err(DomainError::internal)?
            .map(|row| (row.event.into(), row.registration_count)))
    }

    async fn delete_registration(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, DomainError> {
        let timer = QueryTimer::new("delete_registration");
        let result = sqlx::query(
            r#"
            DELETE FROM event_registrations
            WHERE event_id = $1 AND user_id = $2
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .execute(&self.pool)
        .await;
        timer.record();

        Ok(result.map_err(DomainError::internal)?.rows_affected() > 0)
    }

    async fn upcoming_events(&self, now: DateTime<Utc>) -> Result<Vec<Event>, DomainError> {
        let timer = QueryTimer::new("find_upcoming_events");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT id, title, date_time, location, capacity, created_at
            FROM events
            WHERE date_time > $1
            ORDER BY date_time ASC, location ASC
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await;
        timer.record();

        Ok(result
            .map_err(DomainError::internal)?
            .into_iter()
            .map(Event::from)
            .collect())
    }
}

/// An open PostgreSQL transaction. Dropping it without commit rolls back.
pub struct PgRegistrationTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl RegistrationTransaction for PgRegistrationTransaction {
    async fn lock_event(&mut self, event_id: Uuid) -> Result<Option<Event>, DomainError> {
        let timer = QueryTimer::new("lock_event");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT id, title, date_time, location, capacity, created_at
            FROM events
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(event_id)
        .fetch_optional(&mut *self.tx)
        .await;
        timer.record();

        Ok(result.map_err(DomainError::internal)?.map(Event::from))
    }

    async fn lock_user(&mut self, user_id: Uuid) -> Result<bool, DomainError> {
        let timer = QueryTimer::new("lock_user");
        let result = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id
            FROM users
            WHERE id = $1
            FOR KEY SHARE
            "#,
        )
        .bind(user_id)
        .fetch_optional(&mut *self.tx)
        .await;
        timer.record();

        Ok(result.map_err(DomainError::internal)?.is_some())
    }

    async fn registration_exists(
        &mut self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, DomainError> {
        let timer = QueryTimer::new("registration_exists");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM event_registrations
                WHERE event_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_one(&mut *self.tx)
        .await;
        timer.record();

        result.map_err(DomainError::internal)
    }

    async fn count_registrations(&mut self, event_id: Uuid) -> Result<i64, DomainError> {
        let timer = QueryTimer::new("count_registrations");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM event_registrations
            WHERE event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_one(&mut *self.tx)
        .await;
        timer.record();

        result.map_err(DomainError::internal)
    }

    async fn insert_registration(
        &mut self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<Registration, DomainError> {
        let timer = QueryTimer::new("insert_registration");
        let result = sqlx::query_as::<_, RegistrationEntity>(
            r#"
            INSERT INTO event_registrations (event_id, user_id)
            VALUES ($1, $2)
            RETURNING id, event_id, user_id, registered_at
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_one(&mut *self.tx)
        .await;
        timer.record();

        result.map(Registration::from).map_err(map_registration_error)
    }

    async fn update_event(
        &mut self,
        event_id: Uuid,
        event: &NewEvent,
    ) -> Result<Event, DomainError> {
        let timer = QueryTimer::new("update_event");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            UPDATE events
            SET title = $2, date_time = $3, location = $4, capacity = $5
            WHERE id = $1
            RETURNING id, title, date_time, location, capacity, created_at
            "#,
        )
        .bind(event_id)
        .bind(&event.title)
        .bind(event.date_time)
        .bind(&event.location)
        .bind(event.capacity)
        .fetch_optional(&mut *self.tx)
        .await;
        timer.record();

        result
            .map_err(DomainError::internal)?
            .map(Event::from)
            .ok_or(DomainError::EventNotFound)
    }

    async fn commit(self) -> Result<(), DomainError> {
        self.tx.commit().await.map_err(DomainError::internal)
    }

    async fn rollback(self) -> Result<(), DomainError> {
        self.tx.rollback().await.map_err(DomainError::internal)
    }
}
