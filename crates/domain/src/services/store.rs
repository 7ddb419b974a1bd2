//! Store abstractions used by the registration services.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use crate::error::DomainError;
use crate::models::{Event, NewEvent, Registration};

/// Entry point to a store that can run registration transactions.
///
/// Cross-request coordination must come from the store itself (row locks in
/// PostgreSQL), never from state held by a single process.
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    type Transaction: RegistrationTransaction;

    /// Opens a new transaction.
    async fn begin(&self) -> Result<Self::Transaction, DomainError>;

    /// Loads an event together with its current registration count.
    async fn event_with_registration_count(
        &self,
        event_id: Uuid,
    ) -> Result<Option<(Event, i64)>, DomainError>;

    /// Deletes the registration for `(event_id, user_id)`.
    /// Returns whether a row was deleted.
    async fn delete_registration(&self, event_id: Uuid, user_id: Uuid)
        -> Result<bool, DomainError>;

    /// Events strictly after `now`, ordered by date/time then location.
    async fn upcoming_events(&self, now: DateTime<Utc>) -> Result<Vec<Event>, DomainError>;
}

/// Operations available inside a registration transaction.
///
/// Locks taken by a transaction are held until it is committed, rolled back
/// or dropped.
#[async_trait]
pub trait RegistrationTransaction: Send + Sized {
    /// Takes an exclusive lock on the event row and returns it, if it exists.
    async fn lock_event(&mut self, event_id: Uuid) -> Result<Option<Event>, DomainError>;

    /// Locks the user row against deletion. Returns whether the user exists.
    async fn lock_user(&mut self, user_id: Uuid) -> Result<bool, DomainError>;

    async fn registration_exists(
        &mut self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, DomainError>;

    async fn count_registrations(&mut self, event_id: Uuid) -> Result<i64, DomainError>;

    /// Inserts a registration with a store-assigned id and timestamp.
    async fn insert_registration(
        &mut self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<Registration, DomainError>;

    /// Replaces every mutable field of an event.
    async fn update_event(&mut self, event_id: Uuid, event: &NewEvent)
        -> Result<Event, DomainError>;

    async fn commit(self) -> Result<(), DomainError>;

    async fn rollback(self) -> Result<(), DomainError>;
}

/// Commits on success and rolls back on failure.
///
/// A failed rollback is logged; the original error is the one returned.
pub(crate) async fn finish<T, R>(tx: T, result: Result<R, DomainError>) -> Result<R, DomainError>
where
    T: RegistrationTransaction,
{
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(
                    error = %rollback_err,
                    original_error = %err,
                    "Rollback failed"
                );
            }
            Err(err)
        }
    }
}
