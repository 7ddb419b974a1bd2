//! Event registration and cancellation.

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DomainError;
use crate::models::Registration;
use crate::services::store::{finish, RegistrationStore, RegistrationTransaction};

/// Registers a user for an event.
///
/// Runs as one transaction. The event row lock is taken first and held until
/// commit or rollback, so concurrent registrations for the same event are
/// serialized and the capacity check cannot race with another insert.
///
/// Checks, in order: event exists, user exists, event has not started,
/// user is not already registered, event is not full.
///
/// `clock` is read once the locks are held, since waiting for the event lock
/// can outlast the event's start.
pub async fn register<S, C>(
    store: &S,
    event_id: Uuid,
    user_id: Uuid,
    clock: C,
) -> Result<Registration, DomainError>
where
    S: RegistrationStore,
    C: Fn() -> DateTime<Utc> + Send + Sync,
{
    let mut tx = store.begin().await?;
    let result = register_locked(&mut tx, event_id, user_id, &clock).await;
    let result = finish(tx, result).await;

    match &result {
        Ok(registration) => info!(
            registration_id = %registration.id,
            event_id = %event_id,
            user_id = %user_id,
            "User registered for event"
        ),
        Err(err) => debug!(
            event_id = %event_id,
            user_id = %user_id,
            reason = err.code(),
            "Registration rejected"
        ),
    }

    result
}

async fn register_locked<T, C>(
    tx: &mut T,
    event_id: Uuid,
    user_id: Uuid,
    clock: &C,
) -> Result<Registration, DomainError>
where
    T: RegistrationTransaction,
    C: Fn() -> DateTime<Utc> + Send + Sync,
{
    let event = tx
        .lock_event(event_id)
        .await?
        .ok_or(DomainError::EventNotFound)?;

    if !tx.lock_user(user_id).await? {
        return Err(DomainError::UserNotFound);
    }

    if event.has_started(clock()) {
        return Err(DomainError::EventInPast);
    }

    if tx.registration_exists(event_id, user_id).await? {
        return Err(DomainError::DuplicateRegistration);
    }

    let registered = tx.count_registrations(event_id).await?;
    if registered >= i64::from(event.capacity) {
        return Err(DomainError::EventFull);
    }

    tx.insert_registration(event_id, user_id).await
}

/// Cancels a user's registration for an event.
///
/// Not idempotent: cancelling a registration that does not exist (including
/// one that was just cancelled) fails with [`DomainError::RegistrationNotFound`].
pub async fn cancel<S>(store: &S, event_id: Uuid, user_id: Uuid) -> Result<(), DomainError>
where
    S: RegistrationStore,
{
    if store.delete_registration(event_id, user_id).await? {
        info!(event_id = %event_id, user_id = %user_id, "Registration cancelled");
        Ok(())
    } else {
        Err(DomainError::RegistrationNotFound)
    }
}
