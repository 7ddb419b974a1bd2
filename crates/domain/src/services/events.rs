//! Event-level services: statistics, upcoming listing and capacity-safe updates.

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::error::DomainError;
use crate::models::{Event, EventStats, NewEvent};
use crate::services::store::{finish, RegistrationStore, RegistrationTransaction};

/// Capacity-fill statistics for an event.
pub async fn event_stats<S>(store: &S, event_id: Uuid) -> Result<EventStats, DomainError>
where
    S: RegistrationStore,
{
    let (event, total) = store
        .event_with_registration_count(event_id)
        .await?
        .ok_or(DomainError::EventNotFound)?;
    Ok(EventStats::from_count(&event, total))
}

/// Events starting strictly after `now`, ordered by date/time then location.
pub async fn upcoming_events<S>(store: &S, now: DateTime<Utc>) -> Result<Vec<Event>, DomainError>
where
    S: RegistrationStore,
{
    store.upcoming_events(now).await
}

/// Replaces an event's fields.
///
/// Takes the same event row lock as registration, so a capacity reduction is
/// checked against a registration count that cannot change underneath it.
/// Capacity may not drop below the number of existing registrations.
pub async fn replace_event<S>(
    store: &S,
    event_id: Uuid,
    event: &NewEvent,
) -> Result<Event, DomainError>
where
    S: RegistrationStore,
{
    let mut tx = store.begin().await?;
    let result = replace_locked(&mut tx, event_id, event).await;
    let updated = finish(tx, result).await?;

    info!(event_id = %updated.id, capacity = updated.capacity, "Event updated");
    Ok(updated)
}

async fn replace_locked<T>(
    tx: &mut T,
    event_id: Uuid,
    event: &NewEvent,
) -> Result<Event, DomainError>
where
    T: RegistrationTransaction,
{
    tx.lock_event(event_id)
        .await?
        .ok_or(DomainError::EventNotFound)?;

    let registered = tx.count_registrations(event_id).await?;
    if registered > i64::from(event.capacity) {
        return Err(DomainError::InvalidCapacity(format!(
            "Capacity cannot be lower than the current number of registrations ({})",
            registered
        )));
    }

    tx.update_event(event_id, event).await
}
