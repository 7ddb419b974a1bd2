//! In-memory registration store.
//!
//! Mirrors the PostgreSQL store closely enough to exercise the registration
//! rules without a database: per-event locks are held for the whole
//! transaction, writes become visible only on commit, the `(event, user)`
//! pair is unique, and deleting a user or event cascades to its registrations.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::error::DomainError;
use crate::models::{Event, NewEvent, NewUser, Registration, User};
use crate::services::store::{RegistrationStore, RegistrationTransaction};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    events: HashMap<Uuid, Event>,
    registrations: Vec<Registration>,
}

impl Tables {
    fn is_registered(&self, event_id: Uuid, user_id: Uuid) -> bool {
        self.registrations
            .iter()
            .any(|r| r.event_id == event_id && r.user_id == user_id)
    }

    fn count_for(&self, event_id: Uuid) -> i64 {
        self.registrations
            .iter()
            .filter(|r| r.event_id == event_id)
            .count() as i64
    }
}

#[derive(Debug, Default)]
struct Shared {
    tables: Mutex<Tables>,
    row_locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl Shared {
    /// Returns the lock for a row id. Entries nobody holds or waits on are
    /// dropped first, so the map only tracks rows currently in use.
    async fn row_lock(&self, id: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self.row_locks.lock().await;
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

/// Registration store kept entirely in process memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistrationStore {
    shared: Arc<Shared>,
}

impl InMemoryRegistrationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a user. Emails are unique.
    pub async fn insert_user(&self, user: NewUser) -> Result<User, DomainError> {
        let mut tables = self.shared.tables.lock().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(DomainError::DuplicateEmail);
        }

        let user = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    /// Adds an event.
    pub async fn insert_event(&self, event: NewEvent) -> Result<Event, DomainError> {
        let event = Event {
            id: Uuid::new_v4(),
            title: event.title,
            date_time: event.date_time,
            location: event.location,
            capacity: event.capacity,
            created_at: Utc::now(),
        };
        self.shared
            .tables
            .lock()
            .await
            .events
            .insert(event.id, event.clone());
        Ok(event)
    }

    /// Deletes a user and its registrations. Returns whether the user existed.
    pub async fn delete_user(&self, user_id: Uuid) -> bool {
        let lock = self.shared.row_lock(user_id).await;
        let _guard = lock.lock().await;

        let mut tables = self.shared.tables.lock().await;
        tables.registrations.retain(|r| r.user_id != user_id);
        tables.users.remove(&user_id).is_some()
    }

    /// Deletes an event and its registrations. Returns whether the event existed.
    pub async fn delete_event(&self, event_id: Uuid) -> bool {
        let lock = self.shared.row_lock(event_id).await;
        let _guard = lock.lock().await;

        let mut tables = self.shared.tables.lock().await;
        tables.registrations.retain(|r| r.event_id != event_id);
        tables.events.remove(&event_id).is_some()
    }

    /// Committed registrations for an event, oldest first.
    pub async fn registrations_for_event(&self, event_id: Uuid) -> Vec<Registration> {
        let tables = self.shared.tables.lock().await;
        let mut registrations: Vec<Registration> = tables
            .registrations
            .iter()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect();
        registrations.sort_by_key(|r| r.registered_at);
        registrations
    }
}

#[async_trait]
impl RegistrationStore for InMemoryRegistrationStore {
    type Transaction = InMemoryTransaction;

    async fn begin(&self) -> Result<InMemoryTransaction, DomainError> {
        Ok(InMemoryTransaction {
            shared: self.shared.clone(),
            guards: Vec::new(),
            locked: HashSet::new(),
            pending_registrations: Vec::new(),
            pending_events: HashMap::new(),
        })
    }

    async fn event_with_registration_count(
        &self,
        event_id: Uuid,
    ) -> Result<Option<(Event, i64)>, DomainError> {
        let tables = self.shared.tables.lock().await;
        Ok(tables
            .events
            .get(&event_id)
            .map(|event| (event.clone(), tables.count_for(event_id))))
    }

    async fn delete_registration(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, DomainError> {
        let mut tables = self.shared.tables.lock().await;
        let before = tables.registrations.len();
        tables
            .registrations
            .retain(|r| !(r.event_id == event_id && r.user_id == user_id));
        Ok(tables.registrations.len() < before)
    }

    async fn upcoming_events(&self, now: DateTime<Utc>) -> Result<Vec<Event>, DomainError> {
        let tables = self.shared.tables.lock().await;
        let mut events: Vec<Event> = tables
            .events
            .values()
            .filter(|e| e.date_time > now)
            .cloned()
            .collect();
        events.sort_by(|a, b| {
            a.date_time
                .cmp(&b.date_time)
                .then_with(|| a.location.cmp(&b.location))
        });
        Ok(events)
    }
}

/// Transaction over an [`InMemoryRegistrationStore`].
///
/// Row locks are released when the transaction is committed, rolled back or dropped.
#[derive(Debug)]
pub struct InMemoryTransaction {
    shared: Arc<Shared>,
    guards: Vec<OwnedMutexGuard<()>>,
    locked: HashSet<Uuid>,
    pending_registrations: Vec<Registration>,
    pending_events: HashMap<Uuid, Event>,
}

impl InMemoryTransaction {
    async fn acquire(&mut self, id: Uuid) {
        if !self.locked.contains(&id) {
            let lock = self.shared.row_lock(id).await;
            self.guards.push(lock.lock_owned().await);
            self.locked.insert(id);
        }
    }

    fn pending_for(&self, event_id: Uuid) -> impl Iterator<Item = &Registration> {
        self.pending_registrations
            .iter()
            .filter(move |r| r.event_id == event_id)
    }
}

#[async_trait]
impl RegistrationTransaction for InMemoryTransaction {
    async fn lock_event(&mut self, event_id: Uuid) -> Result<Option<Event>, DomainError> {
        self.acquire(event_id).await;

        if let Some(event) = self.pending_events.get(&event_id) {
            return Ok(Some(event.clone()));
        }
        Ok(self.shared.tables.lock().await.events.get(&event_id).cloned())
    }

    async fn lock_user(&mut self, user_id: Uuid) -> Result<bool, DomainError> {
        self.acquire(user_id).await;
        Ok(self.shared.tables.lock().await.users.contains_key(&user_id))
    }

    async fn registration_exists(
        &mut self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, DomainError> {
        let pending = self.pending_for(event_id).any(|r| r.user_id == user_id);
        Ok(pending || self.shared.tables.lock().await.is_registered(event_id, user_id))
    }

    async fn count_registrations(&mut self, event_id: Uuid) -> Result<i64, DomainError> {
        let pending = self.pending_for(event_id).count() as i64;
        Ok(pending + self.shared.tables.lock().await.count_for(event_id))
    }

    async fn insert_registration(
        &mut self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<Registration, DomainError> {
        if self.registration_exists(event_id, user_id).await? {
            return Err(DomainError::DuplicateRegistration);
        }

        {
            let tables = self.shared.tables.lock().await;
            if !tables.events.contains_key(&event_id) {
                return Err(DomainError::EventNotFound);
            }
            if !tables.users.contains_key(&user_id) {
                return Err(DomainError::UserNotFound);
            }
        }

        let registration = Registration {
            id: Uuid::new_v4(),
            event_id,
            user_id,
            registered_at: Utc::now(),
        };
        self.pending_registrations.push(registration.clone());
        Ok(registration)
    }

    async fn update_event(
        &mut self,
        event_id: Uuid,
        event: &NewEvent,
    ) -> Result<Event, DomainError> {
        let current = self
            .lock_event(event_id)
            .await?
            .ok_or(DomainError::EventNotFound)?;

        let updated = Event {
            title: event.title.clone(),
            date_time: event.date_time,
            location: event.location.clone(),
            capacity: event.capacity,
            ..current
        };
        self.pending_events.insert(event_id, updated.clone());
        Ok(updated)
    }

    async fn commit(self) -> Result<(), DomainError> {
        let mut tables = self.shared.tables.lock().await;

        // All-or-nothing: check constraints before applying anything.
        let mut seen = HashSet::new();
        for r in &self.pending_registrations {
            if tables.is_registered(r.event_id, r.user_id) || !seen.insert((r.event_id, r.user_id))
            {
                return Err(DomainError::DuplicateRegistration);
            }
            if !tables.events.contains_key(&r.event_id) {
                return Err(DomainError::EventNotFound);
            }
            if !tables.users.contains_key(&r.user_id) {
                return Err(DomainError::UserNotFound);
            }
        }

        for (id, event) in self.pending_events {
            if let Some(slot) = tables.events.get_mut(&id) {
                *slot = event;
            }
        }
        tables.registrations.extend(self.pending_registrations);
        Ok(())
    }

    async fn rollback(self) -> Result<(), DomainError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_event(capacity: i32) -> NewEvent {
        NewEvent {
            title: "Launch".to_string(),
            date_time: Utc::now() + Duration::hours(1),
            location: "HQ".to_string(),
            capacity,
        }
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Tester".to_string(),
            email: email.to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_user_rejects_duplicate_email() {
        let store = InMemoryRegistrationStore::new();
        store.insert_user(new_user("a@example.com")).await.unwrap();
        let err = store.insert_user(new_user("a@example.com")).await.unwrap_err();
        assert_eq!(err, DomainError::DuplicateEmail);
    }

    #[tokio::test]
    async fn test_uncommitted_registration_is_invisible() {
        let store = InMemoryRegistrationStore::new();
        let event = store.insert_event(new_event(5)).await.unwrap();
        let user = store.insert_user(new_user("a@example.com")).await.unwrap();

        let mut tx = store.begin().await.unwrap();
        tx.lock_event(event.id).await.unwrap();
        tx.insert_registration(event.id, user.id).await.unwrap();
        assert_eq!(tx.count_registrations(event.id).await.unwrap(), 1);
        assert!(store.registrations_for_event(event.id).await.is_empty());

        tx.rollback().await.unwrap();
        assert!(store.registrations_for_event(event.id).await.is_empty());
    }

    #[tokio::test]
    async fn test_commit_publishes_registration() {
        let store = InMemoryRegistrationStore::new();
        let event = store.insert_event(new_event(5)).await.unwrap();
        let user = store.insert_user(new_user("a@example.com")).await.unwrap();

        let mut tx = store.begin().await.unwrap();
        tx.lock_event(event.id).await.unwrap();
        tx.insert_registration(event.id, user.id).await.unwrap();
        tx.commit().await.unwrap();

        let registrations = store.registrations_for_event(event.id).await;
        assert_eq!(registrations.len(), 1);
        assert_eq!(registrations[0].user_id, user.id);
    }

    #[tokio::test]
    async fn test_event_lock_blocks_second_transaction() {
        let store = InMemoryRegistrationStore::new();
        let event = store.insert_event(new_event(5)).await.unwrap();

        let mut first = store.begin().await.unwrap();
        first.lock_event(event.id).await.unwrap();

        let mut second = store.begin().await.unwrap();
        let blocked =
            tokio::time::timeout(std::time::Duration::from_millis(50), second.lock_event(event.id))
                .await;
        assert!(blocked.is_err(), "second lock should wait for the first");

        first.rollback().await.unwrap();
        let acquired = tokio::time::timeout(
            std::time::Duration::from_millis(500),
            second.lock_event(event.id),
        )
        .await;
        assert!(acquired.is_ok(), "lock should be released on rollback");
    }

    #[tokio::test]
    async fn test_released_row_locks_are_pruned() {
        let store = InMemoryRegistrationStore::new();
        for _ in 0..3 {
            let event = store.insert_event(new_event(5)).await.unwrap();
            let mut tx = store.begin().await.unwrap();
            tx.lock_event(event.id).await.unwrap();
            tx.rollback().await.unwrap();
        }

        let held = store.shared.row_lock(Uuid::new_v4()).await;
        assert_eq!(store.shared.row_locks.lock().await.len(), 1);
        drop(held);
    }

    #[tokio::test]
    async fn test_delete_event_cascades() {
        let store = InMemoryRegistrationStore::new();
        let event = store.insert_event(new_event(5)).await.unwrap();
        let user = store.insert_user(new_user("a@example.com")).await.unwrap();

        let mut tx = store.begin().await.unwrap();
        tx.insert_registration(event.id, user.id).await.unwrap();
        tx.commit().await.unwrap();

        assert!(store.delete_event(event.id).await);
        assert!(store.registrations_for_event(event.id).await.is_empty());
        assert!(!store.delete_event(event.id).await);
    }

    #[tokio::test]
    async fn test_delete_user_cascades() {
        let store = InMemoryRegistrationStore::new();
        let event = store.insert_event(new_event(5)).await.unwrap();
        let user = store.insert_user(new_user("a@example.com")).await.unwrap();

        let mut tx = store.begin().await.unwrap();
        tx.insert_registration(event.id, user.id).await.unwrap();
        tx.commit().await.unwrap();

        assert!(store.delete_user(user.id).await);
        assert!(store.registrations_for_event(event.id).await.is_empty());
    }

    #[tokio::test]
    async fn test_insert_registration_requires_existing_rows() {
        let store = InMemoryRegistrationStore::new();
        let event = store.insert_event(new_event(5)).await.unwrap();

        let mut tx = store.begin().await.unwrap();
        let err = tx
            .insert_registration(event.id, Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::UserNotFound);
    }
}
