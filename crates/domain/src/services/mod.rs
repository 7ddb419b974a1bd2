//! Domain services for the event registration backend.
//!
//! Services contain the business rules and run against the store traits in
//! [`store`], so the same rules apply to PostgreSQL and to the in-memory store.

pub mod events;
pub mod in_memory;
pub mod registration;
pub mod store;

pub use events::{event_stats, replace_event, upcoming_events};
pub use in_memory::InMemoryRegistrationStore;
pub use registration::{cancel, register};
pub use store::{RegistrationStore, RegistrationTransaction};
