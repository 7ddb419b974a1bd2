//! Repository implementations for database operations.

pub mod event;
pub mod registration;
pub mod user;

pub use event::EventRepository;
pub use registration::{PgRegistrationStore, PgRegistrationTransaction};
pub use user::UserRepository;
