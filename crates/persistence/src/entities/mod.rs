//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod event;
pub mod registration;
pub mod user;

pub use event::{EventEntity, EventWithCountEntity};
pub use registration::{RegisteredUserEntity, RegistrationEntity};
pub use user::UserEntity;
