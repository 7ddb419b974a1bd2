//! HTTP route handlers.

pub mod events;
pub mod fallback;
pub mod health;
pub mod registrations;
pub mod users;
