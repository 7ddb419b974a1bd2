//! Domain layer for the event registration backend.
//!
//! This crate contains:
//! - Domain models (User, Event, Registration, EventStats)
//! - Registration services and the store traits they run against
//! - Domain error types

pub mod error;
pub mod models;
pub mod services;

pub use error::{DomainError, ErrorKind};
