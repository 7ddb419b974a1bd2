//! Domain models for the event registration backend.

pub mod event;
pub mod registration;
pub mod stats;
pub mod user;

pub use event::{
    CapacityInput, Event, EventDetailsResponse, EventPayload, EventResponse, NewEvent,
    RegisteredUser,
};
pub use registration::{Registration, RegistrationRequest, RegistrationResponse};
pub use stats::EventStats;
pub use user::{NewUser, User, UserPayload, UserResponse};
