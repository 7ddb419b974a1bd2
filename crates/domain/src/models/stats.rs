//! Event capacity statistics.

use serde::Serialize;
use uuid::Uuid;

use crate::models::event::Event;

/// Capacity-fill statistics for one event.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventStats {
    pub event_id: Uuid,
    pub title: String,
    pub capacity: i32,
    pub total_registrations: i64,
    pub remaining_capacity: i64,
    pub percentage_filled: f64,
}

impl EventStats {
    /// Derives statistics from an event and its registration count.
    ///
    /// Remaining capacity is clamped at zero.
    pub fn from_count(event: &Event, total_registrations: i64) -> Self {
        let capacity = i64::from(event.capacity);
        Self {
            event_id: event.id,
            title: event.title.clone(),
            capacity: event.capacity,
            total_registrations,
            remaining_capacity: (capacity - total_registrations).max(0),
            percentage_filled: shared::numeric::percentage(total_registrations, capacity),
        }
    }
}
