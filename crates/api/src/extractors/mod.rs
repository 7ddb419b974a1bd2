//! Custom Axum extractors.
//!
//! Wrappers around the stock extractors whose rejections use the API error envelope.

pub mod rejecting;

pub use rejecting::{ApiJson, ApiPath};
