//! Shared utilities and common types for the event registration backend.
//!
//! This crate provides functionality used across all other crates:
//! - Common validation logic for request payloads
//! - Numeric helpers for capacity statistics

pub mod numeric;
pub mod validation;
