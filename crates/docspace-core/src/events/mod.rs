//! Structured events describing authentication outcomes.
//!
//! Events are not dispatched anywhere; they exist so that every login,
//! logout, and validation result is logged with the same field names.

pub mod auth;

pub use auth::{AuthEvent, AuthOutcome};
