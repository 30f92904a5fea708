//! # docspace-core
//!
//! Core crate for DocSpace. Contains the unified error system, configuration
//! schemas, typed identifiers, the per-request authentication context, and
//! the structured authentication events.
//!
//! This crate has **no** internal dependencies on other DocSpace crates.

pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod result;
pub mod types;

pub use context::RequestContext;
pub use error::{AppError, ErrorKind};
pub use result::AppResult;
