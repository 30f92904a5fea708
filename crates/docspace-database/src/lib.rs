//! # docspace-database
//!
//! Persistence for DocSpace: the repository traits the auth core is written
//! against, their PostgreSQL implementations, an in-memory implementation
//! for development and tests, and pool and migration management.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::Repositories;
