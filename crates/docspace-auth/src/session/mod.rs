//! Session persistence and expired-session sweeping.

pub mod cleanup;
pub mod store;

pub use cleanup::SessionCleanup;
pub use store::SessionStore;
