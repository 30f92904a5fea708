//! Credential verification and account creation.

pub mod store;

pub use store::{CredentialStore, Registration};
