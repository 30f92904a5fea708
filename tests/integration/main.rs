//! HTTP-level integration tests over the in-memory backend.

mod auth_test;
mod helpers;
mod me_test;
mod rbac_test;
mod session_test;
