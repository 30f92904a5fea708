//! # docspace-entity
//!
//! Row and value types shared by the repositories, the auth core, and the
//! HTTP layer.

pub mod group;
pub mod permission;
pub mod resource;
pub mod session;
pub mod user;
