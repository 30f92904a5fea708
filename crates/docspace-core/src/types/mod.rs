//! Core type definitions used across the DocSpace workspace.

pub mod id;

pub use id::*;
