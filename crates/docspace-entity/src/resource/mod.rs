//! Opaque views of spaces and documents.

pub mod model;

pub use model::ResourceRef;
