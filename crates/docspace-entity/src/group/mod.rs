//! Groups and their roles.

pub mod model;
pub mod role;

pub use model::Group;
pub use role::GroupRole;
