//! ACL entries, actions, and space role bindings.

pub mod action;
pub mod model;

pub use action::{Action, ActionClass};
pub use model::{AclEffect, AclEntry, ResourceType, SpaceRoleBinding};
