//! Role-based access control over spaces and documents.
//!
//! Resolution walks [`RESOLUTION_ORDER`] and stops at the first tier that
//! has an opinion:
//! 1. Resource ACL: explicit per-user entries on the resource (a document
//!    falls back to its space's entries). Deny beats allow.
//! 2. Space group: roles bound to the resource's space for the principal's
//!    groups. The most permissive binding decides.
//! 3. Role default: the principal's group roles. Admin allows everything,
//!    guest allows reads, user allows reads and writes on resources the
//!    principal owns.
//! 4. Default deny.

pub mod resolver;
pub mod tiers;

pub use resolver::RbacResolver;
pub use tiers::{AuthorizationDecision, DecisionReason, RESOLUTION_ORDER, RuleTier};
