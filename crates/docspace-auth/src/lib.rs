//! # docspace-auth
//!
//! Authentication and authorization for DocSpace:
//! - Credential verification and registration with Argon2id hashing
//! - Session lifecycle and expired-session sweeping
//! - HS256 bearer tokens binding a user to a session
//! - Per-request bearer validation into a [`docspace_core::RequestContext`]
//! - Tiered RBAC resolution over spaces and documents

pub mod authenticator;
pub mod credential;
pub mod jwt;
pub mod password;
pub mod rbac;
pub mod session;
pub mod validator;

pub use authenticator::{Authenticator, LoginAttempt, LoginOutcome};
pub use credential::{CredentialStore, Registration};
pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenError};
pub use password::{PasswordHasher, PasswordValidator};
pub use rbac::{AuthorizationDecision, DecisionReason, RbacResolver, RuleTier};
pub use session::{SessionCleanup, SessionStore};
pub use validator::SessionValidator;
