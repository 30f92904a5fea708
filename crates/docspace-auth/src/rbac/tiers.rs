//! Rule tiers and authorization decisions.

use serde::{Deserialize, Serialize};

use docspace_core::error::AppError;

/// One level of the rule hierarchy, most specific first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleTier {
    /// Explicit per-resource ACL entries.
    ResourceAcl,
    /// Group roles bound to the resource's space.
    SpaceGroup,
    /// Built-in behaviour of the principal's group roles.
    RoleDefault,
    /// Nothing matched.
    DefaultDeny,
}

/// Order in which tiers are consulted.
pub const RESOLUTION_ORDER: [RuleTier; 4] = [
    RuleTier::ResourceAcl,
    RuleTier::SpaceGroup,
    RuleTier::RoleDefault,
    RuleTier::DefaultDeny,
];

/// Why a decision came out the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    /// An ACL entry allows the action.
    AclAllow,
    /// An ACL entry denies the action.
    AclDeny,
    /// A role covers the action.
    RoleGrant,
    /// The best applicable role cannot perform this class of action.
    InsufficientRole,
    /// The role could perform the action but the principal does not own
    /// the resource or its space.
    NotAssociated,
    /// No rule at any tier.
    NoMatchingRule,
    /// The resource does not exist.
    ResourceNotFound,
}

/// Outcome of one authorization query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationDecision {
    /// Whether the action is permitted.
    pub allowed: bool,
    /// The tier that decided.
    pub tier: RuleTier,
    /// Why.
    pub reason: DecisionReason,
}

impl AuthorizationDecision {
    pub(crate) fn allow(tier: RuleTier, reason: DecisionReason) -> Self {
        Self {
            allowed: true,
            tier,
            reason,
        }
    }

    pub(crate) fn deny(tier: RuleTier, reason: DecisionReason) -> Self {
        Self {
            allowed: false,
            tier,
            reason,
        }
    }

    /// `Ok(())` if allowed; otherwise `NotFound` for a missing resource and
    /// `Forbidden` for everything else.
    pub fn into_result(self) -> Result<(), AppError> {
        match (self.allowed, self.reason) {
            (true, _) => Ok(()),
            (false, DecisionReason::ResourceNotFound) => {
                Err(AppError::not_found("Resource not found"))
            }
            (false, reason) => Err(AppError::forbidden(format!(
                "Access denied ({reason:?} at {:?})",
                self.tier
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use docspace_core::error::ErrorKind;

    use super::*;

    #[test]
    fn test_order_is_most_specific_first() {
        assert_eq!(RESOLUTION_ORDER[0], RuleTier::ResourceAcl);
        assert_eq!(RESOLUTION_ORDER[3], RuleTier::DefaultDeny);
    }

    #[test]
    fn test_into_result_maps_missing_resource_to_not_found() {
        let missing = AuthorizationDecision::deny(RuleTier::DefaultDeny, DecisionReason::ResourceNotFound);
        assert_eq!(missing.into_result().unwrap_err().kind, ErrorKind::NotFound);

        let denied = AuthorizationDecision::deny(RuleTier::ResourceAcl, DecisionReason::AclDeny);
        assert_eq!(denied.into_result().unwrap_err().kind, ErrorKind::Forbidden);

        let allowed = AuthorizationDecision::allow(RuleTier::RoleDefault, DecisionReason::RoleGrant);
        assert!(allowed.into_result().is_ok());
    }
}
