//! Tiered permission resolution.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use docspace_core::result::AppResult;
use docspace_core::types::{GroupId, UserId};
use docspace_database::repositories::{AclRepository, GroupRepository, ResourceRepository};
use docspace_entity::group::{Group, GroupRole};
use docspace_entity::permission::{AclEffect, Action, ResourceType};
use docspace_entity::resource::ResourceRef;

use super::tiers::{AuthorizationDecision, DecisionReason, RESOLUTION_ORDER, RuleTier};

/// Answers "may this user perform this action on this resource".
///
/// Read-only: resolution never writes.
#[derive(Clone)]
pub struct RbacResolver {
    resources: Arc<dyn ResourceRepository>,
    acl: Arc<dyn AclRepository>,
    groups: Arc<dyn GroupRepository>,
}

impl std::fmt::Debug for RbacResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RbacResolver").finish_non_exhaustive()
    }
}

impl RbacResolver {
    /// Creates a new resolver.
    pub fn new(
        resources: Arc<dyn ResourceRepository>,
        acl: Arc<dyn AclRepository>,
        groups: Arc<dyn GroupRepository>,
    ) -> Self {
        Self {
            resources,
            acl,
            groups,
        }
    }

    /// Resolve a decision for `principal` performing `action`.
    ///
    /// A missing resource is denied with `ResourceNotFound`, unless the
    /// principal's best role could never perform the action anyway, in which
    /// case the reason is `InsufficientRole`. Existence is therefore not
    /// revealed to principals who lack the role for the action.
    pub async fn authorize(
        &self,
        principal: UserId,
        resource_type: ResourceType,
        resource_id: Uuid,
        action: Action,
    ) -> AppResult<AuthorizationDecision> {
        let groups = self.groups.find_by_user(principal).await?;

        let Some(resource) = self.resources.find(resource_type, resource_id).await? else {
            let reason = match best_role(&groups) {
                Some(role) if !role.covers(action.class()) => DecisionReason::InsufficientRole,
                _ => DecisionReason::ResourceNotFound,
            };
            return Ok(AuthorizationDecision::deny(RuleTier::DefaultDeny, reason));
        };

        for tier in RESOLUTION_ORDER {
            let decision = match tier {
                RuleTier::ResourceAcl => self.resource_acl(principal, &resource, action).await?,
                RuleTier::SpaceGroup => self.space_group(&resource, &groups, action).await?,
                RuleTier::RoleDefault => {
                    self.role_default(principal, &resource, &groups, action)
                        .await?
                }
                RuleTier::DefaultDeny => Some(AuthorizationDecision::deny(
                    RuleTier::DefaultDeny,
                    DecisionReason::NoMatchingRule,
                )),
            };

            if let Some(decision) = decision {
                debug!(
                    user_id = %principal,
                    resource_type = %resource_type,
                    resource_id = %resource_id,
                    action = %action,
                    allowed = decision.allowed,
                    tier = ?decision.tier,
                    "Authorization resolved"
                );
                return Ok(decision);
            }
        }

        Ok(AuthorizationDecision::deny(
            RuleTier::DefaultDeny,
            DecisionReason::NoMatchingRule,
        ))
    }

    /// [`Self::authorize`], converted to `Forbidden`/`NotFound` on deny.
    pub async fn require(
        &self,
        principal: UserId,
        resource_type: ResourceType,
        resource_id: Uuid,
        action: Action,
    ) -> AppResult<()> {
        self.authorize(principal, resource_type, resource_id, action)
            .await?
            .into_result()
    }

    async fn resource_acl(
        &self,
        principal: UserId,
        resource: &ResourceRef,
        action: Action,
    ) -> AppResult<Option<AuthorizationDecision>> {
        let mut entries = self
            .acl
            .find_entries(resource.resource_type, resource.id, principal, action)
            .await?;

        if entries.is_empty() && resource.is_document() {
            entries = self
                .acl
                .find_entries(
                    ResourceType::Space,
                    resource.space_id.into_uuid(),
                    principal,
                    action,
                )
                .await?;
        }

        if entries.iter().any(|e| e.effect == AclEffect::Deny) {
            return Ok(Some(AuthorizationDecision::deny(
                RuleTier::ResourceAcl,
                DecisionReason::AclDeny,
            )));
        }
        if entries.iter().any(|e| e.effect == AclEffect::Allow) {
            return Ok(Some(AuthorizationDecision::allow(
                RuleTier::ResourceAcl,
                DecisionReason::AclAllow,
            )));
        }
        Ok(None)
    }

    async fn space_group(
        &self,
        resource: &ResourceRef,
        groups: &[Group],
        action: Action,
    ) -> AppResult<Option<AuthorizationDecision>> {
        if groups.is_empty() {
            return Ok(None);
        }
        let group_ids: Vec<GroupId> = groups.iter().map(|g| g.id).collect();
        let bindings = self
            .acl
            .find_space_bindings(resource.space_id, &group_ids)
            .await?;

        let Some(role) = bindings
            .iter()
            .map(|b| b.role)
            .max_by_key(GroupRole::privilege_level)
        else {
            return Ok(None);
        };

        Ok(Some(if role.covers(action.class()) {
            AuthorizationDecision::allow(RuleTier::SpaceGroup, DecisionReason::RoleGrant)
        } else {
            AuthorizationDecision::deny(RuleTier::SpaceGroup, DecisionReason::InsufficientRole)
        }))
    }

    async fn role_default(
        &self,
        principal: UserId,
        resource: &ResourceRef,
        groups: &[Group],
        action: Action,
    ) -> AppResult<Option<AuthorizationDecision>> {
        if groups.is_empty() {
            return Ok(None);
        }
        let class = action.class();

        // Each distinct role is judged on its own; any allow wins.
        let mut roles: Vec<GroupRole> = groups.iter().map(|g| g.role).collect();
        roles.sort_by_key(|r| std::cmp::Reverse(r.privilege_level()));
        roles.dedup();

        let mut reason = DecisionReason::InsufficientRole;
        for role in roles {
            if !role.covers(class) {
                continue;
            }
            let allowed = match role {
                GroupRole::Admin | GroupRole::Guest => true,
                GroupRole::User => self.is_associated(principal, resource).await?,
            };
            if allowed {
                return Ok(Some(AuthorizationDecision::allow(
                    RuleTier::RoleDefault,
                    DecisionReason::RoleGrant,
                )));
            }
            reason = DecisionReason::NotAssociated;
        }

        Ok(Some(AuthorizationDecision::deny(RuleTier::RoleDefault, reason)))
    }

    /// Whether the principal owns the resource or the space it lives in.
    async fn is_associated(&self, principal: UserId, resource: &ResourceRef) -> AppResult<bool> {
        if resource.owner_id == principal {
            return Ok(true);
        }
        if !resource.is_document() {
            return Ok(false);
        }
        let space = self
            .resources
            .find(ResourceType::Space, resource.space_id.into_uuid())
            .await?;
        Ok(space.is_some_and(|s| s.owner_id == principal))
    }
}

fn best_role(groups: &[Group]) -> Option<GroupRole> {
    groups
        .iter()
        .map(|g| g.role)
        .max_by_key(GroupRole::privilege_level)
}
