use async_trait::async_trait;
use praxis_core::AppResult;
use praxis_domain::{GroupPermission, Outcome, ProposalId, ResourceRef};
use tracing::debug;

use crate::shield::{FieldRequest, Rule, ShieldContext};
use crate::{IdSource, ScopeResolution, ScopeSource};

/// Denial shown when a non-member votes on a group proposal.
pub const VOTE_REQUIRES_MEMBERSHIP_MESSAGE: &str =
    "You must be a group member to vote on this proposal";

/// Allows members of the resolved group.
#[derive(Debug, Clone)]
pub struct IsGroupMember {
    scope: ScopeSource,
}

impl IsGroupMember {
    /// Creates a membership rule for the given scope.
    #[must_use]
    pub fn new(scope: ScopeSource) -> Self {
        Self { scope }
    }
}

#[async_trait]
impl Rule for IsGroupMember {
    fn name(&self) -> &'static str {
        "isGroupMember"
    }

    async fn evaluate(
        &self,
        request: &FieldRequest,
        context: &ShieldContext,
    ) -> AppResult<Outcome> {
        let Some(caller) = context.caller() else {
            return Ok(Outcome::unauthorized());
        };

        let resolution = context
            .services()
            .scopes
            .resolve_group_id(&self.scope, request)
            .await?;
        let Some(group_id) = settle(self.name(), &self.scope, resolution) else {
            return Ok(Outcome::unauthorized());
        };

        let is_member = context
            .services()
            .memberships
            .is_group_member(group_id, caller.id())
            .await?;
        Ok(Outcome::from_bool(is_member))
    }
}

/// Allows anyone when the resolved group is public.
///
/// Only bound to read paths. Resources without a group are denied.
#[derive(Debug, Clone)]
pub struct IsPublicGroupResource {
    name: &'static str,
    scope: ScopeSource,
}

impl IsPublicGroupResource {
    /// Creates a public-read rule for the given scope.
    #[must_use]
    pub fn new(name: &'static str, scope: ScopeSource) -> Self {
        Self { name, scope }
    }
}

#[async_trait]
impl Rule for IsPublicGroupResource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn evaluate(
        &self,
        request: &FieldRequest,
        context: &ShieldContext,
    ) -> AppResult<Outcome> {
        let resolution = context
            .services()
            .scopes
            .resolve_scope(&self.scope, request)
            .await?;

        Ok(Outcome::from_bool(
            settle(self.name, &self.scope, resolution).is_some_and(|scope| scope.is_public()),
        ))
    }
}

/// Allows callers whose group roles grant a permission in the resolved group.
#[derive(Debug, Clone)]
pub struct HasGroupPermission {
    name: &'static str,
    permission: GroupPermission,
    scope: ScopeSource,
}

impl HasGroupPermission {
    /// Creates a group permission rule for the given scope.
    #[must_use]
    pub fn new(name: &'static str, permission: GroupPermission, scope: ScopeSource) -> Self {
        Self {
            name,
            permission,
            scope,
        }
    }
}

#[async_trait]
impl Rule for HasGroupPermission {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn evaluate(
        &self,
        request: &FieldRequest,
        context: &ShieldContext,
    ) -> AppResult<Outcome> {
        let resolution = context
            .services()
            .scopes
            .resolve_group_id(&self.scope, request)
            .await?;
        let Some(group_id) = settle(self.name, &self.scope, resolution) else {
            return Ok(Outcome::unauthorized());
        };

        Ok(Outcome::from_bool(
            context
                .permissions()
                .has_group_permission(self.permission, group_id),
        ))
    }
}

/// Requires group membership to vote on a group's proposal. Proposals without
/// a group are open to every authenticated caller.
#[derive(Debug, Clone, Copy)]
pub struct IsProposalGroupJoinedByMe {
    proposal: IdSource,
}

impl IsProposalGroupJoinedByMe {
    /// Creates the rule reading the proposal id from the given source.
    #[must_use]
    pub fn new(proposal: IdSource) -> Self {
        Self { proposal }
    }
}

#[async_trait]
impl Rule for IsProposalGroupJoinedByMe {
    fn name(&self) -> &'static str {
        "isProposalGroupJoinedByMe"
    }

    async fn evaluate(
        &self,
        request: &FieldRequest,
        context: &ShieldContext,
    ) -> AppResult<Outcome> {
        let Some(caller) = context.caller() else {
            return Ok(Outcome::unauthorized());
        };
        let Some(proposal_id) = self.proposal.read_id(request) else {
            debug!(rule = self.name(), source = ?self.proposal, "proposal id missing");
            return Ok(Outcome::unauthorized());
        };

        let scope = context
            .services()
            .scopes
            .fetch(&ResourceRef::Proposal(ProposalId::new(proposal_id)))
            .await?;
        let Some(scope) = scope else {
            return Ok(Outcome::Allow);
        };

        let is_member = context
            .services()
            .memberships
            .is_group_member(scope.group_id, caller.id())
            .await?;
        if is_member {
            Ok(Outcome::Allow)
        } else {
            Ok(Outcome::message(VOTE_REQUIRES_MEMBERSHIP_MESSAGE))
        }
    }
}

fn settle<T>(rule: &'static str, scope: &ScopeSource, resolution: ScopeResolution<T>) -> Option<T> {
    match resolution {
        ScopeResolution::Resolved(value) => Some(value),
        ScopeResolution::Ungrouped => {
            debug!(rule, "resource belongs to no group");
            None
        }
        ScopeResolution::Unresolvable => {
            debug!(rule, source = ?scope, "argument shape matched no scope source");
            None
        }
    }
}
