use std::sync::Arc;

use async_trait::async_trait;
use praxis_core::{AppResult, UserId, UserIdentity};
use praxis_domain::{
    GroupId, GroupPermission, GroupScope, OwnedResource, ResourceRef, ServerPermission,
};
use uuid::Uuid;

/// Repository port walking a resource up to its owning group.
#[async_trait]
pub trait ResourceScopeRepository: Send + Sync {
    /// Resolves the owning group of a resource in a single round trip.
    ///
    /// Returns `Ok(None)` for resources that legitimately have no group and
    /// `AppError::NotFound` when any link of the relation path is dangling.
    async fn resolve_scope(&self, resource: &ResourceRef) -> AppResult<Option<GroupScope>>;
}

/// Repository port for group membership checks.
#[async_trait]
pub trait GroupMembershipRepository: Send + Sync {
    /// Returns whether the user currently belongs to the group.
    async fn is_group_member(&self, group_id: GroupId, user_id: UserId) -> AppResult<bool>;
}

/// Repository port for ownership checks.
#[async_trait]
pub trait ResourceOwnershipRepository: Send + Sync {
    /// Returns whether the resource was created by, or belongs to, the user.
    async fn is_owned_by(&self, resource: OwnedResource, user_id: UserId) -> AppResult<bool>;
}

/// Repository port for refresh token validity.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Returns whether the token exists for the subject and is not expired.
    async fn validate_refresh_token(&self, token_id: Uuid, subject: UserId) -> AppResult<bool>;
}

/// Repository port for role-derived permission lookups.
#[async_trait]
pub trait PermissionRepository: Send + Sync {
    /// Lists server permissions granted through the user's server roles.
    async fn list_server_permissions(&self, user_id: UserId) -> AppResult<Vec<ServerPermission>>;

    /// Lists group permissions granted through the user's group roles.
    async fn list_group_permissions(
        &self,
        user_id: UserId,
    ) -> AppResult<Vec<(GroupId, GroupPermission)>>;
}

/// Repository port resolving callers from hashed access tokens.
#[async_trait]
pub trait AccessTokenRepository: Send + Sync {
    /// Finds the identity owning an unexpired access token.
    async fn find_identity_by_token_hash(
        &self,
        token_hash: &str,
    ) -> AppResult<Option<UserIdentity>>;
}

/// Lookup services the shield depends on, wired once at startup.
#[derive(Clone)]
pub struct ShieldPorts {
    /// Scope resolution lookups.
    pub scopes: Arc<dyn ResourceScopeRepository>,
    /// Membership lookups.
    pub memberships: Arc<dyn GroupMembershipRepository>,
    /// Ownership lookups.
    pub ownership: Arc<dyn ResourceOwnershipRepository>,
    /// Refresh token validation.
    pub refresh_tokens: Arc<dyn RefreshTokenRepository>,
    /// Role-derived permission lookups.
    pub permissions: Arc<dyn PermissionRepository>,
    /// Access token lookups.
    pub access_tokens: Arc<dyn AccessTokenRepository>,
}

impl ShieldPorts {
    /// Wires every port to the same adapter.
    pub fn from_repository<R>(repository: Arc<R>) -> Self
    where
        R: ResourceScopeRepository
            + GroupMembershipRepository
            + ResourceOwnershipRepository
            + RefreshTokenRepository
            + PermissionRepository
            + AccessTokenRepository
            + 'static,
    {
        Self {
            scopes: repository.clone(),
            memberships: repository.clone(),
            ownership: repository.clone(),
            refresh_tokens: repository.clone(),
            permissions: repository.clone(),
            access_tokens: repository,
        }
    }
}
