use async_trait::async_trait;
use praxis_application::{
    AccessTokenRepository, GroupMembershipRepository, PermissionRepository,
    RefreshTokenRepository, ResourceOwnershipRepository, ResourceScopeRepository,
};
use praxis_core::{AppError, AppResult, UserId, UserIdentity};
use praxis_domain::{
    GroupId, GroupPermission, GroupScope, OwnedResource, ResourceRef, ServerPermission,
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

mod ownership;
mod permissions;
mod scopes;
mod tokens;


/// PostgreSQL-backed implementation of every shield lookup port.
#[derive(Clone)]
pub struct PostgresShieldRepository {
    pool: PgPool,
}

impl PostgresShieldRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ScopeRow {
    group_ref: Option<i64>,
    group_id: Option<i64>,
    privacy: Option<String>,
}

#[derive(Debug, FromRow)]
struct PermissionRow {
    permission: String,
}

#[derive(Debug, FromRow)]
struct GroupPermissionRow {
    group_id: i64,
    permission: String,
}

#[derive(Debug, FromRow)]
struct IdentityRow {
    id: i64,
    name: String,
    email: Option<String>,
}

#[async_trait]
impl ResourceScopeRepository for PostgresShieldRepository {
    async fn resolve_scope(&self, resource: &ResourceRef) -> AppResult<Option<GroupScope>> {
        self.resolve_scope_impl(resource).await
    }
}

#[async_trait]
impl GroupMembershipRepository for PostgresShieldRepository {
    async fn is_group_member(&self, group_id: GroupId, user_id: UserId) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM group_members
                WHERE group_id = $1
                    AND user_id = $2
            )
            "#,
        )
        .bind(group_id.as_i64())
        .bind(user_id.as_i64())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to check membership of user '{user_id}' in group '{group_id}': {error}"
            ))
        })
    }
}

#[async_trait]
impl ResourceOwnershipRepository for PostgresShieldRepository {
    async fn is_owned_by(&self, resource: OwnedResource, user_id: UserId) -> AppResult<bool> {
        self.is_owned_by_impl(resource, user_id).await
    }
}

#[async_trait]
impl RefreshTokenRepository for PostgresShieldRepository {
    async fn validate_refresh_token(&self, token_id: Uuid, subject: UserId) -> AppResult<bool> {
        self.validate_refresh_token_impl(token_id, subject).await
    }
}

#[async_trait]
impl PermissionRepository for PostgresShieldRepository {
    async fn list_server_permissions(&self, user_id: UserId) -> AppResult<Vec<ServerPermission>> {
        self.list_server_permissions_impl(user_id).await
    }

    async fn list_group_permissions(
        &self,
        user_id: UserId,
    ) -> AppResult<Vec<(GroupId, GroupPermission)>> {
        self.list_group_permissions_impl(user_id).await
    }
}

#[async_trait]
impl AccessTokenRepository for PostgresShieldRepository {
    async fn find_identity_by_token_hash(
        &self,
        token_hash: &str,
    ) -> AppResult<Option<UserIdentity>> {
        self.find_identity_by_token_hash_impl(token_hash).await
    }
}
