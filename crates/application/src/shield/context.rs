use std::sync::Arc;

use praxis_core::{UserId, UserIdentity};
use praxis_domain::PermissionStore;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{
    GroupMembershipRepository, RefreshTokenRepository, ResourceOwnershipRepository, ScopeResolver,
    ShieldPorts,
};

use super::RuleCache;

/// One field about to resolve.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRequest {
    /// Parent GraphQL type name, e.g. `Mutation` or `Group`.
    pub type_name: String,
    /// Field name on the parent type.
    pub field_name: String,
    /// Resolved parent object. Absent for root fields.
    pub parent: Option<Value>,
    /// Field arguments.
    pub args: Value,
}

impl FieldRequest {
    /// Creates a request without parent or arguments.
    #[must_use]
    pub fn new(type_name: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            field_name: field_name.into(),
            parent: None,
            args: Value::Object(Map::new()),
        }
    }

    /// Sets the parent object.
    #[must_use]
    pub fn with_parent(mut self, parent: Value) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets the field arguments.
    #[must_use]
    pub fn with_args(mut self, args: Value) -> Self {
        self.args = args;
        self
    }
}

/// Refresh token claims presented with the request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshTokenClaims {
    /// Token identifier (`jti`).
    pub token_id: Option<Uuid>,
    /// Subject the token was issued to (`sub`).
    pub subject: Option<UserId>,
}

/// Lookup handles available to rules.
#[derive(Clone)]
pub struct ShieldServices {
    /// Scope resolution.
    pub scopes: ScopeResolver,
    /// Membership lookups.
    pub memberships: Arc<dyn GroupMembershipRepository>,
    /// Ownership lookups.
    pub ownership: Arc<dyn ResourceOwnershipRepository>,
    /// Refresh token validation.
    pub refresh_tokens: Arc<dyn RefreshTokenRepository>,
}

impl ShieldServices {
    /// Picks the rule-facing services out of the wired ports.
    #[must_use]
    pub fn from_ports(ports: &ShieldPorts) -> Self {
        Self {
            scopes: ScopeResolver::new(ports.scopes.clone()),
            memberships: ports.memberships.clone(),
            ownership: ports.ownership.clone(),
            refresh_tokens: ports.refresh_tokens.clone(),
        }
    }
}

/// Per-request authorization context.
///
/// Built once per request and dropped with it. The permission store is never
/// mutated after construction and the rule cache is never shared.
pub struct ShieldContext {
    caller: Option<UserIdentity>,
    permissions: PermissionStore,
    refresh_token: RefreshTokenClaims,
    services: ShieldServices,
    cache: RuleCache,
}

impl ShieldContext {
    /// Creates a context with an empty rule cache.
    #[must_use]
    pub fn new(
        caller: Option<UserIdentity>,
        permissions: PermissionStore,
        refresh_token: RefreshTokenClaims,
        services: ShieldServices,
    ) -> Self {
        Self {
            caller,
            permissions,
            refresh_token,
            services,
            cache: RuleCache::default(),
        }
    }

    /// Returns the caller, if authenticated.
    #[must_use]
    pub fn caller(&self) -> Option<&UserIdentity> {
        self.caller.as_ref()
    }

    /// Returns the caller's resolved permissions.
    #[must_use]
    pub fn permissions(&self) -> &PermissionStore {
        &self.permissions
    }

    /// Returns the presented refresh token claims.
    #[must_use]
    pub fn refresh_token(&self) -> RefreshTokenClaims {
        self.refresh_token
    }

    /// Returns the lookup services.
    #[must_use]
    pub fn services(&self) -> &ShieldServices {
        &self.services
    }

    /// Returns the request-scoped rule cache.
    #[must_use]
    pub fn cache(&self) -> &RuleCache {
        &self.cache
    }
}
