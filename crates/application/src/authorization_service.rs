use praxis_core::{AppResult, UserIdentity};
use praxis_domain::PermissionStore;
use tracing::{debug, info};

use crate::{RefreshTokenClaims, ShieldContext, ShieldPorts, ShieldServices};

mod permissions;
mod token_crypto;

pub use token_crypto::hash_access_token;

/// Application service building per-request shield contexts.
#[derive(Clone)]
pub struct AuthorizationService {
    ports: ShieldPorts,
}

impl AuthorizationService {
    /// Creates a new authorization service from wired ports.
    #[must_use]
    pub fn new(ports: ShieldPorts) -> Self {
        Self { ports }
    }

    /// Resolves the caller from a raw bearer access token.
    ///
    /// Missing, blank, unknown and expired tokens all yield an anonymous
    /// caller. Repository failures are returned as errors.
    pub async fn resolve_caller(
        &self,
        access_token: Option<&str>,
    ) -> AppResult<Option<UserIdentity>> {
        let Some(access_token) = access_token
            .map(str::trim)
            .filter(|token| !token.is_empty())
        else {
            return Ok(None);
        };

        let token_hash = hash_access_token(access_token);
        let identity = self
            .ports
            .access_tokens
            .find_identity_by_token_hash(token_hash.as_str())
            .await?;

        if identity.is_none() {
            debug!("access token not recognised, treating caller as anonymous");
        }

        Ok(identity)
    }

    /// Builds the request context: permission store, refresh token claims,
    /// lookup services and an empty rule cache.
    ///
    /// A refresh token without an explicit subject is attributed to the
    /// caller.
    pub async fn build_context(
        &self,
        caller: Option<UserIdentity>,
        refresh_token: RefreshTokenClaims,
    ) -> AppResult<ShieldContext> {
        let permissions = self.load_permission_store(caller.as_ref()).await?;
        let refresh_token = RefreshTokenClaims {
            subject: refresh_token
                .subject
                .or_else(|| caller.as_ref().map(UserIdentity::id)),
            ..refresh_token
        };

        info!(
            caller = caller.as_ref().map(|caller| caller.id().as_i64()),
            server_permissions = permissions.server_permissions().len(),
            groups = permissions.groups().count(),
            "shield context built"
        );

        Ok(ShieldContext::new(
            caller,
            permissions,
            refresh_token,
            ShieldServices::from_ports(&self.ports),
        ))
    }

    /// Loads the caller's permission store. Anonymous callers get an empty
    /// store without touching the repository.
    pub async fn load_permission_store(
        &self,
        caller: Option<&UserIdentity>,
    ) -> AppResult<PermissionStore> {
        match caller {
            Some(caller) => permissions::load(self.ports.permissions.as_ref(), caller).await,
            None => Ok(PermissionStore::empty()),
        }
    }
}
