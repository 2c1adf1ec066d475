use async_trait::async_trait;
use praxis_core::AppResult;
use praxis_domain::{Outcome, ServerPermission};

use crate::shield::{CachePolicy, FieldRequest, Rule, ShieldContext};

/// Allows callers holding a server-wide permission.
#[derive(Debug, Clone, Copy)]
pub struct HasServerPermission {
    name: &'static str,
    permission: ServerPermission,
}

impl HasServerPermission {
    /// Creates a server permission rule.
    #[must_use]
    pub fn new(name: &'static str, permission: ServerPermission) -> Self {
        Self { name, permission }
    }
}

#[async_trait]
impl Rule for HasServerPermission {
    fn name(&self) -> &'static str {
        self.name
    }

    fn cache_policy(&self) -> CachePolicy {
        CachePolicy::Contextual
    }

    async fn evaluate(
        &self,
        _request: &FieldRequest,
        context: &ShieldContext,
    ) -> AppResult<Outcome> {
        Ok(Outcome::from_bool(
            context.permissions().has_server_permission(self.permission),
        ))
    }
}
