use async_trait::async_trait;
use praxis_core::AppResult;
use praxis_domain::{OwnedKind, OwnedResource, Outcome};
use tracing::debug;

use crate::IdSource;
use crate::shield::{CachePolicy, FieldRequest, Rule, ShieldContext};

/// Allows the caller when they own the referenced resource.
///
/// Denies with the generic reason when there is no caller, so the rule can be
/// combined with public-read rules through `or`.
#[derive(Debug, Clone)]
pub struct IsOwner {
    name: &'static str,
    kind: OwnedKind,
    id: IdSource,
    cache_policy: CachePolicy,
}

impl IsOwner {
    /// Creates an uncached ownership rule.
    #[must_use]
    pub fn new(name: &'static str, kind: OwnedKind, id: IdSource) -> Self {
        Self {
            name,
            kind,
            id,
            cache_policy: CachePolicy::NoCache,
        }
    }

    /// Overrides the cache policy.
    #[must_use]
    pub fn with_cache_policy(mut self, cache_policy: CachePolicy) -> Self {
        self.cache_policy = cache_policy;
        self
    }
}

#[async_trait]
impl Rule for IsOwner {
    fn name(&self) -> &'static str {
        self.name
    }

    fn cache_policy(&self) -> CachePolicy {
        self.cache_policy
    }

    async fn evaluate(
        &self,
        request: &FieldRequest,
        context: &ShieldContext,
    ) -> AppResult<Outcome> {
        let Some(caller) = context.caller() else {
            return Ok(Outcome::unauthorized());
        };
        let Some(id) = self.id.read_id(request) else {
            debug!(rule = self.name, source = ?self.id, "owned resource id missing");
            return Ok(Outcome::unauthorized());
        };

        let owned = context
            .services()
            .ownership
            .is_owned_by(OwnedResource::from_kind(self.kind, id), caller.id())
            .await?;
        Ok(Outcome::from_bool(owned))
    }
}
