use std::fmt::Debug;

use async_trait::async_trait;
use praxis_core::AppResult;
use praxis_domain::Outcome;

use super::{FieldRequest, ShieldContext};

/// How long a rule result may be reused within one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CachePolicy {
    /// Evaluate every time the rule is reached.
    NoCache,
    /// Reuse the result for the whole request, regardless of parent/args.
    Contextual,
    /// Reuse the result for identical parent and arguments.
    Strict,
}

/// A predicate deciding field-level access.
///
/// Rules are read-only: they may fetch data but never mutate it.
#[async_trait]
pub trait Rule: Debug + Send + Sync {
    /// Rule name used in logs.
    fn name(&self) -> &'static str;

    /// Caching policy applied by the shield.
    fn cache_policy(&self) -> CachePolicy {
        CachePolicy::NoCache
    }

    /// Identity used to key cached results. Includes rule parameters so two
    /// bindings of the same rule with different scope sources never collide.
    fn cache_identity(&self) -> String {
        format!("{self:?}")
    }

    /// Evaluates the rule for one field request.
    async fn evaluate(&self, request: &FieldRequest, context: &ShieldContext)
    -> AppResult<Outcome>;
}
