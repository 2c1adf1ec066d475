//! Field-level authorization shield.
//!
//! Every protected GraphQL type/field is bound to a [`RuleExpr`]. Before the
//! field resolves, [`Shield::evaluate`] interprets that expression against the
//! per-request [`ShieldContext`], short-circuiting and caching rule results
//! as each rule's [`CachePolicy`] allows.

use std::sync::Arc;

use praxis_core::AppResult;
use praxis_domain::Outcome;
use tracing::{Instrument, debug, info_span};

mod bindings;
mod cache;
mod context;
mod expression;
mod field_rules;
mod rule;
pub mod rules;

pub use bindings::ShieldBindings;
pub use cache::RuleCache;
pub use context::{FieldRequest, RefreshTokenClaims, ShieldContext, ShieldServices};
pub use expression::{RuleExpr, and, or};
pub use field_rules::praxis_bindings;
pub use rule::{CachePolicy, Rule};

/// Evaluates field bindings for incoming requests.
#[derive(Clone)]
pub struct Shield {
    bindings: Arc<ShieldBindings>,
}

impl Shield {
    /// Creates a shield over a binding table.
    #[must_use]
    pub fn new(bindings: ShieldBindings) -> Self {
        Self {
            bindings: Arc::new(bindings),
        }
    }

    /// Returns the binding table.
    #[must_use]
    pub fn bindings(&self) -> &ShieldBindings {
        &self.bindings
    }

    /// Decides whether one field may resolve.
    ///
    /// Lookup failures such as dangling references are returned as errors and
    /// are never converted into a deny.
    pub async fn evaluate(
        &self,
        context: &ShieldContext,
        request: &FieldRequest,
    ) -> AppResult<Outcome> {
        let expression = self
            .bindings
            .rule_for(request.type_name.as_str(), request.field_name.as_str());

        let span = info_span!(
            "shield",
            field = %format_args!("{}.{}", request.type_name, request.field_name),
            caller = context.caller().map(|caller| caller.id().as_i64()),
        );
        let outcome = expression.evaluate(request, context).instrument(span).await?;

        debug!(
            type_name = request.type_name.as_str(),
            field_name = request.field_name.as_str(),
            allowed = outcome.is_allowed(),
            "field authorization decided"
        );
        Ok(outcome)
    }

    /// Decides every field of one operation in arrival order, sharing the
    /// request context and its rule cache.
    ///
    /// Stops at the first lookup failure; later fields are not evaluated.
    pub async fn evaluate_all(
        &self,
        context: &ShieldContext,
        requests: &[FieldRequest],
    ) -> AppResult<Vec<Outcome>> {
        let mut outcomes = Vec::with_capacity(requests.len());
        for request in requests {
            outcomes.push(self.evaluate(context, request).await?);
        }
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests;
