use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use praxis_core::AppResult;
use praxis_domain::{DenyReason, Outcome};
use tracing::debug;

use super::cache::CacheKey;
use super::{FieldRequest, Rule, ShieldContext};

type EvaluateFuture<'a> = Pin<Box<dyn Future<Output = AppResult<Outcome>> + Send + 'a>>;

/// Boolean combination of rules bound to a field.
#[derive(Debug, Clone)]
pub enum RuleExpr {
    /// Always allows.
    Allow,
    /// Always denies with the generic reason.
    Deny,
    /// A single rule.
    Rule(Arc<dyn Rule>),
    /// Every branch must allow. Stops at the first deny.
    And(Vec<RuleExpr>),
    /// Any branch may allow. Stops at the first allow.
    Or(Vec<RuleExpr>),
}

/// Conjunction of rule expressions.
#[must_use]
pub fn and(expressions: impl IntoIterator<Item = RuleExpr>) -> RuleExpr {
    RuleExpr::And(expressions.into_iter().collect())
}

/// Disjunction of rule expressions.
#[must_use]
pub fn or(expressions: impl IntoIterator<Item = RuleExpr>) -> RuleExpr {
    RuleExpr::Or(expressions.into_iter().collect())
}

impl RuleExpr {
    /// Wraps a single rule.
    #[must_use]
    pub fn rule(rule: impl Rule + 'static) -> Self {
        Self::Rule(Arc::new(rule))
    }

    /// Evaluates the expression left to right.
    ///
    /// Branches after the deciding one are never evaluated, so their lookups
    /// never run. An `Or` that denies reports a message deny from any branch
    /// in preference to the generic reason.
    pub fn evaluate<'a>(
        &'a self,
        request: &'a FieldRequest,
        context: &'a ShieldContext,
    ) -> EvaluateFuture<'a> {
        Box::pin(async move {
            match self {
                Self::Allow => Ok(Outcome::Allow),
                Self::Deny => Ok(Outcome::unauthorized()),
                Self::Rule(rule) => evaluate_rule(rule.as_ref(), request, context).await,
                Self::And(branches) => {
                    for branch in branches {
                        let outcome = branch.evaluate(request, context).await?;
                        if !outcome.is_allowed() {
                            return Ok(outcome);
                        }
                    }
                    Ok(Outcome::Allow)
                }
                Self::Or(branches) => {
                    let mut message = None;
                    for branch in branches {
                        match branch.evaluate(request, context).await? {
                            Outcome::Allow => return Ok(Outcome::Allow),
                            Outcome::Deny(DenyReason::Message(text)) if message.is_none() => {
                                message = Some(text);
                            }
                            Outcome::Deny(_) => {}
                        }
                    }
                    Ok(message.map_or_else(Outcome::unauthorized, Outcome::message))
                }
            }
        })
    }
}

async fn evaluate_rule(
    rule: &dyn Rule,
    request: &FieldRequest,
    context: &ShieldContext,
) -> AppResult<Outcome> {
    let key = CacheKey::for_rule(rule, request);

    if let Some(key) = key.as_ref()
        && let Some(outcome) = context.cache().get(key).await
    {
        debug!(rule = rule.name(), allowed = outcome.is_allowed(), "rule cache hit");
        return Ok(outcome);
    }

    let outcome = rule.evaluate(request, context).await?;
    debug!(rule = rule.name(), allowed = outcome.is_allowed(), "rule evaluated");

    if let Some(key) = key {
        context.cache().insert(key, outcome.clone()).await;
    }

    Ok(outcome)
}
