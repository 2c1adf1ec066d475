use async_trait::async_trait;
use praxis_core::AppResult;
use praxis_domain::Outcome;
use tracing::debug;

use crate::shield::{CachePolicy, FieldRequest, Rule, ShieldContext};

/// Allows any caller with an identity.
#[derive(Debug, Clone, Copy)]
pub struct IsAuthenticated;

#[async_trait]
impl Rule for IsAuthenticated {
    fn name(&self) -> &'static str {
        "isAuthenticated"
    }

    fn cache_policy(&self) -> CachePolicy {
        CachePolicy::Contextual
    }

    async fn evaluate(
        &self,
        _request: &FieldRequest,
        context: &ShieldContext,
    ) -> AppResult<Outcome> {
        Ok(Outcome::from_bool(context.caller().is_some()))
    }
}

/// Allows requests presenting a refresh token the token store still accepts.
#[derive(Debug, Clone, Copy)]
pub struct HasValidRefreshToken;

#[async_trait]
impl Rule for HasValidRefreshToken {
    fn name(&self) -> &'static str {
        "hasValidRefreshToken"
    }

    async fn evaluate(
        &self,
        _request: &FieldRequest,
        context: &ShieldContext,
    ) -> AppResult<Outcome> {
        let claims = context.refresh_token();
        let (Some(token_id), Some(subject)) = (claims.token_id, claims.subject) else {
            debug!("refresh token claims incomplete");
            return Ok(Outcome::unauthorized());
        };

        let valid = context
            .services()
            .refresh_tokens
            .validate_refresh_token(token_id, subject)
            .await?;
        Ok(Outcome::from_bool(valid))
    }
}
