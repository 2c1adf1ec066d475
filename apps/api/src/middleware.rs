use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use praxis_application::RefreshTokenClaims;
use praxis_core::UserId;
use tracing::warn;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::state::AppState;

pub const REFRESH_TOKEN_ID_HEADER: &str = "x-refresh-token-id";
pub const REFRESH_TOKEN_SUBJECT_HEADER: &str = "x-refresh-token-sub";

/// Resolves the caller and attaches a fresh shield context to the request.
///
/// Malformed credentials are ignored and the request proceeds anonymously.
pub async fn attach_shield_context(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let access_token = bearer_token(request.headers());
    let refresh_token = refresh_token_claims(request.headers());

    let caller = state
        .authorization_service
        .resolve_caller(access_token.as_deref())
        .await?;
    let context = state
        .authorization_service
        .build_context(caller, refresh_token)
        .await?;

    request.extensions_mut().insert(Arc::new(context));
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?;
    let Ok(value) = value.to_str() else {
        warn!("authorization header is not valid ascii");
        return None;
    };

    match value.trim().split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => {
            Some(token.trim().to_owned())
        }
        _ => {
            warn!("authorization header does not carry a bearer token");
            None
        }
    }
}

fn refresh_token_claims(headers: &HeaderMap) -> RefreshTokenClaims {
    RefreshTokenClaims {
        token_id: parse_header(headers, REFRESH_TOKEN_ID_HEADER, |value| {
            Uuid::parse_str(value).ok()
        }),
        subject: parse_header(headers, REFRESH_TOKEN_SUBJECT_HEADER, |value| {
            value.parse::<i64>().ok().map(UserId::new)
        }),
    }
}

fn parse_header<T>(
    headers: &HeaderMap,
    name: &'static str,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Option<T> {
    let value = headers.get(name)?;
    let parsed = value.to_str().ok().map(str::trim).and_then(parse);
    if parsed.is_none() {
        warn!(header = name, "ignoring malformed header");
    }
    parsed
}
