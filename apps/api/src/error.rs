use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use praxis_core::AppError;
use serde::Serialize;
use tracing::{debug, error};
use ts_rs::TS;

/// Category of a rejected shield request.
///
/// A deny is never an error: denied fields come back as decisions. These codes
/// only cover batches the shield could not decide at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/shield-error-code.ts"
)]
pub enum ShieldErrorCode {
    /// Empty batch, malformed refresh token header or bad configuration value.
    InvalidRequest,
    /// A field points at a resource that no longer exists, e.g. an action
    /// role whose proposal action was deleted.
    DanglingReference,
    /// Caller could not be authenticated.
    Unauthorized,
    /// Caller is authenticated but not allowed.
    Forbidden,
    /// Lookup store or server failure.
    Internal,
}

impl ShieldErrorCode {
    fn for_error(error: &AppError) -> (StatusCode, Self) {
        match error {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, Self::InvalidRequest),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, Self::DanglingReference),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, Self::Unauthorized),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, Self::Forbidden),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, Self::Internal),
        }
    }
}

/// Body returned when a shield batch or its context cannot be evaluated.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    code: ShieldErrorCode,
    message: String,
}

/// Failure of a shield endpoint, rendered as [`ErrorResponse`].
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = ShieldErrorCode::for_error(&self.0);
        if status.is_server_error() {
            error!(error = %self.0, "shield request failed");
        } else {
            debug!(error = %self.0, ?code, "shield request rejected");
        }

        let payload = Json(ErrorResponse {
            code,
            message: self.0.to_string(),
        });

        (status, payload).into_response()
    }
}

/// Result type of the shield handlers.
pub type ApiResult<T> = Result<T, ApiError>;
