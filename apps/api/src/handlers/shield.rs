use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, State};
use praxis_application::{FieldRequest, ShieldContext};
use praxis_core::AppError;

use crate::dto::{
    EvaluateShieldRequest, EvaluateShieldResponse, ShieldBindingResponse, ShieldDecisionResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

/// Decides every field of one operation against the request's context.
///
/// The first lookup failure aborts the whole batch without evaluating the
/// remaining fields, so a dangling reference surfaces as its error status
/// rather than as a deny.
pub async fn evaluate_shield_handler(
    State(state): State<AppState>,
    Extension(context): Extension<Arc<ShieldContext>>,
    Json(payload): Json<EvaluateShieldRequest>,
) -> ApiResult<Json<EvaluateShieldResponse>> {
    if payload.fields.is_empty() {
        return Err(AppError::Validation("at least one field is required".to_owned()).into());
    }

    let requests: Vec<FieldRequest> =
        payload.fields.into_iter().map(FieldRequest::from).collect();
    let outcomes = state.shield.evaluate_all(&context, &requests).await?;

    let decisions = requests
        .iter()
        .zip(&outcomes)
        .map(|(request, outcome)| ShieldDecisionResponse::from_outcome(request, outcome))
        .collect();

    Ok(Json(EvaluateShieldResponse { decisions }))
}

/// Lists fields with an exact binding, sorted by type and field.
pub async fn list_shield_bindings_handler(
    State(state): State<AppState>,
) -> Json<Vec<ShieldBindingResponse>> {
    let mut bindings: Vec<ShieldBindingResponse> = state
        .shield
        .bindings()
        .fields()
        .map(|(type_name, field_name, _)| ShieldBindingResponse {
            type_name: type_name.to_owned(),
            field_name: field_name.to_owned(),
        })
        .collect();
    bindings.sort_by(|left, right| {
        (left.type_name.as_str(), left.field_name.as_str())
            .cmp(&(right.type_name.as_str(), right.field_name.as_str()))
    });

    Json(bindings)
}

#[cfg(test)]
mod tests;
