use praxis_application::FieldRequest;
use praxis_domain::{DenyReason, Outcome};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// One field of an operation awaiting authorization.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/shield-field-request.ts"
)]
pub struct ShieldFieldRequest {
    pub type_name: String,
    pub field_name: String,
    #[serde(default)]
    #[ts(type = "unknown")]
    pub parent: Option<Value>,
    #[serde(default)]
    #[ts(type = "Record<string, unknown> | null")]
    pub args: Option<Value>,
}

/// Incoming payload for evaluating the fields of one operation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/evaluate-shield-request.ts"
)]
pub struct EvaluateShieldRequest {
    pub fields: Vec<ShieldFieldRequest>,
}

/// Authorization decision for one field.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/shield-decision-response.ts"
)]
pub struct ShieldDecisionResponse {
    pub type_name: String,
    pub field_name: String,
    pub allowed: bool,
    pub message: Option<String>,
}

/// Decisions for every requested field, in request order.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/evaluate-shield-response.ts"
)]
pub struct EvaluateShieldResponse {
    pub decisions: Vec<ShieldDecisionResponse>,
}

/// Field with an explicit shield binding.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/shield-binding-response.ts"
)]
pub struct ShieldBindingResponse {
    pub type_name: String,
    pub field_name: String,
}

impl From<ShieldFieldRequest> for FieldRequest {
    fn from(value: ShieldFieldRequest) -> Self {
        Self {
            type_name: value.type_name,
            field_name: value.field_name,
            parent: value.parent.filter(|parent| !parent.is_null()),
            args: value
                .args
                .filter(|args| !args.is_null())
                .unwrap_or_else(|| Value::Object(Map::new())),
        }
    }
}

impl ShieldDecisionResponse {
    pub fn from_outcome(request: &FieldRequest, outcome: &Outcome) -> Self {
        Self {
            type_name: request.type_name.clone(),
            field_name: request.field_name.clone(),
            allowed: outcome.is_allowed(),
            message: outcome
                .deny_reason()
                .map(DenyReason::message)
                .map(str::to_owned),
        }
    }
}
