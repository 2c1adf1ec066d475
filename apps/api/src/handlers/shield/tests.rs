use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, State};
use praxis_application::{
    AuthorizationService, RefreshTokenClaims, RuleExpr, Shield, ShieldContext, ShieldPorts,
    praxis_bindings, rules::VOTE_REQUIRES_MEMBERSHIP_MESSAGE,
};
use praxis_core::{AppError, UserId, UserIdentity};
use praxis_domain::{GroupId, GroupPrivacy, PostId, ProposalId, UNAUTHORIZED_MESSAGE};
use praxis_infrastructure::InMemoryShieldRepository;
use serde_json::json;

use crate::dto::{EvaluateShieldRequest, ShieldFieldRequest};
use crate::error::ApiError;
use crate::state::AppState;

use super::{evaluate_shield_handler, list_shield_bindings_handler};

async fn seeded_state() -> (AppState, Arc<InMemoryShieldRepository>) {
    let repository = Arc::new(InMemoryShieldRepository::new());
    repository
        .add_group(GroupId::new(5), "organizers", GroupPrivacy::Private)
        .await;
    repository
        .add_group(GroupId::new(6), "commons", GroupPrivacy::Public)
        .await;
    repository
        .add_post(PostId::new(1), UserId::new(2), Some(GroupId::new(5)))
        .await;
    repository
        .add_post(PostId::new(2), UserId::new(2), Some(GroupId::new(6)))
        .await;
    repository
        .add_proposal(ProposalId::new(7), UserId::new(2), Some(GroupId::new(5)))
        .await;
    repository
        .add_group_member(GroupId::new(5), UserId::new(1))
        .await;

    let state = AppState {
        authorization_service: AuthorizationService::new(ShieldPorts::from_repository(
            repository.clone(),
        )),
        shield: Shield::new(praxis_bindings(RuleExpr::Allow)),
    };
    (state, repository)
}

async fn context_for(state: &AppState, caller: Option<UserIdentity>) -> Arc<ShieldContext> {
    match state
        .authorization_service
        .build_context(caller, RefreshTokenClaims::default())
        .await
    {
        Ok(context) => Arc::new(context),
        Err(error) => panic!("failed to build shield context: {error}"),
    }
}

fn field(type_name: &str, field_name: &str, args: serde_json::Value) -> ShieldFieldRequest {
    ShieldFieldRequest {
        type_name: type_name.to_owned(),
        field_name: field_name.to_owned(),
        parent: None,
        args: Some(args),
    }
}

fn member() -> UserIdentity {
    UserIdentity::new(UserId::new(1), "ada", None)
}

#[tokio::test]
async fn anonymous_post_queries_follow_group_privacy() {
    let (state, _) = seeded_state().await;
    let context = context_for(&state, None).await;

    let response = evaluate_shield_handler(
        State(state),
        Extension(context),
        Json(EvaluateShieldRequest {
            fields: vec![
                field("Query", "post", json!({ "id": 1 })),
                field("Query", "post", json!({ "id": 2 })),
            ],
        }),
    )
    .await;

    let Ok(Json(response)) = response else {
        panic!("evaluation failed");
    };
    assert_eq!(response.decisions.len(), 2);
    assert!(!response.decisions[0].allowed);
    assert_eq!(
        response.decisions[0].message.as_deref(),
        Some(UNAUTHORIZED_MESSAGE)
    );
    assert!(response.decisions[1].allowed);
    assert_eq!(response.decisions[1].message, None);
}

#[tokio::test]
async fn removed_members_see_the_join_prompt() {
    let (state, repository) = seeded_state().await;
    let vote = || field("Mutation", "createVote", json!({ "voteData": { "proposalId": 7 } }));

    let context = context_for(&state, Some(member())).await;
    let allowed = evaluate_shield_handler(
        State(state.clone()),
        Extension(context),
        Json(EvaluateShieldRequest {
            fields: vec![vote()],
        }),
    )
    .await;
    assert!(matches!(allowed, Ok(Json(response)) if response.decisions[0].allowed));

    repository
        .remove_group_member(GroupId::new(5), UserId::new(1))
        .await;

    let context = context_for(&state, Some(member())).await;
    let denied = evaluate_shield_handler(
        State(state),
        Extension(context),
        Json(EvaluateShieldRequest {
            fields: vec![vote()],
        }),
    )
    .await;
    assert!(matches!(
        denied,
        Ok(Json(response))
            if response.decisions[0].message.as_deref() == Some(VOTE_REQUIRES_MEMBERSHIP_MESSAGE)
    ));
}

#[tokio::test]
async fn dangling_references_fail_the_batch() {
    let (state, _) = seeded_state().await;
    let context = context_for(&state, None).await;

    let response = evaluate_shield_handler(
        State(state),
        Extension(context),
        Json(EvaluateShieldRequest {
            fields: vec![ShieldFieldRequest {
                type_name: "ProposalActionRole".to_owned(),
                field_name: "name".to_owned(),
                parent: Some(json!({ "id": 4, "proposalActionId": 3 })),
                args: None,
            }],
        }),
    )
    .await;

    assert!(matches!(
        response,
        Err(ApiError(AppError::NotFound(message))) if message == "proposal action '3'"
    ));
}

#[tokio::test]
async fn empty_batches_are_rejected() {
    let (state, _) = seeded_state().await;
    let context = context_for(&state, None).await;

    let response = evaluate_shield_handler(
        State(state),
        Extension(context),
        Json(EvaluateShieldRequest { fields: Vec::new() }),
    )
    .await;

    assert!(matches!(response, Err(ApiError(AppError::Validation(_)))));
}

#[tokio::test]
async fn bindings_are_listed_in_order() {
    let (state, _) = seeded_state().await;

    let Json(bindings) = list_shield_bindings_handler(State(state)).await;

    assert!(
        bindings
            .iter()
            .any(|binding| binding.type_name == "Mutation" && binding.field_name == "createVote")
    );
    assert!(bindings.windows(2).all(|pair| {
        (pair[0].type_name.as_str(), pair[0].field_name.as_str())
            <= (pair[1].type_name.as_str(), pair[1].field_name.as_str())
    }));
}
