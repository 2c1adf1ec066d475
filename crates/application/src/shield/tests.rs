use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use praxis_core::{AppError, AppResult, UserId, UserIdentity};
use praxis_domain::{
    DenyReason, EventId, GroupId, GroupPermission, GroupPrivacy, GroupRoleId, GroupScope, ImageId,
    ImageLink, MemberRequestId, OwnedResource, Outcome, PermissionStore, PostId,
    ProposalActionId, ProposalActionRoleId, ProposalId, QuestionId, ResourceRef,
    ServerPermission, VoteId,
};
use serde_json::json;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    GroupMembershipRepository, RefreshTokenRepository, ResourceOwnershipRepository,
    ResourceScopeRepository, ScopeResolver,
};

use super::rules::{self, VOTE_REQUIRES_MEMBERSHIP_MESSAGE};
use super::{
    FieldRequest, RefreshTokenClaims, RuleExpr, Shield, ShieldContext, ShieldServices, and, or,
    praxis_bindings,
};

#[derive(Default)]
struct FakeShieldRepository {
    scopes: HashMap<ResourceRef, Option<GroupScope>>,
    members: Mutex<HashSet<(GroupId, UserId)>>,
    owned: HashSet<(OwnedResource, UserId)>,
    refresh_tokens: HashSet<(Uuid, UserId)>,
    scope_lookups: AtomicUsize,
    membership_lookups: AtomicUsize,
    ownership_lookups: AtomicUsize,
}

impl FakeShieldRepository {
    fn with_scope(mut self, resource: ResourceRef, scope: Option<GroupScope>) -> Self {
        self.scopes.insert(resource, scope);
        self
    }

    /// Registers an image whose `link` reaches `scope`; every other link
    /// resolves as ungrouped.
    fn with_image(self, image_id: i64, link: ImageLink, scope: Option<GroupScope>) -> Self {
        [
            ImageLink::Group,
            ImageLink::Post,
            ImageLink::Event,
            ImageLink::Proposal,
            ImageLink::ProposalAction,
        ]
        .into_iter()
        .fold(self, |repository, candidate| {
            let resolved = if candidate == link { scope } else { None };
            repository.with_scope(ResourceRef::Image(ImageId::new(image_id), candidate), resolved)
        })
    }

    fn with_member(mut self, group_id: GroupId, user_id: UserId) -> Self {
        self.members.get_mut().insert((group_id, user_id));
        self
    }

    fn with_owned(mut self, resource: OwnedResource, user_id: UserId) -> Self {
        self.owned.insert((resource, user_id));
        self
    }

    fn lookups(&self) -> usize {
        self.scope_lookups.load(Ordering::SeqCst)
            + self.membership_lookups.load(Ordering::SeqCst)
            + self.ownership_lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResourceScopeRepository for FakeShieldRepository {
    async fn resolve_scope(&self, resource: &ResourceRef) -> AppResult<Option<GroupScope>> {
        self.scope_lookups.fetch_add(1, Ordering::SeqCst);
        self.scopes
            .get(resource)
            .copied()
            .ok_or_else(|| AppError::NotFound(resource.to_string()))
    }
}

#[async_trait]
impl GroupMembershipRepository for FakeShieldRepository {
    async fn is_group_member(&self, group_id: GroupId, user_id: UserId) -> AppResult<bool> {
        self.membership_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.members.lock().await.contains(&(group_id, user_id)))
    }
}

#[async_trait]
impl ResourceOwnershipRepository for FakeShieldRepository {
    async fn is_owned_by(&self, resource: OwnedResource, user_id: UserId) -> AppResult<bool> {
        self.ownership_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.owned.contains(&(resource, user_id)))
    }
}

#[async_trait]
impl RefreshTokenRepository for FakeShieldRepository {
    async fn validate_refresh_token(&self, token_id: Uuid, subject: UserId) -> AppResult<bool> {
        Ok(self.refresh_tokens.contains(&(token_id, subject)))
    }
}

fn services(repository: &Arc<FakeShieldRepository>) -> ShieldServices {
    ShieldServices {
        scopes: ScopeResolver::new(repository.clone()),
        memberships: repository.clone(),
        ownership: repository.clone(),
        refresh_tokens: repository.clone(),
    }
}

fn anonymous(repository: &Arc<FakeShieldRepository>) -> ShieldContext {
    ShieldContext::new(
        None,
        PermissionStore::empty(),
        RefreshTokenClaims::default(),
        services(repository),
    )
}

fn signed_in(
    repository: &Arc<FakeShieldRepository>,
    user_id: i64,
    permissions: PermissionStore,
) -> ShieldContext {
    ShieldContext::new(
        Some(UserIdentity::new(UserId::new(user_id), "alice", None)),
        permissions,
        RefreshTokenClaims::default(),
        services(repository),
    )
}

fn public(group_id: i64) -> Option<GroupScope> {
    Some(GroupScope::new(GroupId::new(group_id), GroupPrivacy::Public))
}

fn private(group_id: i64) -> Option<GroupScope> {
    Some(GroupScope::new(GroupId::new(group_id), GroupPrivacy::Private))
}

fn shield() -> Shield {
    Shield::new(praxis_bindings(RuleExpr::Allow))
}

#[tokio::test]
async fn anonymous_callers_are_denied_without_message() {
    let repository = Arc::new(FakeShieldRepository::default());
    let context = anonymous(&repository);
    let request = FieldRequest::new("Mutation", "createVote").with_args(json!({
        "id": 1,
        "voteData": { "proposalId": 7 },
        "groupData": { "id": 5 }
    }));

    let guarded = [
        rules::is_authenticated(),
        rules::is_own_post(),
        rules::is_group_member(),
        rules::is_proposal_group_joined_by_me(),
        rules::can_update_group(),
        rules::can_manage_posts(),
        rules::has_valid_refresh_token(),
    ];

    for expression in guarded {
        let outcome = expression.evaluate(&request, &context).await;
        assert!(
            matches!(outcome, Ok(Outcome::Deny(DenyReason::Unauthorized))),
            "{expression:?} returned {outcome:?}"
        );
    }
    assert_eq!(repository.lookups(), 0);
}

#[tokio::test]
async fn anonymous_post_query_follows_group_privacy() {
    let repository = Arc::new(
        FakeShieldRepository::default()
            .with_scope(ResourceRef::Post(PostId::new(1)), private(5))
            .with_scope(ResourceRef::Post(PostId::new(2)), public(6)),
    );
    let shield = shield();
    let context = anonymous(&repository);

    let private_post = FieldRequest::new("Query", "post").with_args(json!({ "id": 1 }));
    let public_post = FieldRequest::new("Query", "post").with_args(json!({ "id": "2" }));

    assert!(matches!(
        shield.evaluate(&context, &private_post).await,
        Ok(Outcome::Deny(DenyReason::Unauthorized))
    ));
    assert!(matches!(
        shield.evaluate(&context, &public_post).await,
        Ok(Outcome::Allow)
    ));
}

#[tokio::test]
async fn resources_without_group_are_not_public() {
    let repository = Arc::new(
        FakeShieldRepository::default().with_scope(ResourceRef::Post(PostId::new(3)), None),
    );
    let context = anonymous(&repository);
    let request = FieldRequest::new("Post", "body").with_parent(json!({ "id": 3 }));

    let outcome = shield().evaluate(&context, &request).await;
    assert!(matches!(outcome, Ok(Outcome::Deny(DenyReason::Unauthorized))));
}

#[test]
fn mutation_bindings_never_use_public_bypass() {
    let bindings = praxis_bindings(RuleExpr::Allow);
    let mutations = bindings
        .fields()
        .filter(|(type_name, _, _)| *type_name == "Mutation")
        .collect::<Vec<_>>();

    assert!(!mutations.is_empty());
    for (_, field_name, expression) in mutations {
        assert!(
            !format!("{expression:?}").contains("IsPublicGroupResource"),
            "Mutation.{field_name} uses the public bypass"
        );
    }
}

#[tokio::test]
async fn or_stops_at_first_allow_without_lookups() {
    let repository = Arc::new(
        FakeShieldRepository::default()
            .with_scope(ResourceRef::Post(PostId::new(1)), private(5)),
    );
    let context = signed_in(&repository, 1, PermissionStore::empty());
    let request = FieldRequest::new("Query", "post").with_args(json!({ "id": 1 }));

    let expression = or([rules::is_authenticated(), rules::is_public_group_post()]);
    let outcome = expression.evaluate(&request, &context).await;

    assert!(matches!(outcome, Ok(Outcome::Allow)));
    assert_eq!(repository.scope_lookups.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn and_stops_at_first_deny_without_lookups() {
    let repository = Arc::new(FakeShieldRepository::default());
    let context = anonymous(&repository);
    let request = FieldRequest::new("Query", "groupRole").with_args(json!({ "id": 4 }));

    let expression = and([rules::is_authenticated(), rules::is_group_member()]);
    let outcome = expression.evaluate(&request, &context).await;

    assert!(matches!(outcome, Ok(Outcome::Deny(DenyReason::Unauthorized))));
    assert_eq!(repository.lookups(), 0);
}

#[tokio::test]
async fn broken_chain_is_not_found_instead_of_deny() {
    let repository = Arc::new(FakeShieldRepository::default());
    let context = anonymous(&repository);
    let request = FieldRequest::new("ProposalActionRole", "name")
        .with_parent(json!({ "id": 4, "proposalActionId": 3 }));

    let outcome = shield().evaluate(&context, &request).await;

    assert!(matches!(
        outcome,
        Err(AppError::NotFound(message)) if message == "proposal action '3'"
    ));
    assert_eq!(repository.scope_lookups.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn group_role_updates_are_scoped_to_the_granting_group() {
    let repository = Arc::new(
        FakeShieldRepository::default()
            .with_scope(ResourceRef::GroupRole(GroupRoleId::new(10)), private(5))
            .with_scope(ResourceRef::GroupRole(GroupRoleId::new(11)), private(6)),
    );
    let permissions = PermissionStore::builder()
        .group(GroupId::new(5), GroupPermission::ManageRoles)
        .build();
    let context = signed_in(&repository, 1, permissions);
    let shield = shield();

    let own_group = FieldRequest::new("Mutation", "updateGroupRole")
        .with_args(json!({ "groupRoleData": { "id": 10, "name": "Mods" } }));
    let other_group = FieldRequest::new("Mutation", "updateGroupRole")
        .with_args(json!({ "groupRoleData": { "id": 11, "name": "Mods" } }));

    assert!(matches!(
        shield.evaluate(&context, &own_group).await,
        Ok(Outcome::Allow)
    ));
    assert!(matches!(
        shield.evaluate(&context, &other_group).await,
        Ok(Outcome::Deny(DenyReason::Unauthorized))
    ));
}

#[tokio::test]
async fn group_scoped_mutations_follow_the_granting_group() {
    let repository = Arc::new(
        FakeShieldRepository::default()
            .with_scope(ResourceRef::MemberRequest(MemberRequestId::new(3)), private(5))
            .with_scope(ResourceRef::MemberRequest(MemberRequestId::new(4)), private(6))
            .with_scope(ResourceRef::Event(EventId::new(8)), private(5))
            .with_scope(ResourceRef::Event(EventId::new(9)), public(6))
            .with_scope(ResourceRef::GroupRole(GroupRoleId::new(10)), private(5))
            .with_scope(ResourceRef::GroupRole(GroupRoleId::new(11)), private(6))
            .with_scope(ResourceRef::Post(PostId::new(1)), private(5))
            .with_scope(ResourceRef::Post(PostId::new(2)), public(6)),
    );
    let shield = shield();

    let cases = [
        (
            "approveGroupMemberRequest",
            GroupPermission::ApproveMemberRequests,
            json!({ "id": 3 }),
            json!({ "id": 4 }),
        ),
        (
            "createEvent",
            GroupPermission::CreateEvents,
            json!({ "eventData": { "groupId": 5, "name": "Assembly" } }),
            json!({ "eventData": { "groupId": 6, "name": "Assembly" } }),
        ),
        (
            "updateEvent",
            GroupPermission::ManageEvents,
            json!({ "eventData": { "id": 8, "name": "Moved" } }),
            json!({ "eventData": { "id": 9, "name": "Moved" } }),
        ),
        (
            "deleteEvent",
            GroupPermission::ManageEvents,
            json!({ "id": 8 }),
            json!({ "id": 9 }),
        ),
        (
            "updateGroupConfig",
            GroupPermission::ManageSettings,
            json!({ "groupConfigData": { "groupId": 5, "isPublic": true } }),
            json!({ "groupConfigData": { "groupId": 6, "isPublic": true } }),
        ),
        (
            "deleteGroupRoleMember",
            GroupPermission::ManageRoles,
            json!({ "groupRoleMemberData": { "groupRoleId": 10, "userId": 3 } }),
            json!({ "groupRoleMemberData": { "groupRoleId": 11, "userId": 3 } }),
        ),
        (
            "deletePost",
            GroupPermission::ManagePosts,
            json!({ "id": 1 }),
            json!({ "id": 2 }),
        ),
    ];

    for (field_name, permission, own_group, other_group) in cases {
        let permissions = PermissionStore::builder()
            .group(GroupId::new(5), permission)
            .build();
        let context = signed_in(&repository, 1, permissions);

        let own = FieldRequest::new("Mutation", field_name).with_args(own_group);
        let other = FieldRequest::new("Mutation", field_name).with_args(other_group);

        let outcome = shield.evaluate(&context, &own).await;
        assert!(
            matches!(outcome, Ok(Outcome::Allow)),
            "Mutation.{field_name} in group 5 returned {outcome:?}"
        );
        let outcome = shield.evaluate(&context, &other).await;
        assert!(
            matches!(outcome, Ok(Outcome::Deny(DenyReason::Unauthorized))),
            "Mutation.{field_name} in group 6 returned {outcome:?}"
        );
    }
}

#[tokio::test]
async fn server_event_managers_skip_group_lookups() {
    let repository = Arc::new(FakeShieldRepository::default());
    let permissions = PermissionStore::builder()
        .server(ServerPermission::ManageEvents)
        .build();
    let context = signed_in(&repository, 1, permissions);
    let shield = shield();

    let requests = [
        FieldRequest::new("Mutation", "createEvent")
            .with_args(json!({ "eventData": { "groupId": 6 } })),
        FieldRequest::new("Mutation", "updateEvent")
            .with_args(json!({ "eventData": { "id": 9 } })),
        FieldRequest::new("Mutation", "deleteEvent").with_args(json!({ "id": 9 })),
    ];

    let outcomes = shield.evaluate_all(&context, &requests).await;

    assert!(matches!(
        outcomes.as_deref(),
        Ok([Outcome::Allow, Outcome::Allow, Outcome::Allow])
    ));
    assert_eq!(repository.lookups(), 0);
}

#[tokio::test]
async fn posts_are_deleted_by_author_or_either_manager() {
    let repository = Arc::new(
        FakeShieldRepository::default()
            .with_scope(ResourceRef::Post(PostId::new(2)), public(6))
            .with_owned(OwnedResource::Post(PostId::new(2)), UserId::new(7)),
    );
    let shield = shield();
    let request = FieldRequest::new("Mutation", "deletePost").with_args(json!({ "id": 2 }));

    let author = signed_in(&repository, 7, PermissionStore::empty());
    let server_moderator = signed_in(
        &repository,
        8,
        PermissionStore::builder()
            .server(ServerPermission::ManagePosts)
            .build(),
    );
    let group_moderator = signed_in(
        &repository,
        9,
        PermissionStore::builder()
            .group(GroupId::new(6), GroupPermission::ManagePosts)
            .build(),
    );
    let bystander = signed_in(&repository, 10, PermissionStore::empty());

    for context in [&author, &server_moderator, &group_moderator] {
        assert!(matches!(
            shield.evaluate(context, &request).await,
            Ok(Outcome::Allow)
        ));
    }
    assert!(matches!(
        shield.evaluate(&bystander, &request).await,
        Ok(Outcome::Deny(DenyReason::Unauthorized))
    ));
}

#[tokio::test]
async fn group_admin_fields_require_the_flag_in_the_parent_group() {
    let repository = Arc::new(FakeShieldRepository::default());
    let shield = shield();

    let cases = [
        ("roles", GroupPermission::ManageRoles),
        ("memberRequests", GroupPermission::ApproveMemberRequests),
        ("memberRequestCount", GroupPermission::ApproveMemberRequests),
    ];

    for (field_name, permission) in cases {
        let permissions = PermissionStore::builder()
            .group(GroupId::new(5), permission)
            .build();
        let context = signed_in(&repository, 1, permissions);

        let own = FieldRequest::new("Group", field_name).with_parent(json!({ "id": 5 }));
        let other = FieldRequest::new("Group", field_name).with_parent(json!({ "id": 6 }));

        let outcome = shield.evaluate(&context, &own).await;
        assert!(
            matches!(outcome, Ok(Outcome::Allow)),
            "Group.{field_name} of group 5 returned {outcome:?}"
        );
        let outcome = shield.evaluate(&context, &other).await;
        assert!(
            matches!(outcome, Ok(Outcome::Deny(DenyReason::Unauthorized))),
            "Group.{field_name} of group 6 returned {outcome:?}"
        );
    }
    assert_eq!(repository.lookups(), 0);
}

#[tokio::test]
async fn anonymous_image_reads_follow_each_link() {
    let repository = Arc::new(
        FakeShieldRepository::default()
            .with_image(1, ImageLink::Group, public(6))
            .with_image(2, ImageLink::Group, private(5))
            .with_image(3, ImageLink::Post, public(6))
            .with_image(4, ImageLink::Post, private(5))
            .with_image(5, ImageLink::Event, public(6))
            .with_image(6, ImageLink::Event, private(5))
            .with_image(7, ImageLink::Proposal, public(6))
            .with_image(8, ImageLink::Proposal, private(5))
            .with_image(9, ImageLink::ProposalAction, public(6))
            .with_image(10, ImageLink::ProposalAction, private(5))
            .with_scope(ResourceRef::Proposal(ProposalId::new(70)), public(6))
            .with_scope(ResourceRef::Proposal(ProposalId::new(71)), private(5))
            .with_scope(
                ResourceRef::ProposalAction(ProposalActionId::new(90)),
                public(6),
            )
            .with_scope(
                ResourceRef::ProposalAction(ProposalActionId::new(91)),
                private(5),
            ),
    );
    let context = anonymous(&repository);
    let shield = shield();

    let cases = [
        (json!({ "id": 1, "groupId": 6 }), true),
        (json!({ "id": 2, "groupId": 5 }), false),
        (json!({ "id": 3, "postId": 2 }), true),
        (json!({ "id": 4, "postId": 1 }), false),
        (json!({ "id": 5, "eventId": 12 }), true),
        (json!({ "id": 6, "eventId": 8 }), false),
        (json!({ "id": 7, "proposalId": 70 }), true),
        (json!({ "id": 8, "proposalId": 71 }), false),
        (json!({ "id": 9, "proposalActionId": 90 }), true),
        (json!({ "id": 10, "proposalActionId": 91 }), false),
    ];

    for (parent, allowed) in cases {
        let request = FieldRequest::new("Image", "filename").with_parent(parent.clone());
        let outcome = shield.evaluate(&context, &request).await;
        assert!(
            matches!(&outcome, Ok(decided) if *decided == Outcome::from_bool(allowed)),
            "Image {parent} returned {outcome:?}"
        );
    }

    let member = signed_in(&repository, 1, PermissionStore::empty());
    let before = repository.lookups();
    let private_image = FieldRequest::new("Image", "filename").with_parent(json!({ "id": 2 }));
    assert!(matches!(
        shield.evaluate(&member, &private_image).await,
        Ok(Outcome::Allow)
    ));
    assert_eq!(repository.lookups(), before);
}

#[tokio::test]
async fn anonymous_reads_of_group_content_follow_group_privacy() {
    let repository = Arc::new(
        FakeShieldRepository::default()
            .with_scope(ResourceRef::Group(GroupId::new(6)), public(6))
            .with_scope(ResourceRef::GroupRole(GroupRoleId::new(10)), private(5))
            .with_scope(ResourceRef::Event(EventId::new(8)), private(5))
            .with_scope(ResourceRef::Event(EventId::new(12)), public(6))
            .with_scope(ResourceRef::Vote(VoteId::new(2)), private(5))
            .with_scope(ResourceRef::Proposal(ProposalId::new(70)), public(6))
            .with_scope(ResourceRef::Proposal(ProposalId::new(71)), private(5))
            .with_scope(
                ResourceRef::ProposalAction(ProposalActionId::new(90)),
                public(6),
            )
            .with_scope(
                ResourceRef::ProposalAction(ProposalActionId::new(91)),
                private(5),
            )
            .with_scope(
                ResourceRef::ProposalActionRole(ProposalActionRoleId::new(30)),
                public(6),
            ),
    );
    let context = anonymous(&repository);
    let shield = shield();

    let mut cases = vec![
        ("Vote", json!({ "id": 1, "proposalId": 70 }), true),
        ("Vote", json!({ "id": 2 }), false),
        ("GroupRole", json!({ "id": 10, "groupId": 6 }), true),
        ("GroupRole", json!({ "id": 10 }), false),
        ("Event", json!({ "id": 12 }), true),
        ("Event", json!({ "id": 8 }), false),
    ];
    for type_name in [
        "ProposalAction",
        "ProposalActionEvent",
        "ProposalActionGroupConfig",
        "ProposalActionPermission",
        "ProposalActionRole",
        "ProposalActionRoleMember",
    ] {
        cases.push((type_name, json!({ "id": 1, "proposalActionId": 90 }), true));
        cases.push((type_name, json!({ "id": 1, "proposalActionId": 91 }), false));
        cases.push((type_name, json!({ "id": 1, "proposalActionRoleId": 30 }), true));
        cases.push((type_name, json!({ "id": 1, "proposalId": 71 }), false));
    }

    for (type_name, parent, allowed) in cases {
        let request = FieldRequest::new(type_name, "id").with_parent(parent.clone());
        let outcome = shield.evaluate(&context, &request).await;
        assert!(
            matches!(&outcome, Ok(decided) if *decided == Outcome::from_bool(allowed)),
            "{type_name} {parent} returned {outcome:?}"
        );
    }
}

#[tokio::test]
async fn batch_stops_at_the_first_failed_lookup() {
    let repository = Arc::new(
        FakeShieldRepository::default()
            .with_scope(ResourceRef::Post(PostId::new(1)), private(5))
            .with_scope(ResourceRef::Post(PostId::new(2)), public(6)),
    );
    let context = anonymous(&repository);
    let requests = [
        FieldRequest::new("Query", "post").with_args(json!({ "id": 2 })),
        FieldRequest::new("ProposalActionRole", "name")
            .with_parent(json!({ "id": 4, "proposalActionId": 3 })),
        FieldRequest::new("Query", "post").with_args(json!({ "id": 1 })),
    ];

    let outcomes = shield().evaluate_all(&context, &requests).await;

    assert!(matches!(
        outcomes,
        Err(AppError::NotFound(message)) if message == "proposal action '3'"
    ));
    assert_eq!(repository.scope_lookups.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn group_ids_in_arguments_skip_lookups() {
    let repository = Arc::new(FakeShieldRepository::default());
    let permissions = PermissionStore::builder()
        .group(GroupId::new(5), GroupPermission::UpdateGroup)
        .build();
    let context = signed_in(&repository, 1, permissions);
    let request = FieldRequest::new("Mutation", "updateGroup")
        .with_args(json!({ "groupData": { "id": 5, "name": "Renamed" } }));

    let outcome = shield().evaluate(&context, &request).await;

    assert!(matches!(outcome, Ok(Outcome::Allow)));
    assert_eq!(repository.lookups(), 0);
}

#[tokio::test]
async fn unresolvable_argument_shape_fails_closed() {
    let repository = Arc::new(FakeShieldRepository::default());
    let permissions = PermissionStore::builder()
        .group(GroupId::new(5), GroupPermission::UpdateGroup)
        .build();
    let context = signed_in(&repository, 1, permissions);
    let request = FieldRequest::new("Mutation", "updateGroup")
        .with_args(json!({ "groupData": { "name": "Renamed" } }));

    let outcome = shield().evaluate(&context, &request).await;

    assert!(matches!(outcome, Ok(Outcome::Deny(DenyReason::Unauthorized))));
    assert_eq!(repository.lookups(), 0);
}

#[tokio::test]
async fn removed_members_get_join_prompt_when_voting() {
    let repository = Arc::new(
        FakeShieldRepository::default()
            .with_scope(ResourceRef::Proposal(ProposalId::new(7)), private(5))
            .with_member(GroupId::new(5), UserId::new(1)),
    );
    let shield = shield();
    let request = FieldRequest::new("Mutation", "createVote")
        .with_args(json!({ "voteData": { "proposalId": 7, "voteType": "support" } }));

    let context = signed_in(&repository, 1, PermissionStore::empty());
    assert!(matches!(
        shield.evaluate(&context, &request).await,
        Ok(Outcome::Allow)
    ));

    repository
        .members
        .lock()
        .await
        .remove(&(GroupId::new(5), UserId::new(1)));

    let context = signed_in(&repository, 1, PermissionStore::empty());
    let outcome = shield.evaluate(&context, &request).await;
    assert!(
        matches!(&outcome, Ok(Outcome::Deny(DenyReason::Message(message))) if message == VOTE_REQUIRES_MEMBERSHIP_MESSAGE),
        "{outcome:?}"
    );
}

#[tokio::test]
async fn proposals_without_group_accept_any_voter() {
    let repository = Arc::new(
        FakeShieldRepository::default().with_scope(ResourceRef::Proposal(ProposalId::new(8)), None),
    );
    let context = signed_in(&repository, 2, PermissionStore::empty());
    let request = FieldRequest::new("Mutation", "createVote")
        .with_args(json!({ "voteData": { "proposalId": 8 } }));

    let outcome = shield().evaluate(&context, &request).await;
    assert!(matches!(outcome, Ok(Outcome::Allow)));
}

#[tokio::test]
async fn or_reports_message_over_generic_denial() {
    let repository = Arc::new(
        FakeShieldRepository::default()
            .with_scope(ResourceRef::Proposal(ProposalId::new(7)), private(5)),
    );
    let context = signed_in(&repository, 3, PermissionStore::empty());
    let request = FieldRequest::new("Mutation", "createVote")
        .with_args(json!({ "voteData": { "proposalId": 7 } }));

    let expression = or([
        RuleExpr::Deny,
        rules::is_proposal_group_joined_by_me(),
        rules::can_manage_posts(),
    ]);
    let outcome = expression.evaluate(&request, &context).await;

    assert!(matches!(
        outcome,
        Ok(Outcome::Deny(DenyReason::Message(message))) if message == VOTE_REQUIRES_MEMBERSHIP_MESSAGE
    ));
}

#[tokio::test]
async fn contextual_rules_run_once_per_request() {
    let repository = Arc::new(FakeShieldRepository::default());
    let context = signed_in(&repository, 1, PermissionStore::empty());
    let requests = [
        FieldRequest::new("Query", "me"),
        FieldRequest::new("Mutation", "logOut"),
    ];

    let outcomes = shield().evaluate_all(&context, &requests).await;

    assert!(matches!(
        outcomes.as_deref(),
        Ok([Outcome::Allow, Outcome::Allow])
    ));
    assert_eq!(context.cache().len().await, 1);
}

#[tokio::test]
async fn strict_rules_are_keyed_by_parent() {
    let repository = Arc::new(
        FakeShieldRepository::default()
            .with_owned(OwnedResource::Question(QuestionId::new(1)), UserId::new(1)),
    );
    let context = signed_in(&repository, 1, PermissionStore::empty());
    let shield = shield();

    let first = FieldRequest::new("Question", "text").with_parent(json!({ "id": 1 }));
    let second = FieldRequest::new("Question", "priority").with_parent(json!({ "id": 1 }));
    let other = FieldRequest::new("Question", "text").with_parent(json!({ "id": 2 }));

    let Ok(outcomes) = shield.evaluate_all(&context, &[first, second, other]).await else {
        panic!("question batch failed");
    };

    assert_eq!(
        outcomes,
        [Outcome::Allow, Outcome::Allow, Outcome::unauthorized()]
    );
    assert_eq!(repository.ownership_lookups.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn unbound_fields_use_the_fallback() {
    let repository = Arc::new(FakeShieldRepository::default());
    let context = anonymous(&repository);
    let request = FieldRequest::new("Query", "publicFeed");

    let permissive = Shield::new(praxis_bindings(RuleExpr::Allow));
    let strict = Shield::new(praxis_bindings(RuleExpr::Deny));

    assert!(!permissive.bindings().is_bound("Query", "publicFeed"));
    assert!(matches!(
        permissive.evaluate(&context, &request).await,
        Ok(Outcome::Allow)
    ));
    assert!(matches!(
        strict.evaluate(&context, &request).await,
        Ok(Outcome::Deny(DenyReason::Unauthorized))
    ));
}

#[tokio::test]
async fn refresh_token_requires_matching_claims() {
    let token_id = Uuid::from_u128(42);
    let mut repository = FakeShieldRepository::default();
    repository.refresh_tokens.insert((token_id, UserId::new(1)));
    let repository = Arc::new(repository);
    let request = FieldRequest::new("Mutation", "refreshToken");
    let shield = shield();

    let claims = |subject: i64| RefreshTokenClaims {
        token_id: Some(token_id),
        subject: Some(UserId::new(subject)),
    };
    let context = |claims: RefreshTokenClaims| {
        ShieldContext::new(None, PermissionStore::empty(), claims, services(&repository))
    };

    assert!(matches!(
        shield.evaluate(&context(claims(1)), &request).await,
        Ok(Outcome::Allow)
    ));
    assert!(matches!(
        shield.evaluate(&context(claims(2)), &request).await,
        Ok(Outcome::Deny(DenyReason::Unauthorized))
    ));
}
