use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use praxis_application::{
    AccessTokenRepository, GroupMembershipRepository, PermissionRepository,
    RefreshTokenRepository, ResourceOwnershipRepository, ResourceScopeRepository,
};
use praxis_core::{AppResult, UserId, UserIdentity};
use praxis_domain::{
    AnswerId, CommentId, EventId, GroupId, GroupPermission, GroupPrivacy, GroupRoleId,
    GroupScope, ImageId, MemberRequestId, OwnedResource, PostId, ProposalActionId,
    ProposalActionRoleId, ProposalActionRoleMemberId, ProposalId, QuestionId,
    QuestionnaireTicketId, ResourceRef, ServerPermission, VoteId,
};
use tokio::sync::RwLock;
use uuid::Uuid;

mod scopes;
mod seed;


/// Entity an image is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageParent {
    /// Group cover photo.
    Group(GroupId),
    /// Post attachment.
    Post(PostId),
    /// Event cover photo.
    Event(EventId),
    /// Proposal attachment.
    Proposal(ProposalId),
    /// Proposal action attachment.
    ProposalAction(ProposalActionId),
}

#[derive(Debug, Clone)]
struct GroupRecord {
    name: String,
    privacy: GroupPrivacy,
}

#[derive(Debug, Clone, Copy)]
struct AuthoredRecord {
    author: UserId,
    group: Option<GroupId>,
}

#[derive(Debug, Clone, Copy)]
struct VoteRecord {
    voter: UserId,
    proposal: ProposalId,
}

#[derive(Debug, Clone, Copy)]
struct CommentRecord {
    author: UserId,
    ticket: Option<QuestionnaireTicketId>,
}

#[derive(Debug, Clone)]
struct RoleRecord<P> {
    permissions: HashSet<P>,
    members: HashSet<UserId>,
}

#[derive(Debug, Clone)]
struct GroupRoleRecord {
    group: GroupId,
    role: RoleRecord<GroupPermission>,
}

#[derive(Debug, Clone)]
struct IssuedToken<T> {
    holder: T,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct ShieldState {
    groups: HashMap<GroupId, GroupRecord>,
    members: HashSet<(GroupId, UserId)>,
    member_requests: HashMap<MemberRequestId, GroupId>,
    group_roles: HashMap<GroupRoleId, GroupRoleRecord>,
    server_roles: HashMap<i64, RoleRecord<ServerPermission>>,
    posts: HashMap<PostId, AuthoredRecord>,
    proposals: HashMap<ProposalId, AuthoredRecord>,
    proposal_actions: HashMap<ProposalActionId, ProposalId>,
    proposal_action_roles: HashMap<ProposalActionRoleId, ProposalActionId>,
    proposal_action_role_members: HashMap<ProposalActionRoleMemberId, ProposalActionRoleId>,
    events: HashMap<EventId, Option<GroupId>>,
    images: HashMap<ImageId, ImageParent>,
    votes: HashMap<VoteId, VoteRecord>,
    comments: HashMap<CommentId, CommentRecord>,
    questionnaire_tickets: HashMap<QuestionnaireTicketId, UserId>,
    questions: HashMap<QuestionId, QuestionnaireTicketId>,
    answers: HashMap<AnswerId, UserId>,
    refresh_tokens: HashMap<Uuid, IssuedToken<UserId>>,
    access_tokens: HashMap<String, IssuedToken<UserIdentity>>,
}

/// In-memory implementation of every shield lookup port.
///
/// Used by tests and by the API when no database is configured.
#[derive(Debug, Default)]
pub struct InMemoryShieldRepository {
    state: RwLock<ShieldState>,
}

impl InMemoryShieldRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResourceScopeRepository for InMemoryShieldRepository {
    async fn resolve_scope(&self, resource: &ResourceRef) -> AppResult<Option<GroupScope>> {
        self.state.read().await.resolve(resource)
    }
}

#[async_trait]
impl GroupMembershipRepository for InMemoryShieldRepository {
    async fn is_group_member(&self, group_id: GroupId, user_id: UserId) -> AppResult<bool> {
        Ok(self
            .state
            .read()
            .await
            .members
            .contains(&(group_id, user_id)))
    }
}

#[async_trait]
impl ResourceOwnershipRepository for InMemoryShieldRepository {
    async fn is_owned_by(&self, resource: OwnedResource, user_id: UserId) -> AppResult<bool> {
        let state = self.state.read().await;

        let owner = match resource {
            OwnedResource::Post(id) => state.posts.get(&id).map(|post| post.author),
            OwnedResource::Proposal(id) => {
                state.proposals.get(&id).map(|proposal| proposal.author)
            }
            OwnedResource::Comment(id) => state.comments.get(&id).map(|comment| comment.author),
            OwnedResource::Vote(id) => state.votes.get(&id).map(|vote| vote.voter),
            OwnedResource::Question(id) => state
                .questions
                .get(&id)
                .and_then(|ticket| state.questionnaire_tickets.get(ticket))
                .copied(),
            OwnedResource::Answer(id) => state.answers.get(&id).copied(),
            OwnedResource::QuestionnaireTicket(id) => {
                state.questionnaire_tickets.get(&id).copied()
            }
            OwnedResource::QuestionnaireTicketComment(id) => state
                .comments
                .get(&id)
                .and_then(|comment| comment.ticket)
                .and_then(|ticket| state.questionnaire_tickets.get(&ticket))
                .copied(),
        };

        Ok(owner == Some(user_id))
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryShieldRepository {
    async fn validate_refresh_token(&self, token_id: Uuid, subject: UserId) -> AppResult<bool> {
        Ok(self
            .state
            .read()
            .await
            .refresh_tokens
            .get(&token_id)
            .is_some_and(|token| token.holder == subject && token.expires_at > Utc::now()))
    }
}

#[async_trait]
impl PermissionRepository for InMemoryShieldRepository {
    async fn list_server_permissions(&self, user_id: UserId) -> AppResult<Vec<ServerPermission>> {
        let state = self.state.read().await;

        let mut permissions: Vec<ServerPermission> = state
            .server_roles
            .values()
            .filter(|role| role.members.contains(&user_id))
            .flat_map(|role| role.permissions.iter().copied())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        permissions.sort_by_key(ServerPermission::as_str);

        Ok(permissions)
    }

    async fn list_group_permissions(
        &self,
        user_id: UserId,
    ) -> AppResult<Vec<(GroupId, GroupPermission)>> {
        let state = self.state.read().await;

        let mut permissions: Vec<(GroupId, GroupPermission)> = state
            .group_roles
            .values()
            .filter(|record| record.role.members.contains(&user_id))
            .flat_map(|record| {
                record
                    .role
                    .permissions
                    .iter()
                    .map(move |permission| (record.group, *permission))
            })
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        permissions.sort_by_key(|(group_id, permission)| (*group_id, permission.as_str()));

        Ok(permissions)
    }
}

#[async_trait]
impl AccessTokenRepository for InMemoryShieldRepository {
    async fn find_identity_by_token_hash(
        &self,
        token_hash: &str,
    ) -> AppResult<Option<UserIdentity>> {
        Ok(self
            .state
            .read()
            .await
            .access_tokens
            .get(token_hash)
            .filter(|token| token.expires_at > Utc::now())
            .map(|token| token.holder.clone()))
    }
}
