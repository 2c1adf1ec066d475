//! Catalog of named authorization rules.
//!
//! Rules guarding several fields with different argument shapes take a
//! [`ScopeSource`] so each binding states where its group lives.

use praxis_domain::{GroupPermission, ImageLink, OwnedKind, ResourceKind, ServerPermission};

use crate::{IdSource, ScopeSource};

use super::{CachePolicy, RuleExpr};

mod authentication;
mod groups;
mod ownership;
mod server;

pub use authentication::{HasValidRefreshToken, IsAuthenticated};
pub use groups::{
    HasGroupPermission, IsGroupMember, IsProposalGroupJoinedByMe, IsPublicGroupResource,
    VOTE_REQUIRES_MEMBERSHIP_MESSAGE,
};
pub use ownership::IsOwner;
pub use server::HasServerPermission;

// Authentication

/// Caller has an identity.
#[must_use]
pub fn is_authenticated() -> RuleExpr {
    RuleExpr::rule(IsAuthenticated)
}

/// Presented refresh token is still valid for its subject.
#[must_use]
pub fn has_valid_refresh_token() -> RuleExpr {
    RuleExpr::rule(HasValidRefreshToken)
}

// Ownership

/// Caller wrote the post referenced by `args.id`.
#[must_use]
pub fn is_own_post() -> RuleExpr {
    RuleExpr::rule(IsOwner::new("isOwnPost", OwnedKind::Post, IdSource::args(&["id"])))
}

/// Caller wrote the proposal referenced by `args.id`.
#[must_use]
pub fn is_own_proposal() -> RuleExpr {
    RuleExpr::rule(IsOwner::new(
        "isOwnProposal",
        OwnedKind::Proposal,
        IdSource::args(&["id"]),
    ))
}

/// Caller wrote the comment referenced by `args.id`.
#[must_use]
pub fn is_own_comment() -> RuleExpr {
    RuleExpr::rule(IsOwner::new(
        "isOwnComment",
        OwnedKind::Comment,
        IdSource::args(&["id"]),
    ))
}

/// Caller cast the vote referenced by the given source.
#[must_use]
pub fn is_own_vote(id: IdSource) -> RuleExpr {
    RuleExpr::rule(IsOwner::new("isOwnVote", OwnedKind::Vote, id))
}

/// Caller owns the ticket the parent question belongs to.
#[must_use]
pub fn is_own_question() -> RuleExpr {
    RuleExpr::rule(
        IsOwner::new("isOwnQuestion", OwnedKind::Question, IdSource::parent("id"))
            .with_cache_policy(CachePolicy::Strict),
    )
}

/// Caller wrote the parent answer.
#[must_use]
pub fn is_own_answer() -> RuleExpr {
    RuleExpr::rule(
        IsOwner::new("isOwnAnswer", OwnedKind::Answer, IdSource::parent("id"))
            .with_cache_policy(CachePolicy::Strict),
    )
}

/// Caller is the applicant of the parent questionnaire ticket.
#[must_use]
pub fn is_own_questionnaire_ticket() -> RuleExpr {
    RuleExpr::rule(
        IsOwner::new(
            "isOwnQuestionnaireTicket",
            OwnedKind::QuestionnaireTicket,
            IdSource::parent("id"),
        )
        .with_cache_policy(CachePolicy::Strict),
    )
}

/// Caller is the applicant of the ticket the parent comment was left on.
#[must_use]
pub fn is_own_questionnaire_ticket_comment() -> RuleExpr {
    RuleExpr::rule(
        IsOwner::new(
            "isOwnQuestionnaireTicket",
            OwnedKind::QuestionnaireTicketComment,
            IdSource::parent("id"),
        )
        .with_cache_policy(CachePolicy::Strict),
    )
}

// Group membership

/// Caller belongs to the parent group, or to the group of the role
/// referenced by `args.id`.
#[must_use]
pub fn is_group_member() -> RuleExpr {
    RuleExpr::rule(IsGroupMember::new(ScopeSource::first_present([
        ScopeSource::group(IdSource::parent("id")),
        ScopeSource::resource(ResourceKind::GroupRole, IdSource::args(&["id"])),
    ])))
}

// Public-group read bypass

/// Group looked up by parent id, `args.id` or `args.name` is public.
#[must_use]
pub fn is_public_group() -> RuleExpr {
    RuleExpr::rule(IsPublicGroupResource::new(
        "isPublicGroup",
        ScopeSource::first_present([
            ScopeSource::group(IdSource::parent("id")),
            ScopeSource::group(IdSource::args(&["id"])),
            ScopeSource::GroupName(IdSource::args(&["name"])),
        ]),
    ))
}

/// Post belongs to a public group.
#[must_use]
pub fn is_public_group_post() -> RuleExpr {
    RuleExpr::rule(IsPublicGroupResource::new(
        "isPublicGroupPost",
        ScopeSource::parent_or_arg_id(ResourceKind::Post),
    ))
}

/// Proposal belongs to a public group.
#[must_use]
pub fn is_public_group_proposal() -> RuleExpr {
    RuleExpr::rule(IsPublicGroupResource::new(
        "isPublicGroupProposal",
        ScopeSource::parent_or_arg_id(ResourceKind::Proposal),
    ))
}

/// Parent proposal action, action role, action permission or role member
/// belongs to a public group's proposal.
#[must_use]
pub fn is_public_group_proposal_action() -> RuleExpr {
    RuleExpr::rule(IsPublicGroupResource::new(
        "isPublicGroupProposalAction",
        ScopeSource::first_present([
            ScopeSource::resource(
                ResourceKind::ProposalAction,
                IdSource::parent("proposalActionId"),
            ),
            ScopeSource::resource(
                ResourceKind::ProposalActionRole,
                IdSource::parent("proposalActionRoleId"),
            ),
            ScopeSource::resource(ResourceKind::Proposal, IdSource::parent("proposalId")),
        ]),
    ))
}

/// Parent group role belongs to a public group.
#[must_use]
pub fn is_public_group_role() -> RuleExpr {
    RuleExpr::rule(IsPublicGroupResource::new(
        "isPublicGroupRole",
        ScopeSource::first_present([
            ScopeSource::group(IdSource::parent("groupId")),
            ScopeSource::resource(ResourceKind::GroupRole, IdSource::parent("id")),
        ]),
    ))
}

/// Parent image is the cover photo of a public group.
#[must_use]
pub fn is_public_group_image() -> RuleExpr {
    RuleExpr::rule(IsPublicGroupResource::new(
        "isPublicGroupImage",
        ScopeSource::resource(ResourceKind::Image(ImageLink::Group), IdSource::parent("id")),
    ))
}

/// Parent image is attached to a post in a public group.
#[must_use]
pub fn is_public_group_post_image() -> RuleExpr {
    RuleExpr::rule(IsPublicGroupResource::new(
        "isPublicGroupPostImage",
        ScopeSource::resource(ResourceKind::Image(ImageLink::Post), IdSource::parent("id")),
    ))
}

/// Parent image is the cover photo of an event in a public group.
#[must_use]
pub fn is_public_group_event_image() -> RuleExpr {
    RuleExpr::rule(IsPublicGroupResource::new(
        "isPublicGroupEventImage",
        ScopeSource::resource(ResourceKind::Image(ImageLink::Event), IdSource::parent("id")),
    ))
}

/// Parent image is attached to a public group's proposal or proposal action.
#[must_use]
pub fn is_public_group_proposal_image() -> RuleExpr {
    RuleExpr::rule(IsPublicGroupResource::new(
        "isPublicGroupProposalImage",
        ScopeSource::first_present([
            ScopeSource::resource(
                ResourceKind::ProposalAction,
                IdSource::parent("proposalActionId"),
            ),
            ScopeSource::resource(ResourceKind::Proposal, IdSource::parent("proposalId")),
        ]),
    ))
}

/// Parent vote was cast on a public group's proposal.
#[must_use]
pub fn is_public_group_vote() -> RuleExpr {
    RuleExpr::rule(IsPublicGroupResource::new(
        "isPublicGroupVote",
        ScopeSource::first_present([
            ScopeSource::resource(ResourceKind::Proposal, IdSource::parent("proposalId")),
            ScopeSource::resource(ResourceKind::Vote, IdSource::parent("id")),
        ]),
    ))
}

/// Event belongs to a public group.
#[must_use]
pub fn is_public_group_event() -> RuleExpr {
    RuleExpr::rule(IsPublicGroupResource::new(
        "isPublicGroupEvent",
        ScopeSource::parent_or_arg_id(ResourceKind::Event),
    ))
}

// Group role permissions

/// `manageRoles` in the group found through `scope`.
#[must_use]
pub fn can_manage_group_roles(scope: ScopeSource) -> RuleExpr {
    group_permission("canManageGroupRoles", GroupPermission::ManageRoles, scope)
}

/// `approveMemberRequests` in the group found through `scope`.
#[must_use]
pub fn can_approve_group_member_requests(scope: ScopeSource) -> RuleExpr {
    group_permission(
        "canApproveGroupMemberRequests",
        GroupPermission::ApproveMemberRequests,
        scope,
    )
}

/// `managePosts` in the group of the post referenced by `args.id`.
#[must_use]
pub fn can_manage_group_posts() -> RuleExpr {
    group_permission(
        "canManageGroupPosts",
        GroupPermission::ManagePosts,
        ScopeSource::resource(ResourceKind::Post, IdSource::args(&["id"])),
    )
}

/// `removeMembers` in the group found through `scope`.
#[must_use]
pub fn can_remove_group_members(scope: ScopeSource) -> RuleExpr {
    group_permission("canRemoveGroupMembers", GroupPermission::RemoveMembers, scope)
}

/// `manageSettings` in the group referenced by `args.groupConfigData.groupId`.
#[must_use]
pub fn can_manage_group_settings() -> RuleExpr {
    group_permission(
        "canManageGroupSettings",
        GroupPermission::ManageSettings,
        ScopeSource::group(IdSource::args(&["groupConfigData", "groupId"])),
    )
}

/// `createEvents` in the group found through `scope`.
#[must_use]
pub fn can_create_group_events(scope: ScopeSource) -> RuleExpr {
    group_permission("canCreateGroupEvents", GroupPermission::CreateEvents, scope)
}

/// `manageEvents` in the group found through `scope`.
#[must_use]
pub fn can_manage_group_events(scope: ScopeSource) -> RuleExpr {
    group_permission("canManageGroupEvents", GroupPermission::ManageEvents, scope)
}

/// `updateGroup` in the group referenced by `args.groupData.id`.
#[must_use]
pub fn can_update_group() -> RuleExpr {
    group_permission(
        "canUpdateGroup",
        GroupPermission::UpdateGroup,
        ScopeSource::group(IdSource::args(&["groupData", "id"])),
    )
}

/// `deleteGroup` in the group referenced by `args.id`.
#[must_use]
pub fn can_delete_group() -> RuleExpr {
    group_permission(
        "canDeleteGroup",
        GroupPermission::DeleteGroup,
        ScopeSource::group(IdSource::args(&["id"])),
    )
}

fn group_permission(
    name: &'static str,
    permission: GroupPermission,
    scope: ScopeSource,
) -> RuleExpr {
    RuleExpr::rule(HasGroupPermission::new(name, permission, scope))
}

// Server permissions

/// Server `createInvites`.
#[must_use]
pub fn can_create_invites() -> RuleExpr {
    server_permission("canCreateInvites", ServerPermission::CreateInvites)
}

/// Server `manageInvites`.
#[must_use]
pub fn can_manage_invites() -> RuleExpr {
    server_permission("canManageInvites", ServerPermission::ManageInvites)
}

/// Server `managePosts`.
#[must_use]
pub fn can_manage_posts() -> RuleExpr {
    server_permission("canManagePosts", ServerPermission::ManagePosts)
}

/// Server `manageComments`.
#[must_use]
pub fn can_manage_comments() -> RuleExpr {
    server_permission("canManageComments", ServerPermission::ManageComments)
}

/// Server `manageEvents`.
#[must_use]
pub fn can_manage_events() -> RuleExpr {
    server_permission("canManageEvents", ServerPermission::ManageEvents)
}

/// Server `manageRoles`.
#[must_use]
pub fn can_manage_server_roles() -> RuleExpr {
    server_permission("canManageServerRoles", ServerPermission::ManageRoles)
}

/// Server `banMembers`.
#[must_use]
pub fn can_ban_members() -> RuleExpr {
    server_permission("canBanMembers", ServerPermission::BanMembers)
}

/// Server `removeMembers`.
#[must_use]
pub fn can_remove_members() -> RuleExpr {
    server_permission("canRemoveMembers", ServerPermission::RemoveMembers)
}

/// Server `manageQuestionnaireTickets`.
#[must_use]
pub fn can_manage_questionnaire_tickets() -> RuleExpr {
    server_permission(
        "canManageQuestionnaireTickets",
        ServerPermission::ManageQuestionnaireTickets,
    )
}

/// Server `manageQuestions`.
#[must_use]
pub fn can_manage_questions() -> RuleExpr {
    server_permission("canManageQuestions", ServerPermission::ManageQuestions)
}

fn server_permission(name: &'static str, permission: ServerPermission) -> RuleExpr {
    RuleExpr::rule(HasServerPermission::new(name, permission))
}

// Votes

/// Voter belongs to the group of the proposal in `args.voteData.proposalId`.
#[must_use]
pub fn is_proposal_group_joined_by_me() -> RuleExpr {
    RuleExpr::rule(IsProposalGroupJoinedByMe::new(IdSource::args(&[
        "voteData",
        "proposalId",
    ])))
}
