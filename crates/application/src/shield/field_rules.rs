use praxis_domain::ResourceKind;

use crate::{IdSource, ScopeSource};

use super::rules::{
    can_approve_group_member_requests, can_ban_members, can_create_group_events,
    can_create_invites, can_delete_group, can_manage_comments, can_manage_events,
    can_manage_group_events, can_manage_group_posts, can_manage_group_roles,
    can_manage_group_settings, can_manage_invites, can_manage_posts,
    can_manage_questionnaire_tickets, can_manage_questions, can_manage_server_roles,
    can_remove_group_members, can_remove_members, can_update_group, has_valid_refresh_token,
    is_authenticated, is_group_member, is_own_answer, is_own_comment, is_own_post,
    is_own_proposal, is_own_question, is_own_questionnaire_ticket,
    is_own_questionnaire_ticket_comment, is_own_vote, is_proposal_group_joined_by_me,
    is_public_group, is_public_group_event, is_public_group_event_image, is_public_group_image,
    is_public_group_post, is_public_group_post_image, is_public_group_proposal,
    is_public_group_proposal_action, is_public_group_proposal_image, is_public_group_role,
    is_public_group_vote,
};
use super::{RuleExpr, ShieldBindings, and, or};

const PROPOSAL_ACTION_TYPES: [&str; 6] = [
    "ProposalAction",
    "ProposalActionEvent",
    "ProposalActionGroupConfig",
    "ProposalActionPermission",
    "ProposalActionRole",
    "ProposalActionRoleMember",
];

/// Binding table for the Praxis GraphQL schema.
///
/// Read paths on group content combine authentication with the public-group
/// bypass. Mutations are only ever gated by ownership or permission flags.
#[must_use]
pub fn praxis_bindings(fallback: RuleExpr) -> ShieldBindings {
    let bindings = query_bindings(ShieldBindings::new(fallback));
    let bindings = mutation_bindings(bindings);
    type_bindings(bindings)
}

fn query_bindings(bindings: ShieldBindings) -> ShieldBindings {
    bindings
        .bind("Query", "me", is_authenticated())
        .bind("Query", "post", or([is_authenticated(), is_public_group_post()]))
        .bind(
            "Query",
            "proposal",
            or([is_authenticated(), is_public_group_proposal()]),
        )
        .bind("Query", "group", or([is_authenticated(), is_public_group()]))
        .bind("Query", "event", or([is_authenticated(), is_public_group_event()]))
        .bind(
            "Query",
            "groupRole",
            and([is_authenticated(), is_group_member()]),
        )
        .bind("Query", "serverInvites", can_manage_invites())
        .bind("Query", "serverRoles", can_manage_server_roles())
        .bind(
            "Query",
            "questionnaireTickets",
            can_manage_questionnaire_tickets(),
        )
}

fn mutation_bindings(bindings: ShieldBindings) -> ShieldBindings {
    let role_by_arg_id = || ScopeSource::resource(ResourceKind::GroupRole, IdSource::args(&["id"]));

    bindings
        // Posts and comments
        .bind("Mutation", "createPost", is_authenticated())
        .bind("Mutation", "updatePost", is_own_post())
        .bind(
            "Mutation",
            "deletePost",
            or([is_own_post(), can_manage_posts(), can_manage_group_posts()]),
        )
        .bind("Mutation", "createComment", is_authenticated())
        .bind("Mutation", "updateComment", is_own_comment())
        .bind(
            "Mutation",
            "deleteComment",
            or([is_own_comment(), can_manage_comments()]),
        )
        // Proposals and votes
        .bind("Mutation", "createProposal", is_authenticated())
        .bind("Mutation", "updateProposal", is_own_proposal())
        .bind("Mutation", "deleteProposal", is_own_proposal())
        .bind(
            "Mutation",
            "createVote",
            and([is_authenticated(), is_proposal_group_joined_by_me()]),
        )
        .bind(
            "Mutation",
            "updateVote",
            is_own_vote(IdSource::args(&["voteData", "id"])),
        )
        .bind("Mutation", "deleteVote", is_own_vote(IdSource::args(&["id"])))
        // Groups
        .bind("Mutation", "updateGroup", can_update_group())
        .bind("Mutation", "deleteGroup", can_delete_group())
        .bind("Mutation", "updateGroupConfig", can_manage_group_settings())
        .bind(
            "Mutation",
            "createGroupRole",
            can_manage_group_roles(ScopeSource::group(IdSource::args(&[
                "groupRoleData",
                "groupId",
            ]))),
        )
        .bind(
            "Mutation",
            "updateGroupRole",
            can_manage_group_roles(ScopeSource::resource(
                ResourceKind::GroupRole,
                IdSource::args(&["groupRoleData", "id"]),
            )),
        )
        .bind(
            "Mutation",
            "deleteGroupRole",
            can_manage_group_roles(role_by_arg_id()),
        )
        .bind(
            "Mutation",
            "deleteGroupRoleMember",
            can_manage_group_roles(ScopeSource::resource(
                ResourceKind::GroupRole,
                IdSource::args(&["groupRoleMemberData", "groupRoleId"]),
            )),
        )
        .bind(
            "Mutation",
            "approveGroupMemberRequest",
            can_approve_group_member_requests(ScopeSource::resource(
                ResourceKind::MemberRequest,
                IdSource::args(&["id"]),
            )),
        )
        .bind(
            "Mutation",
            "removeGroupMember",
            can_remove_group_members(ScopeSource::group(IdSource::args(&["groupId"]))),
        )
        // Events
        .bind(
            "Mutation",
            "createEvent",
            or([
                can_manage_events(),
                can_create_group_events(ScopeSource::group(IdSource::args(&[
                    "eventData",
                    "groupId",
                ]))),
            ]),
        )
        .bind(
            "Mutation",
            "updateEvent",
            or([
                can_manage_events(),
                can_manage_group_events(ScopeSource::resource(
                    ResourceKind::Event,
                    IdSource::args(&["eventData", "id"]),
                )),
            ]),
        )
        .bind(
            "Mutation",
            "deleteEvent",
            or([
                can_manage_events(),
                can_manage_group_events(ScopeSource::resource(
                    ResourceKind::Event,
                    IdSource::args(&["id"]),
                )),
            ]),
        )
        // Server administration
        .bind("Mutation", "createServerInvite", can_create_invites())
        .bind("Mutation", "deleteServerInvite", can_manage_invites())
        .bind("Mutation", "createServerRole", can_manage_server_roles())
        .bind("Mutation", "updateServerRole", can_manage_server_roles())
        .bind("Mutation", "deleteServerRole", can_manage_server_roles())
        .bind("Mutation", "banUser", can_ban_members())
        .bind("Mutation", "removeMember", can_remove_members())
        // Questionnaires
        .bind(
            "Mutation",
            "approveQuestionnaireTicket",
            can_manage_questionnaire_tickets(),
        )
        .bind("Mutation", "createQuestion", can_manage_questions())
        .bind("Mutation", "updateQuestion", can_manage_questions())
        .bind("Mutation", "deleteQuestion", can_manage_questions())
        .bind("Mutation", "answerQuestions", is_authenticated())
        // Session
        .bind("Mutation", "refreshToken", has_valid_refresh_token())
        .bind("Mutation", "logOut", is_authenticated())
}

fn type_bindings(bindings: ShieldBindings) -> ShieldBindings {
    let group_by_parent_id = || ScopeSource::group(IdSource::parent("id"));

    let bindings = bindings
        .bind(
            "Group",
            "roles",
            can_manage_group_roles(group_by_parent_id()),
        )
        .bind(
            "Group",
            "memberRequests",
            can_approve_group_member_requests(group_by_parent_id()),
        )
        .bind(
            "Group",
            "memberRequestCount",
            can_approve_group_member_requests(group_by_parent_id()),
        )
        .bind_type("Post", or([is_authenticated(), is_public_group_post()]))
        .bind_type(
            "Proposal",
            or([is_authenticated(), is_public_group_proposal()]),
        )
        .bind_type("GroupRole", or([is_authenticated(), is_public_group_role()]))
        .bind_type(
            "Image",
            or([
                is_authenticated(),
                is_public_group_image(),
                is_public_group_post_image(),
                is_public_group_event_image(),
                is_public_group_proposal_image(),
            ]),
        )
        .bind_type("Vote", or([is_authenticated(), is_public_group_vote()]))
        .bind_type("Event", or([is_authenticated(), is_public_group_event()]))
        .bind_type(
            "QuestionnaireTicket",
            or([
                is_own_questionnaire_ticket(),
                can_manage_questionnaire_tickets(),
            ]),
        )
        .bind_type(
            "QuestionnaireTicketComment",
            or([
                is_own_questionnaire_ticket_comment(),
                can_manage_questionnaire_tickets(),
            ]),
        )
        .bind_type(
            "Question",
            or([is_own_question(), can_manage_questionnaire_tickets()]),
        )
        .bind_type(
            "Answer",
            or([is_own_answer(), can_manage_questionnaire_tickets()]),
        );

    PROPOSAL_ACTION_TYPES
        .into_iter()
        .fold(bindings, |bindings, type_name| {
            bindings.bind_type(
                type_name,
                or([is_authenticated(), is_public_group_proposal_action()]),
            )
        })
}
