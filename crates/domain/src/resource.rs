//! References to resources the shield walks from to reach an owning group or
//! an owning user.

use std::fmt::{Display, Formatter};

use crate::{
    AnswerId, CommentId, EventId, GroupId, GroupRoleId, ImageId, MemberRequestId, PostId,
    ProposalActionId, ProposalActionRoleId, ProposalActionRoleMemberId, ProposalId, QuestionId,
    QuestionnaireTicketId, VoteId,
};

/// Which parent link of an image is followed to reach a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageLink {
    /// Group cover photo.
    Group,
    /// Image attached to a post.
    Post,
    /// Event cover photo.
    Event,
    /// Image attached to a proposal.
    Proposal,
    /// Image attached to a proposal action (e.g. a proposed cover photo).
    ProposalAction,
}

/// Kinds of scope-bearing resources, used when a binding declares how to
/// reach a group from a bare numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// The id is a group id.
    Group,
    /// Post, optionally owned by a group.
    Post,
    /// Proposal, optionally owned by a group.
    Proposal,
    /// Proposal action, owned through its proposal.
    ProposalAction,
    /// Proposal action role, owned through its proposal action.
    ProposalActionRole,
    /// Proposal action role member, owned through its proposal action role.
    ProposalActionRoleMember,
    /// Event, optionally owned by a group.
    Event,
    /// Group role.
    GroupRole,
    /// Request to join a group.
    MemberRequest,
    /// Image, owned through the given link.
    Image(ImageLink),
    /// Vote, owned through its proposal.
    Vote,
}

/// Concrete reference to a scope-bearing resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceRef {
    /// Group by id.
    Group(GroupId),
    /// Group by unique name.
    GroupName(String),
    /// Post by id.
    Post(PostId),
    /// Proposal by id.
    Proposal(ProposalId),
    /// Proposal action by id.
    ProposalAction(ProposalActionId),
    /// Proposal action role by id.
    ProposalActionRole(ProposalActionRoleId),
    /// Proposal action role member by id.
    ProposalActionRoleMember(ProposalActionRoleMemberId),
    /// Event by id.
    Event(EventId),
    /// Group role by id.
    GroupRole(GroupRoleId),
    /// Member request by id.
    MemberRequest(MemberRequestId),
    /// Image by id, followed through one parent link.
    Image(ImageId, ImageLink),
    /// Vote by id.
    Vote(VoteId),
}

impl ResourceRef {
    /// Builds a reference of the given kind from a raw numeric id.
    #[must_use]
    pub fn from_kind(kind: ResourceKind, id: i64) -> Self {
        match kind {
            ResourceKind::Group => Self::Group(GroupId::new(id)),
            ResourceKind::Post => Self::Post(PostId::new(id)),
            ResourceKind::Proposal => Self::Proposal(ProposalId::new(id)),
            ResourceKind::ProposalAction => Self::ProposalAction(ProposalActionId::new(id)),
            ResourceKind::ProposalActionRole => {
                Self::ProposalActionRole(ProposalActionRoleId::new(id))
            }
            ResourceKind::ProposalActionRoleMember => {
                Self::ProposalActionRoleMember(ProposalActionRoleMemberId::new(id))
            }
            ResourceKind::Event => Self::Event(EventId::new(id)),
            ResourceKind::GroupRole => Self::GroupRole(GroupRoleId::new(id)),
            ResourceKind::MemberRequest => Self::MemberRequest(MemberRequestId::new(id)),
            ResourceKind::Image(link) => Self::Image(ImageId::new(id), link),
            ResourceKind::Vote => Self::Vote(VoteId::new(id)),
        }
    }

    /// Returns the relation path eagerly loaded to reach the group config.
    #[must_use]
    pub fn relation_path(&self) -> &'static str {
        match self {
            Self::Group(_) | Self::GroupName(_) => "config",
            Self::Post(_)
            | Self::Proposal(_)
            | Self::Event(_)
            | Self::GroupRole(_)
            | Self::MemberRequest(_) => "group.config",
            Self::ProposalAction(_) | Self::Vote(_) => "proposal.group.config",
            Self::ProposalActionRole(_) => "proposalAction.proposal.group.config",
            Self::ProposalActionRoleMember(_) => {
                "proposalActionRole.proposalAction.proposal.group.config"
            }
            Self::Image(_, link) => match link {
                ImageLink::Group => "group.config",
                ImageLink::Post => "post.group.config",
                ImageLink::Event => "event.group.config",
                ImageLink::Proposal => "proposal.group.config",
                ImageLink::ProposalAction => "proposalAction.proposal.group.config",
            },
        }
    }
}

impl Display for ResourceRef {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Group(id) => write!(formatter, "group '{id}'"),
            Self::GroupName(name) => write!(formatter, "group named '{name}'"),
            Self::Post(id) => write!(formatter, "post '{id}'"),
            Self::Proposal(id) => write!(formatter, "proposal '{id}'"),
            Self::ProposalAction(id) => write!(formatter, "proposal action '{id}'"),
            Self::ProposalActionRole(id) => write!(formatter, "proposal action role '{id}'"),
            Self::ProposalActionRoleMember(id) => {
                write!(formatter, "proposal action role member '{id}'")
            }
            Self::Event(id) => write!(formatter, "event '{id}'"),
            Self::GroupRole(id) => write!(formatter, "group role '{id}'"),
            Self::MemberRequest(id) => write!(formatter, "member request '{id}'"),
            Self::Image(id, _) => write!(formatter, "image '{id}'"),
            Self::Vote(id) => write!(formatter, "vote '{id}'"),
        }
    }
}

/// Kinds of user-owned resources checked by ownership rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OwnedKind {
    /// Post author.
    Post,
    /// Proposal author.
    Proposal,
    /// Comment author.
    Comment,
    /// Voter.
    Vote,
    /// Questionnaire ticket whose question it is.
    Question,
    /// Answer author.
    Answer,
    /// Ticket applicant.
    QuestionnaireTicket,
    /// Applicant of the ticket a comment was left on.
    QuestionnaireTicketComment,
}

/// Concrete reference to a user-owned resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OwnedResource {
    /// Post by id.
    Post(PostId),
    /// Proposal by id.
    Proposal(ProposalId),
    /// Comment by id.
    Comment(CommentId),
    /// Vote by id.
    Vote(VoteId),
    /// Question by id.
    Question(QuestionId),
    /// Answer by id.
    Answer(AnswerId),
    /// Questionnaire ticket by id.
    QuestionnaireTicket(QuestionnaireTicketId),
    /// Comment on a questionnaire ticket, by comment id.
    QuestionnaireTicketComment(CommentId),
}

impl OwnedResource {
    /// Builds a reference of the given kind from a raw numeric id.
    #[must_use]
    pub fn from_kind(kind: OwnedKind, id: i64) -> Self {
        match kind {
            OwnedKind::Post => Self::Post(PostId::new(id)),
            OwnedKind::Proposal => Self::Proposal(ProposalId::new(id)),
            OwnedKind::Comment => Self::Comment(CommentId::new(id)),
            OwnedKind::Vote => Self::Vote(VoteId::new(id)),
            OwnedKind::Question => Self::Question(QuestionId::new(id)),
            OwnedKind::Answer => Self::Answer(AnswerId::new(id)),
            OwnedKind::QuestionnaireTicket => {
                Self::QuestionnaireTicket(QuestionnaireTicketId::new(id))
            }
            OwnedKind::QuestionnaireTicketComment => {
                Self::QuestionnaireTicketComment(CommentId::new(id))
            }
        }
    }
}
