//! Domain entities and invariants for the Praxis authorization shield.

#![forbid(unsafe_code)]

mod group;
mod ids;
mod outcome;
mod resource;
mod security;

pub use group::{GroupPrivacy, GroupScope};
pub use ids::{
    AnswerId, CommentId, EventId, GroupId, GroupRoleId, ImageId, MemberRequestId, PostId,
    ProposalActionId, ProposalActionRoleId, ProposalActionRoleMemberId, ProposalId, QuestionId,
    QuestionnaireTicketId, VoteId,
};
pub use outcome::{DenyReason, Outcome, UNAUTHORIZED_MESSAGE};
pub use resource::{ImageLink, OwnedKind, OwnedResource, ResourceKind, ResourceRef};
pub use security::{
    GroupPermission, Permission, PermissionStore, PermissionStoreBuilder, ServerPermission,
};
