//! Numeric identifiers for scope-bearing and owned resources.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Creates an identifier from a stored numeric value.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the underlying numeric value.
            #[must_use]
            pub fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
                write!(formatter, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Group identifier. Every group-scoped permission is keyed by it.
    GroupId
);
entity_id!(
    /// Post identifier.
    PostId
);
entity_id!(
    /// Comment identifier.
    CommentId
);
entity_id!(
    /// Proposal identifier.
    ProposalId
);
entity_id!(
    /// Proposal action identifier.
    ProposalActionId
);
entity_id!(
    /// Proposal action role identifier.
    ProposalActionRoleId
);
entity_id!(
    /// Proposal action role member identifier.
    ProposalActionRoleMemberId
);
entity_id!(
    /// Event identifier.
    EventId
);
entity_id!(
    /// Group role identifier.
    GroupRoleId
);
entity_id!(
    /// Group member request identifier.
    MemberRequestId
);
entity_id!(
    /// Image identifier.
    ImageId
);
entity_id!(
    /// Vote identifier.
    VoteId
);
entity_id!(
    /// Question identifier.
    QuestionId
);
entity_id!(
    /// Answer identifier.
    AnswerId
);
entity_id!(
    /// Questionnaire ticket identifier.
    QuestionnaireTicketId
);
