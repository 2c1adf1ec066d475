use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use praxis_core::AppError;
use serde::{Deserialize, Serialize};

use crate::GroupId;

/// Server-wide permissions granted through server roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ServerPermission {
    /// Allows creating server invites.
    CreateInvites,
    /// Allows listing and deleting any server invite.
    ManageInvites,
    /// Allows editing and deleting any post.
    ManagePosts,
    /// Allows deleting any comment.
    ManageComments,
    /// Allows editing and deleting any event.
    ManageEvents,
    /// Allows managing server roles and their members.
    ManageRoles,
    /// Allows banning server members.
    BanMembers,
    /// Allows removing server members.
    RemoveMembers,
    /// Allows reviewing questionnaire tickets.
    ManageQuestionnaireTickets,
    /// Allows editing the server questionnaire.
    ManageQuestions,
}

impl ServerPermission {
    /// Returns a stable storage value for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateInvites => "createInvites",
            Self::ManageInvites => "manageInvites",
            Self::ManagePosts => "managePosts",
            Self::ManageComments => "manageComments",
            Self::ManageEvents => "manageEvents",
            Self::ManageRoles => "manageRoles",
            Self::BanMembers => "banMembers",
            Self::RemoveMembers => "removeMembers",
            Self::ManageQuestionnaireTickets => "manageQuestionnaireTickets",
            Self::ManageQuestions => "manageQuestions",
        }
    }

    /// Returns all known server permissions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[ServerPermission] = &[
            ServerPermission::CreateInvites,
            ServerPermission::ManageInvites,
            ServerPermission::ManagePosts,
            ServerPermission::ManageComments,
            ServerPermission::ManageEvents,
            ServerPermission::ManageRoles,
            ServerPermission::BanMembers,
            ServerPermission::RemoveMembers,
            ServerPermission::ManageQuestionnaireTickets,
            ServerPermission::ManageQuestions,
        ];

        ALL
    }
}

impl FromStr for ServerPermission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|permission| permission.as_str() == value)
            .ok_or_else(|| {
                AppError::Validation(format!("unknown server permission value '{value}'"))
            })
    }
}

/// Group-scoped permissions granted through group roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupPermission {
    /// Allows editing the group name, description and cover photo.
    UpdateGroup,
    /// Allows deleting the group.
    DeleteGroup,
    /// Allows removing posts made in the group.
    ManagePosts,
    /// Allows removing comments made in the group.
    ManageComments,
    /// Allows managing group roles and their members.
    ManageRoles,
    /// Allows approving requests to join the group.
    ApproveMemberRequests,
    /// Allows removing group members.
    RemoveMembers,
    /// Allows changing group settings such as privacy.
    ManageSettings,
    /// Allows creating group events.
    CreateEvents,
    /// Allows editing and deleting group events.
    ManageEvents,
}

impl GroupPermission {
    /// Returns a stable storage value for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UpdateGroup => "updateGroup",
            Self::DeleteGroup => "deleteGroup",
            Self::ManagePosts => "managePosts",
            Self::ManageComments => "manageComments",
            Self::ManageRoles => "manageRoles",
            Self::ApproveMemberRequests => "approveMemberRequests",
            Self::RemoveMembers => "removeMembers",
            Self::ManageSettings => "manageSettings",
            Self::CreateEvents => "createEvents",
            Self::ManageEvents => "manageEvents",
        }
    }

    /// Returns all known group permissions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[GroupPermission] = &[
            GroupPermission::UpdateGroup,
            GroupPermission::DeleteGroup,
            GroupPermission::ManagePosts,
            GroupPermission::ManageComments,
            GroupPermission::ManageRoles,
            GroupPermission::ApproveMemberRequests,
            GroupPermission::RemoveMembers,
            GroupPermission::ManageSettings,
            GroupPermission::CreateEvents,
            GroupPermission::ManageEvents,
        ];

        ALL
    }
}

impl FromStr for GroupPermission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|permission| permission.as_str() == value)
            .ok_or_else(|| {
                AppError::Validation(format!("unknown group permission value '{value}'"))
            })
    }
}

/// A permission flag drawn from one of the two disjoint namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Server-wide flag, checked without a scope.
    Server(ServerPermission),
    /// Group-scoped flag, checked against a group id.
    Group(GroupPermission),
}

impl From<ServerPermission> for Permission {
    fn from(value: ServerPermission) -> Self {
        Self::Server(value)
    }
}

impl From<GroupPermission> for Permission {
    fn from(value: GroupPermission) -> Self {
        Self::Group(value)
    }
}

/// Resolved permissions of one caller for the lifetime of one request.
///
/// Server and group flags are independent: holding a server flag never implies
/// the group flag of the same name. Any inheritance has to be granted
/// explicitly through [`PermissionStoreBuilder`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionStore {
    server: HashSet<ServerPermission>,
    groups: HashMap<GroupId, HashSet<GroupPermission>>,
}

impl PermissionStore {
    /// Returns an empty store, as used for anonymous callers.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Starts building a store.
    #[must_use]
    pub fn builder() -> PermissionStoreBuilder {
        PermissionStoreBuilder::default()
    }

    /// Tests a flag against the server set when `scope` is absent, or against
    /// the group set of `scope` otherwise. A missing group entry is empty.
    #[must_use]
    pub fn has_permission(&self, permission: Permission, scope: Option<GroupId>) -> bool {
        match (permission, scope) {
            (Permission::Server(permission), None) => self.has_server_permission(permission),
            (Permission::Group(permission), Some(group_id)) => {
                self.has_group_permission(permission, group_id)
            }
            _ => false,
        }
    }

    /// Returns whether the server-wide flag is held.
    #[must_use]
    pub fn has_server_permission(&self, permission: ServerPermission) -> bool {
        self.server.contains(&permission)
    }

    /// Returns whether the flag is held for the given group.
    #[must_use]
    pub fn has_group_permission(&self, permission: GroupPermission, group_id: GroupId) -> bool {
        self.groups
            .get(&group_id)
            .is_some_and(|permissions| permissions.contains(&permission))
    }

    /// Returns the server-wide flags.
    #[must_use]
    pub fn server_permissions(&self) -> &HashSet<ServerPermission> {
        &self.server
    }

    /// Returns the groups with at least one flag.
    pub fn groups(&self) -> impl Iterator<Item = GroupId> + '_ {
        self.groups.keys().copied()
    }
}

/// Accumulates role grants into an immutable [`PermissionStore`].
#[derive(Debug, Clone, Default)]
pub struct PermissionStoreBuilder {
    store: PermissionStore,
}

impl PermissionStoreBuilder {
    /// Grants a server-wide flag.
    #[must_use]
    pub fn server(mut self, permission: ServerPermission) -> Self {
        self.store.server.insert(permission);
        self
    }

    /// Grants a flag for one group.
    #[must_use]
    pub fn group(mut self, group_id: GroupId, permission: GroupPermission) -> Self {
        self.store
            .groups
            .entry(group_id)
            .or_default()
            .insert(permission);
        self
    }

    /// Grants every flag yielded by the iterator at server level.
    #[must_use]
    pub fn server_all(self, permissions: impl IntoIterator<Item = ServerPermission>) -> Self {
        permissions
            .into_iter()
            .fold(self, |builder, permission| builder.server(permission))
    }

    /// Grants every `(group, flag)` pair yielded by the iterator.
    #[must_use]
    pub fn group_all(
        self,
        grants: impl IntoIterator<Item = (GroupId, GroupPermission)>,
    ) -> Self {
        grants
            .into_iter()
            .fold(self, |builder, (group_id, permission)| {
                builder.group(group_id, permission)
            })
    }

    /// Finishes the store.
    #[must_use]
    pub fn build(self) -> PermissionStore {
        self.store
    }
}
