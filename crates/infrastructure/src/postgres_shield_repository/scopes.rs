use std::str::FromStr;

use praxis_domain::{GroupPrivacy, ImageLink};
use tracing::debug;

use super::*;

/// Joins reaching the column that holds a resource's group id.
///
/// Intermediate links are foreign keys, so they are inner joined. The final
/// group link is nullable and left joined to tell ungrouped resources apart
/// from dangling ones.
struct ScopePath {
    from: &'static str,
    group_ref: &'static str,
}

fn scope_path(resource: &ResourceRef) -> ScopePath {
    let (from, group_ref) = match resource {
        ResourceRef::Group(_) | ResourceRef::GroupName(_) => ("groups AS target", "target.id"),
        ResourceRef::Post(_) => ("posts AS target", "target.group_id"),
        ResourceRef::Proposal(_) => ("proposals AS target", "target.group_id"),
        ResourceRef::Event(_) => ("events AS target", "target.group_id"),
        ResourceRef::GroupRole(_) => ("group_roles AS target", "target.group_id"),
        ResourceRef::MemberRequest(_) => ("group_member_requests AS target", "target.group_id"),
        ResourceRef::ProposalAction(_) => (
            "proposal_actions AS target \
             INNER JOIN proposals ON proposals.id = target.proposal_id",
            "proposals.group_id",
        ),
        ResourceRef::Vote(_) => (
            "votes AS target \
             INNER JOIN proposals ON proposals.id = target.proposal_id",
            "proposals.group_id",
        ),
        ResourceRef::ProposalActionRole(_) => (
            "proposal_action_roles AS target \
             INNER JOIN proposal_actions ON proposal_actions.id = target.proposal_action_id \
             INNER JOIN proposals ON proposals.id = proposal_actions.proposal_id",
            "proposals.group_id",
        ),
        ResourceRef::ProposalActionRoleMember(_) => (
            "proposal_action_role_members AS target \
             INNER JOIN proposal_action_roles \
                ON proposal_action_roles.id = target.proposal_action_role_id \
             INNER JOIN proposal_actions \
                ON proposal_actions.id = proposal_action_roles.proposal_action_id \
             INNER JOIN proposals ON proposals.id = proposal_actions.proposal_id",
            "proposals.group_id",
        ),
        ResourceRef::Image(_, link) => match link {
            ImageLink::Group => ("images AS target", "target.group_id"),
            ImageLink::Post => (
                "images AS target LEFT JOIN posts ON posts.id = target.post_id",
                "posts.group_id",
            ),
            ImageLink::Event => (
                "images AS target LEFT JOIN events ON events.id = target.event_id",
                "events.group_id",
            ),
            ImageLink::Proposal => (
                "images AS target LEFT JOIN proposals ON proposals.id = target.proposal_id",
                "proposals.group_id",
            ),
            ImageLink::ProposalAction => (
                "images AS target \
                 LEFT JOIN proposal_actions ON proposal_actions.id = target.proposal_action_id \
                 LEFT JOIN proposals ON proposals.id = proposal_actions.proposal_id",
                "proposals.group_id",
            ),
        },
    };

    ScopePath { from, group_ref }
}

fn resource_id(resource: &ResourceRef) -> Option<i64> {
    match resource {
        ResourceRef::Group(id) => Some(id.as_i64()),
        ResourceRef::GroupName(_) => None,
        ResourceRef::Post(id) => Some(id.as_i64()),
        ResourceRef::Proposal(id) => Some(id.as_i64()),
        ResourceRef::ProposalAction(id) => Some(id.as_i64()),
        ResourceRef::ProposalActionRole(id) => Some(id.as_i64()),
        ResourceRef::ProposalActionRoleMember(id) => Some(id.as_i64()),
        ResourceRef::Event(id) => Some(id.as_i64()),
        ResourceRef::GroupRole(id) => Some(id.as_i64()),
        ResourceRef::MemberRequest(id) => Some(id.as_i64()),
        ResourceRef::Image(id, _) => Some(id.as_i64()),
        ResourceRef::Vote(id) => Some(id.as_i64()),
    }
}

impl PostgresShieldRepository {
    pub(super) async fn resolve_scope_impl(
        &self,
        resource: &ResourceRef,
    ) -> AppResult<Option<GroupScope>> {
        let path = scope_path(resource);
        let filter = match resource {
            ResourceRef::GroupName(_) => "target.name = $1",
            _ => "target.id = $1",
        };
        let sql = format!(
            r#"
            SELECT
                {group_ref} AS group_ref,
                groups.id AS group_id,
                group_configs.privacy AS privacy
            FROM {from}
            LEFT JOIN groups ON groups.id = {group_ref}
            LEFT JOIN group_configs ON group_configs.group_id = groups.id
            WHERE {filter}
            "#,
            group_ref = path.group_ref,
            from = path.from,
        );

        debug!(
            resource = %resource,
            relation_path = resource.relation_path(),
            "loading group scope"
        );

        let query = sqlx::query_as::<_, ScopeRow>(sql.as_str());
        let query = match (resource, resource_id(resource)) {
            (ResourceRef::GroupName(name), _) => query.bind(name.as_str()),
            (_, id) => query.bind(id),
        };

        let row = query.fetch_optional(&self.pool).await.map_err(|error| {
            AppError::Internal(format!("failed to resolve scope of {resource}: {error}"))
        })?;

        let Some(row) = row else {
            return Err(AppError::NotFound(resource.to_string()));
        };

        decode_scope(resource, row)
    }
}

fn decode_scope(resource: &ResourceRef, row: ScopeRow) -> AppResult<Option<GroupScope>> {
    let Some(group_ref) = row.group_ref else {
        return Ok(None);
    };
    let Some(group_id) = row.group_id else {
        return Err(AppError::NotFound(
            ResourceRef::Group(GroupId::new(group_ref)).to_string(),
        ));
    };
    let Some(privacy) = row.privacy else {
        return Err(AppError::NotFound(format!(
            "config of group '{group_id}' reached from {resource}"
        )));
    };

    let privacy = GroupPrivacy::from_str(privacy.as_str()).map_err(|error| {
        AppError::Internal(format!(
            "failed to decode privacy '{privacy}' of group '{group_id}': {error}"
        ))
    })?;

    Ok(Some(GroupScope::new(GroupId::new(group_id), privacy)))
}
