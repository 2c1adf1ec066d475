use praxis_core::AppError;
use praxis_domain::ImageLink;

use super::*;

fn missing(resource: ResourceRef) -> AppError {
    AppError::NotFound(resource.to_string())
}

impl ShieldState {
    pub(super) fn resolve(&self, resource: &ResourceRef) -> AppResult<Option<GroupScope>> {
        match resource {
            ResourceRef::Group(id) => self.group_scope(*id).map(Some),
            ResourceRef::GroupName(name) => {
                let group_id = self
                    .groups
                    .iter()
                    .find_map(|(id, group)| (group.name == *name).then_some(*id))
                    .ok_or_else(|| missing(resource.clone()))?;
                self.group_scope(group_id).map(Some)
            }
            ResourceRef::Post(id) => self.post_scope(*id),
            ResourceRef::Proposal(id) => self.proposal_scope(*id),
            ResourceRef::ProposalAction(id) => self.proposal_action_scope(*id),
            ResourceRef::ProposalActionRole(id) => self.proposal_action_role_scope(*id),
            ResourceRef::ProposalActionRoleMember(id) => {
                let role = self
                    .proposal_action_role_members
                    .get(id)
                    .ok_or_else(|| missing(resource.clone()))?;
                self.proposal_action_role_scope(*role)
            }
            ResourceRef::Event(id) => self.event_scope(*id),
            ResourceRef::GroupRole(id) => {
                let role = self
                    .group_roles
                    .get(id)
                    .ok_or_else(|| missing(resource.clone()))?;
                self.group_scope(role.group).map(Some)
            }
            ResourceRef::MemberRequest(id) => {
                let group_id = self
                    .member_requests
                    .get(id)
                    .ok_or_else(|| missing(resource.clone()))?;
                self.group_scope(*group_id).map(Some)
            }
            ResourceRef::Image(id, link) => {
                let parent = self
                    .images
                    .get(id)
                    .ok_or_else(|| missing(resource.clone()))?;
                self.image_scope(*parent, *link)
            }
            ResourceRef::Vote(id) => {
                let vote = self
                    .votes
                    .get(id)
                    .ok_or_else(|| missing(resource.clone()))?;
                self.proposal_scope(vote.proposal)
            }
        }
    }

    fn group_scope(&self, group_id: GroupId) -> AppResult<GroupScope> {
        self.groups
            .get(&group_id)
            .map(|group| GroupScope::new(group_id, group.privacy))
            .ok_or_else(|| missing(ResourceRef::Group(group_id)))
    }

    fn optional_group_scope(&self, group_id: Option<GroupId>) -> AppResult<Option<GroupScope>> {
        group_id
            .map(|group_id| self.group_scope(group_id))
            .transpose()
    }

    fn post_scope(&self, post_id: PostId) -> AppResult<Option<GroupScope>> {
        let post = self
            .posts
            .get(&post_id)
            .ok_or_else(|| missing(ResourceRef::Post(post_id)))?;
        self.optional_group_scope(post.group)
    }

    fn proposal_scope(&self, proposal_id: ProposalId) -> AppResult<Option<GroupScope>> {
        let proposal = self
            .proposals
            .get(&proposal_id)
            .ok_or_else(|| missing(ResourceRef::Proposal(proposal_id)))?;
        self.optional_group_scope(proposal.group)
    }

    fn proposal_action_scope(
        &self,
        proposal_action_id: ProposalActionId,
    ) -> AppResult<Option<GroupScope>> {
        let proposal_id = self
            .proposal_actions
            .get(&proposal_action_id)
            .ok_or_else(|| missing(ResourceRef::ProposalAction(proposal_action_id)))?;
        self.proposal_scope(*proposal_id)
    }

    fn proposal_action_role_scope(
        &self,
        role_id: ProposalActionRoleId,
    ) -> AppResult<Option<GroupScope>> {
        let proposal_action_id = self
            .proposal_action_roles
            .get(&role_id)
            .ok_or_else(|| missing(ResourceRef::ProposalActionRole(role_id)))?;
        self.proposal_action_scope(*proposal_action_id)
    }

    fn event_scope(&self, event_id: EventId) -> AppResult<Option<GroupScope>> {
        let group_id = self
            .events
            .get(&event_id)
            .ok_or_else(|| missing(ResourceRef::Event(event_id)))?;
        self.optional_group_scope(*group_id)
    }

    fn image_scope(&self, parent: ImageParent, link: ImageLink) -> AppResult<Option<GroupScope>> {
        match (link, parent) {
            (ImageLink::Group, ImageParent::Group(group_id)) => {
                self.group_scope(group_id).map(Some)
            }
            (ImageLink::Post, ImageParent::Post(post_id)) => self.post_scope(post_id),
            (ImageLink::Event, ImageParent::Event(event_id)) => self.event_scope(event_id),
            (ImageLink::Proposal, ImageParent::Proposal(proposal_id)) => {
                self.proposal_scope(proposal_id)
            }
            (ImageLink::ProposalAction, ImageParent::ProposalAction(proposal_action_id)) => {
                self.proposal_action_scope(proposal_action_id)
            }
            _ => Ok(None),
        }
    }
}
