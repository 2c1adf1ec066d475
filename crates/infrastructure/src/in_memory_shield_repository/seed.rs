use super::*;

impl InMemoryShieldRepository {
    /// Stores a group with its privacy setting.
    pub async fn add_group(
        &self,
        group_id: GroupId,
        name: impl Into<String>,
        privacy: GroupPrivacy,
    ) {
        self.state.write().await.groups.insert(
            group_id,
            GroupRecord {
                name: name.into(),
                privacy,
            },
        );
    }

    /// Adds a user to a group.
    pub async fn add_group_member(&self, group_id: GroupId, user_id: UserId) {
        self.state.write().await.members.insert((group_id, user_id));
    }

    /// Removes a user from a group.
    pub async fn remove_group_member(&self, group_id: GroupId, user_id: UserId) {
        self.state
            .write()
            .await
            .members
            .remove(&(group_id, user_id));
    }

    /// Stores a pending request to join a group.
    pub async fn add_member_request(&self, request_id: MemberRequestId, group_id: GroupId) {
        self.state
            .write()
            .await
            .member_requests
            .insert(request_id, group_id);
    }

    /// Stores a group role granting the given permissions.
    pub async fn add_group_role(
        &self,
        role_id: GroupRoleId,
        group_id: GroupId,
        permissions: impl IntoIterator<Item = GroupPermission>,
    ) {
        self.state.write().await.group_roles.insert(
            role_id,
            GroupRoleRecord {
                group: group_id,
                role: RoleRecord {
                    permissions: permissions.into_iter().collect(),
                    members: HashSet::new(),
                },
            },
        );
    }

    /// Assigns a group role to a user. Unknown roles are ignored.
    pub async fn assign_group_role(&self, role_id: GroupRoleId, user_id: UserId) {
        if let Some(record) = self.state.write().await.group_roles.get_mut(&role_id) {
            record.role.members.insert(user_id);
        }
    }

    /// Stores a server role granting the given permissions.
    pub async fn add_server_role(
        &self,
        role_id: i64,
        permissions: impl IntoIterator<Item = ServerPermission>,
    ) {
        self.state.write().await.server_roles.insert(
            role_id,
            RoleRecord {
                permissions: permissions.into_iter().collect(),
                members: HashSet::new(),
            },
        );
    }

    /// Assigns a server role to a user. Unknown roles are ignored.
    pub async fn assign_server_role(&self, role_id: i64, user_id: UserId) {
        if let Some(role) = self.state.write().await.server_roles.get_mut(&role_id) {
            role.members.insert(user_id);
        }
    }

    /// Stores a post, optionally posted in a group.
    pub async fn add_post(&self, post_id: PostId, author: UserId, group_id: Option<GroupId>) {
        self.state.write().await.posts.insert(
            post_id,
            AuthoredRecord {
                author,
                group: group_id,
            },
        );
    }

    /// Stores a proposal, optionally raised in a group.
    pub async fn add_proposal(
        &self,
        proposal_id: ProposalId,
        author: UserId,
        group_id: Option<GroupId>,
    ) {
        self.state.write().await.proposals.insert(
            proposal_id,
            AuthoredRecord {
                author,
                group: group_id,
            },
        );
    }

    /// Deletes a proposal without touching rows that reference it.
    pub async fn delete_proposal(&self, proposal_id: ProposalId) {
        self.state.write().await.proposals.remove(&proposal_id);
    }

    /// Stores the action of a proposal.
    pub async fn add_proposal_action(
        &self,
        proposal_action_id: ProposalActionId,
        proposal_id: ProposalId,
    ) {
        self.state
            .write()
            .await
            .proposal_actions
            .insert(proposal_action_id, proposal_id);
    }

    /// Stores a role proposed by a proposal action.
    pub async fn add_proposal_action_role(
        &self,
        role_id: ProposalActionRoleId,
        proposal_action_id: ProposalActionId,
    ) {
        self.state
            .write()
            .await
            .proposal_action_roles
            .insert(role_id, proposal_action_id);
    }

    /// Stores a member change proposed for a proposal action role.
    pub async fn add_proposal_action_role_member(
        &self,
        member_id: ProposalActionRoleMemberId,
        role_id: ProposalActionRoleId,
    ) {
        self.state
            .write()
            .await
            .proposal_action_role_members
            .insert(member_id, role_id);
    }

    /// Stores an event, optionally hosted by a group.
    pub async fn add_event(&self, event_id: EventId, group_id: Option<GroupId>) {
        self.state.write().await.events.insert(event_id, group_id);
    }

    /// Stores an image attached to one parent entity.
    pub async fn add_image(&self, image_id: ImageId, parent: ImageParent) {
        self.state.write().await.images.insert(image_id, parent);
    }

    /// Stores a vote on a proposal.
    pub async fn add_vote(&self, vote_id: VoteId, voter: UserId, proposal_id: ProposalId) {
        self.state.write().await.votes.insert(
            vote_id,
            VoteRecord {
                voter,
                proposal: proposal_id,
            },
        );
    }

    /// Stores a comment, optionally left on a questionnaire ticket.
    pub async fn add_comment(
        &self,
        comment_id: CommentId,
        author: UserId,
        ticket_id: Option<QuestionnaireTicketId>,
    ) {
        self.state.write().await.comments.insert(
            comment_id,
            CommentRecord {
                author,
                ticket: ticket_id,
            },
        );
    }

    /// Stores a questionnaire ticket for an applicant.
    pub async fn add_questionnaire_ticket(
        &self,
        ticket_id: QuestionnaireTicketId,
        applicant: UserId,
    ) {
        self.state
            .write()
            .await
            .questionnaire_tickets
            .insert(ticket_id, applicant);
    }

    /// Stores a question asked on a questionnaire ticket.
    pub async fn add_question(&self, question_id: QuestionId, ticket_id: QuestionnaireTicketId) {
        self.state
            .write()
            .await
            .questions
            .insert(question_id, ticket_id);
    }

    /// Stores an answer.
    pub async fn add_answer(&self, answer_id: AnswerId, author: UserId) {
        self.state.write().await.answers.insert(answer_id, author);
    }

    /// Stores a refresh token issued to a user.
    pub async fn add_refresh_token(
        &self,
        token_id: Uuid,
        user_id: UserId,
        expires_at: DateTime<Utc>,
    ) {
        self.state.write().await.refresh_tokens.insert(
            token_id,
            IssuedToken {
                holder: user_id,
                expires_at,
            },
        );
    }

    /// Stores an access token under its hash.
    pub async fn add_access_token(
        &self,
        token_hash: impl Into<String>,
        identity: UserIdentity,
        expires_at: DateTime<Utc>,
    ) {
        self.state.write().await.access_tokens.insert(
            token_hash.into(),
            IssuedToken {
                holder: identity,
                expires_at,
            },
        );
    }
}
