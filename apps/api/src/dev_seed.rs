use chrono::{Duration, Utc};
use praxis_application::hash_access_token;
use praxis_core::{AppError, AppResult, UserId, UserIdentity};
use praxis_domain::{
    CommentId, EventId, GroupId, GroupPermission, GroupPrivacy, GroupRoleId, ImageId,
    MemberRequestId, PostId, ProposalActionId, ProposalActionRoleId, ProposalId,
    QuestionId, QuestionnaireTicketId, ServerPermission, VoteId,
};
use praxis_infrastructure::{ImageParent, InMemoryShieldRepository};
use tracing::info;
use uuid::Uuid;

const DEV_SEED_ADMIN_TOKEN: &str = "praxis-dev-admin";
const DEV_SEED_ORGANIZER_TOKEN: &str = "praxis-dev-organizer";
const DEV_SEED_MEMBER_TOKEN: &str = "praxis-dev-member";
const DEV_SEED_REFRESH_TOKEN_ID: &str = "5f0c6a55-7d0e-4c2e-9a51-3c1b1b6f8e21";

const ADMIN: UserId = UserId::new(1);
const ORGANIZER: UserId = UserId::new(2);
const MEMBER: UserId = UserId::new(3);
const APPLICANT: UserId = UserId::new(4);

const COMMONS: GroupId = GroupId::new(1);
const ORGANIZERS: GroupId = GroupId::new(2);

/// Fills the in-memory store with a small community for local development.
///
/// The raw bearer tokens are logged so requests can be issued by hand.
pub async fn run(repository: &InMemoryShieldRepository) -> AppResult<()> {
    seed_users(repository).await?;
    seed_groups(repository).await;
    seed_content(repository).await;
    seed_questionnaire(repository).await;

    info!(
        admin_token = DEV_SEED_ADMIN_TOKEN,
        organizer_token = DEV_SEED_ORGANIZER_TOKEN,
        member_token = DEV_SEED_MEMBER_TOKEN,
        refresh_token_id = DEV_SEED_REFRESH_TOKEN_ID,
        "dev seed data loaded"
    );
    Ok(())
}

async fn seed_users(repository: &InMemoryShieldRepository) -> AppResult<()> {
    let expires_at = Utc::now() + Duration::days(30);
    let users = [
        (DEV_SEED_ADMIN_TOKEN, ADMIN, "admin"),
        (DEV_SEED_ORGANIZER_TOKEN, ORGANIZER, "organizer"),
        (DEV_SEED_MEMBER_TOKEN, MEMBER, "member"),
    ];
    for (token, user_id, name) in users {
        repository
            .add_access_token(
                hash_access_token(token),
                UserIdentity::new(user_id, name, Some(format!("{name}@praxis.local"))),
                expires_at,
            )
            .await;
    }

    let refresh_token_id = Uuid::parse_str(DEV_SEED_REFRESH_TOKEN_ID).map_err(|error| {
        AppError::Internal(format!("invalid dev seed refresh token id: {error}"))
    })?;
    repository
        .add_refresh_token(refresh_token_id, MEMBER, expires_at)
        .await;

    repository
        .add_server_role(1, ServerPermission::all().iter().copied())
        .await;
    repository.assign_server_role(1, ADMIN).await;
    Ok(())
}

async fn seed_groups(repository: &InMemoryShieldRepository) {
    repository
        .add_group(COMMONS, "commons", GroupPrivacy::Public)
        .await;
    repository
        .add_group(ORGANIZERS, "organizers", GroupPrivacy::Private)
        .await;

    for group_id in [COMMONS, ORGANIZERS] {
        repository.add_group_member(group_id, ORGANIZER).await;
        repository.add_group_member(group_id, MEMBER).await;
    }
    repository
        .add_member_request(MemberRequestId::new(1), ORGANIZERS)
        .await;

    repository
        .add_group_role(
            GroupRoleId::new(1),
            ORGANIZERS,
            GroupPermission::all().iter().copied(),
        )
        .await;
    repository
        .assign_group_role(GroupRoleId::new(1), ORGANIZER)
        .await;
    repository
        .add_group_role(
            GroupRoleId::new(2),
            COMMONS,
            [GroupPermission::CreateEvents, GroupPermission::ManagePosts],
        )
        .await;
    repository
        .assign_group_role(GroupRoleId::new(2), MEMBER)
        .await;
    repository
        .add_image(ImageId::new(1), ImageParent::Group(COMMONS))
        .await;
}

async fn seed_content(repository: &InMemoryShieldRepository) {
    repository
        .add_post(PostId::new(1), MEMBER, Some(COMMONS))
        .await;
    repository
        .add_post(PostId::new(2), ORGANIZER, Some(ORGANIZERS))
        .await;
    repository.add_post(PostId::new(3), ADMIN, None).await;
    repository
        .add_image(ImageId::new(2), ImageParent::Post(PostId::new(2)))
        .await;
    repository
        .add_comment(CommentId::new(1), MEMBER, None)
        .await;

    repository
        .add_proposal(ProposalId::new(1), ORGANIZER, Some(ORGANIZERS))
        .await;
    repository
        .add_proposal_action(ProposalActionId::new(1), ProposalId::new(1))
        .await;
    repository
        .add_proposal_action_role(ProposalActionRoleId::new(1), ProposalActionId::new(1))
        .await;
    repository
        .add_vote(VoteId::new(1), MEMBER, ProposalId::new(1))
        .await;

    repository.add_event(EventId::new(1), Some(COMMONS)).await;
    repository
        .add_image(ImageId::new(3), ImageParent::Event(EventId::new(1)))
        .await;
}

async fn seed_questionnaire(repository: &InMemoryShieldRepository) {
    repository
        .add_questionnaire_ticket(QuestionnaireTicketId::new(1), APPLICANT)
        .await;
    repository
        .add_question(QuestionId::new(1), QuestionnaireTicketId::new(1))
        .await;
    repository
        .add_comment(
            CommentId::new(2),
            ADMIN,
            Some(QuestionnaireTicketId::new(1)),
        )
        .await;
}
