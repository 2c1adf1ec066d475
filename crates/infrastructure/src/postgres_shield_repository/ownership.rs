use super::*;

fn ownership_query(resource: OwnedResource) -> (&'static str, i64) {
    match resource {
        OwnedResource::Post(id) => (
            "SELECT EXISTS (SELECT 1 FROM posts WHERE id = $1 AND user_id = $2)",
            id.as_i64(),
        ),
        OwnedResource::Proposal(id) => (
            "SELECT EXISTS (SELECT 1 FROM proposals WHERE id = $1 AND user_id = $2)",
            id.as_i64(),
        ),
        OwnedResource::Comment(id) => (
            "SELECT EXISTS (SELECT 1 FROM comments WHERE id = $1 AND user_id = $2)",
            id.as_i64(),
        ),
        OwnedResource::Vote(id) => (
            "SELECT EXISTS (SELECT 1 FROM votes WHERE id = $1 AND user_id = $2)",
            id.as_i64(),
        ),
        OwnedResource::Answer(id) => (
            "SELECT EXISTS (SELECT 1 FROM answers WHERE id = $1 AND user_id = $2)",
            id.as_i64(),
        ),
        OwnedResource::QuestionnaireTicket(id) => (
            "SELECT EXISTS (SELECT 1 FROM questionnaire_tickets WHERE id = $1 AND user_id = $2)",
            id.as_i64(),
        ),
        OwnedResource::Question(id) => (
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM questions
                INNER JOIN questionnaire_tickets AS tickets
                    ON tickets.id = questions.questionnaire_ticket_id
                WHERE questions.id = $1
                    AND tickets.user_id = $2
            )
            "#,
            id.as_i64(),
        ),
        OwnedResource::QuestionnaireTicketComment(id) => (
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM comments
                INNER JOIN questionnaire_tickets AS tickets
                    ON tickets.id = comments.questionnaire_ticket_id
                WHERE comments.id = $1
                    AND tickets.user_id = $2
            )
            "#,
            id.as_i64(),
        ),
    }
}

impl PostgresShieldRepository {
    pub(super) async fn is_owned_by_impl(
        &self,
        resource: OwnedResource,
        user_id: UserId,
    ) -> AppResult<bool> {
        let (sql, id) = ownership_query(resource);

        sqlx::query_scalar::<_, bool>(sql)
            .bind(id)
            .bind(user_id.as_i64())
            .fetch_one(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to check ownership of {resource:?} for user '{user_id}': {error}"
                ))
            })
    }
}
