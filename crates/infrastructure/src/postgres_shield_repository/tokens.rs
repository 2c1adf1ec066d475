use super::*;

impl PostgresShieldRepository {
    pub(super) async fn validate_refresh_token_impl(
        &self,
        token_id: Uuid,
        subject: UserId,
    ) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM refresh_tokens
                WHERE id = $1
                    AND user_id = $2
                    AND expires_at > now()
            )
            "#,
        )
        .bind(token_id)
        .bind(subject.as_i64())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to validate refresh token: {error}"))
        })
    }

    pub(super) async fn find_identity_by_token_hash_impl(
        &self,
        token_hash: &str,
    ) -> AppResult<Option<UserIdentity>> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT users.id, users.name, users.email
            FROM access_tokens AS tokens
            INNER JOIN users ON users.id = tokens.user_id
            WHERE tokens.token_hash = $1
                AND tokens.expires_at > now()
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find access token: {error}")))?;

        Ok(row.map(|row| UserIdentity::new(UserId::new(row.id), row.name, row.email)))
    }
}
