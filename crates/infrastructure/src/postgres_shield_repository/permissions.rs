use std::str::FromStr;

use super::*;

impl PostgresShieldRepository {
    pub(super) async fn list_server_permissions_impl(
        &self,
        user_id: UserId,
    ) -> AppResult<Vec<ServerPermission>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT DISTINCT grants.permission
            FROM server_role_members AS members
            INNER JOIN server_role_permissions AS grants
                ON grants.server_role_id = members.server_role_id
            WHERE members.user_id = $1
            ORDER BY grants.permission
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to load server permissions: {error}"))
        })?;

        rows.into_iter()
            .map(|row| {
                ServerPermission::from_str(row.permission.as_str()).map_err(|error| {
                    AppError::Internal(format!(
                        "failed to decode server permission '{}' for user '{user_id}': {error}",
                        row.permission
                    ))
                })
            })
            .collect()
    }

    pub(super) async fn list_group_permissions_impl(
        &self,
        user_id: UserId,
    ) -> AppResult<Vec<(GroupId, GroupPermission)>> {
        let rows = sqlx::query_as::<_, GroupPermissionRow>(
            r#"
            SELECT DISTINCT roles.group_id, grants.permission
            FROM group_role_members AS members
            INNER JOIN group_roles AS roles
                ON roles.id = members.group_role_id
            INNER JOIN group_role_permissions AS grants
                ON grants.group_role_id = roles.id
            WHERE members.user_id = $1
            ORDER BY roles.group_id, grants.permission
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to load group permissions: {error}"))
        })?;

        rows.into_iter()
            .map(|row| {
                GroupPermission::from_str(row.permission.as_str())
                    .map(|permission| (GroupId::new(row.group_id), permission))
                    .map_err(|error| {
                        AppError::Internal(format!(
                            "failed to decode group permission '{}' in group '{}': {error}",
                            row.permission, row.group_id
                        ))
                    })
            })
            .collect()
    }
}
