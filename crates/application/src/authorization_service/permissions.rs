use praxis_core::{AppResult, UserIdentity};
use praxis_domain::PermissionStore;

use crate::PermissionRepository;

/// Folds the server and group role grants of one user into a store.
pub(super) async fn load(
    repository: &dyn PermissionRepository,
    caller: &UserIdentity,
) -> AppResult<PermissionStore> {
    let server = repository.list_server_permissions(caller.id()).await?;
    let groups = repository.list_group_permissions(caller.id()).await?;

    Ok(groups
        .into_iter()
        .fold(
            PermissionStore::builder().server_all(server),
            |builder, (group_id, permission)| builder.group(group_id, permission),
        )
        .build())
}
