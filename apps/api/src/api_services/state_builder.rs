use std::sync::Arc;

use praxis_application::{AuthorizationService, Shield, ShieldPorts, praxis_bindings};
use praxis_core::AppError;
use praxis_infrastructure::{InMemoryShieldRepository, PostgresShieldRepository};
use tracing::{info, warn};

use crate::api_config::ApiConfig;
use crate::dev_seed;
use crate::state::AppState;

use super::connect_and_migrate;

/// Wires the lookup adapter, the authorization service and the binding table.
///
/// Postgres backs the shield when `DATABASE_URL` is set; otherwise an
/// in-memory store is used and optionally seeded with development fixtures.
pub async fn build_app_state(config: &ApiConfig) -> Result<AppState, AppError> {
    let ports = build_shield_ports(config).await?;
    let bindings = praxis_bindings(config.shield_fallback.rule());
    info!(
        bindings = bindings.len(),
        fallback = ?config.shield_fallback,
        "shield bindings loaded"
    );

    Ok(AppState {
        authorization_service: AuthorizationService::new(ports),
        shield: Shield::new(bindings),
    })
}

async fn build_shield_ports(config: &ApiConfig) -> Result<ShieldPorts, AppError> {
    if let Some(database_url) = config.database_url.as_deref() {
        if config.dev_seed {
            warn!("DEV_SEED only applies to the in-memory store and is ignored");
        }

        let pool = connect_and_migrate(database_url).await?;
        info!("shield lookups backed by postgres");
        return Ok(ShieldPorts::from_repository(Arc::new(
            PostgresShieldRepository::new(pool),
        )));
    }

    let repository = Arc::new(InMemoryShieldRepository::new());
    if config.dev_seed {
        dev_seed::run(&repository).await?;
    }
    info!("shield lookups backed by the in-memory store");
    Ok(ShieldPorts::from_repository(repository))
}
