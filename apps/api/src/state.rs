use praxis_application::{AuthorizationService, Shield};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub authorization_service: AuthorizationService,
    pub shield: Shield,
}
