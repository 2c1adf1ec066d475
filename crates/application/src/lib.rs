//! Application services and ports for the Praxis authorization shield.

#![forbid(unsafe_code)]

mod authorization_service;
mod scope_resolution;
mod shield;
mod shield_ports;

pub use authorization_service::{AuthorizationService, hash_access_token};
pub use scope_resolution::{IdSource, ScopeResolution, ScopeResolver, ScopeSource};
pub use shield::{
    CachePolicy, FieldRequest, RefreshTokenClaims, Rule, RuleCache, RuleExpr, Shield,
    ShieldBindings, ShieldContext, ShieldServices, and, or, praxis_bindings, rules,
};
pub use shield_ports::{
    AccessTokenRepository, GroupMembershipRepository, PermissionRepository,
    RefreshTokenRepository, ResourceOwnershipRepository, ResourceScopeRepository, ShieldPorts,
};
