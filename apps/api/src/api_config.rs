use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use praxis_application::RuleExpr;
use praxis_core::AppError;
use tracing_subscriber::EnvFilter;

/// Decision applied to fields without a shield binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShieldFallback {
    Allow,
    Deny,
}

impl ShieldFallback {
    pub fn rule(self) -> RuleExpr {
        match self {
            Self::Allow => RuleExpr::Allow,
            Self::Deny => RuleExpr::Deny,
        }
    }
}

impl FromStr for ShieldFallback {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "allow" => Ok(Self::Allow),
            "deny" => Ok(Self::Deny),
            other => Err(AppError::Validation(format!(
                "SHIELD_FALLBACK must be either 'allow' or 'deny', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub database_url: Option<String>,
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub shield_fallback: ShieldFallback,
    pub dev_seed: bool,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let database_url = optional_non_empty(&lookup, "DATABASE_URL");
        let frontend_url =
            lookup("FRONTEND_URL").unwrap_or_else(|| "http://localhost:3000".to_owned());

        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = match optional_non_empty(&lookup, "API_PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|error| AppError::Validation(format!("invalid API_PORT: {error}")))?,
            None => 3100,
        };

        let shield_fallback = optional_non_empty(&lookup, "SHIELD_FALLBACK")
            .map(|value| ShieldFallback::from_str(value.as_str()))
            .transpose()?
            .unwrap_or(ShieldFallback::Allow);

        let dev_seed = match optional_non_empty(&lookup, "DEV_SEED") {
            Some(value) => parse_flag("DEV_SEED", value.as_str())?,
            None => false,
        };

        Ok(Self {
            database_url,
            frontend_url,
            api_host,
            api_port,
            shield_fallback,
            dev_seed,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Validation(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn optional_non_empty(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).filter(|value| !value.trim().is_empty())
}

fn parse_flag(name: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(AppError::Validation(format!(
            "{name} must be 'true' or 'false', got '{other}'"
        ))),
    }
}
