//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::ClientConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the custody API bearer token.
pub const BEARER_TOKEN_ENV_VAR: &str = "CUSTODY_BEARER_TOKEN";
/// Environment variable overriding the custody API base URL.
pub const API_URL_ENV_VAR: &str = "CUSTODY_API_URL";
/// Environment variable overriding the chain RPC URL.
pub const RPC_URL_ENV_VAR: &str = "CUSTODY_RPC_URL";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
///
/// Environment overrides are applied before validation.
pub fn load_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let mut config: ClientConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::debug!(path = ?path, "Configuration loaded");
    Ok(config)
}

/// Defaults plus environment overrides, validated.
pub fn load_from_env() -> Result<ClientConfig, ConfigError> {
    let mut config = ClientConfig::default();
    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Overlay credentials and endpoints from the environment.
pub fn apply_env_overrides(config: &mut ClientConfig) {
    apply_overrides_from(config, |key| std::env::var(key).ok());
}

fn apply_overrides_from<F>(config: &mut ClientConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = lookup(BEARER_TOKEN_ENV_VAR).filter(|v| !v.is_empty()) {
        config.api.bearer_token = token;
    }
    if let Some(url) = lookup(API_URL_ENV_VAR).filter(|v| !v.is_empty()) {
        config.api.base_url = url;
    }
    if let Some(url) = lookup(RPC_URL_ENV_VAR).filter(|v| !v.is_empty()) {
        config.chain.rpc_url = url;
        config.chain.enabled = true;
    }
}
