//! Configuration loading from disk and the process environment.

use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding the listen port.
pub const PORT_ENV: &str = "PORT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid PORT value '{0}'")]
    Port(String),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, apply environment
/// overrides and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => GatewayConfig::default(),
    };

    if let Ok(port) = std::env::var(PORT_ENV) {
        apply_port(&mut config, &port)?;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Replace the port of `listener.bind_address`, keeping its host.
pub fn apply_port(config: &mut GatewayConfig, port: &str) -> Result<(), ConfigError> {
    let port: u16 = port
        .trim()
        .parse()
        .map_err(|_| ConfigError::Port(port.to_string()))?;

    let ip = config
        .listener
        .bind_address
        .parse::<SocketAddr>()
        .map(|addr| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    config.listener.bind_address = SocketAddr::new(ip, port).to_string();
    Ok(())
}
