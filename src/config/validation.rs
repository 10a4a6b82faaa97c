//! Configuration validation.
//!
//! Returns every problem found rather than stopping at the first one.

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("rate_limit.interval_ms must be greater than zero")]
    ZeroInterval,

    #[error("rate_limit.max_wait_secs must be greater than zero when set")]
    ZeroMaxWait,

    #[error("upstream.base_url '{0}' must be an http or https URL")]
    UpstreamUrl(String),

    #[error("upstream.timeout_secs must be greater than zero")]
    ZeroUpstreamTimeout,

    #[error("upstream.token_env must not be empty")]
    EmptyTokenEnv,

    #[error("timeouts.request_secs must be greater than zero when set")]
    ZeroRequestTimeout,

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.rate_limit.interval_ms == 0 {
        errors.push(ValidationError::ZeroInterval);
    }
    if config.rate_limit.max_wait_secs == Some(0) {
        errors.push(ValidationError::ZeroMaxWait);
    }

    match url::Url::parse(&config.upstream.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && !url.cannot_be_a_base() => {}
        _ => errors.push(ValidationError::UpstreamUrl(config.upstream.base_url.clone())),
    }
    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::ZeroUpstreamTimeout);
    }
    if config.upstream.token_env.is_empty() {
        errors.push(ValidationError::EmptyTokenEnv);
    }

    if config.timeouts.request_secs == Some(0) {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&GatewayConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = GatewayConfig::default();
        config.rate_limit.interval_ms = 0;
        config.upstream.base_url = "ftp://tracker".into();
        config.listener.bind_address = "nowhere".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::ZeroInterval));
        assert!(errors.contains(&ValidationError::BindAddress("nowhere".into())));
    }

    #[test]
    fn test_metrics_address_only_checked_when_enabled() {
        let mut config = GatewayConfig::default();
        config.observability.metrics_address = "bogus".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::MetricsAddress("bogus".into())]
        );
    }
}
