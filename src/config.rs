//! Configuration types.

use std::time::Duration;

use crate::error::ConfigError;

/// Onboarding client configuration.
#[derive(Debug, Clone)]
pub struct OnboardConfig {
    /// Base URL of the compliance API, without trailing slash.
    pub api_base_url: String,
    /// Bearer token for the compliance API.
    pub api_token: String,
    /// Fixed delay between account-readiness polls.
    pub poll_interval: Duration,
    /// Per-request timeout for API calls.
    pub request_timeout: Duration,
}

impl Default for OnboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://sandbox.compliance.example.com/api/v1".to_string(),
            api_token: String::new(),
            poll_interval: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl OnboardConfig {
    /// Build a config from `ONBOARD_*` environment variables.
    ///
    /// `ONBOARD_API_TOKEN` is required; everything else falls back to
    /// defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_token = std::env::var("ONBOARD_API_TOKEN")
            .map_err(|_| ConfigError::MissingEnvVar("ONBOARD_API_TOKEN".to_string()))?;

        let defaults = Self::default();

        let api_base_url = std::env::var("ONBOARD_API_BASE_URL")
            .unwrap_or(defaults.api_base_url)
            .trim_end_matches('/')
            .to_string();

        let poll_interval = parse_secs("ONBOARD_POLL_INTERVAL_SECS", defaults.poll_interval)?;
        let request_timeout = parse_secs("ONBOARD_REQUEST_TIMEOUT_SECS", defaults.request_timeout)?;

        Ok(Self {
            api_base_url,
            api_token,
            poll_interval,
            request_timeout,
        })
    }
}

fn parse_secs(key: &str, default: Duration) -> Result<Duration, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = OnboardConfig::default();
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert!(config.api_base_url.starts_with("https://"));
        assert!(!config.api_base_url.ends_with('/'));
    }
}
