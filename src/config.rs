use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::{Error, Result};

pub const TOKEN_ENV_VAR: &str = "GITHUB_PAT_SAML_AUTHS_REPORT_TOKEN";
pub const API_URL_ENV_VAR: &str = "GITHUB_API_URL";
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const FINE_GRAINED_PREFIX: &str = "github_pat_";

#[derive(Clone)]
pub struct Config {
    pub github_token: String,
    pub api_base: String,
    pub secondary_max_retries: u32,
    pub secondary_backoff: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the run configuration from any key lookup, so tests don't
    /// have to touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let github_token = resolve_token(lookup(TOKEN_ENV_VAR))?;

        let api_base = lookup(API_URL_ENV_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let secondary_max_retries = lookup("SAML_REPORT_SECONDARY_RETRIES")
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        let secondary_backoff = lookup("SAML_REPORT_SECONDARY_BACKOFF_MS")
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_secs(1));

        Ok(Self {
            github_token,
            api_base,
            secondary_max_retries,
            secondary_backoff,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("github_token", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("secondary_max_retries", &self.secondary_max_retries)
            .field("secondary_backoff", &self.secondary_backoff)
            .finish()
    }
}

fn resolve_token(value: Option<String>) -> Result<String> {
    let token = match value {
        Some(token) if !token.trim().is_empty() => token.trim().to_string(),
        _ => {
            return Err(Error::Config(format!(
                "Token not found in environment variable: {}",
                TOKEN_ENV_VAR
            )))
        }
    };

    if token.starts_with(FINE_GRAINED_PREFIX) {
        return Err(Error::FineGrainedToken);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_missing_token_names_variable() {
        let err = config_from(&[]).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains(TOKEN_ENV_VAR));
    }

    #[test]
    fn test_empty_token_is_missing() {
        let err = config_from(&[(TOKEN_ENV_VAR, "  ")]).unwrap_err();
        assert!(err.to_string().contains(TOKEN_ENV_VAR));
    }

    #[test]
    fn test_fine_grained_token_rejected() {
        let err = config_from(&[(TOKEN_ENV_VAR, "github_pat_11ABCDEF")]).unwrap_err();
        assert!(matches!(err, Error::FineGrainedToken));
    }

    #[test]
    fn test_classic_token_with_defaults() {
        let config = config_from(&[(TOKEN_ENV_VAR, "ghp_classic")]).unwrap();
        assert_eq!(config.github_token, "ghp_classic");
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.secondary_max_retries, 5);
        assert_eq!(config.secondary_backoff, Duration::from_secs(1));
    }

    #[test]
    fn test_api_base_override_trims_slash() {
        let config = config_from(&[
            (TOKEN_ENV_VAR, "ghp_classic"),
            (API_URL_ENV_VAR, "https://ghe.example.com/api/v3/"),
            ("SAML_REPORT_SECONDARY_RETRIES", "2"),
            ("SAML_REPORT_SECONDARY_BACKOFF_MS", "10"),
        ])
        .unwrap();
        assert_eq!(config.api_base, "https://ghe.example.com/api/v3");
        assert_eq!(config.secondary_max_retries, 2);
        assert_eq!(config.secondary_backoff, Duration::from_millis(10));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = config_from(&[(TOKEN_ENV_VAR, "ghp_secret")]).unwrap();
        assert!(!format!("{:?}", config).contains("ghp_secret"));
    }
}
