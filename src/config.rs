//! Configuration management for formrelay.
//!
//! This module handles loading and validating configuration from environment variables.
//! A `.env` file is honored if present via `dotenvy`, which never prints to stdout.

use crate::error::{ConfigError, ConfigResult};
use std::env;
use std::path::PathBuf;

/// Default relay endpoint the contact form submits to.
pub const DEFAULT_RELAY_URL: &str = "https://api.web3forms.com/submit";

/// Default subject line attached to every submission.
pub const DEFAULT_SUBJECT: &str = "New Contact Form Submission from Portfolio";

/// Configuration for the formrelay client.
#[derive(Debug, Clone)]
pub struct Config {
    /// Relay endpoint URL submissions are POSTed to
    pub relay_url: String,

    /// Access key identifying this form to the relay.
    ///
    /// Optional at load time: its absence is surfaced as a configuration
    /// error when a submission is attempted, not as a startup failure.
    pub access_key: Option<String>,

    /// Subject line included as a hidden field in every payload
    pub subject: String,

    /// HTTP request timeout in seconds (default: 10)
    pub request_timeout: u64,

    /// Directory the file-backed key-value store writes to
    pub storage_dir: PathBuf,

    /// Log level (default: "error")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `FORM_RELAY_URL`: Relay endpoint (default: web3forms submit URL)
    /// - `FORM_RELAY_ACCESS_KEY`: Access key for the relay (blank treated as absent)
    /// - `FORM_RELAY_SUBJECT`: Subject line for submissions
    /// - `REQUEST_TIMEOUT`: HTTP timeout in seconds (default: 10)
    /// - `FORMRELAY_STORAGE_DIR`: Directory for persisted drafts and preferences
    /// - `LOG_LEVEL`: Logging level (default: "error")
    pub fn from_env() -> ConfigResult<Self> {
        // Try to load .env file if it exists (but don't fail if it doesn't)
        let _ = dotenvy::dotenv();

        let relay_url =
            env::var("FORM_RELAY_URL").unwrap_or_else(|_| DEFAULT_RELAY_URL.to_string());

        // Validate relay URL format
        if !relay_url.starts_with("http://") && !relay_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                var: "FORM_RELAY_URL".to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }

        // A blank access key is as useless as a missing one
        let access_key = env::var("FORM_RELAY_ACCESS_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let subject =
            env::var("FORM_RELAY_SUBJECT").unwrap_or_else(|_| DEFAULT_SUBJECT.to_string());

        let request_timeout = Self::parse_env_u64("REQUEST_TIMEOUT", 10)?;

        let storage_dir = match env::var("FORMRELAY_STORAGE_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("formrelay"),
        };

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "error".to_string());

        Ok(Config {
            relay_url,
            access_key,
            subject,
            request_timeout,
            storage_dir,
            log_level,
        })
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            relay_url: DEFAULT_RELAY_URL.to_string(),
            access_key: None,
            subject: DEFAULT_SUBJECT.to_string(),
            request_timeout: 10,
            storage_dir: PathBuf::from("."),
            log_level: "error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    // Helper to set and unset env vars for testing
    struct EnvGuard {
        vars: Vec<String>,
    }

    impl EnvGuard {
        fn new() -> Self {
            EnvGuard { vars: Vec::new() }
        }

        fn set(&mut self, key: &str, value: &str) {
            env::set_var(key, value);
            self.vars.push(key.to_string());
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for var in &self.vars {
                env::remove_var(var);
            }
        }
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.relay_url, DEFAULT_RELAY_URL);
        assert_eq!(config.subject, DEFAULT_SUBJECT);
        assert_eq!(config.request_timeout, 10);
        assert!(config.access_key.is_none());
    }

    #[test]
    #[serial]
    fn test_config_from_env_defaults() {
        env::remove_var("FORM_RELAY_URL");
        env::remove_var("FORM_RELAY_ACCESS_KEY");
        env::remove_var("REQUEST_TIMEOUT");

        let config = Config::from_env().unwrap();
        assert_eq!(config.relay_url, DEFAULT_RELAY_URL);
        assert!(config.access_key.is_none());
        assert_eq!(config.request_timeout, 10);
    }

    #[test]
    #[serial]
    fn test_config_from_env_invalid_url() {
        let mut guard = EnvGuard::new();
        guard.set("FORM_RELAY_URL", "not-a-url");

        let result = Config::from_env();
        assert!(result.is_err());
        if let Err(ConfigError::InvalidValue { var, .. }) = result {
            assert_eq!(var, "FORM_RELAY_URL");
        }
    }

    #[test]
    #[serial]
    fn test_config_blank_access_key_treated_as_absent() {
        let mut guard = EnvGuard::new();
        guard.set("FORM_RELAY_ACCESS_KEY", "   ");

        let config = Config::from_env().unwrap();
        assert!(config.access_key.is_none());
    }

    #[test]
    #[serial]
    fn test_config_from_env_valid() {
        let mut guard = EnvGuard::new();
        guard.set("FORM_RELAY_URL", "https://relay.example.com/submit");
        guard.set("FORM_RELAY_ACCESS_KEY", "key-123");
        guard.set("REQUEST_TIMEOUT", "30");
        guard.set("FORMRELAY_STORAGE_DIR", "/tmp/formrelay-test");

        let config = Config::from_env().unwrap();
        assert_eq!(config.relay_url, "https://relay.example.com/submit");
        assert_eq!(config.access_key.as_deref(), Some("key-123"));
        assert_eq!(config.request_timeout, 30);
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/formrelay-test"));
    }

    #[test]
    #[serial]
    fn test_parse_env_u64() {
        let mut guard = EnvGuard::new();
        guard.set("TEST_TIMEOUT_U64", "42");

        let result = Config::parse_env_u64("TEST_TIMEOUT_U64", 10);
        assert_eq!(result.unwrap(), 42);

        let result = Config::parse_env_u64("NONEXISTENT", 10);
        assert_eq!(result.unwrap(), 10);
    }

    #[test]
    #[serial]
    fn test_parse_env_u64_invalid() {
        let mut guard = EnvGuard::new();
        guard.set("TEST_TIMEOUT_INVALID", "not-a-number");

        let result = Config::parse_env_u64("TEST_TIMEOUT_INVALID", 10);
        assert!(result.is_err());
    }
}
