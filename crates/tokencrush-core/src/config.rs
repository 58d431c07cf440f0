//! Configuration for the TokenCrush client

use std::time::Duration;

use crate::{Error, Result};

/// Production endpoint used when no override is given.
pub const DEFAULT_BASE_URL: &str = "https://api.tokencrush.ai";

/// Default request timeout: 30 seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const API_KEY_ENV: &str = "TOKENCRUSH_API_KEY";
pub const BASE_URL_ENV: &str = "TC_BASE_URL";
pub const TIMEOUT_ENV: &str = "TC_TIMEOUT_SECS";

/// Client configuration, read once at construction and never mutated by the
/// client afterwards.
#[derive(Clone)]
pub struct ClientConfig {
    /// Static bearer key (required)
    pub api_key: String,

    /// Base URL override; `None` means [`DEFAULT_BASE_URL`]
    pub base_url: Option<String>,

    /// Request timeout in seconds, 0 means default
    pub timeout_secs: u64,

    /// Honour HTTP(S)_PROXY from the environment
    pub system_proxy: bool,
}

// The key is a secret; keep it out of logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("system_proxy", &self.system_proxy)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            system_proxy: true,
        }
    }

    /// Read `TOKENCRUSH_API_KEY`, `TC_BASE_URL` and `TC_TIMEOUT_SECS`.
    ///
    /// A missing or blank key is a hard error.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with_key(None)
    }

    /// Same as [`ClientConfig::from_env`], but an explicit `api_key` takes
    /// precedence over `TOKENCRUSH_API_KEY` and must not be blank either.
    pub fn from_env_with_key(api_key: Option<String>) -> Result<Self> {
        let api_key = api_key
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::configuration(format!("{API_KEY_ENV} is not set")))?;

        let mut config = Self::new(api_key);
        if let Some(base_url) = std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
        {
            config = config.with_base_url(base_url);
        }
        if let Ok(raw) = std::env::var(TIMEOUT_ENV) {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                Error::configuration(format!("{TIMEOUT_ENV} must be a whole number of seconds"))
            })?;
            config = config.with_timeout(secs);
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    #[must_use]
    pub fn with_system_proxy(mut self, enabled: bool) -> Self {
        self.system_proxy = enabled;
        self
    }

    /// Base URL without a trailing slash.
    pub fn effective_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn effective_timeout(&self) -> Duration {
        if self.timeout_secs == 0 {
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.timeout_secs)
        }
    }

    /// Check what can be checked without touching the network.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::configuration("API key is required"));
        }
        let base_url = self.effective_base_url();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(Error::configuration(format!(
                "base URL must start with http:// or https://, got {base_url:?}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var(API_KEY_ENV);
        std::env::remove_var(BASE_URL_ENV);
        std::env::remove_var(TIMEOUT_ENV);
    }

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::new("key");
        assert_eq!(config.effective_base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.effective_timeout(), Duration::from_secs(30));
        assert!(config.system_proxy);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_base_url_override_trims_slash() {
        let config = ClientConfig::new("key").with_base_url("http://localhost:8000/");
        assert_eq!(config.effective_base_url(), "http://localhost:8000");

        let config = ClientConfig::new("key").with_base_url("   ");
        assert_eq!(config.effective_base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_zero_timeout_uses_default() {
        let config = ClientConfig::new("key").with_timeout(0);
        assert_eq!(
            config.effective_timeout(),
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_validate_rejects_blank_key() {
        let err = ClientConfig::new("  ").validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_validate_rejects_bad_scheme() {
        let err = ClientConfig::new("key")
            .with_base_url("ftp://example.com")
            .validate()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = ClientConfig::new("sk-very-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("redacted"));
    }

    #[test]
    #[serial]
    fn test_from_env_requires_key() {
        clear_env();
        let err = ClientConfig::from_env().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains(API_KEY_ENV));
    }

    #[test]
    #[serial]
    fn test_from_env_reads_overrides() {
        clear_env();
        std::env::set_var(API_KEY_ENV, "env-key");
        std::env::set_var(BASE_URL_ENV, "http://localhost:9000");
        std::env::set_var(TIMEOUT_ENV, "5");

        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.api_key, "env-key");
        assert_eq!(config.effective_base_url(), "http://localhost:9000");
        assert_eq!(config.effective_timeout(), Duration::from_secs(5));

        std::env::set_var(TIMEOUT_ENV, "soon");
        assert!(ClientConfig::from_env().is_err());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_explicit_key_wins_over_env() {
        clear_env();
        std::env::set_var(API_KEY_ENV, "env-key");
        std::env::set_var(BASE_URL_ENV, "http://localhost:9000");

        let config = ClientConfig::from_env_with_key(Some("flag-key".into())).unwrap();
        assert_eq!(config.api_key, "flag-key");
        assert_eq!(config.effective_base_url(), "http://localhost:9000");

        std::env::remove_var(API_KEY_ENV);
        let err = ClientConfig::from_env_with_key(Some("  ".into())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);

        clear_env();
    }
}
