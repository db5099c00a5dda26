//! Centralized configuration management for course-console

use std::time::Duration;
use anyhow::{Result, Context};

const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
const DEFAULT_USER_AGENT: &str = "course-console/0.1.0";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the course platform REST API
    pub api_base_url: String,
    /// HTTP client configuration
    pub http: HttpConfig,
    /// Number of course rows shown per page
    pub page_size: usize,
    /// File the console writes its logs to
    pub log_file: String,
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            http: HttpConfig::default(),
            page_size: 5,
            log_file: "course-console.log".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let api_base_url = std::env::var("COURSE_CONSOLE_API_BASE_URL")
            .unwrap_or(defaults.api_base_url);

        let http = HttpConfig {
            timeout_seconds: parse_env_var("COURSE_CONSOLE_HTTP_TIMEOUT_SECONDS")?
                .unwrap_or(defaults.http.timeout_seconds),
            user_agent: std::env::var("COURSE_CONSOLE_USER_AGENT")
                .unwrap_or(defaults.http.user_agent),
        };

        Ok(Config {
            api_base_url,
            http,
            page_size: parse_env_var("COURSE_CONSOLE_PAGE_SIZE")?.unwrap_or(defaults.page_size),
            log_file: std::env::var("COURSE_CONSOLE_LOG_FILE").unwrap_or(defaults.log_file),
        })
    }

    /// Replace the API base URL, e.g. from a command line flag
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Base URL without a trailing slash, ready for path joining
    pub fn api_base(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    /// Get HTTP timeout as Duration
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let base = self.api_base();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "API base URL must start with http:// or https://, got '{}'",
                self.api_base_url
            ));
        }

        if self.page_size == 0 {
            return Err(anyhow::anyhow!("Page size must be at least 1"));
        }

        Ok(())
    }
}

/// Helper function to parse environment variable as a specific type
fn parse_env_var<T>(var_name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match std::env::var(var_name) {
        Ok(val) => val.parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.page_size, 5);
        assert_eq!(config.http.timeout_seconds, 30);
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_config_validation() {
        Config::default().validate().unwrap();

        let bad_scheme = Config::default().with_api_base_url("ftp://example.com");
        assert!(bad_scheme.validate().is_err());

        let mut zero_page = Config::default();
        zero_page.page_size = 0;
        assert!(zero_page.validate().is_err());
    }

    #[test]
    fn test_api_base_strips_trailing_slash() {
        let config = Config::default().with_api_base_url("https://api.example.com/v1/");
        assert_eq!(config.api_base(), "https://api.example.com/v1");
    }

    #[test]
    fn test_parse_env_var_reports_variable_name() {
        std::env::set_var("COURSE_CONSOLE_TEST_BAD_NUMBER", "abc");
        let err = parse_env_var::<u64>("COURSE_CONSOLE_TEST_BAD_NUMBER").unwrap_err();
        assert!(err.to_string().contains("COURSE_CONSOLE_TEST_BAD_NUMBER"));
        std::env::remove_var("COURSE_CONSOLE_TEST_BAD_NUMBER");

        assert!(parse_env_var::<u64>("COURSE_CONSOLE_TEST_UNSET").unwrap().is_none());
    }
}
