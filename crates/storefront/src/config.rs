//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL (default: <http://localhost:3000>); an
//!   `https://` URL turns on secure session cookies
//! - `STOREFRONT_CHECKOUT_DELAY_MS` - Simulated order processing time (default: 1500)
//! - `STOREFRONT_ADDED_FEEDBACK_MS` - How long "added" feedback shows on a product (default: 2000)
//! - `STOREFRONT_SESSION_IDLE_MINUTES` - Idle time before a shopping session is dropped (default: 30)
//! - `STOREFRONT_ANALYTICS` - `off` or `log` (default: off)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which analytics sink to install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalyticsMode {
    /// Events are dropped.
    #[default]
    Off,
    /// Events are written to the log.
    Log,
}

impl FromStr for AnalyticsMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" | "none" | "" => Ok(Self::Off),
            "log" => Ok(Self::Log),
            other => Err(format!("expected `off` or `log`, got `{other}`")),
        }
    }
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Simulated latency of order placement
    pub checkout_delay: Duration,
    /// How long a product shows its "just added" state
    pub added_feedback: Duration,
    /// Idle time after which a shopping session is discarded
    pub session_idle: Duration,
    /// Analytics sink selection
    pub analytics: AnalyticsMode,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            checkout_delay: Duration::from_millis(1500),
            added_feedback: Duration::from_millis(2000),
            session_idle: Duration::from_secs(30 * 60),
            analytics: AnalyticsMode::Off,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = parse_or(&lookup, "STOREFRONT_HOST", defaults.host)?;
        let port = parse_or(&lookup, "STOREFRONT_PORT", defaults.port)?;
        let base_url = lookup("STOREFRONT_BASE_URL").unwrap_or(defaults.base_url);
        let checkout_delay = Duration::from_millis(parse_or(
            &lookup,
            "STOREFRONT_CHECKOUT_DELAY_MS",
            1500_u64,
        )?);
        let added_feedback = Duration::from_millis(parse_or(
            &lookup,
            "STOREFRONT_ADDED_FEEDBACK_MS",
            2000_u64,
        )?);
        let idle_minutes: u64 = parse_or(&lookup, "STOREFRONT_SESSION_IDLE_MINUTES", 30)?;
        if idle_minutes == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_SESSION_IDLE_MINUTES".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let analytics = parse_or(&lookup, "STOREFRONT_ANALYTICS", defaults.analytics)?;

        Ok(Self {
            host,
            port,
            base_url,
            checkout_delay,
            added_feedback,
            session_idle: Duration::from_secs(idle_minutes * 60),
            analytics,
            sentry_dsn: lookup("SENTRY_DSN").filter(|v| !v.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_or(&lookup, "SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: parse_or(&lookup, "SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable if set, otherwise use `default`.
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}
