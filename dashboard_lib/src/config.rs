//! Environment-driven configuration, validated once at startup.
//!
//! Values come from `DASHBOARD_*` variables (the CLI loads a `.env` file
//! first). Every missing required variable is reported in a single error.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::DashboardError;

pub const ENV_BASE_URL: &str = "DASHBOARD_API_BASE_URL";
pub const ENV_PROCUREMENT_PATH: &str = "DASHBOARD_PROCUREMENT_PATH";
pub const ENV_API_KEY: &str = "DASHBOARD_API_KEY";
pub const ENV_API_SECRET: &str = "DASHBOARD_API_SECRET";
pub const ENV_CATALOG_URL: &str = "DASHBOARD_CATALOG_URL";
pub const ENV_TIMEOUT_SECS: &str = "DASHBOARD_TIMEOUT_SECS";
pub const ENV_ENABLE_RATE_LIMITING: &str = "DASHBOARD_ENABLE_RATE_LIMITING";
pub const ENV_MAX_REQUESTS: &str = "DASHBOARD_MAX_REQUESTS_PER_HOUR";
pub const ENV_RATE_LIMIT_WINDOW_SECS: &str = "DASHBOARD_RATE_LIMIT_WINDOW_SECS";
pub const ENV_ENVIRONMENT: &str = "DASHBOARD_ENVIRONMENT";

const REQUIRED_VARS: &[&str] = &[ENV_BASE_URL, ENV_PROCUREMENT_PATH];

const DEFAULT_CATALOG_URL: &str = "https://dummyjson.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_REQUESTS: u64 = 100;
const DEFAULT_WINDOW_SECS: u64 = 60 * 60;

/// Deployment stage. Development enables per-request debug summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Environment::Development => "development",
                Environment::Staging => "staging",
                Environment::Production => "production",
            }
        )
    }
}

impl FromStr for Environment {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(DashboardError::Config(format!(
                "{} must be development, staging or production (got '{}')",
                ENV_ENVIRONMENT, other
            ))),
        }
    }
}

/// Validated API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the procurement service.
    pub base_url: String,
    /// Path prefix of the procurement dataset under `base_url`.
    pub procurement_path: String,
    /// Base URL of the product catalog.
    pub catalog_url: String,
    /// Sent as `X-Api-Key` when present.
    pub api_key: Option<String>,
    /// Enables request signing when present.
    pub api_secret: Option<String>,
    pub timeout: Duration,
    pub enable_rate_limit: bool,
    pub max_requests_per_window: u64,
    pub rate_limit_window: Duration,
    pub environment: Environment,
}

impl ApiConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, DashboardError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DashboardError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let missing: Vec<&str> = REQUIRED_VARS
            .iter()
            .copied()
            .filter(|key| get(*key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(DashboardError::Config(format!(
                "missing required environment variables: {}. \
                 Check your .env file and ensure all required variables are set.",
                missing.join(", ")
            )));
        }

        let base_url = get(ENV_BASE_URL).unwrap_or_default();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(DashboardError::Config(format!(
                "{} must be an http(s) URL (got '{}')",
                ENV_BASE_URL, base_url
            )));
        }

        let environment = match get(ENV_ENVIRONMENT) {
            Some(raw) => raw.parse()?,
            None => Environment::default(),
        };

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            procurement_path: get(ENV_PROCUREMENT_PATH).unwrap_or_default(),
            catalog_url: get(ENV_CATALOG_URL)
                .unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string()),
            api_key: get(ENV_API_KEY),
            api_secret: get(ENV_API_SECRET),
            timeout: Duration::from_secs(parse_u64(
                ENV_TIMEOUT_SECS,
                get(ENV_TIMEOUT_SECS),
                DEFAULT_TIMEOUT_SECS,
            )?),
            enable_rate_limit: get(ENV_ENABLE_RATE_LIMITING)
                .map(|v| v.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            max_requests_per_window: parse_u64(
                ENV_MAX_REQUESTS,
                get(ENV_MAX_REQUESTS),
                DEFAULT_MAX_REQUESTS,
            )?,
            rate_limit_window: Duration::from_secs(parse_u64(
                ENV_RATE_LIMIT_WINDOW_SECS,
                get(ENV_RATE_LIMIT_WINDOW_SECS),
                DEFAULT_WINDOW_SECS,
            )?),
            environment,
        })
    }

    /// Logs the loaded configuration with credentials masked.
    pub fn log_summary(&self) {
        tracing::info!(
            base_url = %self.base_url,
            catalog_url = %self.catalog_url,
            environment = %self.environment,
            timeout_secs = self.timeout.as_secs(),
            enable_rate_limit = self.enable_rate_limit,
            max_requests_per_window = self.max_requests_per_window,
            api_key = mask(&self.api_key),
            api_secret = mask(&self.api_secret),
            "API configuration loaded"
        );
    }
}

fn mask(value: &Option<String>) -> &'static str {
    if value.is_some() {
        "***configured***"
    } else {
        "missing"
    }
}

fn parse_u64(key: &str, raw: Option<String>, default: u64) -> Result<u64, DashboardError> {
    match raw {
        None => Ok(default),
        Some(val) => val.trim().parse::<u64>().map_err(|_| {
            DashboardError::Config(format!(
                "{} must be a non-negative integer (got '{}')",
                key, val
            ))
        }),
    }
}

/// Reads a `u64` tuning knob from the environment, falling back on absence
/// or parse failure.
pub(crate) fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(default)
}

pub(crate) fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(default)
}
