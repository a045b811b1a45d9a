// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Server configuration module
//!
//! This module provides configuration structures and logic for the wallet guard server,
//! supporting different environments and validation of configuration parameters.

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    num::{NonZeroU32, NonZeroUsize},
    time::Duration,
};

use anyhow::{Result, anyhow, ensure};
use config::{Config, ConfigError, Environment as ConfigEnv, File};
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_with::{PickFirst, StringWithSeparator, formats::CommaSeparator, serde_as};
use shared_types::{Network, TotalPolicy};
use utoipa::ToSchema;
use wallet_resolver::{
    DEFAULT_COOLDOWN, DEFAULT_DEADLINE, DEFAULT_REQUEST_TIMEOUT, ExplorerConfig, LcdConfig,
    DEFAULT_RWA_TIMEOUT, MAX_COOLDOWN, ResolverConfig, RwaConfig,
    explorer::{DEFAULT_EXPLORER_MAX_RETRIES, DEFAULT_EXPLORER_TIMEOUT, DEFAULT_EXPLORER_URL},
};

use crate::error::{ServerError, ServerResult};

const DEFAULT_REQUESTS_PER_MINUTE: NonZeroU32 = match NonZeroU32::new(15) {
    Some(value) => value,
    None => NonZeroU32::MIN,
};

const DEFAULT_LOG_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000) {
    Some(value) => value,
    None => NonZeroUsize::MIN,
};

/// A validated server port that ensures the value is appropriate for the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServerPort {
    port: u16,
    environment: Environment,
}

impl ServerPort {
    /// Create a new `ServerPort`, ensuring it's valid for the given environment
    ///
    /// # Errors
    ///
    /// Returns an error if the port is 0 in non-testing environments
    pub fn new(port: u16, environment: Environment) -> Result<Self> {
        if port == 0 && environment != Environment::Testing {
            return Err(anyhow!("port cannot be 0 in non-testing environments"));
        }
        Ok(Self { port, environment })
    }

    /// Create a safe default port for development
    pub const fn default_development() -> Self {
        Self {
            port: 3000,
            environment: Environment::Development,
        }
    }

    /// Create a safe testing port (port 0)
    pub const fn testing() -> Self {
        Self {
            port: 0,
            environment: Environment::Testing,
        }
    }

    /// Get the port value
    pub fn value(&self) -> u16 {
        self.port
    }
}

impl<'de> Deserialize<'de> for ServerPort {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let port = u16::deserialize(deserializer)?;
        // Checked against the real environment once loading is done
        Ok(Self {
            port,
            environment: Environment::Development,
        })
    }
}

/// A validated timeout duration in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeoutSeconds(Duration);

impl TimeoutSeconds {
    /// Create a new `TimeoutSeconds`, ensuring the value is within valid bounds
    ///
    /// # Errors
    ///
    /// Returns an error if timeout is 0 or greater than 300 seconds
    pub fn new(seconds: u64) -> Result<Self> {
        ensure!(seconds != 0, "timeout must be greater than 0");
        ensure!(seconds <= 300, "timeout cannot exceed 300");
        Ok(Self(Duration::from_secs(seconds)))
    }

    /// Create a safe default timeout (30 seconds)
    pub const fn default_value() -> Self {
        Self(Duration::from_secs(30))
    }

    /// Create a safe testing timeout (5 seconds)
    pub const fn testing() -> Self {
        Self(Duration::from_secs(5))
    }

    /// Get the timeout value
    pub fn value(&self) -> Duration {
        self.0
    }
}

impl<'de> Deserialize<'de> for TimeoutSeconds {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds = u64::deserialize(deserializer)?;
        Self::new(seconds).map_err(|e| de::Error::custom(e.to_string()))
    }
}

impl Default for TimeoutSeconds {
    fn default() -> Self {
        Self::default_value()
    }
}

/// Per-read timeout for a REST node, 5 to 7 seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProbeTimeout(Duration);

impl ProbeTimeout {
    /// Create a new `ProbeTimeout`
    ///
    /// # Errors
    ///
    /// Returns an error outside the 5..=7 second range
    pub fn new(seconds: u64) -> Result<Self> {
        ensure!(
            (5..=7).contains(&seconds),
            "probe timeout must be between 5 and 7 seconds"
        );
        Ok(Self(Duration::from_secs(seconds)))
    }

    /// Get the timeout value
    pub fn value(&self) -> Duration {
        self.0
    }
}

impl<'de> Deserialize<'de> for ProbeTimeout {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds = u64::deserialize(deserializer)?;
        Self::new(seconds).map_err(|e| de::Error::custom(e.to_string()))
    }
}

impl Default for ProbeTimeout {
    fn default() -> Self {
        Self(DEFAULT_REQUEST_TIMEOUT)
    }
}

/// Upper bound on one endpoint race, 10 to 15 seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeadlineSeconds(Duration);

impl DeadlineSeconds {
    /// Create a new `DeadlineSeconds`
    ///
    /// # Errors
    ///
    /// Returns an error outside the 10..=15 second range
    pub fn new(seconds: u64) -> Result<Self> {
        ensure!(
            (10..=15).contains(&seconds),
            "resolution deadline must be between 10 and 15 seconds"
        );
        Ok(Self(Duration::from_secs(seconds)))
    }

    /// Get the deadline value
    pub fn value(&self) -> Duration {
        self.0
    }
}

impl<'de> Deserialize<'de> for DeadlineSeconds {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds = u64::deserialize(deserializer)?;
        Self::new(seconds).map_err(|e| de::Error::custom(e.to_string()))
    }
}

impl Default for DeadlineSeconds {
    fn default() -> Self {
        Self(DEFAULT_DEADLINE)
    }
}

/// How long a failed node stays blocked, 1 second to 1 day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CooldownSeconds(Duration);

impl CooldownSeconds {
    /// Create a new `CooldownSeconds`
    ///
    /// # Errors
    ///
    /// Returns an error for zero or for more than one day
    pub fn new(seconds: u64) -> Result<Self> {
        ensure!(
            (1..=MAX_COOLDOWN.as_secs()).contains(&seconds),
            "cooldown must be between 1 and {} seconds",
            MAX_COOLDOWN.as_secs()
        );
        Ok(Self(Duration::from_secs(seconds)))
    }

    /// Get the cooldown value
    pub fn value(&self) -> Duration {
        self.0
    }
}

impl<'de> Deserialize<'de> for CooldownSeconds {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds = u64::deserialize(deserializer)?;
        Self::new(seconds).map_err(|e| de::Error::custom(e.to_string()))
    }
}

impl Default for CooldownSeconds {
    fn default() -> Self {
        Self(DEFAULT_COOLDOWN)
    }
}

/// Environment types for configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Production environment
    Production,
    /// Development environment
    Development,
    /// Testing environment
    Testing,
}

/// Per-IP rate limiting for the `/v1` routes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitingConfig {
    /// Whether the limiter is installed at all
    pub enabled: bool,
    /// Requests allowed per IP in one 60 second window
    pub requests_per_minute: NonZeroU32,
}

impl Default for RateLimitingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests_per_minute: DEFAULT_REQUESTS_PER_MINUTE,
        }
    }
}

/// Explorer fallback settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackSettings {
    /// Whether empty-looking results consult the explorer
    pub enabled: bool,
    /// Explorer base URL, must not be empty
    pub explorer_url: String,
    /// Timeout for one page fetch
    pub timeout_seconds: TimeoutSeconds,
    /// Extra attempts after a transient failure
    pub max_retries: usize,
}

impl FallbackSettings {
    /// Explorer scraper configuration
    pub fn explorer_config(&self) -> ServerResult<ExplorerConfig> {
        ExplorerConfig::new(
            &self.explorer_url,
            self.timeout_seconds.value(),
            self.max_retries,
        )
        .map_err(|message| ServerError::Config {
            message: format!("invalid explorer url: {message}"),
        })
    }
}

impl Default for FallbackSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            explorer_url: DEFAULT_EXPLORER_URL.to_string(),
            timeout_seconds: TimeoutSeconds(DEFAULT_EXPLORER_TIMEOUT),
            max_retries: DEFAULT_EXPLORER_MAX_RETRIES,
        }
    }
}

/// Endpoint race and breaker settings
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverSettings {
    /// Network whose built-in node list is used when `endpoints` is empty
    pub network: Network,
    /// Operator node list, a comma separated string or a list
    #[serde_as(as = "PickFirst<(_, StringWithSeparator<CommaSeparator, String>)>")]
    #[serde(default)]
    pub endpoints: Vec<String>,
    /// Seconds a failed node stays blocked
    pub cooldown_seconds: CooldownSeconds,
    /// Per-read timeout
    pub request_timeout_seconds: ProbeTimeout,
    /// Overall race deadline
    pub deadline_seconds: DeadlineSeconds,
    /// How category balances fold into the total
    pub total_policy: TotalPolicy,
    /// Explorer fallback
    pub fallback: FallbackSettings,
}

impl ResolverSettings {
    /// Race policy for the resolver
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            cooldown: self.cooldown_seconds.value(),
            deadline: self.deadline_seconds.value(),
            fallback_enabled: self.fallback.enabled,
        }
    }

    /// Probe configuration for the REST client
    pub fn lcd_config(&self) -> LcdConfig {
        LcdConfig {
            request_timeout: self.request_timeout_seconds.value(),
            total_policy: self.total_policy,
        }
    }
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            network: Network::Mainnet,
            endpoints: Vec::new(),
            cooldown_seconds: CooldownSeconds::default(),
            request_timeout_seconds: ProbeTimeout::default(),
            deadline_seconds: DeadlineSeconds::default(),
            total_policy: TotalPolicy::default(),
            fallback: FallbackSettings::default(),
        }
    }
}

/// Real-world asset source settings
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RwaSettings {
    /// CosmWasm query URLs, a comma separated string or a list
    #[serde_as(as = "PickFirst<(_, StringWithSeparator<CommaSeparator, String>)>")]
    #[serde(default)]
    pub sources: Vec<String>,
    /// Timeout for one source query
    pub timeout_seconds: TimeoutSeconds,
}

impl RwaSettings {
    /// Aggregator configuration
    pub fn rwa_config(&self) -> RwaConfig {
        RwaConfig::from_sources(&self.sources, self.timeout_seconds.value())
    }
}

impl Default for RwaSettings {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            timeout_seconds: TimeoutSeconds(DEFAULT_RWA_TIMEOUT),
        }
    }
}

/// Recent-validations log settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsLogConfig {
    /// Entries kept before the oldest are dropped
    pub capacity: NonZeroUsize,
}

impl Default for MetricsLogConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}

/// Server configuration for different environments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: IpAddr,
    /// Server port (validated for environment compatibility)
    pub port: ServerPort,
    /// Request timeout in seconds (validated range: 1-300)
    pub timeout_seconds: TimeoutSeconds,
    /// Environment type
    pub environment: Environment,
    /// Rate limiting for the versioned API
    pub rate_limiting: RateLimitingConfig,
    /// Wallet resolution
    pub resolver: ResolverSettings,
    /// Real-world asset sources
    pub rwa: RwaSettings,
    /// Recent-validations log
    pub metrics_log: MetricsLogConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: ServerPort::default_development(),
            timeout_seconds: TimeoutSeconds::default(),
            environment: Environment::Development,
            rate_limiting: RateLimitingConfig::default(),
            resolver: ResolverSettings::default(),
            rwa: RwaSettings::default(),
            metrics_log: MetricsLogConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create configuration from environment variables and optional configuration files
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Config` if configuration is invalid or cannot be loaded.
    pub fn from_env() -> ServerResult<Self> {
        Self::load().map_err(|e| ServerError::Config {
            message: format!("failed to load configuration: {e}"),
        })
    }

    /// Load configuration using the config crate with hierarchical sources
    ///
    /// Configuration is loaded in the following order (later sources override earlier ones):
    /// 1. Default values
    /// 2. Configuration file (config.json)
    /// 3. Environment-specific files (config.{env}.json)
    /// 4. Environment variables with `SERVER_` prefix, nested keys joined by `__`
    /// 5. `XION_NETWORK`, `XION_API_ENDPOINTS` and `XION_RWA_ENDPOINTS`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let env_var = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let mut config_builder = Config::builder()
            .set_default("host", "127.0.0.1")?
            .set_default("port", 3000)?
            .set_default("timeout_seconds", 30)?
            .set_default("environment", "development")?
            .set_default("rate_limiting.enabled", true)?
            .set_default("rate_limiting.requests_per_minute", DEFAULT_REQUESTS_PER_MINUTE.get())?
            .set_default("resolver.network", Network::Mainnet.name())?
            .set_default("resolver.cooldown_seconds", DEFAULT_COOLDOWN.as_secs())?
            .set_default(
                "resolver.request_timeout_seconds",
                DEFAULT_REQUEST_TIMEOUT.as_secs(),
            )?
            .set_default("resolver.deadline_seconds", DEFAULT_DEADLINE.as_secs())?
            .set_default("resolver.total_policy", "liquid_staked_unbonding")?
            .set_default("resolver.fallback.enabled", true)?
            .set_default("resolver.fallback.explorer_url", DEFAULT_EXPLORER_URL)?
            .set_default(
                "resolver.fallback.timeout_seconds",
                DEFAULT_EXPLORER_TIMEOUT.as_secs(),
            )?
            .set_default(
                "resolver.fallback.max_retries",
                u64::try_from(DEFAULT_EXPLORER_MAX_RETRIES).unwrap_or(1),
            )?
            .set_default("rwa.timeout_seconds", DEFAULT_RWA_TIMEOUT.as_secs())?
            .set_default("metrics_log.capacity", 1000)?
            .add_source(File::with_name("config.json").required(false))
            .add_source(
                File::with_name(&format!("config.{}.json", env_var.to_lowercase())).required(false),
            )
            .add_source(
                ConfigEnv::with_prefix("SERVER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("resolver.network", std::env::var("XION_NETWORK").ok())?
            .set_override_option(
                "resolver.endpoints",
                std::env::var("XION_API_ENDPOINTS").ok(),
            )?
            .set_override_option("rwa.sources", std::env::var("XION_RWA_ENDPOINTS").ok())?;

        if std::env::var("ENVIRONMENT").is_ok() {
            config_builder = config_builder.set_override("environment", env_var.to_lowercase())?;
        }

        let config = config_builder.build()?;
        let mut server_config: Self = config.try_deserialize()?;

        server_config.port = ServerPort::new(server_config.port.value(), server_config.environment)
            .map_err(|e| ConfigError::Message(format!("invalid port configuration: {e}")))?;

        Ok(server_config)
    }

    /// Create configuration optimized for testing
    ///
    /// The explorer fallback is off so tests never reach the public explorer.
    pub fn for_testing() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: ServerPort::testing(),
            timeout_seconds: TimeoutSeconds::testing(),
            environment: Environment::Testing,
            rate_limiting: RateLimitingConfig::default(),
            resolver: ResolverSettings {
                fallback: FallbackSettings {
                    enabled: false,
                    ..FallbackSettings::default()
                },
                ..ResolverSettings::default()
            },
            rwa: RwaSettings::default(),
            metrics_log: MetricsLogConfig::default(),
        }
    }

    /// Get socket address for binding
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port.value())
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Production => write!(f, "production"),
            Environment::Development => write!(f, "development"),
            Environment::Testing => write!(f, "testing"),
        }
    }
}
